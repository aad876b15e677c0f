//! NDJSON (Newline Delimited JSON) output
//!
//! Extracted records and models are written one JSON object per line so that
//! downstream ingestion can stream them.

use crate::etl::Loader;

use eyre::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::io::Write;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

fn to_ndjson<T: Serialize>(items: &[T]) -> Result<String> {
    let mut content = String::new();
    for item in items {
        content.push_str(&serde_json::to_string(item).context("Failed to serialize item")?);
        content.push('\n');
    }
    Ok(content)
}

/// Read NDJSON from a file
pub struct NdjsonReader {
    path: PathBuf,
}

impl NdjsonReader {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Read all lines as JSON values, skipping blank lines
    pub fn read(&self) -> Result<Vec<Value>> {
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read NDJSON file: {}", self.path.display()))?;

        content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                serde_json::from_str(line)
                    .with_context(|| format!("Failed to parse JSON line: {}", line))
            })
            .collect()
    }
}

/// Write items as NDJSON to a file
///
/// Each load replaces the file, so an empty load leaves it empty.
pub struct NdjsonWriter<T> {
    path: PathBuf,
    _item: PhantomData<fn(T)>,
}

impl<T: Serialize> NdjsonWriter<T> {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            _item: PhantomData,
        }
    }

    pub fn write(&self, items: &[T]) -> Result<()> {
        std::fs::write(&self.path, to_ndjson(items)?)
            .with_context(|| format!("Failed to write NDJSON file: {}", self.path.display()))
    }
}

impl<T: Serialize + Send> Loader for NdjsonWriter<T> {
    type Item = T;

    async fn load(&self, items: Vec<Self::Item>) -> Result<usize> {
        self.write(&items)?;
        log::debug!("Wrote {} items to {}", items.len(), self.path.display());
        Ok(items.len())
    }
}

/// Write items as NDJSON to standard output
pub struct NdjsonStdout<T> {
    _item: PhantomData<fn(T)>,
}

impl<T> NdjsonStdout<T> {
    pub fn new() -> Self {
        Self { _item: PhantomData }
    }
}

impl<T> Default for NdjsonStdout<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Serialize + Send> Loader for NdjsonStdout<T> {
    type Item = T;

    async fn load(&self, items: Vec<Self::Item>) -> Result<usize> {
        let content = to_ndjson(&items)?;
        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(content.as_bytes())
            .context("Failed to write to stdout")?;
        stdout.flush()?;
        Ok(items.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DashboardTable;
    use serde_json::json;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_write() {
        let temp = NamedTempFile::new().unwrap();
        let writer = NdjsonWriter::new(temp.path());

        let data = vec![json!({"a": 1}), json!({"b": 2})];
        writer.write(&data).unwrap();

        let content = std::fs::read_to_string(temp.path()).unwrap();
        assert_eq!(content, "{\"a\":1}\n{\"b\":2}\n");

        let read_data = NdjsonReader::new(temp.path()).read().unwrap();
        assert_eq!(data, read_data);
    }

    #[test]
    fn test_empty_write_truncates() {
        let temp = NamedTempFile::new().unwrap();
        std::fs::write(temp.path(), "{\"old\":true}\n").unwrap();

        NdjsonWriter::<Value>::new(temp.path()).write(&[]).unwrap();
        assert_eq!(std::fs::read_to_string(temp.path()).unwrap(), "");
    }

    #[tokio::test]
    async fn test_load_models() {
        let temp = NamedTempFile::new().unwrap();
        let writer = NdjsonWriter::new(temp.path());

        let table = DashboardTable {
            dashboard_group_id: "P1".to_string(),
            dashboard_id: "Sales".to_string(),
            table_ids: vec!["warehouse://prod.public/orders".to_string()],
            product: "tableau".to_string(),
            cluster: "prod".to_string(),
        };

        let count = writer.load(vec![table]).await.unwrap();
        assert_eq!(count, 1);

        let data = NdjsonReader::new(temp.path()).read().unwrap();
        assert_eq!(data[0]["dashboard_id"], "Sales");
        assert_eq!(data[0]["table_ids"][0], "warehouse://prod.public/orders");
    }
}
