//! Pull-based extraction over one Metadata API query
//!
//! A [`GraphQlExtractor`] sends its mapper's query once, on the first call
//! to [`Extractor::extract`], maps the response into records and then hands
//! them out one per call. Static fields are merged into every record on the
//! way out.

use crate::client::TableauClient;
use crate::config::TableauConfig;
use crate::error::TableauError;
use crate::etl::{Extractor, RecordCursor};
use eyre::Result;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::HashSet;

/// A plain key/value record handed to the host pipeline
pub type Record = Map<String, Value>;

/// Turns one query shape into records
///
/// Each implementation owns a query, the configuration it needs, and the
/// logic mapping the `data` object of the response into records.
pub trait QueryMapper: Send + Sync {
    /// Short name used in log messages
    const NAME: &'static str;

    /// Build the mapper, failing with a configuration error if a required setting is missing
    fn from_config(config: &TableauConfig) -> Result<Self>
    where
        Self: Sized;

    /// GraphQL query text
    fn query(&self) -> &'static str;

    /// Query variables, if the query declares any
    fn variables(&self) -> Option<Map<String, Value>> {
        None
    }

    /// Static fields used when the configuration does not set any
    fn default_static_fields() -> Record
    where
        Self: Sized,
    {
        Record::new()
    }

    /// Map the response `data` object into records, in response order
    fn map(&self, data: Value) -> Result<Vec<Record>>;
}

/// Static fields carried by every dashboard-centric extractor
pub fn product_static_fields() -> Record {
    let mut fields = Record::new();
    fields.insert("product".to_string(), Value::String("tableau".to_string()));
    fields
}

/// Projects whose workbooks are left out of every extraction
#[derive(Debug, Clone, Default)]
pub struct ExcludedProjects(HashSet<String>);

impl ExcludedProjects {
    /// Whether a workbook in `project` is skipped; skips are logged
    pub fn skips(&self, project: &str, workbook: &str) -> bool {
        let excluded = self.0.contains(project);
        if excluded {
            log::debug!(
                "Skipping workbook '{}' in excluded project '{}'",
                workbook,
                project
            );
        }
        excluded
    }
}

impl FromIterator<String> for ExcludedProjects {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Decode a response `data` object into a typed query shape
pub fn decode_shape<T: DeserializeOwned>(data: Value, shape: &str) -> Result<T> {
    serde_json::from_value(data).map_err(|e| {
        TableauError::Query(format!("unexpected {} response shape: {}", shape, e)).into()
    })
}

/// Convert a serializable record struct into a [`Record`]
pub fn to_record<T: Serialize>(value: &T) -> Result<Record> {
    match serde_json::to_value(value)? {
        Value::Object(record) => Ok(record),
        other => eyre::bail!("record must serialize to an object, got {}", other),
    }
}

/// Pull extractor over a single Metadata API query
pub struct GraphQlExtractor<M> {
    client: TableauClient,
    mapper: M,
    static_fields: Record,
    cursor: RecordCursor<Record>,
}

impl<M: QueryMapper> GraphQlExtractor<M> {
    /// Create an extractor from configuration
    ///
    /// # Errors
    /// Returns a [`TableauError::Configuration`] if a setting the mapper needs is missing.
    pub fn try_new(client: TableauClient, config: &TableauConfig) -> Result<Self> {
        let mapper = M::from_config(config)?;
        let static_fields = config
            .static_fields
            .clone()
            .unwrap_or_else(M::default_static_fields);
        Ok(Self::new(client, mapper, static_fields))
    }

    pub fn new(client: TableauClient, mapper: M, static_fields: Record) -> Self {
        Self {
            client,
            mapper,
            static_fields,
            cursor: RecordCursor::NotStarted,
        }
    }

    pub fn mapper(&self) -> &M {
        &self.mapper
    }

    pub fn static_fields(&self) -> &Record {
        &self.static_fields
    }

    /// Run the query and map the whole response, without static fields
    pub async fn execute(&self) -> Result<Vec<Record>> {
        let variables = self.mapper.variables();
        let data = self
            .client
            .execute_query(self.mapper.query(), variables.as_ref())
            .await?;
        let records = self.mapper.map(data)?;
        log::info!("Mapped {} {} record(s)", records.len(), M::NAME);
        Ok(records)
    }

    fn finish(&self, mut record: Record) -> Record {
        record.extend(self.static_fields.clone());
        record
    }
}

impl<M: QueryMapper> Extractor for GraphQlExtractor<M> {
    type Item = Record;

    /// Pull the next record. A failed query leaves the extractor exhausted.
    async fn extract(&mut self) -> Result<Option<Self::Item>> {
        if !self.cursor.is_started() {
            log::debug!("Starting {} extraction", M::NAME);
            match self.execute().await {
                Ok(records) => self.cursor.start(records),
                Err(e) => {
                    self.cursor = RecordCursor::Exhausted;
                    return Err(e);
                }
            }
        }

        Ok(self.cursor.advance().map(|record| self.finish(record)))
    }
}
