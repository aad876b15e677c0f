//! Timestamp string → epoch seconds

use crate::config::DEFAULT_TIMESTAMP_FORMAT;
use crate::etl::Transformer;
use crate::tableau::Record;
use chrono::NaiveDateTime;
use eyre::{Context, Result};
use serde_json::Value;

/// Transformer that rewrites one string field as seconds since the Unix epoch
///
/// Timestamps are parsed with a `chrono` format string and read as UTC.
/// Records without the field pass through untouched.
///
/// # Example
/// ```
/// use tableau_metadata_extractor::etl::Transformer;
/// use tableau_metadata_extractor::transform::TimestampToEpoch;
/// use serde_json::json;
///
/// let transformer = TimestampToEpoch::new("created_timestamp");
/// let record = json!({"created_timestamp": "2020-01-01T00:00:00Z"});
///
/// let output = transformer.transform(record.as_object().unwrap().clone()).unwrap();
/// assert_eq!(output["created_timestamp"], 1577836800);
/// ```
#[derive(Debug, Clone)]
pub struct TimestampToEpoch {
    field: String,
    format: String,
}

impl TimestampToEpoch {
    /// Convert `field` using the Metadata API timestamp format
    pub fn new(field: impl Into<String>) -> Self {
        Self::with_format(field, DEFAULT_TIMESTAMP_FORMAT)
    }

    pub fn with_format(field: impl Into<String>, format: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            format: format.into(),
        }
    }
}

impl Transformer for TimestampToEpoch {
    type Input = Record;
    type Output = Record;

    fn transform(&self, mut input: Self::Input) -> Result<Self::Output> {
        let parsed = match input.get(&self.field) {
            Some(Value::String(raw)) => NaiveDateTime::parse_from_str(raw, &self.format)
                .with_context(|| {
                    format!(
                        "Failed to parse '{}' in field '{}' with format '{}'",
                        raw, self.field, self.format
                    )
                })?,
            _ => return Ok(input),
        };

        input.insert(self.field.clone(), Value::from(parsed.and_utc().timestamp()));
        Ok(input)
    }
}
