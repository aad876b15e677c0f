//! Record → model conversion
//!
//! Builds a typed model from a flat record by matching field names.

use crate::etl::Transformer;
use crate::tableau::Record;
use eyre::{Context, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::marker::PhantomData;

/// Transformer that converts a [`Record`] into the model `T`
///
/// # Example
/// ```
/// use tableau_metadata_extractor::etl::Transformer;
/// use tableau_metadata_extractor::model::TableMetadata;
/// use tableau_metadata_extractor::transform::ModelConverter;
/// use serde_json::json;
///
/// let record = json!({
///     "cluster": "external",
///     "database": "exceldirect",
///     "schema": "Budget_xlsx",
///     "name": "Sheet1",
///     "description": "d"
/// });
///
/// let converter = ModelConverter::<TableMetadata>::new();
/// let table = converter.transform(record.as_object().unwrap().clone()).unwrap();
/// assert_eq!(table.key(), "exceldirect://external.Budget_xlsx/Sheet1");
/// ```
pub struct ModelConverter<T> {
    _model: PhantomData<fn() -> T>,
}

impl<T> ModelConverter<T> {
    pub fn new() -> Self {
        Self {
            _model: PhantomData,
        }
    }
}

impl<T> Default for ModelConverter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for ModelConverter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ModelConverter<{}>", std::any::type_name::<T>())
    }
}

impl<T: DeserializeOwned + Send> Transformer for ModelConverter<T> {
    type Input = Record;
    type Output = T;

    fn transform(&self, input: Self::Input) -> Result<Self::Output> {
        serde_json::from_value(Value::Object(input)).with_context(|| {
            format!(
                "Failed to build {} from record",
                std::any::type_name::<T>()
            )
        })
    }
}
