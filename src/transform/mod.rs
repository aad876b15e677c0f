//! Transformers applied to extracted records
//!
//! Records leave the extractors as flat key/value maps. These transformers
//! normalize fields and build the typed models from [`crate::model`].

mod model_converter;
mod timestamp;

pub use model_converter::ModelConverter;
pub use timestamp::TimestampToEpoch;
