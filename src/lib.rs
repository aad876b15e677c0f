//! Tableau Metadata Extractor
//!
//! Pulls dashboard, table and query metadata out of the Tableau Metadata
//! API (GraphQL) and emits flat records for a metadata catalog.

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod etl;
pub mod model;
pub mod storage;
pub mod tableau;
pub mod transform;

// Re-exports for convenience
pub use client::{AuthSession, TableauClient};
pub use config::TableauConfig;
pub use error::{TableauError, find_tableau_error};
pub use etl::{Extractor, Loader, Pipeline, Transformer};
pub use storage::{NdjsonReader, NdjsonStdout, NdjsonWriter};
