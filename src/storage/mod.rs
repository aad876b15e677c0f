//! File system storage operations
//!
//! Extraction output is written as NDJSON, to a file or to stdout.

mod ndjson;

pub use ndjson::{NdjsonReader, NdjsonStdout, NdjsonWriter};
