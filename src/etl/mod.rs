//! Core ETL (Extract, Transform, Load) abstractions
//!
//! Extractors are pull-based: a host calls [`Extractor::extract`] until it
//! returns `None`. [`Pipeline`] does exactly that, feeding each item through
//! a [`Transformer`] before handing the batch to a [`Loader`].

mod extract;
mod load;
mod pipeline;
mod transform;

pub use extract::{Extractor, RecordCursor};
pub use load::Loader;
pub use pipeline::Pipeline;
pub use transform::{Chain, Transformer};
