//! Extractor trait for pulling records from a source

use eyre::Result;

/// Extractor trait for pulling items from a source one at a time
///
/// `extract` returns `Ok(None)` once the source is exhausted, and keeps
/// returning `Ok(None)` on every later call.
///
/// # Example
/// ```no_run
/// use tableau_metadata_extractor::etl::Extractor;
/// use eyre::Result;
///
/// struct Countdown {
///     remaining: u32,
/// }
///
/// impl Extractor for Countdown {
///     type Item = u32;
///
///     async fn extract(&mut self) -> Result<Option<Self::Item>> {
///         if self.remaining == 0 {
///             return Ok(None);
///         }
///         self.remaining -= 1;
///         Ok(Some(self.remaining))
///     }
/// }
/// ```
pub trait Extractor: Send {
    /// The type of items extracted
    type Item: Send;

    /// Pull the next item from the source
    ///
    /// # Errors
    /// Returns an error if extraction fails (network, authentication, parsing, etc.)
    fn extract(&mut self) -> impl std::future::Future<Output = Result<Option<Self::Item>>> + Send;
}

/// Lazily started record stream
///
/// Holds the state of a pull-based extraction: nothing has been fetched
/// yet, records are being handed out, or the source is drained.
#[derive(Debug)]
pub enum RecordCursor<T> {
    NotStarted,
    InProgress(std::vec::IntoIter<T>),
    Exhausted,
}

impl<T> Default for RecordCursor<T> {
    fn default() -> Self {
        Self::NotStarted
    }
}

impl<T> RecordCursor<T> {
    pub fn is_started(&self) -> bool {
        !matches!(self, Self::NotStarted)
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted)
    }

    /// Begin handing out `records`
    pub fn start(&mut self, records: Vec<T>) {
        *self = Self::InProgress(records.into_iter());
    }

    /// Advance by one record; moves to `Exhausted` when the records run out
    pub fn advance(&mut self) -> Option<T> {
        match self {
            Self::InProgress(records) => match records.next() {
                Some(record) => Some(record),
                None => {
                    *self = Self::Exhausted;
                    None
                }
            },
            Self::NotStarted | Self::Exhausted => None,
        }
    }
}
