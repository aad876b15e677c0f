//! Pipeline orchestration for ETL operations

use super::{Extractor, Loader, Transformer};
use eyre::Result;

/// ETL Pipeline that drains an extractor, transforms each item and loads the batch
///
/// # Type Parameters
/// - `E`: Extractor type
/// - `T`: Transformer type (must transform from E::Item)
/// - `L`: Loader type (must load T::Output)
///
/// # Example
/// ```no_run
/// use tableau_metadata_extractor::client::TableauClient;
/// use tableau_metadata_extractor::config::TableauConfig;
/// use tableau_metadata_extractor::etl::Pipeline;
/// use tableau_metadata_extractor::model::DashboardTable;
/// use tableau_metadata_extractor::storage::NdjsonWriter;
/// use tableau_metadata_extractor::tableau::DashboardTableExtractor;
/// use tableau_metadata_extractor::transform::ModelConverter;
///
/// # async fn example() -> eyre::Result<()> {
/// let config = TableauConfig::read("tableau.yml")?;
/// let client = TableauClient::try_new(&config)?;
///
/// let mut pipeline = Pipeline::new(
///     DashboardTableExtractor::try_new(client, &config)?,
///     ModelConverter::<DashboardTable>::new(),
///     NdjsonWriter::new("dashboard_tables.ndjson"),
/// );
///
/// let count = pipeline.run().await?;
/// println!("Wrote {} dashboard tables", count);
/// # Ok(())
/// # }
/// ```
pub struct Pipeline<E, T, L> {
    extractor: E,
    transformer: T,
    loader: L,
}

impl<E, T, L> Pipeline<E, T, L>
where
    E: Extractor,
    T: Transformer<Input = E::Item>,
    L: Loader<Item = T::Output>,
{
    /// Create a new pipeline
    pub fn new(extractor: E, transformer: T, loader: L) -> Self {
        Self {
            extractor,
            transformer,
            loader,
        }
    }

    /// Run the complete ETL pipeline
    ///
    /// Steps:
    /// 1. Pull items from the extractor until it is exhausted
    /// 2. Transform each item as it arrives
    /// 3. Load the transformed items
    ///
    /// Returns the number of items successfully loaded
    ///
    /// # Errors
    /// Returns an error if any stage fails
    pub async fn run(&mut self) -> Result<usize> {
        log::info!("Starting ETL pipeline");

        log::debug!("Extracting from source...");
        let mut transformed = Vec::new();
        while let Some(item) = self.extractor.extract().await? {
            transformed.push(self.transformer.transform(item)?);
        }
        log::info!("Extracted and transformed {} items", transformed.len());

        // Empty batches are loaded too; file loaders truncate their output
        if transformed.is_empty() {
            log::warn!("No items extracted");
        }

        log::debug!("Loading to destination...");
        let count = self.loader.load(transformed).await?;
        log::info!("Loaded {} items", count);

        Ok(count)
    }

}
