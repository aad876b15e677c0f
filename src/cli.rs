//! CLI helper functions
//!
//! Each command builds one pipeline:
//! extractor → transformers → NDJSON file (or stdout when no output is given).

use crate::{
    client::TableauClient,
    config::TableauConfig,
    etl::{Extractor, Pipeline, Transformer},
    model::{DashboardLastModifiedTimestamp, DashboardMetadata, DashboardQuery, DashboardTable, TableMetadata},
    storage::{NdjsonStdout, NdjsonWriter},
    tableau::{
        DashboardLastModifiedExtractor, DashboardMetadataExtractor, DashboardQueryExtractor,
        DashboardTableExtractor, ExternalTableExtractor,
    },
    transform::{ModelConverter, TimestampToEpoch},
};
use eyre::{Context, Result};
use serde::Serialize;
use std::path::Path;

/// Load configuration from a YAML file, or from `TABLEAU_*` environment variables
/// when no file is given
pub fn load_config(path: Option<&Path>) -> Result<TableauConfig> {
    match path {
        Some(path) => TableauConfig::read(path),
        None => TableauConfig::from_env().context("Failed to load configuration from environment"),
    }
}

/// Build a client for the configured server
pub fn load_tableau_client(config: &TableauConfig) -> Result<TableauClient> {
    let client = TableauClient::try_new(config).context("Failed to create Tableau client")?;
    log::debug!("Using {}", client);
    Ok(client)
}

async fn run_to_output<E, T>(extractor: E, transformer: T, output: Option<&Path>) -> Result<usize>
where
    E: Extractor,
    T: Transformer<Input = E::Item>,
    T::Output: Serialize,
{
    match output {
        Some(path) => {
            let count = Pipeline::new(extractor, transformer, NdjsonWriter::<T::Output>::new(path))
                .run()
                .await?;
            log::info!("✓ Wrote {} record(s) to {}", count, path.display());
            Ok(count)
        }
        None => {
            Pipeline::new(extractor, transformer, NdjsonStdout::<T::Output>::new())
                .run()
                .await
        }
    }
}

/// Sign in and return the site id
pub async fn test_auth(config: &TableauConfig) -> Result<String> {
    let client = load_tableau_client(config)?;
    log::info!("Signing in to {}", client.url());
    client.test_connection().await
}

/// Dashboard → upstream table links
///
/// Pipeline: DashboardTableExtractor → ModelConverter<DashboardTable> → NDJSON
pub async fn extract_dashboard_tables(config: &TableauConfig, output: Option<&Path>) -> Result<usize> {
    let client = load_tableau_client(config)?;
    let extractor = DashboardTableExtractor::try_new(client, config)?;
    run_to_output(extractor, ModelConverter::<DashboardTable>::new(), output).await
}

/// Tables backed by files and cloud connections
///
/// Pipeline: ExternalTableExtractor → ModelConverter<TableMetadata> → NDJSON
pub async fn extract_external_tables(config: &TableauConfig, output: Option<&Path>) -> Result<usize> {
    let client = load_tableau_client(config)?;
    let extractor = ExternalTableExtractor::try_new(client, config)?;
    run_to_output(extractor, ModelConverter::<TableMetadata>::new(), output).await
}

/// Dashboard names, descriptions and URLs
///
/// Pipeline: DashboardMetadataExtractor → TimestampToEpoch → ModelConverter<DashboardMetadata> → NDJSON
pub async fn extract_dashboards(config: &TableauConfig, output: Option<&Path>) -> Result<usize> {
    let client = load_tableau_client(config)?;
    let extractor = DashboardMetadataExtractor::try_new(client, config)?;
    let transformer = TimestampToEpoch::with_format("created_timestamp", &config.timestamp_format)
        .then(ModelConverter::<DashboardMetadata>::new());
    run_to_output(extractor, transformer, output).await
}

/// Last modification time per dashboard
///
/// Pipeline: DashboardLastModifiedExtractor → TimestampToEpoch → ModelConverter<DashboardLastModifiedTimestamp> → NDJSON
pub async fn extract_last_modified(config: &TableauConfig, output: Option<&Path>) -> Result<usize> {
    let client = load_tableau_client(config)?;
    let extractor = DashboardLastModifiedExtractor::try_new(client, config)?;
    let transformer =
        TimestampToEpoch::with_format("last_modified_timestamp", &config.timestamp_format)
            .then(ModelConverter::<DashboardLastModifiedTimestamp>::new());
    run_to_output(extractor, transformer, output).await
}

/// Custom SQL queries per dashboard
///
/// Pipeline: DashboardQueryExtractor → ModelConverter<DashboardQuery> → NDJSON
pub async fn extract_queries(config: &TableauConfig, output: Option<&Path>) -> Result<usize> {
    let client = load_tableau_client(config)?;
    let extractor = DashboardQueryExtractor::try_new(client, config)?;
    run_to_output(extractor, ModelConverter::<DashboardQuery>::new(), output).await
}
