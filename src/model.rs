//! Downstream metadata models
//!
//! Typed forms of the records emitted by the extractors. Fields are matched
//! by name, so a record converts into its model with
//! [`ModelConverter`](crate::transform::ModelConverter).

use crate::tableau::TableIdentifier;
use serde::{Deserialize, Serialize};

fn default_cluster() -> String {
    "gold".to_string()
}

/// Link between a dashboard and the tables it reads
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DashboardTable {
    pub dashboard_group_id: String,
    pub dashboard_id: String,
    pub table_ids: Vec<String>,
    #[serde(default)]
    pub product: String,
    #[serde(default = "default_cluster")]
    pub cluster: String,
}

impl DashboardTable {
    /// `{product}_dashboard://{cluster}.{group}/{dashboard}`
    pub fn dashboard_key(&self) -> String {
        format!(
            "{}_dashboard://{}.{}/{}",
            self.product, self.cluster, self.dashboard_group_id, self.dashboard_id
        )
    }
}

/// A table, here used for file and connection-backed tables
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TableMetadata {
    pub database: String,
    pub cluster: String,
    pub schema: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_view: bool,
}

impl TableMetadata {
    pub fn identifier(&self) -> TableIdentifier {
        TableIdentifier::new(
            self.database.as_str(),
            self.cluster.as_str(),
            self.schema.as_str(),
            self.name.as_str(),
        )
    }

    /// Same key format dashboards use in `table_ids`
    pub fn key(&self) -> String {
        self.identifier().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DashboardMetadata {
    pub dashboard_group: String,
    pub dashboard_name: String,
    #[serde(default)]
    pub description: String,
    /// Seconds since the Unix epoch
    pub created_timestamp: i64,
    pub dashboard_group_url: String,
    pub dashboard_url: String,
    #[serde(default)]
    pub product: String,
    #[serde(default = "default_cluster")]
    pub cluster: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DashboardLastModifiedTimestamp {
    pub dashboard_group_id: String,
    pub dashboard_id: String,
    /// Seconds since the Unix epoch
    pub last_modified_timestamp: i64,
    #[serde(default)]
    pub product: String,
    #[serde(default = "default_cluster")]
    pub cluster: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DashboardQuery {
    pub dashboard_group_id: String,
    pub dashboard_id: String,
    pub query_name: String,
    pub query_id: String,
    pub query_text: String,
    #[serde(default)]
    pub product: String,
    #[serde(default = "default_cluster")]
    pub cluster: String,
}
