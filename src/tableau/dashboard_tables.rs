//! Dashboard → table links
//!
//! Maps each workbook to the tables it reads from. Upstream tables that
//! carry a schema are treated as living in the configured warehouse
//! database; tables without one come from files or SaaS connections and get
//! a key built from their connection type and parent document name.

use super::graphql::{ExcludedProjects, GraphQlExtractor, QueryMapper, Record, decode_shape, product_static_fields, to_record};
use super::identifier::TableIdentifier;
use super::sanitize::{html_escape, sanitize_database_name, sanitize_schema_name, sanitize_table_name};
use crate::config::TableauConfig;
use eyre::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DASHBOARD_TABLE_QUERY: &str = r#"query {
  workbooks {
    name
    projectName
    upstreamTables {
      name
      schema
      database {
        name
        connectionType
      }
    }
  }
}"#;

#[derive(Debug, Clone, Deserialize)]
struct WorkbooksResponse {
    workbooks: Vec<Workbook>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Workbook {
    name: String,
    project_name: String,
    upstream_tables: Vec<UpstreamTable>,
}

#[derive(Debug, Clone, Deserialize)]
struct UpstreamTable {
    name: String,
    schema: String,
    database: UpstreamDatabase,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpstreamDatabase {
    name: String,
    connection_type: String,
}

/// Record consumed by the `DashboardTable` model
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardTableRecord {
    pub dashboard_group_id: String,
    pub dashboard_id: String,
    pub cluster: String,
    pub table_ids: Vec<String>,
}

/// Maps the `workbooks → upstreamTables` query into [`DashboardTableRecord`]s
#[derive(Debug, Clone)]
pub struct DashboardTableMapper {
    cluster: String,
    database: String,
    external_cluster_name: String,
    excluded_projects: ExcludedProjects,
}

impl DashboardTableMapper {
    pub fn new(
        cluster: impl Into<String>,
        database: impl Into<String>,
        external_cluster_name: impl Into<String>,
        excluded_projects: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            cluster: cluster.into(),
            database: database.into(),
            external_cluster_name: external_cluster_name.into(),
            excluded_projects: excluded_projects.into_iter().collect(),
        }
    }

    /// Build the key for one upstream table
    ///
    /// Database-backed tables are only HTML-escaped; bracket and escape
    /// sequence stripping applies to file/connection-backed tables alone.
    fn table_identifier(&self, table: &UpstreamTable) -> TableIdentifier {
        if !table.schema.is_empty() {
            let (schema, name) = match table.name.split_once('.') {
                Some((schema, name)) => (schema, name),
                None => (table.schema.as_str(), table.name.as_str()),
            };
            TableIdentifier::new(
                self.database.as_str(),
                self.cluster.as_str(),
                html_escape(schema),
                html_escape(name),
            )
        } else {
            TableIdentifier::new(
                sanitize_database_name(&html_escape(&table.database.connection_type)),
                self.external_cluster_name.as_str(),
                sanitize_schema_name(&html_escape(&table.database.name)),
                sanitize_table_name(&html_escape(&table.name)),
            )
        }
    }

    fn map_workbook(&self, workbook: &Workbook) -> DashboardTableRecord {
        DashboardTableRecord {
            dashboard_group_id: workbook.project_name.clone(),
            dashboard_id: html_escape(&workbook.name),
            cluster: self.cluster.clone(),
            table_ids: workbook
                .upstream_tables
                .iter()
                .map(|table| self.table_identifier(table).to_string())
                .collect(),
        }
    }
}

impl QueryMapper for DashboardTableMapper {
    const NAME: &'static str = "dashboard table";

    fn from_config(config: &TableauConfig) -> Result<Self> {
        Ok(Self::new(
            config.require_cluster()?,
            config.require_database()?,
            config.require_external_cluster_name()?,
            config.excluded_projects.iter().cloned(),
        ))
    }

    fn query(&self) -> &'static str {
        DASHBOARD_TABLE_QUERY
    }

    fn default_static_fields() -> Record {
        product_static_fields()
    }

    fn map(&self, data: Value) -> Result<Vec<Record>> {
        let response: WorkbooksResponse = decode_shape(data, "workbook")?;

        response
            .workbooks
            .iter()
            .filter(|workbook| !self.excluded_projects.skips(&workbook.project_name, &workbook.name))
            .map(|workbook| to_record(&self.map_workbook(workbook)))
            .collect()
    }
}

/// Extractor yielding one dashboard table record per workbook
pub type DashboardTableExtractor = GraphQlExtractor<DashboardTableMapper>;
