//! Custom SQL queries used by dashboards
//!
//! Tableau calls these "custom SQL tables". One record is emitted for every
//! workbook downstream of a query, so a shared query appears once per
//! dashboard.

use super::graphql::{ExcludedProjects, GraphQlExtractor, QueryMapper, Record, decode_shape, product_static_fields, to_record};
use super::sanitize::sanitize_workbook_name;
use crate::config::TableauConfig;
use eyre::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const CUSTOM_SQL_QUERY: &str = r#"query {
  customSQLTables {
    id
    name
    query
    downstreamWorkbooks {
      name
      projectName
    }
  }
}"#;

#[derive(Debug, Clone, Deserialize)]
struct CustomSqlResponse {
    #[serde(rename = "customSQLTables")]
    custom_sql_tables: Vec<CustomSqlTable>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CustomSqlTable {
    id: String,
    name: String,
    query: String,
    downstream_workbooks: Vec<DownstreamWorkbook>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DownstreamWorkbook {
    name: String,
    project_name: String,
}

/// Record consumed by the `DashboardQuery` model
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardQueryRecord {
    pub dashboard_group_id: String,
    pub dashboard_id: String,
    pub query_name: String,
    pub query_id: String,
    pub query_text: String,
    pub cluster: String,
}

#[derive(Debug, Clone)]
pub struct DashboardQueryMapper {
    cluster: String,
    excluded_projects: ExcludedProjects,
}

impl DashboardQueryMapper {
    pub fn new(cluster: impl Into<String>, excluded_projects: impl IntoIterator<Item = String>) -> Self {
        Self {
            cluster: cluster.into(),
            excluded_projects: excluded_projects.into_iter().collect(),
        }
    }

    fn map_table(&self, table: &CustomSqlTable) -> Vec<DashboardQueryRecord> {
        table
            .downstream_workbooks
            .iter()
            .filter(|workbook| !self.excluded_projects.skips(&workbook.project_name, &workbook.name))
            .map(|workbook| DashboardQueryRecord {
                dashboard_group_id: workbook.project_name.clone(),
                dashboard_id: sanitize_workbook_name(&workbook.name),
                query_name: table.name.clone(),
                query_id: table.id.clone(),
                query_text: table.query.clone(),
                cluster: self.cluster.clone(),
            })
            .collect()
    }
}

impl QueryMapper for DashboardQueryMapper {
    const NAME: &'static str = "dashboard query";

    fn from_config(config: &TableauConfig) -> Result<Self> {
        Ok(Self::new(
            config.require_cluster()?,
            config.excluded_projects.iter().cloned(),
        ))
    }

    fn query(&self) -> &'static str {
        CUSTOM_SQL_QUERY
    }

    fn default_static_fields() -> Record {
        product_static_fields()
    }

    fn map(&self, data: Value) -> Result<Vec<Record>> {
        let response: CustomSqlResponse = decode_shape(data, "custom SQL")?;

        response
            .custom_sql_tables
            .iter()
            .flat_map(|table| self.map_table(table))
            .map(|record| to_record(&record))
            .collect()
    }
}

pub type DashboardQueryExtractor = GraphQlExtractor<DashboardQueryMapper>;
