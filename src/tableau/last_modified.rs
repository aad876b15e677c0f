//! Dashboard last-modified timestamps

use super::graphql::{ExcludedProjects, GraphQlExtractor, QueryMapper, Record, decode_shape, product_static_fields, to_record};
use super::sanitize::sanitize_workbook_name;
use crate::config::TableauConfig;
use eyre::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const LAST_MODIFIED_QUERY: &str = r#"query {
  workbooks {
    id
    name
    projectName
    updatedAt
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
    updated_at: String,
}

/// Record consumed by the `DashboardLastModifiedTimestamp` model
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardLastModifiedRecord {
    pub dashboard_group_id: String,
    pub dashboard_id: String,
    pub last_modified_timestamp: String,
    pub cluster: String,
}

#[derive(Debug, Clone)]
pub struct DashboardLastModifiedMapper {
    cluster: String,
    excluded_projects: ExcludedProjects,
}

impl DashboardLastModifiedMapper {
    pub fn new(cluster: impl Into<String>, excluded_projects: impl IntoIterator<Item = String>) -> Self {
        Self {
            cluster: cluster.into(),
            excluded_projects: excluded_projects.into_iter().collect(),
        }
    }
}

impl QueryMapper for DashboardLastModifiedMapper {
    const NAME: &'static str = "dashboard last modified";

    fn from_config(config: &TableauConfig) -> Result<Self> {
        Ok(Self::new(
            config.require_cluster()?,
            config.excluded_projects.iter().cloned(),
        ))
    }

    fn query(&self) -> &'static str {
        LAST_MODIFIED_QUERY
    }

    fn default_static_fields() -> Record {
        product_static_fields()
    }

    fn map(&self, data: Value) -> Result<Vec<Record>> {
        let response: WorkbooksResponse = decode_shape(data, "workbook")?;

        response
            .workbooks
            .into_iter()
            .filter(|workbook| !self.excluded_projects.skips(&workbook.project_name, &workbook.name))
            .map(|workbook| {
                to_record(&DashboardLastModifiedRecord {
                    dashboard_id: sanitize_workbook_name(&workbook.name),
                    dashboard_group_id: workbook.project_name,
                    last_modified_timestamp: workbook.updated_at,
                    cluster: self.cluster.clone(),
                })
            })
            .collect()
    }
}

pub type DashboardLastModifiedExtractor = GraphQlExtractor<DashboardLastModifiedMapper>;
