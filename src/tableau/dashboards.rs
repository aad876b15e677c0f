//! Dashboard metadata
//!
//! Workbooks map to dashboards, and the project holding a workbook is its
//! dashboard group.

use super::graphql::{ExcludedProjects, GraphQlExtractor, QueryMapper, Record, decode_shape, product_static_fields, to_record};
use super::sanitize::sanitize_workbook_name;
use crate::config::TableauConfig;
use eyre::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

pub const DASHBOARD_METADATA_QUERY: &str = r#"query {
  workbooks {
    id
    name
    createdAt
    description
    projectName
    projectVizportalUrlId
    vizportalUrlId
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
    created_at: String,
    #[serde(default)]
    description: Option<String>,
    project_name: String,
    project_vizportal_url_id: String,
    vizportal_url_id: String,
}

/// Record consumed by the `DashboardMetadata` model
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardMetadataRecord {
    pub dashboard_group: String,
    pub dashboard_name: String,
    pub description: String,
    pub created_timestamp: String,
    pub dashboard_group_url: String,
    pub dashboard_url: String,
    pub cluster: String,
}

#[derive(Debug, Clone)]
pub struct DashboardMetadataMapper {
    url: Url,
    cluster: String,
    excluded_projects: ExcludedProjects,
}

impl DashboardMetadataMapper {
    pub fn new(
        url: Url,
        cluster: impl Into<String>,
        excluded_projects: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            url,
            cluster: cluster.into(),
            excluded_projects: excluded_projects.into_iter().collect(),
        }
    }

    fn map_workbook(&self, workbook: Workbook) -> DashboardMetadataRecord {
        DashboardMetadataRecord {
            dashboard_group_url: format!(
                "{}#/projects/{}",
                self.url, workbook.project_vizportal_url_id
            ),
            dashboard_url: format!("{}#/workbooks/{}/views", self.url, workbook.vizportal_url_id),
            dashboard_group: workbook.project_name,
            dashboard_name: sanitize_workbook_name(&workbook.name),
            description: workbook.description.unwrap_or_default(),
            created_timestamp: workbook.created_at,
            cluster: self.cluster.clone(),
        }
    }
}

impl QueryMapper for DashboardMetadataMapper {
    const NAME: &'static str = "dashboard metadata";

    fn from_config(config: &TableauConfig) -> Result<Self> {
        Ok(Self::new(
            config.base_url()?,
            config.require_cluster()?,
            config.excluded_projects.iter().cloned(),
        ))
    }

    fn query(&self) -> &'static str {
        DASHBOARD_METADATA_QUERY
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
            .map(|workbook| to_record(&self.map_workbook(workbook)))
            .collect()
    }
}

/// Extractor yielding one dashboard metadata record per workbook
pub type DashboardMetadataExtractor = GraphQlExtractor<DashboardMetadataMapper>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mapper() -> DashboardMetadataMapper {
        let url = Url::parse("https://tableau.example.com").unwrap();
        DashboardMetadataMapper::new(url, "prod", vec!["Sandbox".to_string()])
    }

    #[test]
    fn test_map_workbook() {
        let data = json!({
            "workbooks": [{
                "id": "abc",
                "name": "Ops &amp; Finance",
                "createdAt": "2020-04-01T10:00:00Z",
                "description": "Monthly ops",
                "projectName": "Finance",
                "projectVizportalUrlId": "12",
                "vizportalUrlId": "345"
            }]
        });

        let records = mapper().map(data).unwrap();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record["dashboard_group"], "Finance");
        assert_eq!(record["dashboard_name"], "Ops  Finance");
        assert_eq!(record["description"], "Monthly ops");
        assert_eq!(record["created_timestamp"], "2020-04-01T10:00:00Z");
        assert_eq!(
            record["dashboard_group_url"],
            "https://tableau.example.com/#/projects/12"
        );
        assert_eq!(
            record["dashboard_url"],
            "https://tableau.example.com/#/workbooks/345/views"
        );
        assert_eq!(record["cluster"], "prod");
    }

    #[test]
    fn test_missing_description_is_empty() {
        let data = json!({
            "workbooks": [{
                "name": "Sales",
                "createdAt": "2020-04-01T10:00:00Z",
                "description": null,
                "projectName": "Finance",
                "projectVizportalUrlId": "12",
                "vizportalUrlId": "345"
            }, {
                "name": "Scratch",
                "createdAt": "2020-04-01T10:00:00Z",
                "projectName": "Sandbox",
                "projectVizportalUrlId": "1",
                "vizportalUrlId": "2"
            }]
        });

        let records = mapper().map(data).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["description"], "");
    }
}
