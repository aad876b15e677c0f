//! External tables
//!
//! "External" tables are not from a typical database: spreadsheets, text
//! files and SaaS connections. Tableau reports them as databases; for
//! spreadsheet-like sources the subsheets are the tables.
//!
//! A Google Sheet titled "Growth by Region & County" with subsheets
//! "FY19 Report" and "FY20 Report" becomes two tables:
//!
//! ```text
//! googlesheets://external.Growth_by_Region__County/FY19 Report
//! googlesheets://external.Growth_by_Region__County/FY20 Report
//! ```
//!
//! Text files get one table each, under the configured external schema.

use super::connection::ConnectionKind;
use super::graphql::{GraphQlExtractor, QueryMapper, Record, decode_shape, to_record};
use super::sanitize::{sanitize_database_name, sanitize_schema_name, sanitize_table_name};
use crate::config::TableauConfig;
use eyre::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const EXTERNAL_TABLE_QUERY: &str = r#"query externalTables($externalTableTypes: [String]) {
  databases (filter: {connectionTypeWithin: $externalTableTypes}) {
    name
    connectionType
    description
    tables {
      name
    }
  }
}"#;

#[derive(Debug, Clone, Deserialize)]
struct DatabasesResponse {
    databases: Vec<ExternalDatabase>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExternalDatabase {
    name: String,
    connection_type: String,
    #[serde(default)]
    description: Option<String>,
    tables: Vec<Subsheet>,
}

#[derive(Debug, Clone, Deserialize)]
struct Subsheet {
    name: String,
}

/// Record consumed by the `TableMetadata` model
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExternalTableRecord {
    pub cluster: String,
    pub database: String,
    pub schema: String,
    pub name: String,
    pub description: Option<String>,
}

/// Maps the `databases → tables` query into [`ExternalTableRecord`]s
#[derive(Debug, Clone)]
pub struct ExternalTableMapper {
    external_cluster_name: String,
    external_schema_name: String,
    external_table_types: Vec<String>,
}

impl ExternalTableMapper {
    pub fn new(
        external_cluster_name: impl Into<String>,
        external_schema_name: impl Into<String>,
        external_table_types: Vec<String>,
    ) -> Self {
        Self {
            external_cluster_name: external_cluster_name.into(),
            external_schema_name: external_schema_name.into(),
            external_table_types,
        }
    }

    fn map_database(&self, database: &ExternalDatabase) -> Vec<ExternalTableRecord> {
        let kind = ConnectionKind::classify(&database.connection_type);
        let record = |schema: String, name: &str| ExternalTableRecord {
            cluster: self.external_cluster_name.clone(),
            database: sanitize_database_name(kind.connection_type()),
            schema,
            name: sanitize_table_name(name),
            description: database.description.clone(),
        };

        match &kind {
            ConnectionKind::Sheet(_) => database
                .tables
                .iter()
                .map(|subsheet| record(sanitize_schema_name(&database.name), &subsheet.name))
                .collect(),
            ConnectionKind::FlatFile(_) => {
                vec![record(self.external_schema_name.clone(), &database.name)]
            }
        }
    }
}

impl QueryMapper for ExternalTableMapper {
    const NAME: &'static str = "external table";

    fn from_config(config: &TableauConfig) -> Result<Self> {
        Ok(Self::new(
            config.require_external_cluster_name()?,
            config.require_external_schema_name()?,
            config.external_table_types.clone(),
        ))
    }

    fn query(&self) -> &'static str {
        EXTERNAL_TABLE_QUERY
    }

    fn variables(&self) -> Option<Map<String, Value>> {
        let mut variables = Map::new();
        variables.insert(
            "externalTableTypes".to_string(),
            Value::from(self.external_table_types.clone()),
        );
        Some(variables)
    }

    fn map(&self, data: Value) -> Result<Vec<Record>> {
        let response: DatabasesResponse = decode_shape(data, "database")?;

        response
            .databases
            .iter()
            .flat_map(|database| self.map_database(database))
            .map(|record| to_record(&record))
            .collect()
    }
}

/// Extractor yielding one table metadata record per external table
pub type ExternalTableExtractor = GraphQlExtractor<ExternalTableMapper>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mapper() -> ExternalTableMapper {
        ExternalTableMapper::new(
            "external",
            "flat_files",
            vec!["excel-direct".to_string(), "textscan".to_string()],
        )
    }

    #[test]
    fn test_excel_subsheet() {
        let data = json!({
            "databases": [{
                "connectionType": "excel-direct",
                "name": "Budget.xlsx",
                "description": "d",
                "tables": [{"name": "Sheet1"}]
            }]
        });

        let records = mapper().map(data).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(
            Value::Object(records[0].clone()),
            json!({
                "cluster": "external",
                "database": "exceldirect",
                "schema": "Budget_xlsx",
                "name": "Sheet1",
                "description": "d"
            })
        );
    }

    #[test]
    fn test_subsheets_share_description() {
        let data = json!({
            "databases": [{
                "connectionType": "google-sheets",
                "name": "Growth by Region &amp; County",
                "description": "regional growth",
                "tables": [{"name": "FY19 Report"}, {"name": "FY20 Report"}]
            }]
        });

        let records = mapper().map(data).unwrap();
        assert_eq!(records.len(), 2);
        for record in &records {
            assert_eq!(record["database"], "googlesheets");
            assert_eq!(record["schema"], "Growth_by_Region__County");
            assert_eq!(record["description"], "regional growth");
        }
        assert_eq!(records[0]["name"], "FY19 Report");
        assert_eq!(records[1]["name"], "FY20 Report");
    }

    #[test]
    fn test_flat_file_uses_configured_schema() {
        let data = json!({
            "databases": [{
                "connectionType": "textscan",
                "name": "exports.csv",
                "description": "",
                "tables": [{"name": "exports#csv"}, {"name": "other"}]
            }]
        });

        let records = mapper().map(data).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["database"], "textscan");
        assert_eq!(records[0]["schema"], "flat_files");
        assert_eq!(records[0]["name"], "exports.csv");
    }

    #[test]
    fn test_null_description() {
        let data = json!({
            "databases": [{
                "connectionType": "textscan",
                "name": "exports.csv",
                "description": null,
                "tables": []
            }]
        });

        let records = mapper().map(data).unwrap();
        assert_eq!(records[0]["description"], Value::Null);
    }

    #[test]
    fn test_sheet_without_subsheets_emits_nothing() {
        let data = json!({
            "databases": [{
                "connectionType": "salesforce",
                "name": "CRM",
                "description": "",
                "tables": []
            }]
        });

        assert!(mapper().map(data).unwrap().is_empty());
    }

    #[test]
    fn test_query_variables() {
        let variables = mapper().variables().unwrap();
        assert_eq!(
            variables["externalTableTypes"],
            json!(["excel-direct", "textscan"])
        );
    }

    #[test]
    fn test_from_config_requires_external_schema() {
        let config = TableauConfig::new("tableau.example.com", "3.9", "", "bot", "secret")
            .with_external_cluster_name("external");
        let err = ExternalTableMapper::from_config(&config).unwrap_err();
        assert!(err.to_string().contains("external_schema_name"));
    }
}
