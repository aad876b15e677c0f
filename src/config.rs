//! Extractor configuration
//!
//! [`TableauConfig`] is the resolved configuration consumed by every
//! extractor. It can be read from a YAML file or assembled from `TABLEAU_*`
//! environment variables, and is validated as soon as it is loaded.
//!
//! ```yaml
//! host: tableau.example.com
//! api_version: "3.9"
//! site_name: analytics
//! access_token_name: metadata-bot
//! access_token_secret: s3cr3t
//! cluster: prod
//! database: warehouse
//! external_cluster_name: external
//! external_schema_name: flat_files
//! excluded_projects: [Sandbox]
//! ```

use crate::error::TableauError;
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;
use url::Url;

/// Connection types requested by the external-table query when none are configured
pub const DEFAULT_EXTERNAL_TABLE_TYPES: [&str; 4] =
    ["excel-direct", "google-sheets", "salesforce", "textscan"];

/// Format of the timestamps returned by the Metadata API
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

fn default_external_table_types() -> Vec<String> {
    DEFAULT_EXTERNAL_TABLE_TYPES
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_timestamp_format() -> String {
    DEFAULT_TIMESTAMP_FORMAT.to_string()
}

/// Printed in place of access token secrets
const REDACTED: &str = "<redacted>";

/// Personal access token credentials for one Tableau site
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub site_name: String,
    pub access_token_name: String,
    pub access_token_secret: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("site_name", &self.site_name)
            .field("access_token_name", &self.access_token_name)
            .field("access_token_secret", &REDACTED)
            .finish()
    }
}

/// Resolved extractor configuration
#[derive(Clone, PartialEq, Deserialize, Serialize)]
pub struct TableauConfig {
    /// Tableau server host, e.g. `tableau.example.com`
    pub host: String,
    /// REST API version used for sign-in, e.g. `3.9`
    pub api_version: String,
    /// Site content URL; empty for the default site
    pub site_name: String,
    pub access_token_name: String,
    pub access_token_secret: String,

    /// Cluster assigned to dashboards and database-backed tables
    #[serde(default)]
    pub cluster: Option<String>,
    /// Database assigned to database-backed upstream tables
    #[serde(default)]
    pub database: Option<String>,
    /// Cluster assigned to file/connection-backed tables
    #[serde(default)]
    pub external_cluster_name: Option<String>,
    /// Schema assigned to flat-file tables
    #[serde(default)]
    pub external_schema_name: Option<String>,

    #[serde(default)]
    pub excluded_projects: Vec<String>,
    #[serde(default = "default_external_table_types")]
    pub external_table_types: Vec<String>,

    /// Fields merged into every emitted record; extractor defaults apply when unset
    #[serde(default)]
    pub static_fields: Option<Map<String, Value>>,

    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
}

impl std::fmt::Debug for TableauConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableauConfig")
            .field("host", &self.host)
            .field("api_version", &self.api_version)
            .field("site_name", &self.site_name)
            .field("access_token_name", &self.access_token_name)
            .field("access_token_secret", &REDACTED)
            .field("cluster", &self.cluster)
            .field("database", &self.database)
            .field("external_cluster_name", &self.external_cluster_name)
            .field("external_schema_name", &self.external_schema_name)
            .field("excluded_projects", &self.excluded_projects)
            .field("external_table_types", &self.external_table_types)
            .field("static_fields", &self.static_fields)
            .field("timestamp_format", &self.timestamp_format)
            .finish()
    }
}

impl TableauConfig {
    /// Create a configuration with the required connection settings only
    pub fn new(
        host: impl Into<String>,
        api_version: impl Into<String>,
        site_name: impl Into<String>,
        access_token_name: impl Into<String>,
        access_token_secret: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            api_version: api_version.into(),
            site_name: site_name.into(),
            access_token_name: access_token_name.into(),
            access_token_secret: access_token_secret.into(),
            cluster: None,
            database: None,
            external_cluster_name: None,
            external_schema_name: None,
            excluded_projects: Vec::new(),
            external_table_types: default_external_table_types(),
            static_fields: None,
            timestamp_format: default_timestamp_format(),
        }
    }

    pub fn with_cluster(mut self, cluster: impl Into<String>) -> Self {
        self.cluster = Some(cluster.into());
        self
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    pub fn with_external_cluster_name(mut self, name: impl Into<String>) -> Self {
        self.external_cluster_name = Some(name.into());
        self
    }

    pub fn with_external_schema_name(mut self, name: impl Into<String>) -> Self {
        self.external_schema_name = Some(name.into());
        self
    }

    pub fn with_excluded_projects(mut self, projects: Vec<String>) -> Self {
        self.excluded_projects = projects;
        self
    }

    pub fn with_static_fields(mut self, fields: Map<String, Value>) -> Self {
        self.static_fields = Some(fields);
        self
    }

    /// Read and validate a YAML configuration file
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Loading configuration from {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: TableauConfig = serde_yaml::from_str(&content).map_err(|e| {
            TableauError::Configuration(format!("Invalid config {}: {}", path.display(), e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Build and validate a configuration from environment variables
    ///
    /// Required:
    /// - TABLEAU_HOST
    /// - TABLEAU_API_VERSION
    /// - TABLEAU_SITE_NAME (may be empty for the default site)
    /// - TABLEAU_ACCESS_TOKEN_NAME
    /// - TABLEAU_ACCESS_TOKEN_SECRET
    ///
    /// Optional: TABLEAU_CLUSTER, TABLEAU_DATABASE, TABLEAU_EXTERNAL_CLUSTER_NAME,
    /// TABLEAU_EXTERNAL_SCHEMA_NAME, TABLEAU_EXCLUDED_PROJECTS and
    /// TABLEAU_EXTERNAL_TABLE_TYPES (both comma-separated), TABLEAU_TIMESTAMP_FORMAT
    pub fn from_env() -> Result<Self> {
        let required = |key: &str| {
            std::env::var(key).map_err(|_| {
                TableauError::Configuration(format!("{} environment variable not set", key))
            })
        };
        let optional = |key: &str| std::env::var(key).ok().filter(|v| !v.is_empty());
        let list = |value: String| {
            value
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect::<Vec<_>>()
        };

        let mut config = Self::new(
            required("TABLEAU_HOST")?,
            required("TABLEAU_API_VERSION")?,
            required("TABLEAU_SITE_NAME")?,
            required("TABLEAU_ACCESS_TOKEN_NAME")?,
            required("TABLEAU_ACCESS_TOKEN_SECRET")?,
        );
        config.cluster = optional("TABLEAU_CLUSTER");
        config.database = optional("TABLEAU_DATABASE");
        config.external_cluster_name = optional("TABLEAU_EXTERNAL_CLUSTER_NAME");
        config.external_schema_name = optional("TABLEAU_EXTERNAL_SCHEMA_NAME");
        if let Some(projects) = optional("TABLEAU_EXCLUDED_PROJECTS") {
            config.excluded_projects = list(projects);
        }
        if let Some(types) = optional("TABLEAU_EXTERNAL_TABLE_TYPES") {
            config.external_table_types = list(types);
        }
        if let Some(format) = optional("TABLEAU_TIMESTAMP_FORMAT") {
            config.timestamp_format = format;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check the connection settings every extractor needs
    pub fn validate(&self) -> Result<()> {
        let checks = [
            ("host", &self.host),
            ("api_version", &self.api_version),
            ("access_token_name", &self.access_token_name),
            ("access_token_secret", &self.access_token_secret),
        ];
        for (key, value) in checks {
            if value.trim().is_empty() {
                return Err(TableauError::Configuration(format!("'{}' must not be empty", key)).into());
            }
        }
        self.base_url()?;
        Ok(())
    }

    /// Base URL of the Tableau server
    ///
    /// A bare host is served over HTTPS; a host that already carries a scheme is used as-is.
    pub fn base_url(&self) -> Result<Url> {
        let raw = if self.host.starts_with("http://") || self.host.starts_with("https://") {
            self.host.clone()
        } else {
            format!("https://{}", self.host)
        };
        Url::parse(&raw).map_err(|e| {
            TableauError::Configuration(format!("Invalid host '{}': {}", self.host, e)).into()
        })
    }

    pub fn credentials(&self) -> Credentials {
        Credentials {
            site_name: self.site_name.clone(),
            access_token_name: self.access_token_name.clone(),
            access_token_secret: self.access_token_secret.clone(),
        }
    }

    pub fn require_cluster(&self) -> Result<&str> {
        require("cluster", self.cluster.as_deref())
    }

    pub fn require_database(&self) -> Result<&str> {
        require("database", self.database.as_deref())
    }

    pub fn require_external_cluster_name(&self) -> Result<&str> {
        require("external_cluster_name", self.external_cluster_name.as_deref())
    }

    pub fn require_external_schema_name(&self) -> Result<&str> {
        require("external_schema_name", self.external_schema_name.as_deref())
    }
}

fn require<'a>(key: &str, value: Option<&'a str>) -> Result<&'a str> {
    value.ok_or_else(|| {
        TableauError::Configuration(format!("required setting '{}' is missing", key)).into()
    })
}
