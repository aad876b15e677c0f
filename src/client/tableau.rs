//! Tableau Metadata API client
//!
//! Provides [`TableauClient`] for sending GraphQL queries to
//! `/api/metadata/graphql`. The client owns an [`AuthSession`] behind an
//! `Arc`, so clones share one sign-in.

use super::AuthSession;
use crate::config::TableauConfig;
use crate::error::TableauError;
use eyre::{Context, Result};
use reqwest::Client;
use serde_json::{Map, Value, json};
use std::sync::Arc;
use url::Url;

/// Header carrying the session token on Metadata API requests
pub const AUTH_HEADER: &str = "X-Tableau-Auth";

/// Tableau client for Metadata API requests.
///
/// # Example
/// ```no_run
/// use tableau_metadata_extractor::client::TableauClient;
/// use tableau_metadata_extractor::config::TableauConfig;
///
/// # async fn example() -> eyre::Result<()> {
/// let config = TableauConfig::new("tableau.example.com", "3.9", "analytics", "bot", "secret");
/// let client = TableauClient::try_new(&config)?;
///
/// let data = client
///     .execute_query("query { workbooks { name } }", None)
///     .await?;
/// println!("{}", data["workbooks"]);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct TableauClient {
    client: Client,
    url: Url,
    metadata_url: Url,
    session: Arc<AuthSession>,
}

impl TableauClient {
    /// Create a client from a validated configuration.
    ///
    /// Certificate verification is disabled: Tableau servers are commonly
    /// fronted by self-signed certificates.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The host is not a valid URL
    /// - The HTTP client cannot be built
    pub fn try_new(config: &TableauConfig) -> Result<Self> {
        let client = Client::builder()
            .danger_accept_invalid_certs(true)
            .build()
            .context("Failed to build HTTP client")?;
        let url = config.base_url()?;
        let session = AuthSession::try_new(
            client.clone(),
            &url,
            &config.api_version,
            config.credentials(),
        )?;
        Self::with_session(client, url, Arc::new(session))
    }

    /// Create a client that reuses an existing session
    pub fn with_session(client: Client, url: Url, session: Arc<AuthSession>) -> Result<Self> {
        let metadata_url = url
            .join("api/metadata/graphql")
            .map_err(|e| TableauError::Configuration(format!("Invalid metadata URL: {}", e)))?;

        Ok(Self {
            client,
            url,
            metadata_url,
            session,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn metadata_url(&self) -> &Url {
        &self.metadata_url
    }

    pub fn session(&self) -> &AuthSession {
        &self.session
    }

    /// Sign in (if not already) and return the site id.
    pub async fn test_connection(&self) -> Result<String> {
        self.session.token().await?;
        self.session
            .site_id()
            .map(String::from)
            .ok_or_else(|| TableauError::Authentication("no site id after sign-in".to_string()).into())
    }

    /// Send a GraphQL query and return the `data` object of the response.
    ///
    /// # Arguments
    /// * `query` - GraphQL query text
    /// * `variables` - Optional query variables
    ///
    /// # Errors
    /// Returns [`TableauError::Authentication`] if sign-in fails, and
    /// [`TableauError::Query`] if the request fails or the response has no `data`.
    pub async fn execute_query(
        &self,
        query: &str,
        variables: Option<&Map<String, Value>>,
    ) -> Result<Value> {
        let token = self.session.token().await?;

        let mut payload = json!({ "query": query });
        if let Some(variables) = variables {
            payload["variables"] = Value::Object(variables.clone());
        }

        log::debug!("Querying {}", self.metadata_url);
        log::trace!("Query payload: {}", payload);

        let response = self
            .client
            .post(self.metadata_url.clone())
            .header(AUTH_HEADER, token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| TableauError::Query(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TableauError::Query(format!("server returned {}: {}", status, body)).into());
        }

        let mut body: Value = response
            .json()
            .await
            .map_err(|e| TableauError::Query(format!("failed to parse response: {}", e)))?;

        match body.get_mut("data").map(Value::take) {
            Some(data) if !data.is_null() => Ok(data),
            _ => {
                let errors = body
                    .get("errors")
                    .map(|e| e.to_string())
                    .unwrap_or_else(|| "no errors reported".to_string());
                Err(TableauError::Query(format!("response has no data: {}", errors)).into())
            }
        }
    }
}

impl std::fmt::Display for TableauClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.url)
    }
}
