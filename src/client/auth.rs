//! Personal access token sign-in
//!
//! Exchanges PAT credentials for a session token via
//! `POST /api/{api_version}/auth/signin`. The token is fetched on first use
//! and kept for the lifetime of the session; there is no refresh.

use crate::config::Credentials;
use crate::error::TableauError;
use eyre::Result;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::OnceCell;
use url::Url;

#[derive(Debug, Clone, Deserialize)]
struct SignInResponse {
    credentials: SignInCredentials,
}

#[derive(Clone, Deserialize)]
struct SignInCredentials {
    token: String,
    site: SignInSite,
}

impl std::fmt::Debug for SignInCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignInCredentials")
            .field("token", &"<redacted>")
            .field("site", &self.site)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
struct SignInSite {
    id: String,
}

/// Lazily authenticated Tableau session
#[derive(Debug)]
pub struct AuthSession {
    client: Client,
    signin_url: Url,
    credentials: Credentials,
    signed_in: OnceCell<SignInCredentials>,
}

impl AuthSession {
    /// Create a session; no request is made until [`AuthSession::token`] is called
    pub fn try_new(
        client: Client,
        base_url: &Url,
        api_version: &str,
        credentials: Credentials,
    ) -> Result<Self> {
        let signin_url = base_url
            .join(&format!("api/{}/auth/signin", api_version))
            .map_err(|e| TableauError::Configuration(format!("Invalid sign-in URL: {}", e)))?;

        Ok(Self {
            client,
            signin_url,
            credentials,
            signed_in: OnceCell::new(),
        })
    }

    pub fn signin_url(&self) -> &Url {
        &self.signin_url
    }

    /// Session token, signing in on first call
    pub async fn token(&self) -> Result<&str> {
        let signed_in = self
            .signed_in
            .get_or_try_init(|| self.sign_in())
            .await?;
        Ok(&signed_in.token)
    }

    /// Site id returned by sign-in, if the session has signed in
    pub fn site_id(&self) -> Option<&str> {
        self.signed_in.get().map(|c| c.site.id.as_str())
    }

    pub fn is_signed_in(&self) -> bool {
        self.signed_in.initialized()
    }

    async fn sign_in(&self) -> Result<SignInCredentials> {
        log::debug!(
            "Signing in to {} as '{}'",
            self.signin_url,
            self.credentials.access_token_name
        );

        let payload = json!({
            "credentials": {
                "personalAccessTokenName": self.credentials.access_token_name,
                "personalAccessTokenSecret": self.credentials.access_token_secret,
                "site": {
                    "contentUrl": self.credentials.site_name
                }
            }
        });

        let response = self
            .client
            .post(self.signin_url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| TableauError::Authentication(format!("sign-in request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TableauError::Authentication(format!("sign-in rejected ({}): {}", status, body)).into());
        }

        let body: SignInResponse = response.json().await.map_err(|e| {
            TableauError::Authentication(format!("unexpected sign-in response: {}", e))
        })?;

        log::info!("Signed in to Tableau site {}", body.credentials.site.id);

        Ok(body.credentials)
    }
}
