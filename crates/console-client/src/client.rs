//! Console backend HTTP client implementation

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, instrument};
use url::Url;

use crate::error::{ConsoleClientError, Result};
use crate::navigation::{Navigator, TracingNavigator};
use crate::types::*;

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Default connection timeout
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// Path prefix of every console endpoint
pub const DEFAULT_API_PREFIX: &str = "/console-api";
/// Failures landing on this path send the user to the legacy console
pub const DEFAULT_LEGACY_REDIRECT_PATH: &str = "/registrar";

/// Registrar console REST API client
///
/// Reads go through [`ConsoleClient::catch_error`], which logs the failure,
/// handles the legacy console redirect and optionally substitutes a fallback.
/// Writes return the transport or backend error untouched, except
/// [`ConsoleClient::save_registrar`] which shares the read path handler.
#[derive(Debug, Clone)]
pub struct ConsoleClient {
    client: Client,
    base_url: Url,
    api_prefix: String,
    legacy_redirect_path: String,
    navigator: Arc<dyn Navigator>,
}

impl ConsoleClient {
    /// Create a new console client
    ///
    /// # Arguments
    /// * `base_url` - Origin serving the console API (e.g., "https://registry.example")
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_config(base_url, DEFAULT_TIMEOUT, DEFAULT_CONNECT_TIMEOUT)
    }

    /// Create a new console client with custom timeouts
    pub fn with_config(
        base_url: &str,
        timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()?;

        Self::with_http_client(client, base_url)
    }

    /// Create a new console client that sends a bearer token with every request.
    ///
    /// The token is set as a default `Authorization: Bearer <token>` header.
    pub fn with_bearer_token(base_url: &str, token: &str) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        let mut header_value = reqwest::header::HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|e| ConsoleClientError::InvalidHeader(format!("Invalid auth token: {}", e)))?;
        header_value.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, header_value);

        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .default_headers(headers)
            .build()?;

        Self::with_http_client(client, base_url)
    }

    /// Create a console client on top of an existing HTTP client
    pub fn with_http_client(client: Client, base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)?;

        Ok(Self {
            client,
            base_url,
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            legacy_redirect_path: DEFAULT_LEGACY_REDIRECT_PATH.to_string(),
            navigator: Arc::new(TracingNavigator),
        })
    }

    /// Use a different API path prefix (default `/console-api`)
    pub fn with_api_prefix(mut self, prefix: &str) -> Self {
        self.api_prefix = prefix.trim_end_matches('/').to_string();
        self
    }

    /// Use a different legacy console path (default `/registrar`)
    pub fn with_legacy_redirect_path(mut self, path: &str) -> Self {
        self.legacy_redirect_path = path.to_string();
        self
    }

    /// Use a different navigator for legacy console redirects
    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = navigator;
        self
    }

    /// Get the base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Get the API path prefix
    pub fn api_prefix(&self) -> &str {
        &self.api_prefix
    }

    /// Resolve a path under the API prefix against the base URL
    pub fn api_url(&self, path: &str) -> Result<Url> {
        Ok(self
            .base_url
            .join(&format!("{}{}", self.api_prefix, path))?)
    }

    // =========================================================================
    // Contact Operations
    // =========================================================================

    /// List the contacts of a registrar
    #[instrument(skip(self))]
    pub async fn fetch_contacts(&self, registrar_id: &str) -> Result<Vec<Contact>> {
        self.get_json(
            &format!("/settings/contacts?registrarId={}", registrar_id),
            None,
        )
        .await
    }

    /// Replace the contacts of a registrar
    #[instrument(skip(self, contacts), fields(count = contacts.len()))]
    pub async fn save_contacts(
        &self,
        registrar_id: &str,
        contacts: &[Contact],
    ) -> Result<Vec<Contact>> {
        self.post(
            &format!("/settings/contacts?registrarId={}", registrar_id),
            contacts,
        )
        .await
    }

    // =========================================================================
    // Domain Operations
    // =========================================================================

    /// Fetch one page of a registrar's domains
    #[instrument(skip(self))]
    pub async fn fetch_domains(&self, query: &DomainListQuery) -> Result<DomainListResult> {
        self.get_json(&query.to_path(), None).await
    }

    // =========================================================================
    // Registrar Operations
    // =========================================================================

    /// List the registrars visible to the current user
    #[instrument(skip(self))]
    pub async fn fetch_registrars(&self) -> Result<Vec<Registrar>> {
        self.get_json("/registrars", None).await
    }

    /// Create or update a registrar
    #[instrument(skip(self, registrar), fields(registrar_id = ?registrar.registrar_id))]
    pub async fn save_registrar(&self, registrar: &Registrar) -> Result<Registrar> {
        match self.post("/registrar", registrar).await {
            Ok(saved) => Ok(saved),
            Err(e) => self.catch_error(e, None),
        }
    }

    /// Update the WHOIS-published fields of a registrar
    #[instrument(skip(self, whois_fields), fields(registrar_id = ?whois_fields.registrar_id))]
    pub async fn save_whois_fields(
        &self,
        whois_fields: &WhoisRegistrarFields,
    ) -> Result<WhoisRegistrarFields> {
        self.post("/settings/whois-fields", whois_fields).await
    }

    // =========================================================================
    // Security Operations
    // =========================================================================

    /// Get the security settings of a registrar
    #[instrument(skip(self))]
    pub async fn fetch_security_settings(&self, registrar_id: &str) -> Result<SecuritySettings> {
        self.get_json(
            &format!("/settings/security?registrarId={}", registrar_id),
            None,
        )
        .await
    }

    /// Replace the security settings of a registrar
    #[instrument(skip(self, settings))]
    pub async fn save_security_settings(
        &self,
        registrar_id: &str,
        settings: &SecuritySettings,
    ) -> Result<SecuritySettings> {
        self.post(
            &format!("/settings/security?registrarId={}", registrar_id),
            settings,
        )
        .await
    }

    /// Change a registrar's EPP password
    #[instrument(skip(self, update), fields(registrar_id = ?update.registrar_id))]
    pub async fn save_epp_password(&self, update: &EppPassword) -> Result<EppPassword> {
        self.post("/eppPassword", update).await
    }

    // =========================================================================
    // User Operations
    // =========================================================================

    /// Get the signed-in user's profile
    #[instrument(skip(self))]
    pub async fn fetch_user_data(&self) -> Result<UserData> {
        self.get_json("/userdata", None).await
    }

    // =========================================================================
    // Error Handling
    // =========================================================================

    /// GET a path under the API prefix, routing failures through
    /// [`catch_error`](Self::catch_error) with `fallback`
    #[instrument(skip(self, fallback))]
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        fallback: Option<T>,
    ) -> Result<T> {
        match self.get(path).await {
            Ok(value) => Ok(value),
            Err(e) => self.catch_error(e, fallback),
        }
    }

    /// Shared failure handler for reads
    ///
    /// 1. A failure whose final URL path is the legacy console path
    ///    navigates there, once.
    /// 2. Client failures are logged with their message, backend failures
    ///    with status and raw body.
    /// 3. `Some(fallback)` turns the failure into `Ok(fallback)`.
    /// 4. Otherwise the original error is returned unchanged.
    pub fn catch_error<T>(&self, err: ConsoleClientError, fallback: Option<T>) -> Result<T> {
        if let Some(url) = err.url() {
            if url.path() == self.legacy_redirect_path {
                self.navigator.navigate(url);
            }
        }

        match &err {
            ConsoleClientError::Server { status, body, .. } => {
                error!("Backend returned code {}, body was: {}", status, body);
            }
            other => {
                error!("An error occurred: {}", other);
            }
        }

        match fallback {
            Some(value) => Ok(value),
            None => Err(err),
        }
    }

    // =========================================================================
    // Helper Methods
    // =========================================================================

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.api_url(path)?;
        debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        self.handle_response(response).await
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.api_url(path)?;
        debug!("POST {}", url);

        let response = self.client.post(url).json(body).send().await?;
        self.handle_response(response).await
    }

    /// Handle response and deserialize JSON
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let url = response.url().clone();

        if status.is_success() {
            response.json().await.map_err(|e| {
                ConsoleClientError::client_error(
                    Some(url),
                    format!("Failed to parse response: {}", e),
                )
            })
        } else {
            // The raw body is what gets logged, so keep it even if it isn't JSON
            let body = response.text().await.unwrap_or_default();
            Err(ConsoleClientError::server_error(url, status.as_u16(), body))
        }
    }
}
