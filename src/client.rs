//! The Zotero Web API client.

use crate::error::{Result, ZoteroError};
use crate::rate_limit::RateLimiter;
use crate::types::LibraryRef;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Async client for the Zotero Web API (v3).
///
/// # Example
///
/// ```no_run
/// # async fn example() -> zotero_client::error::Result<()> {
/// let client = zotero_client::ZoteroClient::from_env()?;
/// let items = client.search("machine ethics", 10).await?;
/// for item in &items {
///     println!("{} ({})", item.data.title, item.key);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ZoteroClient {
    pub(crate) http: Client,
    pub(crate) api_key: String,
    pub(crate) base_url: String,
    pub(crate) library: LibraryRef,
    pub(crate) rate_limiter: RateLimiter,
}

impl ZoteroClient {
    /// Create a new client for the given library with the given API key.
    pub fn new(api_key: impl Into<String>, library: LibraryRef) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            api_key: api_key.into(),
            base_url: "https://api.zotero.org".to_string(),
            library,
            rate_limiter: RateLimiter::new(5.0),
        }
    }

    /// Create a client from environment variables.
    ///
    /// Reads `ZOTERO_API_KEY` plus `ZOTERO_USER_ID` or `ZOTERO_GROUP_ID`.
    /// The personal library takes precedence when both identifiers are set.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("ZOTERO_API_KEY").map_err(|_| ZoteroError::AuthRequired)?;
        if api_key.is_empty() {
            return Err(ZoteroError::AuthRequired);
        }

        let library = if let Ok(user_id) = std::env::var("ZOTERO_USER_ID") {
            LibraryRef::user(user_id)
        } else if let Ok(group_id) = std::env::var("ZOTERO_GROUP_ID") {
            LibraryRef::group(group_id)
        } else {
            return Err(ZoteroError::Config(
                "Either ZOTERO_USER_ID or ZOTERO_GROUP_ID must be set".to_string(),
            ));
        };

        Ok(Self::new(api_key, library))
    }

    /// The library this client is scoped to.
    pub fn library(&self) -> &LibraryRef {
        &self.library
    }

    /// Override the base URL (useful for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Override the rate limit (requests per second).
    pub fn with_rate_limit(mut self, per_second: f64) -> Self {
        self.rate_limiter = RateLimiter::new(per_second);
        self
    }

    /// Full URL for a library-scoped path.
    fn library_url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, self.library.path_prefix(), path)
    }

    /// Make an authenticated GET request to a library-scoped endpoint.
    pub(crate) async fn get(&self, path: &str, params: &[(&str, &str)]) -> Result<String> {
        self.request_get(&self.library_url(path), params).await
    }

    /// Make an authenticated GET request to a global (non-library) endpoint,
    /// such as `/itemTypes` or `/items/new`.
    pub(crate) async fn get_global(&self, path: &str, params: &[(&str, &str)]) -> Result<String> {
        self.request_get(&format!("{}{}", self.base_url, path), params)
            .await
    }

    async fn request_get(&self, url: &str, params: &[(&str, &str)]) -> Result<String> {
        self.rate_limiter.acquire().await;
        debug!("GET {}", url);

        let response = self
            .http
            .get(url)
            .header("Zotero-API-Version", "3")
            .header("Zotero-API-Key", &self.api_key)
            .header("User-Agent", "zotero-client/0.3.0")
            .query(params)
            .send()
            .await?;

        self.rate_limiter
            .update_from_headers(response.headers())
            .await;
        handle_response(response).await
    }

    /// Make an authenticated POST request with a JSON body.
    pub(crate) async fn post_json(&self, path: &str, body: &serde_json::Value) -> Result<String> {
        self.rate_limiter.acquire().await;
        let url = self.library_url(path);
        debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .header("Zotero-API-Version", "3")
            .header("Zotero-API-Key", &self.api_key)
            .header("User-Agent", "zotero-client/0.3.0")
            .json(body)
            .send()
            .await?;

        self.rate_limiter
            .update_from_headers(response.headers())
            .await;
        handle_response(response).await
    }

    /// Make an authenticated PATCH request with a JSON body.
    ///
    /// `version` becomes the `If-Unmodified-Since-Version` precondition the
    /// API requires for object writes.
    pub(crate) async fn patch_json(
        &self,
        path: &str,
        body: &serde_json::Value,
        version: u64,
    ) -> Result<String> {
        self.rate_limiter.acquire().await;
        let url = self.library_url(path);
        debug!("PATCH {} (version {})", url, version);

        let response = self
            .http
            .patch(&url)
            .header("Zotero-API-Version", "3")
            .header("Zotero-API-Key", &self.api_key)
            .header("User-Agent", "zotero-client/0.3.0")
            .header("If-Unmodified-Since-Version", version.to_string())
            .json(body)
            .send()
            .await?;

        self.rate_limiter
            .update_from_headers(response.headers())
            .await;
        handle_response(response).await
    }

    /// Make an authenticated DELETE request with a version precondition.
    pub(crate) async fn delete(&self, path: &str, version: u64) -> Result<String> {
        self.rate_limiter.acquire().await;
        let url = self.library_url(path);
        debug!("DELETE {} (version {})", url, version);

        let response = self
            .http
            .delete(&url)
            .header("Zotero-API-Version", "3")
            .header("Zotero-API-Key", &self.api_key)
            .header("User-Agent", "zotero-client/0.3.0")
            .header("If-Unmodified-Since-Version", version.to_string())
            .send()
            .await?;

        self.rate_limiter
            .update_from_headers(response.headers())
            .await;
        handle_response(response).await
    }
}

/// Handle the HTTP response, mapping status codes to errors.
async fn handle_response(response: reqwest::Response) -> Result<String> {
    let status = response.status().as_u16();

    match status {
        200..=299 => Ok(response.text().await?),
        401 | 403 => Err(ZoteroError::AuthRequired),
        404 => Err(ZoteroError::NotFound("Resource not found".to_string())),
        412 => Err(ZoteroError::VersionConflict { status }),
        429 => {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs);
            Err(ZoteroError::RateLimited { retry_after })
        }
        _ => {
            let body = response.text().await.unwrap_or_default();
            Err(ZoteroError::Api {
                status,
                message: body,
            })
        }
    }
}
