//! HTTP client for the authentication service.

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::AUTHORIZATION;
use secrecy::ExposeSecret;
use url::Url;

use super::{CallerContext, ClaimsError, ClaimsResolver, IdentityClaim};
use crate::config::ClaimsServiceConfig;
use crate::middleware::REQUEST_ID_HEADER;

/// Path on the authentication service that returns the caller's claims.
const CLAIMS_PATH: &str = "claims";

/// Resolves claims with `GET {base_url}/claims`, forwarding the caller's
/// `Authorization` and `x-request-id` headers unchanged.
#[derive(Clone)]
pub struct HttpClaimsResolver {
    inner: Arc<HttpClaimsResolverInner>,
}

struct HttpClaimsResolverInner {
    client: reqwest::Client,
    claims_url: Url,
}

impl HttpClaimsResolver {
    /// Create a client for the configured authentication service.
    ///
    /// # Errors
    ///
    /// Returns `ClaimsError::Unavailable` if the URL cannot be joined or the
    /// HTTP client cannot be built.
    pub fn new(config: &ClaimsServiceConfig) -> Result<Self, ClaimsError> {
        let claims_url = claims_url(&config.base_url)?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ClaimsError::Unavailable(e.to_string()))?;

        Ok(Self {
            inner: Arc::new(HttpClaimsResolverInner { client, claims_url }),
        })
    }

    /// The endpoint this client calls.
    #[must_use]
    pub fn claims_url(&self) -> &Url {
        &self.inner.claims_url
    }
}

impl ClaimsResolver for HttpClaimsResolver {
    async fn resolve(&self, caller: &CallerContext) -> Result<IdentityClaim, ClaimsError> {
        let mut request = self.inner.client.get(self.inner.claims_url.clone());
        if let Some(token) = caller.authorization() {
            request = request.header(AUTHORIZATION, token.expose_secret());
        }
        if let Some(request_id) = caller.request_id() {
            request = request.header(REQUEST_ID_HEADER, request_id);
        }

        let response = request.send().await.map_err(|e| {
            tracing::warn!(error = %e, "claims request failed");
            ClaimsError::Unavailable(e.to_string())
        })?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<IdentityClaim>()
                .await
                .map_err(|e| ClaimsError::Unavailable(format!("malformed claims response: {e}")));
        }

        let body = response.text().await.unwrap_or_default();
        Err(classify_failure(status, body))
    }
}

/// Join the claims path onto the service base URL.
fn claims_url(base: &Url) -> Result<Url, ClaimsError> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(CLAIMS_PATH)
        .map_err(|e| ClaimsError::Unavailable(format!("invalid claims url: {e}")))
}

/// Map a non-success status from the authentication service.
fn classify_failure(status: StatusCode, body: String) -> ClaimsError {
    let detail = if body.is_empty() {
        status.to_string()
    } else {
        body
    };

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ClaimsError::Unauthenticated(detail),
        StatusCode::BAD_REQUEST => ClaimsError::InvalidRequest(detail),
        _ => ClaimsError::Unavailable(detail),
    }
}
