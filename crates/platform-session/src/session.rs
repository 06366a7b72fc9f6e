use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use tracing::debug;

use crate::error::ApiError;

/// Header carrying the multi-organization isolation identifier
pub const TENANT_HEADER: &str = "X-Tenant-ID";

/// Configuration for a tenant session
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Base URL of the platform API (development reverse-proxy target
    /// or production origin)
    pub base_url: String,

    /// Tenant identifier attached to every request
    pub tenant_id: String,

    /// Optional bearer token for authenticated endpoints
    pub auth_token: Option<String>,

    /// Request timeout (default: 30 seconds)
    pub timeout: Duration,
}

impl SessionConfig {
    /// Build a config from the required pieces, with the default timeout.
    pub fn new(base_url: impl Into<String>, tenant_id: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            tenant_id: tenant_id.into(),
            auth_token: None,
            timeout: Duration::from_secs(30),
        }
    }

    /// Attach a bearer token.
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }
}

/// Tenant-scoped HTTP session for the rewards platform.
///
/// Owns the `reqwest` client and stamps the tenant header (and bearer
/// token when present) onto every request, so individual API clients
/// never reach into ambient storage for tenant context.
pub struct TenantSession {
    client: Client,
    config: SessionConfig,
}

impl TenantSession {
    /// Create a new session from explicit configuration.
    pub fn new(config: SessionConfig) -> Result<Self, ApiError> {
        if config.base_url.is_empty() {
            return Err(ApiError::Config("base URL must not be empty".to_string()));
        }
        if config.tenant_id.is_empty() {
            return Err(ApiError::Config("tenant id must not be empty".to_string()));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Absolute URL for an API path.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Tenant identifier this session was built for.
    pub fn tenant_id(&self) -> &str {
        &self.config.tenant_id
    }

    /// GET request builder with tenant context applied.
    pub fn get(&self, path: &str) -> RequestBuilder {
        let url = self.url(path);
        debug!("GET {}", url);
        self.decorate(self.client.get(url))
    }

    /// POST request builder with tenant context applied.
    pub fn post(&self, path: &str) -> RequestBuilder {
        let url = self.url(path);
        debug!("POST {}", url);
        self.decorate(self.client.post(url))
    }

    fn decorate(&self, builder: RequestBuilder) -> RequestBuilder {
        let builder = builder.header(TENANT_HEADER, &self.config.tenant_id);
        match &self.config.auth_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let session =
            TenantSession::new(SessionConfig::new("http://localhost:8000/", "acme")).unwrap();

        assert_eq!(
            session.url("/scanner/verify"),
            "http://localhost:8000/scanner/verify"
        );
        assert_eq!(
            session.url("scanner/verify"),
            "http://localhost:8000/scanner/verify"
        );
    }

    #[test]
    fn test_empty_config_rejected() {
        assert!(TenantSession::new(SessionConfig::new("", "acme")).is_err());
        assert!(TenantSession::new(SessionConfig::new("http://localhost", "")).is_err());
    }

    #[test]
    fn test_tenant_id_exposed() {
        let session =
            TenantSession::new(SessionConfig::new("http://localhost:8000", "acme")).unwrap();
        assert_eq!(session.tenant_id(), "acme");
    }
}
