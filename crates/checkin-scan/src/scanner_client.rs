use std::sync::Arc;

use tracing::debug;

use platform_session::{ApiError, TenantSession, check_status};

use crate::controller::ScannerGateway;
use crate::scan_types::{ScannerDashboard, VerifyRequest, VerifyResponse};

/// HTTP client for the scanner endpoints of the rewards platform
pub struct ScannerClient {
    session: Arc<TenantSession>,
}

impl ScannerClient {
    /// Create a client bound to the given tenant session.
    pub fn new(session: Arc<TenantSession>) -> Self {
        Self { session }
    }
}

#[async_trait::async_trait]
impl ScannerGateway for ScannerClient {
    async fn verify(&self, request: &VerifyRequest) -> Result<VerifyResponse, ApiError> {
        debug!(
            "Submitting payload for verification on event {}",
            request.event_id
        );

        let response = self
            .session
            .post("/scanner/verify")
            .json(request)
            .send()
            .await
            .map_err(|e| ApiError::Network(format!("Verification request failed: {}", e)))?;

        let response = check_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| ApiError::DataFormat(format!("Failed to parse verify response: {}", e)))
    }

    async fn dashboard(&self, event_id: &str) -> Result<ScannerDashboard, ApiError> {
        debug!("Fetching scanner dashboard for event {}", event_id);

        let response = self
            .session
            .get(&format!("/scanner/event/{}/dashboard", event_id))
            .send()
            .await
            .map_err(|e| ApiError::Network(format!("Dashboard request failed: {}", e)))?;

        let response = check_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| ApiError::DataFormat(format!("Failed to parse dashboard: {}", e)))
    }
}
