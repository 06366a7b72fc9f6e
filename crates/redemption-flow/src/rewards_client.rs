use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;
use validator::Validate;

use platform_session::{ApiError, TenantSession, check_status};

use crate::types::{RedemptionReceipt, RedemptionSubmission, Reward};
use crate::wizard::RedemptionSubmitter;

/// HTTP client for the rewards catalog and redemption endpoints
pub struct RewardsClient {
    session: Arc<TenantSession>,
}

/// Slice of the profile payload the wallet cares about
#[derive(Debug, Deserialize)]
struct ProfileResponse {
    #[serde(default)]
    points_balance: i64,
}

impl RewardsClient {
    /// Create a client bound to the given tenant session.
    pub fn new(session: Arc<TenantSession>) -> Self {
        Self { session }
    }

    /// Fetch the rewards catalog.
    pub async fn catalog(&self) -> Result<Vec<Reward>, ApiError> {
        debug!("Fetching rewards catalog");

        let response = self
            .session
            .get("/api/rewards/")
            .send()
            .await
            .map_err(|e| ApiError::Network(format!("Catalog request failed: {}", e)))?;

        let response = check_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| ApiError::DataFormat(format!("Failed to parse catalog: {}", e)))
    }

    /// Fetch the current point balance from the profile endpoint.
    pub async fn balance(&self) -> Result<i64, ApiError> {
        let response = self
            .session
            .get("/api/auth/me")
            .send()
            .await
            .map_err(|e| ApiError::Network(format!("Balance request failed: {}", e)))?;

        let response = check_status(response).await?;

        let profile: ProfileResponse = response
            .json()
            .await
            .map_err(|e| ApiError::DataFormat(format!("Failed to parse profile: {}", e)))?;

        Ok(profile.points_balance)
    }
}

#[async_trait::async_trait]
impl RedemptionSubmitter for RewardsClient {
    async fn submit(
        &self,
        submission: &RedemptionSubmission,
    ) -> Result<RedemptionReceipt, ApiError> {
        submission
            .validate()
            .map_err(|e| ApiError::Config(format!("Invalid redemption request: {}", e)))?;
        if !submission.is_known_denomination() {
            return Err(ApiError::Config(format!(
                "Invalid redemption request: unknown denomination {}",
                submission.denomination
            )));
        }

        debug!("Submitting redemption for reward {}", submission.reward_id);

        let response = self
            .session
            .post(&format!("/api/rewards/{}/redeem", submission.reward_id))
            .json(submission)
            .send()
            .await
            .map_err(|e| ApiError::Network(format!("Redemption request failed: {}", e)))?;

        let response = check_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| ApiError::DataFormat(format!("Failed to parse receipt: {}", e)))
    }
}
