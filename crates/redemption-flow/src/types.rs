use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Fixed voucher face values offered by the wizard, in points
pub const DENOMINATIONS: [i64; 4] = [500, 1000, 2000, 5000];

/// A catalog entry from the external rewards catalog
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Reward {
    /// Catalog identifier
    pub id: String,
    /// Display title
    #[serde(default)]
    pub title: String,
    /// Point cost for fixed-price rewards
    #[serde(default)]
    pub points_cost: i64,
    /// Display icon, when the catalog provides one
    #[serde(default)]
    pub icon: Option<String>,
    /// Catalog category
    #[serde(default)]
    pub category: Option<String>,
}

/// Request body for the redemption submission endpoint
#[derive(Debug, Clone, Serialize, Validate)]
pub struct RedemptionSubmission {
    /// Reward being redeemed
    #[validate(length(min = 1, message = "Reward id is required"))]
    pub reward_id: String,

    /// Chosen voucher denomination, in points
    pub denomination: i64,

    /// Recipients of the award; at least one is required
    #[validate(length(min = 1, message = "At least one recipient is required"))]
    pub recipients: Vec<String>,

    /// Message attached to the award
    #[validate(length(max = 500, message = "Message must be 500 characters or fewer"))]
    pub message: String,

    /// Client-generated idempotency key
    pub client_ref: uuid::Uuid,
}

impl RedemptionSubmission {
    /// Whether the denomination is one of the fixed face values.
    pub fn is_known_denomination(&self) -> bool {
        DENOMINATIONS.contains(&self.denomination)
    }
}

/// Response from the redemption submission endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct RedemptionReceipt {
    /// Identifier of the created redemption
    #[serde(default)]
    pub redemption_id: Option<String>,
    /// Server-side status string
    #[serde(default)]
    pub status: String,
    /// Claim code, when issued synchronously
    #[serde(default)]
    pub claim_code: Option<String>,
}

/// A voucher held in the wallet
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Voucher {
    /// Voucher identifier
    pub id: String,
    /// Brand or reward name
    #[serde(default)]
    pub name: String,
    /// Face value in points
    #[serde(default)]
    pub value: i64,
    /// Code presented at the merchant
    #[serde(default)]
    pub claim_code: String,
    /// When the voucher was issued
    #[serde(default)]
    pub issued_at: Option<DateTime<Utc>>,
}

/// A wallet ledger entry
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Transaction {
    /// Ledger entry identifier
    pub id: String,
    /// Human-readable description
    #[serde(default)]
    pub description: String,
    /// Signed point movement
    #[serde(default)]
    pub points_delta: i64,
    /// When the entry was recorded
    #[serde(default)]
    pub occurred_at: Option<DateTime<Utc>>,
}
