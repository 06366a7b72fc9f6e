use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use platform_session::ApiError;

use crate::capture::CaptureError;

/// Request body for the scanner verification endpoint
#[derive(Debug, Clone, Serialize)]
pub struct VerifyRequest {
    /// Decoded badge payload
    pub qr_token: String,
    /// Event the scan station is bound to
    pub event_id: String,
}

/// Response from the scanner verification endpoint.
///
/// Only `status` and `message` are guaranteed; everything else is
/// outcome-specific and defaults when absent.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VerifyResponse {
    /// Outcome tag: SUCCESS, ALREADY_COLLECTED, NOT_APPROVED, NOT_FOUND, ERROR
    pub status: String,
    /// Human-readable result message
    #[serde(default)]
    pub message: String,
    /// Identifier of the matched gift request
    #[serde(default)]
    pub request_id: Option<String>,
    /// Name of the badge holder
    #[serde(default)]
    pub user_name: Option<String>,
    /// Event display name
    #[serde(default)]
    pub event_name: Option<String>,
    /// Track/option the gift belongs to
    #[serde(default)]
    pub option_name: Option<String>,
    /// When the gift was first collected (ALREADY_COLLECTED only)
    #[serde(default)]
    pub collected_at: Option<DateTime<Utc>>,
    /// Stock left for the option after this collection (SUCCESS only)
    #[serde(default)]
    pub remaining_stock: i64,
}

/// Tagged result of a processed scan.
///
/// Built verbatim from the server response; the station applies no
/// eligibility rules of its own. One outcome replaces the previous on
/// each scan.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    /// Gift collected
    Success {
        /// Server message for the feedback banner
        message: String,
        /// Badge holder, when resolved
        user_name: Option<String>,
        /// Track/option name, when resolved
        option_name: Option<String>,
        /// Stock remaining after collection
        remaining_stock: i64,
    },
    /// Double-scan alert: the gift was already handed out
    AlreadyCollected {
        /// Server message for the feedback banner
        message: String,
        /// Badge holder, when resolved
        user_name: Option<String>,
        /// Track/option name, when resolved
        option_name: Option<String>,
        /// When the earlier collection happened, surfaced verbatim
        collected_at: Option<DateTime<Utc>>,
    },
    /// Anything else: NOT_APPROVED, NOT_FOUND, server ERROR, transport failure
    Error {
        /// Original status tag from the server, or "ERROR" for
        /// transport failures
        status: String,
        /// Failure message for the banner
        message: String,
    },
}

impl ScanOutcome {
    /// Generic transport-failure outcome; the retry mechanism is a
    /// fresh scan, so no detail beyond the message is kept.
    pub fn transport_error(message: impl Into<String>) -> Self {
        ScanOutcome::Error {
            status: "ERROR".to_string(),
            message: message.into(),
        }
    }

    /// Feedback cue for this outcome. A two-way branch only: positive
    /// for a collected gift, negative for everything else.
    pub fn feedback(&self) -> FeedbackCue {
        match self {
            ScanOutcome::Success { .. } => FeedbackCue::Positive,
            _ => FeedbackCue::Negative,
        }
    }
}

impl From<VerifyResponse> for ScanOutcome {
    fn from(response: VerifyResponse) -> Self {
        match response.status.as_str() {
            "SUCCESS" => ScanOutcome::Success {
                message: response.message,
                user_name: response.user_name,
                option_name: response.option_name,
                remaining_stock: response.remaining_stock,
            },
            "ALREADY_COLLECTED" => ScanOutcome::AlreadyCollected {
                message: response.message,
                user_name: response.user_name,
                option_name: response.option_name,
                collected_at: response.collected_at,
            },
            _ => ScanOutcome::Error {
                status: response.status,
                message: response.message,
            },
        }
    }
}

/// Audible/visual cue keyed only by the outcome tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackCue {
    /// Green flash / success sound
    Positive,
    /// Red flash / error sound
    Negative,
}

/// Inventory details for a single option/track
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InventoryOption {
    /// Option identifier
    #[serde(default)]
    pub option_id: String,
    /// Option display name
    #[serde(default)]
    pub option_name: String,
    /// Gifts allocated to this option
    #[serde(default)]
    pub total_available: i64,
    /// Gifts collected so far
    #[serde(default)]
    pub collected: i64,
    /// Gifts still in stock
    #[serde(default)]
    pub remaining: i64,
    /// Collection percentage, 0-100
    #[serde(default)]
    pub percentage: f64,
}

/// Read-only projection of event inventory.
///
/// Refreshed wholesale after every processed scan so displayed counts
/// never drift from server truth; never mutated locally.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Inventory {
    /// Event identifier
    #[serde(default)]
    pub event_id: String,
    /// Event display name
    #[serde(default)]
    pub event_name: String,
    /// Total gifts allocated to the event
    #[serde(default)]
    pub total_available: i64,
    /// Total gifts collected
    #[serde(default)]
    pub total_collected: i64,
    /// Total gifts remaining
    #[serde(default)]
    pub total_remaining: i64,
    /// Collection percentage, 0-100
    #[serde(default)]
    pub collection_percentage: f64,
    /// Per-option breakdown
    #[serde(default)]
    pub options: Vec<InventoryOption>,
}

/// Details of a single collection, as listed on the dashboard
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CollectionDetail {
    /// Identifier of the collected gift request
    #[serde(default)]
    pub request_id: String,
    /// Badge holder name
    #[serde(default)]
    pub user_name: String,
    /// Track/option name
    #[serde(default)]
    pub option_name: String,
    /// When the gift was collected
    #[serde(default)]
    pub collected_at: Option<DateTime<Utc>>,
    /// Who operated the scanner
    #[serde(default)]
    pub collected_by: String,
}

/// Dashboard aggregate for the scanner view
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScannerDashboard {
    /// Event identifier
    #[serde(default)]
    pub event_id: String,
    /// Event display name
    #[serde(default)]
    pub event_name: String,
    /// Current inventory snapshot
    pub inventory: Inventory,
    /// Most recent collections, server-ordered
    #[serde(default)]
    pub recent_collections: Vec<CollectionDetail>,
    /// Total collections recorded for the event
    #[serde(default)]
    pub total_collections: i64,
    /// Whether the event is still accepting collections
    #[serde(default)]
    pub active: bool,
}

/// Custom error type for scan flow operations
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Platform API error
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Frame capture error
    #[error("Capture error: {0}")]
    Capture(#[from] CaptureError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_from_success_response() {
        let response: VerifyResponse = serde_json::from_value(serde_json::json!({
            "status": "SUCCESS",
            "message": "Gift collected for John!",
            "user_name": "John Doe",
            "option_name": "Standup Comedy",
            "remaining_stock": 47
        }))
        .unwrap();

        match ScanOutcome::from(response) {
            ScanOutcome::Success {
                remaining_stock,
                user_name,
                ..
            } => {
                assert_eq!(remaining_stock, 47);
                assert_eq!(user_name.as_deref(), Some("John Doe"));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_status_folds_into_error() {
        let response: VerifyResponse = serde_json::from_value(serde_json::json!({
            "status": "NOT_APPROVED",
            "message": "Request not approved"
        }))
        .unwrap();

        match ScanOutcome::from(response) {
            ScanOutcome::Error { status, message } => {
                assert_eq!(status, "NOT_APPROVED");
                assert_eq!(message, "Request not approved");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_absent_fields_default() {
        // Sparse server payloads degrade to zero/blank instead of failing.
        let response: VerifyResponse =
            serde_json::from_value(serde_json::json!({ "status": "SUCCESS" })).unwrap();

        assert_eq!(response.remaining_stock, 0);
        assert!(response.message.is_empty());
        assert!(response.collected_at.is_none());

        let inventory: Inventory = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(inventory.total_remaining, 0);
        assert!(inventory.options.is_empty());
    }

    #[test]
    fn test_feedback_is_two_way() {
        let success = ScanOutcome::Success {
            message: String::new(),
            user_name: None,
            option_name: None,
            remaining_stock: 1,
        };
        let duplicate = ScanOutcome::AlreadyCollected {
            message: String::new(),
            user_name: None,
            option_name: None,
            collected_at: None,
        };

        assert_eq!(success.feedback(), FeedbackCue::Positive);
        assert_eq!(duplicate.feedback(), FeedbackCue::Negative);
        assert_eq!(
            ScanOutcome::transport_error("boom").feedback(),
            FeedbackCue::Negative
        );
    }
}
