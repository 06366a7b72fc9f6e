use std::time::Duration;

use tokio::time::sleep;
use tracing::{error, info};

use platform_session::ApiError;

use crate::types::{DENOMINATIONS, RedemptionReceipt, RedemptionSubmission, Reward};

/// Collaborator that performs the redemption at wizard completion
#[async_trait::async_trait]
pub trait RedemptionSubmitter: Send + Sync {
    /// Submit the redemption to the external endpoint.
    async fn submit(&self, submission: &RedemptionSubmission)
    -> Result<RedemptionReceipt, ApiError>;
}

/// Step of the redemption wizard, linear with no branching
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WizardStep {
    /// Pick a voucher face value
    SelectDenomination,
    /// Review and confirm
    Confirm,
    /// Terminal: redemption submitted
    Success,
}

impl WizardStep {
    /// 1-based ordinal of the step.
    pub fn ordinal(&self) -> u8 {
        match self {
            WizardStep::SelectDenomination => 1,
            WizardStep::Confirm => 2,
            WizardStep::Success => 3,
        }
    }
}

/// Custom error type for wizard transitions
#[derive(thiserror::Error, Debug)]
pub enum WizardError {
    /// Denomination is not one of the fixed face values
    #[error("Unknown denomination: {0}")]
    UnknownDenomination(i64),

    /// The requested transition is not available from the current step
    #[error("Invalid transition from step {0}")]
    InvalidTransition(u8),
}

/// Configuration for the redemption wizard
#[derive(Debug, Clone)]
pub struct WizardConfig {
    /// How long the success screen lingers before the completion
    /// hooks fire (default: 3 seconds)
    pub success_linger: Duration,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            success_linger: Duration::from_secs(3),
        }
    }
}

/// Completion callbacks supplied by the parent context.
///
/// Both are assumed idempotent; the wizard only invokes them once,
/// after the success linger.
pub struct WizardHooks {
    /// Signals successful completion (e.g. refresh wallet state)
    pub on_complete: Box<dyn Fn() + Send + Sync>,
    /// Closes the wizard
    pub on_close: Box<dyn Fn() + Send + Sync>,
}

/// In-memory redemption wizard state.
///
/// Created when the user opens the wizard, discarded on close or after
/// successful submission. The step moves by exactly one unit per user
/// action and submission is only reachable from the confirmation step.
pub struct RedemptionWizard {
    reward: Reward,
    balance: i64,
    recipients: Vec<String>,
    message: String,
    denomination: i64,
    step: WizardStep,
    config: WizardConfig,
}

impl RedemptionWizard {
    /// Open a wizard for a reward. The smallest denomination is
    /// pre-selected, so step 1 can always advance.
    pub fn new(
        reward: Reward,
        balance: i64,
        recipients: Vec<String>,
        message: impl Into<String>,
        config: Option<WizardConfig>,
    ) -> Self {
        Self {
            reward,
            balance,
            recipients,
            message: message.into(),
            denomination: DENOMINATIONS[0],
            step: WizardStep::SelectDenomination,
            config: config.unwrap_or_default(),
        }
    }

    /// Current wizard step.
    pub fn step(&self) -> WizardStep {
        self.step
    }

    /// Currently selected denomination.
    pub fn denomination(&self) -> i64 {
        self.denomination
    }

    /// Points the user is short of the selected denomination; zero when
    /// the balance covers it. Display-only: a shortfall never blocks
    /// advancement, the UI just surfaces a co-pay hint.
    pub fn shortfall(&self) -> i64 {
        (self.denomination - self.balance).max(0)
    }

    /// Points that will be deducted from the balance at this
    /// denomination (the shortfall, if any, is co-paid externally).
    pub fn points_deducted(&self) -> i64 {
        self.denomination.min(self.balance)
    }

    /// Pick a denomination. Only valid on the selection step.
    pub fn select_denomination(&mut self, denomination: i64) -> Result<(), WizardError> {
        if self.step != WizardStep::SelectDenomination {
            return Err(WizardError::InvalidTransition(self.step.ordinal()));
        }
        if !DENOMINATIONS.contains(&denomination) {
            return Err(WizardError::UnknownDenomination(denomination));
        }
        self.denomination = denomination;
        Ok(())
    }

    /// Advance from selection to confirmation.
    pub fn next(&mut self) -> Result<(), WizardError> {
        match self.step {
            WizardStep::SelectDenomination => {
                self.step = WizardStep::Confirm;
                Ok(())
            }
            other => Err(WizardError::InvalidTransition(other.ordinal())),
        }
    }

    /// Retreat from confirmation to selection.
    pub fn back(&mut self) -> Result<(), WizardError> {
        match self.step {
            WizardStep::Confirm => {
                self.step = WizardStep::SelectDenomination;
                Ok(())
            }
            other => Err(WizardError::InvalidTransition(other.ordinal())),
        }
    }

    /// Fire the submission and advance to the success step.
    ///
    /// Advancement is unconditional: submission failure is logged but
    /// not modeled as a distinct state, matching the shipped flow.
    pub async fn confirm(
        &mut self,
        submitter: &dyn RedemptionSubmitter,
    ) -> Result<(), WizardError> {
        if self.step != WizardStep::Confirm {
            return Err(WizardError::InvalidTransition(self.step.ordinal()));
        }

        let submission = RedemptionSubmission {
            reward_id: self.reward.id.clone(),
            denomination: self.denomination,
            recipients: self.recipients.clone(),
            message: self.message.clone(),
            client_ref: uuid::Uuid::new_v4(),
        };

        match submitter.submit(&submission).await {
            Ok(receipt) => info!(
                "Redemption submitted for reward {} ({:?})",
                self.reward.id, receipt.redemption_id
            ),
            Err(e) => error!("Redemption submission failed: {}", e),
        }

        self.step = WizardStep::Success;
        Ok(())
    }

    /// Linger on the success screen, then invoke both completion hooks.
    /// There is no cancellation path once the success step is entered.
    pub async fn run_success_linger(&self, hooks: &WizardHooks) -> Result<(), WizardError> {
        if self.step != WizardStep::Success {
            return Err(WizardError::InvalidTransition(self.step.ordinal()));
        }

        sleep(self.config.success_linger).await;
        (hooks.on_complete)();
        (hooks.on_close)();
        Ok(())
    }
}
