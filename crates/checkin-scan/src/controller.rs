use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::{interval, sleep};
use tracing::{debug, info, warn};

use platform_session::ApiError;

use crate::capture::{CaptureError, FrameSource, QrDecoder};
use crate::scan_types::{
    CollectionDetail, FeedbackCue, Inventory, ScanError, ScanOutcome, ScannerDashboard,
    VerifyRequest, VerifyResponse,
};

/// Gateway to the scanner endpoints.
///
/// The controller talks to the platform only through this trait so the
/// loop can be exercised without a network.
#[async_trait::async_trait]
pub trait ScannerGateway: Send + Sync {
    /// Submit a decoded payload for verification and collection.
    async fn verify(&self, request: &VerifyRequest) -> Result<VerifyResponse, ApiError>;

    /// Fetch the dashboard aggregate for the event.
    async fn dashboard(&self, event_id: &str) -> Result<ScannerDashboard, ApiError>;
}

/// Phase of the scan loop.
///
/// An explicit two-state machine: decoding is only attempted in
/// `IdleScanning`, so at most one verification request is ever
/// outstanding. Mutual exclusion is control flow, not locking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPhase {
    /// Sampling frames, looking for a payload
    IdleScanning,
    /// A payload was handed to the verification handler; sampling is
    /// paused until processing and the cool-down complete
    AwaitingVerification,
}

/// Transient, process-local state of one scanner session.
///
/// Created when the station binds to an event, discarded on teardown.
#[derive(Debug, Clone)]
pub struct ScanSession {
    /// Event this session is bound to
    pub event_id: String,
    /// Whether the capture loop is live
    pub is_scanning: bool,
    /// Current loop phase
    pub phase: ScanPhase,
    /// Most recently decoded payload
    pub last_payload: Option<String>,
    /// Outcome of the most recent scan, held for the cool-down display
    /// window and then cleared
    pub last_outcome: Option<ScanOutcome>,
    /// Feedback cue for the most recent scan, cleared with the outcome
    pub last_feedback: Option<FeedbackCue>,
    /// Latest inventory snapshot from the dashboard
    pub inventory: Option<Inventory>,
    /// Bounded list of recent collections
    pub recent_collections: VecDeque<CollectionDetail>,
    /// Last surfaced error message, if any
    pub last_error: Option<String>,
    /// Number of payloads processed since the session started
    pub scans_processed: u64,
}

impl ScanSession {
    fn new(event_id: String) -> Self {
        Self {
            event_id,
            is_scanning: false,
            phase: ScanPhase::IdleScanning,
            last_payload: None,
            last_outcome: None,
            last_feedback: None,
            inventory: None,
            recent_collections: VecDeque::new(),
            last_error: None,
            scans_processed: 0,
        }
    }
}

/// Configuration for the scan loop controller
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Interval between frame samples (default: 33ms, one display tick)
    pub frame_interval: Duration,

    /// Pause after a processed scan before sampling resumes, so a
    /// badge still in camera view is not submitted twice
    /// (default: 2 seconds)
    pub verify_cooldown: Duration,

    /// Maximum recent collections kept in the session (default: 20)
    pub history_capacity: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            frame_interval: Duration::from_millis(33),
            verify_cooldown: Duration::from_secs(2),
            history_capacity: 20,
        }
    }
}

/// Camera-driven scan loop controller.
///
/// Owns the frame source for the lifetime of a session, samples frames
/// for payloads, hands decoded payloads to the verification gateway,
/// and refreshes the inventory snapshot after every processed scan.
pub struct ScanController {
    gateway: Arc<dyn ScannerGateway>,
    source: Arc<dyn FrameSource>,
    decoder: Arc<dyn QrDecoder>,
    session: Arc<RwLock<ScanSession>>,
    event_id: String,
    config: ScanConfig,
}

impl ScanController {
    /// Create a controller bound to an event.
    pub fn new(
        gateway: Arc<dyn ScannerGateway>,
        source: Arc<dyn FrameSource>,
        decoder: Arc<dyn QrDecoder>,
        event_id: impl Into<String>,
        config: Option<ScanConfig>,
    ) -> Self {
        let event_id = event_id.into();
        Self {
            gateway,
            source,
            decoder,
            session: Arc::new(RwLock::new(ScanSession::new(event_id.clone()))),
            event_id,
            config: config.unwrap_or_default(),
        }
    }

    /// Shared handle to the session state, for views and managers.
    pub fn session_handle(&self) -> Arc<RwLock<ScanSession>> {
        self.session.clone()
    }

    /// Point-in-time copy of the session state.
    pub async fn snapshot(&self) -> ScanSession {
        self.session.read().await.clone()
    }

    /// Fetch the dashboard aggregate and replace the inventory snapshot
    /// and recent-collection list wholesale.
    pub async fn load_dashboard(&self) -> Result<(), ScanError> {
        match self.gateway.dashboard(&self.event_id).await {
            Ok(dashboard) => {
                let mut session = self.session.write().await;
                session.recent_collections = dashboard
                    .recent_collections
                    .into_iter()
                    .take(self.config.history_capacity)
                    .collect();
                session.inventory = Some(dashboard.inventory);
                session.last_error = None;
                Ok(())
            }
            Err(e) => {
                self.session.write().await.last_error = Some(e.to_string());
                Err(e.into())
            }
        }
    }

    /// Acquire the capture stream and mark the session as scanning.
    ///
    /// Permission denial is terminal for the session: the error is
    /// recorded, `is_scanning` stays false, and the user retries
    /// manually.
    pub async fn start_capture(&self) -> Result<(), ScanError> {
        if self.session.read().await.is_scanning {
            return Ok(());
        }

        if let Err(e) = self.source.open().await {
            let mut session = self.session.write().await;
            session.last_error = Some(e.to_string());
            session.is_scanning = false;
            return Err(ScanError::Capture(e));
        }

        let mut session = self.session.write().await;
        session.is_scanning = true;
        session.phase = ScanPhase::IdleScanning;
        session.last_error = None;
        info!("Capture started for event {}", self.event_id);
        Ok(())
    }

    /// Release the capture stream and stop sampling.
    ///
    /// A no-op when nothing is active; does not abort an in-flight
    /// verification, it only prevents further frame sampling.
    pub async fn stop_capture(&self) {
        self.source.release().await;

        let mut session = self.session.write().await;
        if session.is_scanning {
            info!("Capture stopped for event {}", self.event_id);
        }
        session.is_scanning = false;
        session.phase = ScanPhase::IdleScanning;
    }

    /// Drive the sampling loop until the stream closes or the session
    /// is stopped.
    ///
    /// Each tick yields back to the runtime; a decoded payload pauses
    /// sampling for the verification round-trip plus the cool-down
    /// before the loop resumes.
    pub async fn run(&self) -> Result<(), ScanError> {
        let mut tick = interval(self.config.frame_interval);

        loop {
            tick.tick().await;

            if !self.session.read().await.is_scanning {
                break;
            }

            let frame = match self.source.grab().await {
                Ok(Some(frame)) => frame,
                Ok(None) => continue,
                Err(CaptureError::Closed) => {
                    info!("Capture stream closed for event {}", self.event_id);
                    self.stop_capture().await;
                    break;
                }
                Err(e) => {
                    warn!("Frame capture failed: {}", e);
                    continue;
                }
            };

            let Some(payload) = self.decoder.decode(&frame) else {
                continue;
            };

            self.process_payload(payload).await;

            // The outcome stays on screen for the cool-down window,
            // then the display resets and sampling resumes.
            sleep(self.config.verify_cooldown).await;
            {
                let mut session = self.session.write().await;
                session.last_outcome = None;
                session.last_feedback = None;
                session.phase = ScanPhase::IdleScanning;
            }
        }

        Ok(())
    }

    /// Verification handler: submit the payload, record the outcome,
    /// and re-fetch the dashboard so displayed counts match server
    /// truth. Failures become an `ERROR` outcome; a fresh scan is the
    /// retry mechanism.
    async fn process_payload(&self, payload: String) {
        {
            let mut session = self.session.write().await;
            session.phase = ScanPhase::AwaitingVerification;
            session.last_payload = Some(payload.clone());
        }

        let request = VerifyRequest {
            qr_token: payload,
            event_id: self.event_id.clone(),
        };

        let outcome = match self.gateway.verify(&request).await {
            Ok(response) => ScanOutcome::from(response),
            Err(e) => {
                warn!("Verification request failed: {}", e);
                ScanOutcome::transport_error("Failed to process scan")
            }
        };

        match &outcome {
            ScanOutcome::Success {
                user_name,
                remaining_stock,
                ..
            } => info!(
                "Gift collected for {:?}, {} remaining",
                user_name, remaining_stock
            ),
            ScanOutcome::AlreadyCollected { collected_at, .. } => {
                warn!("Double scan: already collected at {:?}", collected_at)
            }
            ScanOutcome::Error { status, message } => {
                debug!("Scan rejected: {} - {}", status, message)
            }
        }

        let feedback = outcome.feedback();
        {
            let mut session = self.session.write().await;
            session.last_outcome = Some(outcome);
            session.last_feedback = Some(feedback);
            session.scans_processed += 1;
        }

        if let Err(e) = self.load_dashboard().await {
            warn!("Inventory refresh failed after scan: {}", e);
        }
    }
}
