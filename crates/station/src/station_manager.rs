use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info};

use checkin_scan::{ScanController, ScannerClient, WedgeDecoder};
use platform_session::TenantSession;

use crate::stdin_source::StdinWedgeSource;

/// Manager for the station's scan session.
///
/// Owns the controller and the background task driving its loop, and
/// makes sure the capture source is released on stop or drop.
pub struct StationManager {
    session: Arc<TenantSession>,
    event_id: String,
    controller: Option<Arc<ScanController>>,
    loop_handle: Option<JoinHandle<()>>,
}

/// Point-in-time statistics for the station session
#[derive(Debug)]
pub struct StationStats {
    /// Whether the capture loop is live
    pub is_scanning: bool,
    /// Payloads processed since start
    pub scans_processed: u64,
    /// Last surfaced error, if any
    pub last_error: Option<String>,
}

impl StationManager {
    /// Create a manager bound to an event.
    pub fn new(session: Arc<TenantSession>, event_id: String) -> Self {
        Self {
            session,
            event_id,
            controller: None,
            loop_handle: None,
        }
    }

    /// Build the scan controller, load the opening dashboard, and start
    /// the capture loop on a background task.
    pub async fn start(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        info!("Starting scan session for event {}", self.event_id);

        let gateway = Arc::new(ScannerClient::new(self.session.clone()));
        let source = Arc::new(StdinWedgeSource::new());

        let controller = Arc::new(ScanController::new(
            gateway,
            source,
            Arc::new(WedgeDecoder),
            self.event_id.clone(),
            None,
        ));

        // Opening inventory snapshot; a cold dashboard is not fatal,
        // the first processed scan refreshes it anyway.
        if let Err(e) = controller.load_dashboard().await {
            error!("Could not load opening dashboard: {}", e);
        }

        controller.start_capture().await?;

        let loop_controller = controller.clone();
        let handle = tokio::spawn(async move {
            if let Err(e) = loop_controller.run().await {
                error!("Scan loop failed: {}", e);
            }
        });

        self.controller = Some(controller);
        self.loop_handle = Some(handle);

        info!("Scan session started");
        Ok(())
    }

    /// Stop the capture loop and release the source.
    pub async fn stop(&mut self) {
        if let Some(controller) = &self.controller {
            controller.stop_capture().await;
        }

        if let Some(handle) = self.loop_handle.take() {
            handle.abort();
            let _ = handle.await;
        }

        info!("Scan session stopped");
    }

    /// Statistics for the current session, if one is running.
    pub async fn stats(&self) -> Option<StationStats> {
        let controller = self.controller.as_ref()?;
        let session = controller.snapshot().await;
        Some(StationStats {
            is_scanning: session.is_scanning,
            scans_processed: session.scans_processed,
            last_error: session.last_error,
        })
    }
}

impl Drop for StationManager {
    fn drop(&mut self) {
        if let Some(handle) = self.loop_handle.take() {
            handle.abort();
        }
    }
}
