//! Check-in station for event gifting.
//!
//! Binds a scan session to one event, reads decoded badge payloads
//! from a keyboard-wedge source on stdin, and runs the
//! scan-verify-refresh loop against the rewards platform until
//! interrupted.

use std::sync::Arc;

use event_analytics::{AnalyticsClient, ExportKind};
use platform_session::{SessionConfig, TenantSession};

mod station_manager;
mod stdin_source;

use station_manager::StationManager;

fn required_env(name: &str) -> anyhow::Result<String> {
    std::env::var(name).map_err(|_| anyhow::anyhow!("{} must be set", name))
}

fn parse_export_kind(value: &str) -> Option<ExportKind> {
    match value {
        "summary" => Some(ExportKind::Summary),
        "participation" => Some(ExportKind::Participation),
        "distribution" => Some(ExportKind::Distribution),
        "budget" => Some(ExportKind::Budget),
        _ => None,
    }
}

/// One-shot analytics export. The file is only written when the
/// platform returned the report; a failed export surfaces the reason
/// and produces nothing.
async fn run_export(session: Arc<TenantSession>, event_id: &str, kind: ExportKind) {
    let client = AnalyticsClient::new(session);
    match client.export(event_id, kind).await {
        Ok(file) => match std::fs::write(&file.filename, &file.bytes) {
            Ok(()) => log::info!("📄 Exported {} ({} bytes)", file.filename, file.bytes.len()),
            Err(e) => log::error!("❌ Could not write {}: {}", file.filename, e),
        },
        Err(e) => log::error!("❌ Export failed: {}", e),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    log::info!("🎫 Starting check-in station...");

    let base_url = std::env::var("PLATFORM_API_URL")
        .unwrap_or_else(|_| "http://localhost:8000".to_string());
    let tenant_id = required_env("PLATFORM_TENANT_ID")?;
    let event_id = required_env("STATION_EVENT_ID")?;

    let mut config = SessionConfig::new(base_url, tenant_id);
    if let Ok(token) = std::env::var("PLATFORM_AUTH_TOKEN") {
        config = config.with_auth_token(token);
    }

    let session = match TenantSession::new(config) {
        Ok(session) => Arc::new(session),
        Err(e) => {
            log::error!("❌ Failed to create platform session: {}", e);
            std::process::exit(1);
        }
    };

    log::info!("🌐 Platform API: tenant {}", session.tenant_id());
    log::info!("📋 Event: {}", event_id);

    if let Ok(kind) = std::env::var("STATION_EXPORT_KIND") {
        match parse_export_kind(&kind) {
            Some(kind) => run_export(session.clone(), &event_id, kind).await,
            None => log::error!("❌ Unknown export kind: {}", kind),
        }
    }

    let mut manager = StationManager::new(session, event_id);

    if let Err(e) = manager.start().await {
        log::error!("❌ Failed to start scan session: {}", e);
        std::process::exit(1);
    }

    log::info!("📱 Scanning. Present badges to the wedge reader; Ctrl-C to stop.");

    tokio::signal::ctrl_c().await?;

    log::info!("Shutting down...");
    manager.stop().await;

    if let Some(stats) = manager.stats().await {
        log::info!("Processed {} scans this session", stats.scans_processed);
    }

    Ok(())
}
