use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use platform_session::{ApiError, TenantSession, check_status};

/// Report flavor offered by the export endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    /// Executive summary with all metrics
    Summary,
    /// Department attendance breakdown
    Participation,
    /// Full distribution log with timestamps
    Distribution,
    /// Budget reconciliation by option
    Budget,
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportKind::Summary => "summary",
            ExportKind::Participation => "participation",
            ExportKind::Distribution => "distribution",
            ExportKind::Budget => "budget",
        };
        f.write_str(name)
    }
}

/// Request body for the export endpoint
#[derive(Debug, Serialize)]
struct ExportRequest {
    format: &'static str,
    #[serde(rename = "type")]
    kind: ExportKind,
}

/// A downloaded report: filename plus raw bytes.
///
/// Only produced for a successful export; a non-OK response surfaces
/// as an [`ApiError`] instead, so no file is ever written for a
/// failed export.
#[derive(Debug, Clone)]
pub struct ExportFile {
    /// Filename suggested by the server, or a local fallback
    pub filename: String,
    /// CSV payload
    pub bytes: Vec<u8>,
}

/// HTTP client for the analytics export endpoint
pub struct AnalyticsClient {
    session: Arc<TenantSession>,
}

impl AnalyticsClient {
    /// Create a client bound to the given tenant session.
    pub fn new(session: Arc<TenantSession>) -> Self {
        Self { session }
    }

    /// Export an analytics report as CSV.
    pub async fn export(&self, event_id: &str, kind: ExportKind) -> Result<ExportFile, ApiError> {
        debug!("Exporting {} report for event {}", kind, event_id);

        let response = self
            .session
            .post(&format!("/api/analytics/event/{}/export", event_id))
            .json(&ExportRequest {
                format: "csv",
                kind,
            })
            .send()
            .await
            .map_err(|e| ApiError::Network(format!("Export request failed: {}", e)))?;

        let response = check_status(response).await?;

        let filename = response
            .headers()
            .get("content-disposition")
            .and_then(|v| v.to_str().ok())
            .and_then(filename_from_disposition)
            .unwrap_or_else(|| format!("analytics_{}.csv", kind));

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Network(format!("Failed to read export body: {}", e)))?;

        Ok(ExportFile {
            filename,
            bytes: bytes.to_vec(),
        })
    }
}

/// Pull the suggested filename out of a `Content-Disposition` header
/// value, stripping any surrounding quotes.
fn filename_from_disposition(value: &str) -> Option<String> {
    let (_, suffix) = value.split_once("filename=")?;
    let name = suffix
        .split(';')
        .next()
        .unwrap_or(suffix)
        .trim()
        .trim_matches('"');
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use platform_session::SessionConfig;

    use super::*;

    // One-shot export endpoint: drains the request, answers with the
    // given status line, extra headers, and body.
    async fn serve_once(
        status_line: &'static str,
        extra_headers: &'static str,
        body: &'static str,
    ) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();

            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            let header_end = loop {
                let n = stream.read(&mut buf).await.unwrap();
                if n == 0 {
                    return;
                }
                request.extend_from_slice(&buf[..n]);
                if let Some(pos) = request.windows(4).position(|w| w == b"\r\n\r\n") {
                    break pos;
                }
            };
            let headers = String::from_utf8_lossy(&request[..header_end]).to_lowercase();
            let content_length = headers
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|value| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            while request.len() < header_end + 4 + content_length {
                let n = stream.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Length: {}\r\n{}Connection: close\r\n\r\n{}",
                status_line,
                body.len(),
                extra_headers,
                body
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.flush().await.unwrap();
        });

        format!("http://{}", addr)
    }

    async fn client_for(base_url: String) -> AnalyticsClient {
        let session = TenantSession::new(SessionConfig::new(base_url, "acme")).unwrap();
        AnalyticsClient::new(Arc::new(session))
    }

    #[tokio::test]
    async fn test_export_returns_bytes_and_suggested_filename() {
        let base_url = serve_once(
            "200 OK",
            "Content-Disposition: attachment; filename=summary_evt-001.csv\r\n",
            "metric,value\ncollected,3\n",
        )
        .await;
        let client = client_for(base_url).await;

        let file = client.export("evt-001", ExportKind::Summary).await.unwrap();

        assert_eq!(file.filename, "summary_evt-001.csv");
        assert_eq!(file.bytes, b"metric,value\ncollected,3\n");
    }

    #[tokio::test]
    async fn test_failed_export_surfaces_reason_and_yields_no_file() {
        let base_url = serve_once("500 Internal Server Error", "", "export failed").await;
        let client = client_for(base_url).await;

        // The error carries the failure reason; no ExportFile exists,
        // so nothing can be written to disk.
        match client.export("evt-001", ExportKind::Summary).await {
            Err(ApiError::Http { status, body }) => {
                assert_eq!(status, 500);
                assert_eq!(body, "export failed");
            }
            other => panic!("unexpected export result: {:?}", other),
        }
    }

    #[test]
    fn test_filename_from_disposition() {
        assert_eq!(
            filename_from_disposition("attachment; filename=summary_evt-001_20260115.csv"),
            Some("summary_evt-001_20260115.csv".to_string())
        );
        assert_eq!(
            filename_from_disposition("attachment; filename=\"report.csv\""),
            Some("report.csv".to_string())
        );
        assert_eq!(
            filename_from_disposition("attachment; filename=report.csv; size=42"),
            Some("report.csv".to_string())
        );
    }

    #[test]
    fn test_missing_filename_yields_none() {
        assert_eq!(filename_from_disposition("attachment"), None);
        assert_eq!(filename_from_disposition("attachment; filename="), None);
    }

    #[test]
    fn test_export_kind_serializes_lowercase() {
        let body = serde_json::to_value(ExportRequest {
            format: "csv",
            kind: ExportKind::Participation,
        })
        .unwrap();

        assert_eq!(body["format"], "csv");
        assert_eq!(body["type"], "participation");
    }

    #[test]
    fn test_export_kind_display() {
        assert_eq!(ExportKind::Summary.to_string(), "summary");
        assert_eq!(ExportKind::Budget.to_string(), "budget");
    }
}
