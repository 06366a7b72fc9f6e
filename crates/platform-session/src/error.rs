use reqwest::Response;

/// Custom error type for platform API operations
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    /// HTTP transport failure (connection, timeout, DNS)
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success HTTP status not covered by a more specific variant
    #[error("API error: HTTP {status} - {body}")]
    Http {
        /// Status code returned by the server
        status: u16,
        /// Response body, for the error banner
        body: String,
    },

    /// Rate limited by the platform API
    #[error("Rate limited by platform API")]
    RateLimited,

    /// Authentication or tenant header rejected
    #[error("Authentication failed with platform API")]
    AuthenticationFailed,

    /// Resource not found
    #[error("Resource not found")]
    NotFound,

    /// Response body did not match the expected shape
    #[error("Data format error: {0}")]
    DataFormat(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// Translate a non-success HTTP response into the matching variant,
    /// consuming the body for the generic case.
    pub async fn from_response(response: Response) -> Self {
        let status = response.status();
        match status.as_u16() {
            429 => ApiError::RateLimited,
            401 | 403 => ApiError::AuthenticationFailed,
            404 => ApiError::NotFound,
            code => {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unable to read response body".to_string());
                ApiError::Http { status: code, body }
            }
        }
    }
}

/// Return the response unchanged when it carries a success status,
/// otherwise map it through [`ApiError::from_response`].
pub async fn check_status(response: Response) -> Result<Response, ApiError> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(ApiError::from_response(response).await)
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;
    use crate::session::{SessionConfig, TenantSession};

    // One-shot HTTP server: answers the first connection with the
    // given status line and body, then goes away.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();

            // Drain the full request before answering so the client
            // never sees a reset mid-write.
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
                "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.flush().await.unwrap();
        });

        format!("http://{}", addr)
    }

    async fn error_for(status_line: &'static str, body: &'static str) -> ApiError {
        let base_url = serve_once(status_line, body).await;
        let session = TenantSession::new(SessionConfig::new(base_url, "acme")).unwrap();
        let response = session.get("/anything").send().await.unwrap();
        match check_status(response).await {
            Ok(_) => panic!("expected an error for {}", status_line),
            Err(e) => e,
        }
    }

    #[tokio::test]
    async fn test_success_passes_through_check_status() {
        let base_url = serve_once("200 OK", "fine").await;
        let session = TenantSession::new(SessionConfig::new(base_url, "acme")).unwrap();
        let response = session.get("/anything").send().await.unwrap();

        let response = check_status(response).await.unwrap();
        assert_eq!(response.text().await.unwrap(), "fine");
    }

    #[tokio::test]
    async fn test_rate_limit_status_maps_to_rate_limited() {
        assert!(matches!(
            error_for("429 Too Many Requests", "").await,
            ApiError::RateLimited
        ));
    }

    #[tokio::test]
    async fn test_auth_statuses_map_to_authentication_failed() {
        assert!(matches!(
            error_for("401 Unauthorized", "").await,
            ApiError::AuthenticationFailed
        ));
        assert!(matches!(
            error_for("403 Forbidden", "").await,
            ApiError::AuthenticationFailed
        ));
    }

    #[tokio::test]
    async fn test_missing_resource_maps_to_not_found() {
        assert!(matches!(
            error_for("404 Not Found", "").await,
            ApiError::NotFound
        ));
    }

    #[tokio::test]
    async fn test_other_statuses_carry_code_and_body() {
        match error_for("500 Internal Server Error", "boom").await {
            ApiError::Http { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
