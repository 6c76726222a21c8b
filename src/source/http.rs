//! HTTP document source.
//!
//! Issues a single GET per fetch with [`reqwest`].  Non-2xx responses are
//! turned into [`FetchError::Status`]; transport failures keep reqwest's
//! error text together with its causes.

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, StatusCode};
use url::Url;

use super::{DocumentSource, FetchError};

/// Fetches documents over `http` / `https`.
#[derive(Default)]
pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a non-success status to the error the user sees.
    ///
    /// Pure so the status text can be checked without a server.
    pub fn status_error(status: StatusCode) -> FetchError {
        FetchError::Status {
            code: status.as_u16(),
            text: status.canonical_reason().unwrap_or_default().to_string(),
        }
    }
}

#[async_trait]
impl DocumentSource for HttpSource {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        debug!("GET {url}");
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Self::status_error(status));
        }
        Ok(response.text().await?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response on a loopback port.
    async fn serve_once(response: &'static str) -> Url {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 1024];
            let _ = socket.read(&mut request).await;
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });
        Url::parse(&format!("http://{addr}/readme.md")).unwrap()
    }

    /// A loopback URL nothing listens on.
    async fn closed_port() -> Url {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        Url::parse(&format!("http://{addr}/readme.md")).unwrap()
    }

    // -- status mapping ------------------------------------------------------

    #[test]
    fn status_error_uses_canonical_reason() {
        let err = HttpSource::status_error(StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "HTTP 404 Not Found");
    }

    #[test]
    fn status_error_for_server_error() {
        let err = HttpSource::status_error(StatusCode::SERVICE_UNAVAILABLE);
        assert!(matches!(err, FetchError::Status { code: 503, .. }));
    }

    #[test]
    fn status_error_without_reason_is_code_only() {
        let status = StatusCode::from_u16(599).unwrap();
        assert_eq!(HttpSource::status_error(status).to_string(), "HTTP 599");
    }

    #[test]
    fn name_is_http() {
        assert_eq!(HttpSource::new().name(), "http");
    }

    // -- fetch ---------------------------------------------------------------

    #[tokio::test]
    async fn fetch_returns_body_on_success() {
        let url = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Length: 5\r\nConnection: close\r\n\r\n# Hi\n",
        )
        .await;
        let body = HttpSource::new().fetch(&url).await.unwrap();
        assert_eq!(body, "# Hi\n");
    }

    #[tokio::test]
    async fn fetch_maps_not_found_to_status_error() {
        let url = serve_once(
            "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        )
        .await;
        let err = HttpSource::new().fetch(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::Status { code: 404, .. }));
        assert_eq!(err.to_string(), "HTTP 404 Not Found");
    }

    #[tokio::test]
    async fn fetch_reports_refused_connection_with_cause() {
        let url = closed_port().await;
        let err = HttpSource::new().fetch(&url).await.unwrap_err();
        let FetchError::Transport(inner) = &err else {
            panic!("expected a transport error, got {err:?}");
        };

        let message = err.to_string();
        assert!(message.starts_with(&inner.to_string()));

        let mut root = inner.source().expect("reqwest error has a cause");
        while let Some(next) = root.source() {
            root = next;
        }
        assert!(
            message.contains(&root.to_string()),
            "{message:?} does not mention {root}"
        );
    }
}
