//! HTTP backend using reqwest.
//!
//! Both endpoints are plain `GET`s against one base address. Bodies are
//! read as bytes and decoded separately, so a transport failure and a
//! schema mismatch always surface as different [`SourceError`] variants.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use super::error::{Endpoint, SourceError};
use super::payload::{DataPayload, MetricsPayload};
use super::Backend;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_DATA_PATH: &str = "/api/data";
pub const DEFAULT_METRICS_PATH: &str = "/api/metrics";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Backend reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
    data_path: String,
    metrics_path: String,
    description: String,
}

impl HttpBackend {
    /// Create a new builder for configuring the backend.
    pub fn builder() -> HttpBackendBuilder {
        HttpBackendBuilder::default()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: Endpoint) -> String {
        let path = match endpoint {
            Endpoint::Data => &self.data_path,
            Endpoint::Metrics => &self.metrics_path,
        };
        format!("{}{}", self.base_url, path)
    }

    async fn fetch_json<T: DeserializeOwned>(&self, endpoint: Endpoint) -> Result<T, SourceError> {
        let response = self
            .client
            .get(self.url(endpoint))
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SourceError::Status(response.status().as_u16()));
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|source| SourceError::Payload { endpoint, source })
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn fetch_data(&self) -> Result<DataPayload, SourceError> {
        self.fetch_json(Endpoint::Data).await
    }

    async fn fetch_metrics(&self) -> Result<MetricsPayload, SourceError> {
        self.fetch_json(Endpoint::Metrics).await
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Builder for [`HttpBackend`].
#[derive(Debug, Default)]
pub struct HttpBackendBuilder {
    base_url: Option<String>,
    data_path: Option<String>,
    metrics_path: Option<String>,
    timeout: Option<Duration>,
}

impl HttpBackendBuilder {
    /// Set the base address (default: "http://localhost:5000").
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the data endpoint path (default: "/api/data").
    pub fn data_path(mut self, path: impl Into<String>) -> Self {
        self.data_path = Some(path.into());
        self
    }

    /// Set the metrics endpoint path (default: "/api/metrics").
    pub fn metrics_path(mut self, path: impl Into<String>) -> Self {
        self.metrics_path = Some(path.into());
        self
    }

    /// Set the per-request timeout (default: 5 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the backend.
    pub fn build(self) -> Result<HttpBackend, SourceError> {
        let client = Client::builder()
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build()?;

        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(HttpBackend {
            client,
            description: format!("http: {}", base_url),
            base_url,
            data_path: normalize_path(self.data_path.as_deref().unwrap_or(DEFAULT_DATA_PATH)),
            metrics_path: normalize_path(
                self.metrics_path.as_deref().unwrap_or(DEFAULT_METRICS_PATH),
            ),
        })
    }
}

fn normalize_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response per accepted connection.
    async fn serve(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 1024];
                let _ = socket.read(&mut buf).await;
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        format!("http://{}", addr)
    }

    #[test]
    fn test_builder_defaults() {
        let backend = HttpBackend::builder().build().unwrap();
        assert_eq!(backend.base_url(), "http://localhost:5000");
        assert_eq!(backend.url(Endpoint::Data), "http://localhost:5000/api/data");
        assert_eq!(backend.url(Endpoint::Metrics), "http://localhost:5000/api/metrics");
        assert_eq!(backend.description(), "http: http://localhost:5000");
    }

    #[test]
    fn test_builder_custom() {
        let backend = HttpBackend::builder()
            .base_url("http://sensors.local:8000/")
            .data_path("v2/data")
            .metrics_path("/v2/metrics")
            .timeout(Duration::from_millis(250))
            .build()
            .unwrap();

        assert_eq!(backend.url(Endpoint::Data), "http://sensors.local:8000/v2/data");
        assert_eq!(backend.url(Endpoint::Metrics), "http://sensors.local:8000/v2/metrics");
    }

    #[tokio::test]
    async fn test_fetch_data() {
        let base = serve(
            "200 OK",
            r#"{"data_points":[{"datetime":"2024-03-01 10:15:00","Current":1.2}],"anomaly_flags":[1]}"#,
        )
        .await;
        let backend = HttpBackend::builder().base_url(base).build().unwrap();

        let payload = backend.fetch_data().await.unwrap();
        assert_eq!(payload.data_points.len(), 1);
        assert_eq!(payload.data_points[0].current, 1.2);
        assert!(payload.anomaly_flags[0].is_anomalous());
    }

    #[tokio::test]
    async fn test_fetch_metrics() {
        let base = serve(
            "200 OK",
            r#"{"total_points":42,"anomalies_detected":3,"average_processing_time":0.8,"average_current_value":1.1}"#,
        )
        .await;
        let backend = HttpBackend::builder().base_url(base).build().unwrap();

        let payload = backend.fetch_metrics().await.unwrap();
        assert_eq!(payload.total_points, 42);
        assert_eq!(payload.anomalies_detected, 3);
    }

    #[tokio::test]
    async fn test_malformed_body_is_payload_error() {
        let base = serve("200 OK", r#"{"data_points":"nope"}"#).await;
        let backend = HttpBackend::builder().base_url(base).build().unwrap();

        match backend.fetch_data().await {
            Err(SourceError::Payload { endpoint, .. }) => assert_eq!(endpoint, Endpoint::Data),
            other => panic!("expected payload error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_server_error_is_status_error() {
        let base = serve("500 Internal Server Error", "{}").await;
        let backend = HttpBackend::builder().base_url(base).build().unwrap();

        match backend.fetch_metrics().await {
            Err(SourceError::Status(code)) => assert_eq!(code, 500),
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_connection_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let backend = HttpBackend::builder()
            .base_url(format!("http://{}", addr))
            .timeout(Duration::from_secs(2))
            .build()
            .unwrap();

        assert!(matches!(
            backend.fetch_data().await,
            Err(SourceError::Connection(_)) | Err(SourceError::Timeout)
        ));
    }
}
