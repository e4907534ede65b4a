//! YouTube Live broadcast provisioning
//!
//! Creates a broadcast, creates an RTMP ingest stream, and binds the two.
//! The first failing step aborts the rest; nothing already created is
//! rolled back.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use thiserror::Error;
use tracing::{info, warn};

use super::oauth::AccessToken;

const API_BASE: &str = "https://www.googleapis.com/youtube/v3";

/// Broadcast visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Privacy {
    #[default]
    Public,
    Unlisted,
    Private,
}

impl Privacy {
    pub const ALL: [Privacy; 3] = [Privacy::Public, Privacy::Unlisted, Privacy::Private];

    pub fn as_str(&self) -> &'static str {
        match self {
            Privacy::Public => "public",
            Privacy::Unlisted => "unlisted",
            Privacy::Private => "private",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Privacy::Public => "Public",
            Privacy::Unlisted => "Unlisted",
            Privacy::Private => "Private",
        }
    }
}

/// Draft broadcast metadata edited in the YouTube panel
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastSettings {
    pub title: String,
    pub description: String,
    pub privacy: Privacy,
}

/// Ingest endpoint created for a broadcast
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestEndpoint {
    pub stream_id: String,
    pub server_url: String,
    pub stream_key: String,
}

/// Everything the operator needs to start pushing video
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestInfo {
    pub broadcast_id: String,
    pub stream_id: String,
    pub server_url: String,
    pub stream_key: String,
}

/// Provisioning steps, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionStep {
    CreateBroadcast,
    CreateIngestEndpoint,
    Bind,
}

impl fmt::Display for ProvisionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProvisionStep::CreateBroadcast => f.write_str("creating the broadcast"),
            ProvisionStep::CreateIngestEndpoint => f.write_str("creating the ingest stream"),
            ProvisionStep::Bind => f.write_str("binding broadcast and stream"),
        }
    }
}

/// Single API call failure
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("YouTube returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("unexpected response: {0}")]
    Malformed(String),
}

/// Provisioning failures
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("a title is required to create the broadcast")]
    MissingTitle,

    #[error("failed while {step}: {source}")]
    Step {
        step: ProvisionStep,
        #[source]
        source: ApiError,
    },
}

impl ProvisionError {
    fn at(step: ProvisionStep) -> impl FnOnce(ApiError) -> Self {
        move |source| ProvisionError::Step { step, source }
    }
}

/// Live-broadcast platform operations
#[async_trait]
pub trait BroadcastProvisioner: Send + Sync {
    /// Create a broadcast, returning its id
    async fn create_broadcast(&self, settings: &BroadcastSettings) -> Result<String, ApiError>;

    /// Create an RTMP ingest stream
    async fn create_ingest_endpoint(&self, title: &str) -> Result<IngestEndpoint, ApiError>;

    /// Bind a stream to a broadcast
    async fn bind(&self, broadcast_id: &str, stream_id: &str) -> Result<(), ApiError>;
}

/// Run the three provisioning steps in order
pub async fn provision(
    provisioner: &dyn BroadcastProvisioner,
    settings: &BroadcastSettings,
) -> Result<IngestInfo, ProvisionError> {
    if settings.title.trim().is_empty() {
        return Err(ProvisionError::MissingTitle);
    }

    let broadcast_id = provisioner
        .create_broadcast(settings)
        .await
        .map_err(ProvisionError::at(ProvisionStep::CreateBroadcast))?;
    info!("Created broadcast {}", broadcast_id);

    let endpoint = provisioner
        .create_ingest_endpoint(&settings.title)
        .await
        .map_err(|e| {
            warn!("Broadcast {} created but ingest stream failed", broadcast_id);
            ProvisionError::Step {
                step: ProvisionStep::CreateIngestEndpoint,
                source: e,
            }
        })?;
    info!("Created ingest stream {}", endpoint.stream_id);

    provisioner
        .bind(&broadcast_id, &endpoint.stream_id)
        .await
        .map_err(ProvisionError::at(ProvisionStep::Bind))?;
    info!("Bound stream {} to broadcast {}", endpoint.stream_id, broadcast_id);

    Ok(IngestInfo {
        broadcast_id,
        stream_id: endpoint.stream_id,
        server_url: endpoint.server_url,
        stream_key: endpoint.stream_key,
    })
}

#[derive(Debug, Deserialize)]
struct IdResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StreamResponse {
    id: String,
    cdn: Cdn,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Cdn {
    ingestion_info: IngestionInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IngestionInfo {
    stream_name: String,
    ingestion_address: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// YouTube Data API v3 client
#[derive(Debug, Clone)]
pub struct YouTubeClient {
    http: reqwest::Client,
    token: AccessToken,
    base_url: String,
}

impl YouTubeClient {
    pub fn new(token: AccessToken) -> Self {
        Self {
            http: reqwest::Client::new(),
            token,
            base_url: API_BASE.to_string(),
        }
    }

    async fn send<T: serde::de::DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T, ApiError> {
        let response = request.bearer_auth(&self.token.token).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorEnvelope>(&bytes)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| String::from_utf8_lossy(&bytes).trim().to_string());
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_slice(&bytes).map_err(|e| ApiError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl BroadcastProvisioner for YouTubeClient {
    async fn create_broadcast(&self, settings: &BroadcastSettings) -> Result<String, ApiError> {
        let body = broadcast_body(settings, &chrono::Utc::now().to_rfc3339());
        let request = self
            .http
            .post(format!("{}/liveBroadcasts", self.base_url))
            .query(&[("part", "snippet,contentDetails,status")])
            .json(&body);
        let response: IdResponse = self.send(request).await?;
        Ok(response.id)
    }

    async fn create_ingest_endpoint(&self, title: &str) -> Result<IngestEndpoint, ApiError> {
        let request = self
            .http
            .post(format!("{}/liveStreams", self.base_url))
            .query(&[("part", "snippet,cdn,status")])
            .json(&stream_body(title));
        let response: StreamResponse = self.send(request).await?;
        Ok(IngestEndpoint {
            stream_id: response.id,
            server_url: response.cdn.ingestion_info.ingestion_address,
            stream_key: response.cdn.ingestion_info.stream_name,
        })
    }

    async fn bind(&self, broadcast_id: &str, stream_id: &str) -> Result<(), ApiError> {
        let request = self
            .http
            .post(format!("{}/liveBroadcasts/bind", self.base_url))
            .query(&[
                ("part", "id,snippet,contentDetails,status"),
                ("id", broadcast_id),
                ("streamId", stream_id),
            ]);
        let _: IdResponse = self.send(request).await?;
        Ok(())
    }
}

fn broadcast_body(settings: &BroadcastSettings, scheduled_start: &str) -> serde_json::Value {
    json!({
        "snippet": {
            "title": settings.title,
            "description": settings.description,
            "scheduledStartTime": scheduled_start,
        },
        "contentDetails": {
            "isReusable": true,
        },
        "status": {
            "privacyStatus": settings.privacy.as_str(),
        },
    })
}

fn stream_body(title: &str) -> serde_json::Value {
    json!({
        "snippet": { "title": title },
        "cdn": {
            "format": "1080p",
            "ingestionType": "rtmp",
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct FakeProvisioner {
        fail_at: Option<ProvisionStep>,
        calls: Mutex<Vec<ProvisionStep>>,
        bound: Mutex<Option<(String, String)>>,
    }

    impl FakeProvisioner {
        fn step(&self, step: ProvisionStep) -> Result<(), ApiError> {
            self.calls.lock().push(step);
            if self.fail_at == Some(step) {
                return Err(ApiError::Status {
                    status: 403,
                    message: "liveStreamingNotEnabled".to_string(),
                });
            }
            Ok(())
        }
    }

    #[async_trait]
    impl BroadcastProvisioner for FakeProvisioner {
        async fn create_broadcast(&self, _settings: &BroadcastSettings) -> Result<String, ApiError> {
            self.step(ProvisionStep::CreateBroadcast)?;
            Ok("bc-1".to_string())
        }

        async fn create_ingest_endpoint(&self, _title: &str) -> Result<IngestEndpoint, ApiError> {
            self.step(ProvisionStep::CreateIngestEndpoint)?;
            Ok(IngestEndpoint {
                stream_id: "st-1".to_string(),
                server_url: "rtmp://a.rtmp.youtube.com/live2".to_string(),
                stream_key: "abcd-efgh".to_string(),
            })
        }

        async fn bind(&self, broadcast_id: &str, stream_id: &str) -> Result<(), ApiError> {
            self.step(ProvisionStep::Bind)?;
            *self.bound.lock() = Some((broadcast_id.to_string(), stream_id.to_string()));
            Ok(())
        }
    }

    fn settings(title: &str) -> BroadcastSettings {
        BroadcastSettings {
            title: title.to_string(),
            description: "desc".to_string(),
            privacy: Privacy::Unlisted,
        }
    }

    #[tokio::test]
    async fn test_provision_runs_all_steps_in_order() {
        let fake = FakeProvisioner::default();
        let info = provision(&fake, &settings("My Stream")).await.unwrap();

        assert_eq!(
            *fake.calls.lock(),
            [ProvisionStep::CreateBroadcast, ProvisionStep::CreateIngestEndpoint, ProvisionStep::Bind]
        );
        assert_eq!(*fake.bound.lock(), Some(("bc-1".to_string(), "st-1".to_string())));
        assert_eq!(info.server_url, "rtmp://a.rtmp.youtube.com/live2");
        assert_eq!(info.stream_key, "abcd-efgh");
        assert_eq!(info.broadcast_id, "bc-1");
    }

    #[tokio::test]
    async fn test_missing_title_makes_no_calls() {
        let fake = FakeProvisioner::default();
        let result = provision(&fake, &settings("   ")).await;
        assert!(matches!(result, Err(ProvisionError::MissingTitle)));
        assert!(fake.calls.lock().is_empty());
    }

    #[tokio::test]
    async fn test_failure_aborts_remaining_steps() {
        let fake = FakeProvisioner {
            fail_at: Some(ProvisionStep::CreateIngestEndpoint),
            ..Default::default()
        };
        let err = provision(&fake, &settings("My Stream")).await.unwrap_err();

        match &err {
            ProvisionError::Step { step, .. } => assert_eq!(*step, ProvisionStep::CreateIngestEndpoint),
            other => panic!("unexpected error {other:?}"),
        }
        assert!(err.to_string().contains("liveStreamingNotEnabled"));
        // Broadcast stays created; bind never attempted
        assert_eq!(
            *fake.calls.lock(),
            [ProvisionStep::CreateBroadcast, ProvisionStep::CreateIngestEndpoint]
        );
        assert!(fake.bound.lock().is_none());
    }

    #[tokio::test]
    async fn test_bind_failure_reported() {
        let fake = FakeProvisioner {
            fail_at: Some(ProvisionStep::Bind),
            ..Default::default()
        };
        let err = provision(&fake, &settings("My Stream")).await.unwrap_err();
        assert!(matches!(err, ProvisionError::Step { step: ProvisionStep::Bind, .. }));
    }

    #[test]
    fn test_broadcast_body_shape() {
        let body = broadcast_body(&settings("Title"), "2026-10-19T12:00:00+00:00");
        assert_eq!(body["snippet"]["title"], "Title");
        assert_eq!(body["snippet"]["scheduledStartTime"], "2026-10-19T12:00:00+00:00");
        assert_eq!(body["status"]["privacyStatus"], "unlisted");
        assert_eq!(body["contentDetails"]["isReusable"], true);
    }

    #[test]
    fn test_stream_body_shape() {
        let body = stream_body("Title");
        assert_eq!(body["cdn"]["ingestionType"], "rtmp");
        assert_eq!(body["cdn"]["format"], "1080p");
    }

    #[test]
    fn test_stream_response_parse() {
        let parsed: StreamResponse = serde_json::from_str(
            r#"{"id":"st-9","cdn":{"ingestionType":"rtmp","ingestionInfo":{"streamName":"key-1","ingestionAddress":"rtmp://x/live2"}}}"#,
        )
        .unwrap();
        assert_eq!(parsed.id, "st-9");
        assert_eq!(parsed.cdn.ingestion_info.stream_name, "key-1");
        assert_eq!(parsed.cdn.ingestion_info.ingestion_address, "rtmp://x/live2");
    }

    #[test]
    fn test_privacy_serde() {
        assert_eq!(serde_json::to_string(&Privacy::Private).unwrap(), "\"private\"");
        let p: Privacy = serde_json::from_str("\"unlisted\"").unwrap();
        assert_eq!(p, Privacy::Unlisted);
    }
}
