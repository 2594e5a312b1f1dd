use std::path::Path;
use std::time::Duration;

use reqwest::Client;
use reqwest::multipart::{Form, Part};
use sha2::{Digest, Sha256};
use tracing::{error, info};

use crate::config::CloudinaryConfig;
use crate::constants::REQUEST_TIMEOUT_SECS;
use crate::domain::HostedMedia;
use crate::error::{PublishError, Result, require_str};
use crate::services::graph::parse_body;

/// Signed uploads to a Cloudinary account.
#[derive(Clone)]
pub struct CloudinaryClient {
    cloud_name: String,
    api_key: String,
    api_secret: String,
    base_url: String,
    http: Client,
}

impl CloudinaryClient {
    pub fn new(
        cloud_name: &str,
        api_key: &str,
        api_secret: &str,
        base_url: &str,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            cloud_name: cloud_name.to_string(),
            api_key: api_key.to_string(),
            api_secret: api_secret.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn from_config(config: &CloudinaryConfig) -> Result<Self> {
        let cloud_name = config
            .cloud_name
            .as_deref()
            .ok_or(PublishError::MissingConfig("CLOUDINARY_CLOUD_NAME"))?;
        let api_key = config
            .api_key
            .as_deref()
            .ok_or(PublishError::MissingConfig("CLOUDINARY_API_KEY"))?;
        let api_secret = config
            .api_secret
            .as_deref()
            .ok_or(PublishError::MissingConfig("CLOUDINARY_API_SECRET"))?;

        Self::new(cloud_name, api_key, api_secret, &config.base_url)
    }

    /// Upload a local video and return its HTTPS delivery URL.
    pub async fn upload_video(&self, path: &Path) -> Result<HostedMedia> {
        self.upload_video_at(path, chrono::Utc::now().timestamp()).await
    }

    async fn upload_video_at(&self, path: &Path, timestamp: i64) -> Result<HostedMedia> {
        info!(path = %path.display(), cloud = %self.cloud_name, "uploading to Cloudinary");

        let data = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "video.mp4".to_string());

        let part = Part::bytes(data)
            .file_name(file_name)
            .mime_str("video/mp4")?;

        let timestamp = timestamp.to_string();
        let signature = sign_params(&[("timestamp", timestamp.as_str())], &self.api_secret);

        let form = Form::new()
            .text("api_key", self.api_key.clone())
            .text("timestamp", timestamp)
            .text("signature", signature)
            .text("signature_algorithm", "sha256")
            .part("file", part);

        let url = format!("{}/v1_1/{}/video/upload", self.base_url, self.cloud_name);
        let resp = self.http.post(&url).multipart(form).send().await?;

        let status = resp.status();
        let text = resp.text().await?;
        let body = parse_body(&text);

        if !status.is_success() {
            error!(status = status.as_u16(), body = %body, "Cloudinary upload failed");
            return Err(PublishError::Api { status, url, body });
        }

        let secure_url = require_str(&body, "secure_url", "Cloudinary upload")?;
        let public_id = body
            .get("public_id")
            .and_then(|v| v.as_str())
            .map(str::to_string);

        info!(url = %secure_url, "Cloudinary upload OK");
        Ok(HostedMedia {
            secure_url,
            public_id,
        })
    }
}

/// Cloudinary request signature: params sorted by name, joined as
/// `k=v&k=v`, followed by the API secret, hashed with SHA-256.
pub fn sign_params(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted = params.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(joined.as_bytes());
    hasher.update(api_secret.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> CloudinaryClient {
        CloudinaryClient::new("demo", "key", "secret", &server.uri()).unwrap()
    }

    fn temp_video() -> tempfile::NamedTempFile {
        let file = tempfile::Builder::new().suffix(".mp4").tempfile().unwrap();
        std::fs::write(file.path(), b"not really an mp4").unwrap();
        file
    }

    #[test]
    fn signature_is_order_independent_hex() {
        let a = sign_params(&[("timestamp", "1315060510"), ("eager", "w_400")], "secret");
        let b = sign_params(&[("eager", "w_400"), ("timestamp", "1315060510")], "secret");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));

        let other = sign_params(&[("timestamp", "1315060510")], "other-secret");
        assert_ne!(
            sign_params(&[("timestamp", "1315060510")], "secret"),
            other
        );
    }

    #[test]
    fn from_config_requires_credentials() {
        let config = CloudinaryConfig {
            cloud_name: Some("demo".into()),
            api_key: None,
            api_secret: Some("secret".into()),
            base_url: "https://api.cloudinary.com".into(),
        };
        assert!(matches!(
            CloudinaryClient::from_config(&config),
            Err(PublishError::MissingConfig("CLOUDINARY_API_KEY"))
        ));
    }

    #[tokio::test]
    async fn upload_returns_secure_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1_1/demo/video/upload"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "public_id": "abc123",
                "resource_type": "video",
                "secure_url": "https://cdn.example/video.mp4"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let file = temp_video();
        let hosted = client(&server)
            .upload_video_at(file.path(), 1_700_000_000)
            .await
            .unwrap();

        assert_eq!(hosted.secure_url, "https://cdn.example/video.mp4");
        assert_eq!(hosted.public_id.as_deref(), Some("abc123"));

        let requests = server.received_requests().await.unwrap();
        let body = String::from_utf8_lossy(&requests[0].body);
        let expected = sign_params(&[("timestamp", "1700000000")], "secret");
        assert!(body.contains(&expected));
        assert!(body.contains("not really an mp4"));
    }

    #[tokio::test]
    async fn response_without_url_is_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "public_id": "abc" })))
            .mount(&server)
            .await;

        let file = temp_video();
        let err = client(&server).upload_video(file.path()).await.unwrap_err();
        match err {
            PublishError::MissingField { field, body, .. } => {
                assert_eq!(field, "secure_url");
                assert_eq!(body["public_id"], "abc");
            }
            other => panic!("expected MissingField, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn rejected_upload_is_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": { "message": "Invalid Signature" }
            })))
            .mount(&server)
            .await;

        let file = temp_video();
        let err = client(&server).upload_video(file.path()).await.unwrap_err();
        assert!(matches!(err, PublishError::Api { status, .. } if status.as_u16() == 401));
    }
}
