use std::time::Duration;

use reqwest::{Client, Method};
use serde_json::Value;
use tracing::{debug, error};

use crate::config::Config;
use crate::constants::REQUEST_TIMEOUT_SECS;
use crate::error::{PublishError, Result};

/// Thin wrapper around the Graph API.
///
/// Every request carries the access token as a query parameter, and any
/// status >= 400 is turned into [`PublishError::Api`].
#[derive(Debug, Clone)]
pub struct GraphClient {
    base_url: String,
    api_version: String,
    access_token: String,
    http: Client,
}

impl GraphClient {
    pub fn new(
        base_url: impl Into<String>,
        api_version: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_version: api_version.into(),
            access_token: access_token.into(),
            http,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            &config.graph_base_url,
            &config.api_version,
            config.access_token()?,
        )
    }

    /// Full URL for a node or edge path, e.g. `{ig_id}/media`.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url,
            self.api_version,
            path.trim_start_matches('/')
        )
    }

    pub async fn get(&self, path: &str, params: &[(&str, &str)]) -> Result<Value> {
        self.request(Method::GET, path, params).await
    }

    pub async fn post(&self, path: &str, params: &[(&str, &str)]) -> Result<Value> {
        self.request(Method::POST, path, params).await
    }

    /// Send a request and return the decoded body.
    pub async fn request(&self, method: Method, path: &str, params: &[(&str, &str)]) -> Result<Value> {
        let url = self.endpoint(path);
        let mut query: Vec<(&str, &str)> = params.to_vec();
        query.push(("access_token", self.access_token.as_str()));

        debug!(%method, %url, "graph request");

        let resp = self
            .http
            .request(method, &url)
            .query(&query)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        let body = parse_body(&text);

        if status.as_u16() >= 400 {
            error!(status = status.as_u16(), body = %body, %url, "graph request failed");
            return Err(PublishError::Api { status, url, body });
        }

        Ok(body)
    }
}

/// Decode a response body, wrapping anything that is not JSON as `{"raw": text}`.
pub fn parse_body(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| serde_json::json!({ "raw": text }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn parse_body_wraps_non_json() {
        assert_eq!(parse_body(r#"{"id":"1"}"#), json!({ "id": "1" }));
        assert_eq!(
            parse_body("<html>Bad Gateway</html>"),
            json!({ "raw": "<html>Bad Gateway</html>" })
        );
        assert_eq!(parse_body(""), json!({ "raw": "" }));
    }

    #[test]
    fn endpoint_joins_version_and_path() {
        let client = GraphClient::new("https://graph.facebook.com/", "v23.0", "tok").unwrap();
        assert_eq!(
            client.endpoint("/123/media"),
            "https://graph.facebook.com/v23.0/123/media"
        );
    }

    #[tokio::test]
    async fn attaches_access_token_to_every_call() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v23.0/42/media_publish"))
            .and(query_param("access_token", "tok"))
            .and(query_param("creation_id", "c1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "m1" })))
            .expect(1)
            .mount(&server)
            .await;

        let client = GraphClient::new(server.uri(), "v23.0", "tok").unwrap();
        let body = client
            .post("42/media_publish", &[("creation_id", "c1")])
            .await
            .unwrap();
        assert_eq!(body["id"], "m1");
    }

    #[tokio::test]
    async fn non_json_success_is_wrapped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("true"))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok, not json"))
            .mount(&server)
            .await;

        let client = GraphClient::new(server.uri(), "v23.0", "tok").unwrap();
        assert_eq!(client.get("me", &[]).await.unwrap(), json!(true));
        assert_eq!(
            client.post("me", &[]).await.unwrap(),
            json!({ "raw": "ok, not json" })
        );
    }

    #[tokio::test]
    async fn error_status_never_returns_a_value() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v23.0/bad"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": { "message": "Invalid OAuth access token.", "code": 190 }
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v23.0/down"))
            .respond_with(ResponseTemplate::new(502).set_body_string("upstream down"))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v23.0/odd"))
            .respond_with(ResponseTemplate::new(600).set_body_string("weird"))
            .mount(&server)
            .await;

        let client = GraphClient::new(server.uri(), "v23.0", "tok").unwrap();

        match client.get("bad", &[]).await {
            Err(PublishError::Api { status, body, .. }) => {
                assert_eq!(status.as_u16(), 400);
                assert_eq!(body["error"]["code"], 190);
            }
            other => panic!("expected Api error, got {other:?}"),
        }

        match client.get("down", &[]).await {
            Err(PublishError::Api { status, body, .. }) => {
                assert_eq!(status.as_u16(), 502);
                assert_eq!(body, json!({ "raw": "upstream down" }));
            }
            other => panic!("expected Api error, got {other:?}"),
        }

        match client.get("odd", &[]).await {
            Err(PublishError::Api { status, body, .. }) => {
                assert_eq!(status.as_u16(), 600);
                assert_eq!(body, json!({ "raw": "weird" }));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }
}
