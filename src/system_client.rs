use std::{sync::LazyLock, time::Duration};

use async_trait::async_trait;
use regex::Regex;
use reqwest::{header::ACCEPT, Client, StatusCode};
use serde_json::{Map, Value};
use tracing::warn;
use url::Url;

use crate::{config::Config, domain::properties::PropertyMap, errors::AppError};

static HOSTNAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\[[0-9A-Fa-f:.]+\]|[A-Za-z0-9]([A-Za-z0-9._-]*[A-Za-z0-9])?)(:[0-9]{1,5})?$")
        .expect("hostname pattern")
});

/// Source of a remote host's full property set.
///
/// `None` covers every failure mode: bad hostname, unreachable host, non-200
/// status, timeout and undecodable body.
#[async_trait]
pub trait PropertySource: Send + Sync {
    async fn fetch(&self, hostname: &str) -> Option<PropertyMap>;
}

#[derive(Debug, Clone)]
pub struct HttpSystemClient {
    client: Client,
    protocol: String,
    path: String,
}

impl HttpSystemClient {
    pub fn new(
        protocol: impl Into<String>,
        path: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| AppError::internal(format!("failed to build http client: {err}")))?;

        Ok(Self {
            client,
            protocol: protocol.into(),
            path: path.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        Self::new(
            config.system_protocol.clone(),
            config.system_properties_path.clone(),
            config.fetch_timeout,
        )
    }

    pub fn properties_url(&self, hostname: &str) -> Option<Url> {
        build_url(&self.protocol, hostname, &self.path)
    }
}

#[async_trait]
impl PropertySource for HttpSystemClient {
    async fn fetch(&self, hostname: &str) -> Option<PropertyMap> {
        let Some(url) = self.properties_url(hostname) else {
            warn!(hostname, "cannot build properties url for hostname");
            return None;
        };

        let response = match self
            .client
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                warn!(hostname, url = %url, error = %err, "properties request failed");
                return None;
            }
        };

        if response.status() != StatusCode::OK {
            warn!(
                hostname,
                url = %url,
                status = response.status().as_u16(),
                "properties request returned non-ok status"
            );
            return None;
        }

        let body: Value = match response.json().await {
            Ok(body) => body,
            Err(err) => {
                warn!(hostname, url = %url, error = %err, "properties body is not valid json");
                return None;
            }
        };

        let Value::Object(object) = body else {
            warn!(hostname, url = %url, "properties body is not a json object");
            return None;
        };

        Some(object_to_properties(object))
    }
}

/// Builds `<protocol>://<hostname><path>`, rejecting hostnames that would spill
/// into the path, query or userinfo of the url.
pub fn build_url(protocol: &str, hostname: &str, path: &str) -> Option<Url> {
    if !HOSTNAME_PATTERN.is_match(hostname) {
        return None;
    }

    let url = Url::parse(&format!("{protocol}://{hostname}{path}")).ok()?;
    url.host()?;
    Some(url)
}

fn object_to_properties(object: Map<String, Value>) -> PropertyMap {
    object
        .into_iter()
        .filter_map(|(key, value)| {
            let value = match value {
                Value::Null => return None,
                Value::String(text) => text,
                other => other.to_string(),
            };
            Some((key, value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode as AxumStatus, routing::get, Json, Router};
    use serde_json::json;
    use tokio::net::TcpListener;

    use super::*;

    async fn serve(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("test server");
        });
        addr.to_string()
    }

    fn client() -> HttpSystemClient {
        HttpSystemClient::new("http", "/system/properties", Duration::from_secs(5))
            .expect("client")
    }

    #[test]
    fn builds_url_from_parts() {
        let url = build_url("https", "alpha.example.com", "/system/properties").expect("url");
        assert_eq!(url.as_str(), "https://alpha.example.com/system/properties");
    }

    #[test]
    fn accepts_host_with_port_and_ip_literals() {
        assert!(build_url("http", "localhost:9080", "/p").is_some());
        assert!(build_url("http", "10.0.0.7", "/p").is_some());
        assert!(build_url("http", "[::1]:9080", "/p").is_some());
    }

    #[test]
    fn rejects_malformed_hostnames() {
        for hostname in ["", "bad host", "a/b", "evil@alpha", "alpha?x=1", "-alpha", "a:99999x"] {
            assert!(
                build_url("http", hostname, "/system/properties").is_none(),
                "{hostname} should be rejected"
            );
        }
    }

    #[test]
    fn scalar_values_become_strings() {
        let Value::Object(object) = json!({
            "os.name": "Linux",
            "cpu.count": 8,
            "debug": false,
            "nothing": null,
            "nested": {"a": 1}
        }) else {
            unreachable!()
        };

        let properties = object_to_properties(object);
        assert_eq!(properties["os.name"], "Linux");
        assert_eq!(properties["cpu.count"], "8");
        assert_eq!(properties["debug"], "false");
        assert_eq!(properties["nested"], "{\"a\":1}");
        assert!(!properties.contains_key("nothing"));
    }

    #[tokio::test]
    async fn fetches_properties_from_remote_host() {
        let host = serve(Router::new().route(
            "/system/properties",
            get(|| async { Json(json!({"os.name": "Linux", "user.name": "bob"})) }),
        ))
        .await;

        let properties = client().fetch(&host).await.expect("properties");
        assert_eq!(properties["os.name"], "Linux");
        assert_eq!(properties["user.name"], "bob");
    }

    #[tokio::test]
    async fn error_status_is_not_found() {
        let host = serve(Router::new().route(
            "/system/properties",
            get(|| async { (AxumStatus::INTERNAL_SERVER_ERROR, "boom") }),
        ))
        .await;

        assert!(client().fetch(&host).await.is_none());
    }

    #[tokio::test]
    async fn wrong_path_is_not_found() {
        let host = serve(Router::new()).await;

        assert!(client().fetch(&host).await.is_none());
    }

    #[tokio::test]
    async fn malformed_body_is_not_found() {
        let host = serve(Router::new().route(
            "/system/properties",
            get(|| async { "not json" }),
        ))
        .await;

        assert!(client().fetch(&host).await.is_none());
    }

    #[tokio::test]
    async fn non_object_body_is_not_found() {
        let host = serve(Router::new().route(
            "/system/properties",
            get(|| async { Json(json!(["os.name"])) }),
        ))
        .await;

        assert!(client().fetch(&host).await.is_none());
    }

    #[tokio::test]
    async fn unreachable_host_is_not_found() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let host = listener.local_addr().expect("local addr").to_string();
        drop(listener);

        assert!(client().fetch(&host).await.is_none());
    }

    #[tokio::test]
    async fn slow_host_times_out_as_not_found() {
        let host = serve(Router::new().route(
            "/system/properties",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!({}))
            }),
        ))
        .await;
        let client = HttpSystemClient::new("http", "/system/properties", Duration::from_millis(200))
            .expect("client");

        assert!(client.fetch(&host).await.is_none());
    }
}
