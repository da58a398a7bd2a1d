use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::config::ShellSettings;
use crate::models::RemoteConfigResponse;
use crate::resolver::{ConnectivityProbe, RemoteConfigStore};

const USER_AGENT: &str = concat!("storefront-shell/", env!("CARGO_PKG_VERSION"));

pub struct HttpRemoteConfig {
    client: reqwest::Client,
    url: String,
    key: String,
}

impl HttpRemoteConfig {
    pub fn new(settings: &ShellSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(settings.remote_timeout)
            .user_agent(USER_AGENT)
            .build()
            .context("build http client")?;
        Ok(Self {
            client,
            url: settings.remote_config_url.clone(),
            key: settings.remote_config_key.clone(),
        })
    }
}

fn parse_remote_config(body: &str, key: &str) -> Result<Option<String>> {
    let parsed = serde_json::from_str::<RemoteConfigResponse>(body)
        .context("parse remote config json")?;
    Ok(parsed.string_entry(key))
}

#[async_trait]
impl RemoteConfigStore for HttpRemoteConfig {
    async fn fetch_entrypoint_url(&self) -> Result<Option<String>> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .await
            .context("fetch remote config")?;
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        if !status.is_success() {
            anyhow::bail!("HTTP {}: {}", status, body);
        }
        parse_remote_config(&body, &self.key)
    }
}

pub struct HttpConnectivityProbe {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl HttpConnectivityProbe {
    pub fn new(settings: &ShellSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: settings.health_url.clone(),
            timeout: settings.probe_timeout,
        }
    }
}

#[async_trait]
impl ConnectivityProbe for HttpConnectivityProbe {
    async fn is_reachable(&self) -> bool {
        let req = self.client.get(&self.url).send();
        let resp = tokio::time::timeout(self.timeout, req).await;
        match resp {
            Ok(Ok(r)) => r.status().is_success(),
            Ok(Err(e)) => {
                tracing::debug!(error = %e, "health check failed");
                false
            }
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_configured_key() {
        let body = r#"{"entries":{"webview_url":"https://shop.example/app","other":"x"}}"#;
        assert_eq!(
            parse_remote_config(body, "webview_url").unwrap().as_deref(),
            Some("https://shop.example/app")
        );
        assert_eq!(parse_remote_config(body, "missing").unwrap(), None);
    }

    #[test]
    fn malformed_body_is_an_error() {
        let err = parse_remote_config("<html>502</html>", "webview_url").unwrap_err();
        assert!(format!("{err:#}").contains("parse remote config json"));
    }

    #[tokio::test]
    async fn unreachable_health_endpoint_is_offline() {
        let settings = ShellSettings {
            health_url: "http://127.0.0.1:9/health".to_string(),
            probe_timeout: Duration::from_millis(200),
            ..ShellSettings::default()
        };
        assert!(!HttpConnectivityProbe::new(&settings).is_reachable().await);
    }
}
