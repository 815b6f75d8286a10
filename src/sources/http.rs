use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;

use super::throttle::HostThrottle;
use super::{FetchOutcome, PageFetcher};
use crate::config::PipelineConfig;
use crate::error::{truncate_for_log, SourceError};

/// Live fetcher: one shared `reqwest::Client`, browser user agent, per-host fixed delay.
pub struct HttpFetcher {
    client: Client,
    throttle: HostThrottle,
}

impl HttpFetcher {
    pub fn new(cfg: &PipelineConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(cfg.user_agent.clone())
            .timeout(cfg.http_timeout)
            .build()?;
        Ok(Self {
            client,
            throttle: HostThrottle::new(cfg.scrape_delay),
        })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn get(&self, url: &str) -> Result<FetchOutcome, SourceError> {
        let host = url::Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .ok_or_else(|| SourceError::unavailable(url, "unparseable url"))?;
        self.throttle.wait(&host).await;

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SourceError::unavailable(url, e.to_string()))?;
        let status = resp.status();
        debug!(target = "fetch", %url, status = status.as_u16(), "response");
        if status == StatusCode::NOT_FOUND {
            return Ok(FetchOutcome::NotFound);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SourceError::unavailable(
                url,
                format!("HTTP {}: {}", status, truncate_for_log(&body, 160)),
            ));
        }
        let body = resp
            .text()
            .await
            .map_err(|e| SourceError::unavailable(url, e.to_string()))?;
        Ok(FetchOutcome::Body(body))
    }
}
