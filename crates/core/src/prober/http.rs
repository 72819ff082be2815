use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;

use super::UrlProber;
use crate::config::ProberConfig;
use crate::metrics::PROBES_TOTAL;

/// HEAD-request prober backed by reqwest.
pub struct HttpProber {
    client: Client,
}

impl HttpProber {
    pub fn new(config: &ProberConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("hashgate/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl UrlProber for HttpProber {
    async fn is_reachable(&self, url: &str) -> bool {
        let reachable = match self.client.head(url).send().await {
            Ok(response) => {
                debug!(url = %url, status = %response.status(), "Probe answered");
                response.status() == StatusCode::OK
            }
            Err(e) => {
                debug!(url = %url, error = %e, timeout = e.is_timeout(), "Probe failed");
                false
            }
        };

        PROBES_TOTAL
            .with_label_values(&[if reachable { "reachable" } else { "unreachable" }])
            .inc();
        reachable
    }
}
