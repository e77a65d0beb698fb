// # HTTP IP Source
//
// Obtains the host's public IP by querying an external "what is my IP"
// echo service (e.g. https://api.ipify.org). The entire trimmed
// response body is the candidate.
//
// One GET per tick with a short bounded timeout; failures propagate to
// the caller for that tick and are never retried within the call.

use async_trait::async_trait;
use rulesync_core::{Error, IpSource, Result};
use std::net::IpAddr;
use std::time::Duration;
use tracing::debug;

/// Timeout for the IP echo request
const DEFAULT_ECHO_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP-based public IP source
pub struct HttpIpSource {
    /// URL of the IP echo endpoint
    url: String,

    /// HTTP client (timeout baked in)
    client: reqwest::Client,
}

impl HttpIpSource {
    /// Create a new source for an echo endpoint
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url = url.into();
        if url.is_empty() {
            return Err(Error::config("IP echo service URL cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_ECHO_TIMEOUT)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { url, client })
    }
}

/// Parse an echo-service response body into an address
fn parse_echo_body(body: &str) -> Result<IpAddr> {
    let trimmed = body.trim();
    trimmed
        .parse()
        .map_err(|_| Error::ip_source(format!("Echo service returned a non-IP body: '{}'", trimmed)))
}

#[async_trait]
impl IpSource for HttpIpSource {
    async fn current(&self) -> Result<IpAddr> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::network(format!("IP echo request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::http(format!(
                "IP echo service returned {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::network(format!("Failed to read echo response: {}", e)))?;

        let ip = parse_echo_body(&body)?;
        debug!("External IP from {}: {}", self.url, ip);
        Ok(ip)
    }

    fn source_name(&self) -> &'static str {
        "http"
    }
}
