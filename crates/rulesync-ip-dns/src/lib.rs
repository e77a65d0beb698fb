// # DNS IP Source
//
// Resolves a configured hostname through standard name resolution and
// takes its first IPv4 address as the candidate. Used when the tracked
// address is a dynamic-DNS name rather than this host's own public IP.

use async_trait::async_trait;
use rulesync_core::{Error, IpSource, Result};
use std::net::{IpAddr, SocketAddr};
use tracing::debug;

/// Hostname-resolution IP source
pub struct DnsIpSource {
    hostname: String,
}

impl DnsIpSource {
    /// Create a new source for a hostname
    pub fn new(hostname: impl Into<String>) -> Result<Self> {
        let hostname = hostname.into();
        if hostname.is_empty() {
            return Err(Error::config("Target hostname cannot be empty"));
        }
        Ok(Self { hostname })
    }
}

/// First IPv4 address among resolved socket addresses
fn first_v4(addrs: impl Iterator<Item = SocketAddr>) -> Option<IpAddr> {
    addrs.map(|a| a.ip()).find(|ip| ip.is_ipv4())
}

#[async_trait]
impl IpSource for DnsIpSource {
    async fn current(&self) -> Result<IpAddr> {
        let addrs = tokio::net::lookup_host((self.hostname.as_str(), 0))
            .await
            .map_err(|e| {
                Error::resolution(format!("Failed to resolve {}: {}", self.hostname, e))
            })?;

        let ip = first_v4(addrs).ok_or_else(|| {
            Error::resolution(format!("{} has no IPv4 address", self.hostname))
        })?;

        debug!("Resolved {} to {}", self.hostname, ip);
        Ok(ip)
    }

    fn source_name(&self) -> &'static str {
        "dns"
    }
}
