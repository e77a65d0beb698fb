//! Trigger-listener driver (optional mode)
//!
//! A single-purpose inbound HTTP acceptor: one connection at a time,
//! one small read per connection, one hand-built `HTTP/1.1 200 OK`
//! response carrying one of three fixed HTML bodies. Requests whose
//! Host and Path match the configured trigger run a reconciliation
//! with the caller's IP as the candidate; everything else (including
//! internal failures, which must not leak detail to the caller) gets
//! the "not triggered" body.
//!
//! No routing, no keep-alive, no chunked bodies, no concurrent
//! connection handling.

pub mod request;

use crate::config::TriggerConfig;
use crate::reconcile::{self, Outcome};
use crate::traits::RuleStore;
use request::{TriggerRequest, MAX_REQUEST_BYTES};
use std::net::IpAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tracing::{error, info, warn};

/// Body returned when a matching request caused a rule update
pub const BODY_TRIGGERED: &str = "\
<html>
<head><title>IP Update Trigger</title></head>
<body>
<h1>IP Update Trigger</h1>
<p>An update was triggered.</p>
</body>
</html>
";

/// Body returned when the rule already held the caller's IP
pub const BODY_NO_CHANGE: &str = "\
<html>
<head><title>IP Update Trigger</title></head>
<body>
<h1>IP Update Trigger</h1>
<p>No IP update was necessary.</p>
</body>
</html>
";

/// Body returned for non-matching requests, a missing rule, or any
/// internal failure
pub const BODY_NOT_TRIGGERED: &str = "\
<html>
<head><title>IP Update Trigger</title></head>
<body>
<h1>IP Update Trigger</h1>
<p>An update was not triggered.</p>
</body>
</html>
";

/// Inbound trigger listener
pub struct TriggerListener {
    store: Box<dyn RuleStore>,
    config: TriggerConfig,
}

impl TriggerListener {
    /// Create a new listener
    pub fn new(store: Box<dyn RuleStore>, config: TriggerConfig) -> Result<Self, crate::Error> {
        config.validate()?;
        Ok(Self { store, config })
    }

    /// Run the listener forever
    ///
    /// A serve-loop failure (bind or accept error) aborts that listener
    /// instance; it is caught here and the listener rebinds immediately.
    pub async fn run(&self) -> Result<(), crate::Error> {
        loop {
            if let Err(e) = self.serve().await {
                error!("Listener failed: {}; restarting", e);
            }
        }
    }

    /// Bind and serve connections until an accept error
    async fn serve(&self) -> Result<(), crate::Error> {
        let listener = TcpListener::bind(("0.0.0.0", self.config.port)).await?;
        info!(
            "Listening for updates on {}:{}",
            self.config.domain, self.config.port
        );

        loop {
            let (mut socket, peer) = listener.accept().await?;

            // One small read per connection; a failed read is treated
            // as an empty request, which can never match the trigger.
            let mut buf = [0u8; MAX_REQUEST_BYTES];
            let n = match socket.read(&mut buf).await {
                Ok(n) => n,
                Err(e) => {
                    warn!("Failed to read request from {}: {}", peer, e);
                    0
                }
            };

            let body = self.handle_request(&buf[..n], peer.ip()).await;
            let response = render_response(body);
            if let Err(e) = socket.write_all(response.as_bytes()).await {
                warn!("Failed to write response to {}: {}", peer, e);
            }
        }
    }

    /// Handle one raw request and pick the response body
    ///
    /// Public so contract tests can drive the listener without sockets.
    pub async fn handle_request(&self, raw: &[u8], peer: IpAddr) -> &'static str {
        let req = TriggerRequest::parse(raw);

        if req.path() != self.config.path || req.host() != Some(self.config.domain.as_str()) {
            return BODY_NOT_TRIGGERED;
        }

        let candidate = req.client_ip(peer);
        info!("Trigger request from {}", candidate);

        match reconcile::reconcile(self.store.as_ref(), &candidate).await {
            Ok(Outcome::Changed { .. }) => BODY_TRIGGERED,
            Ok(Outcome::Unchanged) => BODY_NO_CHANGE,
            Ok(Outcome::Unresolved) => BODY_NOT_TRIGGERED,
            Err(e) => {
                // Collapse failures into the generic body; operators
                // observe the real error via logs only.
                error!("Trigger reconciliation failed: {}", e);
                BODY_NOT_TRIGGERED
            }
        }
    }
}

/// Build the raw HTTP/1.1 response for a body
fn render_response(body: &str) -> String {
    format!("HTTP/1.1 200 OK\r\nContent-Type: text/html\r\n\r\n{}", body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_is_http_200_with_html_body() {
        let response = render_response(BODY_NO_CHANGE);
        assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(response.contains("Content-Type: text/html\r\n\r\n"));
        assert!(response.ends_with(BODY_NO_CHANGE));
    }
}
