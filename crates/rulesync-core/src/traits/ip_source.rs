// # IP Source Trait
//
// Defines the interface for obtaining the candidate IP address for a
// reconciliation tick.
//
// ## Implementations
//
// - HTTP "what is my IP" echo service: `rulesync-ip-http` crate
// - Hostname resolution: `rulesync-ip-dns` crate
//
// Listener mode does not go through this trait: there the candidate is
// extracted from the inbound request's headers or peer address.

use async_trait::async_trait;
use std::net::IpAddr;

/// Trait for IP source implementations
///
/// Sources are observers only: they produce a candidate address and
/// make no decision about whether the remote rule needs updating.
/// A failed lookup is an error for that tick; sources must not retry
/// internally.
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Get the current candidate IP address
    ///
    /// Produced fresh on every call; implementations must not cache.
    /// The engine re-fetches the stored value from the rule store on
    /// every tick, so the process stays stateless between ticks.
    async fn current(&self) -> Result<IpAddr, crate::Error>;

    /// Name of this source (for logging)
    fn source_name(&self) -> &'static str;
}
