// # Rule Store Trait
//
// Defines the interface for reading and replacing the single remote
// access rule this process manages.
//
// ## Implementations
//
// - Pangolin access-control API: `rulesync-store-pangolin` crate
//
// The rule identity (resource ID + rule ID) is fixed when the store is
// constructed; at most one rule is ever targeted per process instance.

use async_trait::async_trait;

/// Trait for rule store implementations
///
/// Stores are isolated, stateless, single-shot API wrappers. They make
/// exactly one remote call per method, propagate failures to the
/// caller, and never decide whether an update is needed.
#[async_trait]
pub trait RuleStore: Send + Sync {
    /// Fetch the current `value` of the managed rule
    ///
    /// Returns `Ok(None)` when the rule does not exist on the remote.
    /// That is a legitimate outcome, not an error: an administrator may
    /// not have created the rule yet, and the synchronizer never
    /// creates rules itself.
    async fn fetch_value(&self) -> Result<Option<String>, crate::Error>;

    /// Replace the managed rule, substituting `value`
    ///
    /// All other rule fields are re-sent verbatim from configuration.
    ///
    /// # Idempotency
    ///
    /// This method must be idempotent: re-sending the same value is a
    /// no-op from the remote's perspective. The driver loop may call it
    /// after every tick where a difference was observed.
    async fn update_value(&self, value: &str) -> Result<(), crate::Error>;

    /// Name of this store (for logging)
    fn store_name(&self) -> &'static str;
}
