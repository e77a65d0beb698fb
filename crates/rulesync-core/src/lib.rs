// # rulesync-core
//
// Core library for the Pangolin rule IP synchronizer.
//
// ## Architecture Overview
//
// - **IpSource**: Trait for obtaining the candidate IP
// - **RuleStore**: Trait for reading/replacing the remote access rule
// - **reconcile**: The three-way changed/unchanged/unresolved decision
// - **SyncEngine**: Fixed-interval polling driver
// - **TriggerListener**: Inbound HTTP trigger driver (optional mode)
//
// ## Design Principles
//
// 1. **Stateless between ticks**: the stored value is always re-fetched
//    from the remote, never cached locally
// 2. **One rule per process**: resource ID + rule ID are fixed at startup
// 3. **Never create**: a missing remote rule is an outcome, not an error,
//    and never triggers rule creation
// 4. **No coordination**: a single logical worker, no shared mutable
//    state, no retry-with-backoff

pub mod config;
pub mod engine;
pub mod error;
pub mod listener;
pub mod reconcile;
pub mod traits;

// Re-export core types for convenience
pub use config::{MatchType, RuleAction, RuleSpec, RuleTarget, TriggerConfig};
pub use engine::SyncEngine;
pub use error::{Error, Result};
pub use listener::TriggerListener;
pub use reconcile::{decide, Outcome};
pub use traits::{IpSource, RuleStore};
