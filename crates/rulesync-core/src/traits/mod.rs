//! Trait seams between the engine and its I/O implementations

pub mod ip_source;
pub mod rule_store;

pub use ip_source::IpSource;
pub use rule_store::RuleStore;
