//! Test doubles for the reconciliation and trigger contract tests

use async_trait::async_trait;
use rulesync_core::error::{Error, Result};
use rulesync_core::traits::{IpSource, RuleStore};
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// An IpSource returning a fixed address, counting calls
pub struct FixedIpSource {
    ip: IpAddr,
    call_count: Arc<AtomicUsize>,
}

impl FixedIpSource {
    pub fn new(ip: IpAddr) -> Self {
        Self {
            ip,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.call_count)
    }
}

#[async_trait]
impl IpSource for FixedIpSource {
    async fn current(&self) -> Result<IpAddr> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        Ok(self.ip)
    }

    fn source_name(&self) -> &'static str {
        "fixed"
    }
}

/// An IpSource that always fails (for error-path tests)
pub struct FailingIpSource;

#[async_trait]
impl IpSource for FailingIpSource {
    async fn current(&self) -> Result<IpAddr> {
        Err(Error::network("simulated network failure"))
    }

    fn source_name(&self) -> &'static str {
        "failing"
    }
}

/// Shared observable state of a [`MockRuleStore`]
#[derive(Default)]
pub struct StoreState {
    pub stored: Mutex<Option<String>>,
    pub fetch_count: AtomicUsize,
    pub update_count: AtomicUsize,
    pub updated_values: Mutex<Vec<String>>,
}

/// A RuleStore over in-memory state, tracking every call
///
/// Clones share state, so a test can hand one clone to the engine or
/// listener and keep another for assertions.
#[derive(Clone, Default)]
pub struct MockRuleStore {
    state: Arc<StoreState>,
    fail_fetch: bool,
}

impl MockRuleStore {
    pub fn with_stored(value: &str) -> Self {
        let store = Self::default();
        *store.state.stored.lock().unwrap() = Some(value.to_string());
        store
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            state: Arc::default(),
            fail_fetch: true,
        }
    }

    pub fn stored(&self) -> Option<String> {
        self.state.stored.lock().unwrap().clone()
    }

    pub fn fetch_count(&self) -> usize {
        self.state.fetch_count.load(Ordering::SeqCst)
    }

    pub fn update_count(&self) -> usize {
        self.state.update_count.load(Ordering::SeqCst)
    }

    pub fn updated_values(&self) -> Vec<String> {
        self.state.updated_values.lock().unwrap().clone()
    }
}

#[async_trait]
impl RuleStore for MockRuleStore {
    async fn fetch_value(&self) -> Result<Option<String>> {
        self.state.fetch_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_fetch {
            return Err(Error::http("simulated 500 from rule store"));
        }
        Ok(self.stored())
    }

    async fn update_value(&self, value: &str) -> Result<()> {
        self.state.update_count.fetch_add(1, Ordering::SeqCst);
        self.state
            .updated_values
            .lock()
            .unwrap()
            .push(value.to_string());
        *self.state.stored.lock().unwrap() = Some(value.to_string());
        Ok(())
    }

    fn store_name(&self) -> &'static str {
        "mock"
    }
}
