// ABOUTME: Test support utilities.
// ABOUTME: Scripted in-memory strategy and tracing setup for integration tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Once;
use std::sync::atomic::{AtomicU32, Ordering};

use stable_galaxy::strategy::{Strategy, StrategyError};
use stable_galaxy::types::Version;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env()
            .add_directive("stable_galaxy=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

#[allow(dead_code)]
pub fn v(s: &str) -> Version {
    Version::new(s).unwrap()
}

/// Strategy that fails its first `failures` rollback calls, then succeeds.
#[derive(Default)]
pub struct MockStrategy {
    failures: u32,
    calls: AtomicU32,
    rollbacks: Mutex<Vec<(Version, Version)>>,
    current: Option<Version>,
}

#[allow(dead_code)]
impl MockStrategy {
    pub fn succeeding() -> Self {
        Self::default()
    }

    pub fn failing_times(failures: u32) -> Self {
        Self {
            failures,
            ..Default::default()
        }
    }

    pub fn always_failing() -> Self {
        Self::failing_times(u32::MAX)
    }

    pub fn with_current(mut self, version: Version) -> Self {
        self.current = Some(version);
        self
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn rollbacks(&self) -> Vec<(Version, Version)> {
        self.rollbacks.lock().clone()
    }
}

#[async_trait]
impl Strategy for MockStrategy {
    async fn rollback(&self, from: &Version, to: &Version) -> Result<(), StrategyError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.rollbacks.lock().push((from.clone(), to.clone()));
        if call <= self.failures {
            return Err(StrategyError::platform(format!("attempt {call} failed")));
        }
        Ok(())
    }

    async fn deploy(&self, _version: &Version) -> Result<(), StrategyError> {
        Ok(())
    }

    async fn current_version(&self) -> Result<Version, StrategyError> {
        self.current.clone().ok_or_else(|| StrategyError::NotFound {
            target: "mock service".to_string(),
        })
    }

    fn name(&self) -> &str {
        "mock"
    }
}
