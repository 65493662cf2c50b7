// ABOUTME: Health check policy forwarded to monitoring collaborators.
// ABOUTME: HTTP probe parameters with sensible defaults; not consulted by the engine.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthCheckPolicy {
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,

    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,

    #[serde(default = "default_success_status")]
    pub success_status: u16,

    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_retry_attempts() -> u32 {
    3
}

fn default_success_status() -> u16 {
    200
}

impl Default for HealthCheckPolicy {
    fn default() -> Self {
        Self {
            url: None,
            timeout: default_timeout(),
            retry_attempts: default_retry_attempts(),
            success_status: default_success_status(),
            headers: BTreeMap::new(),
        }
    }
}
