// ABOUTME: Threshold-based health tracking per deployed version.
// ABOUTME: Produces health signals; the rollback engine never gates on them.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

use crate::rollback::RollbackError;
use crate::types::Version;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Healthy,
    Error,
}

/// Limits above which a version is unhealthy. Equal to the limit is healthy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonitorThresholds {
    pub cpu_usage: f64,
    pub memory_usage: f64,
    pub error_rate: f64,
    pub latency: Duration,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Metrics {
    pub cpu_usage: f64,
    pub memory_usage: f64,
    pub error_rate: f64,
    pub latency: Duration,
}

impl Metrics {
    fn exceeds(&self, limits: &MonitorThresholds) -> bool {
        self.cpu_usage > limits.cpu_usage
            || self.memory_usage > limits.memory_usage
            || self.error_rate > limits.error_rate
            || self.latency > limits.latency
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Incident {
    pub message: String,
    pub severity: String,
    pub timestamp: DateTime<Utc>,
}

/// Tracked state of one version.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VersionHealth {
    pub status: Status,
    pub metrics: Metrics,
    pub last_checked: DateTime<Utc>,
    pub incidents: Vec<Incident>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MonitorError {
    #[error("version {0} already exists")]
    AlreadyTracked(Version),

    #[error("version {0} not found")]
    UnknownVersion(Version),
}

impl From<MonitorError> for RollbackError {
    fn from(err: MonitorError) -> Self {
        RollbackError::health_check("health monitor query failed").with_source(err)
    }
}

/// Shared health state. Cheap to query from several pollers.
#[derive(Debug)]
pub struct HealthMonitor {
    thresholds: MonitorThresholds,
    versions: RwLock<HashMap<Version, VersionHealth>>,
}

impl HealthMonitor {
    pub fn new(thresholds: MonitorThresholds) -> Self {
        Self {
            thresholds,
            versions: RwLock::new(HashMap::new()),
        }
    }

    /// Start tracking `version` as healthy with zeroed metrics.
    pub fn add_version(&self, version: Version) -> Result<(), MonitorError> {
        let mut versions = self.versions.write();
        if versions.contains_key(&version) {
            return Err(MonitorError::AlreadyTracked(version));
        }
        versions.insert(
            version,
            VersionHealth {
                status: Status::Healthy,
                metrics: Metrics::default(),
                last_checked: Utc::now(),
                incidents: Vec::new(),
            },
        );
        Ok(())
    }

    /// Evaluate the latest metrics of `version` against the thresholds.
    pub fn check_health(&self, version: &Version) -> Result<Status, MonitorError> {
        let versions = self.versions.read();
        let health = versions
            .get(version)
            .ok_or_else(|| MonitorError::UnknownVersion(version.clone()))?;
        Ok(self.evaluate(&health.metrics))
    }

    /// Record fresh metrics and re-evaluate the stored status.
    pub fn update_metrics(
        &self,
        version: &Version,
        metrics: Metrics,
    ) -> Result<Status, MonitorError> {
        let status = self.evaluate(&metrics);
        let mut versions = self.versions.write();
        let health = versions
            .get_mut(version)
            .ok_or_else(|| MonitorError::UnknownVersion(version.clone()))?;

        health.metrics = metrics;
        health.last_checked = Utc::now();
        if health.status != status {
            tracing::info!(version = %version, ?status, "health status changed");
        }
        health.status = status;
        Ok(status)
    }

    pub fn record_incident(
        &self,
        version: &Version,
        message: impl Into<String>,
        severity: impl Into<String>,
    ) -> Result<(), MonitorError> {
        let mut versions = self.versions.write();
        let health = versions
            .get_mut(version)
            .ok_or_else(|| MonitorError::UnknownVersion(version.clone()))?;
        health.incidents.push(Incident {
            message: message.into(),
            severity: severity.into(),
            timestamp: Utc::now(),
        });
        Ok(())
    }

    /// Snapshot of everything tracked for `version`.
    pub fn snapshot(&self, version: &Version) -> Option<VersionHealth> {
        self.versions.read().get(version).cloned()
    }

    fn evaluate(&self, metrics: &Metrics) -> Status {
        if metrics.exceeds(&self.thresholds) {
            Status::Error
        } else {
            Status::Healthy
        }
    }
}
