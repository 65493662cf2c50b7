// ABOUTME: Summary of a successful rollback run.
// ABOUTME: Serializable for JSON output and audit trails.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::types::Version;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RollbackReport {
    pub from_version: Version,
    pub to_version: Version,
    pub strategy: String,
    pub attempts: u32,
    pub dry_run: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RollbackReport {
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}
