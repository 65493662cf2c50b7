// ABOUTME: Rollback run state types for the type state pattern.
// ABOUTME: Each state carries what the run has established so far.

use crate::types::Version;

/// Initial state: the failing version is known.
/// Available actions: `select()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Requested;

/// Target chosen from the registry.
/// Available actions: `prepare()`
#[derive(Debug, Clone)]
pub struct Selected {
    pub(super) target: Version,
}

/// Pre-rollback hook passed (or none configured).
/// Available actions: `apply()`
#[derive(Debug, Clone)]
pub struct Prepared {
    pub(super) target: Version,
}

/// Strategy rolled the platform back.
/// Available actions: `confirm()`
#[derive(Debug, Clone)]
pub struct Applied {
    pub(super) target: Version,
    pub(super) attempts: u32,
}

/// Post-rollback hook passed (or none configured).
/// Available actions: `finish()`
#[derive(Debug, Clone)]
pub struct Completed {
    pub(super) target: Version,
    pub(super) attempts: u32,
}
