// ABOUTME: Rollback orchestration engine.
// ABOUTME: Registry, stable version selection, retry, and the run state machine.

mod cancel;
mod error;
mod orchestrator;
mod registry;
mod report;
mod retry;
mod run;
mod selector;
pub mod state;

pub use cancel::Cancellation;
pub use error::{BoxError, ErrorKind, ErrorMetadata, RollbackError};
pub use orchestrator::RollbackOrchestrator;
pub use registry::{Lexicographic, OrderingKind, Semantic, VersionOrdering, VersionRegistry};
pub use report::RollbackReport;
pub use retry::RetryExecutor;
pub use run::RollbackRun;
pub use selector::{NO_STABLE_VERSION, StableVersionSelector};
