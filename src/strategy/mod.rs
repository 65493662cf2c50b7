// ABOUTME: Deployment backend contract consumed by the rollback engine.
// ABOUTME: Exports the Strategy trait and the Docker and Kubernetes implementations.

mod command;
mod docker;
mod error;
mod kubernetes;

pub use command::CommandSpec;
pub use docker::DockerServiceStrategy;
pub use error::StrategyError;
pub use kubernetes::KubernetesStrategy;

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::BackendConfig;
use crate::types::{ImageRef, Version};

/// A deployment backend.
///
/// `rollback` may be called several times with the same arguments when the
/// engine retries, so implementations must converge on the same final state.
#[async_trait]
pub trait Strategy: Send + Sync {
    /// Move the live deployment from `from` to `to`.
    async fn rollback(&self, from: &Version, to: &Version) -> Result<(), StrategyError>;

    /// Forward-deploy `version`.
    async fn deploy(&self, version: &Version) -> Result<(), StrategyError>;

    /// The version currently live. Fails if nothing is deployed.
    async fn current_version(&self) -> Result<Version, StrategyError>;

    /// Stable identifier used in logs and error metadata.
    fn name(&self) -> &str;
}

/// Build the backend selected in configuration.
pub fn from_config(
    backend: &BackendConfig,
    dry_run: bool,
) -> Result<Arc<dyn Strategy>, StrategyError> {
    Ok(match backend {
        BackendConfig::Docker(config) => {
            Arc::new(DockerServiceStrategy::new(config.clone(), dry_run)?)
        }
        BackendConfig::Kubernetes(config) => {
            Arc::new(KubernetesStrategy::new(config.clone(), dry_run)?)
        }
    })
}

/// Placeholder substituted in image templates.
pub const VERSION_PLACEHOLDER: &str = "{version}";

/// Check that a template, if given, contains the version placeholder.
fn validate_template(template: Option<&str>) -> Result<(), StrategyError> {
    match template {
        Some(t) if !t.contains(VERSION_PLACEHOLDER) => Err(StrategyError::InvalidConfig {
            message: format!("image template `{t}` has no {VERSION_PLACEHOLDER} placeholder"),
        }),
        _ => Ok(()),
    }
}

fn render_template(template: &str, version: &Version) -> String {
    template.replace(VERSION_PLACEHOLDER, version.as_str())
}

/// Read the deployed version from an image reference printed by a platform CLI.
fn version_from_image(raw: &str) -> Result<Version, StrategyError> {
    ImageRef::parse(raw)
        .and_then(|image| image.version())
        .map_err(|e| StrategyError::UnreadableVersion {
            output: raw.to_string(),
            reason: e.to_string(),
        })
}
