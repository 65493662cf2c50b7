// ABOUTME: Kubernetes deployment backend driven through kubectl.
// ABOUTME: Sets the container image, applies labels/annotations/replicas, reads the live image.

use async_trait::async_trait;

use crate::config::KubernetesConfig;
use crate::types::{ServiceName, Version};

use super::command::CommandSpec;
use super::error::StrategyError;
use super::{Strategy, render_template, validate_template, version_from_image};

/// Rolls a Deployment between image tags.
#[derive(Debug, Clone)]
pub struct KubernetesStrategy {
    deployment: ServiceName,
    config: KubernetesConfig,
    dry_run: bool,
}

impl KubernetesStrategy {
    pub fn new(config: KubernetesConfig, dry_run: bool) -> Result<Self, StrategyError> {
        let deployment = config
            .deployment
            .clone()
            .ok_or_else(|| StrategyError::InvalidConfig {
                message: "kubernetes backend requires a deployment name".to_string(),
            })?;
        validate_template(config.image_template.as_deref())?;

        Ok(Self {
            deployment,
            config,
            dry_run,
        })
    }

    pub fn image(&self, version: &Version) -> String {
        match self.config.image_template {
            Some(ref template) => render_template(template, version),
            None => format!("{}:{}", self.deployment, version),
        }
    }

    fn resource(&self) -> String {
        format!("deployment/{}", self.deployment)
    }

    fn kubectl(&self) -> CommandSpec {
        let mut cmd = CommandSpec::new("kubectl");
        if let Some(ref kubeconfig) = self.config.kubeconfig {
            cmd = cmd.arg("--kubeconfig").arg(kubeconfig.display().to_string());
        }
        if let Some(ref context) = self.config.context {
            cmd = cmd.arg("--context").arg(context);
        }
        cmd.arg("--namespace").arg(&self.config.namespace)
    }

    /// Every command needed to move the deployment to `version`, in order.
    pub fn update_commands(&self, version: &Version) -> Vec<CommandSpec> {
        let container = self.config.container.as_deref().unwrap_or("*");
        let mut commands = vec![
            self.kubectl()
                .args(["set", "image"])
                .arg(self.resource())
                .arg(format!("{}={}", container, self.image(version))),
        ];

        if !self.config.labels.is_empty() {
            commands.push(
                self.kubectl()
                    .args(["label", "--overwrite"])
                    .arg(self.resource())
                    .args(self.config.labels.iter().map(|(k, v)| format!("{k}={v}"))),
            );
        }
        if !self.config.annotations.is_empty() {
            commands.push(
                self.kubectl()
                    .args(["annotate", "--overwrite"])
                    .arg(self.resource())
                    .args(
                        self.config
                            .annotations
                            .iter()
                            .map(|(k, v)| format!("{k}={v}")),
                    ),
            );
        }
        if let Some(replicas) = self.config.replicas {
            commands.push(
                self.kubectl()
                    .arg("scale")
                    .arg(self.resource())
                    .arg(format!("--replicas={replicas}")),
            );
        }

        commands
    }

    /// `kubectl get` printing the image of the target container.
    pub fn image_query_command(&self) -> CommandSpec {
        let path = match self.config.container {
            Some(ref name) => format!(
                "jsonpath={{.spec.template.spec.containers[?(@.name==\"{name}\")].image}}"
            ),
            None => "jsonpath={.spec.template.spec.containers[0].image}".to_string(),
        };
        self.kubectl()
            .arg("get")
            .arg(self.resource())
            .arg("--output")
            .arg(path)
    }

    async fn apply(&self, version: &Version) -> Result<(), StrategyError> {
        for cmd in self.update_commands(version) {
            cmd.execute(self.dry_run).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Strategy for KubernetesStrategy {
    async fn rollback(&self, from: &Version, to: &Version) -> Result<(), StrategyError> {
        tracing::info!(
            namespace = %self.config.namespace,
            deployment = %self.deployment,
            from = %from,
            to = %to,
            "updating kubernetes deployment"
        );
        self.apply(to).await
    }

    async fn deploy(&self, version: &Version) -> Result<(), StrategyError> {
        tracing::info!(
            namespace = %self.config.namespace,
            deployment = %self.deployment,
            version = %version,
            "deploying kubernetes deployment"
        );
        self.apply(version).await
    }

    async fn current_version(&self) -> Result<Version, StrategyError> {
        let image = self.image_query_command().output().await?;
        if image.is_empty() {
            return Err(StrategyError::NotFound {
                target: format!("no containers found in {}", self.resource()),
            });
        }
        version_from_image(&image)
    }

    fn name(&self) -> &str {
        "kubernetes"
    }
}
