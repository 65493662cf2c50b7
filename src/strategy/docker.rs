// ABOUTME: Docker Swarm service backend driven through the docker CLI.
// ABOUTME: Rolls back by updating the service image; reads the version from the service spec.

use async_trait::async_trait;

use crate::config::DockerConfig;
use crate::types::{ServiceName, Version};

use super::command::CommandSpec;
use super::error::StrategyError;
use super::{Strategy, render_template, validate_template, version_from_image};

const IMAGE_FORMAT: &str = "{{.Spec.TaskTemplate.ContainerSpec.Image}}";

/// Rolls a swarm service between image tags with `docker service update`.
#[derive(Debug, Clone)]
pub struct DockerServiceStrategy {
    service: ServiceName,
    config: DockerConfig,
    dry_run: bool,
}

impl DockerServiceStrategy {
    /// # Errors
    ///
    /// `InvalidConfig` if no service name is set or the image template lacks
    /// a `{version}` placeholder.
    pub fn new(config: DockerConfig, dry_run: bool) -> Result<Self, StrategyError> {
        let service = config
            .service
            .clone()
            .ok_or_else(|| StrategyError::InvalidConfig {
                message: "docker backend requires a service name".to_string(),
            })?;
        validate_template(config.image_template.as_deref())?;

        Ok(Self {
            service,
            config,
            dry_run,
        })
    }

    /// Image reference for `version`.
    pub fn image_tag(&self, version: &Version) -> String {
        match (&self.config.image_template, &self.config.registry) {
            (Some(template), _) => render_template(template, version),
            (None, Some(registry)) => format!("{}/{}:{}", registry, self.service, version),
            (None, None) => format!("{}:{}", self.service, version),
        }
    }

    /// `docker service update` moving the service to `version`.
    pub fn update_command(&self, version: &Version) -> CommandSpec {
        let mut cmd = CommandSpec::new("docker")
            .args(["service", "update", "--image"])
            .arg(self.image_tag(version));

        if let Some(ref network) = self.config.network {
            cmd = cmd.arg("--network-add").arg(network);
        }
        for constraint in &self.config.constraints {
            cmd = cmd.arg("--constraint-add").arg(constraint);
        }
        for (key, value) in &self.config.labels {
            cmd = cmd.arg("--label-add").arg(format!("{key}={value}"));
        }
        for (key, value) in &self.config.env {
            cmd = cmd.arg("--env-add").arg(format!("{key}={value}"));
        }
        for (flag, value) in &self.config.args {
            cmd = cmd.arg(flag);
            if !value.is_empty() {
                cmd = cmd.arg(value);
            }
        }

        cmd.arg(self.service.as_str())
    }

    /// `docker service inspect` printing the service image.
    pub fn inspect_command(&self) -> CommandSpec {
        CommandSpec::new("docker")
            .args(["service", "inspect", "--format", IMAGE_FORMAT])
            .arg(self.service.as_str())
    }
}

#[async_trait]
impl Strategy for DockerServiceStrategy {
    async fn rollback(&self, from: &Version, to: &Version) -> Result<(), StrategyError> {
        tracing::info!(
            service = %self.service,
            from = %from,
            to = %to,
            image = %self.image_tag(to),
            "updating docker service"
        );
        self.update_command(to).execute(self.dry_run).await
    }

    async fn deploy(&self, version: &Version) -> Result<(), StrategyError> {
        tracing::info!(service = %self.service, version = %version, "deploying docker service");
        self.update_command(version).execute(self.dry_run).await
    }

    async fn current_version(&self) -> Result<Version, StrategyError> {
        let image = self.inspect_command().output().await?;
        if image.is_empty() {
            return Err(StrategyError::NotFound {
                target: format!("docker service {}", self.service),
            });
        }
        version_from_image(&image)
    }

    fn name(&self) -> &str {
        "docker"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> DockerConfig {
        DockerConfig {
            service: Some(ServiceName::new("web").unwrap()),
            ..Default::default()
        }
    }

    fn v(s: &str) -> Version {
        Version::new(s).unwrap()
    }

    #[test]
    fn requires_service_name() {
        let err = DockerServiceStrategy::new(DockerConfig::default(), false).unwrap_err();
        assert!(matches!(err, StrategyError::InvalidConfig { .. }));
    }

    #[test]
    fn image_tag_without_registry() {
        let strategy = DockerServiceStrategy::new(config(), false).unwrap();
        assert_eq!(strategy.image_tag(&v("v1.0.0")), "web:v1.0.0");
    }

    #[test]
    fn image_tag_with_registry() {
        let mut config = config();
        config.registry = Some("registry.example.com".to_string());
        let strategy = DockerServiceStrategy::new(config, false).unwrap();
        assert_eq!(
            strategy.image_tag(&v("v1.0.0")),
            "registry.example.com/web:v1.0.0"
        );
    }

    #[test]
    fn template_overrides_registry() {
        let mut config = config();
        config.registry = Some("registry.example.com".to_string());
        config.image_template = Some("ghcr.io/acme/web:{version}".to_string());
        let strategy = DockerServiceStrategy::new(config, false).unwrap();
        assert_eq!(strategy.image_tag(&v("v2")), "ghcr.io/acme/web:v2");
    }

    #[test]
    fn update_command_includes_configured_flags() {
        let mut config = config();
        config.network = Some("backend".to_string());
        config.constraints = vec!["node.role==worker".to_string()];
        config.labels.insert("team".to_string(), "payments".to_string());
        config.env.insert("MODE".to_string(), "safe".to_string());
        config
            .args
            .insert("--update-parallelism".to_string(), "2".to_string());
        let strategy = DockerServiceStrategy::new(config, false).unwrap();

        let cmd = strategy.update_command(&v("v0.9.0"));
        assert_eq!(cmd.program(), "docker");
        assert_eq!(
            cmd.arguments(),
            [
                "service",
                "update",
                "--image",
                "web:v0.9.0",
                "--network-add",
                "backend",
                "--constraint-add",
                "node.role==worker",
                "--label-add",
                "team=payments",
                "--env-add",
                "MODE=safe",
                "--update-parallelism",
                "2",
                "web",
            ]
        );
    }

    #[test]
    fn inspect_command_targets_service() {
        let strategy = DockerServiceStrategy::new(config(), false).unwrap();
        let cmd = strategy.inspect_command();
        assert_eq!(cmd.arguments().last().map(String::as_str), Some("web"));
        assert!(cmd.arguments().contains(&IMAGE_FORMAT.to_string()));
    }

    #[tokio::test]
    async fn dry_run_rollback_does_not_invoke_docker() {
        let strategy = DockerServiceStrategy::new(config(), true).unwrap();
        strategy.rollback(&v("v1.0.0"), &v("v0.9.0")).await.unwrap();
    }
}
