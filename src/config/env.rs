// ABOUTME: Environment variable overlay applied on top of the YAML settings.
// ABOUTME: Scalar overrides, backend selection, and PREFIX_KEY map collection.

use std::collections::BTreeMap;
use std::num::NonZeroU32;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::types::{ServiceName, Version, parse_version_list};

use super::{BackendConfig, DockerConfig, KubernetesConfig, Settings};

/// Snapshot of the variables the overlay reads.
#[derive(Debug, Clone, Default)]
pub struct EnvOverlay {
    vars: BTreeMap<String, String>,
}

impl EnvOverlay {
    pub fn from_process() -> Self {
        Self::from_vars(std::env::vars())
    }

    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Non-empty value of `key`.
    fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    fn parse<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.get(key)
            .map(|raw| raw.parse::<T>().map_err(|e| invalid(key, e)))
            .transpose()
    }

    fn flag(&self, key: &str) -> Result<Option<bool>> {
        self.get(key).map(|raw| parse_bool(key, raw)).transpose()
    }

    fn duration(&self, key: &str) -> Result<Option<Duration>> {
        self.get(key)
            .map(|raw| humantime::parse_duration(raw).map_err(|e| invalid(key, e)))
            .transpose()
    }

    /// Every `PREFIX_KEY=value` pair as `KEY -> value`.
    pub fn map(&self, prefix: &str) -> BTreeMap<String, String> {
        let prefix = format!("{prefix}_");
        self.vars
            .iter()
            .filter_map(|(name, value)| {
                name.strip_prefix(&prefix)
                    .filter(|key| !key.is_empty())
                    .map(|key| (key.to_string(), value.clone()))
            })
            .collect()
    }

    pub fn apply(&self, settings: &mut Settings) -> Result<()> {
        if let Some(attempts) = self.parse::<u32>("ROLLBACK_MAX_ATTEMPTS")? {
            settings.retry.max_attempts = NonZeroU32::new(attempts)
                .ok_or_else(|| invalid("ROLLBACK_MAX_ATTEMPTS", "must be at least 1"))?;
        }
        if let Some(backoff) = self.duration("ROLLBACK_BACKOFF")? {
            settings.retry.backoff = backoff;
        }
        if let Some(dry_run) = self.flag("ROLLBACK_DRY_RUN")? {
            settings.dry_run = dry_run;
        }
        if let Some(level) = self.get("ROLLBACK_LOG_LEVEL") {
            settings.logging.level = level.to_string();
        }
        if let Some(from) = self.parse::<Version>("ROLLBACK_FROM_VERSION")? {
            settings.from_version = Some(from);
        }
        if let Some(list) = self.get("ROLLBACK_KNOWN_VERSIONS") {
            let versions =
                parse_version_list(list).map_err(|e| invalid("ROLLBACK_KNOWN_VERSIONS", e))?;
            settings.versions.extend(versions);
        }
        if let Some(url) = self.get("HEALTH_CHECK_URL") {
            settings.health_check.url = Some(url.to_string());
        }

        self.select_backend(settings)?;
        match settings.backend {
            Some(BackendConfig::Docker(ref mut docker)) => self.apply_docker(docker)?,
            Some(BackendConfig::Kubernetes(ref mut k8s)) => self.apply_kubernetes(k8s)?,
            None => {}
        }
        Ok(())
    }

    /// Honor `ROLLBACK_BACKEND`, or infer a backend from its identifying
    /// variable when the file configured none.
    fn select_backend(&self, settings: &mut Settings) -> Result<()> {
        let wanted = match self.get("ROLLBACK_BACKEND") {
            Some(name) => Some(name.to_ascii_lowercase()),
            None if settings.backend.is_some() => None,
            None if self.get("DOCKER_SERVICE_NAME").is_some() => Some("docker".to_string()),
            None if self.get("K8S_DEPLOYMENT").is_some() => Some("kubernetes".to_string()),
            None => None,
        };
        let Some(wanted) = wanted else {
            return Ok(());
        };

        let current = settings.backend.as_ref().map(BackendConfig::name);
        if current == Some(wanted.as_str()) {
            return Ok(());
        }
        settings.backend = Some(match wanted.as_str() {
            "docker" => BackendConfig::Docker(DockerConfig::default()),
            "kubernetes" | "k8s" => BackendConfig::Kubernetes(KubernetesConfig::default()),
            other => {
                return Err(invalid(
                    "ROLLBACK_BACKEND",
                    format!("unknown backend `{other}` (expected docker or kubernetes)"),
                ));
            }
        });
        Ok(())
    }

    fn apply_docker(&self, docker: &mut DockerConfig) -> Result<()> {
        if let Some(service) = self.get("DOCKER_SERVICE_NAME") {
            docker.service =
                Some(ServiceName::new(service).map_err(|e| invalid("DOCKER_SERVICE_NAME", e))?);
        }
        if let Some(registry) = self.get("DOCKER_REGISTRY") {
            docker.registry = Some(registry.to_string());
        }
        if let Some(network) = self.get("DOCKER_NETWORK_MODE") {
            docker.network = Some(network.to_string());
        }
        if let Some(template) = self.get("DOCKER_IMAGE_TEMPLATE") {
            docker.image_template = Some(template.to_string());
        }
        docker.labels.extend(self.map("DOCKER_LABELS"));
        docker.env.extend(self.map("DOCKER_ENV_VARS"));
        docker.args.extend(self.map("DOCKER_CUSTOM_ARGS"));
        Ok(())
    }

    fn apply_kubernetes(&self, k8s: &mut KubernetesConfig) -> Result<()> {
        if let Some(deployment) = self.get("K8S_DEPLOYMENT") {
            k8s.deployment =
                Some(ServiceName::new(deployment).map_err(|e| invalid("K8S_DEPLOYMENT", e))?);
        }
        if let Some(namespace) = self.get("K8S_NAMESPACE") {
            k8s.namespace = namespace.to_string();
        }
        if let Some(template) = self.get("K8S_IMAGE_TEMPLATE") {
            k8s.image_template = Some(template.to_string());
        }
        if let Some(context) = self.get("K8S_CONTEXT") {
            k8s.context = Some(context.to_string());
        }
        k8s.labels.extend(self.map("K8S_LABELS"));
        k8s.annotations.extend(self.map("K8S_ANNOTATIONS"));
        Ok(())
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(invalid(key, format!("`{raw}` is not a boolean"))),
    }
}

fn invalid(var: &str, reason: impl std::fmt::Display) -> Error {
    Error::InvalidEnvVar {
        var: var.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overlay(vars: &[(&str, &str)]) -> EnvOverlay {
        EnvOverlay::from_vars(vars.iter().copied())
    }

    #[test]
    fn map_strips_prefix_and_keeps_key_case() {
        let env = overlay(&[
            ("DOCKER_LABELS_team", "payments"),
            ("DOCKER_LABELS_TIER", "web"),
            ("DOCKER_LABELS_", "ignored"),
            ("DOCKER_LABELSX", "ignored"),
        ]);
        let labels = env.map("DOCKER_LABELS");
        assert_eq!(labels.len(), 2);
        assert_eq!(labels.get("team").map(String::as_str), Some("payments"));
        assert_eq!(labels.get("TIER").map(String::as_str), Some("web"));
    }

    #[test]
    fn scalar_overrides() {
        let mut settings = Settings::default();
        overlay(&[
            ("ROLLBACK_MAX_ATTEMPTS", "5"),
            ("ROLLBACK_BACKOFF", "250ms"),
            ("ROLLBACK_DRY_RUN", "yes"),
            ("ROLLBACK_FROM_VERSION", "v1.1.0"),
            ("ROLLBACK_KNOWN_VERSIONS", "v1.0.0, v1.1.0"),
        ])
        .apply(&mut settings)
        .unwrap();

        assert_eq!(settings.retry.attempts(), 5);
        assert_eq!(settings.retry.backoff, Duration::from_millis(250));
        assert!(settings.dry_run);
        assert_eq!(settings.from_version.unwrap().as_str(), "v1.1.0");
        assert_eq!(settings.versions.len(), 2);
    }

    #[test]
    fn invalid_values_are_errors() {
        for (key, value) in [
            ("ROLLBACK_MAX_ATTEMPTS", "three"),
            ("ROLLBACK_MAX_ATTEMPTS", "0"),
            ("ROLLBACK_DRY_RUN", "maybe"),
            ("ROLLBACK_BACKOFF", "soon"),
            ("ROLLBACK_BACKEND", "nomad"),
        ] {
            let mut settings = Settings::default();
            let err = overlay(&[(key, value)]).apply(&mut settings).unwrap_err();
            assert!(
                matches!(err, Error::InvalidEnvVar { ref var, .. } if var == key),
                "{key}={value} gave {err}"
            );
        }
    }

    #[test]
    fn docker_service_name_selects_docker_backend() {
        let mut settings = Settings::default();
        overlay(&[
            ("DOCKER_SERVICE_NAME", "web"),
            ("DOCKER_REGISTRY", "registry.example.com"),
            ("DOCKER_ENV_VARS_MODE", "safe"),
            ("K8S_NAMESPACE", "ignored"),
        ])
        .apply(&mut settings)
        .unwrap();

        let Some(BackendConfig::Docker(docker)) = settings.backend else {
            panic!("expected docker backend");
        };
        assert_eq!(docker.service.unwrap().as_str(), "web");
        assert_eq!(docker.registry.as_deref(), Some("registry.example.com"));
        assert_eq!(docker.env.get("MODE").map(String::as_str), Some("safe"));
    }

    #[test]
    fn explicit_backend_replaces_file_backend() {
        let mut settings = Settings {
            backend: Some(BackendConfig::Docker(DockerConfig::default())),
            ..Default::default()
        };
        overlay(&[
            ("ROLLBACK_BACKEND", "kubernetes"),
            ("K8S_DEPLOYMENT", "api"),
            ("K8S_NAMESPACE", "payments"),
            ("K8S_ANNOTATIONS_owner", "team-a"),
        ])
        .apply(&mut settings)
        .unwrap();

        let Some(BackendConfig::Kubernetes(k8s)) = settings.backend else {
            panic!("expected kubernetes backend");
        };
        assert_eq!(k8s.deployment.unwrap().as_str(), "api");
        assert_eq!(k8s.namespace, "payments");
        assert_eq!(
            k8s.annotations.get("owner").map(String::as_str),
            Some("team-a")
        );
    }

    #[test]
    fn matching_backend_keeps_file_values() {
        let mut settings = Settings {
            backend: Some(BackendConfig::Docker(DockerConfig {
                registry: Some("file.example.com".to_string()),
                ..Default::default()
            })),
            ..Default::default()
        };
        overlay(&[("ROLLBACK_BACKEND", "docker")])
            .apply(&mut settings)
            .unwrap();

        let Some(BackendConfig::Docker(docker)) = settings.backend else {
            panic!("expected docker backend");
        };
        assert_eq!(docker.registry.as_deref(), Some("file.example.com"));
    }
}
