// ABOUTME: Backend selection and per-platform settings.
// ABOUTME: Docker swarm service and Kubernetes deployment parameters.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::types::ServiceName;

/// Which platform the rollback engine drives.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BackendConfig {
    Docker(DockerConfig),
    Kubernetes(KubernetesConfig),
}

impl BackendConfig {
    pub fn name(&self) -> &'static str {
        match self {
            BackendConfig::Docker(_) => "docker",
            BackendConfig::Kubernetes(_) => "kubernetes",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DockerConfig {
    #[serde(default)]
    pub service: Option<ServiceName>,

    #[serde(default)]
    pub registry: Option<String>,

    #[serde(default)]
    pub network: Option<String>,

    #[serde(default)]
    pub constraints: Vec<String>,

    #[serde(default)]
    pub labels: BTreeMap<String, String>,

    #[serde(default)]
    pub env: BTreeMap<String, String>,

    /// Extra `docker service update` flags; an empty value passes the flag alone.
    #[serde(default)]
    pub args: BTreeMap<String, String>,

    /// Image reference with a `{version}` placeholder.
    #[serde(default)]
    pub image_template: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KubernetesConfig {
    #[serde(default)]
    pub deployment: Option<ServiceName>,

    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Container to retarget; every container when unset.
    #[serde(default)]
    pub container: Option<String>,

    #[serde(default)]
    pub context: Option<String>,

    #[serde(default)]
    pub kubeconfig: Option<PathBuf>,

    #[serde(default)]
    pub image_template: Option<String>,

    #[serde(default)]
    pub labels: BTreeMap<String, String>,

    #[serde(default)]
    pub annotations: BTreeMap<String, String>,

    #[serde(default)]
    pub replicas: Option<u32>,
}

fn default_namespace() -> String {
    "default".to_string()
}

impl Default for KubernetesConfig {
    fn default() -> Self {
        Self {
            deployment: None,
            namespace: default_namespace(),
            container: None,
            context: None,
            kubeconfig: None,
            image_template: None,
            labels: BTreeMap::new(),
            annotations: BTreeMap::new(),
            replicas: None,
        }
    }
}
