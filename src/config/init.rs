// ABOUTME: Config scaffolding for new projects.
// ABOUTME: Writes a commented stable-galaxy.yml template.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::ServiceName;

use super::CONFIG_FILENAME;

/// Write a template config into `dir`, returning its path.
///
/// `service` names the docker service in the template; `my-app` otherwise.
pub fn init_config(dir: &Path, service: Option<&str>, force: bool) -> Result<PathBuf> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    let service = match service {
        Some(s) => ServiceName::new(s).map_err(|e| Error::InvalidConfig(e.to_string()))?,
        None => ServiceName::new("my-app").map_err(|e| Error::InvalidConfig(e.to_string()))?,
    };

    std::fs::write(&config_path, template_yaml(&service))?;
    Ok(config_path)
}

fn template_yaml(service: &ServiceName) -> String {
    format!(
        r#"backend:
  type: docker
  service: {service}
  # registry: registry.example.com
  # image_template: registry.example.com/{service}:{{version}}

# For Kubernetes instead:
# backend:
#   type: kubernetes
#   deployment: {service}
#   namespace: default

retry:
  max_attempts: 3
  backoff: 5s
  timeout: 5m

dry_run: false

# lexicographic compares raw strings (v9 sorts after v10); semantic parses semver.
ordering: lexicographic

versions: []

# constraints:
#   min_version: v1.0.0
#   blacklist: [v1.0.1]

health_check:
  timeout: 30s
  retry_attempts: 3
  success_status: 200

notifications:
  enabled: true
  channels: [slack]

logging:
  level: info
  format: text
"#
    )
}
