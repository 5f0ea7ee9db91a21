use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tokio::time::Duration;
use tracing::warn;

use crate::cli::CliArgs;
use crate::model::TargetId;

#[derive(Debug, Clone, Deserialize, Default)]
struct KubestatConfigFile {
    #[serde(default)]
    kube: KubeSettings,
}

#[derive(Debug, Clone, Eq, PartialEq, Deserialize)]
#[serde(default)]
pub struct KubeSettings {
    #[serde(alias = "kubeconfig")]
    pub configpath: String,
    pub namespace: String,
    #[serde(alias = "refresh_secs")]
    pub refreshtime: u64,
    pub title: String,
    #[serde(alias = "timeout_secs")]
    pub timeout: u64,
    pub targets: Vec<TargetSpec>,
}

#[derive(Debug, Clone, Eq, PartialEq, Deserialize, Default)]
#[serde(default)]
pub struct TargetSpec {
    pub namespace: String,
    pub context: String,
}

impl Default for KubeSettings {
    fn default() -> Self {
        Self {
            configpath: String::new(),
            namespace: String::new(),
            refreshtime: default_refresh_secs(),
            title: "Kube".to_string(),
            timeout: default_timeout_secs(),
            targets: Vec::new(),
        }
    }
}

impl KubeSettings {
    pub fn load(explicit: Option<&Path>) -> Result<(Option<PathBuf>, Self)> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => discover_config_path(),
        };
        let Some(path) = path else {
            return Ok((None, Self::default()));
        };

        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let settings =
            Self::parse(&raw).with_context(|| format!("failed to parse config {}", path.display()))?;
        Ok((Some(path), settings))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        let parsed: KubestatConfigFile = serde_yaml::from_str(raw)?;
        Ok(parsed.kube)
    }

    pub fn apply_cli(&mut self, args: &CliArgs) {
        if let Some(path) = &args.kubeconfig {
            self.configpath = path.clone();
        }
        if let Some(secs) = args.refresh_secs {
            self.refreshtime = secs;
        }

        let namespace = if args.all_namespaces {
            if args.namespace.is_some() {
                warn!("both --all-namespaces and --namespace were provided, using all namespaces");
            }
            Some(String::new())
        } else {
            args.namespace.clone()
        };

        if !args.contexts.is_empty() {
            let namespace = namespace.unwrap_or_else(|| self.namespace.clone());
            self.targets = args
                .contexts
                .iter()
                .map(|context| TargetSpec {
                    namespace: namespace.clone(),
                    context: context.clone(),
                })
                .collect();
            self.namespace = namespace;
        } else if let Some(namespace) = namespace {
            for target in &mut self.targets {
                target.namespace = namespace.clone();
            }
            self.namespace = namespace;
        }
    }

    pub fn target_ids(&self) -> Vec<TargetId> {
        if self.targets.is_empty() {
            return vec![TargetId::new(self.namespace.trim(), "")];
        }
        self.targets
            .iter()
            .map(|target| TargetId::new(target.namespace.trim(), target.context.trim()))
            .collect()
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refreshtime.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout.max(1))
    }
}

fn default_refresh_secs() -> u64 {
    60
}

fn default_timeout_secs() -> u64 {
    10
}

fn discover_config_path() -> Option<PathBuf> {
    std::env::var_os("KUBESTAT_CONFIG")
        .filter(|path| !path.to_string_lossy().trim().is_empty())
        .map(PathBuf::from)
        .or_else(|| {
            config_candidates(std::env::var_os("HOME").map(PathBuf::from))
                .into_iter()
                .find(|candidate| candidate.exists())
        })
}

fn config_candidates(home: Option<PathBuf>) -> Vec<PathBuf> {
    let local = ["kubestat.yaml", "kubestat.yml", ".kubestat.yaml"].map(PathBuf::from);
    let user = home.into_iter().flat_map(|home| {
        [
            ".config/kubestat/config.yaml",
            ".config/kubestat/config.yml",
            ".kubestat.yaml",
        ]
        .map(|relative| home.join(relative))
    });
    local.into_iter().chain(user).collect()
}

#[cfg(test)]
mod tests {
    use super::{KubeSettings, TargetSpec, config_candidates};
    use crate::cli::CliArgs;
    use crate::model::TargetId;
    use std::path::PathBuf;
    use tokio::time::Duration;

    #[test]
    fn empty_file_uses_defaults() {
        let settings = KubeSettings::parse("").unwrap();
        assert_eq!(settings, KubeSettings::default());
        assert_eq!(settings.refresh_interval(), Duration::from_secs(60));
        assert_eq!(settings.target_ids(), vec![TargetId::new("", "")]);
    }

    #[test]
    fn parses_kube_section_with_partial_keys() {
        let settings = KubeSettings::parse(
            "kube:\n  namespace: payments\n  refreshtime: 15\n  configpath: /tmp/kubeconfig\n",
        )
        .unwrap();
        assert_eq!(settings.namespace, "payments");
        assert_eq!(settings.refresh_interval(), Duration::from_secs(15));
        assert_eq!(settings.configpath, "/tmp/kubeconfig");
        assert_eq!(settings.title, "Kube");
        assert_eq!(settings.request_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn parses_target_list() {
        let settings = KubeSettings::parse(
            "kube:\n  targets:\n    - context: prod\n    - namespace: web\n      context: staging\n",
        )
        .unwrap();
        assert_eq!(
            settings.target_ids(),
            vec![TargetId::new("", "prod"), TargetId::new("web", "staging")]
        );
    }

    #[test]
    fn zero_refresh_is_clamped() {
        let settings = KubeSettings::parse("kube:\n  refreshtime: 0\n").unwrap();
        assert_eq!(settings.refresh_interval(), Duration::from_secs(1));
    }

    #[test]
    fn rejects_malformed_yaml() {
        assert!(KubeSettings::parse("kube: [unclosed").is_err());
    }

    #[test]
    fn cli_contexts_replace_targets() {
        let mut settings = KubeSettings {
            namespace: "web".to_string(),
            targets: vec![TargetSpec {
                namespace: "old".to_string(),
                context: "old".to_string(),
            }],
            ..KubeSettings::default()
        };
        let args = CliArgs {
            contexts: vec!["prod".to_string(), "dev".to_string()],
            refresh_secs: Some(30),
            kubeconfig: Some("/etc/kube/config".to_string()),
            ..CliArgs::default()
        };
        settings.apply_cli(&args);

        assert_eq!(
            settings.target_ids(),
            vec![TargetId::new("web", "prod"), TargetId::new("web", "dev")]
        );
        assert_eq!(settings.refreshtime, 30);
        assert_eq!(settings.configpath, "/etc/kube/config");
    }

    #[test]
    fn all_namespaces_wins_over_namespace() {
        let mut settings = KubeSettings::default();
        let args = CliArgs {
            namespace: Some("web".to_string()),
            all_namespaces: true,
            ..CliArgs::default()
        };
        settings.apply_cli(&args);
        assert_eq!(settings.target_ids(), vec![TargetId::new("", "")]);
    }

    #[test]
    fn cli_namespace_applies_to_file_targets() {
        let mut settings = KubeSettings::parse("kube:\n  targets:\n    - context: prod\n").unwrap();
        let args = CliArgs {
            namespace: Some("jobs".to_string()),
            ..CliArgs::default()
        };
        settings.apply_cli(&args);
        assert_eq!(settings.target_ids(), vec![TargetId::new("jobs", "prod")]);
    }

    #[test]
    fn candidates_check_working_directory_before_home() {
        let candidates = config_candidates(Some(PathBuf::from("/home/ops")));
        assert_eq!(
            candidates,
            vec![
                PathBuf::from("kubestat.yaml"),
                PathBuf::from("kubestat.yml"),
                PathBuf::from(".kubestat.yaml"),
                PathBuf::from("/home/ops/.config/kubestat/config.yaml"),
                PathBuf::from("/home/ops/.config/kubestat/config.yml"),
                PathBuf::from("/home/ops/.kubestat.yaml"),
            ]
        );
        assert_eq!(config_candidates(None).len(), 3);
    }
}
