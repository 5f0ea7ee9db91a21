use anyhow::{Context, Result};
use k8s_openapi::api::core::v1::{ContainerStatus, Node, Pod};
use kube::api::ListParams;
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Api, Client, Config, ResourceExt};
use std::path::Path;
use tokio::time::{Duration, timeout};
use tracing::debug;

use crate::model::{ContainerStatusInfo, NodeInfo, PodInfo, PodPhase};

pub trait ClusterSource {
    async fn list_pods(&self, namespace: &str) -> Result<Vec<PodInfo>>;

    async fn list_nodes(&self) -> Result<Vec<NodeInfo>>;
}

#[derive(Clone)]
pub struct KubeSource {
    client: Client,
    timeout: Duration,
}

impl KubeSource {
    pub async fn connect(kubeconfig_path: &str, context: &str, timeout: Duration) -> Result<Self> {
        let context = (!context.trim().is_empty()).then(|| context.trim().to_string());
        let kubeconfig = if kubeconfig_path.trim().is_empty() {
            Kubeconfig::read().ok()
        } else {
            let path = Path::new(kubeconfig_path.trim());
            Some(
                Kubeconfig::read_from(path)
                    .with_context(|| format!("failed to read kubeconfig {}", path.display()))?,
            )
        };

        let config = if let Some(kubeconfig) = kubeconfig {
            let options = KubeConfigOptions {
                context,
                cluster: None,
                user: None,
            };
            Config::from_custom_kubeconfig(kubeconfig, &options)
                .await
                .context("failed to load Kubernetes configuration")?
        } else {
            if context.is_some() {
                anyhow::bail!("kubeconfig not found; context selection is unavailable");
            }
            Config::infer()
                .await
                .context("failed to infer Kubernetes configuration")?
        };

        debug!(cluster = %config.cluster_url, "connecting to cluster");
        let client = Client::try_from(config).context("failed to create Kubernetes client")?;

        Ok(Self { client, timeout })
    }
}

impl ClusterSource for KubeSource {
    async fn list_pods(&self, namespace: &str) -> Result<Vec<PodInfo>> {
        let pods: Api<Pod> = if namespace.trim().is_empty() {
            Api::all(self.client.clone())
        } else {
            Api::namespaced(self.client.clone(), namespace.trim())
        };

        let list = timeout(self.timeout, pods.list(&ListParams::default()))
            .await
            .with_context(|| format!("listing pods timed out after {:?}", self.timeout))?
            .context("failed to list pods")?;
        Ok(list.into_iter().map(|pod| pod_info(&pod)).collect())
    }

    async fn list_nodes(&self) -> Result<Vec<NodeInfo>> {
        let nodes: Api<Node> = Api::all(self.client.clone());
        let list = timeout(self.timeout, nodes.list(&ListParams::default()))
            .await
            .with_context(|| format!("listing nodes timed out after {:?}", self.timeout))?
            .context("failed to list nodes")?;
        Ok(list
            .into_iter()
            .map(|node| NodeInfo {
                name: node.name_any(),
            })
            .collect())
    }
}

fn pod_info(pod: &Pod) -> PodInfo {
    let status = pod.status.as_ref();
    let phase = status
        .and_then(|value| value.phase.as_deref())
        .map(PodPhase::from_token)
        .unwrap_or_default();
    let container_statuses = status
        .and_then(|value| value.container_statuses.as_deref())
        .unwrap_or(&[])
        .iter()
        .map(container_status_info)
        .collect();

    PodInfo {
        name: pod.name_any(),
        namespace: pod.namespace(),
        phase,
        container_statuses,
    }
}

fn container_status_info(status: &ContainerStatus) -> ContainerStatusInfo {
    let waiting = status
        .state
        .as_ref()
        .and_then(|state| state.waiting.as_ref())
        .map(|waiting| {
            waiting
                .reason
                .clone()
                .filter(|reason| !reason.is_empty())
                .unwrap_or_else(|| "Waiting".to_string())
        });

    ContainerStatusInfo {
        name: status.name.clone(),
        waiting,
    }
}
