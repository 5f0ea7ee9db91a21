use tracing::{debug, info, warn};

use crate::k8s::ClusterSource;
use crate::model::{Health, NodeInfo, PodInfo, TargetId, classify};

/// The most recent pod and node lists fetched for one target.
///
/// `pods_fetched`/`nodes_fetched` stay set once a list has been fetched
/// successfully, so an empty list after a failed refresh is still "zero",
/// not "no data".
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub pods: Vec<PodInfo>,
    pub nodes: Vec<NodeInfo>,
    pub pods_fetched: bool,
    pub nodes_fetched: bool,
    pub fetch_error: Option<String>,
}

impl Snapshot {
    pub fn has_data(&self) -> bool {
        self.pods_fetched || self.nodes_fetched
    }
}

#[derive(Debug)]
enum Connection<S> {
    Ready(S),
    Failed(String),
}

#[derive(Debug)]
pub struct Target<S> {
    id: TargetId,
    connection: Connection<S>,
    snapshot: Snapshot,
}

impl<S: ClusterSource> Target<S> {
    pub async fn refresh(&mut self) {
        let Connection::Ready(source) = &self.connection else {
            debug!(target_id = %self.id, "skipping refresh for disconnected target");
            return;
        };

        let (pods, nodes) = tokio::join!(
            source.list_pods(&self.id.namespace),
            source.list_nodes()
        );
        let mut errors = Vec::new();
        let mut next = Snapshot {
            pods_fetched: self.snapshot.pods_fetched,
            nodes_fetched: self.snapshot.nodes_fetched,
            ..Snapshot::default()
        };

        match pods {
            Ok(pods) => {
                next.pods = pods;
                next.pods_fetched = true;
            }
            Err(error) => {
                warn!(target_id = %self.id, "pod refresh failed: {error:#}");
                errors.push(format!("pods: {error:#}"));
            }
        }
        match nodes {
            Ok(nodes) => {
                next.nodes = nodes;
                next.nodes_fetched = true;
            }
            Err(error) => {
                warn!(target_id = %self.id, "node refresh failed: {error:#}");
                errors.push(format!("nodes: {error:#}"));
            }
        }
        if !errors.is_empty() {
            next.fetch_error = Some(errors.join("; "));
        } else if self.snapshot.fetch_error.is_some() {
            info!(target_id = %self.id, "cluster target recovered");
        }

        for pod in &next.pods {
            if let Some((container, reason)) = pod
                .container_statuses
                .first()
                .and_then(|status| status.waiting.as_ref().map(|reason| (&status.name, reason)))
            {
                debug!(
                    target_id = %self.id,
                    "{}/{} container {container} waiting: {reason}",
                    pod.namespace.as_deref().unwrap_or("-"),
                    pod.name
                );
            }
        }
        debug!(
            target_id = %self.id,
            pods = next.pods.len(),
            nodes = next.nodes.len(),
            first_node = next.nodes.first().map(|node| node.name.as_str()).unwrap_or("-"),
            "snapshot refreshed"
        );

        self.snapshot = next;
    }
}

impl<S> Target<S> {
    pub fn connected(id: TargetId, source: S) -> Self {
        Self {
            id,
            connection: Connection::Ready(source),
            snapshot: Snapshot::default(),
        }
    }

    pub fn failed(id: TargetId, message: impl Into<String>) -> Self {
        Self {
            id,
            connection: Connection::Failed(message.into()),
            snapshot: Snapshot::default(),
        }
    }

    pub fn id(&self) -> &TargetId {
        &self.id
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn connection_error(&self) -> Option<&str> {
        match &self.connection {
            Connection::Ready(_) => None,
            Connection::Failed(message) => Some(message),
        }
    }

    pub fn pod_count(&self) -> usize {
        self.snapshot.pods.len()
    }

    pub fn node_count(&self) -> usize {
        self.snapshot.nodes.len()
    }

    pub fn healthy_pods(&self) -> Option<Vec<&PodInfo>> {
        self.pods_with(Health::Healthy)
    }

    pub fn unhealthy_pods(&self) -> Option<Vec<&PodInfo>> {
        self.pods_with(Health::Unhealthy)
    }

    fn pods_with(&self, health: Health) -> Option<Vec<&PodInfo>> {
        if !self.snapshot.pods_fetched {
            return None;
        }
        Some(
            self.snapshot
                .pods
                .iter()
                .filter(|pod| classify(pod) == health)
                .collect(),
        )
    }
}


#[cfg(test)]
mod tests {
    use super::Target;
    use super::fake::{ScriptedSource, nodes};
    use crate::model::{PodInfo, PodPhase, TargetId, pod};

    fn sample_pods() -> Vec<PodInfo> {
        vec![
            pod("a", PodPhase::Running, &[None]),
            pod("b", PodPhase::Pending, &[Some("ContainerCreating")]),
            pod("c", PodPhase::Running, &[None]),
            pod("d", PodPhase::Running, &[]),
            pod("e", PodPhase::Succeeded, &[None]),
        ]
    }

    fn names(pods: &[&PodInfo]) -> Vec<String> {
        pods.iter().map(|pod| pod.name.clone()).collect()
    }

    #[test]
    fn new_target_has_no_data() {
        let target = Target::connected(TargetId::default(), ScriptedSource::new());
        assert_eq!(target.pod_count(), 0);
        assert_eq!(target.node_count(), 0);
        assert!(target.healthy_pods().is_none());
        assert!(target.unhealthy_pods().is_none());
        assert!(!target.snapshot().has_data());
    }

    #[tokio::test]
    async fn refresh_partitions_pods_preserving_order() {
        let source = ScriptedSource::new()
            .pods(Ok(sample_pods()))
            .nodes(Ok(nodes(2)));
        let mut target = Target::connected(TargetId::default(), source);
        target.refresh().await;

        let healthy = target.healthy_pods().unwrap();
        let unhealthy = target.unhealthy_pods().unwrap();
        assert_eq!(names(&healthy), vec!["a", "c"]);
        assert_eq!(names(&unhealthy), vec!["b", "d", "e"]);
        assert_eq!(healthy.len() + unhealthy.len(), target.pod_count());
        assert_eq!(target.node_count(), 2);
        assert!(target.snapshot().fetch_error.is_none());
    }

    #[tokio::test]
    async fn refresh_scopes_pods_to_namespace() {
        let source = ScriptedSource::new().pods(Ok(Vec::new())).nodes(Ok(nodes(1)));
        let mut target = Target::connected(TargetId::new("payments", ""), source);
        target.refresh().await;

        let Target { connection, .. } = &target;
        let super::Connection::Ready(source) = connection else {
            panic!("target should be connected");
        };
        assert_eq!(*source.namespaces.lock().unwrap(), vec!["payments"]);
    }

    #[tokio::test]
    async fn valid_empty_pod_list_is_not_no_data() {
        let source = ScriptedSource::new().pods(Ok(Vec::new())).nodes(Ok(nodes(1)));
        let mut target = Target::connected(TargetId::default(), source);
        target.refresh().await;

        assert_eq!(target.healthy_pods().map(|pods| pods.len()), Some(0));
        assert_eq!(target.unhealthy_pods().map(|pods| pods.len()), Some(0));
    }

    #[tokio::test]
    async fn pod_failure_does_not_block_nodes() {
        let source = ScriptedSource::new()
            .pods(Err("apiserver unavailable"))
            .nodes(Ok(nodes(3)));
        let mut target = Target::connected(TargetId::default(), source);
        target.refresh().await;

        assert_eq!(target.pod_count(), 0);
        assert_eq!(target.node_count(), 3);
        assert!(target.healthy_pods().is_none());
        assert!(target.snapshot().has_data());
        assert!(
            target
                .snapshot()
                .fetch_error
                .as_deref()
                .is_some_and(|error| error.contains("apiserver unavailable"))
        );
    }

    #[tokio::test]
    async fn later_pod_failure_resets_count_but_keeps_data_flag() {
        let source = ScriptedSource::new()
            .pods(Ok(sample_pods()))
            .pods(Err("timeout"))
            .nodes(Ok(nodes(1)));
        let mut target = Target::connected(TargetId::default(), source);

        target.refresh().await;
        assert_eq!(target.pod_count(), 5);

        target.refresh().await;
        assert_eq!(target.pod_count(), 0);
        assert_eq!(target.healthy_pods().map(|pods| pods.len()), Some(0));
        assert_eq!(target.unhealthy_pods().map(|pods| pods.len()), Some(0));
        assert!(target.connection_error().is_none());
    }

    #[tokio::test]
    async fn failed_target_never_refreshes() {
        let mut target: Target<ScriptedSource> =
            Target::failed(TargetId::default(), "Unable to load kube config");
        target.refresh().await;

        assert_eq!(target.connection_error(), Some("Unable to load kube config"));
        assert!(target.snapshot().fetch_error.is_none());
        assert!(!target.snapshot().has_data());
    }
}
