use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum PodPhase {
    Pending,
    Running,
    Succeeded,
    Failed,
    #[default]
    Unknown,
}

impl PodPhase {
    pub fn from_token(token: &str) -> Self {
        match token {
            "Pending" => Self::Pending,
            "Running" => Self::Running,
            "Succeeded" => Self::Succeeded,
            "Failed" => Self::Failed,
            _ => Self::Unknown,
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub struct ContainerStatusInfo {
    pub name: String,
    pub waiting: Option<String>,
}

#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub struct PodInfo {
    pub name: String,
    pub namespace: Option<String>,
    pub phase: PodPhase,
    pub container_statuses: Vec<ContainerStatusInfo>,
}

#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub struct NodeInfo {
    pub name: String,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Health {
    Healthy,
    Unhealthy,
}

/// Classifies a pod from its phase and first container status.
///
/// Only the first container status is consulted. This may need tuning.
pub fn classify(pod: &PodInfo) -> Health {
    match pod.container_statuses.first() {
        Some(first) if first.waiting.is_none() && pod.phase == PodPhase::Running => {
            Health::Healthy
        }
        _ => Health::Unhealthy,
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub struct TargetId {
    pub namespace: String,
    pub context: String,
}

impl TargetId {
    pub fn new(namespace: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            context: context.into(),
        }
    }

    pub fn all_namespaces(&self) -> bool {
        self.namespace.trim().is_empty()
    }

    pub fn namespace_label(&self) -> &str {
        if self.all_namespaces() {
            "ALL"
        } else {
            &self.namespace
        }
    }
}

impl Display for TargetId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.context.is_empty() {
            write!(f, "{}", self.namespace_label())
        } else {
            write!(f, "{}@{}", self.namespace_label(), self.context)
        }
    }
}

#[cfg(test)]
pub(crate) fn pod(name: &str, phase: PodPhase, waiting: &[Option<&str>]) -> PodInfo {
    PodInfo {
        name: name.to_string(),
        namespace: Some("default".to_string()),
        phase,
        container_statuses: waiting
            .iter()
            .enumerate()
            .map(|(idx, reason)| ContainerStatusInfo {
                name: format!("c{idx}"),
                waiting: reason.map(str::to_string),
            })
            .collect(),
    }
}
