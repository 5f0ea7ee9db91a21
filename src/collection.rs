use chrono::{DateTime, Local};
use futures::future::join_all;
use tracing::{debug, info};

use crate::k8s::ClusterSource;
use crate::target::Target;

#[derive(Debug)]
pub struct TargetCollection<S> {
    targets: Vec<Target<S>>,
    cursor: usize,
    update_count: u64,
    last_refreshed: Option<DateTime<Local>>,
}

impl<S> TargetCollection<S> {
    pub fn new(targets: Vec<Target<S>>) -> Self {
        Self {
            targets,
            cursor: 0,
            update_count: 0,
            last_refreshed: None,
        }
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    pub fn last_refreshed(&self) -> Option<DateTime<Local>> {
        self.last_refreshed
    }

    pub fn current(&self) -> Option<&Target<S>> {
        self.targets.get(self.cursor)
    }

    pub fn next(&mut self) {
        if self.targets.is_empty() {
            return;
        }
        self.cursor = (self.cursor + 1) % self.targets.len();
        debug!(cursor = self.cursor, "selected next target");
    }

    pub fn prev(&mut self) {
        if self.targets.is_empty() {
            return;
        }
        self.cursor = self
            .cursor
            .checked_sub(1)
            .unwrap_or(self.targets.len() - 1);
        debug!(cursor = self.cursor, "selected previous target");
    }
}

impl<S: ClusterSource> TargetCollection<S> {
    pub async fn refresh_all(&mut self) {
        join_all(self.targets.iter_mut().map(|target| target.refresh())).await;
        self.update_count += 1;
        self.last_refreshed = Some(Local::now());
        info!(
            targets = self.targets.len(),
            update = self.update_count,
            "refreshed cluster targets"
        );
    }
}
