use tokio::time::Duration;
use tracing::{info, warn};

use crate::collection::TargetCollection;
use crate::k8s::{ClusterSource, KubeSource};
use crate::model::TargetId;
use crate::render::{self, LOADING, StyledLine, StyledText, TextSurface, Tone};
use crate::target::Target;

pub const HELP_TEXT: &str = "\
 Keyboard commands for Kube:

   Retrieves Pod and Node info using the Kubernetes API

   n / l / → / Tab        next namespace or context
   p / h / ← / Shift-Tab  previous namespace or context
   r / F5                 refresh now
   ?                      toggle this help
   q / Esc / Ctrl-C       quit";

#[derive(Debug)]
pub struct KubeWidget<S> {
    name: String,
    targets: TargetCollection<S>,
}

impl<S> KubeWidget<S> {
    pub fn new(name: impl Into<String>, targets: Vec<Target<S>>) -> Self {
        Self {
            name: name.into(),
            targets: TargetCollection::new(targets),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn targets(&self) -> &TargetCollection<S> {
        &self.targets
    }

    pub fn show_loading(&self, surface: &mut impl TextSurface) {
        surface.set_title(StyledLine::new().push(Tone::Normal, self.name.as_str()));
        surface.set_text(StyledText::single(
            StyledLine::new().push(Tone::Normal, LOADING),
        ));
    }

    pub fn next(&mut self, surface: &mut impl TextSurface) {
        self.targets.next();
        self.display(surface);
    }

    pub fn prev(&mut self, surface: &mut impl TextSurface) {
        self.targets.prev();
        self.display(surface);
    }

    pub fn display(&self, surface: &mut impl TextSurface) {
        render::display(&self.name, &self.targets, surface);
    }
}

impl<S: ClusterSource> KubeWidget<S> {
    pub async fn refresh(&mut self, surface: &mut impl TextSurface) {
        self.targets.refresh_all().await;
        self.display(surface);
    }
}

pub async fn connect_targets(
    kubeconfig_path: &str,
    ids: Vec<TargetId>,
    request_timeout: Duration,
) -> Vec<Target<KubeSource>> {
    let mut targets = Vec::with_capacity(ids.len());
    for id in ids {
        match KubeSource::connect(kubeconfig_path, &id.context, request_timeout).await {
            Ok(source) => {
                info!(target_id = %id, "connected cluster target");
                targets.push(Target::connected(id, source));
            }
            Err(error) => {
                warn!(target_id = %id, "failed to connect cluster target: {error:#}");
                targets.push(Target::failed(
                    id,
                    format!("Unable to load kube config: {error}"),
                ));
            }
        }
    }
    targets
}
