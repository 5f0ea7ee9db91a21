use crate::collection::TargetCollection;
use crate::target::Target;

pub const UNAVAILABLE: &str = "Unable to retrieve kube info";
pub const LOADING: &str = "Loading...";

#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum Tone {
    #[default]
    Normal,
    Emphasis,
    Good,
    Bad,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Segment {
    pub tone: Tone,
    pub text: String,
}

#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub struct StyledLine {
    pub segments: Vec<Segment>,
}

impl StyledLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, tone: Tone, text: impl Into<String>) -> Self {
        self.segments.push(Segment {
            tone,
            text: text.into(),
        });
        self
    }

    #[cfg(test)]
    pub fn plain(&self) -> String {
        self.segments
            .iter()
            .map(|segment| segment.text.as_str())
            .collect()
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub struct StyledText {
    pub lines: Vec<StyledLine>,
}

impl StyledText {
    pub fn single(line: StyledLine) -> Self {
        Self { lines: vec![line] }
    }

    #[cfg(test)]
    pub fn plain(&self) -> String {
        self.lines
            .iter()
            .map(StyledLine::plain)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub trait TextSurface {
    fn set_title(&mut self, title: StyledLine);
    fn set_text(&mut self, text: StyledText);
}

pub fn display<S>(name: &str, targets: &TargetCollection<S>, surface: &mut impl TextSurface) {
    let (title, body) = render(name, targets);
    surface.set_title(title);
    surface.set_text(body);
}

pub fn render<S>(name: &str, targets: &TargetCollection<S>) -> (StyledLine, StyledText) {
    let bare_title = StyledLine::new().push(Tone::Normal, name);
    let Some(target) = targets.current() else {
        return (bare_title, banner(UNAVAILABLE));
    };
    if let Some(error) = target.connection_error() {
        return (bare_title, banner(error));
    }

    let title = title_line(name, target, targets.cursor(), targets.len());
    if !target.snapshot().has_data() {
        return (title, banner(UNAVAILABLE));
    }

    let mut lines = vec![count_line("Pod Count", target.pod_count())];
    if let Some(healthy) = target.healthy_pods() {
        lines.push(pod_status_line("Healthy", healthy.len(), Tone::Good));
    }
    if let Some(unhealthy) = target.unhealthy_pods() {
        lines.push(pod_status_line("UnHealthy", unhealthy.len(), Tone::Bad));
    }
    lines.push(count_line("Node Count", target.node_count()));

    (title, StyledText { lines })
}

fn title_line<S>(name: &str, target: &Target<S>, cursor: usize, total: usize) -> StyledLine {
    let id = target.id();
    let mut line = StyledLine::new()
        .push(Tone::Normal, format!("{name} - "))
        .push(Tone::Good, id.namespace_label());
    if !id.context.is_empty() {
        line = line.push(Tone::Normal, format!(" ({})", id.context));
    }
    if total > 1 {
        line = line.push(Tone::Normal, format!(" [{}/{total}]", cursor + 1));
    }
    line
}

fn banner(message: &str) -> StyledText {
    StyledText::single(StyledLine::new().push(Tone::Bad, format!(" {message}")))
}

fn count_line(label: &str, count: usize) -> StyledLine {
    StyledLine::new()
        .push(Tone::Normal, format!(" {label}:"))
        .push(Tone::Emphasis, format!(" {count}"))
}

fn pod_status_line(status: &str, count: usize, tone: Tone) -> StyledLine {
    StyledLine::new()
        .push(Tone::Normal, format!(" {status} Pods: "))
        .push(tone, count.to_string())
}
