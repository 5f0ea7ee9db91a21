use crate::input::Action;
use crate::k8s::ClusterSource;
use crate::render::TextSurface;
use crate::widget::KubeWidget;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    None,
    Refresh,
}

pub struct App<S, T> {
    widget: KubeWidget<S>,
    surface: T,
    running: bool,
    show_help: bool,
    refreshing: bool,
}

impl<S, T: TextSurface> App<S, T> {
    pub fn new(widget: KubeWidget<S>, mut surface: T) -> Self {
        widget.show_loading(&mut surface);
        Self {
            widget,
            surface,
            running: true,
            show_help: false,
            refreshing: false,
        }
    }

    pub fn widget(&self) -> &KubeWidget<S> {
        &self.widget
    }

    pub fn surface(&self) -> &T {
        &self.surface
    }

    pub fn running(&self) -> bool {
        self.running
    }

    pub fn show_help(&self) -> bool {
        self.show_help
    }

    pub fn refreshing(&self) -> bool {
        self.refreshing
    }

    // Set before awaiting a refresh so the host can draw the status first.
    pub fn begin_refresh(&mut self) {
        self.refreshing = true;
    }

    pub fn apply_action(&mut self, action: Action) -> AppCommand {
        match action {
            Action::Quit => self.running = false,
            Action::Cancel => {
                if self.show_help {
                    self.show_help = false;
                } else {
                    self.running = false;
                }
            }
            Action::ToggleHelp => self.show_help = !self.show_help,
            Action::NextTarget => self.widget.next(&mut self.surface),
            Action::PrevTarget => self.widget.prev(&mut self.surface),
            Action::Refresh => return AppCommand::Refresh,
        }
        AppCommand::None
    }
}

impl<S: ClusterSource, T: TextSurface> App<S, T> {
    pub async fn refresh(&mut self) {
        self.refreshing = true;
        self.widget.refresh(&mut self.surface).await;
        self.refreshing = false;
    }
}

#[cfg(test)]
mod tests {
    use super::{App, AppCommand};
    use crate::input::Action;
    use crate::model::{PodPhase, TargetId, pod};
    use crate::render::{LOADING, StyledLine, StyledText, TextSurface};
    use crate::target::Target;
    use crate::target::fake::{ScriptedSource, nodes};
    use crate::widget::KubeWidget;

    #[derive(Default)]
    struct PlainSurface {
        title: String,
        text: String,
    }

    impl TextSurface for PlainSurface {
        fn set_title(&mut self, title: StyledLine) {
            self.title = title.plain();
        }

        fn set_text(&mut self, text: StyledText) {
            self.text = text.plain();
        }
    }

    fn app() -> App<ScriptedSource, PlainSurface> {
        let widget = KubeWidget::new(
            "Kube",
            vec![
                Target::connected(
                    TargetId::new("", ""),
                    ScriptedSource::new()
                        .pods(Ok(vec![pod("a", PodPhase::Running, &[None])]))
                        .nodes(Ok(nodes(2))),
                ),
                Target::failed(TargetId::new("", "broken"), "Unable to load kube config"),
            ],
        );
        App::new(widget, PlainSurface::default())
    }

    #[test]
    fn starts_with_loading_text() {
        let app = app();
        assert_eq!(app.surface().text, LOADING);
        assert!(app.running());
    }

    #[test]
    fn refresh_action_is_returned_as_command() {
        let mut app = app();
        assert_eq!(app.apply_action(Action::Refresh), AppCommand::Refresh);
        assert_eq!(app.widget().targets().update_count(), 0);
    }

    #[tokio::test]
    async fn navigation_switches_to_error_banner() {
        let mut app = app();
        app.refresh().await;
        assert!(app.surface().text.contains("Node Count: 2"));

        assert_eq!(app.apply_action(Action::NextTarget), AppCommand::None);
        assert_eq!(app.surface().text, " Unable to load kube config");
        assert_eq!(app.surface().title, "Kube");

        app.apply_action(Action::PrevTarget);
        assert_eq!(app.surface().title, "Kube - ALL [1/2]");
    }

    #[tokio::test]
    async fn refreshing_flag_clears_once_refresh_completes() {
        let mut app = app();
        assert!(!app.refreshing());

        app.begin_refresh();
        assert!(app.refreshing());

        app.refresh().await;
        assert!(!app.refreshing());
        assert_eq!(app.widget().targets().update_count(), 1);
    }

    #[test]
    fn escape_closes_help_before_quitting() {
        let mut app = app();
        app.apply_action(Action::ToggleHelp);
        assert!(app.show_help());

        app.apply_action(Action::Cancel);
        assert!(!app.show_help());
        assert!(app.running());

        app.apply_action(Action::Cancel);
        assert!(!app.running());
    }
}
