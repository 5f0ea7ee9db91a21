use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::App;
use crate::render::{StyledLine, StyledText, TextSurface, Tone};
use crate::widget::HELP_TEXT;

const BG: Color = Color::Rgb(9, 15, 25);
const PANEL: Color = Color::Rgb(16, 27, 44);
const ACCENT: Color = Color::Rgb(52, 211, 153);
const MUTED: Color = Color::Rgb(140, 156, 178);
const WARN: Color = Color::Rgb(251, 191, 36);
const ERROR: Color = Color::Rgb(248, 113, 113);
const PL_A: Color = Color::Rgb(17, 94, 89);
const PL_B: Color = Color::Rgb(30, 64, 175);
const SEPARATOR: &str = "\u{e0b0}";

#[derive(Debug, Clone, Default)]
pub struct Panel {
    title: Line<'static>,
    text: Text<'static>,
}

impl Panel {
    pub fn title(&self) -> &Line<'static> {
        &self.title
    }

    pub fn text(&self) -> &Text<'static> {
        &self.text
    }
}

impl TextSurface for Panel {
    fn set_title(&mut self, title: StyledLine) {
        let mut spans = vec![Span::raw(" ")];
        spans.extend(styled_spans(title));
        spans.push(Span::raw(" "));
        self.title = Line::from(spans);
    }

    fn set_text(&mut self, text: StyledText) {
        self.text = Text::from(
            text.lines
                .into_iter()
                .map(|line| Line::from(styled_spans(line)))
                .collect::<Vec<_>>(),
        );
    }
}

fn styled_spans(line: StyledLine) -> Vec<Span<'static>> {
    line.segments
        .into_iter()
        .map(|segment| Span::styled(segment.text, tone_style(segment.tone)))
        .collect()
}

fn tone_style(tone: Tone) -> Style {
    match tone {
        Tone::Normal => Style::default().fg(Color::White),
        Tone::Emphasis => Style::default().fg(WARN),
        Tone::Good => Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        Tone::Bad => Style::default().fg(ERROR).add_modifier(Modifier::BOLD),
    }
}

pub fn render<S>(frame: &mut Frame, app: &App<S, Panel>) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(frame.area());

    render_panel(frame, root[0], app.surface());
    render_footer(frame, root[1], app);

    if app.show_help() {
        render_help_modal(frame);
    }
}

fn render_panel(frame: &mut Frame, area: Rect, panel: &Panel) {
    let widget = Paragraph::new(panel.text().clone())
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(panel.title().clone())
                .borders(Borders::ALL)
                .border_style(Style::default().fg(MUTED))
                .style(Style::default().bg(PANEL)),
        );
    frame.render_widget(widget, area);
}

fn render_footer<S>(frame: &mut Frame, area: Rect, app: &App<S, Panel>) {
    let targets = app.widget().targets();
    let status = if app.refreshing() {
        " refreshing… ".to_string()
    } else {
        let refreshed = targets
            .last_refreshed()
            .map(|at| at.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "-".to_string());
        format!(" updates {}  last {refreshed} ", targets.update_count())
    };

    let mut footer = Line::default();
    for span in powerline(format!(" {} ", app.widget().name()), PL_A, PL_B)
        .into_iter()
        .chain(powerline(status, PL_B, BG))
    {
        footer.push_span(span);
    }
    let room = usize::from(area.width).saturating_sub(footer.width());
    footer.push_span(Span::styled(
        truncate(" n/p target  r refresh  ? help  q quit", room),
        Style::default().fg(MUTED),
    ));

    frame.render_widget(
        Paragraph::new(footer).style(Style::default().bg(BG)),
        area,
    );
}

fn render_help_modal(frame: &mut Frame) {
    let [area] = Layout::vertical([Constraint::Percentage(60)])
        .flex(Flex::Center)
        .areas(frame.area());
    let [area] = Layout::horizontal([Constraint::Percentage(70)])
        .flex(Flex::Center)
        .areas(area);
    frame.render_widget(Clear, area);

    let modal = Paragraph::new(HELP_TEXT)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title("Help")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(ACCENT))
                .style(Style::default().bg(PANEL)),
        )
        .style(Style::default().fg(Color::White));

    frame.render_widget(modal, area);
}

fn powerline(label: String, bg: Color, next_bg: Color) -> [Span<'static>; 2] {
    [
        Span::styled(
            label,
            Style::default()
                .fg(Color::White)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(SEPARATOR, Style::default().fg(bg).bg(next_bg)),
    ]
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().nth(width).is_none() {
        return value.to_string();
    }
    let cut = value
        .char_indices()
        .nth(width.saturating_sub(1))
        .map_or(value.len(), |(idx, _)| idx);
    format!("{}…", &value[..cut])
}
