mod app;
mod cli;
mod collection;
mod config;
mod input;
mod k8s;
mod model;
mod render;
mod target;
mod ui;
mod widget;

use anyhow::{Context, Result};
use app::{App, AppCommand};
use clap::Parser;
use cli::CliArgs;
use config::KubeSettings;
use crossterm::event::{Event, EventStream, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use futures::StreamExt;
use k8s::KubeSource;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::fs::File;
use std::io::{self, Stdout};
use std::path::Path;
use std::sync::Mutex;
use tokio::time::{Duration, MissedTickBehavior, interval};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use ui::Panel;
use widget::KubeWidget;

type TuiTerminal = Terminal<CrosstermBackend<Stdout>>;

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_tracing(&args.log_filter, args.log_file.as_deref())?;

    let (source, mut settings) = KubeSettings::load(args.config.as_deref())?;
    settings.apply_cli(&args);
    let config_source = source
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "-".to_string());
    info!(
        config = %config_source,
        refresh_secs = settings.refresh_interval().as_secs(),
        "starting kubestat"
    );

    let targets = widget::connect_targets(
        &settings.configpath,
        settings.target_ids(),
        settings.request_timeout(),
    )
    .await;
    let mut app = App::new(
        KubeWidget::new(settings.title.clone(), targets),
        Panel::default(),
    );

    run(&mut app, settings.refresh_interval()).await
}

fn init_tracing(level_filter: &str, log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_new(level_filter)
        .or_else(|_| EnvFilter::try_new("info"))
        .context("failed to initialize tracing filter")?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact();

    // The terminal is owned by the UI, so logs either go to a file or nowhere.
    let _ = match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create log file {}", path.display()))?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => builder.with_writer(io::sink).try_init(),
    };

    Ok(())
}

async fn run(app: &mut App<KubeSource, Panel>, refresh: Duration) -> Result<()> {
    let mut terminal = init_terminal()?;
    let run_result = run_loop(&mut terminal, app, refresh).await;
    let restore_result = restore_terminal(&mut terminal);

    match (run_result, restore_result) {
        (Err(run_error), Err(restore_error)) => Err(anyhow::anyhow!(
            "{run_error:#}\nterminal restore error: {restore_error:#}"
        )),
        (Err(error), _) => Err(error),
        (_, Err(error)) => Err(error),
        (Ok(()), Ok(())) => Ok(()),
    }
}

fn init_terminal() -> Result<TuiTerminal> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal backend")?;
    terminal.clear().context("failed to clear terminal")?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut TuiTerminal) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor().context("failed to show cursor")?;
    Ok(())
}

async fn run_loop(
    terminal: &mut TuiTerminal,
    app: &mut App<KubeSource, Panel>,
    refresh: Duration,
) -> Result<()> {
    let mut reader = EventStream::new();
    // The first tick completes immediately, which performs the initial refresh.
    let mut ticker = interval(refresh);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        terminal
            .draw(|frame| ui::render(frame, app))
            .context("failed to render terminal frame")?;

        if !app.running() {
            break;
        }

        tokio::select! {
            maybe_event = reader.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        if let Some(action) = input::map_key(key) {
                            debug!("action={action:?}");
                            if app.apply_action(action) == AppCommand::Refresh {
                                refresh_with_status(terminal, app).await?;
                                ticker.reset();
                            }
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(error)) => {
                        return Err(error).context("terminal event error");
                    }
                    None => break,
                }
            }
            _ = ticker.tick() => {
                refresh_with_status(terminal, app).await?;
            }
        }
    }

    Ok(())
}

async fn refresh_with_status(
    terminal: &mut TuiTerminal,
    app: &mut App<KubeSource, Panel>,
) -> Result<()> {
    app.begin_refresh();
    terminal
        .draw(|frame| ui::render(frame, app))
        .context("failed to render terminal frame")?;
    app.refresh().await;
    Ok(())
}
