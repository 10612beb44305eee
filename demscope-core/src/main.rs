//! src/main.rs
//! demscope: terminal inspector for recorded demo snapshots

use std::{
    io::{self, Stdout},
    panic::PanicHookInfo,
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{Event as TerminalEvent, EventStream, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Frame, Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use demscope_core::{
    config::Config,
    controller::{
        actions::{Action, map_key},
        event_loop::{EventLoop, LoopEvent, Session, TaskResult, load_session},
        inspector::Inspector,
    },
    filter::controller::ListId,
    logging::LoggerBuilder,
    model::{app_state::DisplayPrefs, ui_state::LoadStage},
    view::{theme, ui::UIRenderer},
};

type AppTerminal = Terminal<CrosstermBackend<Stdout>>;

#[derive(Debug, Parser)]
#[command(name = "demscope", version, about = "Inspect entities, fields and string tables of a demo recording")]
struct Cli {
    /// Demo recording to open.
    file: PathBuf,

    /// Config file (defaults to the per-user config directory).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Overrides `logging.log_level` (e.g. `debug`, `demscope_core=trace`).
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Tick to open at; defaults to the last tick.
    #[arg(long, allow_negative_numbers = true)]
    tick: Option<i32>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path).await,
        None => Config::load().await,
    }
    .context("Failed to load configuration")?;

    let mut logger = LoggerBuilder::new().with_config(config.logging.clone());
    if let Some(level) = &cli.log_level {
        logger = logger.with_level(level);
    }
    let _log_guard = logger.build().await.context("Failed to initialize logging")?;

    setup_panic_handler();
    info!(file = %cli.file.display(), "Starting demscope");

    let app = App::new(config).context("Failed to initialize application")?;
    app.run(cli.file, cli.tick)
        .await
        .context("Application runtime error")?;

    info!("Application exited cleanly");
    Ok(())
}

struct App {
    terminal: AppTerminal,
    renderer: UIRenderer,
    config: Config,
    /// Redraw request for the non-interactive session screens.
    dirty: bool,
}

impl App {
    fn new(config: Config) -> Result<Self> {
        theme::init_theme();
        let terminal = setup_terminal().context("Failed to initialize terminal")?;

        Ok(Self {
            terminal,
            renderer: UIRenderer::new(),
            config,
            dirty: true,
        })
    }

    async fn run(mut self, file: PathBuf, start_tick: Option<i32>) -> Result<()> {
        let (trigger_tx, trigger_rx) = mpsc::unbounded_channel::<ListId>();
        let (task_tx, task_rx) = mpsc::unbounded_channel::<TaskResult>();

        let mut session = self.start_session(&file, start_tick, trigger_tx, task_tx).await;

        let mut event_loop = EventLoop::new(EventStream::new(), trigger_rx, task_rx);
        info!("Starting event loop");

        loop {
            self.render(&mut session)?;

            match event_loop.next_event().await {
                LoopEvent::Terminal(event) => {
                    if !self.on_terminal_event(&mut session, event) {
                        break;
                    }
                }
                LoopEvent::Debounce(list) => {
                    if let Some(inspector) = session.inspector_mut() {
                        inspector.on_debounce(list);
                    }
                }
                LoopEvent::Task(result) => {
                    if let Some(inspector) = session.inspector_mut() {
                        inspector.on_task_result(result);
                    }
                }
                LoopEvent::Closed => {
                    info!("Event sources closed");
                    break;
                }
            }
        }

        let stats = self.renderer.stats();
        info!(
            frames = stats.frames,
            slow_frames = stats.slow,
            avg_frame_us = stats.average().as_micros() as u64,
            "Event loop terminated cleanly"
        );
        Ok(())
    }

    /// Runs the load stages, drawing each one. Failure leaves the session
    /// in its terminal `Failed` state.
    async fn start_session(
        &mut self,
        file: &std::path::Path,
        start_tick: Option<i32>,
        trigger_tx: mpsc::UnboundedSender<ListId>,
        task_tx: mpsc::UnboundedSender<TaskResult>,
    ) -> Session {
        let prefs = DisplayPrefs::from(self.config.display);
        let (terminal, renderer) = (&mut self.terminal, &mut self.renderer);

        let loaded = load_session(file, start_tick, prefs, |stage: LoadStage| {
            debug!(stage = %stage.label(), "load stage");
            let mut screen = Session::Loading(stage);
            if let Err(e) = terminal.draw(|frame: &mut Frame<'_>| renderer.render(frame, &mut screen)) {
                warn!("Failed to draw load stage: {}", e);
            }
        })
        .await;

        self.dirty = true;
        match loaded {
            Ok(state) => Session::Ready(Box::new(Inspector::new(state, &self.config, trigger_tx, task_tx))),
            Err(e) => {
                error!(error = %e, "session start failed");
                Session::Failed(e.to_string().into())
            }
        }
    }

    /// Returns `false` when the application should exit.
    fn on_terminal_event(&mut self, session: &mut Session, event: TerminalEvent) -> bool {
        let Some(inspector) = session.inspector_mut() else {
            return match event {
                TerminalEvent::Key(key) if key.kind != KeyEventKind::Release => {
                    let quit = matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
                        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL));
                    !quit
                }
                TerminalEvent::Resize(..) => {
                    self.dirty = true;
                    true
                }
                _ => true,
            };
        };

        let action = match event {
            TerminalEvent::Key(key) => map_key(key, inspector.ui.mode),
            TerminalEvent::Resize(width, height) => Action::Resize(width, height),
            _ => return true,
        };

        if action != Action::NoOp {
            inspector.handle_action(action);
        }
        !inspector.should_quit()
    }

    fn render(&mut self, session: &mut Session) -> Result<()> {
        let needs_redraw = match session.inspector_mut() {
            Some(inspector) => inspector.ui.needs_redraw(),
            None => self.dirty,
        };
        if !needs_redraw {
            return Ok(());
        }

        let renderer = &mut self.renderer;
        self.terminal
            .draw(|frame: &mut Frame<'_>| renderer.render(frame, session))
            .context("Failed to draw terminal")?;

        match session.inspector_mut() {
            Some(inspector) => inspector.ui.clear_redraw(),
            None => self.dirty = false,
        }
        Ok(())
    }
}

impl Drop for App {
    fn drop(&mut self) {
        if let Err(e) = cleanup_terminal(&mut self.terminal) {
            warn!("Failed to cleanup terminal: {}", e);
        }
    }
}

fn setup_terminal() -> Result<AppTerminal> {
    enable_raw_mode().context("Failed to enable raw mode")?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;

    info!("Terminal setup complete");
    Ok(terminal)
}

fn cleanup_terminal(terminal: &mut AppTerminal) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    info!("Terminal cleanup complete");
    Ok(())
}

fn setup_panic_handler() {
    let original_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info: &PanicHookInfo<'_>| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);

        error!("Application panicked: {}", panic_info);
        original_hook(panic_info);
    }));
}
