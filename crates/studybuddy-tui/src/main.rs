use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use ratatui::Terminal;
use ratatui::crossterm::event;
use ratatui::crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::CrosstermBackend;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use studybuddy_core::config_file;
use studybuddy_core::{Config, GeminiBackend, GenerationBackend};

mod action;
mod app;
mod backend;
mod input;
mod theme;
mod tui_event;
mod view;

use app::App;

/// AI Study Buddy TUI - turn study documents into summaries, flashcards and quizzes.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Document to open at startup
    file_path: Option<PathBuf>,

    /// Gemini API key
    #[arg(long)]
    api_key: Option<String>,

    /// Gemini model name
    #[arg(long)]
    model: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Minimum characters of extracted text
    #[arg(long)]
    min_chars: Option<usize>,

    /// Reject quiz questions whose answer is not one of their options
    #[arg(long)]
    strict_quiz_answers: bool,

    /// Color theme: hacker (default) or modern
    #[arg(long)]
    theme: Option<String>,

    /// Target frames per second
    #[arg(long)]
    fps: Option<u32>,
}

fn apply_overrides(config: &mut Config, args: &Args) {
    if let Some(ref key) = args.api_key {
        config.api_key = Some(key.clone());
    }
    if let Some(ref model) = args.model {
        config.model = model.clone();
    }
    if let Some(secs) = args.timeout {
        config.timeout_secs = secs;
    }
    if let Some(min) = args.min_chars {
        config.min_chars = min;
    }
    if args.strict_quiz_answers {
        config.strict_quiz_answers = true;
    }
}

/// Set up file logging under the platform cache directory. The guard must
/// live until exit so buffered lines are flushed.
fn init_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let dir = dirs::cache_dir()?.join("studybuddy").join("logs");
    std::fs::create_dir_all(&dir).ok()?;

    let appender = tracing_appender::rolling::daily(&dir, "studybuddy-tui.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Some(guard)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    let _log_guard = init_logging();

    if let Some(ref path) = args.file_path {
        if !path.exists() {
            anyhow::bail!("File not found: {}", path.display());
        }
        if !studybuddy_ingest::is_supported_path(path) {
            anyhow::bail!("Unsupported file type: {}", path.display());
        }
    }

    // Resolve config from CLI flags > env vars > config file > defaults
    let file_config = config_file::load_config();
    let mut config = config_file::resolve(&file_config);
    apply_overrides(&mut config, &args);
    tracing::info!(?config, "starting");

    let display = file_config.display.unwrap_or_default();
    let theme_name = args
        .theme
        .or(display.theme)
        .unwrap_or_else(|| "hacker".to_string());
    let fps = args.fps.or(display.fps).unwrap_or(10).clamp(1, 120);

    // A missing key is reported on the first trigger, not at startup.
    let generator: Option<Arc<dyn GenerationBackend>> = match GeminiBackend::from_config(&config) {
        Ok(backend) => Some(Arc::new(backend)),
        Err(e) => {
            tracing::warn!(error = %e, "generation disabled");
            None
        }
    };

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    // Install panic hook that restores terminal before printing panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    let backend_terminal = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend_terminal)?;

    // Drain any stray input events (e.g. Enter keypress from launching the command)
    while event::poll(Duration::from_millis(50)).unwrap_or(false) {
        let _ = event::read();
    }

    let mut app = App::new(theme::Theme::by_name(&theme_name));

    // Set up backend channels
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<tui_event::BackendCommand>();
    let cancel = CancellationToken::new();

    app.backend_cmd_tx = Some(cmd_tx);

    let ctx = backend::BackendContext {
        generator,
        min_chars: config.min_chars,
        strict_quiz_answers: config.strict_quiz_answers,
    };
    tokio::spawn(backend::run_listener(ctx, cmd_rx, event_tx));

    if let Some(path) = args.file_path {
        app.select_file(path);
    }

    // Also handle Ctrl+C at the OS level for clean shutdown
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel_for_signal.cancel();
        }
    });

    // Main event loop
    let tick_rate = Duration::from_millis(1000 / u64::from(fps));

    loop {
        terminal.draw(|f| app.view(f))?;

        tokio::select! {
            maybe_event = event_rx.recv() => {
                if let Some(backend_event) = maybe_event {
                    app.handle_backend_event(backend_event);
                    // Drain any additional queued backend events
                    while let Ok(evt) = event_rx.try_recv() {
                        app.handle_backend_event(evt);
                    }
                }
            }
            _ = cancel.cancelled() => {
                app.update(action::Action::Quit);
            }
            // Terminal input events
            _ = async {
                if event::poll(tick_rate).unwrap_or(false)
                    && let Ok(evt) = event::read()
                {
                    app.update(input::map_event(&evt));
                }
            } => {}
        }

        app.update(action::Action::Tick);

        if app.should_quit {
            cancel.cancel();
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;

    Ok(())
}
