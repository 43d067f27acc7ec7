use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use studybuddy_core::config_file;
use studybuddy_core::{Config, GeminiBackend, TaskKind, generate};

mod output;

use output::ColorMode;

/// AI Study Buddy - Summaries, flashcards and quizzes from your study documents
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the text extracted from a document
    Extract {
        /// Path to a .pdf, .xlsx, .xls, .csv, .txt, or .md file
        file_path: PathBuf,

        /// Minimum number of characters the document must contain
        #[arg(long)]
        min_chars: Option<usize>,
    },

    /// Write a concise, topic-wise summary of a document
    Summary(GenerateArgs),

    /// Make 5-10 question/answer flashcards from a document
    Flashcards(GenerateArgs),

    /// Generate a 5-question multiple-choice quiz from a document
    Quiz(GenerateArgs),
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Path to a .pdf, .xlsx, .xls, .csv, .txt, or .md file
    file_path: PathBuf,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Path to output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Gemini API key
    #[arg(long)]
    api_key: Option<String>,

    /// Gemini model name
    #[arg(long)]
    model: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Minimum number of characters the document must contain
    #[arg(long)]
    min_chars: Option<usize>,

    /// Reject quiz questions whose answer is not one of the options
    #[arg(long)]
    strict_quiz_answers: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Resolve configuration: CLI flags > env vars > config file > defaults
    let mut config = config_file::resolve(&config_file::load_config());
    tracing::debug!(?config, "resolved configuration");

    match cli.command {
        Command::Extract {
            file_path,
            min_chars,
        } => {
            if let Some(min) = min_chars {
                config.min_chars = min;
            }
            extract(&file_path, &config).await
        }
        Command::Summary(args) => run_task(TaskKind::Summary, args, config).await,
        Command::Flashcards(args) => run_task(TaskKind::Flashcards, args, config).await,
        Command::Quiz(args) => run_task(TaskKind::Quiz, args, config).await,
    }
}

async fn extract(file_path: &Path, config: &Config) -> anyhow::Result<()> {
    let text = extract_text(file_path, config.min_chars, false).await?;
    let mut stdout = std::io::stdout();
    stdout.write_all(text.as_bytes())?;
    if !text.ends_with('\n') {
        writeln!(stdout)?;
    }
    Ok(())
}

async fn run_task(task: TaskKind, args: GenerateArgs, mut config: Config) -> anyhow::Result<()> {
    apply_overrides(&mut config, &args);

    // Fail on a missing key before spending time on extraction.
    let backend = GeminiBackend::from_config(&config).context(
        "Set GEMINI_API_KEY, pass --api-key, or add gemini_api_key under [api] in config.toml",
    )?;

    let use_color = !args.no_color && args.output.is_none() && !args.json;
    let color = ColorMode(use_color);

    let text = extract_text(&args.file_path, config.min_chars, use_color).await?;

    let spinner = spinner(use_color, format!("{}...", generating_label(task)));
    tracing::info!(task = %task, model = backend.model(), chars = text.len(), "generating");
    let result = generate(&backend, task, &text, config.strict_quiz_answers).await;
    spinner.finish_and_clear();
    let output = result.map_err(|e| anyhow::anyhow!("{e}"))?;

    let mut writer: Box<dyn Write> = if let Some(ref output_path) = args.output {
        Box::new(
            std::fs::File::create(output_path)
                .with_context(|| format!("cannot create {}", output_path.display()))?,
        )
    } else {
        Box::new(std::io::stdout())
    };

    if args.json {
        output::print_json(&mut writer, &output)?;
    } else {
        output::print_output(&mut writer, &output, color)?;
    }
    writer.flush()?;

    if let Some(ref output_path) = args.output {
        eprintln!("Output written to {}", output_path.display());
    }
    Ok(())
}

fn apply_overrides(config: &mut Config, args: &GenerateArgs) {
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

async fn extract_text(file_path: &Path, min_chars: usize, show_spinner: bool) -> anyhow::Result<String> {
    if !file_path.exists() {
        anyhow::bail!("File not found: {}", file_path.display());
    }
    if !studybuddy_ingest::is_supported_path(file_path) {
        anyhow::bail!(
            "Unsupported file type: {} (expected one of: {})",
            file_path.display(),
            studybuddy_ingest::SUPPORTED_EXTENSIONS
                .iter()
                .map(|e| format!(".{e}"))
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    let name = file_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let spinner = spinner(show_spinner, format!("Processing {name}..."));
    let result = studybuddy_ingest::extract_path(file_path, min_chars).await;
    spinner.finish_and_clear();

    result.map_err(|e| anyhow::anyhow!("{e}"))
}

fn generating_label(task: TaskKind) -> &'static str {
    match task {
        TaskKind::Summary => "Generating Summary",
        TaskKind::Flashcards => "Generating Flashcards",
        TaskKind::Quiz => "Generating Quiz",
    }
}

/// A steady-ticking spinner on stderr, hidden when `visible` is false.
fn spinner(visible: bool, message: String) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg} [{elapsed}]") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}
