//! CLI binary for ocrpdf.
//!
//! A thin front end over the library: CLI flags (or interactive prompts)
//! become `UiEvent`s for the selection state machine, whose effects drive
//! validation feedback, the preview, and finally the conversion with an
//! indicatif progress bar.

use anyhow::{Context, Result};
use clap::Parser;
use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use indicatif::{ProgressBar, ProgressStyle};
use ocrpdf::{
    convert, inspect, preview, system, ConversionConfig, ConvertProgress, Effect, FileDescriptor,
    ProgressHandle, Selection, UiEvent,
};
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress: one bar whose length is fixed at `3 + page_count`
/// the moment the pipeline learns the page count.
struct CliProgress {
    bar: ProgressBar,
}

impl CliProgress {
    fn new_hidden() -> Arc<Self> {
        // Hidden until on_begin: the bar only appears once the page count
        // (and therefore the step budget) is known.
        let bar = ProgressBar::hidden();
        Arc::new(Self { bar })
    }
}

impl ConvertProgress for CliProgress {
    fn on_begin(&self, max_steps: usize) {
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  [{bar:38.green/238}] {pos:>2}/{len}  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ");

        self.bar.set_style(style);
        self.bar.set_length(max_steps as u64);
        self.bar.set_prefix("Converting");
        self.bar.set_draw_target(indicatif::ProgressDrawTarget::stderr());
        self.bar.enable_steady_tick(Duration::from_millis(80));
    }

    fn on_step(&self, step: usize, _max_steps: usize, message: &str) {
        self.bar.set_position(step as u64);
        self.bar.set_message(message.to_string());
    }

    fn on_finish(&self, _total_steps: usize) {
        self.bar.finish_and_clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert a scan; output defaults to <stem>_ocr.pdf next to the source
  ocrpdf invoice.jpg

  # Choose the output path
  ocrpdf scan.pdf -o searchable.pdf

  # Probe a source without converting (no tesseract needed)
  ocrpdf --inspect-only scan.pdf

  # Script-friendly: no bar, no auto-open, JSON stats on stdout
  ocrpdf scan.pdf --no-progress --no-open --json

  # No arguments: interactive prompts
  ocrpdf

REQUIREMENTS:
  tesseract on PATH, plus the traineddata for your documents' language
  (e.g. `apt install tesseract-ocr-deu` for German). The document language
  is detected automatically from the first page and used for all pages.

EXIT BEHAVIOUR:
  On success the produced PDF is handed to `open`/`xdg-open` unless
  --no-open is given. A source with zero pages writes nothing and exits
  successfully — check for the output file, not just the exit code.
"#;

/// Make scanned PDFs and JPEGs searchable with Tesseract OCR.
#[derive(Parser, Debug)]
#[command(
    name = "ocrpdf",
    version,
    about = "Make scanned PDFs and JPEGs searchable with Tesseract OCR",
    long_about = "Run optical character recognition over a PDF or JPG and produce a \
searchable PDF: each page keeps its image with an invisible, position-aligned text \
layer on top. Language is auto-detected from the first page.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Source file (.pdf or .jpg). Omit to be prompted interactively.
    input: Option<PathBuf>,

    /// Write the searchable PDF here instead of `<stem>_ocr.pdf`.
    #[arg(short, long, env = "OCRPDF_OUTPUT")]
    output: Option<PathBuf>,

    /// Rendering DPI for PDF pages (72–600).
    #[arg(long, env = "OCRPDF_DPI", default_value_t = 300,
          value_parser = clap::value_parser!(u32).range(72..=600))]
    dpi: u32,

    /// Print source info (format, page count) and exit without converting.
    #[arg(long)]
    inspect_only: bool,

    /// Do not open the result with the OS default application.
    #[arg(long, env = "OCRPDF_NO_OPEN")]
    no_open: bool,

    /// Print conversion stats as JSON on stdout.
    #[arg(long, env = "OCRPDF_JSON")]
    json: bool,

    /// Disable the progress bar.
    #[arg(long, env = "OCRPDF_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "OCRPDF_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "OCRPDF_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs while the progress bar is live; the
    // bar is the feedback that matters.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Inspect-only mode (works without tesseract) ───────────────────────
    if cli.inspect_only {
        let input = cli
            .input
            .as_ref()
            .context("--inspect-only requires a source file argument")?;
        let source = FileDescriptor::parse(&input.to_string_lossy());
        let info = inspect(&source).await.context("Failed to inspect source")?;

        if cli.json {
            println!("{}", serde_json::to_string_pretty(&info)?);
        } else {
            println!("File:    {}", source);
            println!("Format:  {}", info.extension);
            println!("Pages:   {}", info.page_count);
        }
        return Ok(());
    }

    // ── System preconditions: fail fast before any prompt ─────────────────
    let progress: ProgressHandle = if show_progress {
        CliProgress::new_hidden()
    } else {
        Arc::new(ocrpdf::NoopProgress)
    };
    let config = ConversionConfig::builder()
        .dpi(cli.dpi)
        .open_after(!cli.no_open)
        .progress(progress)
        .build()
        .context("Invalid configuration")?;

    system::validate(&config).context("System precondition failed")?;

    // ── Selection: CLI arguments or interactive prompts become events ────
    let (source, target) = match &cli.input {
        Some(input) => select_from_args(input, cli.output.as_deref())?,
        None => {
            if !io::stdin().is_terminal() {
                anyhow::bail!("no source file given and stdin is not a terminal");
            }
            select_interactively(&config).await?
        }
    };

    // ── Run the pipeline ─────────────────────────────────────────────────
    let output = convert(&source, &target, &config)
        .await
        .context("Conversion failed")?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    }

    if !output.target_written {
        if !cli.quiet {
            eprintln!(
                "{} source had no pages — nothing was written",
                dim("note:")
            );
        }
        return Ok(());
    }

    if !cli.quiet && !cli.json {
        eprintln!(
            "{} {} pages ({})  {}ms  →  {}",
            green("✔"),
            output.stats.page_count,
            output.language,
            output.stats.total_ms,
            bold(&output.target.display().to_string()),
        );
    }

    if config.open_after {
        system::open_with_default_app(&output.target);
    }

    Ok(())
}

/// Non-interactive selection: replay the CLI arguments through the state
/// machine so argument handling obeys exactly the same validity rules as
/// the prompts.
fn select_from_args(
    input: &std::path::Path,
    output: Option<&std::path::Path>,
) -> Result<(FileDescriptor, FileDescriptor)> {
    let mut selection = Selection::new();

    selection.handle(UiEvent::SourceChanged(input.to_string_lossy().into_owned()));
    if let Some(out) = output {
        selection.handle(UiEvent::TargetChanged(out.to_string_lossy().into_owned()));
    }

    if !selection.convert_enabled() {
        match selection.source() {
            Some(s) if !s.is_valid(ocrpdf::SOURCE_EXTENSIONS) => anyhow::bail!(
                "'{}' is not a usable source — expected a .pdf or .jpg file",
                input.display()
            ),
            _ => anyhow::bail!(
                "'{}' is not a usable target — the output must be a .pdf file",
                output.map(|p| p.display().to_string()).unwrap_or_default()
            ),
        }
    }

    for effect in selection.handle(UiEvent::ConvertRequested) {
        if let Effect::BeginConversion { source, target } = effect {
            return Ok((source, target));
        }
    }
    anyhow::bail!("conversion could not be started from the given arguments")
}

/// Interactive selection: prompt for paths, feeding each answer through
/// the state machine until a conversion can start (or the user cancels).
async fn select_interactively(
    config: &ConversionConfig,
) -> Result<(FileDescriptor, FileDescriptor)> {
    let theme = ColorfulTheme::default();
    let mut selection = Selection::new();
    let mut suggested_target = String::new();

    loop {
        // ── Source prompt ────────────────────────────────────────────────
        let raw: String = Input::with_theme(&theme)
            .with_prompt("Pick a file for recognition (.pdf / .jpg)")
            .interact_text()
            .context("prompt aborted")?;

        for effect in selection.handle(UiEvent::SourceChanged(raw)) {
            match effect {
                Effect::RenderPreview(fd) => {
                    // No image pane in a terminal: drop the preview PNG in
                    // the temp dir and say where it is.
                    if let Ok(Some(png)) = preview::generate(&fd, config).await {
                        let path = std::env::temp_dir().join("ocrpdf_preview.png");
                        if std::fs::write(&path, png).is_ok() {
                            eprintln!("{} preview written to {}", dim("•"), path.display());
                        }
                    }
                }
                Effect::EnableTarget { default_name } => {
                    suggested_target = default_name;
                }
                Effect::DisableTarget => {
                    eprintln!("{} not a .pdf or .jpg file, try again", red("✗"));
                }
                _ => {}
            }
        }

        if selection.source().is_some_and(|s| s.is_valid(ocrpdf::SOURCE_EXTENSIONS)) {
            break;
        }
    }

    // ── Target prompt (pre-filled with the default) ──────────────────────
    loop {
        let raw: String = Input::with_theme(&theme)
            .with_prompt("Save as")
            .with_initial_text(&suggested_target)
            .interact_text()
            .context("prompt aborted")?;

        selection.handle(UiEvent::TargetChanged(raw));
        if selection.convert_enabled() {
            break;
        }
        eprintln!("{} the output must be a .pdf file", red("✗"));
    }

    // ── Confirm = the convert button; decline = cancel ───────────────────
    let go = Confirm::with_theme(&theme)
        .with_prompt("Convert now?")
        .default(true)
        .interact()
        .context("prompt aborted")?;

    let event = if go {
        UiEvent::ConvertRequested
    } else {
        UiEvent::Cancelled
    };

    for effect in selection.handle(event) {
        match effect {
            Effect::BeginConversion { source, target } => return Ok((source, target)),
            Effect::Exit => anyhow::bail!("cancelled"),
            _ => {}
        }
    }
    anyhow::bail!("selection did not produce a conversion")
}
