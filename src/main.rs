use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use indicatif::{ProgressBar, ProgressStyle};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::debug;

use lacuna::app::App;
use lacuna::config::Config;
use lacuna::events::handle_events;
use lacuna::logging::{self, LogTarget};
use lacuna::scan::{ScanEvent, ScanOutcome, ScanWorker};
use lacuna::ui;

/// Find every folder in a tree that is missing a given file
#[derive(Debug, Parser)]
#[command(name = "lacuna", version, about)]
struct Cli {
    /// Configuration file (defaults to <config dir>/lacuna/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Interactive terminal UI (the default)
    Tui(TuiArgs),
    /// Scan without the UI, printing missing folders to stdout
    Scan(ScanArgs),
}

#[derive(Debug, Args, Default)]
struct TuiArgs {
    /// Folder to pre-fill
    root: Option<PathBuf>,

    /// File name to pre-fill
    #[arg(short, long)]
    query: Option<String>,

    /// Comma separated exclusion terms to pre-fill
    #[arg(short = 'x', long)]
    exclude: Option<String>,
}

#[derive(Debug, Args)]
struct ScanArgs {
    /// Folder to scan
    root: PathBuf,

    /// File name to look for (exact or partial, extension optional)
    query: String,

    /// Skip folders whose name or path contains this term (repeatable, or comma separated)
    #[arg(short = 'x', long = "exclude", value_delimiter = ',')]
    exclude: Vec<String>,

    /// Do not count folders before scanning (progress total becomes an estimate)
    #[arg(long)]
    no_count: bool,

    /// Match exclusion terms regardless of case
    #[arg(long)]
    ignore_case_exclusions: bool,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Tui(TuiArgs::default()));

    let target = match command {
        Command::Tui(_) => LogTarget::File,
        Command::Scan(_) => LogTarget::Stderr,
    };
    let _log_guard = match logging::init(cli.verbose, target) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{} {} (continuing without logs)", "Warning:".yellow().bold(), e);
            None
        }
    };

    let (config, source) = Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    debug!(?source, "configuration loaded");

    match command {
        Command::Tui(args) => {
            run_tui(args, config)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Scan(args) => run_scan(args, config),
    }
}

fn run_tui(args: TuiArgs, config: Config) -> Result<()> {
    let tick = Duration::from_millis(config.tick_rate_ms.max(10));
    let mut app = App::new(config).with_inputs(args.root, args.query, args.exclude);

    // Setup terminal
    enable_raw_mode()?;
    let mut terminal = setup_or_restore(
        || {
            let mut stdout = io::stdout();
            execute!(stdout, EnterAlternateScreen)?;
            Ok(Terminal::new(CrosstermBackend::new(stdout))?)
        },
        || {
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            let _ = disable_raw_mode();
        },
    )?;

    // Main loop
    let res = run_app(&mut terminal, &mut app, tick);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

/// Run `setup`, calling `restore` before returning its error.
fn setup_or_restore<T>(
    setup: impl FnOnce() -> Result<T>,
    restore: impl FnOnce(),
) -> Result<T> {
    setup().inspect_err(|_| restore())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    tick: Duration,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::render(f, app))?;

        handle_events(app, tick)?;

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn run_scan(args: ScanArgs, mut config: Config) -> Result<ExitCode> {
    if args.no_count {
        config.count_before_scan = false;
    }
    if args.ignore_case_exclusions {
        config.exclusions_ignore_case = true;
    }

    let request = config.request(&args.root, &args.query, &args.exclude);

    let cancelled = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancelled);
    ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed))
        .context("failed to install Ctrl-C handler")?;

    let handle = ScanWorker::spawn_with_flag(config.engine(), request, cancelled);

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} folders ({percent}%) | {msg}")
            .context("invalid progress template")?
            .progress_chars("=>-"),
    );

    let mut stdout = io::stdout().lock();
    let mut finished = None;

    for event in handle.events().iter() {
        match event {
            ScanEvent::Progress(progress) => {
                pb.set_length(progress.folders_total as u64);
                pb.set_position(progress.folders_scanned as u64);
                pb.set_message(ui::truncate_path(&progress.current_path.display().to_string(), 40));
                if progress.missing {
                    pb.suspend(|| writeln!(stdout, "{}", progress.current_path.display()))?;
                }
            }
            ScanEvent::Finished(result) => {
                finished = Some(result);
                break;
            }
        }
    }

    pb.finish_and_clear();
    stdout.flush()?;

    let result = match finished {
        Some(Ok(result)) => result,
        Some(Err(e)) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            return Ok(ExitCode::from(1));
        }
        None => anyhow::bail!("scan worker stopped without a result"),
    };

    let headline = match result.outcome {
        ScanOutcome::Completed => "Scan complete!".green().bold(),
        ScanOutcome::Cancelled => "Scan cancelled".yellow().bold(),
    };
    eprintln!("\n{}", headline);
    eprintln!("Folders missing '{}': {}", args.query, result.missing_folders.len());
    eprintln!("Folders scanned: {}", result.folders_scanned);
    eprintln!("Folders skipped: {}", result.folders_skipped);
    eprintln!("Duration: {:.2}s", result.duration.as_secs_f64());

    Ok(match result.outcome {
        ScanOutcome::Completed => ExitCode::SUCCESS,
        ScanOutcome::Cancelled => ExitCode::from(130),
    })
}
