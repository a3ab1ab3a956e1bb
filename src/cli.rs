use crate::config::Config;
use crate::log_debug;
use crate::logger;
use crate::modals::{ModalController, ModalKind};
use crate::replay::{self, ReplayReport, SessionScript};
use anyhow::{Context, Result, bail};
use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand, crate_version};
use colored::Colorize;
use std::path::{Path, PathBuf};

const LOG_FILE: &str = "grc-desk-debug.log";

/// CLI structure defining the available commands and global arguments
#[derive(Parser)]
#[command(
    author,
    version = crate_version!(),
    about = "GRC Desk: modal orchestration for compliance dashboards",
    long_about = "Inspect the registered dashboard modals and replay scripted sessions against the modal controller.",
    styles = get_styles(),
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log debug messages to a file
    #[arg(short = 'l', long = "log", global = true, help = "Log debug messages to a file")]
    pub log: bool,

    /// Specify a custom log file path
    #[arg(long = "log-file", global = true, help = "Specify a custom log file path")]
    pub log_file: Option<String>,

    /// Echo log output to stderr
    #[arg(
        short = 'v',
        long = "verbose",
        global = true,
        help = "Echo log output to stderr, including dependency debug output"
    )]
    pub verbose: bool,

    /// Use a configuration file other than the default
    #[arg(long = "config", global = true, help = "Path to a configuration file")]
    pub config: Option<PathBuf>,
}

/// Enumeration of available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// List every registered modal kind
    #[command(about = "List registered modal kinds")]
    Kinds,

    /// Replay a session script against a fresh controller
    #[command(
        about = "Replay a session script",
        long_about = "Drive a fresh modal controller through the steps of a JSON session script and report each transition. Exits non-zero when any step fails."
    )]
    Replay {
        /// Path to the JSON session script
        script: PathBuf,

        /// Fail submissions that take longer than this many milliseconds
        #[arg(long = "timeout-ms", help = "Submission timeout in milliseconds")]
        timeout_ms: Option<u64>,

        /// Print recent history entries after the run
        #[arg(long, default_value_t = 0, help = "Show the last N history entries")]
        history: usize,
    },
}

fn get_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Magenta.on_default().bold())
        .usage(AnsiColor::Cyan.on_default().bold())
        .literal(AnsiColor::Green.on_default().bold())
        .placeholder(AnsiColor::Yellow.on_default())
        .valid(AnsiColor::Blue.on_default().bold())
        .invalid(AnsiColor::Red.on_default().bold())
        .error(AnsiColor::Red.on_default().bold())
}

/// Parse the command line and run
pub async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    configure_logging(&cli, &config)?;

    match cli.command {
        Commands::Kinds => {
            print_kinds();
            Ok(())
        }
        Commands::Replay {
            script,
            timeout_ms,
            history,
        } => {
            config.apply_overrides(timeout_ms, None);
            run_replay(&config, &script, history).await
        }
    }
}

fn configure_logging(cli: &Cli, config: &Config) -> Result<()> {
    let log_file = cli
        .log_file
        .clone()
        .or_else(|| config.logging.log_file.clone())
        .or_else(|| cli.log.then(|| LOG_FILE.to_string()));
    let echo = cli.verbose || config.logging.verbose;

    if let Some(path) = &log_file {
        logger::set_log_file(path).with_context(|| format!("Failed to open log file {path}"))?;
    }
    logger::set_log_to_stderr(echo);
    if echo {
        logger::set_verbose_logging(true);
    }

    if log_file.is_some() || echo {
        logger::enable_logging();
    } else {
        logger::disable_logging();
    }
    Ok(())
}

fn print_kinds() {
    for kind in ModalKind::ALL {
        let note = if kind.is_submittable() { "" } else { " (read-only)" };
        println!(
            "{:<24} {}{}",
            kind.id().cyan().bold(),
            kind.title(),
            note.dimmed()
        );
    }
}

async fn run_replay(config: &Config, script_path: &Path, history: usize) -> Result<()> {
    let script = SessionScript::load(script_path)?;
    let controller = ModalController::from_config(config);
    log_debug!(
        "Replaying {} ({} steps) in session {}",
        script_path.display(),
        script.steps.len(),
        controller.session_id()
    );

    let report = replay::run(&controller, &script).await;
    print_report(&report);

    if history > 0 {
        println!();
        println!("{}", "History".magenta().bold());
        for entry in controller.recent_events(history) {
            println!("  #{:<4} {:<17} {:?}", entry.id, entry.event, entry.changes);
        }
    }

    let failed = report.failures().count();
    if failed > 0 {
        bail!("{failed} of {} steps failed", report.steps.len());
    }
    Ok(())
}

fn print_report(report: &ReplayReport) {
    for step in &report.steps {
        let marker = if step.ok {
            "✓".green().bold()
        } else {
            "✗".red().bold()
        };
        println!(
            "{} {:>3} {:<7} {}",
            marker,
            step.index,
            step.op.cyan(),
            step.detail
        );
    }

    let summary = match report.final_state.active {
        Some(kind) => format!("{kind} open"),
        None => "no modal open".to_string(),
    };
    println!();
    println!("{} {}", "Final state:".bold(), summary);
}
