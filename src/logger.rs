//! Crate logging
//!
//! `log` records and `tracing` events end up in the same sinks: an optional
//! append-only log file and, when echo is on, stderr. Nothing is written
//! until logging is enabled.

use chrono::Local;
use log::{Level, LevelFilter, Metadata, Record};
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::sync::LazyLock;
use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const CRATE_TARGET: &str = "grc_desk";

#[derive(Default)]
struct Sinks {
    enabled: bool,
    /// Let dependencies log below warn
    verbose: bool,
    echo_stderr: bool,
    file: Option<File>,
}

impl Sinks {
    fn write(&mut self, bytes: &[u8]) {
        if !self.enabled {
            return;
        }
        if let Some(file) = self.file.as_mut() {
            let _ = file.write_all(bytes);
            let _ = file.flush();
        }
        if self.echo_stderr {
            let _ = io::stderr().write_all(bytes);
        }
    }
}

static SINKS: LazyLock<Mutex<Sinks>> = LazyLock::new(|| Mutex::new(Sinks::default()));

struct GrcDeskLogger;

static LOGGER: GrcDeskLogger = GrcDeskLogger;

impl log::Log for GrcDeskLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        let sinks = SINKS.lock();
        if !sinks.enabled {
            return false;
        }

        let ceiling = if metadata.target().starts_with(CRATE_TARGET) || sinks.verbose {
            Level::Debug
        } else {
            Level::Warn
        };
        metadata.level() <= ceiling
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let line = format!(
            "{} {:<5} [{}] {}\n",
            Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            record.level(),
            record.target(),
            record.args()
        );
        SINKS.lock().write(line.as_bytes());
    }

    fn flush(&self) {}
}

/// `MakeWriter` handing tracing output to the shared sinks
#[derive(Clone, Copy)]
struct SinkWriter;

impl Write for SinkWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        SINKS.lock().write(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> fmt::MakeWriter<'a> for SinkWriter {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        *self
    }
}

/// Install the `log` and `tracing` backends. Safe to call more than once.
pub fn init() -> Result<(), Box<dyn std::error::Error>> {
    static INIT_RESULT: std::sync::OnceLock<Result<(), String>> = std::sync::OnceLock::new();

    let result = INIT_RESULT.get_or_init(|| {
        if std::env::var("GRC_DESK_VERBOSE").is_ok()
            || std::env::var("RUST_LOG").is_ok_and(|v| v.contains("debug") || v.contains("trace"))
        {
            set_verbose_logging(true);
        }

        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| format!("{CRATE_TARGET}=debug,warn").into());

        let fmt_layer = fmt::Layer::new()
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::ChronoLocal::rfc_3339())
            .with_writer(SinkWriter);

        // With tracing-log enabled, `try_init` also claims the `log` facade;
        // records then reach the sinks through the fmt layer instead.
        let tracing_result = Registry::default()
            .with(env_filter)
            .with(fmt_layer)
            .try_init();
        let log_result = log::set_logger(&LOGGER).map(|()| log::set_max_level(LevelFilter::Debug));

        match (tracing_result, log_result) {
            (Err(tracing_err), Err(log_err)) => Err(format!(
                "Failed to initialize logging: tracing={tracing_err}, log={log_err}"
            )),
            _ => Ok(()),
        }
    });

    result.clone().map_err(Into::into)
}

pub fn enable_logging() {
    SINKS.lock().enabled = true;
}

pub fn disable_logging() {
    SINKS.lock().enabled = false;
}

pub fn is_logging_enabled() -> bool {
    SINKS.lock().enabled
}

pub fn set_verbose_logging(enabled: bool) {
    SINKS.lock().verbose = enabled;
}

/// Append log output to `file_path`, creating it if needed
pub fn set_log_file(file_path: &str) -> io::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(file_path)?;

    SINKS.lock().file = Some(file);
    Ok(())
}

/// Mirror log output to stderr
pub fn set_log_to_stderr(enabled: bool) {
    SINKS.lock().echo_stderr = enabled;
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        log::debug!($($arg)*)
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        log::error!($($arg)*)
    };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        log::info!($($arg)*)
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        log::warn!($($arg)*)
    };
}

#[macro_export]
macro_rules! trace_info {
    (target: $target:expr, $($arg:tt)*) => {
        tracing::info!(target: $target, $($arg)*)
    };
    ($($arg:tt)*) => {
        tracing::info!($($arg)*)
    };
}
