//! File logging for the daemon.
//!
//! Lines look like `2026/03/01 10:00:00 [WARN]: message key=value` and are
//! appended to a single file that is never rotated.

use chrono::Local;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{Event, Level, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::EnvFilter;

const DEBUG_ENV: &str = "ZATHURA_PRESENCE_DEBUG_LOG";
const LOG_DIR_NAME: &str = "zathura-presence";
const LOG_FILE_NAME: &str = "app.log";

#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("log path has no file name: {0}")]
    InvalidPath(PathBuf),

    #[error("failed to create log directory: {0}")]
    CreateDir(#[from] std::io::Error),

    #[error("failed to open log file: {0}")]
    Open(#[from] tracing_appender::rolling::InitError),

    #[error("failed to install subscriber: {0}")]
    Install(String),
}

/// `$XDG_DATA_HOME/zathura-presence/app.log`, or `app.log` in the working
/// directory when no data directory is known.
pub fn default_log_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join(LOG_DIR_NAME).join(LOG_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(LOG_FILE_NAME))
}

/// Opens `path` for appending and installs the global subscriber.
///
/// The returned guard flushes pending lines on drop and must be held until
/// the process exits.
pub fn init(path: &Path) -> Result<WorkerGuard, LogError> {
    let file_name = path
        .file_name()
        .ok_or_else(|| LogError::InvalidPath(path.to_path_buf()))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs_err::create_dir_all(&dir)?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy().into_owned())
        .build(&dir)?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_ansi(false)
        .event_format(LevelPrefixFormat)
        .with_writer(writer)
        .try_init()
        .map_err(|err| LogError::Install(err.to_string()))?;

    Ok(guard)
}

fn env_filter() -> EnvFilter {
    let debug_enabled = env::var(DEBUG_ENV)
        .map(|value| matches!(value.as_str(), "1" | "true" | "TRUE" | "yes" | "YES"))
        .unwrap_or(false);
    if debug_enabled {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// `<local time> [LEVEL]: <message> <fields>`
pub struct LevelPrefixFormat;

impl<S, N> FormatEvent<S, N> for LevelPrefixFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        write!(
            writer,
            "{} [{}]: ",
            Local::now().format("%Y/%m/%d %H:%M:%S"),
            level_label(event.metadata().level())
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

fn level_label(level: &Level) -> &'static str {
    match *level {
        Level::ERROR => "ERROR",
        Level::WARN => "WARN",
        Level::INFO => "INFO",
        Level::DEBUG => "DEBUG",
        Level::TRACE => "TRACE",
    }
}
