//! File logging for the TUI.
//!
//! The terminal belongs to the interface, so all output goes to a daily
//! rolling JSON log under the configured log directory. `log` macros are
//! bridged into the tracing subscriber. Logs from earlier days are gzipped
//! in the background at startup.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub const LOG_FILE_PREFIX: &str = "promo-tracker.log";

/// Initialize logging. Keep the returned guard alive for the whole run or
/// buffered lines are lost on exit.
pub fn init_tui(log_dir: &Path) -> WorkerGuard {
    if let Err(e) = fs::create_dir_all(log_dir) {
        eprintln!("Failed to create logs directory {}: {}", log_dir.display(), e);
    }

    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .json()
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_target(true)
        .with_filter(env_filter);

    if let Err(e) = tracing_subscriber::registry().with(file_layer).try_init() {
        eprintln!("Failed to initialize logging: {}", e);
    }

    // The subscriber may already have installed the bridge itself.
    let _ = tracing_log::LogTracer::init();

    let log_dir = log_dir.to_path_buf();
    std::thread::spawn(move || compress_old_logs(&log_dir));

    guard
}

/// True for rolled-over plain logs, i.e. not today's and not yet compressed.
fn should_compress(name: &str, today_suffix: &str) -> bool {
    name.starts_with(LOG_FILE_PREFIX)
        && name.len() > LOG_FILE_PREFIX.len()
        && !name.ends_with(today_suffix)
        && !name.ends_with(".gz")
}

fn compress_old_logs(log_dir: &Path) {
    let today_suffix = chrono::Local::now().format("%Y-%m-%d").to_string();

    let Ok(entries) = fs::read_dir(log_dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !should_compress(name, &today_suffix) {
            continue;
        }
        match compress_file(&path) {
            Ok(gz) => log::info!("Compressed old log: {}", gz.display()),
            Err(e) => log::warn!("Failed to compress old log {}: {}", path.display(), e),
        }
    }
}

/// Gzip `path` next to itself and remove the original.
fn compress_file(path: &Path) -> io::Result<PathBuf> {
    let mut gz_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "No filename"))?
        .to_os_string();
    gz_name.push(".gz");
    let gz_path = path.with_file_name(gz_name);

    if gz_path.exists() {
        return Ok(gz_path);
    }

    let mut reader = io::BufReader::new(fs::File::open(path)?);
    let mut encoder = GzEncoder::new(fs::File::create(&gz_path)?, Compression::default());
    io::copy(&mut reader, &mut encoder)?;
    encoder.finish()?;
    fs::remove_file(path)?;
    Ok(gz_path)
}
