//! Rotating file logger for ConnectX
//!
//! Logs land in `%LOCALAPPDATA%\ConnectX\logs`. Debug builds always log and
//! echo to stderr; release builds only write when `CX_ENABLE_LOGGING=1`.
//! SECURITY: callers must never pass passwords or credential blobs here.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::OnceLock;

const MAX_LOG_BYTES: u64 = 10 * 1024 * 1024;

struct Logger {
    path: PathBuf,
    verbose: bool,
    enabled: bool,
}

impl Logger {
    fn init() -> Self {
        let base = std::env::var("LOCALAPPDATA").unwrap_or_else(|_| ".".to_string());
        let dir = PathBuf::from(base).join("ConnectX").join("logs");
        let _ = fs::create_dir_all(&dir);

        // Use different log file names for debug vs release
        let filename = if cfg!(debug_assertions) {
            "connectx-dev.log"
        } else {
            "connectx.log"
        };
        let path = dir.join(filename);

        let verbose = std::env::var("CX_LOG_VERBOSE")
            .map(|v| v == "1")
            .unwrap_or(false);

        // In debug builds, always enable logging
        // In release builds, only enable if CX_ENABLE_LOGGING=1
        let enabled = if cfg!(debug_assertions) {
            true
        } else {
            std::env::var("CX_ENABLE_LOGGING")
                .map(|v| v == "1")
                .unwrap_or(false)
        };

        Self {
            path,
            verbose,
            enabled,
        }
    }

    fn rotate_if_needed(&self) {
        if let Ok(meta) = fs::metadata(&self.path) {
            if meta.len() > MAX_LOG_BYTES {
                let backup = self.path.with_extension("log.bak");
                let _ = fs::remove_file(&backup);
                let _ = fs::rename(&self.path, &backup);
            }
        }
    }

    fn timestamp() -> String {
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string()
    }

    fn log(&self, level: &str, message: &str) {
        if !self.enabled {
            return;
        }

        self.rotate_if_needed();
        if let Ok(mut file) = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
        {
            let _ = writeln!(file, "{} [{}] {}", Self::timestamp(), level, message);
        }
    }
}

static LOGGER: OnceLock<Logger> = OnceLock::new();

fn get_logger() -> Option<&'static Logger> {
    Some(LOGGER.get_or_init(Logger::init))
}

pub fn log_debug(message: &str) {
    log_internal("DEBUG", message, false);
}

#[allow(dead_code)]
pub fn log_debug_verbose(message: &str) {
    if let Some(logger) = get_logger() {
        if logger.verbose {
            log_internal("DEBUG", message, true);
        }
    }
}

pub fn log_info(message: &str) {
    log_internal("INFO", message, false);
}

pub fn log_warn(message: &str) {
    log_internal("WARN", message, false);
}

pub fn log_error(message: &str) {
    log_internal("ERROR", message, false);
}

fn log_internal(level: &str, message: &str, verbose_only: bool) {
    // Console logging - stderr for immediate, unbuffered output in dev mode
    #[cfg(debug_assertions)]
    {
        let should_print = if verbose_only {
            get_logger().map(|l| l.verbose).unwrap_or(false)
        } else {
            true
        };

        if should_print {
            eprintln!("[{}] {}", level, message);
        }
    }

    // File logging (enabled in debug, or release with CX_ENABLE_LOGGING=1)
    if let Some(logger) = get_logger() {
        if !verbose_only || logger.verbose {
            logger.log(level, message);
        }
    }
}
