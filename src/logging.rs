//! Tracing setup for the terminal driver.
//!
//! The status line owns the terminal while raw mode is on, so events are
//! appended to `typepace.log` under the user data dir instead of stderr.
//! `RUST_LOG` overrides the `typepace=info` default; `RUST_LOG_FORMAT=json`
//! writes JSON lines.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

const LOG_FILE: &str = "typepace.log";

pub fn log_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("typepace")
        .join(LOG_FILE)
}

/// Open `path` for appending, creating parent directories as needed.
pub fn open_log(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Install the global subscriber writing to [`log_path`]. Returns the path
/// written to, or `None` when the file could not be opened and events are
/// discarded. Later calls are no-ops.
pub fn init() -> Option<PathBuf> {
    let path = log_path();
    let (writer, opened) = match open_log(&path) {
        Ok(file) => (BoxMakeWriter::new(Mutex::new(file)), Some(path)),
        Err(_) => (BoxMakeWriter::new(io::sink), None),
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("typepace=info"));
    let json = std::env::var("RUST_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false);
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    opened
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn log_lives_under_typepace_dir() {
        let path = log_path();
        assert_eq!(path.file_name().unwrap(), LOG_FILE);
        assert!(path.parent().unwrap().ends_with("typepace"));
    }

    #[test]
    fn open_log_creates_dirs_and_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join(LOG_FILE);

        writeln!(open_log(&path).unwrap(), "first").unwrap();
        writeln!(open_log(&path).unwrap(), "second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }
}
