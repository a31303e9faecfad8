//! Print trigger: spool the rendered report to disk and optionally hand it to
//! a print command such as `lp`.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::Local;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PrintError {
    #[error("Failed to write report to {path}: {source}")]
    Spool {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to launch print command '{command}': {source}")]
    Launch {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Print command '{command}' exited with {status}")]
    Exit { command: String, status: String },
}

pub trait Printer {
    /// Print `report`, returning where the spooled copy was written.
    fn print(&self, report: &str) -> Result<PathBuf, PrintError>;
}

#[derive(Debug, Clone)]
pub struct SpoolPrinter {
    output_dir: PathBuf,
    command: Option<String>,
}

impl SpoolPrinter {
    pub fn new(output_dir: impl Into<PathBuf>, command: Option<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            command: command.filter(|c| !c.trim().is_empty()),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn spool(&self, report: &str) -> Result<PathBuf, PrintError> {
        let name = format!("promo-plan-{}.txt", Local::now().format("%Y%m%d-%H%M%S%3f"));
        let path = self.output_dir.join(name);
        fs::create_dir_all(&self.output_dir)
            .and_then(|()| fs::write(&path, report))
            .map_err(|source| PrintError::Spool {
                path: path.clone(),
                source,
            })?;
        Ok(path)
    }
}

impl Printer for SpoolPrinter {
    fn print(&self, report: &str) -> Result<PathBuf, PrintError> {
        let path = self.spool(report)?;
        log::info!("Report spooled to {}", path.display());

        let Some(command) = &self.command else {
            return Ok(path);
        };
        let output = Command::new(command)
            .arg(&path)
            .output()
            .map_err(|source| PrintError::Launch {
                command: command.clone(),
                source,
            })?;
        if !output.status.success() {
            log::warn!(
                "Print command stderr: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return Err(PrintError::Exit {
                command: command.clone(),
                status: output.status.to_string(),
            });
        }
        log::info!("Sent {} to '{}'", path.display(), command);
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_spool_only() {
        let dir = TempDir::new().unwrap();
        let printer = SpoolPrinter::new(dir.path().join("prints"), None);
        let path = printer.print("ENTITY  FIELD\n").unwrap();
        assert!(path.starts_with(printer.output_dir()));
        assert_eq!(fs::read_to_string(path).unwrap(), "ENTITY  FIELD\n");
    }

    #[test]
    fn test_blank_command_is_ignored() {
        let dir = TempDir::new().unwrap();
        let printer = SpoolPrinter::new(dir.path(), Some("  ".into()));
        assert!(printer.print("x").is_ok());
    }

    #[test]
    fn test_missing_command_fails_to_launch() {
        let dir = TempDir::new().unwrap();
        let printer = SpoolPrinter::new(dir.path(), Some("promo-tracker-no-such-printer".into()));
        let err = printer.print("x").unwrap_err();
        assert!(matches!(err, PrintError::Launch { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_command_exit_status() {
        let dir = TempDir::new().unwrap();
        assert!(SpoolPrinter::new(dir.path(), Some("true".into())).print("x").is_ok());
        let err = SpoolPrinter::new(dir.path(), Some("false".into())).print("x").unwrap_err();
        assert!(matches!(err, PrintError::Exit { .. }));
    }
}
