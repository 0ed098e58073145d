//! Status display and result output.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::config::OutputConfig;
use crate::error::Result;

/// The three visual modes of the status region.
pub trait StatusSink {
    fn info(&mut self, message: &str);
    fn success(&mut self, message: &str);
    fn error(&mut self, message: &str);
}

/// Console status sink writing prefixed lines to stderr.
///
/// Status lines go to stderr so the extracted cookie string on stdout
/// stays pipeable.
pub struct ConsoleStatus {
    config: OutputConfig,
}

impl ConsoleStatus {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    /// Extra diagnostics, shown only with `--verbose`.
    pub fn verbose(&self, message: &str) {
        if self.config.verbose && !self.config.silent {
            eprintln!("* {}", message);
        }
    }
}

impl StatusSink for ConsoleStatus {
    fn info(&mut self, message: &str) {
        if !self.config.silent {
            eprintln!("* {}", message);
        }
    }

    fn success(&mut self, message: &str) {
        if !self.config.silent {
            eprintln!("melcookie: {}", message);
        }
    }

    fn error(&mut self, message: &str) {
        eprintln!("melcookie: error: {}", message);
    }
}

/// Writes the extracted cookie string to a file or stdout.
pub struct ResultWriter {
    config: OutputConfig,
}

impl ResultWriter {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    pub fn write(&self, content: &str) -> Result<()> {
        if let Some(file_path) = &self.config.file {
            self.write_to_file(content, file_path)
        } else {
            self.write_to_stdout(content)
        }
    }

    fn write_to_file(&self, content: &str, file_path: &Path) -> Result<()> {
        let mut file = File::create(file_path)?;
        file.write_all(content.as_bytes())?;
        file.write_all(b"\n")?;
        Ok(())
    }

    fn write_to_stdout(&self, content: &str) -> Result<()> {
        let mut stdout = io::stdout();
        stdout.write_all(content.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}
