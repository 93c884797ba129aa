//! Export system for coverage results

mod console;
mod json;

use crate::config::{Config, OutputFormat};
use crate::core::RunResult;
use crate::error::Result;
use std::io::{self, BufWriter, Write};

pub use console::ConsoleExporter;
pub use json::JsonExporter;

/// Trait for output formatting
pub trait Exporter {
    /// Write the complete output for the given result
    fn export(&self, result: &RunResult, config: &Config, writer: &mut dyn Write) -> Result<()>;
}

/// Create an appropriate exporter based on configuration
pub fn create_exporter(format: OutputFormat) -> Box<dyn Exporter> {
    match format {
        OutputFormat::Console => Box::new(ConsoleExporter),
        OutputFormat::Json => Box::new(JsonExporter),
    }
}

/// Buffered writer over stdout
pub fn get_output_writer() -> Box<dyn Write> {
    Box::new(BufWriter::new(io::stdout()))
}
