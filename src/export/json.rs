//! JSON exporter

use crate::config::Config;
use crate::core::{FileCounts, FileFinding, RunResult};
use crate::error::Result;
use crate::export::Exporter;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;

/// JSON output exporter
pub struct JsonExporter;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonOutput<'a> {
    correct_count: usize,
    total_count: usize,
    percent: f64,
    anys: &'a [FileFinding],
    #[serde(skip_serializing_if = "Option::is_none")]
    file_counts: Option<&'a BTreeMap<String, FileCounts>>,
}

impl Exporter for JsonExporter {
    fn export(&self, result: &RunResult, _config: &Config, writer: &mut dyn Write) -> Result<()> {
        let output = JsonOutput {
            correct_count: result.correct_count,
            total_count: result.total_count,
            percent: result.percent(),
            anys: &result.findings,
            file_counts: result.file_counts.as_ref(),
        };

        let json = serde_json::to_string_pretty(&output)?;
        writeln!(writer, "{}", json)?;

        Ok(())
    }
}
