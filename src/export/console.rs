//! Console (human-readable) exporter

use crate::config::Config;
use crate::core::RunResult;
use crate::error::Result;
use crate::export::Exporter;
use std::io::Write;

/// Human-readable console output exporter
pub struct ConsoleExporter;

impl Exporter for ConsoleExporter {
    fn export(&self, result: &RunResult, config: &Config, writer: &mut dyn Write) -> Result<()> {
        if config.detail {
            // Humans count lines and columns from 1
            for entry in &result.findings {
                let finding = &entry.finding;
                writeln!(
                    writer,
                    "{}:{}:{}: {}",
                    entry.file,
                    finding.line + 1,
                    finding.character + 1,
                    finding.text.as_deref().unwrap_or(finding.kind.as_str())
                )?;
            }
        }

        if let Some(file_counts) = &result.file_counts {
            for (file, counts) in file_counts {
                let percent = if counts.total_count == 0 {
                    100.0
                } else {
                    counts.correct_count as f64 / counts.total_count as f64 * 100.0
                };
                writeln!(
                    writer,
                    "{}: {}/{} {:.2}%",
                    file, counts.correct_count, counts.total_count, percent
                )?;
            }
        }

        writeln!(
            writer,
            "{} / {} {:.2}%",
            result.correct_count,
            result.total_count,
            result.percent()
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{FileCounts, FileFinding, Finding, FindingKind};
    use std::collections::BTreeMap;

    fn sample() -> RunResult {
        RunResult {
            correct_count: 3,
            total_count: 4,
            findings: vec![
                FileFinding {
                    file: "src/a.ts".to_string(),
                    finding: Finding::new(2, 4, FindingKind::Any, "value"),
                },
                FileFinding {
                    file: "src/a.ts".to_string(),
                    finding: Finding {
                        line: 0,
                        character: 0,
                        kind: FindingKind::UnsafeNonNull,
                        text: None,
                    },
                },
            ],
            file_counts: None,
            files_analyzed: 1,
            cache_hits: 0,
            cache_misses: 1,
        }
    }

    fn render(result: &RunResult, config: &Config) -> String {
        let mut output = Vec::new();
        ConsoleExporter.export(result, config, &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_summary_only_by_default() {
        let output = render(&sample(), &Config::default());
        assert_eq!(output, "3 / 4 75.00%\n");
    }

    #[test]
    fn test_detail_lines_are_one_based() {
        let mut config = Config::default();
        config.detail = true;

        let output = render(&sample(), &config);
        assert!(output.contains("src/a.ts:3:5: value\n"));
        assert!(output.contains("src/a.ts:1:1: unsafe-non-null-assertion\n"));
        assert!(output.ends_with("3 / 4 75.00%\n"));
    }

    #[test]
    fn test_file_counts() {
        let mut result = sample();
        let mut counts = BTreeMap::new();
        counts.insert(
            "src/a.ts".to_string(),
            FileCounts {
                correct_count: 3,
                total_count: 4,
            },
        );
        counts.insert(
            "src/empty.ts".to_string(),
            FileCounts {
                correct_count: 0,
                total_count: 0,
            },
        );
        result.file_counts = Some(counts);

        let output = render(&result, &Config::default());
        assert_eq!(
            output,
            "src/a.ts: 3/4 75.00%\nsrc/empty.ts: 0/0 100.00%\n3 / 4 75.00%\n"
        );
    }
}
