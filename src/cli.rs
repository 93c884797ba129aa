//! CLI argument parsing using clap

use crate::config::{Config, IgnoreCategories, OutputFormat};
use crate::error::{CoverageError, Result};
use clap::Parser;
use std::path::PathBuf;

/// Incremental type coverage checker
#[derive(Parser, Debug)]
#[command(name = "typecov")]
#[command(version)]
#[command(about = "Measure type coverage of TypeScript sources", long_about = None)]
pub struct Cli {
    /// Input file containing list of source files to check (one per line)
    /// Use "-" to read from stdin
    #[arg(value_name = "FILE_LIST", default_value = "-")]
    pub file_list: String,

    /// Cache results between runs
    #[arg(long = "cache")]
    pub cache: bool,

    /// Directory holding the cache (default: .type-coverage)
    #[arg(long = "cache-directory", value_name = "DIR")]
    pub cache_directory: Option<PathBuf>,

    /// Remove the cache before running
    #[arg(long = "clear-cache")]
    pub clear_cache: bool,

    /// Do not report nested any (e.g. Promise<any>)
    #[arg(long = "ignore-nested")]
    pub ignore_nested: bool,

    /// Do not report `foo as Bar` assertions
    #[arg(long = "ignore-as-assertion")]
    pub ignore_as_assertion: bool,

    /// Do not report `<Bar>foo` assertions
    #[arg(long = "ignore-type-assertion")]
    pub ignore_type_assertion: bool,

    /// Do not report `foo!` assertions
    #[arg(long = "ignore-non-null-assertion")]
    pub ignore_non_null_assertion: bool,

    /// Report semantic errors as findings
    #[arg(long = "report-semantic-error")]
    pub report_semantic_error: bool,

    /// Also check type and non-null assertions
    #[arg(long = "strict")]
    pub strict: bool,

    /// Print correct and total counts per file
    #[arg(long = "file-counts")]
    pub file_counts: bool,

    /// Report absolute paths
    #[arg(long = "absolute-path")]
    pub absolute_path: bool,

    /// Only check these files
    #[arg(long = "files", value_name = "PATH", num_args = 1..)]
    pub files: Option<Vec<String>>,

    /// Skip files matching these globs
    #[arg(long = "ignore-files", value_name = "GLOB", num_args = 1..)]
    pub ignore_files: Vec<String>,

    /// Print every finding
    #[arg(long = "detail")]
    pub detail: bool,

    /// Output in JSON format
    #[arg(long = "json")]
    pub json: bool,

    /// Fail if coverage percent is below N (0-100)
    #[arg(long = "at-least", value_name = "N")]
    pub at_least: Option<f64>,

    /// Number of threads for parallel processing
    #[arg(short = 'j', long = "threads", value_name = "N")]
    pub threads: Option<usize>,

    /// Enable debug logging
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl Cli {
    /// Parse command line arguments into a Config
    pub fn into_config(self) -> Result<Config> {
        if let Some(at_least) = self.at_least {
            if !(0.0..=100.0).contains(&at_least) {
                return Err(CoverageError::InvalidConfig(format!(
                    "--at-least must be between 0 and 100, got {}",
                    at_least
                )));
            }
        }
        if self.threads == Some(0) {
            return Err(CoverageError::InvalidConfig(
                "--threads must be at least 1".to_string(),
            ));
        }

        let output_format = if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Console
        };

        Ok(Config {
            list_filename: self.file_list,
            absolute_path: self.absolute_path,
            files: self.files,
            ignore_files: self.ignore_files,
            cache_enabled: self.cache,
            cache_dir: self.cache_directory,
            clear_cache: self.clear_cache,
            ignore: IgnoreCategories {
                nested: self.ignore_nested,
                as_assertion: self.ignore_as_assertion,
                type_assertion: self.ignore_type_assertion,
                non_null_assertion: self.ignore_non_null_assertion,
            },
            report_semantic_error: self.report_semantic_error,
            strict: self.strict,
            num_threads: self.threads.unwrap_or_else(num_cpus::get),
            output_format,
            file_counts: self.file_counts,
            detail: self.detail,
            at_least: self.at_least,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["typecov"]);
        assert!(!cli.verbose);
        let config = cli.into_config().unwrap();

        assert_eq!(config.list_filename, "-");
        assert!(!config.cache_enabled);
        assert!(config.cache_dir.is_none());
        assert!(config.ignore.is_empty());
        assert!(config.files.is_none());
        assert_eq!(config.output_format, OutputFormat::Console);
        assert_eq!(config.at_least, None);
    }

    #[test]
    fn test_cli_json_output() {
        let cli = Cli::parse_from(["typecov", "--json", "files.txt"]);
        let config = cli.into_config().unwrap();

        assert_eq!(config.output_format, OutputFormat::Json);
        assert_eq!(config.list_filename, "files.txt");
    }

    #[test]
    fn test_cli_ignore_categories() {
        let cli = Cli::parse_from([
            "typecov",
            "--ignore-nested",
            "--ignore-as-assertion",
            "--ignore-non-null-assertion",
        ]);
        let config = cli.into_config().unwrap();

        assert!(config.ignore.nested);
        assert!(config.ignore.as_assertion);
        assert!(!config.ignore.type_assertion);
        assert!(config.ignore.non_null_assertion);
    }

    #[test]
    fn test_cli_at_least_out_of_range() {
        let cli = Cli::parse_from(["typecov", "--at-least", "120"]);
        let result = cli.into_config();

        assert!(matches!(result, Err(CoverageError::InvalidConfig(_))));
    }

    #[test]
    fn test_cli_zero_threads() {
        let cli = Cli::parse_from(["typecov", "-j", "0"]);
        assert!(matches!(cli.into_config(), Err(CoverageError::InvalidConfig(_))));
    }

    #[test]
    fn test_cli_all_options() {
        let cli = Cli::parse_from([
            "typecov",
            "--cache",
            "--cache-directory",
            "/tmp/cov",
            "--clear-cache",
            "--ignore-type-assertion",
            "--report-semantic-error",
            "--strict",
            "--file-counts",
            "--absolute-path",
            "--detail",
            "--at-least",
            "90.5",
            "-j",
            "4",
            "-v",
            "--ignore-files",
            "**/*.d.ts",
            "test/**",
            "--files",
            "src/a.ts",
            "src/b.ts",
            "--",
            "files.txt",
        ]);
        assert!(cli.verbose);
        let config = cli.into_config().unwrap();

        assert!(config.cache_enabled);
        assert_eq!(config.cache_dir, Some(PathBuf::from("/tmp/cov")));
        assert!(config.clear_cache);
        assert!(config.ignore.type_assertion);
        assert!(config.report_semantic_error);
        assert!(config.strict);
        assert!(config.file_counts);
        assert!(config.absolute_path);
        assert!(config.detail);
        assert_eq!(config.at_least, Some(90.5));
        assert_eq!(config.num_threads, 4);
        assert_eq!(config.ignore_files, vec!["**/*.d.ts", "test/**"]);
        assert_eq!(
            config.files,
            Some(vec!["src/a.ts".to_string(), "src/b.ts".to_string()])
        );
        assert_eq!(config.list_filename, "files.txt");
    }
}
