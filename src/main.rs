use clap::Parser;
use std::io::{IsTerminal, Write};
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use typecov::cache::clear_cache;
use typecov::cli::Cli;
use typecov::discovery::{load_file_list, select_files};
use typecov::export::{create_exporter, get_output_writer};
use typecov::{process_files_with_cache, LexicalAnalyzer};

/// Install the stderr log subscriber; RUST_LOG overrides the default level
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match cli.into_config() {
        Ok(c) => c,
        Err(e) => {
            error!("{}", e);
            return ExitCode::from(2);
        }
    };

    // === Phase 0: Handle --clear-cache ===
    if config.clear_cache {
        info!("Clearing cache...");
        if let Err(e) = clear_cache(&config.effective_cache_dir()) {
            warn!("Failed to clear cache: {}", e);
        }
    }

    // === Phase 1: File Discovery ===
    let file_list = match load_file_list(&config.list_filename)
        .and_then(|candidates| select_files(&candidates, &config))
    {
        Ok(files) => files,
        Err(e) => {
            error!("{}", e);
            return ExitCode::from(2);
        }
    };

    // === Phase 2: Process Files ===
    let analyzer = LexicalAnalyzer::new();
    let result = match process_files_with_cache(&file_list, &config, &analyzer) {
        Ok(r) => r,
        Err(e) => {
            error!("{}", e);
            return ExitCode::from(2);
        }
    };

    // === Phase 3: Export Results ===
    let exporter = create_exporter(config.output_format);
    let mut writer = get_output_writer();

    if let Err(e) = exporter.export(&result, &config, &mut *writer) {
        error!("Error writing output: {}", e);
        return ExitCode::from(2);
    }

    if let Err(e) = writer.flush() {
        error!("Error flushing output: {}", e);
        return ExitCode::from(2);
    }

    // === Phase 4: Exit Code ===
    match config.at_least {
        Some(at_least) if result.percent() < at_least => {
            error!(
                "Coverage {:.2}% is below the required {:.2}%",
                result.percent(),
                at_least
            );
            ExitCode::from(1)
        }
        _ => ExitCode::SUCCESS,
    }
}
