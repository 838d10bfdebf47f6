// Goat School Simulator - Main Entry Point
//
// You can run it via Cargo:
//
// ```console
// $ cargo build --release
// $ ./target/release/goat-school
// ```
//
// Or with custom configuration:
//
// ```console
// $ ./target/release/goat-school --config school.json --ticks 16 --instant --verbose
// ```

use anyhow::{Context, Result};
use clap::Parser;
use goat_school_simulator::attendance::CancellationToken;
use goat_school_simulator::simulation::{
    is_empty_slot, LoggingConfig, LoggingGuard, TickRunner, TickStatistics, TracingTelemetry,
};
use goat_school_simulator::types::config::CliArgs;
use goat_school_simulator::types::SchoolConfig;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};

fn main() -> ExitCode {
    // Parse CLI arguments first to check for special flags
    let args = CliArgs::parse();

    // Handle special CLI flags that don't require full initialization
    if args.print_config {
        return match SchoolConfig::default().print_json() {
            Ok(json) => {
                println!("{}", json);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Failed to serialize default configuration: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    let logging = match init_logging(&args) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let code = run(&args);

    // Flush buffered log lines before the process exits
    drop(logging);
    code
}

/// Load configuration and run the school, reporting failures as an exit code
fn run(args: &CliArgs) -> ExitCode {
    info!("Starting Goat School Simulator");

    // Load configuration from CLI arguments and optional config file
    let config = match SchoolConfig::from_cli_args(args.clone()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            eprintln!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        eprintln!("Configuration validation failed: {}", e);
        return ExitCode::FAILURE;
    }

    info!("Configuration loaded and validated successfully");

    if args.dry_run {
        eprintln!("Configuration validation successful!");
        eprintln!("Dry run mode - no ticks will be run.");
        print_configuration_summary(&config);
        return ExitCode::SUCCESS;
    }

    print_startup_banner(&config);

    match run_school(&config) {
        Ok(statistics) => {
            eprintln!("{}", statistics.generate_summary_report());
            info!("Goat School Simulator completed successfully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("School run failed: {:#}", e);
            eprintln!("School run failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Initialize logging based on CLI flags
fn init_logging(
    args: &CliArgs,
) -> Result<LoggingGuard, Box<dyn std::error::Error + Send + Sync>> {
    if !args.json_logs && args.log_dir.is_none() {
        if args.debug {
            return LoggingConfig::init_debug();
        }
        if args.verbose {
            return LoggingConfig::init_verbose();
        }
    }

    let level = if args.debug {
        tracing::Level::DEBUG
    } else if args.verbose {
        tracing::Level::INFO
    } else {
        // Default: minimal logging for normal users
        tracing::Level::WARN
    };

    let mut logging = LoggingConfig::new().with_level(level);
    if args.json_logs {
        logging = logging.with_json_format().without_ansi();
    }
    if let Some(dir) = &args.log_dir {
        logging = logging.with_file_logging(dir.clone());
    }
    logging.init()
}

/// Run the configured number of ticks, printing each held class to stdout
fn run_school(config: &SchoolConfig) -> Result<TickStatistics> {
    let runner = TickRunner::from_config(config, Arc::new(TracingTelemetry::new()))
        .context("failed to build school from configuration")?;
    let cancel = CancellationToken::new();

    info!("Running {} ticks at {}", config.ticks, config.school_name);

    for result in runner.run_ticks(config.ticks, &cancel) {
        if is_empty_slot(&result) {
            eprintln!("No class found for the current hour");
            continue;
        }
        let report = result.context("tick failed")?;
        let body = report.to_json_pretty().context("failed to serialize tick response")?;
        println!("{}", body);
    }

    Ok(runner.statistics())
}

/// Print startup banner and configuration summary
fn print_startup_banner(config: &SchoolConfig) {
    eprintln!("Goat School Simulator");
    eprintln!("=====================");
    eprintln!("A cyclic school timetable with simulated class attendance");
    eprintln!();

    print_configuration_summary(config);
}

/// Print configuration summary
fn print_configuration_summary(config: &SchoolConfig) {
    eprintln!("Configuration:");
    eprintln!("  School: {}", config.school_name);
    eprintln!("  Hours per Day: {}", config.max_slot);
    eprintln!("  Ticks: {}", config.ticks);
    eprintln!("  Classes:");
    for class in &config.classes {
        eprintln!("    {} at hour {}", class.name, class.start_slot);
    }
    eprintln!("  Students: {}", config.students.len());
    eprintln!("  Empty Hours: {:?}", config.empty_slots());
    let (min_ms, spread_ms) = config.duration_window_ms();
    eprintln!("  Attendance Window: {} - {} ms", min_ms, min_ms.saturating_add(spread_ms));
    if config.instant {
        eprintln!("  Pacing: instant");
    }
    if let Some(seed) = config.seed {
        eprintln!("  Random Seed: {}", seed);
    }
    eprintln!();
}
