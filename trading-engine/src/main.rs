//! Order matching binary

use std::fs::File;
use std::io::{self, BufReader};
use std::process::ExitCode;

use clap::Parser;
use dotenv::dotenv;
use matching_engine::MatchingEngineSystem;
use tracing::{debug, error, info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use trading_engine::runner::is_input_failure;
use trading_engine::{run, Args, EngineConfig};

fn main() -> ExitCode {
    // Load environment variables
    dotenv().ok();

    // Parse command line arguments
    let args = Args::parse();

    let config = match EngineConfig::from_env() {
        Ok(config) => config.merge(&args),
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(2);
        }
    };

    init_tracing(config.debug);
    debug!("Configuration: {:?}", config);

    // One engine instance for the whole run
    let engine = MatchingEngineSystem::new();
    let mut out = io::stdout().lock();
    let mut err = io::stderr().lock();

    let result = match &config.input {
        Some(path) => match File::open(path) {
            Ok(file) => run(&engine, BufReader::new(file), &mut out, &mut err, config.format),
            Err(e) => {
                error!("Cannot open {}: {}", path.display(), e);
                return ExitCode::from(2);
            }
        },
        None => run(&engine, io::stdin().lock(), &mut out, &mut err, config.format),
    };

    match result {
        Ok(summary) => {
            info!("Done: {:?}", summary);
            ExitCode::SUCCESS
        }
        // Already reported on stderr by the run
        Err(e) if is_input_failure(&e) => {
            debug!("Input failed: {}", e);
            ExitCode::from(2)
        }
        Err(e) => {
            error!("Matching aborted: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr so stdout only carries trades and the book
fn init_tracing(debug: bool) {
    let log_level = if debug { Level::DEBUG } else { Level::ERROR };

    let env_filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .from_env_lossy();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .finish();

    // Only set the global subscriber if it hasn't been set already
    if tracing::subscriber::set_global_default(subscriber).is_ok() {
        debug!("Debug logging enabled");
    }
}
