use std::process::ExitCode;

use fire_core::{Config, FireError, Value, fire};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[cfg(not(feature = "methods"))]
fn run(args: &[String], config: Config) -> Result<Vec<Value>, FireError> {
    fire(&fire_core::Function::new(usercode::add), args, config)
}

#[cfg(feature = "methods")]
fn run(args: &[String], config: Config) -> Result<Vec<Value>, FireError> {
    let calc = usercode::Calculator::new("demo");
    fire(&calc, args, config)
}

fn main() -> ExitCode {
    // Initialize tracing with env filter (e.g., RUST_LOG=fire_core=debug)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args: Vec<String> = std::env::args().collect();
    match run(&args, Config::from_env()) {
        Ok(_) => ExitCode::SUCCESS,
        // Usage has already been printed
        Err(FireError::InvalidCommand { .. }) => ExitCode::FAILURE,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
