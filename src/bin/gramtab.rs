use std::process::ExitCode;

use clap::Parser;
use gramtab::{Designators, GenerationRequest, GeneratorConfig, driver};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let designators = Designators::parse();
    let result = GenerationRequest::from_designators(&designators)
        .and_then(|request| driver::run(&request, &GeneratorConfig::default()));
    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("gramtab: {err}");
            ExitCode::FAILURE
        }
    }
}
