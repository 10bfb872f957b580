use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{fmt, EnvFilter};
use watson::Cli;

fn main() -> ExitCode {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(std::io::stderr).init();
    let cli = Cli::parse();
    let mut out = std::io::stdout().lock();
    match watson::run(&cli, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(failure) => {
            eprintln!("Error: {failure}");
            ExitCode::from(failure.code())
        }
    }
}
