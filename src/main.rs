use clap::Parser;
use ibm_container_registry::cli::{Args, Runner};
use ibm_container_registry::logging::init_tracing;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose, args.quiet);

    let runner = Runner::new(args);
    match runner.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            runner.output().error(&err.to_string());
            ExitCode::FAILURE
        }
    }
}
