//! Command line interface module
//!
//! Argument parsing and the runner that maps each subcommand onto one
//! registry API call.

pub mod args;
pub mod runner;

pub use args::Args;
pub use runner::Runner;
