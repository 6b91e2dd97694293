//! Command-line interface for pipeforge.
//!
//! Provides commands for running the pipeline and inspecting the step
//! registry.

mod commands;

pub use commands::{parse_cli, run_with_cli, Cli};
