//! CLI module for soc-synth.
//!
//! All CLI logic lives here rather than in main.rs so it can be tested.
//! `run_cli` is called from main.rs with parsed arguments.

mod args;
mod commands;
mod output;

pub use args::{Args, Command, ConfigSource, DEFAULT_VERIFY_RUNS};
pub use commands::{load_config, run_cli, verify_reproducibility, CONSISTENCY_TOLERANCE};
pub use output::{print_help, print_version, validation_report_lines, written_line};
