//! CLI argument parsing.
//!
//! Accepts any iterator of strings so parsing can be tested without
//! touching `std::env::args()`.

use std::path::PathBuf;

use crate::output::DEFAULT_OUTPUT_DIR;

/// Default number of regenerations for `verify`.
pub const DEFAULT_VERIFY_RUNS: usize = 3;

/// CLI arguments container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    /// The command to execute.
    pub command: Command,
}

/// Where the scenario configuration comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigSource {
    /// Optional YAML file; defaults apply when absent.
    pub config_path: Option<PathBuf>,
    /// Optional seed override applied after loading.
    pub seed_override: Option<u64>,
}

/// Available CLI commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Generate the three CSV tables.
    Generate {
        /// Output directory.
        out_dir: PathBuf,
        /// Configuration source.
        source: ConfigSource,
    },
    /// Validate previously written tables.
    Validate {
        /// Directory holding `soc_timeseries.csv` and `soc_pools.csv`.
        dir: PathBuf,
    },
    /// Regenerate several times and compare outputs byte for byte.
    Verify {
        /// Number of regenerations.
        runs: usize,
        /// Configuration source.
        source: ConfigSource,
    },
    /// Show help
    Help,
    /// Show version
    Version,
}

impl Args {
    /// Parse command-line arguments from an iterator.
    ///
    /// The first item is the program name.
    #[must_use]
    pub fn parse_from<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();
        Self::parse_from_vec(&args)
    }

    /// Parse command-line arguments from the environment.
    #[must_use]
    pub fn parse() -> Self {
        Self::parse_from(std::env::args())
    }

    fn parse_from_vec(args: &[String]) -> Self {
        let Some(first) = args.get(1) else {
            return Self {
                command: Self::default_generate(),
            };
        };

        let command = match first.as_str() {
            "generate" => Self::parse_generate_command(&args[2..]),
            "validate" => Self::parse_validate_command(&args[2..]),
            "verify" => Self::parse_verify_command(&args[2..]),
            "-h" | "--help" | "help" => Command::Help,
            "-V" | "--version" | "version" => Command::Version,
            // flags without a subcommand belong to `generate`
            flag if flag.starts_with("--") || matches!(flag, "-o" | "-c") => {
                Self::parse_generate_command(&args[1..])
            }
            unknown => {
                eprintln!("Unknown command: {unknown}");
                Command::Help
            }
        };

        Self { command }
    }

    fn default_generate() -> Command {
        Command::Generate {
            out_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            source: ConfigSource::default(),
        }
    }

    fn parse_generate_command(rest: &[String]) -> Command {
        let mut out_dir = PathBuf::from(DEFAULT_OUTPUT_DIR);
        let mut source = ConfigSource::default();

        let mut i = 0;
        while i < rest.len() {
            match rest[i].as_str() {
                "--out" | "-o" => match rest.get(i + 1) {
                    Some(dir) => {
                        out_dir = PathBuf::from(dir);
                        i += 2;
                    }
                    None => return missing_value("--out"),
                },
                flag => match Self::parse_source_flag(flag, rest.get(i + 1), &mut source) {
                    Ok(consumed) => i += consumed,
                    Err(command) => return command,
                },
            }
        }

        Command::Generate { out_dir, source }
    }

    fn parse_validate_command(rest: &[String]) -> Command {
        let mut dir = PathBuf::from(DEFAULT_OUTPUT_DIR);

        let mut i = 0;
        while i < rest.len() {
            match rest[i].as_str() {
                "--dir" | "-d" => match rest.get(i + 1) {
                    Some(d) => {
                        dir = PathBuf::from(d);
                        i += 2;
                    }
                    None => return missing_value("--dir"),
                },
                other => {
                    eprintln!("Unknown option for 'validate': {other}");
                    return Command::Help;
                }
            }
        }

        Command::Validate { dir }
    }

    fn parse_verify_command(rest: &[String]) -> Command {
        let mut runs = DEFAULT_VERIFY_RUNS;
        let mut source = ConfigSource::default();

        let mut i = 0;
        while i < rest.len() {
            match rest[i].as_str() {
                "--runs" => match rest.get(i + 1).map(|v| v.parse::<usize>()) {
                    Some(Ok(n)) if n >= 2 => {
                        runs = n;
                        i += 2;
                    }
                    Some(_) => {
                        eprintln!("Error: '--runs' needs an integer of at least 2");
                        return Command::Help;
                    }
                    None => return missing_value("--runs"),
                },
                flag => match Self::parse_source_flag(flag, rest.get(i + 1), &mut source) {
                    Ok(consumed) => i += consumed,
                    Err(command) => return command,
                },
            }
        }

        Command::Verify { runs, source }
    }

    /// Handle `--seed` and `--config`; returns how many items were consumed.
    fn parse_source_flag(
        flag: &str,
        value: Option<&String>,
        source: &mut ConfigSource,
    ) -> Result<usize, Command> {
        match flag {
            "--seed" => match value.map(|v| v.parse::<u64>()) {
                Some(Ok(seed)) => {
                    source.seed_override = Some(seed);
                    Ok(2)
                }
                Some(Err(_)) => {
                    eprintln!("Error: '--seed' needs a non-negative integer");
                    Err(Command::Help)
                }
                None => Err(missing_value("--seed")),
            },
            "--config" | "-c" => match value {
                Some(path) => {
                    source.config_path = Some(PathBuf::from(path));
                    Ok(2)
                }
                None => Err(missing_value("--config")),
            },
            other => {
                eprintln!("Unknown option: {other}");
                Err(Command::Help)
            }
        }
    }
}

fn missing_value(flag: &str) -> Command {
    eprintln!("Error: '{flag}' requires a value");
    Command::Help
}
