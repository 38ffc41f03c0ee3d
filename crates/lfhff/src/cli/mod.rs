//! Command-line interface for lfhff.
//!
//! Configuration is taken from CLI args, environment variables, or a
//! config file with precedence CLI > env > file.

mod error;
mod output;

pub use error::{
    exit_code_for_lookup_error, format_config_error, format_lookup_error, EXIT_ERROR,
    EXIT_NOT_FOUND, EXIT_SUCCESS, EXIT_USAGE,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use lfhff_common::validate_hostname;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;

use crate::config::LookupConfig;
use crate::lookup::{detect_mode, LookupResult, SortedHostsLookup};
use crate::verify::{verify, VerifyOptions};
use output::{print_item, print_report, ModeInfo};

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

#[derive(Parser)]
#[command(name = "lfhff")]
#[command(about = "Look up host names in plain or pre-sorted (LFHFF v1) hosts files", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Hosts file to search
    #[arg(short = 'f', long, global = true)]
    pub hosts_file: Option<PathBuf>,

    /// Longest record, in bytes, the sorted search can step back over
    #[arg(long, global = true)]
    pub max_record_len: Option<usize>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "table")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a host name to its address
    Lookup {
        /// Host name to look up (case-insensitive)
        name: String,
    },
    /// Check that every record in the hosts file resolves
    Verify {
        /// Also check that near-miss names between records do not resolve
        #[arg(long)]
        probes: bool,
    },
    /// Show whether the hosts file is searched sorted or linearly
    Mode,
    /// Show effective configuration
    Config,
}

pub fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    crate::tracing_setup::init(cli.verbose, cli.quiet);
    execute(cli)
}

/// Run a parsed command line
pub fn execute(cli: Cli) -> Result<ExitCode> {
    let config = match LookupConfig::load(
        cli.config.as_deref(),
        cli.hosts_file.as_deref(),
        cli.max_record_len,
    ) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", format_config_error(&e));
            return Ok(exit_code(EXIT_USAGE));
        }
    };
    debug!(?config, "effective configuration");

    match cli.command {
        Commands::Config => {
            if !cli.quiet {
                println!("Hosts file:     {}", config.hosts_file.display());
                println!("Max record len: {}", config.max_record_len);
                match cli
                    .config
                    .clone()
                    .or_else(LookupConfig::default_config_path)
                {
                    Some(path) => println!("Config file:    {}", path.display()),
                    None => println!("Config file:    (no config directory)"),
                }
            }
            Ok(exit_code(EXIT_SUCCESS))
        }

        Commands::Lookup { name } => {
            let name = match validate_hostname(&name) {
                Ok(n) => n,
                Err(e) => {
                    eprintln!("Invalid input: {}", e);
                    return Ok(exit_code(EXIT_USAGE));
                }
            };

            let mut source = open_hosts_file(&config.hosts_file)?;
            let lookup = SortedHostsLookup::new(config.lookup_options());

            match lookup.lookup(&mut source, &name) {
                Ok(LookupResult::Found(found)) => {
                    if !cli.quiet {
                        print_item(&found, cli.format);
                    }
                    Ok(exit_code(EXIT_SUCCESS))
                }
                Ok(LookupResult::NotFound) => {
                    if !cli.quiet {
                        eprintln!("Not found: {}", name);
                    }
                    Ok(exit_code(EXIT_NOT_FOUND))
                }
                Err(e) => {
                    eprintln!("{}", format_lookup_error(&e));
                    Ok(exit_code(exit_code_for_lookup_error(&e)))
                }
            }
        }

        Commands::Verify { probes } => {
            let mut source = open_hosts_file(&config.hosts_file)?;
            let lookup = SortedHostsLookup::new(config.lookup_options());

            let report = match verify(&lookup, &mut source, VerifyOptions { probes }) {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("{}", format_lookup_error(&e));
                    return Ok(exit_code(EXIT_ERROR));
                }
            };

            if !cli.quiet || !report.is_ok() {
                print_report(&report, cli.format);
            }
            if report.is_ok() {
                Ok(exit_code(EXIT_SUCCESS))
            } else {
                Ok(exit_code(EXIT_ERROR))
            }
        }

        Commands::Mode => {
            let mut source = open_hosts_file(&config.hosts_file)?;
            let mode = match detect_mode(&mut source) {
                Ok(m) => m,
                Err(e) => {
                    eprintln!("{}", format_lookup_error(&e));
                    return Ok(exit_code(EXIT_ERROR));
                }
            };
            if !cli.quiet {
                print_item(
                    &ModeInfo {
                        hosts_file: config.hosts_file.clone(),
                        mode,
                    },
                    cli.format,
                );
            }
            Ok(exit_code(EXIT_SUCCESS))
        }
    }
}

fn open_hosts_file(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open hosts file {}", path.display()))?;
    Ok(BufReader::new(file))
}

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(code as u8)
}
