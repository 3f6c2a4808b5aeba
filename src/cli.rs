use std::{fs, path::PathBuf, str::FromStr};

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse a CSV of conference strings into structured rows
    Parse {
        /// Input CSV with `pid,name_seq,conference` columns, or `-` for stdin
        #[arg(value_name = "INPUT", default_value = "-")]
        input: Input,
        /// Where to write the parsed CSV; stdout when omitted
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
        /// Model name sent to the extraction service
        #[arg(long)]
        model: Option<String>,
        /// URL of the extraction service's generate endpoint
        #[arg(long)]
        url: Option<String>,
        /// Seconds allowed for connecting to the extraction service
        #[arg(long, value_name = "SECS")]
        connect_timeout: Option<u64>,
        /// Only process the first N rows
        #[arg(long, value_name = "N")]
        limit: Option<usize>,
        /// Stream the service answer for every Nth row to stderr (0 = never)
        #[arg(long, value_name = "N", default_value_t = 1)]
        show_every: usize,
        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },
    /// Run the offline heuristics on one or more strings
    Check {
        #[arg(value_name = "TEXT", required = true)]
        texts: Vec<String>,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Where entries are read from: standard input, or a CSV file on disk.
pub enum Input {
    Stdin,
    File(PathBuf),
}

impl FromStr for Input {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "-" {
            return Ok(Input::Stdin);
        }
        fs::canonicalize(s)
            .map(Input::File)
            .map_err(|e| format!("cannot open input {s}: {e}"))
    }
}
