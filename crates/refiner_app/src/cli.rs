use std::path::PathBuf;

use clap::Parser;
use refiner_logging::LogDestination;

/// Terminal client for the resume refinement service.
#[derive(Debug, Parser)]
#[command(name = "refiner", version, about)]
pub struct Cli {
    /// RON configuration file. A missing file means built-in defaults.
    #[arg(long, default_value = "refiner.ron")]
    pub config: PathBuf,

    /// Backend base URL, overriding the config file.
    #[arg(long)]
    pub base_url: Option<String>,

    /// Directory downloaded files are saved into, overriding the config file.
    #[arg(long)]
    pub download_dir: Option<PathBuf>,

    /// Where log output goes: file, terminal or both.
    #[arg(long, default_value = "file", value_parser = parse_log_destination)]
    pub log: LogDestination,

    /// Log at debug level.
    #[arg(short, long)]
    pub verbose: bool,

    /// Write the effective configuration to `--config` and exit.
    #[arg(long)]
    pub init_config: bool,
}

fn parse_log_destination(value: &str) -> Result<LogDestination, String> {
    LogDestination::parse(value)
        .ok_or_else(|| format!("unknown log destination {value:?}; use file, terminal or both"))
}
