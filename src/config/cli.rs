use crate::config::toml_config::Settings;
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, Validate};
use clap::{Args, Parser};
use std::path::PathBuf;

/// Flags shared by every batch binary.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    #[arg(
        short = 'a',
        long = "addresses",
        value_name = "FILE",
        help = "file containing list of unit IP addresses, one per line"
    )]
    pub address_file: PathBuf,

    #[arg(short = 'd', long, help = "echo every raw response body")]
    pub debug: bool,

    #[arg(long, value_name = "FILE", help = "TOML settings file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "keep address lines that are not plain IP addresses, e.g. host:port")]
    pub no_address_filter: bool,

    #[arg(long, value_name = "SECONDS", help = "per-request timeout")]
    pub timeout: Option<u64>,

    #[arg(long, value_name = "FILE", help = "write a JSON report of every request")]
    pub report: Option<PathBuf>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "log as JSON lines")]
    pub log_json: bool,
}

impl CommonArgs {
    /// Settings file (if any) with command line overrides applied, validated.
    pub fn load_settings(&self) -> Result<Settings> {
        let settings = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading settings from: {}", path.display());
                Settings::from_file(path)?
            }
            None => Settings::default(),
        };

        let settings = settings
            .with_timeout(self.timeout)
            .with_address_filter_disabled(self.no_address_filter);
        settings.validate()?;
        Ok(settings)
    }
}

impl Validate for CommonArgs {
    fn validate(&self) -> Result<()> {
        validate_path("addresses", &self.address_file.to_string_lossy())?;
        if let Some(report) = &self.report {
            validate_path("report", &report.to_string_lossy())?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "rpc-batch")]
#[command(about = "Set device parameters over XML-RPC across a list of units")]
pub struct SetParamsArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    #[arg(
        short = 'c',
        long = "changes",
        value_name = "FILE",
        help = "file containing list of xpath, value command pairs, one pair per line"
    )]
    pub change_file: PathBuf,
}

impl Validate for SetParamsArgs {
    fn validate(&self) -> Result<()> {
        self.common.validate()?;
        validate_path("changes", &self.change_file.to_string_lossy())
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "set-mode")]
#[command(about = "Set the media-level mode of IP-out transport streams across a list of units")]
pub struct SetModeArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    #[arg(
        short = 'i',
        long = "index",
        default_value_t = 0,
        help = "The 1-based index of the IP-out TS to set. 0 will set all TS on that chassis."
    )]
    pub index: u32,

    #[arg(
        short = 's',
        long = "state",
        default_value_t = 1,
        help = "The state to set. 0 = Offline, 1 = Online."
    )]
    pub state: u32,
}

impl Validate for SetModeArgs {
    fn validate(&self) -> Result<()> {
        self.common.validate()
    }
}
