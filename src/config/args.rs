use crate::config::toml_config::TomlConfig;
use crate::config::AppConfig;
use crate::utils::error::Result;
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "safecity")]
#[command(about = "SafeCity: a London crime dashboard")]
#[command(version)]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Load the data and serve the dashboard
    Serve(ServeArgs),
    /// Write the long-format crime table and borough totals as CSV
    Export(ExportArgs),
    /// Print total crimes per borough
    Summary(DataArgs),
    /// Wait until a running dashboard answers its health check
    Probe(ProbeArgs),
}

#[derive(Debug, Clone, Default, Args)]
pub struct DataArgs {
    /// Directory holding the crime CSV and the boundaries GeoJSON
    #[arg(long)]
    pub data_dir: Option<String>,

    /// Crime CSV file name, relative to the data directory
    #[arg(long)]
    pub crime_file: Option<String>,

    /// Borough boundaries GeoJSON file name, relative to the data directory
    #[arg(long)]
    pub boundaries_file: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct ServeArgs {
    #[command(flatten)]
    pub data: DataArgs,

    #[arg(long)]
    pub host: Option<String>,

    #[arg(short, long)]
    pub port: Option<u16>,

    /// Log process CPU and memory while loading
    #[arg(long)]
    pub monitor: bool,
}

#[derive(Debug, Clone, Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub data: DataArgs,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long)]
    pub monitor: bool,
}

#[derive(Debug, Clone, Args)]
pub struct ProbeArgs {
    /// Health endpoint to poll; defaults to the configured server's /healthz
    #[arg(long)]
    pub url: Option<String>,

    #[arg(long)]
    pub attempts: Option<u32>,

    #[arg(long)]
    pub interval_ms: Option<u64>,
}

impl DataArgs {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(file) = &self.crime_file {
            config.crime_file = file.clone();
        }
        if let Some(file) = &self.boundaries_file {
            config.boundaries_file = file.clone();
        }
    }
}

impl Cli {
    /// Defaults, then the config file if given, then flags.
    pub fn resolve(&self) -> Result<AppConfig> {
        let mut config = AppConfig::default();
        if let Some(path) = &self.config {
            config.apply_toml(&TomlConfig::from_file(path)?);
        }
        if self.log_json {
            config.log_json = true;
        }

        match &self.command {
            Command::Serve(args) => {
                args.data.apply(&mut config);
                if let Some(host) = &args.host {
                    config.host = host.clone();
                }
                if let Some(port) = args.port {
                    config.port = port;
                }
                config.monitor |= args.monitor;
            }
            Command::Export(args) => {
                args.data.apply(&mut config);
                config.monitor |= args.monitor;
            }
            Command::Summary(args) => args.apply(&mut config),
            Command::Probe(args) => {
                if let Some(attempts) = args.attempts {
                    config.probe_attempts = attempts;
                }
                if let Some(interval) = args.interval_ms {
                    config.probe_interval_ms = interval;
                }
            }
        }

        Ok(config)
    }
}
