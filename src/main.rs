use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, Level};
use tracing_subscriber::EnvFilter;

use ggg::config::Settings;
use ggg::{run, Input, Output, RunOptions};

#[derive(Parser, Debug)]
#[command(name = "ggg", version)]
#[command(about = "Forward a Ganglia metric snapshot to Graphite")]
struct Args {
    /// gmond/gmetad XML endpoint (host:port)
    #[arg(long, conflicts_with = "file")]
    ganglia_addr: Option<String>,

    /// Carbon plaintext endpoint (host:port)
    #[arg(long, conflicts_with = "stdout")]
    carbon_addr: Option<String>,

    /// Prefix for every key, including its trailing separator (e.g. "ggg.")
    #[arg(long)]
    prefix: Option<String>,

    /// Read the snapshot from a saved XML document instead of connecting
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Write lines to standard output instead of connecting to carbon
    #[arg(long)]
    stdout: bool,

    /// Export the parsed snapshot to a JSON file and exit without forwarding
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Settings file (format chosen by extension)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log per-cluster and per-host progress
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    fn log_level(&self) -> Level {
        if self.verbose {
            Level::DEBUG
        } else if self.quiet {
            Level::WARN
        } else {
            Level::INFO
        }
    }

    /// Apply command-line overrides on top of the loaded settings.
    fn into_options(self, mut settings: Settings) -> RunOptions {
        if let Some(addr) = self.ganglia_addr {
            settings.ganglia_addr = addr;
        }
        if let Some(addr) = self.carbon_addr {
            settings.carbon_addr = addr;
        }
        if let Some(prefix) = self.prefix {
            settings.prefix = prefix;
        }

        let input = match self.file {
            Some(path) => Input::File(path),
            None => Input::Tcp(settings.ganglia_addr),
        };
        let output = if self.stdout {
            Output::Stdout
        } else {
            Output::Tcp(settings.carbon_addr)
        };

        RunOptions {
            input,
            output,
            prefix: settings.prefix,
            export: self.export,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so the stdout sink stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(args.log_level().into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    let settings = Settings::load(args.config.as_deref()).context("failed to load settings")?;
    let options = args.into_options(settings);

    let rt = tokio::runtime::Runtime::new()?;
    if let Err(e) = rt.block_on(run(options)) {
        error!("{e}");
        return Err(e.into());
    }
    Ok(())
}
