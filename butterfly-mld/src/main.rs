use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use butterfly_mld::cli::{Cli, LogFormat};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_format);
    cli.run()
}

/// `RUST_LOG` overrides the default `info` filter
fn init_logging(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt().with_env_filter(filter).with_writer(std::io::stderr);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}
