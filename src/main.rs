use anyhow::Context;
use backtrace::Backtrace;
use clap::Parser;
use cmdhub_core::config::HubConfig;
use cmdhub_core::host::Host;
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Hub config file, created with defaults when missing
    #[arg(short, long, default_value = "Hub.toml")]
    config: PathBuf,

    /// Overrides `data_dir` from the config file
    #[arg(long)]
    data_dir: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Setup logging
    let logfile = tracing_appender::rolling::daily("./logs", "cmdhub.log");
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .with_env_var("CMDHUB_LOG")
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_writer(logfile.and(std::io::stderr))
        .with_env_filter(env_filter)
        .init();

    std::panic::set_hook(Box::new(|panic_info| {
        let backtrace = Backtrace::new();
        error!("{}\n{:?}", panic_info, backtrace);
    }));

    let mut config = HubConfig::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    if let Some(data_dir) = args.data_dir {
        config.data_dir = data_dir;
    }

    let host = Host::with_defaults(config).context("registering built-in commands")?;
    host.run()?;
    Ok(())
}
