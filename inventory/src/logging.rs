use crate::config::Config;
use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logs to the console and appends the same lines to the log file.
pub fn init(config: &Config) -> Result<()> {
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(config.log_file())
        .with_context(|| format!("Failed opening log file {}", config.log_file().display()))?;

    let filter = EnvFilter::builder()
        .with_default_directive(config.log_level().into())
        .from_env_lossy()
        .add_directive("aws_config=warn".parse()?)
        .add_directive("aws_smithy_runtime=warn".parse()?)
        .add_directive("hyper_util=warn".parse()?)
        .add_directive("kube_client=warn".parse()?);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(log_file)),
        )
        .init();

    Ok(())
}
