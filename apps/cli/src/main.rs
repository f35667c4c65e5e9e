use std::process::ExitCode;

use anyhow::{Context, Result};
use audit_tally_core::{
    Codec, ConsumerConfig, ConsumerLoop, DEFAULT_GROUP, DEFAULT_TOPIC, KafkaSource, LogFormat,
    ReportFormat, ShutdownSignal, init_logging, report,
};
use clap::{Parser, ValueEnum};
use tracing::{error, info};

/// CLI wrapper for LogFormat (needed for clap ValueEnum)
#[derive(Clone, Copy, Default, ValueEnum)]
enum CliLogFormat {
    #[default]
    Pretty,
    Json,
}

impl From<CliLogFormat> for LogFormat {
    fn from(cli: CliLogFormat) -> Self {
        match cli {
            CliLogFormat::Pretty => LogFormat::Pretty,
            CliLogFormat::Json => LogFormat::Json,
        }
    }
}

/// CLI wrapper for ReportFormat
#[derive(Clone, Copy, Default, ValueEnum)]
enum CliOutput {
    #[default]
    Json,
    Text,
}

impl From<CliOutput> for ReportFormat {
    fn from(cli: CliOutput) -> Self {
        match cli {
            CliOutput::Json => ReportFormat::Json,
            CliOutput::Text => ReportFormat::Text,
        }
    }
}

#[derive(Parser)]
#[command(name = "audit-tally")]
#[command(
    about = "Consume audit events from Kafka and report per-action result counts on shutdown"
)]
struct Cli {
    /// Kafka broker addresses, comma separated
    #[arg(long, env = "KAFKA_BROKERS", default_value = "")]
    kafka_brokers: String,

    /// Topic carrying audit events
    #[arg(long, env = "AUDIT_TOPIC", default_value = DEFAULT_TOPIC)]
    topic: String,

    /// Consumer group used for offset commits
    #[arg(long, env = "AUDIT_CONSUMER_GROUP", default_value = DEFAULT_GROUP)]
    group: String,

    /// Log line format
    #[arg(long, default_value = "pretty")]
    log_format: CliLogFormat,

    /// How the final tallies are emitted
    #[arg(short, long, default_value = "json")]
    output: CliOutput,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_format.into());

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = ?e, "audit-tally failed");
            ExitCode::FAILURE
        }
    }
}

/// Returns early, without error, when the configuration is unusable.
async fn run(cli: Cli) -> Result<()> {
    let config = match ConsumerConfig::from_broker_list(&cli.kafka_brokers)
        .map(|c| c.with_topic(cli.topic).with_group(cli.group))
        .and_then(|c| c.validate().map(|()| c))
    {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, kafka_brokers = %cli.kafka_brokers, "invalid configuration");
            return Ok(());
        }
    };

    let codec = Codec::new().context("failed to load audit event schema")?;
    let mut shutdown = ShutdownSignal::install().context("failed to register signal handlers")?;

    // Signals are ours from here on, so a stalled connect must still yield to them.
    let Some(mut source) = KafkaSource::connect_or_shutdown(&config, shutdown.recv())
        .await
        .with_context(|| format!("could not obtain consumer for {:?}", config.brokers))?
    else {
        return Ok(());
    };

    info!(topic = %config.topic, group = %config.group, "consuming audit events");

    let outcome = ConsumerLoop::new(codec)
        .run(&mut source, shutdown.recv())
        .await;

    report(&outcome, cli.output.into());
    source.close().await;

    Ok(())
}
