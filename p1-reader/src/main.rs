use anyhow::{Context, Result};
use p1_core::Registry;
use p1_reader::config::{Mode, ReaderConfig};
use p1_reader::driver::{Driver, DriverOptions};
use p1_reader::sink::InfluxSink;
use p1_transport::{ReplayTransport, SerialSettings, SerialTransport};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = ReaderConfig::from_env().context("Failed to load configuration")?;
    let registry = Registry::standard();
    let sink = InfluxSink::new(&config.influx);

    match config.mode {
        Mode::Serial => {
            info!(device = %config.device, baud = config.baud_rate, "reading live P1 port");
            let settings = SerialSettings::with_timeout(
                config.device.clone(),
                config.baud_rate,
                config.read_timeout,
            );
            let transport = SerialTransport::new(settings);
            let options = DriverOptions::serial(config.read_timeout);
            Driver::new(transport, sink, registry, options)
                .run()
                .await
                .context("Pipeline terminated")?;
        }
        Mode::Replay => {
            info!(capture = %config.capture.display(), "replaying capture");
            let transport = ReplayTransport::new(&config.capture);
            Driver::new(transport, sink, registry, DriverOptions::replay())
                .run()
                .await
                .context("Replay terminated")?;
        }
    }

    Ok(())
}
