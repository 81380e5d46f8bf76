use remko_input::catalog::CATALOG;
use remko_input::client::DeviceClient;
use remko_input::config::Config;
use remko_input::mqtt::MqttSink;
use remko_input::poller::Poller;
use remko_input::sink::LogSink;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    let cfg_path =
        std::env::var("APP_CONFIG").unwrap_or_else(|_| "config/config.example.yaml".into());
    let cfg = Config::load(&cfg_path)?;

    let client = DeviceClient::new(&cfg.device)?;
    info!(endpoint = %client.endpoint(), "loaded config; polling heat pump");

    let interval = Duration::from_secs(cfg.poll.interval_secs);
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    };

    match &cfg.mqtt {
        Some(mqtt_cfg) => {
            let (sink, _eventloop) = MqttSink::connect(mqtt_cfg)?;
            Poller::new(client, sink, CATALOG, interval)
                .run(shutdown)
                .await;
        }
        None => {
            Poller::new(client, LogSink, CATALOG, interval)
                .run(shutdown)
                .await;
        }
    }

    Ok(())
}
