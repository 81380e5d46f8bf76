use crate::catalog::ReadingSpec;
use crate::config::MqttConfig;
use crate::discovery::{availability_topic, config_topic, sensor_discovery, state_topic};
use crate::discovery::{OFFLINE, ONLINE};
use crate::error::AppError;
use crate::sink::ReadingSink;
use crate::state::Reading;
use async_trait::async_trait;
use rumqttc::{AsyncClient, EventLoop, MqttOptions, QoS, Transport};
use std::time::Duration;
use tracing::{debug, error, info};
use uuid::Uuid;

pub fn build_options(cfg: &MqttConfig) -> Result<MqttOptions, AppError> {
    let client_id = format!("remko-input-{}", Uuid::new_v4());
    let mut opts = MqttOptions::new(client_id, &cfg.host, cfg.port);
    opts.set_keep_alive(Duration::from_secs(cfg.keep_alive_secs.unwrap_or(30)));
    opts.set_clean_session(cfg.clean_session.unwrap_or(true));
    if let (Some(u), Some(p)) = (&cfg.username, &cfg.password) {
        opts.set_credentials(u.clone(), p.clone());
    }
    match &cfg.tls {
        Some(tls) => {
            let ca = std::fs::read(&tls.ca_file)?;
            opts.set_transport(Transport::tls(ca, None, None));
        }
        None if cfg.port == 8883 => {
            opts.set_transport(Transport::tls_with_default_config());
        }
        None => {}
    }
    Ok(opts)
}

/// Drive the connection until the process exits. rumqttc reconnects on the next poll.
pub fn spawn_event_loop(mut eventloop: EventLoop) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match eventloop.poll().await {
                Ok(event) => debug!(?event, "mqtt event"),
                Err(e) => {
                    error!("MQTT event loop error: {}", e);
                    tokio::time::sleep(Duration::from_secs(1)).await;
                }
            }
        }
    })
}

/// Publishes readings as Home Assistant MQTT sensors.
pub struct MqttSink {
    client: AsyncClient,
    state_prefix: String,
    discovery_prefix: Option<String>,
}

impl MqttSink {
    pub fn new(client: AsyncClient, cfg: &MqttConfig) -> Self {
        Self {
            client,
            state_prefix: cfg.state_prefix.clone(),
            discovery_prefix: cfg.discovery_prefix.clone(),
        }
    }

    /// Connect using `cfg` and spawn the event loop.
    pub fn connect(cfg: &MqttConfig) -> Result<(Self, tokio::task::JoinHandle<()>), AppError> {
        let (client, eventloop) = AsyncClient::new(build_options(cfg)?, 50);
        info!(host = %cfg.host, port = cfg.port, "MQTT client created");
        let handle = spawn_event_loop(eventloop);
        Ok((Self::new(client, cfg), handle))
    }
}

#[async_trait]
impl ReadingSink for MqttSink {
    async fn announce(&self, catalog: &[ReadingSpec]) -> Result<(), AppError> {
        let Some(prefix) = &self.discovery_prefix else {
            info!("Home Assistant discovery disabled");
            return Ok(());
        };
        for spec in catalog {
            let payload = serde_json::to_vec(&sensor_discovery(&self.state_prefix, spec))?;
            self.client
                .try_publish(config_topic(prefix, spec), QoS::AtLeastOnce, true, payload)?;
        }
        info!(
            discovery_prefix = %prefix,
            sensors = catalog.len(),
            "published Home Assistant discovery"
        );
        Ok(())
    }

    /// Queue the reading without waiting for the broker. A full request queue is an error.
    async fn publish(&self, spec: &ReadingSpec, reading: &Reading) -> Result<(), AppError> {
        let availability = availability_topic(&self.state_prefix, spec);
        match reading {
            Reading::Value(v) => {
                self.client.try_publish(
                    state_topic(&self.state_prefix, spec),
                    QoS::AtLeastOnce,
                    false,
                    v.to_string(),
                )?;
                self.client
                    .try_publish(availability, QoS::AtLeastOnce, true, ONLINE)?;
            }
            Reading::Unavailable(_) => {
                self.client
                    .try_publish(availability, QoS::AtLeastOnce, true, OFFLINE)?;
            }
        }
        debug!(key = %spec.key, "reading published to MQTT");
        Ok(())
    }
}
