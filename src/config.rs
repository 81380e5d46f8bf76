use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub device: DeviceConfig,
    #[serde(default)]
    pub poll: PollConfig,
    /// Without an MQTT section readings are only written to the log.
    #[serde(default)]
    pub mqtt: Option<MqttConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Host name, IP or full base URL ("http://192.168.1.50") of the heat pump.
    pub host: String,
    #[serde(default = "default_smt_id")]
    pub smt_id: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_smt_id() -> String {
    "0000000000000000".into()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            smt_id: default_smt_id(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

fn default_interval_secs() -> u64 {
    30
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MqttConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub keep_alive_secs: Option<u64>,
    pub clean_session: Option<bool>,
    /// Readings go to `<state_prefix>/<key>/state`.
    #[serde(default = "default_state_prefix")]
    pub state_prefix: String,
    #[serde(default = "default_discovery_prefix")]
    pub discovery_prefix: Option<String>,
    pub tls: Option<TlsConfig>,
}

fn default_state_prefix() -> String {
    "remko".into()
}

fn default_discovery_prefix() -> Option<String> {
    Some("homeassistant".into())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TlsConfig {
    /// Path to a PEM CA bundle
    pub ca_file: String,
}

impl Config {
    /// Load YAML from disk, substitute $(VAR)/${VAR} with env vars, then parse.
    /// If REMKO_HOST is set it replaces `device.host`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, anyhow::Error> {
        let raw = fs::read_to_string(path)?;
        let mut cfg = Self::parse(&raw)?;

        if let Ok(host) = std::env::var("REMKO_HOST") {
            cfg.device.host = host;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn parse(raw: &str) -> Result<Self, anyhow::Error> {
        let expanded = expand_env_placeholders(raw)?;
        Ok(serde_yaml::from_str(&expanded)?)
    }

    fn validate(&self) -> Result<(), anyhow::Error> {
        anyhow::ensure!(
            !self.device.host.trim().is_empty(),
            "device.host must be set (or REMKO_HOST)"
        );
        anyhow::ensure!(
            self.poll.interval_secs > 0,
            "poll.interval_secs must be greater than 0"
        );
        anyhow::ensure!(
            self.device.timeout_secs > 0,
            "device.timeout_secs must be greater than 0"
        );
        Ok(())
    }
}

/// Expand $(VAR) and ${VAR} from the environment. "$$" is a literal "$";
/// any other "$" is kept as-is.
fn expand_env_placeholders(input: &str) -> Result<String, anyhow::Error> {
    use anyhow::Context;

    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }
        let close = match chars.peek() {
            Some('$') => {
                chars.next();
                out.push('$');
                continue;
            }
            Some('(') => ')',
            Some('{') => '}',
            _ => {
                out.push('$');
                continue;
            }
        };
        chars.next();

        let mut name = String::new();
        let mut closed = false;
        for ch in chars.by_ref() {
            if ch == close {
                closed = true;
                break;
            }
            name.push(ch);
        }
        anyhow::ensure!(closed, "unterminated env placeholder: missing '{}'", close);

        let val = std::env::var(&name)
            .with_context(|| format!("missing environment variable: {}", name))?;
        out.push_str(&val);
    }

    Ok(out)
}
