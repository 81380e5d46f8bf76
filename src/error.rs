use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("device responded with HTTP {0}")]
    Status(u16),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unexpected value for register {register}: {value}")]
    Malformed { register: u16, value: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("MQTT error: {0}")]
    Mqtt(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<rumqttc::ClientError> for AppError {
    fn from(e: rumqttc::ClientError) -> Self {
        AppError::Mqtt(e.to_string())
    }
}
