use crate::catalog::ReadingSpec;
use crate::error::AppError;
use crate::state::Reading;
use async_trait::async_trait;
use tracing::info;

/// Where decoded readings are handed to the home-automation side.
#[async_trait]
pub trait ReadingSink: Send + Sync {
    /// Called once before the first poll.
    async fn announce(&self, catalog: &[ReadingSpec]) -> Result<(), AppError>;

    async fn publish(&self, spec: &ReadingSpec, reading: &Reading) -> Result<(), AppError>;
}

/// Writes readings to the log only.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

#[async_trait]
impl ReadingSink for LogSink {
    async fn announce(&self, catalog: &[ReadingSpec]) -> Result<(), AppError> {
        info!(readings = catalog.len(), "no MQTT configured; readings are logged only");
        Ok(())
    }

    async fn publish(&self, spec: &ReadingSpec, reading: &Reading) -> Result<(), AppError> {
        match reading {
            Reading::Value(v) => info!(
                key = %spec.key,
                value = %v,
                unit = spec.unit.unwrap_or(""),
                "{}",
                spec.name
            ),
            Reading::Unavailable(why) => info!(
                key = %spec.key,
                reason = %why,
                "{} unavailable",
                spec.name
            ),
        }
        Ok(())
    }
}
