use crate::catalog::ReadingSpec;
use crate::client::RegisterSource;
use crate::decode::{decode, DecodeError};
use crate::state::{Reading, StateStore, Unavailable};
use chrono::Utc;
use tracing::{debug, error};

/// Refresh one reading: query its register, decode it and store the result in its slot.
///
/// Failures never escape; they become `Reading::Unavailable` with the reason attached.
pub async fn update<S>(spec: &'static ReadingSpec, source: &S, state: &mut StateStore) -> Reading
where
    S: RegisterSource + ?Sized,
{
    let reading = match source.query(spec.register).await {
        Ok(raw) => interpret(spec, raw.as_deref()),
        Err(e) => {
            error!(
                key = %spec.key,
                register = spec.register,
                error = %e,
                "failed to query heat pump"
            );
            Reading::Unavailable(Unavailable::Transport(e.to_string()))
        }
    };

    state.set(spec.key, reading.clone(), Utc::now());
    reading
}

/// Decode a raw value for `spec`, logging anything that is not a clean value.
pub fn interpret(spec: &ReadingSpec, raw: Option<&str>) -> Reading {
    match decode(spec.shape, raw) {
        Ok(value) => {
            debug!(key = %spec.key, raw = ?raw, value = %value, "decoded reading");
            Reading::Value(value)
        }
        Err(DecodeError::Empty) => {
            debug!(key = %spec.key, register = spec.register, "no value reported");
            Reading::Unavailable(Unavailable::NoData)
        }
        Err(e) => {
            error!(
                key = %spec.key,
                register = spec.register,
                raw = ?raw,
                error = %e,
                "failed to decode reading"
            );
            Reading::Unavailable(Unavailable::Decode(e.to_string()))
        }
    }
}
