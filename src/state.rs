use crate::catalog::{ReadingSpec, CATALOG};
use crate::decode::{DecodeShape, SensorValue};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fmt;

/// Why a reading has no value this cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unavailable {
    /// Not polled since startup.
    Pending,
    /// The device answered without a value for the register.
    NoData,
    Transport(String),
    Decode(String),
}

impl fmt::Display for Unavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unavailable::Pending => f.write_str("not yet polled"),
            Unavailable::NoData => f.write_str("no data"),
            Unavailable::Transport(e) => write!(f, "transport error: {e}"),
            Unavailable::Decode(e) => write!(f, "decode error: {e}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Reading {
    Value(SensorValue),
    Unavailable(Unavailable),
}

impl Reading {
    pub fn value(&self) -> Option<&SensorValue> {
        match self {
            Reading::Value(v) => Some(v),
            Reading::Unavailable(_) => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Reading::Value(_))
    }

    /// Startup value for a slot: zero for numeric readings, pending for status labels.
    pub fn initial(shape: DecodeShape) -> Self {
        match shape {
            DecodeShape::Tenths | DecodeShape::SignedTenths => {
                Reading::Value(SensorValue::Temperature(0.0))
            }
            DecodeShape::Hectowatts => Reading::Value(SensorValue::Power(0)),
            DecodeShape::Status(_) => Reading::Unavailable(Unavailable::Pending),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    pub reading: Reading,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Latest reading per catalog key. Each update writes exactly one slot.
#[derive(Debug, Clone)]
pub struct StateStore {
    slots: BTreeMap<&'static str, Slot>,
}

impl StateStore {
    pub fn new(catalog: &[ReadingSpec]) -> Self {
        let slots = catalog
            .iter()
            .map(|spec| {
                (
                    spec.key,
                    Slot {
                        reading: Reading::initial(spec.shape),
                        updated_at: None,
                    },
                )
            })
            .collect();
        Self { slots }
    }

    pub fn get(&self, key: &str) -> Option<&Slot> {
        self.slots.get(key)
    }

    pub fn reading(&self, key: &str) -> Option<&Reading> {
        self.slots.get(key).map(|s| &s.reading)
    }

    pub fn set(&mut self, key: &'static str, reading: Reading, at: DateTime<Utc>) {
        self.slots.insert(
            key,
            Slot {
                reading,
                updated_at: Some(at),
            },
        );
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Slot)> {
        self.slots.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new(CATALOG)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_are_zero_or_pending() {
        let state = StateStore::default();
        assert_eq!(state.len(), CATALOG.len());
        assert_eq!(
            state.reading("current_power"),
            Some(&Reading::Value(SensorValue::Power(0)))
        );
        assert_eq!(
            state.reading("current_outside_temp"),
            Some(&Reading::Value(SensorValue::Temperature(0.0)))
        );
        assert_eq!(
            state.reading("current_operating_status"),
            Some(&Reading::Unavailable(Unavailable::Pending))
        );
        assert!(state.iter().all(|(_, slot)| slot.updated_at.is_none()));
    }

    #[test]
    fn set_touches_one_slot() {
        let mut state = StateStore::default();
        let now = Utc::now();
        state.set(
            "current_power",
            Reading::Unavailable(Unavailable::NoData),
            now,
        );

        let slot = state.get("current_power").unwrap();
        assert_eq!(slot.reading, Reading::Unavailable(Unavailable::NoData));
        assert_eq!(slot.updated_at, Some(now));

        let touched: Vec<_> = state
            .iter()
            .filter(|(_, s)| s.updated_at.is_some())
            .map(|(k, _)| k)
            .collect();
        assert_eq!(touched, vec!["current_power"]);
    }

    #[test]
    fn unknown_key_is_none() {
        assert!(StateStore::default().get("nope").is_none());
    }
}
