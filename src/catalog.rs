//! The fixed set of readings exposed by the heat pump.

use crate::decode::{DecodeShape, StatusTable};
use serde::Serialize;

/// Integer code identifying one readable value on the device API.
pub type Register = u16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    Temperature,
    Power,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StateClass {
    Measurement,
}

pub const CELSIUS: &str = "°C";
pub const WATT: &str = "W";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReadingSpec {
    /// Key in the state store and in state topics.
    pub key: &'static str,
    pub unique_id: &'static str,
    pub name: &'static str,
    pub icon: Option<&'static str>,
    pub register: Register,
    pub shape: DecodeShape,
    pub unit: Option<&'static str>,
    pub device_class: Option<DeviceClass>,
    pub state_class: Option<StateClass>,
}

impl ReadingSpec {
    const fn temperature(
        key: &'static str,
        unique_id: &'static str,
        name: &'static str,
        icon: Option<&'static str>,
        register: Register,
        shape: DecodeShape,
    ) -> Self {
        Self {
            key,
            unique_id,
            name,
            icon,
            register,
            shape,
            unit: Some(CELSIUS),
            device_class: Some(DeviceClass::Temperature),
            state_class: Some(StateClass::Measurement),
        }
    }

    const fn status(
        key: &'static str,
        unique_id: &'static str,
        name: &'static str,
        icon: &'static str,
        register: Register,
        table: StatusTable,
    ) -> Self {
        Self {
            key,
            unique_id,
            name,
            icon: Some(icon),
            register,
            shape: DecodeShape::Status(table),
            unit: None,
            device_class: None,
            state_class: None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        !matches!(self.shape, DecodeShape::Status(_))
    }
}

pub const CATALOG: &[ReadingSpec] = &[
    ReadingSpec::temperature(
        "storage_water_temp",
        "remko_requested_watertank_temperature",
        "Remko Requested Watertank Temperature",
        Some("mdi:thermometer-water"),
        1082,
        DecodeShape::Tenths,
    ),
    ReadingSpec {
        key: "current_power",
        unique_id: "remko_power_consumption",
        name: "Remko Power Consumption",
        icon: Some("mdi:lightning-bolt"),
        register: 5320,
        shape: DecodeShape::Hectowatts,
        unit: Some(WATT),
        device_class: Some(DeviceClass::Power),
        state_class: Some(StateClass::Measurement),
    },
    ReadingSpec::temperature(
        "current_water_temp",
        "remko_current_watertank_temperature",
        "Remko Current Watertank Temperature",
        Some("mdi:thermometer-water"),
        5039,
        DecodeShape::Tenths,
    ),
    ReadingSpec::temperature(
        "current_outside_temp",
        "remko_current_outside_temperature",
        "Remko Current Outside Temperature",
        None,
        5055,
        DecodeShape::SignedTenths,
    ),
    ReadingSpec::temperature(
        "current_heating_circuit_temp",
        "remko_current_heating_circuit_temperature",
        "Remko Current Heating Circuit Temperature",
        Some("mdi:thermometer-check"),
        5034,
        DecodeShape::Tenths,
    ),
    ReadingSpec::status(
        "current_operating_status",
        "remko_current_operating_status",
        "Remko Current Operating Status",
        "mdi:run",
        5001,
        StatusTable::Operating,
    ),
    ReadingSpec::temperature(
        "current_heating_water_temp",
        "remko_current_heating_water_temperature",
        "Remko Current Heating Water Temperature",
        Some("mdi:thermometer-check"),
        5190,
        DecodeShape::Tenths,
    ),
    ReadingSpec::status(
        "current_status_heating",
        "remko_current_status_heating",
        "Remko Current Status Heating",
        "mdi:heat-pump-outline",
        1088,
        StatusTable::Heating,
    ),
    ReadingSpec::status(
        "current_status_hot_water",
        "remko_current_status_hot_water",
        "Remko Current Status Hot Water",
        "mdi:water",
        1079,
        StatusTable::HotWater,
    ),
];

pub fn find(key: &str) -> Option<&'static ReadingSpec> {
    CATALOG.iter().find(|s| s.key == key)
}
