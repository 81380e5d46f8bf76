//! Home Assistant MQTT discovery payloads and topic layout.

use crate::catalog::{DeviceClass, ReadingSpec, StateClass};
use serde::Serialize;

pub const ONLINE: &str = "online";
pub const OFFLINE: &str = "offline";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HaDeviceInfo {
    pub identifiers: Vec<String>,
    pub name: String,
    pub manufacturer: String,
}

impl Default for HaDeviceInfo {
    fn default() -> Self {
        Self {
            identifiers: vec!["remko_heatpump".into()],
            name: "Remko Heat Pump".into(),
            manufacturer: "Remko".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HaSensorDiscovery {
    pub name: String,
    pub unique_id: String,
    pub object_id: String,
    pub state_topic: String,
    pub availability_topic: String,
    pub payload_available: &'static str,
    pub payload_not_available: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_of_measurement: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_class: Option<DeviceClass>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_class: Option<StateClass>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<&'static str>,
    pub device: HaDeviceInfo,
}

/// `<discovery_prefix>/sensor/<unique_id>/config`
pub fn config_topic(discovery_prefix: &str, spec: &ReadingSpec) -> String {
    format!("{}/sensor/{}/config", discovery_prefix, spec.unique_id)
}

pub fn state_topic(state_prefix: &str, spec: &ReadingSpec) -> String {
    format!("{}/{}/state", state_prefix, spec.key)
}

pub fn availability_topic(state_prefix: &str, spec: &ReadingSpec) -> String {
    format!("{}/{}/availability", state_prefix, spec.key)
}

pub fn sensor_discovery(state_prefix: &str, spec: &ReadingSpec) -> HaSensorDiscovery {
    HaSensorDiscovery {
        name: spec.name.to_string(),
        unique_id: spec.unique_id.to_string(),
        object_id: spec.unique_id.to_string(),
        state_topic: state_topic(state_prefix, spec),
        availability_topic: availability_topic(state_prefix, spec),
        payload_available: ONLINE,
        payload_not_available: OFFLINE,
        unit_of_measurement: spec.unit,
        device_class: spec.device_class,
        state_class: spec.state_class,
        icon: spec.icon,
        device: HaDeviceInfo::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::find;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn temperature_sensor_payload() {
        let spec = find("current_outside_temp").unwrap();
        let payload = serde_json::to_value(sensor_discovery("remko", spec)).unwrap();
        assert_eq!(
            payload,
            json!({
                "name": "Remko Current Outside Temperature",
                "unique_id": "remko_current_outside_temperature",
                "object_id": "remko_current_outside_temperature",
                "state_topic": "remko/current_outside_temp/state",
                "availability_topic": "remko/current_outside_temp/availability",
                "payload_available": "online",
                "payload_not_available": "offline",
                "unit_of_measurement": "°C",
                "device_class": "temperature",
                "state_class": "measurement",
                "device": {
                    "identifiers": ["remko_heatpump"],
                    "name": "Remko Heat Pump",
                    "manufacturer": "Remko"
                }
            })
        );
    }

    #[test]
    fn status_sensor_omits_unit_and_class() {
        let spec = find("current_operating_status").unwrap();
        let payload = serde_json::to_value(sensor_discovery("remko", spec)).unwrap();
        let obj = payload.as_object().unwrap();
        assert!(!obj.contains_key("unit_of_measurement"));
        assert!(!obj.contains_key("device_class"));
        assert!(!obj.contains_key("state_class"));
        assert_eq!(obj["icon"], "mdi:run");
    }

    #[test]
    fn topics() {
        let spec = find("current_power").unwrap();
        assert_eq!(
            config_topic("homeassistant", spec),
            "homeassistant/sensor/remko_power_consumption/config"
        );
        assert_eq!(state_topic("hp", spec), "hp/current_power/state");
        assert_eq!(availability_topic("hp", spec), "hp/current_power/availability");
    }
}
