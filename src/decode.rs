//! Register value decoders.
//!
//! The heat pump reports every register as a short hexadecimal string. Each catalog entry
//! names one of the shapes below; [`decode`] turns the raw string into a typed value.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("no value reported")]
    Empty,
    #[error("not a hexadecimal value: {0:?}")]
    InvalidHex(String),
    #[error("value {0:?} does not fit in 16 bits")]
    OutOfRange(String),
}

/// How a raw register string maps to a sensor value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeShape {
    /// Unsigned, scaled by 0.1 (°C).
    Tenths,
    /// 16-bit two's complement, scaled by 0.1 (°C).
    SignedTenths,
    /// Unsigned, scaled by 100 (W).
    Hectowatts,
    Status(StatusTable),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTable {
    Operating,
    Heating,
    HotWater,
}

impl StatusTable {
    pub fn name(self) -> &'static str {
        match self {
            StatusTable::Operating => "Operating Status",
            StatusTable::Heating => "Heating Status",
            StatusTable::HotWater => "Water Status",
        }
    }

    /// Looks up a code. Expects upper-case hex digits.
    pub fn label(self, code: &str) -> Option<&'static str> {
        match self {
            StatusTable::Operating => match code {
                "04" => Some("Loading DHW"),
                "0A" => Some("Standby"),
                "09" => Some("Idle"),
                "05" => Some("Storage Energy"),
                "06" => Some("Heating"),
                "07" => Some("Cooling"),
                "00" => Some("Blocked"),
                "40" => Some("Ready"),
                "0C" => Some("Frost Protection"),
                "02" => Some("Defrosting"),
                "03" => Some("Loading defrost buffer"),
                _ => None,
            },
            StatusTable::Heating => match code {
                "01" => Some("Automatic"),
                "02" => Some("Heating"),
                "03" => Some("Standby"),
                "04" => Some("Cooling"),
                _ => None,
            },
            StatusTable::HotWater => match code {
                "00" => Some("Auto Comfort"),
                "01" => Some("Auto Eco"),
                "02" => Some("Solar / PV"),
                "03" => Some("Off"),
                _ => None,
            },
        }
    }

    /// Label for `raw`, or a diagnostic naming the table and the code exactly as received.
    pub fn describe(self, raw: &str) -> String {
        let code = raw.trim().to_ascii_uppercase();
        match self.label(&code) {
            Some(label) => label.to_string(),
            None => format!("{} N/A: ({})", self.name(), raw),
        }
    }
}

/// A successfully decoded reading.
#[derive(Debug, Clone, PartialEq)]
pub enum SensorValue {
    Temperature(f64),
    Power(i64),
    Status(String),
}

impl fmt::Display for SensorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorValue::Temperature(t) => write!(f, "{t:.1}"),
            SensorValue::Power(w) => write!(f, "{w}"),
            SensorValue::Status(s) => f.write_str(s),
        }
    }
}

pub fn decode(shape: DecodeShape, raw: Option<&str>) -> Result<SensorValue, DecodeError> {
    let raw = raw.unwrap_or("");
    match shape {
        DecodeShape::Status(table) => Ok(SensorValue::Status(table.describe(raw))),
        DecodeShape::Tenths => {
            let v = parse_hex(raw)?;
            Ok(SensorValue::Temperature(v as f64 / 10.0))
        }
        DecodeShape::SignedTenths => {
            let word = parse_hex(raw)?;
            Ok(SensorValue::Temperature(word as i16 as f64 / 10.0))
        }
        DecodeShape::Hectowatts => {
            let v = parse_hex(raw)?;
            Ok(SensorValue::Power(i64::from(v) * 100))
        }
    }
}

/// Parse one 16-bit register word. Anything wider is `OutOfRange`.
fn parse_hex(raw: &str) -> Result<u16, DecodeError> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(DecodeError::Empty);
    }
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(DecodeError::InvalidHex(raw.to_string()));
    }
    u16::from_str_radix(digits, 16).map_err(|_| DecodeError::OutOfRange(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn temp(shape: DecodeShape, raw: &str) -> f64 {
        match decode(shape, Some(raw)) {
            Ok(SensorValue::Temperature(t)) => t,
            other => panic!("expected temperature, got {other:?}"),
        }
    }

    #[test]
    fn unsigned_tenths() {
        assert_eq!(temp(DecodeShape::Tenths, "01C2"), 45.0);
        assert_eq!(temp(DecodeShape::Tenths, "0000"), 0.0);
        assert_eq!(temp(DecodeShape::Tenths, "FFFF"), 6553.5);
        assert_eq!(temp(DecodeShape::Tenths, "1d7"), 47.1);
    }

    #[test]
    fn signed_tenths() {
        assert_eq!(temp(DecodeShape::SignedTenths, "0032"), 5.0);
        assert_eq!(temp(DecodeShape::SignedTenths, "FFCE"), -5.0);
        assert_eq!(temp(DecodeShape::SignedTenths, "7FFF"), 3276.7);
        assert_eq!(temp(DecodeShape::SignedTenths, "8000"), -3276.8);
        assert_eq!(temp(DecodeShape::SignedTenths, "FFF6"), -1.0);
    }

    #[test]
    fn numeric_shapes_reject_wider_than_16_bits() {
        for shape in [
            DecodeShape::Tenths,
            DecodeShape::SignedTenths,
            DecodeShape::Hectowatts,
        ] {
            assert_eq!(
                decode(shape, Some("10000")),
                Err(DecodeError::OutOfRange("10000".into()))
            );
            assert_eq!(
                decode(shape, Some("0x0001FFFF")),
                Err(DecodeError::OutOfRange("0x0001FFFF".into()))
            );
        }
    }

    #[test]
    fn leading_zeros_do_not_widen_a_word() {
        assert_eq!(temp(DecodeShape::Tenths, "000001C2"), 45.0);
    }

    #[test]
    fn hectowatts() {
        assert_eq!(
            decode(DecodeShape::Hectowatts, Some("0005")),
            Ok(SensorValue::Power(500))
        );
        assert_eq!(
            decode(DecodeShape::Hectowatts, Some("FFFF")),
            Ok(SensorValue::Power(6_553_500))
        );
    }

    #[test]
    fn numeric_shapes_reject_empty_input() {
        for shape in [
            DecodeShape::Tenths,
            DecodeShape::SignedTenths,
            DecodeShape::Hectowatts,
        ] {
            assert_eq!(decode(shape, None), Err(DecodeError::Empty));
            assert_eq!(decode(shape, Some("")), Err(DecodeError::Empty));
            assert_eq!(decode(shape, Some("  ")), Err(DecodeError::Empty));
        }
    }

    #[test]
    fn non_hex_is_an_error() {
        assert_eq!(
            decode(DecodeShape::Tenths, Some("12G4")),
            Err(DecodeError::InvalidHex("12G4".into()))
        );
        assert_eq!(
            decode(DecodeShape::Hectowatts, Some("-5")),
            Err(DecodeError::InvalidHex("-5".into()))
        );
        assert_eq!(
            decode(DecodeShape::Tenths, Some("0x")),
            Err(DecodeError::InvalidHex("0x".into()))
        );
    }

    #[test]
    fn operating_status_table() {
        let cases = [
            ("04", "Loading DHW"),
            ("0A", "Standby"),
            ("09", "Idle"),
            ("05", "Storage Energy"),
            ("06", "Heating"),
            ("07", "Cooling"),
            ("00", "Blocked"),
            ("40", "Ready"),
            ("0C", "Frost Protection"),
            ("02", "Defrosting"),
            ("03", "Loading defrost buffer"),
        ];
        for (code, label) in cases {
            assert_eq!(StatusTable::Operating.describe(code), label);
        }
    }

    #[test]
    fn heating_and_hot_water_tables() {
        for (code, label) in [
            ("01", "Automatic"),
            ("02", "Heating"),
            ("03", "Standby"),
            ("04", "Cooling"),
        ] {
            assert_eq!(StatusTable::Heating.describe(code), label);
        }
        for (code, label) in [
            ("00", "Auto Comfort"),
            ("01", "Auto Eco"),
            ("02", "Solar / PV"),
            ("03", "Off"),
        ] {
            assert_eq!(StatusTable::HotWater.describe(code), label);
        }
    }

    #[test]
    fn unknown_codes_name_table_and_code() {
        for table in [
            StatusTable::Operating,
            StatusTable::Heating,
            StatusTable::HotWater,
        ] {
            let label = table.describe("EE");
            assert!(label.contains("EE"), "{label}");
            assert!(label.contains(table.name()), "{label}");
        }
    }

    #[test]
    fn status_lookup_ignores_case_but_keeps_raw_in_diagnostic() {
        assert_eq!(StatusTable::Operating.describe("0a"), "Standby");
        assert_eq!(StatusTable::Operating.describe(" 40 "), "Ready");
        assert_eq!(
            StatusTable::Heating.describe("ee"),
            "Heating Status N/A: (ee)"
        );
    }

    #[test]
    fn empty_status_code_yields_diagnostic() {
        assert_eq!(
            decode(DecodeShape::Status(StatusTable::HotWater), None),
            Ok(SensorValue::Status("Water Status N/A: ()".into()))
        );
    }

    #[test]
    fn decoding_is_repeatable() {
        let shape = DecodeShape::SignedTenths;
        assert_eq!(decode(shape, Some("FFCE")), decode(shape, Some("FFCE")));
    }

    #[test]
    fn display_formats() {
        assert_eq!(SensorValue::Temperature(45.0).to_string(), "45.0");
        assert_eq!(SensorValue::Temperature(-1.0).to_string(), "-1.0");
        assert_eq!(SensorValue::Power(500).to_string(), "500");
        assert_eq!(SensorValue::Status("Ready".into()).to_string(), "Ready");
    }
}
