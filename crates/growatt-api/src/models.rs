// Growatt API response types
//
// Every response is wrapped in the `{"back": {...}}` envelope. The server
// is loose about value types: ids and readings arrive as numbers on some
// accounts and as strings on others, so the lenient deserializers below
// accept both.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

// ── Response Envelope ────────────────────────────────────────────────

/// Standard Growatt response envelope.
///
/// ```json
/// { "back": { "success": true, "msg": "optional", "data": ... } }
/// ```
#[derive(Debug, Deserialize)]
pub struct Envelope {
    pub back: Back,
}

/// Body of the envelope. `data` is kept untyped until the caller
/// decides which model it should hold.
#[derive(Debug, Deserialize)]
pub struct Back {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(default)]
    pub user: Option<LoginUser>,
}

impl Back {
    /// Best human-readable message carried by a failed envelope.
    pub fn message(&self) -> String {
        self.error
            .clone()
            .or_else(|| self.msg.clone())
            .unwrap_or_else(|| "request rejected".into())
    }
}

/// The user record returned by a successful login.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginUser {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default, rename = "accountName")]
    pub account_name: Option<String>,
}

// ── Plant ────────────────────────────────────────────────────────────

/// A PV plant (station) registered to the account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plant {
    #[serde(deserialize_with = "id_string")]
    pub plant_id: String,
    #[serde(default)]
    pub plant_name: Option<String>,
    /// Nominal peak power (kWp).
    #[serde(default, deserialize_with = "lenient_f64")]
    pub nominal_power: Option<f64>,
    /// Current output (W).
    #[serde(default, deserialize_with = "lenient_f64")]
    pub current_power: Option<f64>,
    /// Energy produced today (kWh).
    #[serde(default, deserialize_with = "lenient_f64")]
    pub today_energy: Option<f64>,
    /// Lifetime energy (kWh).
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_energy: Option<f64>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
}

// ── Device ───────────────────────────────────────────────────────────

/// An inverter, datalogger, or storage unit attached to a plant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub device_sn: String,
    #[serde(default)]
    pub device_type: Option<String>,
    // The server misspells this key.
    #[serde(default, alias = "deviceAilas")]
    pub device_alias: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub device_status: Option<String>,
    #[serde(default)]
    pub datalog_sn: Option<String>,
    /// Current output (W).
    #[serde(default, deserialize_with = "lenient_f64")]
    pub power: Option<f64>,
    /// Energy produced today (kWh).
    #[serde(default, deserialize_with = "lenient_f64")]
    pub e_today: Option<f64>,
    /// Lifetime energy (kWh).
    #[serde(default, deserialize_with = "lenient_f64")]
    pub e_total: Option<f64>,
    #[serde(default)]
    pub last_update_time: Option<String>,
}

// ── Weather ──────────────────────────────────────────────────────────

/// Local weather at the plant location, as reported by the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Weather {
    #[serde(default)]
    pub city: Option<String>,
    /// Temperature (°C).
    #[serde(default, alias = "tmp", deserialize_with = "lenient_f64")]
    pub temperature: Option<f64>,
    #[serde(default, alias = "cond_txt")]
    pub condition: Option<String>,
    /// Relative humidity (%).
    #[serde(default, alias = "hum", deserialize_with = "lenient_f64")]
    pub humidity: Option<f64>,
    #[serde(default, alias = "wind_dir")]
    pub wind_direction: Option<String>,
    /// Wind speed (km/h).
    #[serde(default, alias = "wind_spd", deserialize_with = "lenient_f64")]
    pub wind_speed: Option<f64>,
    #[serde(default, alias = "sr")]
    pub sunrise: Option<String>,
    #[serde(default, alias = "ss")]
    pub sunset: Option<String>,
    #[serde(default)]
    pub update_time: Option<String>,
}

// ── Fault log ────────────────────────────────────────────────────────

/// A fault or warning event recorded for a device.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaultLog {
    #[serde(default)]
    pub device_sn: Option<String>,
    #[serde(default)]
    pub device_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub event_id: Option<String>,
    #[serde(default)]
    pub event_name: Option<String>,
    #[serde(default)]
    pub event_solution: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub plant_name: Option<String>,
}

// ── Query parameters ─────────────────────────────────────────────────

/// Parameters for the device list of a plant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceQuery {
    pub plant_id: String,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl DeviceQuery {
    pub fn new(plant_id: impl Into<String>) -> Self {
        Self {
            plant_id: plant_id.into(),
            page: None,
            page_size: None,
        }
    }

    /// Whether any parameter beyond the plant id is set.
    pub fn has_optional(&self) -> bool {
        self.page.is_some() || self.page_size.is_some()
    }

    /// The same query reduced to its required parameters.
    pub fn minimal(&self) -> Self {
        Self::new(self.plant_id.clone())
    }

    pub(crate) fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("op", "getAllDeviceList".to_owned()),
            ("plantId", self.plant_id.clone()),
        ];
        if let Some(page) = self.page {
            pairs.push(("pageNum", page.to_string()));
        }
        if let Some(size) = self.page_size {
            pairs.push(("pageSize", size.to_string()));
        }
        pairs
    }
}

/// Parameters for the fault log of a plant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaultLogQuery {
    pub plant_id: String,
    pub device_sn: Option<String>,
    pub date: Option<NaiveDate>,
    /// Vendor event class filter (1 = fault, 2 = warning, 3 = info).
    pub kind: Option<u8>,
    pub page: Option<u32>,
}

impl FaultLogQuery {
    pub fn new(plant_id: impl Into<String>) -> Self {
        Self {
            plant_id: plant_id.into(),
            device_sn: None,
            date: None,
            kind: None,
            page: None,
        }
    }

    pub fn has_optional(&self) -> bool {
        self.device_sn.is_some() || self.date.is_some() || self.kind.is_some() || self.page.is_some()
    }

    pub fn minimal(&self) -> Self {
        Self::new(self.plant_id.clone())
    }

    pub(crate) fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("plantId", self.plant_id.clone())];
        if let Some(ref sn) = self.device_sn {
            pairs.push(("deviceSn", sn.clone()));
        }
        if let Some(date) = self.date {
            pairs.push(("date", date.format("%Y-%m-%d").to_string()));
        }
        if let Some(kind) = self.kind {
            pairs.push(("type", kind.to_string()));
        }
        if let Some(page) = self.page {
            pairs.push(("pageNum", page.to_string()));
        }
        pairs
    }
}

// ── Lenient deserializers ────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Self::Str(s) => s,
            Self::Int(n) => n.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Bool(b) => b.to_string(),
        }
    }
}

fn id_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Scalar::deserialize(deserializer).map(Scalar::into_string)
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(Scalar::into_string))
}

/// Accepts `1.5`, `"1.5"`, `"1.5 kW"`, `""` and `null`.
fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
    let value = match Option::<Scalar>::deserialize(deserializer)? {
        None | Some(Scalar::Bool(_)) => None,
        Some(Scalar::Int(n)) => Some(n as f64),
        Some(Scalar::Float(f)) => Some(f),
        Some(Scalar::Str(s)) => s
            .split_whitespace()
            .next()
            .and_then(|number| number.parse::<f64>().ok()),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use serde_json::json;

    #[test]
    fn plant_accepts_numeric_and_string_ids() {
        let a: Plant = serde_json::from_value(json!({ "plantId": 1234 })).unwrap();
        let b: Plant = serde_json::from_value(json!({ "plantId": "1234" })).unwrap();
        assert_eq!(a.plant_id, "1234");
        assert_eq!(b.plant_id, "1234");
    }

    #[test]
    fn readings_parse_from_unit_strings() {
        let plant: Plant = serde_json::from_value(json!({
            "plantId": "1",
            "currentPower": "1.25 kW",
            "todayEnergy": 7,
            "totalEnergy": ""
        }))
        .unwrap();
        assert_eq!(plant.current_power, Some(1.25));
        assert_eq!(plant.today_energy, Some(7.0));
        assert_eq!(plant.total_energy, None);
    }

    #[test]
    fn device_alias_accepts_vendor_spelling() {
        let device: Device = serde_json::from_value(json!({
            "deviceSn": "ABC123",
            "deviceAilas": "Roof inverter",
            "deviceStatus": 1
        }))
        .unwrap();
        assert_eq!(device.device_alias.as_deref(), Some("Roof inverter"));
        assert_eq!(device.device_status.as_deref(), Some("1"));
    }

    #[test]
    fn fault_query_minimal_drops_optional_parameters() {
        let query = FaultLogQuery {
            device_sn: Some("ABC123".into()),
            date: NaiveDate::from_ymd_opt(2024, 6, 1),
            kind: Some(1),
            page: Some(2),
            ..FaultLogQuery::new("42")
        };
        assert!(query.has_optional());
        let minimal = query.minimal();
        assert!(!minimal.has_optional());
        assert_eq!(minimal.to_pairs(), vec![("plantId", "42".to_owned())]);
    }

    #[test]
    fn fault_query_formats_date() {
        let query = FaultLogQuery {
            date: NaiveDate::from_ymd_opt(2024, 6, 1),
            ..FaultLogQuery::new("42")
        };
        assert!(query.to_pairs().contains(&("date", "2024-06-01".to_owned())));
    }
}
