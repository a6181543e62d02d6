// ── Read resources ──
//
// Names the read operations the gateway can dispatch generically, either
// from typed values or from a `(name, params)` pair as received by the
// web layer.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use growatt_api::{Device, DeviceQuery, FaultLog, FaultLogQuery, Plant, Weather};

use crate::error::GatewayError;

/// A read request against the upstream API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    Plants,
    PlantById { id: String },
    Devices(DeviceQuery),
    Weather { plant_id: String },
    FaultLogs(FaultLogQuery),
}

/// Payload of a successful [`Resource`] fetch.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ResourceData {
    Plants(Vec<Plant>),
    Plant(Box<Plant>),
    Devices(Vec<Device>),
    Weather(Box<Weather>),
    FaultLogs(Vec<FaultLog>),
}

impl Resource {
    /// Stable name used in logs and by [`Resource::parse`].
    pub fn name(&self) -> &'static str {
        match self {
            Self::Plants => "plants",
            Self::PlantById { .. } => "plant_by_id",
            Self::Devices(_) => "devices",
            Self::Weather { .. } => "weather",
            Self::FaultLogs(_) => "fault_logs",
        }
    }

    /// Build a resource from a name and string parameters.
    ///
    /// The plant id is read from `id` or `plant_id`. Unknown names and
    /// malformed parameters are reported as `GatewayError::Parameter`.
    pub fn parse(name: &str, params: &BTreeMap<String, String>) -> Result<Self, GatewayError> {
        match name {
            "plants" => Ok(Self::Plants),
            "plant" | "plant_by_id" => Ok(Self::PlantById {
                id: plant_id(params)?,
            }),
            "devices" => Ok(Self::Devices(DeviceQuery {
                page: number(params, "page")?,
                page_size: number(params, "page_size")?,
                ..DeviceQuery::new(plant_id(params)?)
            })),
            "weather" => Ok(Self::Weather {
                plant_id: plant_id(params)?,
            }),
            "fault_logs" | "faults" => {
                let date = params
                    .get("date")
                    .map(|raw| {
                        NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| {
                            GatewayError::Parameter {
                                message: format!("date must be YYYY-MM-DD: {e}"),
                            }
                        })
                    })
                    .transpose()?;
                Ok(Self::FaultLogs(FaultLogQuery {
                    device_sn: params.get("device_sn").cloned(),
                    date,
                    kind: number(params, "type")?,
                    page: number(params, "page")?,
                    ..FaultLogQuery::new(plant_id(params)?)
                }))
            }
            other => Err(GatewayError::Parameter {
                message: format!("unknown resource '{other}'"),
            }),
        }
    }
}

fn plant_id(params: &BTreeMap<String, String>) -> Result<String, GatewayError> {
    params
        .get("id")
        .or_else(|| params.get("plant_id"))
        .filter(|id| !id.trim().is_empty())
        .cloned()
        .ok_or_else(|| GatewayError::Parameter {
            message: "a plant id is required".into(),
        })
}

fn number<N: std::str::FromStr>(
    params: &BTreeMap<String, String>,
    key: &str,
) -> Result<Option<N>, GatewayError> {
    params
        .get(key)
        .map(|raw| {
            raw.parse::<N>().map_err(|_| GatewayError::Parameter {
                message: format!("{key} must be a non-negative number, got '{raw}'"),
            })
        })
        .transpose()
}
