//! Device command handler.

use tabled::Tabled;

use growatt_core::{Device, DeviceQuery};

use crate::cli::{DevicesArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::{Gateway, settle};

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "Serial")]
    serial: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Alias")]
    alias: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Power")]
    power: String,
    #[tabled(rename = "Today")]
    today: String,
    #[tabled(rename = "Updated")]
    updated: String,
}

impl From<&Device> for DeviceRow {
    fn from(d: &Device) -> Self {
        Self {
            serial: d.device_sn.clone(),
            kind: output::text(d.device_type.as_deref()),
            alias: output::text(d.device_alias.as_deref()),
            status: output::text(d.device_status.as_deref()),
            power: output::reading(d.power, "W"),
            today: output::reading(d.e_today, "kWh"),
            updated: output::text(d.last_update_time.as_deref()),
        }
    }
}

pub async fn handle(
    gateway: &Gateway,
    args: DevicesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let query = DeviceQuery {
        page: args.page,
        page_size: args.page_size,
        ..DeviceQuery::new(args.plant_id)
    };
    let Some(devices) = settle(gateway.devices(&query).await, global)? else {
        return Ok(());
    };
    let out = output::render_list(&global.output, &devices, |d| DeviceRow::from(d), |d| {
        d.device_sn.clone()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}
