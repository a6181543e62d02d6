//! Fault log command handler.

use tabled::Tabled;

use growatt_core::{FaultLog, FaultLogQuery};

use crate::cli::{FaultsArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::{Gateway, settle};

#[derive(Tabled)]
struct FaultRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Device")]
    device: String,
    #[tabled(rename = "Event")]
    event: String,
    #[tabled(rename = "Description")]
    name: String,
    #[tabled(rename = "Solution")]
    solution: String,
}

impl From<&FaultLog> for FaultRow {
    fn from(f: &FaultLog) -> Self {
        Self {
            time: output::text(f.time.as_deref()),
            device: output::text(f.device_sn.as_deref()),
            event: output::text(f.event_id.as_deref()),
            name: output::text(f.event_name.as_deref()),
            solution: output::text(f.event_solution.as_deref()),
        }
    }
}

pub async fn handle(
    gateway: &Gateway,
    args: FaultsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let query = FaultLogQuery {
        device_sn: args.device_sn,
        date: args.date,
        kind: args.kind,
        page: args.page,
        ..FaultLogQuery::new(args.plant_id)
    };
    let Some(logs) = settle(gateway.fault_logs(&query).await, global)? else {
        return Ok(());
    };
    let out = output::render_list(&global.output, &logs, |f| FaultRow::from(f), |f| {
        output::text(f.event_id.as_deref())
    });
    output::print_output(&out, global.quiet);
    Ok(())
}
