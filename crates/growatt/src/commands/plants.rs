//! Plant command handlers.

use tabled::Tabled;

use growatt_core::Plant;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::{Gateway, settle};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct PlantRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Power")]
    power: String,
    #[tabled(rename = "Today")]
    today: String,
    #[tabled(rename = "Total")]
    total: String,
}

impl From<&Plant> for PlantRow {
    fn from(p: &Plant) -> Self {
        Self {
            id: p.plant_id.clone(),
            name: output::text(p.plant_name.as_deref()),
            power: output::reading(p.current_power, "W"),
            today: output::reading(p.today_energy, "kWh"),
            total: output::reading(p.total_energy, "kWh"),
        }
    }
}

fn detail(p: &Plant) -> String {
    output::detail_lines(&[
        ("ID", p.plant_id.clone()),
        ("Name", output::text(p.plant_name.as_deref())),
        ("Nominal power", output::reading(p.nominal_power, "kWp")),
        ("Current power", output::reading(p.current_power, "W")),
        ("Today", output::reading(p.today_energy, "kWh")),
        ("Total", output::reading(p.total_energy, "kWh")),
        ("City", output::text(p.city.as_deref())),
        ("Country", output::text(p.country.as_deref())),
        ("Timezone", output::text(p.timezone.as_deref())),
    ])
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn list(gateway: &Gateway, global: &GlobalOpts) -> Result<(), CliError> {
    let Some(plants) = settle(gateway.plants().await, global)? else {
        return Ok(());
    };
    let out = output::render_list(&global.output, &plants, |p| PlantRow::from(p), |p| {
        p.plant_id.clone()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn show(gateway: &Gateway, id: &str, global: &GlobalOpts) -> Result<(), CliError> {
    let Some(plant) = settle(gateway.plant(id).await, global)? else {
        return Ok(());
    };
    let out = output::render_single(&global.output, &plant, detail, |p| p.plant_id.clone());
    output::print_output(&out, global.quiet);
    Ok(())
}
