//! Weather command handler.

use growatt_core::Weather;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::{Gateway, settle};

fn detail(w: &Weather) -> String {
    output::detail_lines(&[
        ("City", output::text(w.city.as_deref())),
        ("Condition", output::text(w.condition.as_deref())),
        ("Temperature", output::reading(w.temperature, "°C")),
        ("Humidity", output::reading(w.humidity, "%")),
        ("Wind", wind(w)),
        ("Sunrise", output::text(w.sunrise.as_deref())),
        ("Sunset", output::text(w.sunset.as_deref())),
        ("Updated", output::text(w.update_time.as_deref())),
    ])
}

fn wind(w: &Weather) -> String {
    let speed = output::reading(w.wind_speed, "km/h");
    match w.wind_direction.as_deref() {
        Some(dir) if !speed.is_empty() => format!("{speed} {dir}"),
        Some(dir) => dir.to_owned(),
        None => speed,
    }
}

pub async fn handle(gateway: &Gateway, plant_id: &str, global: &GlobalOpts) -> Result<(), CliError> {
    let Some(weather) = settle(gateway.weather(plant_id).await, global)? else {
        return Ok(());
    };
    let out = output::render_single(&global.output, &weather, detail, |w| {
        output::text(w.condition.as_deref())
    });
    output::print_output(&out, global.quiet);
    Ok(())
}
