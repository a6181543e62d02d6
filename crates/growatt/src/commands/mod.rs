//! Command dispatch: bridges CLI args -> gateway calls -> output formatting.

pub mod config_cmd;
pub mod devices;
pub mod faults;
pub mod plants;
pub mod serve;
pub mod session;
pub mod weather;

use growatt_core::{GatewayResult, GrowattClient, Outcome, SessionGateway};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;
use crate::output;

pub type Gateway = SessionGateway<GrowattClient>;

/// Dispatch a gateway-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    gateway: &Gateway,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Login => session::login(gateway, global).await,
        Command::Status => session::status(gateway, global).await,
        Command::Plants => plants::list(gateway, global).await,
        Command::Plant { id } => plants::show(gateway, &id, global).await,
        Command::Devices(args) => devices::handle(gateway, args, global).await,
        Command::Weather { plant_id } => weather::handle(gateway, &plant_id, global).await,
        Command::Faults(args) => faults::handle(gateway, args, global).await,
        // Serve, Config and Completions are handled before dispatch
        Command::Serve(_) | Command::Config(_) | Command::Completions(_) => {
            unreachable!("handled in main")
        }
    }
}

/// Unwrap a gateway result for rendering. "No data" is reported on
/// stderr and yields `None`; failures become `CliError`.
pub fn settle<T>(result: GatewayResult<T>, global: &GlobalOpts) -> Result<Option<T>, CliError> {
    match result? {
        Outcome::Data(data) => Ok(Some(data)),
        Outcome::NoData { message } => {
            output::print_status(&message, global.quiet);
            Ok(None)
        }
    }
}
