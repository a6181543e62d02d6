//! CLI flag overrides on top of `growatt_config`.
//!
//! Core never sees these types -- it receives a pre-built `GatewayConfig`.

use growatt_config::Config;
use growatt_core::GatewayConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Load file + env config and apply `--base-url`, `--username`,
/// `--timeout` and `--insecure`.
pub fn load_with_overrides(global: &GlobalOpts) -> Result<Config, CliError> {
    let mut cfg = growatt_config::load_config()?;

    if let Some(ref url) = global.base_url {
        cfg.server.base_url.clone_from(url);
    }
    if let Some(ref username) = global.username {
        cfg.account.username = Some(username.clone());
    }
    if let Some(timeout) = global.timeout {
        cfg.server.timeout = timeout;
    }
    if global.insecure {
        cfg.server.insecure = true;
    }

    Ok(cfg)
}

/// Build a `GatewayConfig` from an already-overridden config.
pub fn gateway_config(cfg: &Config) -> Result<GatewayConfig, CliError> {
    Ok(growatt_config::to_gateway_config(cfg)?)
}
