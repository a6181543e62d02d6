//! Session command handlers.

use chrono::SecondsFormat;
use growatt_core::SessionStatus;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::{Gateway, settle};

pub async fn login(gateway: &Gateway, global: &GlobalOpts) -> Result<(), CliError> {
    if let Some(status) = settle(gateway.login().await, global)? {
        output::print_status(status.message(), global.quiet);
    }
    Ok(())
}

pub async fn status(gateway: &Gateway, global: &GlobalOpts) -> Result<(), CliError> {
    settle(gateway.ensure_login().await, global)?;
    let snapshot = gateway.session_status();
    let out = output::render_single(&global.output, &snapshot, detail, |s| {
        s.authenticated.to_string()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}

fn detail(s: &SessionStatus) -> String {
    let stamp = |at: Option<chrono::DateTime<chrono::Utc>>| {
        at.map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
            .unwrap_or_default()
    };
    output::detail_lines(&[
        ("Authenticated", s.authenticated.to_string()),
        ("Last login", stamp(s.last_login)),
        ("Expires", stamp(s.expires_at)),
        (
            "Remaining",
            s.seconds_remaining
                .map(|secs| format!("{secs}s"))
                .unwrap_or_default(),
        ),
    ])
}
