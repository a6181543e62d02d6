// ── Session state ──
//
// Tracks whether the gateway holds an upstream session and when it was
// established. Validity is purely time-based: a session older than
// `SESSION_TIMEOUT_SECS` is treated as gone even if the server would
// still accept it.

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

/// Seconds after a successful login before the session must be renewed.
pub const SESSION_TIMEOUT_SECS: i64 = 15 * 60;

fn session_timeout() -> TimeDelta {
    TimeDelta::seconds(SESSION_TIMEOUT_SECS)
}

/// Source of "now", injectable for deterministic timeout tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Mutable session bookkeeping owned by one gateway.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    authenticated: bool,
    last_login: Option<DateTime<Utc>>,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn last_login(&self) -> Option<DateTime<Utc>> {
        self.last_login
    }

    /// `false` if never logged in, or if more than the timeout has
    /// elapsed since the last login. Exactly at the timeout is still valid.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        match self.last_login {
            Some(at) if self.authenticated => now.signed_duration_since(at) <= session_timeout(),
            _ => false,
        }
    }

    pub fn record_login(&mut self, at: DateTime<Utc>) {
        self.authenticated = true;
        self.last_login = Some(at);
    }

    /// Drop the authenticated flag. `last_login` is kept for diagnostics.
    pub fn invalidate(&mut self) {
        self.authenticated = false;
    }

    /// Invalidate only if the session is still the one established at
    /// `login_at`. Returns whether it was dropped.
    pub fn invalidate_login(&mut self, login_at: Option<DateTime<Utc>>) -> bool {
        if self.last_login != login_at {
            return false;
        }
        self.invalidate();
        true
    }

    pub fn status_at(&self, now: DateTime<Utc>) -> SessionStatus {
        let valid = self.is_valid_at(now);
        let expires_at = self.last_login.map(|at| at + session_timeout());
        let seconds_remaining = expires_at
            .filter(|_| valid)
            .map(|exp| exp.signed_duration_since(now).num_seconds().max(0));
        SessionStatus {
            authenticated: valid,
            last_login: self.last_login,
            expires_at: expires_at.filter(|_| valid),
            seconds_remaining,
        }
    }
}

/// Serializable snapshot of the session for status endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionStatus {
    pub authenticated: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub seconds_remaining: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logged_in_at(at: DateTime<Utc>) -> SessionState {
        let mut state = SessionState::default();
        state.record_login(at);
        state
    }

    #[test]
    fn never_logged_in_is_invalid() {
        assert!(!SessionState::default().is_valid_at(Utc::now()));
    }

    #[test]
    fn valid_just_inside_timeout() {
        let now = Utc::now();
        let state = logged_in_at(now - TimeDelta::seconds(899));
        assert!(state.is_valid_at(now));
    }

    #[test]
    fn valid_exactly_at_timeout() {
        let now = Utc::now();
        let state = logged_in_at(now - TimeDelta::seconds(900));
        assert!(state.is_valid_at(now));
    }

    #[test]
    fn invalid_just_past_timeout() {
        let now = Utc::now();
        let state = logged_in_at(now - TimeDelta::seconds(901));
        assert!(!state.is_valid_at(now));
    }

    #[test]
    fn invalidate_keeps_last_login() {
        let now = Utc::now();
        let mut state = logged_in_at(now);
        state.invalidate();
        assert!(!state.is_valid_at(now));
        assert_eq!(state.last_login(), Some(now));
    }

    #[test]
    fn invalidate_login_ignores_newer_session() {
        let now = Utc::now();
        let stale = Some(now - TimeDelta::seconds(30));
        let mut state = logged_in_at(now);

        assert!(!state.invalidate_login(stale));
        assert!(state.is_valid_at(now));

        assert!(state.invalidate_login(Some(now)));
        assert!(!state.is_valid_at(now));
    }

    #[test]
    fn status_reports_remaining_seconds() {
        let now = Utc::now();
        let state = logged_in_at(now - TimeDelta::seconds(600));
        let status = state.status_at(now);
        assert!(status.authenticated);
        assert_eq!(status.seconds_remaining, Some(300));

        let expired = logged_in_at(now - TimeDelta::seconds(1000)).status_at(now);
        assert!(!expired.authenticated);
        assert_eq!(expired.seconds_remaining, None);
        assert_eq!(expired.expires_at, None);
    }
}
