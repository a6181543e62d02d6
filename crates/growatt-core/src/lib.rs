// growatt-core: Session gateway between consumers (CLI/web) and growatt-api.

pub mod config;
pub mod error;
pub mod gateway;
pub mod resource;
pub mod result;
pub mod session;
pub mod upstream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{Credentials, GatewayConfig, TlsVerification};
pub use error::{ErrorCode, GatewayError};
pub use gateway::SessionGateway;
pub use resource::{Resource, ResourceData};
pub use result::{Failure, GatewayResult, LoginStatus, LogoutStatus, Outcome, ResponseBody};
pub use session::{Clock, SESSION_TIMEOUT_SECS, SessionState, SessionStatus, SystemClock};
pub use upstream::Upstream;

// Re-export the wire models so consumers need only this crate.
pub use growatt_api::{Device, DeviceQuery, FaultLog, FaultLogQuery, GrowattClient, Plant, Weather};
