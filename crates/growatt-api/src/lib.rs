// growatt-api: Async Rust client for the Growatt monitoring server API

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

mod devices;
mod plants;
mod session;

pub use client::GrowattClient;
pub use error::Error;
pub use models::{Device, DeviceQuery, FaultLog, FaultLogQuery, Plant, Weather};
pub use transport::{TlsMode, TransportConfig};
