// ── Upstream seam ──
//
// The gateway talks to the vendor API through this trait so tests can
// substitute an in-memory double. `GrowattClient` is the production impl.

use std::future::Future;

use growatt_api::{
    Device, DeviceQuery, Error, FaultLog, FaultLogQuery, GrowattClient, Plant, TlsMode,
    TransportConfig, Weather,
};
use secrecy::SecretString;

use crate::config::{GatewayConfig, TlsVerification};

/// Operations the gateway needs from the vendor API client.
pub trait Upstream: Send + Sync + 'static {
    /// Whether the client believes it holds a live session.
    fn is_logged_in(&self) -> bool;

    fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> impl Future<Output = Result<(), Error>> + Send;

    fn logout(&self) -> impl Future<Output = Result<(), Error>> + Send;

    fn plants(&self) -> impl Future<Output = Result<Vec<Plant>, Error>> + Send;

    /// `Ok(None)` when the server has no record for `plant_id`.
    fn plant(&self, plant_id: &str) -> impl Future<Output = Result<Option<Plant>, Error>> + Send;

    fn devices(&self, query: &DeviceQuery)
    -> impl Future<Output = Result<Vec<Device>, Error>> + Send;

    fn weather(&self, plant_id: &str)
    -> impl Future<Output = Result<Option<Weather>, Error>> + Send;

    fn fault_logs(
        &self,
        query: &FaultLogQuery,
    ) -> impl Future<Output = Result<Vec<FaultLog>, Error>> + Send;
}

impl Upstream for GrowattClient {
    fn is_logged_in(&self) -> bool {
        GrowattClient::is_logged_in(self)
    }

    fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> impl Future<Output = Result<(), Error>> + Send {
        GrowattClient::login(self, username, password)
    }

    fn logout(&self) -> impl Future<Output = Result<(), Error>> + Send {
        GrowattClient::logout(self)
    }

    fn plants(&self) -> impl Future<Output = Result<Vec<Plant>, Error>> + Send {
        self.list_plants()
    }

    fn plant(&self, plant_id: &str) -> impl Future<Output = Result<Option<Plant>, Error>> + Send {
        self.get_plant(plant_id)
    }

    fn devices(
        &self,
        query: &DeviceQuery,
    ) -> impl Future<Output = Result<Vec<Device>, Error>> + Send {
        self.list_devices(query)
    }

    fn weather(
        &self,
        plant_id: &str,
    ) -> impl Future<Output = Result<Option<Weather>, Error>> + Send {
        self.get_weather(plant_id)
    }

    fn fault_logs(
        &self,
        query: &FaultLogQuery,
    ) -> impl Future<Output = Result<Vec<FaultLog>, Error>> + Send {
        self.list_fault_logs(query)
    }
}

/// Build the production client from gateway configuration.
pub fn build_client(config: &GatewayConfig) -> Result<GrowattClient, Error> {
    let tls = match &config.tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    };
    let transport = TransportConfig::new(tls, config.timeout);
    GrowattClient::new(config.base_url.clone(), &transport)
}
