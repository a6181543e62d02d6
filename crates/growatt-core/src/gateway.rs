// ── Session gateway ──
//
// Sits between request handlers and the upstream client. Owns the one
// upstream session, renews it when it is older than the timeout, and
// turns every upstream failure into a `Failure` value at a single
// boundary (`settle`). Nothing raised by the upstream crosses this type.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use growatt_api::{Device, DeviceQuery, FaultLog, FaultLogQuery, GrowattClient, Plant, Weather};

use crate::config::{Credentials, GatewayConfig};
use crate::error::GatewayError;
use crate::resource::{Resource, ResourceData};
use crate::result::{Failure, GatewayResult, LoginStatus, LogoutStatus, Outcome};
use crate::session::{Clock, SessionState, SessionStatus, SystemClock};
use crate::upstream::{self, Upstream};

/// Handle to the shared upstream session.
///
/// Cheaply cloneable via `Arc<GatewayInner>`; clones share the session.
pub struct SessionGateway<C> {
    inner: Arc<GatewayInner<C>>,
}

struct GatewayInner<C> {
    client: C,
    credentials: Credentials,
    clock: Arc<dyn Clock>,
    state: RwLock<SessionState>,
    /// Serializes check-then-login so concurrent callers share one login.
    login_lock: Mutex<()>,
}

impl<C> Clone for SessionGateway<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl SessionGateway<GrowattClient> {
    /// Build a gateway backed by the real HTTP client.
    pub fn from_config(config: GatewayConfig) -> Result<Self, GatewayError> {
        let client = upstream::build_client(&config).map_err(GatewayError::from)?;
        Ok(Self::new(client, config.credentials))
    }
}

impl<C: Upstream> SessionGateway<C> {
    pub fn new(client: C, credentials: Credentials) -> Self {
        Self::with_clock(client, credentials, Arc::new(SystemClock))
    }

    pub fn with_clock(client: C, credentials: Credentials, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Arc::new(GatewayInner {
                client,
                credentials,
                clock,
                state: RwLock::new(SessionState::default()),
                login_lock: Mutex::new(()),
            }),
        }
    }

    /// The wrapped upstream client.
    pub fn client(&self) -> &C {
        &self.inner.client
    }

    // ── Session state ────────────────────────────────────────────

    /// `false` if never logged in or if the last login is older than the
    /// session timeout. No side effects.
    pub fn is_session_valid(&self) -> bool {
        self.read_state().is_valid_at(self.inner.clock.now())
    }

    pub fn session_status(&self) -> SessionStatus {
        self.read_state().status_at(self.inner.clock.now())
    }

    fn read_state(&self) -> SessionState {
        self.inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.inner
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn invalidate(&self) {
        self.write_state().invalidate();
    }

    // ── Authentication ───────────────────────────────────────────

    /// Log in unless the current session is still valid.
    ///
    /// A session past its timeout is dropped and replaced. Only a fresh
    /// login moves the timestamp; reusing a session does not extend it.
    pub async fn ensure_login(&self) -> GatewayResult<LoginStatus> {
        let _guard = self.inner.login_lock.lock().await;

        if self.is_session_valid() {
            debug!("reusing existing session");
            return Ok(Outcome::Data(LoginStatus::SessionReused));
        }

        if self.read_state().is_authenticated() {
            info!("session timed out, logging in again");
            self.invalidate();
        }

        self.login_locked(&self.inner.credentials).await
    }

    /// Force a fresh login with the configured credentials.
    pub async fn login(&self) -> GatewayResult<LoginStatus> {
        let _guard = self.inner.login_lock.lock().await;
        self.login_locked(&self.inner.credentials).await
    }

    /// Force a fresh login with explicit credentials.
    pub async fn login_with(&self, credentials: &Credentials) -> GatewayResult<LoginStatus> {
        let _guard = self.inner.login_lock.lock().await;
        self.login_locked(credentials).await
    }

    async fn login_locked(&self, credentials: &Credentials) -> GatewayResult<LoginStatus> {
        if !credentials.is_complete() {
            warn!("login skipped: username or password missing");
            self.invalidate();
            return Err(self.failure(&GatewayError::MissingCredentials));
        }

        match self
            .inner
            .client
            .login(&credentials.username, &credentials.password)
            .await
        {
            Ok(()) => {
                self.write_state().record_login(self.inner.clock.now());
                info!(username = %credentials.username, "logged in to upstream");
                Ok(Outcome::Data(LoginStatus::LoggedIn))
            }
            Err(e) => {
                self.invalidate();
                let err = GatewayError::from(e);
                warn!(code = %err.code(), error = %err, "upstream login failed");
                Err(self.failure(&err))
            }
        }
    }

    /// End the upstream session if the client reports one.
    ///
    /// Having no active session is a successful no-op. The local session
    /// is dropped even when the upstream logout call fails.
    pub async fn logout(&self) -> GatewayResult<LogoutStatus> {
        let _guard = self.inner.login_lock.lock().await;

        if !self.inner.client.is_logged_in() {
            debug!("logout requested without an active session");
            self.invalidate();
            return Ok(Outcome::Data(LogoutStatus::NoActiveSession));
        }

        let result = self.inner.client.logout().await;
        self.invalidate();

        match result {
            Ok(()) => {
                info!("logged out of upstream");
                Ok(Outcome::Data(LogoutStatus::LoggedOut))
            }
            Err(e) => {
                let err = GatewayError::from(e);
                warn!(error = %err, "upstream logout failed");
                Err(self.failure(&err))
            }
        }
    }

    // ── Reads ────────────────────────────────────────────────────

    /// Generic read. Dispatches to the typed method for `resource`.
    pub async fn fetch(&self, resource: Resource) -> GatewayResult<ResourceData> {
        debug!(resource = resource.name(), "fetch");
        match resource {
            Resource::Plants => Ok(self.plants().await?.map(ResourceData::Plants)),
            Resource::PlantById { id } => Ok(self
                .plant(&id)
                .await?
                .map(|plant| ResourceData::Plant(Box::new(plant)))),
            Resource::Devices(query) => Ok(self.devices(&query).await?.map(ResourceData::Devices)),
            Resource::Weather { plant_id } => Ok(self
                .weather(&plant_id)
                .await?
                .map(|weather| ResourceData::Weather(Box::new(weather)))),
            Resource::FaultLogs(query) => {
                Ok(self.fault_logs(&query).await?.map(ResourceData::FaultLogs))
            }
        }
    }

    /// Generic read from a name and string parameters (web layer entry).
    pub async fn fetch_named(
        &self,
        name: &str,
        params: &BTreeMap<String, String>,
    ) -> GatewayResult<ResourceData> {
        let resource = Resource::parse(name, params).map_err(|e| self.failure(&e))?;
        self.fetch(resource).await
    }

    /// Log in if needed and return the login time of the session the
    /// following upstream call will run under.
    async fn session(&self) -> Result<Option<DateTime<Utc>>, Failure> {
        self.ensure_login().await?;
        Ok(self.read_state().last_login())
    }

    pub async fn plants(&self) -> GatewayResult<Vec<Plant>> {
        let login_at = self.session().await?;
        let plants = self
            .settle("plants", login_at, self.inner.client.plants())
            .await?;
        Ok(Outcome::from_list(plants, "No plants found for this account"))
    }

    /// Look up one plant. An absent record is `NotFound`, not "no data".
    pub async fn plant(&self, plant_id: &str) -> GatewayResult<Plant> {
        let login_at = self.session().await?;
        self.require_id(plant_id)?;
        match self
            .settle("plant_by_id", login_at, self.inner.client.plant(plant_id))
            .await?
        {
            Some(plant) => Ok(Outcome::Data(plant)),
            None => Err(self.failure(&GatewayError::NotFound {
                resource: "plant",
                identifier: plant_id.to_owned(),
            })),
        }
    }

    /// Devices of a plant. Pagination is dropped and the call retried once
    /// if the server rejects the parameters.
    pub async fn devices(&self, query: &DeviceQuery) -> GatewayResult<Vec<Device>> {
        let login_at = self.session().await?;
        self.require_id(&query.plant_id)?;
        let client = &self.inner.client;
        let minimal = query.minimal();
        let fallback = query.has_optional().then_some(|| client.devices(&minimal));
        let devices = self
            .settle_with_fallback("devices", login_at, client.devices(query), fallback)
            .await?;
        Ok(Outcome::from_list(devices, "No devices found for this plant"))
    }

    pub async fn weather(&self, plant_id: &str) -> GatewayResult<Weather> {
        let login_at = self.session().await?;
        self.require_id(plant_id)?;
        let weather = self
            .settle("weather", login_at, self.inner.client.weather(plant_id))
            .await?;
        Ok(weather.map_or_else(
            || Outcome::no_data("No weather data available for this plant"),
            Outcome::Data,
        ))
    }

    /// Fault events of a plant. Filters are dropped and the call retried
    /// once if the server rejects the parameters.
    pub async fn fault_logs(&self, query: &FaultLogQuery) -> GatewayResult<Vec<FaultLog>> {
        let login_at = self.session().await?;
        self.require_id(&query.plant_id)?;
        let client = &self.inner.client;
        let minimal = query.minimal();
        let fallback = query
            .has_optional()
            .then_some(|| client.fault_logs(&minimal));
        let logs = self
            .settle_with_fallback("fault_logs", login_at, client.fault_logs(query), fallback)
            .await?;
        Ok(Outcome::from_list(logs, "No fault logs recorded"))
    }

    // ── Error boundary ───────────────────────────────────────────

    /// Await an upstream call and map any error into a `Failure`.
    ///
    /// `login_at` identifies the session the call ran under.
    async fn settle<T>(
        &self,
        operation: &'static str,
        login_at: Option<DateTime<Utc>>,
        call: impl Future<Output = Result<T, growatt_api::Error>>,
    ) -> Result<T, Failure> {
        call.await.map_err(|e| self.reject(operation, login_at, e))
    }

    /// Like [`settle`](Self::settle), but a parameter rejection is retried
    /// once through `fallback` before surfacing.
    async fn settle_with_fallback<T, F, Fut>(
        &self,
        operation: &'static str,
        login_at: Option<DateTime<Utc>>,
        call: impl Future<Output = Result<T, growatt_api::Error>>,
        fallback: Option<F>,
    ) -> Result<T, Failure>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, growatt_api::Error>>,
    {
        let result = match (call.await, fallback) {
            (Err(e), Some(retry)) if e.is_parameter_error() => {
                warn!(operation, error = %e, "parameters rejected, retrying with required parameters only");
                retry().await
            }
            (result, _) => result,
        };
        result.map_err(|e| self.reject(operation, login_at, e))
    }

    fn reject(
        &self,
        operation: &'static str,
        login_at: Option<DateTime<Utc>>,
        e: growatt_api::Error,
    ) -> Failure {
        // A concurrent caller may have logged in again since this call
        // started; only the session the call used is dropped.
        if e.is_auth_expired() && !self.write_state().invalidate_login(login_at) {
            debug!(operation, "session already renewed, keeping it");
        }
        let err = GatewayError::from(e);
        warn!(operation, code = %err.code(), error = %err, "upstream call failed");
        self.failure(&err)
    }

    fn require_id(&self, id: &str) -> Result<(), Failure> {
        if id.trim().is_empty() {
            return Err(self.failure(&GatewayError::Parameter {
                message: "a plant id is required".into(),
            }));
        }
        Ok(())
    }

    fn failure(&self, err: &GatewayError) -> Failure {
        Failure::new(err, self.is_session_valid())
    }
}
