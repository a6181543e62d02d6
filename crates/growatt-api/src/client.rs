// Growatt API HTTP client
//
// Wraps `reqwest::Client` with envelope unwrapping and URL construction.
// Endpoint groups (session, plants, devices) are implemented as inherent
// methods in separate files to keep this module focused on transport
// mechanics.

use std::sync::{PoisonError, RwLock};

use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::{Back, Envelope};
use crate::transport::TransportConfig;

/// Envelope `msg` values with a fixed meaning.
const MSG_NOT_LOGGED_IN: &str = "not_login";
const MSG_PARAM_ERROR: &str = "param_error";

/// Raw HTTP client for the Growatt monitoring server.
///
/// Holds the cookie-backed HTTP client and the user id captured at login.
/// All read methods return the decoded `data` payload with the envelope
/// stripped.
pub struct GrowattClient {
    http: reqwest::Client,
    base_url: Url,
    /// Account id from the login response. Present while the client
    /// believes it holds a live session.
    user_id: RwLock<Option<String>>,
}

impl GrowattClient {
    /// Create a new client from a `TransportConfig`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url: normalize_base(base_url),
            user_id: RwLock::new(None),
        }
    }

    /// The underlying HTTP client.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// The server base URL (always ends with `/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Whether the client holds a user id from a successful login.
    pub fn is_logged_in(&self) -> bool {
        self.user_id().is_some()
    }

    /// The account id captured at login.
    pub fn user_id(&self) -> Option<String> {
        self.user_id
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn set_user_id(&self, id: Option<String>) {
        *self.user_id.write().unwrap_or_else(PoisonError::into_inner) = id;
    }

    pub(crate) fn require_user_id(&self) -> Result<String, Error> {
        self.user_id().ok_or(Error::NotLoggedIn)
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Resolve an endpoint (e.g. `PlantListAPI.do`) against the base URL.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, Error> {
        self.base_url.join(path).map_err(Error::InvalidUrl)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and decode `back.data` as `T`.
    ///
    /// `Ok(None)` means the server answered successfully with no data.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<Option<T>, Error> {
        let url = self.endpoint(path)?;
        debug!("GET {}", url);

        let resp = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(Error::Transport)?;

        let back = self.parse_envelope(resp).await?;
        decode_data(back)
    }

    /// Read the response and return the envelope body on success.
    ///
    /// Maps HTTP 401 and `msg: "not_login"` to [`Error::SessionExpired`],
    /// HTTP 400 and `msg: "param_error"` to [`Error::InvalidParameters`].
    pub(crate) async fn parse_envelope(&self, resp: reqwest::Response) -> Result<Back, Error> {
        let status = resp.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::SessionExpired);
        }

        if status == reqwest::StatusCode::BAD_REQUEST {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::InvalidParameters {
                message: preview(&body).to_owned(),
            });
        }

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Api {
                message: format!("HTTP {status}: {}", preview(&body)),
                status: Some(status.as_u16()),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        trace!(bytes = body.len(), "response body received");

        let envelope: Envelope = serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(&body)),
            body: body.clone(),
        })?;
        let back = envelope.back;

        match back.msg.as_deref() {
            Some(MSG_NOT_LOGGED_IN) => return Err(Error::SessionExpired),
            Some(MSG_PARAM_ERROR) => {
                return Err(Error::InvalidParameters {
                    message: back.message(),
                });
            }
            _ => {}
        }

        if back.success == Some(false) {
            return Err(Error::Api {
                message: back.message(),
                status: None,
            });
        }

        Ok(back)
    }
}

/// Decode the untyped `data` field into `T`, treating JSON `null` as absent.
fn decode_data<T: DeserializeOwned>(back: Back) -> Result<Option<T>, Error> {
    match back.data {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(value) => {
            let raw = value.to_string();
            serde_json::from_value(value)
                .map(Some)
                .map_err(|e| Error::Deserialization {
                    message: format!("unexpected data shape: {e}"),
                    body: raw,
                })
        }
    }
}

/// `Url::join` replaces the last path segment unless the base ends in `/`.
fn normalize_base(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn preview(body: &str) -> &str {
    let end = body
        .char_indices()
        .nth(200)
        .map_or(body.len(), |(idx, _)| idx);
    &body[..end]
}
