// Session authentication
//
// Form-based login that sets a session cookie in the client's jar and
// returns the account id that user-scoped endpoints require.

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info};

use crate::client::GrowattClient;
use crate::error::Error;

const LOGIN_PATH: &str = "newTwoLoginAPI.do";
const LOGOUT_PATH: &str = "logout.do";

impl GrowattClient {
    /// Authenticate with username/password.
    ///
    /// `POST /newTwoLoginAPI.do` with form fields `userName` and `password`.
    /// On success the session cookie is kept in the jar and the account id
    /// is stored for later calls. A rejected login clears any previous
    /// session state.
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<(), Error> {
        let url = self.endpoint(LOGIN_PATH)?;
        debug!("logging in at {}", url);

        let form = [
            ("userName", username),
            ("password", password.expose_secret()),
        ];

        let resp = self
            .http()
            .post(url)
            .form(&form)
            .send()
            .await
            .map_err(Error::Transport)?;

        // `success: false` on this endpoint means the credentials were
        // rejected; an HTTP-level failure stays a server error.
        let back = match self.parse_envelope(resp).await {
            Ok(back) => back,
            Err(e) => {
                self.set_user_id(None);
                return Err(match e {
                    Error::Api {
                        message,
                        status: None,
                    } => Error::Authentication { message },
                    Error::SessionExpired => Error::Authentication {
                        message: "credentials rejected (HTTP 401)".into(),
                    },
                    other => other,
                });
            }
        };

        let Some(user) = back.user else {
            self.set_user_id(None);
            return Err(Error::Authentication {
                message: "login response carried no user".into(),
            });
        };

        info!(user_id = %user.id, "login successful");
        self.set_user_id(Some(user.id));
        Ok(())
    }

    /// End the current session.
    ///
    /// `GET /logout.do`. The stored user id is dropped whatever the
    /// server answers.
    pub async fn logout(&self) -> Result<(), Error> {
        let url = self.endpoint(LOGOUT_PATH)?;
        debug!("logging out at {}", url);

        self.set_user_id(None);
        let resp = self.http().get(url).send().await.map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() && status != reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::Api {
                message: format!("logout failed (HTTP {status})"),
                status: Some(status.as_u16()),
            });
        }

        debug!("logout complete");
        Ok(())
    }
}
