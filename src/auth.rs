//! Session handling
//!
//! Login stores the backend's session cookie in `session.json` so later
//! invocations can replay it. Auth state itself (`user`,
//! `is_authenticated`) is rebuilt on every run by [`init_auth`].

use serde::{Deserialize, Serialize};

use crate::api::{ApiClient, Credentials};
use crate::error::{Error, Result};
use crate::storage::Storage;
use crate::store::{Action, BoardState};
use crate::task::User;

/// Contents of `session.json`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookie: Option<String>,
}

impl Session {
    pub fn load(storage: &Storage) -> Result<Self> {
        storage.read_json_or_default(&storage.session_file())
    }

    pub fn save(&self, storage: &Storage) -> Result<()> {
        storage.write_json(&storage.session_file(), self)
    }

    pub fn clear(storage: &Storage) -> Result<()> {
        storage.remove(&storage.session_file())?;
        Ok(())
    }
}

/// Ask the backend who we are. Never fails; the outcome is in `state.ui`.
pub async fn init_auth(client: &ApiClient, state: &mut BoardState) {
    match client.me().await {
        Ok(user) => {
            state.apply(Action::SetUser(Some(user)));
        }
        Err(err) => {
            tracing::debug!(error = %err, "session check failed");
        }
    }
    state.apply(Action::SetAuthInitialized(true));
}

pub async fn register(client: &ApiClient, credentials: &Credentials) -> Result<()> {
    client.register(credentials).await?;
    tracing::info!(email = %credentials.email, "registered");
    Ok(())
}

pub async fn login(
    client: &mut ApiClient,
    storage: &Storage,
    state: &mut BoardState,
    credentials: &Credentials,
) -> Result<User> {
    let user = client.login(credentials).await?;
    Session {
        cookie: client.session_cookie().map(str::to_string),
    }
    .save(storage)?;
    state.apply(Action::SetUser(Some(user.clone())));
    tracing::info!(user = %user.id, "logged in");
    Ok(user)
}

/// End the session. Local state and the stored cookie are cleared even
/// when the backend call fails; an already-expired session is not an error.
pub async fn logout(client: &mut ApiClient, storage: &Storage, state: &mut BoardState) -> Result<()> {
    let result = client.logout().await;
    state.apply(Action::Logout);
    Session::clear(storage)?;

    match result {
        Ok(()) => {
            tracing::info!("logged out");
            Ok(())
        }
        Err(Error::Unauthorized(_)) => {
            tracing::debug!("session already expired");
            Ok(())
        }
        Err(err) => {
            tracing::warn!(error = %err, "logout request failed");
            Err(err)
        }
    }
}

/// The signed-in user, or `Unauthorized` when auth did not succeed.
pub fn require_auth(state: &BoardState) -> Result<&User> {
    match (&state.ui.user, state.ui.is_authenticated) {
        (Some(user), true) => Ok(user),
        _ => Err(Error::Unauthorized("not logged in".to_string())),
    }
}
