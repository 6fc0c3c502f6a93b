pub mod storage;

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

pub use storage::{FileStorage, MemoryStorage, SessionStorage, TOKEN_KEY, USER_KEY};

/// Cached record of who is logged in, as returned by the credential
/// endpoints. Wire field names follow the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "apellido", default, skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    #[serde(
        rename = "nombre_completo",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub full_name: Option<String>,
    #[serde(rename = "correo")]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Single source of truth for the authenticated identity.
///
/// Owns the bearer token and the cached user record behind one accessor
/// interface; every other component takes a handle to this store instead of
/// touching storage directly. The token and user are set and cleared as a
/// pair: the store is either `Anonymous` (neither present) or
/// `Authenticated` (both present).
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self { storage }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    pub fn token(&self) -> Option<String> {
        self.storage.get(TOKEN_KEY)
    }

    pub fn set_token(&self, token: &str) {
        self.storage.set(TOKEN_KEY, token);
    }

    pub fn remove_token(&self) {
        self.storage.remove(TOKEN_KEY);
    }

    /// Cached user record; a missing or malformed stored value reads as
    /// `None`, never an error.
    pub fn current_user(&self) -> Option<UserSummary> {
        let raw = self.storage.get(USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!("discarding malformed cached user: {}", e);
                None
            }
        }
    }

    pub fn set_current_user(&self, user: &UserSummary) {
        match serde_json::to_string(user) {
            Ok(raw) => self.storage.set(USER_KEY, &raw),
            Err(e) => warn!("cannot serialize user for session cache: {}", e),
        }
    }

    pub fn remove_current_user(&self) {
        self.storage.remove(USER_KEY);
    }

    /// Stores token and user together (`Anonymous → Authenticated`).
    pub fn store_session(&self, token: &str, user: &UserSummary) {
        self.set_token(token);
        self.set_current_user(user);
    }

    /// Clears token and user together (`Authenticated → Anonymous`).
    pub fn clear(&self) {
        self.remove_token();
        self.remove_current_user();
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some() && self.current_user().is_some()
    }
}
