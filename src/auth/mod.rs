use crate::error::ApiError;
use crate::gateway::GatewayClient;
use crate::session::{SessionStore, UserSummary};
use crate::Result;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, warn};

/// Role identifier sent with every registration. Role semantics live
/// server-side; the client only ever registers plain customers.
const DEFAULT_ROLE: &str = "cliente";

/// Shape of a successful `/login/` or `/registro/` response.
#[derive(Debug, Deserialize)]
struct CredentialResponse {
    id: i64,
    #[serde(rename = "nombre")]
    name: String,
    #[serde(rename = "apellido", default)]
    surname: Option<String>,
    #[serde(rename = "nombre_completo", default)]
    full_name: Option<String>,
    #[serde(rename = "correo")]
    email: String,
    #[serde(default)]
    avatar: Option<String>,
    access: String,
}

impl CredentialResponse {
    fn into_parts(self) -> (String, UserSummary) {
        let user = UserSummary {
            id: self.id,
            name: self.name,
            surname: self.surname,
            full_name: self.full_name,
            email: self.email,
            avatar: self.avatar,
        };
        (self.access, user)
    }
}

/// Credential exchange and session lifecycle.
///
/// Owns the transitions between `Anonymous` and `Authenticated`: the gateway
/// itself never writes to the session, so every token mutation happens here.
pub struct AuthService {
    gateway: Arc<GatewayClient>,
    session: SessionStore,
}

impl AuthService {
    pub fn new(gateway: Arc<GatewayClient>, session: SessionStore) -> Self {
        Self { gateway, session }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Exchanges credentials for a bearer token and caches the returned
    /// user. Gateway errors propagate unchanged.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserSummary> {
        let response: CredentialResponse = self
            .gateway
            .post("/login/", &json!({"correo": email, "password": password}))
            .await?;

        let (token, user) = response.into_parts();
        self.session.store_session(&token, &user);
        info!("user {} logged in", user.id);
        Ok(user)
    }

    /// Registers a new account and logs it in. After the session is stored,
    /// a dependent profile record is created best-effort: if that secondary
    /// call fails, the failure is logged and swallowed and registration
    /// still succeeds.
    pub async fn register(
        &self,
        name: &str,
        surname: &str,
        full_name: &str,
        email: &str,
        password: &str,
    ) -> Result<UserSummary> {
        let response: CredentialResponse = self
            .gateway
            .post(
                "/registro/",
                &json!({
                    "nombre": name,
                    "apellido": surname,
                    "nombre_completo": full_name,
                    "correo": email,
                    "password": password,
                    "rol": DEFAULT_ROLE,
                }),
            )
            .await?;

        let (token, user) = response.into_parts();
        self.session.store_session(&token, &user);
        info!("user {} registered", user.id);

        if let Err(e) = self
            .gateway
            .post::<Value>("/perfiles/", &json!({"usuario": user.id}))
            .await
        {
            warn!("profile creation for user {} failed: {}", user.id, e);
        }

        Ok(user)
    }

    /// Local state teardown only; there is no server-side session to
    /// invalidate.
    pub fn logout(&self) {
        self.session.clear();
        info!("session cleared");
    }

    /// Presence check against the local cache. Never contacts the server, so
    /// a revoked token is only discovered when some later authenticated call
    /// comes back 401.
    pub fn verify_token(&self) -> Result<UserSummary> {
        self.session.current_user().ok_or(ApiError::NotAuthenticated)
    }

    /// Tears the session down when a call came back 401. Returns whether the
    /// teardown happened, so callers can redirect to their login flow.
    pub fn handle_unauthorized(&self, err: &ApiError) -> bool {
        if err.is_unauthorized() {
            warn!("authentication rejected by server, clearing session");
            self.session.clear();
            true
        } else {
            false
        }
    }
}
