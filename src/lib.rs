pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod gateway;
pub mod session;

use std::sync::Arc;

pub use config::Settings;
pub use error::ApiError;
pub type Result<T> = std::result::Result<T, ApiError>;

pub use auth::AuthService;
pub use gateway::GatewayClient;
pub use session::{FileStorage, MemoryStorage, SessionStore, UserSummary};

use api::{AuctionsApi, BidsApi, ChatApi, ProfilesApi, RatingsApi, SalesApi, VehiclesApi};

/// Entry point of the SDK: one session store, one gateway, and typed handles
/// for every resource the marketplace backend exposes.
#[derive(Clone)]
pub struct VentaClient {
    settings: Arc<Settings>,
    session: SessionStore,
    gateway: Arc<GatewayClient>,
    auth: Arc<AuthService>,
}

impl VentaClient {
    pub fn new(settings: Settings) -> Result<Self> {
        let session = if settings.storage.path.is_empty() {
            SessionStore::in_memory()
        } else {
            SessionStore::new(Arc::new(FileStorage::new(settings.storage.path.clone())))
        };
        Self::with_session(settings, session)
    }

    /// Builds a client over a caller-provided session store, e.g. one backed
    /// by custom storage.
    pub fn with_session(settings: Settings, session: SessionStore) -> Result<Self> {
        let gateway = Arc::new(GatewayClient::new(
            &settings.api.base_url,
            session.clone(),
            settings.api.timeout_secs,
        )?);
        let auth = Arc::new(AuthService::new(gateway.clone(), session.clone()));

        Ok(Self {
            settings: Arc::new(settings),
            session,
            gateway,
            auth,
        })
    }

    /// Loads settings from config files and `APP_`-prefixed environment
    /// variables.
    pub fn from_env() -> Result<Self> {
        Self::new(Settings::new()?)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn gateway(&self) -> &GatewayClient {
        &self.gateway
    }

    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    pub fn vehicles(&self) -> VehiclesApi {
        VehiclesApi::new(self.gateway.clone())
    }

    pub fn auctions(&self) -> AuctionsApi {
        AuctionsApi::new(self.gateway.clone())
    }

    pub fn bids(&self) -> BidsApi {
        BidsApi::new(self.gateway.clone())
    }

    pub fn sales(&self) -> SalesApi {
        SalesApi::new(self.gateway.clone(), self.session.clone())
    }

    pub fn ratings(&self) -> RatingsApi {
        RatingsApi::new(self.gateway.clone())
    }

    pub fn profiles(&self) -> ProfilesApi {
        ProfilesApi::new(self.gateway.clone())
    }

    pub fn chat(&self) -> ChatApi {
        ChatApi::new(self.gateway.clone())
    }
}
