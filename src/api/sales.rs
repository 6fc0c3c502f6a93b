use crate::error::ApiError;
use crate::gateway::GatewayClient;
use crate::session::SessionStore;
use crate::Result;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Clone, Deserialize)]
pub struct Sale {
    pub id: i64,
    #[serde(rename = "vehiculo")]
    pub vehicle: i64,
    #[serde(rename = "comprador")]
    pub buyer: i64,
    #[serde(rename = "precio")]
    pub price: f64,
    #[serde(rename = "fecha")]
    pub date: DateTime<Utc>,
}

/// Purchase recording. Payment handling and concurrency control on the sale
/// itself are server-side.
#[derive(Clone)]
pub struct SalesApi {
    gateway: Arc<GatewayClient>,
    session: SessionStore,
}

impl SalesApi {
    pub fn new(gateway: Arc<GatewayClient>, session: SessionStore) -> Self {
        Self { gateway, session }
    }

    pub async fn create(&self, vehicle: i64, price: f64) -> Result<Sale> {
        self.gateway
            .post("/ventas/", &json!({"vehiculo": vehicle, "precio": price}))
            .await
    }

    /// Purchases of the logged-in user. Fails locally when nobody is logged
    /// in; no request is issued in that case.
    pub async fn list_mine(&self) -> Result<Vec<Sale>> {
        let user = self.session.current_user().ok_or(ApiError::NotAuthenticated)?;
        self.gateway
            .get(&format!("/ventas/?comprador={}", user.id))
            .await
    }
}
