use crate::gateway::GatewayClient;
use crate::Result;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Clone, Deserialize)]
pub struct Auction {
    pub id: i64,
    #[serde(rename = "vehiculo")]
    pub vehicle: i64,
    #[serde(rename = "precio_salida")]
    pub starting_price: f64,
    #[serde(rename = "puja_maxima", default)]
    pub highest_bid: Option<f64>,
    #[serde(rename = "fecha_cierre")]
    pub closes_at: DateTime<Utc>,
    #[serde(rename = "ganador", default)]
    pub winner: Option<i64>,
    #[serde(rename = "abierta")]
    pub open: bool,
}

/// Auction browsing. Settlement and winner resolution are entirely
/// server-side; this wrapper only reads.
#[derive(Clone)]
pub struct AuctionsApi {
    gateway: Arc<GatewayClient>,
}

impl AuctionsApi {
    pub fn new(gateway: Arc<GatewayClient>) -> Self {
        Self { gateway }
    }

    pub async fn list(&self) -> Result<Vec<Auction>> {
        self.gateway.get("/subastas/").await
    }

    pub async fn list_open(&self) -> Result<Vec<Auction>> {
        self.gateway.get("/subastas/?abierta=true").await
    }

    pub async fn get(&self, id: i64) -> Result<Auction> {
        self.gateway.get(&format!("/subastas/{}/", id)).await
    }
}
