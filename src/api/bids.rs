use crate::error::ApiError;
use crate::gateway::GatewayClient;
use crate::Result;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Clone, Deserialize)]
pub struct Bid {
    pub id: i64,
    #[serde(rename = "subasta")]
    pub auction: i64,
    #[serde(rename = "usuario")]
    pub bidder: i64,
    #[serde(rename = "cantidad")]
    pub amount: f64,
    #[serde(rename = "fecha")]
    pub created_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct BidsApi {
    gateway: Arc<GatewayClient>,
}

impl BidsApi {
    pub fn new(gateway: Arc<GatewayClient>) -> Self {
        Self { gateway }
    }

    /// Places a bid. Whether the amount beats the current maximum is the
    /// server's call; rapid-fire submissions are not serialized or deduped
    /// here, so response ordering follows the network.
    pub async fn place(&self, auction: i64, amount: f64) -> Result<Bid> {
        if !(amount > 0.0) {
            return Err(ApiError::Validation("bid amount must be positive".to_string()));
        }
        self.gateway
            .post("/pujas/", &json!({"subasta": auction, "cantidad": amount}))
            .await
    }

    pub async fn list_for_auction(&self, auction: i64) -> Result<Vec<Bid>> {
        self.gateway
            .get(&format!("/pujas/?subasta={}", auction))
            .await
    }
}
