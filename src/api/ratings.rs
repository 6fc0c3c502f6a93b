use crate::error::ApiError;
use crate::gateway::GatewayClient;
use crate::Result;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Clone, Deserialize)]
pub struct Rating {
    pub id: i64,
    #[serde(rename = "emisor")]
    pub rater: i64,
    #[serde(rename = "receptor")]
    pub rated: i64,
    #[serde(rename = "puntuacion")]
    pub score: u8,
    #[serde(rename = "comentario", default)]
    pub comment: Option<String>,
}

/// Seller ratings. Averaging happens server-side; the client only submits
/// and lists individual ratings.
#[derive(Clone)]
pub struct RatingsApi {
    gateway: Arc<GatewayClient>,
}

impl RatingsApi {
    pub fn new(gateway: Arc<GatewayClient>) -> Self {
        Self { gateway }
    }

    pub async fn list_for_user(&self, user: i64) -> Result<Vec<Rating>> {
        self.gateway
            .get(&format!("/valoraciones/?receptor={}", user))
            .await
    }

    pub async fn create(&self, rated: i64, score: u8, comment: Option<&str>) -> Result<Rating> {
        if !(1..=5).contains(&score) {
            return Err(ApiError::Validation(format!(
                "score must be between 1 and 5, got {}",
                score
            )));
        }
        self.gateway
            .post(
                "/valoraciones/",
                &json!({"receptor": rated, "puntuacion": score, "comentario": comment}),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionStore;

    #[tokio::test]
    async fn test_out_of_range_score_fails_locally() {
        let gateway = Arc::new(
            GatewayClient::new("http://127.0.0.1:8000/venta", SessionStore::in_memory(), 0)
                .unwrap(),
        );
        let api = RatingsApi::new(gateway);

        let err = api.create(2, 0, None).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        let err = api.create(2, 6, Some("great")).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}
