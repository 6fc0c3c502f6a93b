use crate::error::ApiError;
use crate::gateway::GatewayClient;
use crate::Result;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

/// Upload cap enforced client-side before any bytes go on the wire.
const MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone, Deserialize)]
pub struct Vehicle {
    pub id: i64,
    #[serde(rename = "marca")]
    pub brand: String,
    #[serde(rename = "modelo")]
    pub model: String,
    #[serde(rename = "anio")]
    pub year: i32,
    #[serde(rename = "precio")]
    pub price: f64,
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
    #[serde(rename = "vendedor")]
    pub seller: i64,
    #[serde(rename = "fotos", default)]
    pub photos: Vec<Photo>,
    #[serde(rename = "vendido", default)]
    pub sold: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Photo {
    pub id: i64,
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewVehicle {
    #[serde(rename = "marca")]
    pub brand: String,
    #[serde(rename = "modelo")]
    pub model: String,
    #[serde(rename = "anio")]
    pub year: i32,
    #[serde(rename = "precio")]
    pub price: f64,
    #[serde(rename = "descripcion", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct VehicleUpdate {
    #[serde(rename = "precio", skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(rename = "descripcion", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "vendido", skip_serializing_if = "Option::is_none")]
    pub sold: Option<bool>,
}

/// Outcome of a multi-photo upload. Uploads are independent calls with no
/// rollback: a partial failure leaves the already-uploaded photos in place
/// and is reported here, not undone.
#[derive(Debug, Default)]
pub struct PhotoUploadReport {
    pub uploaded: Vec<Photo>,
    pub failed: Vec<(String, ApiError)>,
}

#[derive(Clone)]
pub struct VehiclesApi {
    gateway: Arc<GatewayClient>,
}

impl VehiclesApi {
    pub fn new(gateway: Arc<GatewayClient>) -> Self {
        Self { gateway }
    }

    pub async fn list(&self) -> Result<Vec<Vehicle>> {
        self.gateway.get("/vehiculos/").await
    }

    pub async fn get(&self, id: i64) -> Result<Vehicle> {
        self.gateway.get(&format!("/vehiculos/{}/", id)).await
    }

    pub async fn search(&self, query: &str) -> Result<Vec<Vehicle>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ApiError::Validation("invalid search query".to_string()));
        }
        self.gateway
            .get(&format!("/vehiculos/?buscar={}", query))
            .await
    }

    pub async fn create(&self, vehicle: &NewVehicle) -> Result<Vehicle> {
        self.gateway.post("/vehiculos/", vehicle).await
    }

    pub async fn update(&self, id: i64, update: &VehicleUpdate) -> Result<Vehicle> {
        self.gateway
            .patch(&format!("/vehiculos/{}/", id), update)
            .await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let _: Value = self.gateway.delete(&format!("/vehiculos/{}/", id)).await?;
        Ok(())
    }

    pub async fn upload_photo(&self, vehicle_id: i64, file_name: &str, bytes: Vec<u8>) -> Result<Photo> {
        if bytes.is_empty() {
            return Err(ApiError::Validation("empty photo file".to_string()));
        }
        if bytes.len() > MAX_PHOTO_BYTES {
            return Err(ApiError::Validation(format!(
                "photo {} exceeds the {} byte limit",
                file_name, MAX_PHOTO_BYTES
            )));
        }

        let part = Part::bytes(bytes).file_name(file_name.to_string());
        let form = Form::new()
            .text("vehiculo", vehicle_id.to_string())
            .part("imagen", part);
        self.gateway.post_form("/vehiculos/fotos/", form).await
    }

    /// Uploads each photo as its own call. Failures are collected, not
    /// rolled back; the caller decides how to report the partial state.
    pub async fn upload_photos(
        &self,
        vehicle_id: i64,
        photos: Vec<(String, Vec<u8>)>,
    ) -> PhotoUploadReport {
        let mut report = PhotoUploadReport::default();
        for (file_name, bytes) in photos {
            match self.upload_photo(vehicle_id, &file_name, bytes).await {
                Ok(photo) => report.uploaded.push(photo),
                Err(e) => {
                    warn!("photo {} failed to upload: {}", file_name, e);
                    report.failed.push((file_name, e));
                }
            }
        }
        report
    }
}
