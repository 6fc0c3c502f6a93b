use crate::error::ApiError;
use crate::gateway::GatewayClient;
use crate::Result;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const MAX_AVATAR_BYTES: usize = 2 * 1024 * 1024;

#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    pub id: i64,
    #[serde(rename = "usuario")]
    pub user: i64,
    #[serde(rename = "descripcion", default)]
    pub bio: Option<String>,
    #[serde(rename = "ubicacion", default)]
    pub location: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(rename = "descripcion", skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(rename = "ubicacion", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Clone)]
pub struct ProfilesApi {
    gateway: Arc<GatewayClient>,
}

impl ProfilesApi {
    pub fn new(gateway: Arc<GatewayClient>) -> Self {
        Self { gateway }
    }

    /// Profile of a given user, or `None` when the user has none (the
    /// best-effort creation at registration can have failed).
    pub async fn get_by_user(&self, user: i64) -> Result<Option<Profile>> {
        let mut profiles: Vec<Profile> = self
            .gateway
            .get(&format!("/perfiles/?usuario={}", user))
            .await?;
        if profiles.is_empty() {
            Ok(None)
        } else {
            Ok(Some(profiles.swap_remove(0)))
        }
    }

    pub async fn update(&self, profile: i64, update: &ProfileUpdate) -> Result<Profile> {
        self.gateway
            .patch(&format!("/perfiles/{}/", profile), update)
            .await
    }

    /// Multipart avatar replacement; the content-type is left to the
    /// transport like every form upload.
    pub async fn upload_avatar(
        &self,
        profile: i64,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<Profile> {
        if bytes.is_empty() {
            return Err(ApiError::Validation("empty avatar file".to_string()));
        }
        if bytes.len() > MAX_AVATAR_BYTES {
            return Err(ApiError::Validation(format!(
                "avatar {} exceeds the {} byte limit",
                file_name, MAX_AVATAR_BYTES
            )));
        }

        let part = Part::bytes(bytes).file_name(file_name.to_string());
        let form = Form::new().part("avatar", part);
        self.gateway
            .patch_form(&format!("/perfiles/{}/", profile), form)
            .await
    }
}
