pub mod response;

use crate::error::ApiError;
use crate::session::SessionStore;
use crate::Result;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::multipart::Form;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Whether a request carried a JSON body or a multipart form. The two paths
/// derive error messages differently and that difference is load-bearing.
#[derive(Clone, Copy)]
enum Variant {
    Json,
    Multipart,
}

enum Body {
    None,
    Json(Value),
    Multipart(Form),
}

/// The single HTTP access point for the whole crate.
///
/// Every feature module funnels through this client. It builds the request
/// (base URL + endpoint, verbatim), attaches the bearer token when the
/// session has one, and normalizes the backend's response shapes into one
/// contract. It never mutates the session; callers own the 401 teardown.
///
/// No retries, no backoff, no request cancellation. A failed call is
/// surfaced to the caller as-is.
pub struct GatewayClient {
    http: Client,
    base_url: String,
    session: SessionStore,
}

impl GatewayClient {
    /// `timeout_secs` of 0 leaves the transport's own defaults in place.
    pub fn new(base_url: &str, session: SessionStore, timeout_secs: u64) -> Result<Self> {
        // The base URL is the one thing validated up front; endpoint paths
        // are appended without normalization.
        Url::parse(base_url).map_err(|e| ApiError::Config(format!("invalid base URL: {}", e)))?;

        let mut builder = Client::builder();
        if timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(timeout_secs));
        }
        let http = builder
            .build()
            .map_err(|e| ApiError::Config(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let value = self
            .execute(Method::GET, endpoint, Body::None, HeaderMap::new())
            .await?;
        decode(endpoint, value)
    }

    pub async fn post<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &impl Serialize,
    ) -> Result<T> {
        let value = self
            .execute(Method::POST, endpoint, json_body(body)?, HeaderMap::new())
            .await?;
        decode(endpoint, value)
    }

    pub async fn put<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &impl Serialize,
    ) -> Result<T> {
        let value = self
            .execute(Method::PUT, endpoint, json_body(body)?, HeaderMap::new())
            .await?;
        decode(endpoint, value)
    }

    pub async fn patch<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &impl Serialize,
    ) -> Result<T> {
        let value = self
            .execute(Method::PATCH, endpoint, json_body(body)?, HeaderMap::new())
            .await?;
        decode(endpoint, value)
    }

    pub async fn delete<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let value = self
            .execute(Method::DELETE, endpoint, Body::None, HeaderMap::new())
            .await?;
        decode(endpoint, value)
    }

    /// Multipart POST. The content-type header is left to the transport so
    /// it can insert its own boundary token.
    pub async fn post_form<T: DeserializeOwned>(&self, endpoint: &str, form: Form) -> Result<T> {
        let value = self
            .execute(Method::POST, endpoint, Body::Multipart(form), HeaderMap::new())
            .await?;
        decode(endpoint, value)
    }

    /// Multipart PATCH, same header rules as [`post_form`](Self::post_form).
    pub async fn patch_form<T: DeserializeOwned>(&self, endpoint: &str, form: Form) -> Result<T> {
        let value = self
            .execute(Method::PATCH, endpoint, Body::Multipart(form), HeaderMap::new())
            .await?;
        decode(endpoint, value)
    }

    /// JSON request with caller-supplied headers merged over the defaults.
    /// Returns the unwrapped body without typed decoding.
    pub async fn request_raw(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
        headers: HeaderMap,
    ) -> Result<Value> {
        let body = match body {
            Some(value) => Body::Json(value.clone()),
            None => Body::None,
        };
        self.execute(method, endpoint, body, headers).await
    }

    async fn execute(
        &self,
        method: Method,
        endpoint: &str,
        body: Body,
        extra_headers: HeaderMap,
    ) -> Result<Value> {
        // Plain concatenation; the caller owns escaping and trailing slashes.
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("{} {}", method, url);

        let variant = match body {
            Body::Multipart(_) => Variant::Multipart,
            _ => Variant::Json,
        };

        let mut headers = HeaderMap::new();
        if matches!(variant, Variant::Json) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        for (name, value) in &extra_headers {
            headers.insert(name.clone(), value.clone());
        }

        let mut request = self.http.request(method, &url).headers(headers);
        request = match body {
            Body::None => request,
            Body::Json(value) => request.body(value.to_string()),
            Body::Multipart(form) => request.multipart(form),
        };

        // A missing token is not an error; the request goes out anonymous.
        if let Some(token) = self.session.token() {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        // Read the body in full before interpreting anything.
        let text = response.text().await?;

        let parsed = response::parse_body(&text).ok_or_else(|| ApiError::InvalidResponse {
            status: status.as_u16(),
            snippet: response::snippet(&text),
        })?;

        if !status.is_success() {
            let message = match variant {
                Variant::Json => response::derive_message(&parsed, status.as_u16()),
                Variant::Multipart => response::derive_message_form(&parsed, status.as_u16()),
            };
            debug!("{} failed with status {}: {}", url, status, message);
            return Err(ApiError::RequestFailed {
                status: status.as_u16(),
                message,
                body: parsed,
            });
        }

        Ok(response::unwrap_envelope(parsed))
    }
}

fn json_body(body: &impl Serialize) -> Result<Body> {
    let value = serde_json::to_value(body)
        .map_err(|e| ApiError::Validation(format!("unserializable request body: {}", e)))?;
    Ok(Body::Json(value))
}

fn decode<T: DeserializeOwned>(endpoint: &str, value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| ApiError::UnexpectedShape {
        endpoint: endpoint.to_string(),
        detail: e.to_string(),
    })
}
