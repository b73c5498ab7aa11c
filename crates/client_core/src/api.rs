use std::time::Duration;

use reqwest::{header, StatusCode};
use serde::Deserialize;
use shared::protocol::{ApiResponse, RegistrationPayload, UserStatusResponse};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Settings;

#[derive(Debug, Error)]
pub enum ApiClientError {
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("HTTP {code} - {detail}")]
    Status { code: u16, detail: String },
    #[error("unreadable response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Backends disagree on which field carries the error text, so every
/// candidate is optional here and the first one present wins.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    operation: Option<String>,
}

impl ErrorBody {
    fn first_present(self) -> Option<String> {
        [self.message, self.status, self.operation]
            .into_iter()
            .flatten()
            .find(|value| !value.trim().is_empty())
    }
}

pub struct ApiClient {
    http: reqwest::Client,
    register_url: String,
    user_status_url: String,
    bearer: String,
}

impl ApiClient {
    pub fn new(settings: &Settings) -> Result<Self, ApiClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.network_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            register_url: settings.register_url(),
            user_status_url: settings.user_status_url(),
            bearer: format!("Bearer {}", settings.api_token),
        })
    }

    /// Registers one IMEI. The backend takes the payload as query
    /// parameters, not as a body.
    pub async fn register(
        &self,
        payload: &RegistrationPayload,
    ) -> Result<(u16, ApiResponse), ApiClientError> {
        debug!(imei_id = payload.imei_id, "api: submitting registration");

        let response = self
            .http
            .post(&self.register_url)
            .header(header::AUTHORIZATION, self.bearer.as_str())
            .query(&[
                ("imei_id", payload.imei_id.to_string()),
                ("user_id", payload.user_id.clone()),
                ("user_status", payload.user_status.as_flag().to_string()),
                ("tagging", payload.tagging.clone()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.status_error(status, response).await);
        }

        let code = status.as_u16();
        let text = response.text().await?;
        if text.trim().is_empty() {
            debug!(code, "api: registration returned an empty body");
            return Ok((
                code,
                ApiResponse {
                    status: "error".into(),
                    message: Some("Empty response".into()),
                    ..ApiResponse::default()
                },
            ));
        }

        let body: ApiResponse = serde_json::from_str(&text)?;
        Ok((code, body))
    }

    /// Lists every record registered under `user_id`.
    pub async fn fetch_user_status(
        &self,
        user_id: &str,
    ) -> Result<(u16, UserStatusResponse), ApiClientError> {
        debug!(user_id, "api: fetching user status");

        let response = self
            .http
            .get(format!("{}/{user_id}", self.user_status_url))
            .header(header::AUTHORIZATION, self.bearer.as_str())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.status_error(status, response).await);
        }

        let code = status.as_u16();
        let text = response.text().await?;
        if text.trim().is_empty() {
            debug!(code, "api: user status returned an empty body");
            return Ok((
                code,
                UserStatusResponse {
                    status: Some("error".into()),
                    records: Vec::new(),
                },
            ));
        }

        let body: UserStatusResponse = serde_json::from_str(&text)?;
        Ok((code, body))
    }

    async fn status_error(&self, status: StatusCode, response: reqwest::Response) -> ApiClientError {
        let code = status.as_u16();
        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(ErrorBody::first_present)
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request rejected")
                    .to_string()
            });

        warn!(code, detail = %detail, "api: server rejected request");
        ApiClientError::Status { code, detail }
    }
}

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod tests;
