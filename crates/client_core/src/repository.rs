use shared::protocol::{ApiResponse, RegistrationPayload, UserStatusResponse};
use tracing::debug;

use crate::api::ApiClient;

/// Terminal result of one backend call. Errors never escape the
/// repository; they land here as a printable message.
#[derive(Debug, Clone, PartialEq)]
pub enum CallOutcome<T> {
    Success { status: u16, body: T },
    Failure { message: String },
}

impl<T> CallOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, CallOutcome::Success { .. })
    }
}

pub struct ApiRepository {
    client: ApiClient,
}

impl ApiRepository {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn register(&self, payload: &RegistrationPayload) -> CallOutcome<ApiResponse> {
        match self.client.register(payload).await {
            Ok((status, body)) => CallOutcome::Success { status, body },
            Err(err) => {
                debug!(imei_id = payload.imei_id, "repository: registration failed: {err}");
                CallOutcome::Failure {
                    message: err.to_string(),
                }
            }
        }
    }

    pub async fn user_status(&self, user_id: &str) -> CallOutcome<UserStatusResponse> {
        match self.client.fetch_user_status(user_id).await {
            Ok((status, body)) => CallOutcome::Success { status, body },
            Err(err) => {
                debug!(user_id, "repository: user status lookup failed: {err}");
                CallOutcome::Failure {
                    message: err.to_string(),
                }
            }
        }
    }
}
