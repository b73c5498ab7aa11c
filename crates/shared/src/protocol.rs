use serde::{Deserialize, Serialize};

use crate::domain::UserStatus;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationPayload {
    pub imei_id: i64,
    pub user_id: String,
    pub user_status: UserStatus,
    pub tagging: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imei_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affected_rows: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ApiResponse {
    /// Most specific error text the backend sent for a rejected registration,
    /// `message` first, then `operation`.
    pub fn detail(&self) -> Option<&str> {
        self.message.as_deref().or(self.operation.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStatusResponse {
    // Some deployments omit the outcome field entirely on empty result sets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default)]
    pub records: Vec<UserRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub user_id: String,
    pub imei_id: i64,
    pub user_status: UserStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tagging: Option<String>,
}
