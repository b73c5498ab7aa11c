//! Registration form and table state, plus the controller that drives
//! backend calls for it.

use shared::domain::{self, UserStatus};
use shared::protocol::{ApiResponse, RegistrationPayload, UserRecord, UserStatusResponse};
use tracing::{debug, info, warn};

use crate::repository::{ApiRepository, CallOutcome};

/// One displayed table line. Rebuilt from scratch on every fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub imei: String,
    pub user_status: String,
    pub tagging: String,
}

impl TableRow {
    fn from_record(record: &UserRecord) -> Self {
        Self {
            imei: record.imei_id.to_string(),
            user_status: record.user_status.as_flag().to_string(),
            tagging: record.tagging.clone().unwrap_or_else(|| "N/A".to_string()),
        }
    }

    fn from_payload(payload: &RegistrationPayload) -> Self {
        Self {
            imei: payload.imei_id.to_string(),
            user_status: payload.user_status.as_flag().to_string(),
            tagging: payload.tagging.clone(),
        }
    }

    fn matches(&self, needle: &str) -> bool {
        self.imei.to_lowercase().contains(needle)
            || self.user_status.to_lowercase().contains(needle)
            || self.tagging.to_lowercase().contains(needle)
    }
}

/// Everything the form remembers between user actions. Transitions are
/// synchronous and deterministic; network traffic happens elsewhere and
/// feeds back in through the `apply_*` methods.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    pub username: String,
    pub imei_input: String,
    pub user_status: UserStatus,
    pub tagging_input: String,

    pub show_additional_fields: bool,
    pub show_table: bool,
    pub is_edit_mode: bool,

    pub table_rows: Vec<TableRow>,
    pub is_loading: bool,
    pub error_message: Option<String>,
    pub search_query: String,
}

impl FormState {
    pub fn set_username(&mut self, value: impl Into<String>) {
        self.username = value.into();
    }

    /// Accepts only all-digit values up to the IMEI limit, and nothing
    /// at all while a row is being edited.
    pub fn set_imei_input(&mut self, value: &str) {
        if self.is_edit_mode {
            return;
        }
        if value.chars().count() <= domain::IMEI_MAX_DIGITS
            && value.chars().all(|c| c.is_ascii_digit())
        {
            self.imei_input = value.to_string();
        }
    }

    pub fn set_user_status(&mut self, status: UserStatus) {
        self.user_status = status;
    }

    pub fn set_tagging_input(&mut self, value: &str) {
        if value.chars().count() <= domain::TAGGING_MAX_CHARS {
            self.tagging_input = value.to_string();
        }
    }

    pub fn set_search_query(&mut self, value: impl Into<String>) {
        self.search_query = value.into();
    }

    /// The username field itself is never truncated; the overflow is
    /// surfaced as a warning and blocks submission instead.
    pub fn username_too_long(&self) -> bool {
        self.username.chars().count() > domain::USER_ID_MAX_CHARS
    }

    pub fn can_submit(&self) -> bool {
        domain::is_valid_user_id(&self.username)
            && domain::is_valid_imei(&self.imei_input)
            && domain::is_valid_tagging(&self.tagging_input)
    }

    /// Rows visible under the current search query. A blank query shows
    /// everything; otherwise the match is a case-insensitive substring
    /// test over IMEI, status and tagging.
    pub fn filtered_rows(&self) -> Vec<&TableRow> {
        if self.search_query.trim().is_empty() {
            return self.table_rows.iter().collect();
        }
        let needle = self.search_query.to_lowercase();
        self.table_rows
            .iter()
            .filter(|row| row.matches(&needle))
            .collect()
    }

    /// (visible, total) row counts for the table header.
    pub fn match_counts(&self) -> (usize, usize) {
        (self.filtered_rows().len(), self.table_rows.len())
    }

    /// SHOW: close the entry form and open the table. Returns whether a
    /// fetch should follow; with a blank username the table just opens
    /// on whatever rows were already there.
    pub fn begin_show(&mut self) -> bool {
        self.show_additional_fields = false;
        self.show_table = true;
        !self.username.trim().is_empty()
    }

    /// ADD: toggle the entry form. Opening it starts from clean fields;
    /// pressing ADD again merely closes it. Always leaves edit mode.
    pub fn begin_add(&mut self) {
        self.show_table = false;
        self.is_edit_mode = false;
        if !self.show_additional_fields {
            self.reset_entry_fields();
        }
        self.show_additional_fields = !self.show_additional_fields;
    }

    /// EDIT: prefill the entry fields from a row and open the form with
    /// the IMEI locked. A row status outside Y/N leaves the status
    /// field as it was.
    pub fn begin_edit(&mut self, row: &TableRow) {
        self.imei_input = row.imei.clone();
        if let Some(status) = UserStatus::from_flag(&row.user_status) {
            self.user_status = status;
        }
        self.tagging_input = row.tagging.clone();
        self.is_edit_mode = true;
        self.show_table = false;
        self.show_additional_fields = true;
    }

    /// Marks a fetch in flight: spinner on, stale error gone, search
    /// reset so the incoming rows are not pre-filtered.
    pub fn begin_fetch(&mut self) {
        self.is_loading = true;
        self.error_message = None;
        self.search_query.clear();
    }

    pub fn apply_fetch_outcome(&mut self, outcome: CallOutcome<UserStatusResponse>) {
        self.is_loading = false;
        match outcome {
            CallOutcome::Success { status, body } if status == 200 && !body.records.is_empty() => {
                self.table_rows = body.records.iter().map(TableRow::from_record).collect();
                self.error_message = None;
            }
            CallOutcome::Success { status, body } => {
                self.error_message = Some(body.status.unwrap_or_else(|| {
                    if status == 200 {
                        "No data found".to_string()
                    } else {
                        format!("No registered data found (HTTP {status})")
                    }
                }));
                self.table_rows.clear();
            }
            CallOutcome::Failure { message } => {
                self.error_message = Some(format!("Failed to load data: {message}"));
                self.table_rows.clear();
            }
        }
    }

    /// Validates the entry fields and, when they pass, freezes them
    /// into a payload and marks the submission in flight.
    pub fn begin_submit(&mut self) -> Option<RegistrationPayload> {
        if !self.can_submit() {
            return None;
        }

        let payload = RegistrationPayload {
            imei_id: self.imei_input.parse().unwrap_or(0),
            user_id: self.username.clone(),
            user_status: self.user_status,
            tagging: self.tagging_input.clone(),
        };

        self.is_loading = true;
        self.error_message = None;
        Some(payload)
    }

    pub fn apply_submit_outcome(
        &mut self,
        payload: &RegistrationPayload,
        outcome: CallOutcome<ApiResponse>,
    ) {
        self.is_loading = false;
        match outcome {
            CallOutcome::Success { status, .. } if status == 200 || status == 201 => {
                self.table_rows = vec![TableRow::from_payload(payload)];
                self.show_additional_fields = false;
                self.show_table = true;
                self.reset_entry_fields();
            }
            CallOutcome::Success { status, body } => {
                self.error_message = Some(format!(
                    "Registration failed: HTTP {status} - {}",
                    body.detail().unwrap_or("Unknown error")
                ));
            }
            CallOutcome::Failure { message } => {
                self.error_message = Some(format!("Failed to register: {message}"));
            }
        }
    }

    fn reset_entry_fields(&mut self) {
        self.imei_input.clear();
        self.user_status = UserStatus::Y;
        self.tagging_input.clear();
    }
}

/// Owns the form state and runs the backend round trips behind the
/// SHOW and SUBMIT actions. One action at a time per controller; the
/// exclusive borrow rules out overlapping calls on the same form.
pub struct FormController {
    repository: ApiRepository,
    pub state: FormState,
}

impl FormController {
    pub fn new(repository: ApiRepository) -> Self {
        Self {
            repository,
            state: FormState::default(),
        }
    }

    pub async fn show(&mut self) {
        if !self.state.begin_show() {
            debug!("form: show requested without a username, skipping fetch");
            return;
        }

        self.state.begin_fetch();
        let username = self.state.username.clone();
        let outcome = self.repository.user_status(&username).await;
        self.state.apply_fetch_outcome(outcome);

        match &self.state.error_message {
            Some(message) => warn!("form: fetch error: {message}"),
            None => info!(rows = self.state.table_rows.len(), "form: table refreshed"),
        }
    }

    pub async fn submit(&mut self) {
        let Some(payload) = self.state.begin_submit() else {
            debug!("form: submit blocked by field validation");
            return;
        };

        let outcome = self.repository.register(&payload).await;
        self.state.apply_submit_outcome(&payload, outcome);

        match &self.state.error_message {
            Some(message) => warn!("form: registration error: {message}"),
            None => info!(imei_id = payload.imei_id, "form: registration stored"),
        }
    }

    pub fn add(&mut self) {
        self.state.begin_add();
    }

    /// Starts editing the `index`-th *visible* row. Returns false when
    /// the index points past the filtered view.
    pub fn edit(&mut self, index: usize) -> bool {
        let Some(row) = self.state.filtered_rows().get(index).map(|row| (*row).clone()) else {
            return false;
        };
        self.state.begin_edit(&row);
        true
    }
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
