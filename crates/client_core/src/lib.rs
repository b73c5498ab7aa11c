//! Client-side engine for the IMEI registration app: settings
//! resolution, backend API access, and the form/table state machine.

pub mod api;
pub mod config;
pub mod form;
pub mod repository;

pub use api::{ApiClient, ApiClientError};
pub use config::{load_settings, load_settings_from, Settings};
pub use form::{FormController, FormState, TableRow};
pub use repository::{ApiRepository, CallOutcome};
