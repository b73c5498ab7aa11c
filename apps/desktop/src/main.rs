use anyhow::{bail, Context, Result};
use clap::Parser;
use client_core::{
    load_settings, load_settings_from, ApiClient, ApiRepository, FormController, FormState,
};
use shared::domain::{self, UserStatus};
use shared::protocol::RegistrationPayload;
use tracing::{debug, warn};

/// Command-line front end for the IMEI registration backend. Lists the
/// records of a user, or registers one IMEI when `--imei` is given.
#[derive(Parser, Debug)]
struct Args {
    #[arg(long)]
    username: String,
    /// Register this IMEI instead of listing records.
    #[arg(long)]
    imei: Option<String>,
    /// Activation flag for the registration, Y or N.
    #[arg(long, default_value = "Y")]
    user_status: String,
    #[arg(long, default_value = "")]
    tagging: String,
    /// Case-insensitive filter applied to the printed table.
    #[arg(long)]
    search: Option<String>,
    /// Alternate settings file (default: registration.toml).
    #[arg(long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();

    let settings = match args.config.as_deref() {
        Some(path) => load_settings_from(path),
        None => load_settings(),
    };
    debug!(base_url = %settings.api_base_url, "resolved backend settings");
    if settings.api_token.is_empty() {
        warn!("no API_TOKEN configured, requests will go out unauthenticated");
    }

    let client = ApiClient::new(&settings)?;
    let mut controller = FormController::new(ApiRepository::new(client));
    controller.state.set_username(args.username.as_str());

    if let Some(imei) = args.imei.as_deref() {
        let status = UserStatus::from_flag(&args.user_status).with_context(|| {
            format!("user status must be Y or N, got '{}'", args.user_status)
        })?;
        if !domain::is_valid_user_id(&args.username) {
            bail!(
                "username must be non-blank and at most {} characters",
                domain::USER_ID_MAX_CHARS
            );
        }
        if !domain::is_valid_imei(imei) {
            bail!("imei must be 1 to {} digits", domain::IMEI_MAX_DIGITS);
        }
        if !domain::is_valid_tagging(&args.tagging) {
            bail!(
                "tagging must be non-blank and at most {} characters",
                domain::TAGGING_MAX_CHARS
            );
        }

        controller.add();
        controller.state.set_imei_input(imei);
        controller.state.set_user_status(status);
        controller.state.set_tagging_input(&args.tagging);

        let payload = RegistrationPayload {
            imei_id: imei.parse().unwrap_or(0),
            user_id: args.username.clone(),
            user_status: status,
            tagging: args.tagging.clone(),
        };
        println!(
            "Submitting registration: {}",
            serde_json::to_string(&payload)?
        );

        controller.submit().await;
    } else {
        controller.show().await;
    }

    if let Some(message) = &controller.state.error_message {
        bail!("{message}");
    }

    if let Some(search) = args.search.as_deref() {
        controller.state.set_search_query(search);
    }
    print_table(&controller.state);

    Ok(())
}

fn print_table(state: &FormState) {
    let (visible, total) = state.match_counts();
    println!("Showing {visible} of {total} records");
    println!("{:<18} {:<8} {}", "IMEI", "STATUS", "TAGGING");
    for row in state.filtered_rows() {
        println!("{:<18} {:<8} {}", row.imei, row.user_status, row.tagging);
    }
}
