use std::{collections::HashMap, fs};

/// Settings file consulted when the caller does not name one.
pub const DEFAULT_SETTINGS_FILE: &str = "registration.toml";

#[derive(Debug, Clone)]
pub struct Settings {
    pub api_base_url: String,
    pub api_version: String,
    pub api_timeout_ms: u64,
    pub api_token: String,
    pub endpoint_user_status: String,
    pub endpoint_user_register: String,
    pub network_timeout_secs: u64,
    pub retry_attempts: u32,
    pub app_version: String,
    pub build_type: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.valsgroup.com".into(),
            api_version: "v1".into(),
            api_timeout_ms: 30_000,
            api_token: String::new(),
            endpoint_user_status: "/vtp/userstatus".into(),
            endpoint_user_register: "/vtp/imeireg".into(),
            network_timeout_secs: 30,
            retry_attempts: 3,
            app_version: "1.0.0".into(),
            build_type: "debug".into(),
        }
    }
}

impl Settings {
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}{endpoint}", self.api_base_url)
    }

    pub fn versioned_endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{}{endpoint}", self.api_base_url, self.api_version)
    }

    pub fn register_url(&self) -> String {
        self.endpoint_url(&self.endpoint_user_register)
    }

    pub fn user_status_url(&self) -> String {
        self.endpoint_url(&self.endpoint_user_status)
    }
}

pub fn load_settings() -> Settings {
    load_settings_from(DEFAULT_SETTINGS_FILE)
}

/// Resolution order per key: default, then settings file, then environment.
/// Malformed numeric values are ignored at whichever layer they appear.
pub fn load_settings_from(path: &str) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(&raw) {
            if let Some(v) = file_cfg.get("API_BASE_URL") {
                settings.api_base_url = v.clone();
            }
            if let Some(v) = file_cfg.get("API_VERSION") {
                settings.api_version = v.clone();
            }
            if let Some(v) = file_cfg.get("API_TIMEOUT") {
                if let Ok(parsed) = v.parse::<u64>() {
                    settings.api_timeout_ms = parsed;
                }
            }
            if let Some(v) = file_cfg.get("API_TOKEN") {
                settings.api_token = v.clone();
            }
            if let Some(v) = file_cfg.get("ENDPOINT_USER_STATUS") {
                settings.endpoint_user_status = v.clone();
            }
            if let Some(v) = file_cfg.get("ENDPOINT_USER_REGISTER") {
                settings.endpoint_user_register = v.clone();
            }
            if let Some(v) = file_cfg.get("NETWORK_TIMEOUT") {
                if let Ok(parsed) = v.parse::<u64>() {
                    settings.network_timeout_secs = parsed;
                }
            }
            if let Some(v) = file_cfg.get("RETRY_ATTEMPTS") {
                if let Ok(parsed) = v.parse::<u32>() {
                    settings.retry_attempts = parsed;
                }
            }
            if let Some(v) = file_cfg.get("APP_VERSION") {
                settings.app_version = v.clone();
            }
            if let Some(v) = file_cfg.get("BUILD_TYPE") {
                settings.build_type = v.clone();
            }
        }
    }

    if let Ok(v) = std::env::var("API_BASE_URL") {
        settings.api_base_url = v;
    }
    if let Ok(v) = std::env::var("APP__API_BASE_URL") {
        settings.api_base_url = v;
    }

    if let Ok(v) = std::env::var("API_VERSION") {
        settings.api_version = v;
    }
    if let Ok(v) = std::env::var("APP__API_VERSION") {
        settings.api_version = v;
    }

    if let Ok(v) = std::env::var("API_TIMEOUT") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.api_timeout_ms = parsed;
        }
    }
    if let Ok(v) = std::env::var("APP__API_TIMEOUT") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.api_timeout_ms = parsed;
        }
    }

    if let Ok(v) = std::env::var("API_TOKEN") {
        settings.api_token = v;
    }
    if let Ok(v) = std::env::var("APP__API_TOKEN") {
        settings.api_token = v;
    }

    if let Ok(v) = std::env::var("ENDPOINT_USER_STATUS") {
        settings.endpoint_user_status = v;
    }
    if let Ok(v) = std::env::var("APP__ENDPOINT_USER_STATUS") {
        settings.endpoint_user_status = v;
    }

    if let Ok(v) = std::env::var("ENDPOINT_USER_REGISTER") {
        settings.endpoint_user_register = v;
    }
    if let Ok(v) = std::env::var("APP__ENDPOINT_USER_REGISTER") {
        settings.endpoint_user_register = v;
    }

    if let Ok(v) = std::env::var("NETWORK_TIMEOUT") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.network_timeout_secs = parsed;
        }
    }
    if let Ok(v) = std::env::var("APP__NETWORK_TIMEOUT") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.network_timeout_secs = parsed;
        }
    }

    if let Ok(v) = std::env::var("RETRY_ATTEMPTS") {
        if let Ok(parsed) = v.parse::<u32>() {
            settings.retry_attempts = parsed;
        }
    }
    if let Ok(v) = std::env::var("APP__RETRY_ATTEMPTS") {
        if let Ok(parsed) = v.parse::<u32>() {
            settings.retry_attempts = parsed;
        }
    }

    if let Ok(v) = std::env::var("APP_VERSION") {
        settings.app_version = v;
    }
    if let Ok(v) = std::env::var("APP__APP_VERSION") {
        settings.app_version = v;
    }

    if let Ok(v) = std::env::var("BUILD_TYPE") {
        settings.build_type = v;
    }
    if let Ok(v) = std::env::var("APP__BUILD_TYPE") {
        settings.build_type = v;
    }

    settings
}
