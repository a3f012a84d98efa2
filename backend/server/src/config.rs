use std::{env, fmt::Display, fs::read_to_string, str::FromStr};

use tracing::{info, warn};

#[derive(Clone)]
pub struct Config {
    pub port: u16,
    pub data_path: String,
    pub email: Option<EmailConfig>,
    pub whatsapp: Option<WhatsAppConfig>,
    pub admin: AdminConfig,
}

/// Transactional email HTTP API (bearer key, JSON body).
#[derive(Clone)]
pub struct EmailConfig {
    pub api_url: String,
    pub api_key: String,
    pub from: String,
    pub to: String,
}

/// WhatsApp Cloud API endpoint used for the shop's notification chat.
#[derive(Clone)]
pub struct WhatsAppConfig {
    pub api_url: String,
    pub phone_id: String,
    pub recipient: String,
    pub token: String,
}

#[derive(Clone)]
pub struct AdminConfig {
    pub email: String,
    pub password: Option<String>,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("RUST_PORT", "1111"),
            data_path: try_load("GEAR_DATA_PATH", "data/catalog.json"),
            email: EmailConfig::load(),
            whatsapp: WhatsAppConfig::load(),
            admin: AdminConfig::load(),
        }
    }
}

impl EmailConfig {
    fn load() -> Option<Self> {
        let Some(api_key) = try_secret("EMAIL_API_KEY") else {
            warn!("EMAIL_API_KEY not set, email channel disabled");
            return None;
        };

        Some(Self {
            api_url: try_load("EMAIL_API_URL", "https://api.resend.com/emails"),
            api_key,
            from: try_load("EMAIL_FROM", "catalog@gear-safety.example"),
            to: try_load("EMAIL_TO", "sales@gear-safety.example"),
        })
    }
}

impl WhatsAppConfig {
    fn load() -> Option<Self> {
        let Some(token) = try_secret("WHATSAPP_TOKEN") else {
            warn!("WHATSAPP_TOKEN not set, WhatsApp channel disabled");
            return None;
        };
        let (Ok(phone_id), Ok(recipient)) = (
            env::var("WHATSAPP_PHONE_ID"),
            env::var("WHATSAPP_RECIPIENT"),
        ) else {
            warn!("WhatsApp channel disabled, phone id or recipient missing");
            return None;
        };

        Some(Self {
            api_url: try_load("WHATSAPP_API_URL", "https://graph.facebook.com/v19.0"),
            phone_id,
            recipient,
            token,
        })
    }
}

impl AdminConfig {
    fn load() -> Self {
        Self {
            email: try_load("ADMIN_EMAIL", "admin@gear-safety.example"),
            password: try_secret("ADMIN_PASSWORD"),
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found, using default");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}

/// Secrets come from the environment in development and from a mounted
/// `/run/secrets` file in deployment. Absence is not fatal here, the
/// feature behind the secret is simply disabled.
fn try_secret(secret_name: &str) -> Option<String> {
    if let Ok(value) = env::var(secret_name) {
        return Some(value);
    }

    let path = format!("/run/secrets/{secret_name}");

    read_to_string(&path).map(|s| s.trim().to_string()).ok()
}
