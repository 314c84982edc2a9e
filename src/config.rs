use anyhow::{anyhow, Result};

use crate::domain::Role;

#[derive(Clone)]
pub struct Config {
    // AI service
    pub api_key: Option<String>,
    pub gemini_base_url: String,
    pub gemini_model: String,

    // Prompt context
    pub home_city: String,
    pub currency: String,

    // Runtime
    pub tz: String,
    pub log_json: bool,

    // Display-only profile
    pub analyst_name: String,
    pub analyst_role: Role,
}

// Hand-written so the key never lands in logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("gemini_base_url", &self.gemini_base_url)
            .field("gemini_model", &self.gemini_model)
            .field("home_city", &self.home_city)
            .field("currency", &self.currency)
            .field("tz", &self.tz)
            .field("log_json", &self.log_json)
            .field("analyst_name", &self.analyst_name)
            .field("analyst_role", &self.analyst_role)
            .finish()
    }
}

fn env_string(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// `LOG_FORMAT=json` is the only switch; anything else means plain text.
fn wants_json_logs(format: &str) -> bool {
    format.trim().eq_ignore_ascii_case("json")
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // No validation of the key itself; a bad key surfaces as a failed analysis.
        let api_key = std::env::var("API_KEY")
            .or_else(|_| std::env::var("GEMINI_API_KEY"))
            .ok()
            .filter(|k| !k.trim().is_empty());
        let gemini_base_url = env_string("GEMINI_BASE_URL", "https://generativelanguage.googleapis.com");
        let gemini_model = env_string("GEMINI_MODEL", "gemini-2.5-flash");

        let home_city = env_string("FS_HOME_CITY", "Mumbai");
        let currency = env_string("FS_CURRENCY", "INR").to_uppercase();

        let tz = env_string("FS_TZ", "Asia/Kolkata");
        if tz.parse::<chrono_tz::Tz>().is_err() {
            return Err(anyhow!("invalid FS_TZ: {tz}"));
        }
        let log_json = wants_json_logs(&env_string("LOG_FORMAT", "text"));

        let analyst_name = env_string("FS_ANALYST_NAME", "Admin User");
        let analyst_role = env_string("FS_ANALYST_ROLE", "Admin").parse::<Role>()?;

        Ok(Self {
            api_key,
            gemini_base_url,
            gemini_model,
            home_city,
            currency,
            tz,
            log_json,
            analyst_name,
            analyst_role,
        })
    }
}
