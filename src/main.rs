mod alert;
mod analysis;
mod config;
mod console;
mod domain;
mod form;
mod gemini;
mod monitoring;
mod render;
mod state;
mod time;

use anyhow::Result;
use tracing::info;

use crate::analysis::AnalysisClient;
use crate::domain::UserProfile;
use crate::gemini::GeminiClient;
use crate::state::Dashboard;

#[tokio::main]
async fn main() -> Result<()> {
    // Load local .env if present
    let _ = dotenvy::dotenv();

    let cfg = config::Config::from_env()?;
    monitoring::init_tracing(cfg.log_json);
    info!(?cfg, "boot");

    let gemini = GeminiClient::new(
        cfg.gemini_base_url.clone(),
        cfg.gemini_model.clone(),
        cfg.api_key.clone(),
    );
    let analyzer = AnalysisClient::new(gemini, cfg.home_city.clone());

    let mut dash = Dashboard::new(UserProfile {
        name: cfg.analyst_name.clone(),
        role: cfg.analyst_role,
        last_login: String::new(),
    });

    console::run(&cfg, &analyzer, &mut dash, tokio::io::stdin(), tokio::io::stdout()).await
}
