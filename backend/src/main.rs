#[macro_use]
extern crate rocket;

mod api;
mod config;
mod error;
mod models;
mod services;
mod utils;

use config::AppConfig;
use rocket::{Build, Rocket};
use services::analyzer::Analyzer;

pub struct AppState {
    pub analyzer: Analyzer,
    pub config: AppConfig,
}

pub fn build_rocket(state: AppState, cors: rocket_cors::Cors) -> Rocket<Build> {
    rocket::build()
        .manage(state)
        .mount(
            "/",
            routes![
                api::analyze_url,
                api::analyze_deep,
                api::export_result,
                api::service_status
            ],
        )
        .attach(cors)
}

#[rocket::main]
async fn main() -> anyhow::Result<()> {
    config::load_environment();
    config::init_logger();

    let app_config = AppConfig::from_env();
    let cors = config::create_cors(&app_config.frontend_origin)?;
    let state = config::create_app_state(app_config)?;

    build_rocket(state, cors)
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("Rocket failed to launch: {e}"))?;

    Ok(())
}
