use crate::models::StatusResponse;
use crate::AppState;
use rocket::serde::json::Json;
use rocket::{get, State};

#[get("/status")]
pub fn service_status(state: &State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        ai_mode: state.analyzer.suggestion_mode().as_str().to_string(),
        youtube_api: state.config.youtube_api_key.is_some(),
        render_service: state.config.render_service_url.is_some(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
