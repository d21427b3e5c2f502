use crate::error::AnalysisError;
use crate::models::{AnalysisResult, AnalyzeRequest, ContentRecord, DeepAnalysis, ErrorResponse};
use crate::AppState;
use log::{error, info};
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{post, State};

impl From<AnalysisError> for ErrorResponse {
    fn from(e: AnalysisError) -> Self {
        let (status, error) = match &e {
            AnalysisError::InvalidUrl { .. } => (Status::BadRequest, "invalid_url"),
            AnalysisError::ExtractionFailed { .. } => (Status::BadGateway, "extraction_failed"),
            AnalysisError::SuggestionUnavailable(_) => {
                (Status::InternalServerError, "suggestion_unavailable")
            }
        };
        ErrorResponse {
            error: error.to_string(),
            message: e.to_string(),
            causes: e.causes(),
            status,
        }
    }
}

#[post("/analyze", data = "<request>")]
pub async fn analyze_url(
    request: Json<AnalyzeRequest>,
    state: &State<AppState>,
) -> Result<Json<AnalysisResult>, ErrorResponse> {
    let AnalyzeRequest { url, options } = request.into_inner();

    match state.analyzer.analyze(&url, options).await {
        Ok(result) => {
            info!("Analysis {} complete for {url}", result.session_id);
            Ok(Json(result))
        }
        Err(e) => {
            error!("Analysis failed for {url}: {e}");
            Err(e.into())
        }
    }
}

/// Accepts a bare record or a full analysis result; extra fields are ignored.
#[post("/analyze/deep", data = "<record>")]
pub async fn analyze_deep(record: Json<ContentRecord>, state: &State<AppState>) -> Json<DeepAnalysis> {
    Json(state.analyzer.deep_analysis(&record).await)
}
