use crate::env_variable_utils::BACKEND_URL;
use crate::models::{
    AnalysisOptions, AnalysisResult, AnalyzeRequest, ContentRecord, DeepAnalysis, ErrorResponse,
    StatusResponse,
};
use crate::utils::attachment_filename;
use gloo_net::http::{Request, Response};
use yew::prelude::*;

pub async fn analyze_url(
    url: String,
    options: AnalysisOptions,
    result: UseStateHandle<Option<AnalysisResult>>,
    error: UseStateHandle<Option<ErrorResponse>>,
    loading: UseStateHandle<bool>,
) {
    let endpoint = format!("{}/analyze", &*BACKEND_URL);
    let body = AnalyzeRequest { url, options };

    let response = match Request::post(&endpoint).json(&body) {
        Ok(request) => request.send().await,
        Err(e) => Err(e),
    };

    match response {
        Ok(response) if response.ok() => match response.json::<AnalysisResult>().await {
            Ok(analysis) => {
                log::info!(
                    "Analysis {} finished via {}",
                    analysis.session_id,
                    analysis.record.extracted_by
                );
                result.set(Some(analysis));
                error.set(None);
            }
            Err(e) => handle_error(&error, format!("Failed to parse response: {e}")),
        },
        Ok(response) => error.set(Some(read_error(response).await)),
        Err(e) => handle_error(&error, format!("Failed to connect to backend: {e}")),
    }

    loading.set(false);
}

pub async fn load_status() -> Result<StatusResponse, String> {
    let endpoint = format!("{}/status", &*BACKEND_URL);

    let response = Request::get(&endpoint)
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if response.ok() {
        response
            .json::<StatusResponse>()
            .await
            .map_err(|e| format!("JSON parse error: {}", e))
    } else {
        Err(format!("HTTP error: {}", response.status()))
    }
}

pub async fn deep_analysis(record: &ContentRecord) -> Result<DeepAnalysis, String> {
    let endpoint = format!("{}/analyze/deep", &*BACKEND_URL);

    let response = Request::post(&endpoint)
        .json(record)
        .map_err(|e| format!("Request error: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if !response.ok() {
        return Err(format!("HTTP error: {}", response.status()));
    }

    response
        .json::<DeepAnalysis>()
        .await
        .map_err(|e| format!("JSON parse error: {}", e))
}

/// Asks the backend to render the export document. Returns `(filename, body)`.
pub async fn export_result(result: &AnalysisResult) -> Result<(String, String), String> {
    let endpoint = format!("{}/export", &*BACKEND_URL);

    let response = Request::post(&endpoint)
        .json(result)
        .map_err(|e| format!("Request error: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if !response.ok() {
        return Err(format!("HTTP error: {}", response.status()));
    }

    let filename = response
        .headers()
        .get("content-disposition")
        .and_then(|d| attachment_filename(&d))
        .unwrap_or_else(|| format!("analysis_{}.json", result.session_id));
    let body = response
        .text()
        .await
        .map_err(|e| format!("Failed to read export: {}", e))?;

    Ok((filename, body))
}

async fn read_error(response: Response) -> ErrorResponse {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();

    // Structured error body first, raw text otherwise
    serde_json::from_str::<ErrorResponse>(&text).unwrap_or_else(|_| ErrorResponse {
        error: "http_error".to_string(),
        message: format!("Analysis failed ({}): {}", status, text),
        causes: Vec::new(),
    })
}

fn handle_error(error: &UseStateHandle<Option<ErrorResponse>>, message: String) {
    web_sys::console::error_1(&message.clone().into());
    error.set(Some(ErrorResponse {
        error: "client_error".to_string(),
        message,
        causes: Vec::new(),
    }));
}
