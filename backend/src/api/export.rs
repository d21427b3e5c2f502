use crate::models::{AnalysisResult, ErrorResponse};
use crate::services::export;
use log::{error, info};
use rocket::http::{ContentType, Header, Status};
use rocket::post;
use rocket::request::Request;
use rocket::response::{self, Responder, Response};
use rocket::serde::json::Json;
use std::io::Cursor;

/// A JSON export served as a file download.
pub struct ExportDocument {
    pub filename: String,
    pub body: String,
}

impl<'r> Responder<'r, 'static> for ExportDocument {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        Response::build()
            .header(ContentType::JSON)
            .header(Header::new(
                "Content-Disposition",
                format!("attachment; filename=\"{}\"", self.filename),
            ))
            .sized_body(self.body.len(), Cursor::new(self.body))
            .ok()
    }
}

#[post("/export", data = "<result>")]
pub fn export_result(result: Json<AnalysisResult>) -> Result<ExportDocument, ErrorResponse> {
    let result = result.into_inner();
    let filename = export::export_filename(&result);

    match export::to_json(&result) {
        Ok(body) => {
            info!("Exporting {} as {filename}", result.session_id);
            Ok(ExportDocument { filename, body })
        }
        Err(e) => {
            error!("Failed to serialize export: {e}");
            Err(ErrorResponse {
                error: "export_failed".to_string(),
                message: e.to_string(),
                causes: Vec::new(),
                status: Status::InternalServerError,
            })
        }
    }
}
