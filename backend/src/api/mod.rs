mod analyze;
mod export;
mod status;

pub use analyze::*;
pub use export::*;
pub use status::*;

#[cfg(test)]
mod tests {
    use crate::config::{create_cors, AppConfig, RenderOrder};
    use crate::services::analyzer::Analyzer;
    use crate::services::strategies::testing::FakeStrategy;
    use crate::services::strategies::{ExtractionStrategy, StrategyRegistry};
    use crate::services::suggestions::SuggestionGenerator;
    use crate::AppState;
    use rocket::http::{ContentType, Status};
    use rocket::local::asynchronous::Client;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use std::time::Duration;

    const VIDEO_URL: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";

    async fn client(structured: Arc<dyn ExtractionStrategy>) -> Client {
        let registry = StrategyRegistry::new(
            vec![structured],
            Arc::new(FakeStrategy::failing("html")),
            Arc::new(FakeStrategy::failing("browser")),
            RenderOrder::AfterHtml,
        );
        let state = AppState {
            analyzer: Analyzer::new(registry, SuggestionGenerator::mock(), Duration::from_secs(1)),
            config: AppConfig::from_lookup(|_| None),
        };
        let cors = create_cors("http://localhost:8080").unwrap();
        Client::tracked(crate::build_rocket(state, cors)).await.unwrap()
    }

    async fn post_analyze(client: &Client, body: Value) -> (Status, Value) {
        let response = client
            .post("/analyze")
            .header(ContentType::JSON)
            .body(body.to_string())
            .dispatch()
            .await;
        let status = response.status();
        (status, response.into_json::<Value>().await.unwrap())
    }

    #[rocket::async_test]
    async fn analyze_returns_result_json() {
        let client = client(Arc::new(FakeStrategy::succeeding("structured", "Never Gonna Give You Up"))).await;
        let (status, body) = post_analyze(
            &client,
            json!({"url": VIDEO_URL, "options": {"ai_analysis": false}}),
        )
        .await;

        assert_eq!(status, Status::Ok);
        assert_eq!(body["title"], "Never Gonna Give You Up");
        assert_eq!(body["kind"], "youtube_video");
        assert_eq!(body["extracted_by"], "structured");
        assert!(body["suggestions"].is_null());
    }

    #[rocket::async_test]
    async fn invalid_url_is_a_bad_request() {
        let client = client(Arc::new(FakeStrategy::succeeding("structured", "unused"))).await;
        let (status, body) = post_analyze(&client, json!({"url": "not a url"})).await;

        assert_eq!(status, Status::BadRequest);
        assert_eq!(body["error"], "invalid_url");
    }

    #[rocket::async_test]
    async fn exhausted_extraction_is_a_bad_gateway_with_causes() {
        let client = client(Arc::new(FakeStrategy::failing("structured"))).await;
        let (status, body) = post_analyze(&client, json!({"url": VIDEO_URL})).await;

        assert_eq!(status, Status::BadGateway);
        assert_eq!(body["error"], "extraction_failed");
        assert_eq!(body["causes"].as_array().unwrap().len(), 2);
    }

    #[rocket::async_test]
    async fn mock_suggestions_include_seo_analysis() {
        let client = client(Arc::new(FakeStrategy::succeeding("structured", "Baking sourdough bread"))).await;
        let (status, body) = post_analyze(&client, json!({"url": VIDEO_URL})).await;

        assert_eq!(status, Status::Ok);
        let seo = &body["suggestions"]["seo_analysis"];
        assert_eq!(seo["title_score"], 7);
        assert_eq!(seo["description_score"], 6);
        assert_eq!(seo["tags_score"], 5);
        assert_eq!(seo["main_keywords"], json!(["baking", "sourdough", "bread"]));
    }

    #[rocket::async_test]
    async fn deep_analysis_accepts_an_analysis_result() {
        let client = client(Arc::new(FakeStrategy::succeeding("structured", "Baking sourdough bread"))).await;
        let (_, result) = post_analyze(&client, json!({"url": VIDEO_URL, "options": {"ai_analysis": false}})).await;

        let response = client
            .post("/analyze/deep")
            .header(ContentType::JSON)
            .body(result.to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);

        let body = response.into_json::<Value>().await.unwrap();
        assert_eq!(body["source"], "mock");
        let markdown = body["markdown"].as_str().unwrap();
        assert!(markdown.contains("\"Baking sourdough bread\""));
        assert!(markdown.contains("Monetization Potential"));
        assert!(body.get("fallback_reason").is_none());
    }

    #[rocket::async_test]
    async fn deep_analysis_rejects_a_body_without_a_record() {
        let client = client(Arc::new(FakeStrategy::failing("structured"))).await;
        let response = client
            .post("/analyze/deep")
            .header(ContentType::JSON)
            .body(json!({"url": VIDEO_URL}).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::UnprocessableEntity);
    }

    #[rocket::async_test]
    async fn status_reports_capabilities() {
        let client = client(Arc::new(FakeStrategy::failing("structured"))).await;
        let response = client.get("/status").dispatch().await;
        assert_eq!(response.status(), Status::Ok);

        let body = response.into_json::<Value>().await.unwrap();
        assert_eq!(body["ai_mode"], "mock");
        assert_eq!(body["youtube_api"], false);
        assert_eq!(body["render_service"], false);
    }

    #[rocket::async_test]
    async fn export_serves_an_attachment() {
        let client = client(Arc::new(FakeStrategy::succeeding("structured", "Rick Roll"))).await;
        let (_, result) = post_analyze(&client, json!({"url": VIDEO_URL})).await;

        let response = client
            .post("/export")
            .header(ContentType::JSON)
            .body(result.to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);

        let disposition = response.headers().get_one("Content-Disposition").unwrap().to_string();
        assert!(disposition.starts_with("attachment; filename=\"youtube_video_analysis_Rick_Roll_"));

        let exported = response.into_json::<Value>().await.unwrap();
        assert_eq!(exported, result);
    }
}
