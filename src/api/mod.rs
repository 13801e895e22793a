use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::catalog::Catalog;
use crate::qa::{find_context, AnswerExtractor};

/// Fixed answer body when no passage contains the query.
pub const NO_MATCH_ANSWER: &str = "No relevant information found.";

#[derive(Clone)]
pub struct AppState {
    catalog: Arc<Catalog>,
    extractor: Arc<dyn AnswerExtractor>,
}

/// Create and configure the API router
pub fn create_api(catalog: Arc<Catalog>, extractor: Arc<dyn AnswerExtractor>) -> Router {
    let state = AppState { catalog, extractor };

    // Fully permissive CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/answer", post(answer_handler))
        .route("/health", get(health_check))
        .layer(cors)
        .with_state(state)
}

/// Single request boundary: every internal failure comes back as an
/// `{"error": ...}` payload, never as an unhandled fault. The status code
/// is 200 either way; the body shape is the signal.
async fn answer_handler(
    State(state): State<AppState>,
    body: Option<Json<Value>>,
) -> Json<Value> {
    let payload = match body {
        Some(Json(payload)) => payload,
        None => return Json(json!({ "error": "request body must be a JSON object" })),
    };

    Json(answer_question(&state, &payload))
}

fn answer_question(state: &AppState, payload: &Value) -> Value {
    let question = match payload.get("question").and_then(|q| q.as_str()) {
        Some(question) => question,
        None => return json!({ "error": "missing required field `question`" }),
    };

    match find_context(question, state.catalog.input_texts()) {
        None => json!({ "answer": NO_MATCH_ANSWER }),
        Some(context) => match state.extractor.extract_answer(question, context) {
            Ok(extracted) => json!({ "answer": extracted.answer }),
            Err(e) => {
                log::error!("Answer extraction failed: {}", e);
                json!({ "error": e.to_string() })
            }
        },
    }
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "Server is running and healthy" }))
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::catalog::ProductRecord;
    use crate::qa::{ExtractedAnswer, ExtractionError};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::util::ServiceExt;

    struct FixedExtractor(&'static str);

    impl AnswerExtractor for FixedExtractor {
        fn extract_answer(
            &self,
            _question: &str,
            context: &str,
        ) -> Result<ExtractedAnswer, ExtractionError> {
            assert!(!context.is_empty());
            Ok(ExtractedAnswer {
                answer: self.0.to_string(),
                score: 1.0,
            })
        }
    }

    struct FailingExtractor;

    impl AnswerExtractor for FailingExtractor {
        fn extract_answer(
            &self,
            _question: &str,
            _context: &str,
        ) -> Result<ExtractedAnswer, ExtractionError> {
            Err(ExtractionError::InferenceFailed("model exploded".to_string()))
        }
    }

    fn garlic_catalog() -> Arc<Catalog> {
        let product = "Garlic Oil";
        let description = "vedic virgin oil which is very helpful for digestion";
        Arc::new(Catalog::new(vec![ProductRecord {
            id: 0,
            product: product.to_string(),
            description: description.to_string(),
            category: "Beauty & Hygiene".to_string(),
            brand: "Sri Sri Ayurveda".to_string(),
            input_text: ProductRecord::compose(product, description),
        }]))
    }

    async fn post_answer(app: Router, body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/answer")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn answers_with_extracted_span() {
        let app = create_api(garlic_catalog(), Arc::new(FixedExtractor("vedic virgin oil")));

        let (status, body) = post_answer(app, r#"{"question": "garlic"}"#).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "answer": "vedic virgin oil" }));
    }

    #[tokio::test]
    async fn no_match_returns_fixed_answer() {
        let app = create_api(garlic_catalog(), Arc::new(FixedExtractor("unused")));

        let (status, body) = post_answer(app, r#"{"question": "quantum toaster"}"#).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "answer": "No relevant information found." }));
    }

    #[tokio::test]
    async fn missing_question_key_is_an_error_payload() {
        let app = create_api(garlic_catalog(), Arc::new(FixedExtractor("unused")));

        let (status, body) = post_answer(app, r#"{"query": "garlic"}"#).await;

        assert_eq!(status, StatusCode::OK);
        let message = body["error"].as_str().unwrap();
        assert!(message.contains("question"));
    }

    #[tokio::test]
    async fn malformed_body_is_an_error_payload() {
        let app = create_api(garlic_catalog(), Arc::new(FixedExtractor("unused")));

        let (status, body) = post_answer(app, "not json at all").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.get("error").is_some());
    }

    #[tokio::test]
    async fn extraction_failure_is_an_error_payload() {
        let app = create_api(garlic_catalog(), Arc::new(FailingExtractor));

        let (status, body) = post_answer(app, r#"{"question": "garlic"}"#).await;

        assert_eq!(status, StatusCode::OK);
        let message = body["error"].as_str().unwrap();
        assert!(message.contains("model exploded"));
    }

    #[tokio::test]
    async fn health_check_responds() {
        let app = create_api(garlic_catalog(), Arc::new(FixedExtractor("unused")));

        let request = Request::builder()
            .method("GET")
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
