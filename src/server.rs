use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use serde_json::Value;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::debug;

use crate::pipeline::PetitionPipeline;
use crate::stages::PetitionResult;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<PetitionPipeline>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

impl IntoResponse for PetitionResult {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.body)).into_response()
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/health", get(health_check))
        .route("/api/generate-petition", post(generate_petition))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}

/// GET /health
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// POST /api/generate-petition
///
/// The body is read raw so that a missing or malformed payload reaches the
/// validation policy instead of being rejected by the extractor.
async fn generate_petition(State(state): State<AppState>, body: Bytes) -> PetitionResult {
    let payload: Option<Value> = if body.is_empty() {
        None
    } else {
        match serde_json::from_slice(&body) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!("Ignoring undecodable request body: {}", e);
                None
            }
        }
    };

    state.pipeline.handle(payload.as_ref()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request};
    use tower::ServiceExt;

    use crate::error::Result;
    use crate::llm::{ComposedPrompt, TextGenerator};
    use crate::pipeline::PipelineConfig;

    struct CannedGenerator;

    #[async_trait]
    impl TextGenerator for CannedGenerator {
        async fn generate(&self, _prompt: &ComposedPrompt) -> Result<String> {
            Ok("EXCELENTÍSSIMO(A) SENHOR(A)".to_string())
        }

        fn model(&self) -> &str {
            "canned"
        }
    }

    fn app() -> Router {
        let pipeline = PetitionPipeline::new(Arc::new(CannedGenerator), PipelineConfig::default());
        create_router(AppState {
            pipeline: Arc::new(pipeline),
        })
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_petition(body: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/generate-petition")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, serde_json::json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn test_generate_petition_success() {
        let response = app()
            .oneshot(post_petition(r#"{"author-name": "Maria", "problem-type": "improper-billing"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"text": "EXCELENTÍSSIMO(A) SENHOR(A)"})
        );
    }

    #[tokio::test]
    async fn test_empty_and_malformed_bodies_are_input_errors() {
        for body in ["{}", "", "not json"] {
            let response = app().oneshot(post_petition(body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{body:?}");
            assert_eq!(body_json(response).await["code"], "INVALID_INPUT");
        }
    }
}
