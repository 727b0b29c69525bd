use std::sync::Arc;

use axum::http::StatusCode;
use axum::{Json, Router, routing::post};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::error::LingdbError;
use crate::interface::{QueryDescription, QueryInterface, QueryReply};

#[derive(Deserialize)]
pub struct QueryRequest {
    #[serde(default)]
    pub semester: Option<String>,
    pub queries: Vec<QueryDescription>,
}

#[derive(Serialize)]
pub struct QueryResponse {
    pub status: String,
    pub elapsed_ms: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replies: Option<Vec<QueryReply>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub fn router(interface: Arc<QueryInterface>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([axum::http::Method::POST])
        .allow_headers(Any);
    Router::new()
        .route(
            "/v1/query",
            post(move |Json(req): Json<QueryRequest>| {
                let iface = Arc::clone(&interface);
                async move {
                    // The engine is synchronous, so run it on a blocking thread.
                    let started = std::time::Instant::now();
                    let result = tokio::task::spawn_blocking(move || {
                        iface.run(req.semester.as_deref(), &req.queries)
                    })
                    .await
                    .map_err(|e| {
                        warn!(error=%e, "Join error");
                        (StatusCode::INTERNAL_SERVER_ERROR, "Join error")
                    })?;
                    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
                    match result {
                        Ok(replies) => {
                            info!(ms = elapsed_ms, queries = replies.len(), "queries complete");
                            let body = QueryResponse {
                                status: "ok".into(),
                                elapsed_ms,
                                replies: Some(replies),
                                error: None,
                            };
                            Ok::<_, (StatusCode, &'static str)>((StatusCode::OK, Json(body)))
                        }
                        Err(e) => {
                            // validation failures are the caller's to fix
                            let status = match e {
                                LingdbError::UnknownProperty { .. }
                                | LingdbError::NoProperty { .. }
                                | LingdbError::TypeMismatch { .. }
                                | LingdbError::MissingValue { .. }
                                | LingdbError::UnrecognizedMode(_)
                                | LingdbError::Quorum { .. } => StatusCode::BAD_REQUEST,
                                _ => StatusCode::INTERNAL_SERVER_ERROR,
                            };
                            let msg = format!("{e}");
                            warn!(%msg, code=%status.as_u16(), "query error");
                            let body = QueryResponse {
                                status: "error".into(),
                                elapsed_ms,
                                replies: None,
                                error: Some(msg),
                            };
                            Ok::<_, (StatusCode, &'static str)>((status, Json(body)))
                        }
                    }
                }
            }),
        )
        .layer(cors)
}
