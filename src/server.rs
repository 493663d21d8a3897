//! HTTP adapter
//!
//! Exposes the resolver as `GET /song-key?q=...` (or `?query=...`) and
//! `POST /song-key` with a JSON body `{"query": "..."}`. Both answer with
//! `{"response": "..."}`; boundary failures answer with `{"error": "..."}`.

use crate::error::QueryError;
use crate::resolver::SongKeyResolver;
use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

#[derive(Debug, Deserialize)]
pub struct QueryParams {
    q: Option<String>,
    query: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct QueryBody {
    query: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnswerResponse {
    response: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: String,
    provider_configured: bool,
}

/// Boundary error rendered as JSON without internal details
#[derive(Debug)]
pub struct ApiError(QueryError);

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            QueryError::EmptyQuery => StatusCode::BAD_REQUEST,
            QueryError::Internal(detail) => {
                tracing::error!("Request failed: {}", detail);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = ErrorResponse {
            error: self.0.public_message().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

pub fn create_router(resolver: Arc<SongKeyResolver>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/song-key", get(song_key_get).post(song_key_post))
        .with_state(resolver)
        .layer(TraceLayer::new_for_http())
        // Browser front-ends call this from other origins
        .layer(CorsLayer::permissive())
}

/// Serve the HTTP adapter until the process is stopped
pub async fn run(resolver: Arc<SongKeyResolver>, addr: SocketAddr) -> Result<()> {
    let app = create_router(resolver);

    tracing::info!("Starting HTTP server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    axum::serve(listener, app).await.context("HTTP server error")?;
    Ok(())
}

async fn health(State(resolver): State<Arc<SongKeyResolver>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        provider_configured: resolver.client().is_configured(),
    })
}

async fn song_key_get(
    State(resolver): State<Arc<SongKeyResolver>>,
    Query(params): Query<QueryParams>,
) -> Result<Json<AnswerResponse>, ApiError> {
    // First non-blank of `q` and `query`
    let query = params
        .q
        .filter(|q| !q.trim().is_empty())
        .or(params.query);
    answer(resolver, query).await
}

async fn song_key_post(
    State(resolver): State<Arc<SongKeyResolver>>,
    body: Option<Json<QueryBody>>,
) -> Result<Json<AnswerResponse>, ApiError> {
    let query = body.and_then(|Json(body)| body.query);
    answer(resolver, query).await
}

/// Resolve on a separate task so a panic becomes a 500, not a dropped connection
async fn answer(
    resolver: Arc<SongKeyResolver>,
    query: Option<String>,
) -> Result<Json<AnswerResponse>, ApiError> {
    let task = tokio::spawn(async move { resolver.answer(query.as_deref()).await });

    let response = task
        .await
        .map_err(|e| QueryError::Internal(e.to_string()))??;

    Ok(Json(AnswerResponse { response }))
}
