use crate::{
    config::ServerConfig,
    search::{Orchestrator, ResultItem, SearchError},
};
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use spotify::SpotifyError;
use thiserror::Error;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Largest page size the search endpoint accepts upstream.
const MAX_LIMIT: u32 = 50;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    query: Option<String>,
    #[serde(default = "default_limit")]
    limit: u32,
}

fn default_limit() -> u32 {
    1
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Search(#[from] SearchError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "search request failed");

        let (status, detail) = match self {
            // mirror the token endpoint's own answer
            ApiError::Search(SearchError::Auth(SpotifyError::Auth { status, body })) => {
                (status, body)
            }
            ApiError::Search(e) => (StatusCode::BAD_GATEWAY, e.to_string()),
        };

        (status, Json(serde_json::json!({ "detail": detail }))).into_response()
    }
}

pub fn router(orchestrator: Orchestrator) -> Router {
    Router::new()
        .route("/search", get(search))
        .with_state(orchestrator)
        .layer(CorsLayer::very_permissive())
        .layer(TraceLayer::new_for_http())
}

async fn search(
    State(orchestrator): State<Orchestrator>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<ResultItem>>, ApiError> {
    let limit = params.limit.clamp(1, MAX_LIMIT);
    let results = orchestrator.search(params.query.as_deref(), limit).await?;
    Ok(Json(results))
}

pub async fn start(config: &ServerConfig, orchestrator: Orchestrator) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, router(orchestrator)).await?;

    Ok(())
}
