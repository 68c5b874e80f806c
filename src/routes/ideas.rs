use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    error::{ApiError, Result},
    models::{AnalysisOutcome, Idea, PublishOutcome},
    AppState,
};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/scan", get(scan_query))
        .route("/api/scan", post(scan_json))
        .route("/generate-lp", get(publish_query))
        .route("/api/ideas/:id/publish", post(publish_path))
        .route("/ideas", get(list_ideas))
        .route("/view/:id", get(view))
        .route("/health", get(|| async { "ok" }))
}

#[derive(Debug, Deserialize)]
struct ScanRequest {
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PublishQuery {
    id: Option<i64>,
}

#[derive(Debug, Serialize)]
struct PublishResponse {
    id: i64,
    payment_url: String,
    view_url: String,
}

#[derive(Debug, Serialize)]
struct IdeaSummary {
    id: i64,
    url: String,
    competitor_name: String,
    weaknesses: Vec<String>,
    published: bool,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Idea> for IdeaSummary {
    fn from(idea: Idea) -> Self {
        Self {
            published: idea.is_published(),
            id: idea.id,
            url: idea.source_url,
            competitor_name: idea.competitor_name,
            weaknesses: idea.weaknesses,
            created_at: idea.created_at,
        }
    }
}

async fn scan(state: &AppState, url: Option<String>) -> Result<Json<AnalysisOutcome>> {
    let url = url
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| ApiError::InvalidRequest("URL required".into()))?;

    let outcome = state.pipeline.analyze(url.trim()).await?;
    Ok(Json(outcome))
}

async fn scan_query(
    State(state): State<Arc<AppState>>,
    Query(req): Query<ScanRequest>,
) -> Result<Json<AnalysisOutcome>> {
    scan(&state, req.url).await
}

async fn scan_json(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ScanRequest>,
) -> Result<Json<AnalysisOutcome>> {
    scan(&state, req.url).await
}

async fn publish(state: &AppState, id: i64) -> Result<Json<PublishResponse>> {
    let PublishOutcome {
        destination_url,
        artifact_ref,
    } = state.pipeline.publish(id).await?;

    Ok(Json(PublishResponse {
        id: artifact_ref,
        payment_url: destination_url,
        view_url: format!(
            "{}/view/{}",
            state.config.app_url.trim_end_matches('/'),
            artifact_ref
        ),
    }))
}

async fn publish_query(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PublishQuery>,
) -> Result<Json<PublishResponse>> {
    let id = query
        .id
        .ok_or_else(|| ApiError::InvalidRequest("Idea ID required".into()))?;
    publish(&state, id).await
}

async fn publish_path(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<PublishResponse>> {
    publish(&state, id).await
}

async fn list_ideas(State(state): State<Arc<AppState>>) -> Result<Json<Vec<IdeaSummary>>> {
    let ideas = state.pipeline.store().list().await?;
    Ok(Json(ideas.into_iter().map(IdeaSummary::from).collect()))
}

async fn view(State(state): State<Arc<AppState>>, Path(id): Path<i64>) -> Result<Response> {
    let markup = state
        .pipeline
        .store()
        .get(id)
        .await?
        .and_then(|idea| idea.published_markup);

    Ok(match markup {
        Some(markup) => Html(markup).into_response(),
        None => (StatusCode::NOT_FOUND, "Not generated").into_response(),
    })
}
