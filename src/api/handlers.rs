use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    models::{
        Era, Genre, QueryDraft, Recommendation, VisualStyle, GENRES_PER_QUERY, RATING_MAX,
        RATING_MIN, RUNTIME_MAX, RUNTIME_MIN,
    },
    services::{script::greeting, Accepted, SessionView, TranscriptFrame},
};

use super::AppState;

// Request/Response types

#[derive(Debug, Serialize)]
pub struct GenreOption {
    pub id: Genre,
    pub label: &'static str,
}

#[derive(Debug, Serialize)]
pub struct EraOption {
    pub id: Era,
    pub label: &'static str,
    pub first_year: u32,
    pub last_year: u32,
}

#[derive(Debug, Serialize)]
pub struct StyleOption {
    pub id: VisualStyle,
    pub label: &'static str,
}

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub greeting: String,
    pub genres_required: usize,
    pub genres: Vec<GenreOption>,
    pub eras: Vec<EraOption>,
    pub styles: Vec<StyleOption>,
    pub runtime_bounds: [u16; 2],
    pub rating_bounds: [f64; 2],
    pub defaults: QueryDraft,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Everything a form layer needs to build its controls
pub async fn get_catalog(State(state): State<AppState>) -> Json<CatalogResponse> {
    Json(CatalogResponse {
        greeting: greeting(state.controller.options()),
        genres_required: GENRES_PER_QUERY,
        genres: Genre::ALL
            .iter()
            .map(|&id| GenreOption {
                id,
                label: id.label(),
            })
            .collect(),
        eras: Era::ALL
            .iter()
            .map(|&id| {
                let (first_year, last_year) = id.release_years();
                EraOption {
                    id,
                    label: id.label(),
                    first_year,
                    last_year,
                }
            })
            .collect(),
        styles: VisualStyle::ALL
            .iter()
            .map(|&id| StyleOption {
                id,
                label: id.label(),
            })
            .collect(),
        runtime_bounds: [RUNTIME_MIN, RUNTIME_MAX],
        rating_bounds: [RATING_MIN, RATING_MAX],
        defaults: QueryDraft::default(),
    })
}

/// Render the session
pub async fn get_session(State(state): State<AppState>) -> Json<SessionView> {
    Json(state.controller.render().await)
}

/// Report the live values of the form controls
pub async fn update_query(
    State(state): State<AppState>,
    Json(draft): Json<QueryDraft>,
) -> Json<SessionView> {
    Json(state.controller.field_changed(&draft).await)
}

/// Generate recommendations for a draft
pub async fn submit(
    State(state): State<AppState>,
    Json(draft): Json<QueryDraft>,
) -> AppResult<(StatusCode, Json<Accepted>)> {
    tracing::info!(genre_count = draft.genres.len(), "Processing submission");
    let accepted = state.controller.submit(&draft).await?;
    Ok((StatusCode::ACCEPTED, Json(accepted)))
}

/// Poll the transcript
pub async fn get_transcript(State(state): State<AppState>) -> Json<TranscriptFrame> {
    Json(state.controller.poll_transcript().await)
}

/// End the session
pub async fn reset_session(State(state): State<AppState>) -> StatusCode {
    state.controller.reset().await;
    StatusCode::NO_CONTENT
}

/// Recommendations of the active submission, in display order
pub async fn get_recommendations(State(state): State<AppState>) -> Json<Vec<Recommendation>> {
    Json(state.controller.render().await.recommendations)
}

/// One recommendation by 1-based rank
pub async fn get_recommendation(
    State(state): State<AppState>,
    Path(rank): Path<usize>,
) -> AppResult<Json<Recommendation>> {
    let recommendations = state.controller.render().await.recommendations;
    recommendations
        .into_iter()
        .find(|r| r.slot.rank() == rank)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No recommendation at rank {}", rank)))
}
