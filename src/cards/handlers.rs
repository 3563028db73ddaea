use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use tracing::{info, instrument};

use crate::cards::dto::{CardRequest, Pagination};
use crate::cards::repo::{self, Card};
use crate::error::ApiError;
use crate::state::AppState;

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/cards", get(list_cards))
        .route("/cards/:id", get(get_card))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/cards", post(create_card))
        .route("/cards/:id", put(update_card))
        .route("/cards/:id", delete(delete_card))
}

#[instrument(skip(state, payload))]
pub async fn create_card(
    State(state): State<AppState>,
    Json(payload): Json<CardRequest>,
) -> Result<(StatusCode, Json<Card>), ApiError> {
    let card = repo::create(&state.db, &payload.title, &payload.image)
        .await
        .map_err(ApiError::internal)?;
    info!(card_id = card.id, "card created");
    Ok((StatusCode::CREATED, Json(card)))
}

#[instrument(skip(state))]
pub async fn list_cards(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<Card>>, ApiError> {
    let limit = page.limit.clamp(0, 100);
    let skip = page.skip.max(0);
    let cards = repo::list(&state.db, skip, limit)
        .await
        .map_err(ApiError::internal)?;
    Ok(Json(cards))
}

#[instrument(skip(state))]
pub async fn get_card(
    State(state): State<AppState>,
    Path(card_id): Path<i64>,
) -> Result<Json<Card>, ApiError> {
    repo::get(&state.db, card_id)
        .await
        .map_err(ApiError::internal)?
        .map(Json)
        .ok_or(ApiError::NotFound("Card"))
}

#[instrument(skip(state, payload))]
pub async fn update_card(
    State(state): State<AppState>,
    Path(card_id): Path<i64>,
    Json(payload): Json<CardRequest>,
) -> Result<Json<Card>, ApiError> {
    repo::update(&state.db, card_id, &payload.title, &payload.image)
        .await
        .map_err(ApiError::internal)?
        .map(Json)
        .ok_or(ApiError::NotFound("Card"))
}

#[instrument(skip(state))]
pub async fn delete_card(
    State(state): State<AppState>,
    Path(card_id): Path<i64>,
) -> Result<Json<Card>, ApiError> {
    let card = repo::delete(&state.db, card_id)
        .await
        .map_err(ApiError::internal)?
        .ok_or(ApiError::NotFound("Card"))?;
    info!(card_id = card.id, "card deleted");
    Ok(Json(card))
}
