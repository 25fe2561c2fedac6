//! CRUD routes for `/games`

use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};

use super::error::{ApiError, ResultExt};
use super::{with_db, AppState};
use crate::db::{self, Game, GameUpdate, NewGame};

pub async fn create_game(
    State(state): State<AppState>,
    Json(game): Json<NewGame>,
) -> Result<Json<Value>, ApiError> {
    let id = with_db(&state.db, move |conn| db::create_game(conn, &game))
        .await
        .or_internal("Error creating game")?;

    log::info!("Created game {}", id);
    Ok(Json(json!({ "message": "Game created successfully!", "id": id })))
}

pub async fn list_games(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let games = with_db(&state.db, db::list_games)
        .await
        .or_internal("Error fetching games")?;

    Ok(Json(json!({ "games": games })))
}

pub async fn get_game(
    State(state): State<AppState>,
    Path(game_id): Path<i64>,
) -> Result<Json<Game>, ApiError> {
    with_db(&state.db, move |conn| db::get_game(conn, game_id))
        .await
        .or_internal("Error fetching game")?
        .map(Json)
        .ok_or(ApiError::GameNotFound)
}

pub async fn update_game(
    State(state): State<AppState>,
    Path(game_id): Path<i64>,
    Json(update): Json<GameUpdate>,
) -> Result<Json<Value>, ApiError> {
    let changed = with_db(&state.db, move |conn| db::update_game(conn, game_id, &update))
        .await
        .or_internal("Error updating game")?;

    log::info!("Updated game {} ({} rows)", game_id, changed);
    Ok(Json(json!({ "message": "Game updated successfully!" })))
}

pub async fn delete_game(
    State(state): State<AppState>,
    Path(game_id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let removed = with_db(&state.db, move |conn| db::delete_game(conn, game_id))
        .await
        .or_internal("Error deleting game")?;

    log::info!("Deleted game {} ({} rows)", game_id, removed);
    Ok(Json(json!({ "message": "Game deleted successfully!" })))
}
