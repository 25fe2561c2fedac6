//! Fixed analytical queries under `/games`

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use super::error::{ApiError, ResultExt};
use super::{with_db, AppState};
use crate::db::{self, GameRelease, PlatformCount, PublisherSales, YearCount};

#[derive(Debug, Deserialize)]
pub struct GenreParams {
    pub genre: String,
}

#[derive(Debug, Deserialize)]
pub struct YearParams {
    pub year: i64,
    pub platform: String,
}

pub async fn games_by_genre(
    State(state): State<AppState>,
    Query(params): Query<GenreParams>,
) -> Result<Json<Vec<GameRelease>>, ApiError> {
    let rows = with_db(&state.db, move |conn| db::games_by_genre(conn, &params.genre))
        .await
        .or_internal("Error querying games by genre")?;
    Ok(Json(rows))
}

pub async fn games_by_year(
    State(state): State<AppState>,
    Query(params): Query<YearParams>,
) -> Result<Json<Vec<GameRelease>>, ApiError> {
    let rows = with_db(&state.db, move |conn| {
        db::games_by_year_and_platform(conn, params.year, &params.platform)
    })
    .await
    .or_internal("Error querying games by year")?;
    Ok(Json(rows))
}

pub async fn publisher_sales(
    State(state): State<AppState>,
) -> Result<Json<Vec<PublisherSales>>, ApiError> {
    let rows = with_db(&state.db, db::sales_by_publisher)
        .await
        .or_internal("Error querying publisher sales")?;
    Ok(Json(rows))
}

pub async fn platform_count(
    State(state): State<AppState>,
) -> Result<Json<Vec<PlatformCount>>, ApiError> {
    let rows = with_db(&state.db, db::game_count_by_platform)
        .await
        .or_internal("Error querying platform counts")?;
    Ok(Json(rows))
}

pub async fn top_release_year(
    State(state): State<AppState>,
) -> Result<Json<Vec<YearCount>>, ApiError> {
    let rows = with_db(&state.db, db::top_release_years)
        .await
        .or_internal("Error querying release years")?;
    Ok(Json(rows))
}
