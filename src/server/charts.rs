//! PNG charts under `/charts`

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;

use super::error::{ApiError, ResultExt};
use super::{with_db, AppState};
use crate::charts::{GENRE_SALES, PLATFORM_SALES};
use crate::db;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sales-by-genre", get(sales_by_genre))
        .route("/sales-by-platform", get(sales_by_platform))
        .route("/sales-by-year", get(sales_by_year))
}

fn png(bytes: Vec<u8>) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "image/png")], bytes)
}

async fn sales_by_genre(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let charts = state.charts;
    let bytes = with_db(&state.db, move |conn| {
        charts.bar_chart(&GENRE_SALES, &db::sales_by_genre(conn)?)
    })
    .await
    .or_internal("Error drawing sales by genre")?;
    Ok(png(bytes))
}

async fn sales_by_platform(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let charts = state.charts;
    let bytes = with_db(&state.db, move |conn| {
        charts.bar_chart(&PLATFORM_SALES, &db::sales_by_platform(conn)?)
    })
    .await
    .or_internal("Error drawing sales by platform")?;
    Ok(png(bytes))
}

async fn sales_by_year(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let charts = state.charts;
    let bytes = with_db(&state.db, move |conn| charts.year_chart(&db::sales_by_year(conn)?))
        .await
        .or_internal("Error drawing sales by year")?;
    Ok(png(bytes))
}
