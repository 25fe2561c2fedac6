//! HTML sales tables under `/tables`, computed from the snapshot

use anyhow::Result;
use axum::extract::State;
use axum::response::Html;
use axum::routing::get;
use axum::Router;

use super::error::HtmlError;
use super::AppState;
use crate::reports::{self, html::render_page, Report};
use crate::snapshot::Snapshot;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/publishers", get(publishers))
        .route("/platforms", get(platforms))
        .route("/genres", get(genres))
        .route("/regions", get(regions))
}

fn render(
    state: &AppState,
    build: fn(&Snapshot) -> Result<Report>,
) -> Result<Html<String>, HtmlError> {
    let snapshot = match state.snapshot.as_ref() {
        Ok(snapshot) => snapshot,
        Err(reason) => {
            return Err(HtmlError(format!("Snapshot data is unavailable: {}", reason)));
        }
    };

    let report = build(snapshot).map_err(|err| HtmlError(format!("{:#}", err)))?;
    Ok(Html(render_page(&report)))
}

async fn publishers(State(state): State<AppState>) -> Result<Html<String>, HtmlError> {
    render(&state, reports::publishers)
}

async fn platforms(State(state): State<AppState>) -> Result<Html<String>, HtmlError> {
    render(&state, reports::platforms)
}

async fn genres(State(state): State<AppState>) -> Result<Html<String>, HtmlError> {
    render(&state, reports::genres)
}

async fn regions(State(state): State<AppState>) -> Result<Html<String>, HtmlError> {
    render(&state, reports::regions)
}
