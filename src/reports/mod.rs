//! Sales rankings computed from the in-memory snapshot.
//!
//! Each report rebuilds the normalized-schema joins client-side with
//! [`Frame::merge`], sums `num_sales` per group and sorts descending.

pub mod html;

use anyhow::Result;

use crate::snapshot::{Frame, Snapshot, DEFAULT_SUFFIXES};

/// Row cap for the ranked reports
pub const TOP_N: usize = 20;

/// A two-column ranking ready to render
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub title: &'static str,
    pub headers: [&'static str; 2],
    pub rows: Vec<(String, f64)>,
}

/// Sort totals descending (ties keep key order) and keep the first `limit`
fn rank(mut totals: Vec<(String, f64)>, limit: Option<usize>) -> Vec<(String, f64)> {
    totals.sort_by(|a, b| b.1.total_cmp(&a.1));
    if let Some(limit) = limit {
        totals.truncate(limit);
    }
    totals
}

/// Top publishers by total sales
pub fn publishers(data: &Snapshot) -> Result<Report> {
    let merged = data.table("publisher")?.merge(
        data.table("game_publisher")?,
        "id",
        "publisher_id",
        DEFAULT_SUFFIXES,
    )?;
    let merged = merged.merge(
        data.table("game_platform")?,
        "id_y",
        "game_publisher_id",
        DEFAULT_SUFFIXES,
    )?;
    let merged = merged.merge(
        data.table("region_sales")?,
        "id",
        "game_platform_id",
        DEFAULT_SUFFIXES,
    )?;

    Ok(Report {
        title: "Top 20 Publishers by Sales",
        headers: ["publisher_name", "total_sales"],
        rows: rank(merged.sum_by("publisher_name", "num_sales")?, Some(TOP_N)),
    })
}

/// Top platforms by total sales
pub fn platforms(data: &Snapshot) -> Result<Report> {
    let merged = data.table("platform")?.merge(
        data.table("game_platform")?,
        "id",
        "platform_id",
        DEFAULT_SUFFIXES,
    )?;
    let merged = merged.merge(
        data.table("region_sales")?,
        "id_y",
        "game_platform_id",
        DEFAULT_SUFFIXES,
    )?;

    Ok(Report {
        title: "Top 20 Platforms by Sales",
        headers: ["platform_name", "total_sales"],
        rows: rank(merged.sum_by("platform_name", "num_sales")?, Some(TOP_N)),
    })
}

/// Top genres by total sales: genre → game → game_publisher → game_platform → region_sales
pub fn genres(data: &Snapshot) -> Result<Report> {
    let step1: Frame = data.table("genre")?.merge(
        data.table("game")?,
        "id",
        "genre_id",
        ("_genre", "_game"),
    )?;
    let step2 = step1.merge(
        data.table("game_publisher")?,
        "id_game",
        "game_id",
        ("_prev", "_gp"),
    )?;
    // step1 carries no bare `id`, so `id` here is game_publisher's
    let step3 = step2.merge(
        data.table("game_platform")?,
        "id",
        "game_publisher_id",
        ("_prev", "_gpl"),
    )?;
    let last = step3.merge(
        data.table("region_sales")?,
        "id_gpl",
        "game_platform_id",
        DEFAULT_SUFFIXES,
    )?;

    Ok(Report {
        title: "Top 20 Genres by Sales",
        headers: ["genre_name", "total_sales"],
        rows: rank(last.sum_by("genre_name", "num_sales")?, Some(TOP_N)),
    })
}

/// Sales per region, all regions
pub fn regions(data: &Snapshot) -> Result<Report> {
    let merged = data.table("region_sales")?.merge(
        data.table("region")?,
        "region_id",
        "id",
        DEFAULT_SUFFIXES,
    )?;

    Ok(Report {
        title: "Sales by Region",
        headers: ["region_name", "total_sales"],
        rows: rank(merged.sum_by("region_name", "num_sales")?, None),
    })
}
