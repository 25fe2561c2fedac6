//! Fixed analytical queries over the normalized schema

use anyhow::{Context, Result};
use rusqlite::{params, Connection, Row};
use serde::Serialize;

/// Row cap for the search queries
pub const SEARCH_LIMIT: i64 = 50;
/// Row cap for the release-year ranking
pub const TOP_YEARS_LIMIT: i64 = 20;

/// A game released on a platform
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameRelease {
    pub game_name: String,
    pub platform_name: Option<String>,
    pub release_year: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublisherSales {
    pub publisher_name: Option<String>,
    pub total_sales: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformCount {
    pub platform_name: Option<String>,
    pub total_games: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearCount {
    pub release_year: i64,
    pub total_games: i64,
}

/// Sales total for a labelled group, used by the charts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesTotal {
    pub label: String,
    pub num_sales: f64,
}

/// Sales total for one release year
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearSales {
    pub release_year: Option<i64>,
    pub num_sales: f64,
}

fn game_release(row: &Row) -> rusqlite::Result<GameRelease> {
    Ok(GameRelease {
        game_name: row.get(0)?,
        platform_name: row.get(1)?,
        release_year: row.get(2)?,
    })
}

fn like_pattern(term: &str) -> String {
    format!("%{}%", term)
}

/// Games whose genre name contains `genre`
pub fn games_by_genre(conn: &Connection, genre: &str) -> Result<Vec<GameRelease>> {
    let mut stmt = conn.prepare(
        "SELECT game.game_name, platform.platform_name, game_platform.release_year
         FROM game
         JOIN genre ON genre.id = game.genre_id
         JOIN game_publisher ON game_publisher.game_id = game.id
         JOIN game_platform ON game_platform.game_publisher_id = game_publisher.id
         JOIN platform ON platform.id = game_platform.platform_id
         WHERE genre.genre_name LIKE ?1
         LIMIT ?2",
    )?;

    let rows = stmt
        .query_map(params![like_pattern(genre), SEARCH_LIMIT], game_release)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to query games by genre")?;
    Ok(rows)
}

/// Games released in `year` on a platform whose name contains `platform`
pub fn games_by_year_and_platform(
    conn: &Connection,
    year: i64,
    platform: &str,
) -> Result<Vec<GameRelease>> {
    let mut stmt = conn.prepare(
        "SELECT g.game_name, p.platform_name, gpl.release_year
         FROM game g
         INNER JOIN game_publisher gp ON g.id = gp.game_id
         INNER JOIN game_platform gpl ON gp.id = gpl.game_publisher_id
         INNER JOIN platform p ON gpl.platform_id = p.id
         WHERE gpl.release_year = ?1
           AND p.platform_name LIKE ?2
         LIMIT ?3",
    )?;

    let rows = stmt
        .query_map(params![year, like_pattern(platform), SEARCH_LIMIT], game_release)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to query games by year and platform")?;
    Ok(rows)
}

pub fn sales_by_publisher(conn: &Connection) -> Result<Vec<PublisherSales>> {
    let mut stmt = conn.prepare(
        "SELECT pub.publisher_name, SUM(rs.num_sales) AS total_sales
         FROM publisher pub
         JOIN game_publisher gp ON pub.id = gp.publisher_id
         JOIN game_platform gpl ON gp.id = gpl.game_publisher_id
         JOIN region_sales rs ON gpl.id = rs.game_platform_id
         GROUP BY pub.publisher_name
         ORDER BY total_sales DESC",
    )?;

    let rows = stmt
        .query_map([], |row| {
            Ok(PublisherSales {
                publisher_name: row.get(0)?,
                total_sales: row.get::<_, Option<f64>>(1)?.unwrap_or(0.0),
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to query sales by publisher")?;
    Ok(rows)
}

pub fn game_count_by_platform(conn: &Connection) -> Result<Vec<PlatformCount>> {
    let mut stmt = conn.prepare(
        "SELECT p.platform_name, COUNT(*) AS total_games
         FROM platform p
         JOIN game_platform gpl ON p.id = gpl.platform_id
         GROUP BY p.platform_name
         ORDER BY total_games DESC",
    )?;

    let rows = stmt
        .query_map([], |row| {
            Ok(PlatformCount {
                platform_name: row.get(0)?,
                total_games: row.get(1)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to query game count by platform")?;
    Ok(rows)
}

/// Release years ranked by number of releases
pub fn top_release_years(conn: &Connection) -> Result<Vec<YearCount>> {
    let mut stmt = conn.prepare(
        "SELECT gp.release_year, COUNT(*) AS total_games
         FROM game g
         JOIN game_publisher gpub ON g.id = gpub.game_id
         JOIN game_platform gp ON gpub.id = gp.game_publisher_id
         WHERE gp.release_year IS NOT NULL
         GROUP BY gp.release_year
         ORDER BY total_games DESC
         LIMIT ?1",
    )?;

    let rows = stmt
        .query_map([TOP_YEARS_LIMIT], |row| {
            Ok(YearCount {
                release_year: row.get(0)?,
                total_games: row.get(1)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to query top release years")?;
    Ok(rows)
}

// =============================================================================
// Chart aggregates
// =============================================================================

fn sales_totals(conn: &Connection, sql: &str, what: &str) -> Result<Vec<SalesTotal>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(SalesTotal {
                label: row.get::<_, Option<String>>(0)?.unwrap_or_default(),
                num_sales: row.get::<_, Option<f64>>(1)?.unwrap_or(0.0),
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| format!("Failed to query sales by {}", what))?;
    Ok(rows)
}

pub fn sales_by_genre(conn: &Connection) -> Result<Vec<SalesTotal>> {
    sales_totals(
        conn,
        "SELECT g.genre_name, SUM(rs.num_sales) AS num_sales
         FROM genre g
         JOIN game g2 ON g.id = g2.genre_id
         JOIN game_publisher gp ON gp.game_id = g2.id
         JOIN game_platform gpl ON gpl.game_publisher_id = gp.id
         JOIN region_sales rs ON rs.game_platform_id = gpl.id
         GROUP BY g.genre_name
         ORDER BY num_sales DESC",
        "genre",
    )
}

pub fn sales_by_platform(conn: &Connection) -> Result<Vec<SalesTotal>> {
    sales_totals(
        conn,
        "SELECT p.platform_name, SUM(rs.num_sales) AS num_sales
         FROM platform p
         JOIN game_platform gp ON p.id = gp.platform_id
         JOIN region_sales rs ON rs.game_platform_id = gp.id
         GROUP BY p.platform_name
         ORDER BY num_sales DESC",
        "platform",
    )
}

/// Sales per release year in ascending year order
pub fn sales_by_year(conn: &Connection) -> Result<Vec<YearSales>> {
    let mut stmt = conn.prepare(
        "SELECT gp.release_year, SUM(rs.num_sales) AS num_sales
         FROM game_platform gp
         JOIN region_sales rs ON rs.game_platform_id = gp.id
         GROUP BY gp.release_year
         ORDER BY gp.release_year",
    )?;

    let rows = stmt
        .query_map([], |row| {
            Ok(YearSales {
                release_year: row.get(0)?,
                num_sales: row.get::<_, Option<f64>>(1)?.unwrap_or(0.0),
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to query sales by year")?;
    Ok(rows)
}
