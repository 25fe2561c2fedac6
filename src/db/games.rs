//! CRUD statements for the `game` table

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

/// A row of the `game` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: i64,
    pub game_name: String,
    pub genre_id: Option<i64>,
    pub publisher_id: Option<i64>,
    pub release_year: Option<i64>,
}

impl Game {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            game_name: row.get("game_name")?,
            genre_id: row.get("genre_id")?,
            publisher_id: row.get("publisher_id")?,
            release_year: row.get("release_year")?,
        })
    }
}

/// Payload for creating a game; every field is required
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGame {
    pub game_name: String,
    pub genre_id: i64,
    pub publisher_id: i64,
    pub release_year: i64,
}

/// Partial update; absent fields keep their stored value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameUpdate {
    #[serde(default)]
    pub game_name: Option<String>,
    #[serde(default)]
    pub genre_id: Option<i64>,
    #[serde(default)]
    pub publisher_id: Option<i64>,
    #[serde(default)]
    pub release_year: Option<i64>,
}

const SELECT_GAME: &str =
    "SELECT id, game_name, genre_id, publisher_id, release_year FROM game";

/// Insert a game and return its new id
pub fn create_game(conn: &Connection, game: &NewGame) -> Result<i64> {
    conn.execute(
        "INSERT INTO game (game_name, genre_id, publisher_id, release_year)
         VALUES (?1, ?2, ?3, ?4)",
        params![game.game_name, game.genre_id, game.publisher_id, game.release_year],
    )
    .context("Failed to insert game")?;

    Ok(conn.last_insert_rowid())
}

pub fn list_games(conn: &Connection) -> Result<Vec<Game>> {
    let mut stmt = conn.prepare(&format!("{SELECT_GAME} ORDER BY id"))?;
    let games = stmt
        .query_map([], Game::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to read games")?;
    Ok(games)
}

pub fn get_game(conn: &Connection, id: i64) -> Result<Option<Game>> {
    conn.query_row(&format!("{SELECT_GAME} WHERE id = ?1"), [id], Game::from_row)
        .optional()
        .with_context(|| format!("Failed to read game {}", id))
}

/// Apply a partial update; returns the number of rows touched
pub fn update_game(conn: &Connection, id: i64, update: &GameUpdate) -> Result<usize> {
    let changed = conn
        .execute(
            "UPDATE game
             SET game_name = COALESCE(?1, game_name),
                 genre_id = COALESCE(?2, genre_id),
                 publisher_id = COALESCE(?3, publisher_id),
                 release_year = COALESCE(?4, release_year)
             WHERE id = ?5",
            params![
                update.game_name,
                update.genre_id,
                update.publisher_id,
                update.release_year,
                id
            ],
        )
        .with_context(|| format!("Failed to update game {}", id))?;
    Ok(changed)
}

/// Delete a game; returns the number of rows removed
pub fn delete_game(conn: &Connection, id: i64) -> Result<usize> {
    let removed = conn
        .execute("DELETE FROM game WHERE id = ?1", [id])
        .with_context(|| format!("Failed to delete game {}", id))?;
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::schema::ALL_TABLES;
    use tempfile::TempDir;

    fn seeded() -> (TempDir, Connection) {
        let dir = TempDir::new().unwrap();
        let db = Database::new(dir.path().join("games.db"));
        db.init_schema(ALL_TABLES).unwrap();
        let conn = db.connect().unwrap();
        conn.execute_batch(
            "INSERT INTO genre (id, genre_name) VALUES (1, 'Action'), (2, 'Puzzle');
             INSERT INTO publisher (id, publisher_name) VALUES (1, 'Nintendo');",
        )
        .unwrap();
        (dir, conn)
    }

    fn tetris() -> NewGame {
        NewGame {
            game_name: "Tetris".into(),
            genre_id: 2,
            publisher_id: 1,
            release_year: 1989,
        }
    }

    #[test]
    fn test_create_then_get() {
        let (_dir, conn) = seeded();
        let id = create_game(&conn, &tetris()).unwrap();

        let game = get_game(&conn, id).unwrap().unwrap();
        assert_eq!(game.game_name, "Tetris");
        assert_eq!(game.genre_id, Some(2));
        assert_eq!(game.release_year, Some(1989));
        assert_eq!(list_games(&conn).unwrap(), vec![game]);
    }

    #[test]
    fn test_partial_update_keeps_other_fields() {
        let (_dir, conn) = seeded();
        let id = create_game(&conn, &tetris()).unwrap();

        let update = GameUpdate {
            release_year: Some(1984),
            ..Default::default()
        };
        assert_eq!(update_game(&conn, id, &update).unwrap(), 1);

        let game = get_game(&conn, id).unwrap().unwrap();
        assert_eq!(game.game_name, "Tetris");
        assert_eq!(game.genre_id, Some(2));
        assert_eq!(game.release_year, Some(1984));
    }

    #[test]
    fn test_delete_and_missing() {
        let (_dir, conn) = seeded();
        let id = create_game(&conn, &tetris()).unwrap();

        assert_eq!(delete_game(&conn, id).unwrap(), 1);
        assert!(get_game(&conn, id).unwrap().is_none());
        assert_eq!(delete_game(&conn, id).unwrap(), 0);
        assert_eq!(update_game(&conn, id, &GameUpdate::default()).unwrap(), 0);
    }

    #[test]
    fn test_unknown_genre_rejected() {
        let (_dir, conn) = seeded();
        let game = NewGame {
            genre_id: 42,
            ..tetris()
        };
        assert!(create_game(&conn, &game).is_err());
    }
}
