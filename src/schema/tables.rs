//! Table schema definitions for the video game sales dataset

use super::types::*;

// =============================================================================
// Lookup Tables (no FK dependencies)
// =============================================================================

pub static GENRE: TableSchema = TableSchema {
    name: "genre",
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::new("genre_name", ColumnType::Text),
    ],
    foreign_keys: &[],
};

pub static PUBLISHER: TableSchema = TableSchema {
    name: "publisher",
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::new("publisher_name", ColumnType::Text),
    ],
    foreign_keys: &[],
};

pub static PLATFORM: TableSchema = TableSchema {
    name: "platform",
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::new("platform_name", ColumnType::Text),
    ],
    foreign_keys: &[],
};

pub static REGION: TableSchema = TableSchema {
    name: "region",
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::new("region_name", ColumnType::Text),
    ],
    foreign_keys: &[],
};

// =============================================================================
// Games
// =============================================================================

pub static GAME: TableSchema = TableSchema {
    name: "game",
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::new("genre_id", ColumnType::Integer),
        Column::required("game_name", ColumnType::Text),
        Column::new("publisher_id", ColumnType::Integer),
        Column::new("release_year", ColumnType::Integer),
    ],
    foreign_keys: &[
        ForeignKey::new("genre_id", "genre"),
        ForeignKey::new("publisher_id", "publisher"),
    ],
};

// =============================================================================
// Junction Tables
// =============================================================================

pub static GAME_PUBLISHER: TableSchema = TableSchema {
    name: "game_publisher",
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::new("game_id", ColumnType::Integer),
        Column::new("publisher_id", ColumnType::Integer),
    ],
    foreign_keys: &[
        ForeignKey::new("game_id", "game"),
        ForeignKey::new("publisher_id", "publisher"),
    ],
};

pub static GAME_PLATFORM: TableSchema = TableSchema {
    name: "game_platform",
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::new("game_publisher_id", ColumnType::Integer),
        Column::new("platform_id", ColumnType::Integer),
        Column::new("release_year", ColumnType::Integer),
    ],
    foreign_keys: &[
        ForeignKey::new("game_publisher_id", "game_publisher"),
        ForeignKey::new("platform_id", "platform"),
    ],
};

/// Sales per region; the only table without its own `id`
pub static REGION_SALES: TableSchema = TableSchema {
    name: "region_sales",
    columns: &[
        Column::new("region_id", ColumnType::Integer),
        Column::new("game_platform_id", ColumnType::Integer),
        Column::new("num_sales", ColumnType::Real),
    ],
    foreign_keys: &[
        ForeignKey::new("region_id", "region"),
        ForeignKey::new("game_platform_id", "game_platform"),
    ],
};

/// All table schemas in dependency order
pub static ALL_TABLES: &[&TableSchema] = &[
    &GENRE,
    &PUBLISHER,
    &PLATFORM,
    &REGION,
    &GAME,
    &GAME_PUBLISHER,
    &GAME_PLATFORM,
    &REGION_SALES,
];

/// Get table schema by name
pub fn get_table(name: &str) -> Option<&'static TableSchema> {
    ALL_TABLES.iter().find(|t| t.name == name).copied()
}

/// Get all table names
pub fn table_names() -> Vec<&'static str> {
    ALL_TABLES.iter().map(|t| t.name).collect()
}
