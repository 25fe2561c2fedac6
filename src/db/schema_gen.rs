use crate::schema::TableSchema;

/// Generate CREATE TABLE SQL for a table schema
pub fn generate_create_table(schema: &TableSchema) -> String {
    let mut sql = format!("CREATE TABLE IF NOT EXISTS {} (\n", schema.name);
    let mut columns = Vec::new();

    for col in schema.columns {
        let null_constraint = if !col.nullable { " NOT NULL" } else { "" };
        let pk = if col.name == "id" { " PRIMARY KEY" } else { "" };

        columns.push(format!(
            "    {} {}{}{}",
            col.name,
            col.col_type.sql_type(),
            pk,
            null_constraint
        ));
    }

    for fk in schema.foreign_keys {
        columns.push(format!(
            "    FOREIGN KEY ({}) REFERENCES {}({})",
            fk.column, fk.references_table, fk.references_column
        ));
    }

    sql.push_str(&columns.join(",\n"));
    sql.push_str("\n)");

    sql
}

/// Generate CREATE INDEX statements for foreign key columns
pub fn generate_indexes(schema: &TableSchema) -> Vec<String> {
    schema
        .foreign_keys
        .iter()
        .map(|fk| {
            format!(
                "CREATE INDEX IF NOT EXISTS idx_{}_{} ON {}({})",
                schema.name, fk.column, schema.name, fk.column
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::tables::{GAME, REGION_SALES};

    #[test]
    fn test_generate_create_table() {
        let sql = generate_create_table(&GAME);
        assert!(sql.contains("CREATE TABLE IF NOT EXISTS game"));
        assert!(sql.contains("id INTEGER PRIMARY KEY NOT NULL"));
        assert!(sql.contains("game_name TEXT NOT NULL"));
        assert!(sql.contains("release_year INTEGER,"));
        assert!(sql.contains("FOREIGN KEY (genre_id) REFERENCES genre(id)"));
    }

    #[test]
    fn test_table_without_id_has_no_primary_key() {
        let sql = generate_create_table(&REGION_SALES);
        assert!(!sql.contains("PRIMARY KEY"));
        assert!(sql.contains("num_sales REAL"));
    }

    #[test]
    fn test_generate_indexes() {
        let indexes = generate_indexes(&REGION_SALES);
        assert_eq!(indexes.len(), 2);
        assert!(indexes.iter().any(|i| i.contains("idx_region_sales_game_platform_id")));
    }
}
