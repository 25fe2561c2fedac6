use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "vgsales")]
#[command(version, about = "Queries, reports and charts over a video game sales database")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone)]
pub struct DbArgs {
    /// SQLite database path (default: platform data directory)
    #[arg(long, env = "VGSALES_DB")]
    pub db: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct SnapshotArgs {
    /// Directory holding the CSV snapshot
    #[arg(long, env = "VGSALES_DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct TableFilter {
    /// Only include these tables (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    pub include: Option<Vec<String>>,

    /// Exclude these tables (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    pub exclude: Option<Vec<String>>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server
    Serve {
        #[command(flatten)]
        db: DbArgs,

        #[command(flatten)]
        snapshot: SnapshotArgs,

        /// Address to listen on
        #[arg(long, env = "VGSALES_BIND", default_value = "127.0.0.1:8000")]
        bind: String,

        /// TrueType font used for chart text
        #[arg(long, env = "VGSALES_FONT")]
        font: Option<PathBuf>,
    },

    /// Create the database tables
    Init {
        #[command(flatten)]
        db: DbArgs,
    },

    /// Dump database tables to CSV snapshot files
    Export {
        #[command(flatten)]
        db: DbArgs,

        #[command(flatten)]
        snapshot: SnapshotArgs,

        #[command(flatten)]
        filter: TableFilter,
    },

    /// Load CSV snapshot files into the database (all or nothing)
    Import {
        #[command(flatten)]
        db: DbArgs,

        #[command(flatten)]
        snapshot: SnapshotArgs,

        #[command(flatten)]
        filter: TableFilter,
    },

    /// List all available table names
    ListTables,
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_export_with_filter() {
        let cli = Cli::try_parse_from([
            "vgsales",
            "export",
            "--db",
            "games.db",
            "--include",
            "game,region",
        ])
        .unwrap();

        match cli.command {
            Commands::Export { db, snapshot, filter } => {
                assert_eq!(db.db, Some(PathBuf::from("games.db")));
                assert_eq!(snapshot.data_dir, PathBuf::from("data"));
                assert_eq!(filter.include, Some(vec!["game".to_string(), "region".to_string()]));
                assert!(filter.exclude.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_serve_defaults() {
        let cli = Cli::try_parse_from(["vgsales", "serve", "--bind", "0.0.0.0:9000"]).unwrap();
        match cli.command {
            Commands::Serve { bind, font, .. } => {
                assert_eq!(bind, "0.0.0.0:9000");
                assert!(font.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
