use anyhow::Result;
use std::time::Instant;
use vgsales::{
    cli::{Cli, Commands},
    db::Database,
    filter::resolve_tables,
    paths::DataLocations,
    schema::{table_names, ALL_TABLES},
    server::{serve, ServerConfig},
    snapshot::{export_tables, import_tables},
    ui::ConsoleUi,
};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse_args();

    match cli.command {
        Commands::Serve {
            db,
            snapshot,
            bind,
            font,
        } => {
            let locations = DataLocations::new(db.db, snapshot.data_dir)?;
            let config = ServerConfig {
                db_path: locations.db_path().to_path_buf(),
                data_dir: locations.snapshot_dir().to_path_buf(),
                bind,
                font,
            };

            tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?
                .block_on(serve(config))?;
        }

        Commands::Init { db } => {
            let locations = DataLocations::new(db.db, Default::default())?;
            Database::new(locations.db_path()).init_schema(ALL_TABLES)?;
            println!("Database ready at {:?}", locations.db_path());
        }

        Commands::Export {
            db,
            snapshot,
            filter,
        } => {
            let start = Instant::now();
            let locations = DataLocations::new(db.db, snapshot.data_dir)?;
            let tables = resolve_tables(filter.include, filter.exclude)?;

            let database = Database::new(locations.db_path());
            let rows = export_tables(
                &database,
                locations.snapshot_dir(),
                &tables,
                &mut ConsoleUi::new(),
            )?;

            println!(
                "\nExported {} tables ({} rows) to {:?} in {:.1}s",
                tables.len(),
                rows,
                locations.snapshot_dir(),
                start.elapsed().as_secs_f64()
            );
        }

        Commands::Import {
            db,
            snapshot,
            filter,
        } => {
            let start = Instant::now();
            let locations = DataLocations::new(db.db, snapshot.data_dir)?;
            let tables = resolve_tables(filter.include, filter.exclude)?;

            let database = Database::new(locations.db_path());
            let rows = import_tables(
                &database,
                locations.snapshot_dir(),
                &tables,
                &mut ConsoleUi::new(),
            )?;

            println!(
                "\nImported {} records into {:?} in {:.1}s",
                rows,
                locations.db_path(),
                start.elapsed().as_secs_f64()
            );
        }

        Commands::ListTables => {
            println!("Available tables:\n");
            for name in table_names() {
                println!("  {}", name);
            }
        }
    }

    Ok(())
}
