//! HTTP layer: router, shared state and server start-up

pub mod charts;
pub mod error;
pub mod games;
pub mod queries;
pub mod tables;

use anyhow::{Context, Result};
use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use rusqlite::Connection;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;

use crate::charts::ChartRenderer;
use crate::db::Database;
use crate::snapshot::Snapshot;

/// Settings for `serve`
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub db_path: PathBuf,
    pub data_dir: PathBuf,
    pub bind: String,
    pub font: Option<PathBuf>,
}

/// State shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    /// Loaded once at start-up; the error text is shown by the table routes
    pub snapshot: Arc<Result<Snapshot, String>>,
    pub charts: ChartRenderer,
}

impl AppState {
    pub fn new(db: Database, snapshot: Result<Snapshot, String>, charts: ChartRenderer) -> Self {
        Self {
            db,
            snapshot: Arc::new(snapshot),
            charts,
        }
    }

    /// Open the database handle, load the snapshot and set up chart fonts
    pub fn load(config: &ServerConfig) -> Self {
        let snapshot = match Snapshot::load(&config.data_dir) {
            Ok(snapshot) => {
                log::info!(
                    "Loaded snapshot from {:?} ({} rows)",
                    config.data_dir,
                    snapshot.total_rows()
                );
                Ok(snapshot)
            }
            Err(err) => {
                log::warn!("Table reports disabled: {:#}", err);
                Err(format!("{:#}", err))
            }
        };

        Self::new(
            Database::new(&config.db_path),
            snapshot,
            ChartRenderer::new(config.font.as_deref()),
        )
    }
}

/// Run a database call on the blocking pool with its own connection
pub async fn with_db<T, F>(db: &Database, f: F) -> Result<T>
where
    F: FnOnce(&Connection) -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let db = db.clone();
    tokio::task::spawn_blocking(move || {
        let conn = db.connect()?;
        f(&conn)
    })
    .await
    .context("Database task failed")?
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/games", get(games::list_games).post(games::create_game))
        .route("/games/genre", get(queries::games_by_genre))
        .route("/games/year", get(queries::games_by_year))
        .route("/games/publisher-sales", get(queries::publisher_sales))
        .route("/games/platform-count", get(queries::platform_count))
        .route("/games/top-release-year", get(queries::top_release_year))
        .route(
            "/games/{game_id}",
            get(games::get_game)
                .put(games::update_game)
                .delete(games::delete_game),
        )
        .nest("/tables", tables::routes())
        .nest("/charts", charts::routes())
        .layer(middleware::from_fn(log_requests))
        .with_state(state)
}

async fn log_requests(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(req).await;

    let status = response.status();
    let elapsed = start.elapsed();
    if status.is_server_error() {
        log::warn!("{} {} -> {} in {:?}", method, path, status, elapsed);
    } else {
        log::info!("{} {} -> {} in {:?}", method, path, status, elapsed);
    }

    response
}

/// Serve on an already bound listener until `shutdown` resolves
pub async fn serve_with_shutdown<S>(
    listener: TcpListener,
    state: AppState,
    shutdown: S,
) -> Result<()>
where
    S: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .context("Server error")
}

/// Bind and serve until Ctrl+C
pub async fn serve(config: ServerConfig) -> Result<()> {
    let state = AppState::load(&config);

    let listener = TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;
    log::info!("Listening on http://{}", listener.local_addr()?);

    serve_with_shutdown(listener, state, async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for shutdown signal: {}", err);
            std::future::pending::<()>().await;
        }
        log::info!("Shutting down");
    })
    .await
}
