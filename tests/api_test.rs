//! HTTP tests: each test starts the server on an ephemeral port in its own
//! runtime thread and talks to it with a blocking client.

mod common;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::net::TcpListener as StdTcpListener;
use std::thread;
use tempfile::TempDir;
use tokio::sync::oneshot;

use vgsales::charts::ChartRenderer;
use vgsales::server::{serve_with_shutdown, AppState};
use vgsales::snapshot::Snapshot;

const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

struct TestServer {
    base_url: String,
    client: Client,
    shutdown: Option<oneshot::Sender<()>>,
    join: Option<thread::JoinHandle<()>>,
    _db_dir: TempDir,
    _snapshot_dir: Option<TempDir>,
}

impl TestServer {
    /// Server over the sample data with its snapshot loaded
    fn start() -> Self {
        Self::start_with(true)
    }

    fn start_with(with_snapshot: bool) -> Self {
        let db_dir = TempDir::new().unwrap();
        let db = common::sample_database(db_dir.path());

        let (snapshot, snapshot_dir) = if with_snapshot {
            let dir = common::export_snapshot(&db);
            let snapshot = Snapshot::load(dir.path()).map_err(|e| format!("{:#}", e));
            (snapshot, Some(dir))
        } else {
            (Err("no snapshot directory".to_string()), None)
        };

        let state = AppState::new(db, snapshot, ChartRenderer::without_text());

        let listener = StdTcpListener::bind("127.0.0.1:0").unwrap();
        listener.set_nonblocking(true).unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let join = thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .worker_threads(2)
                .enable_all()
                .build()
                .unwrap();
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::from_std(listener).unwrap();
                serve_with_shutdown(listener, state, async move {
                    let _ = shutdown_rx.await;
                })
                .await
                .unwrap();
            });
        });

        Self {
            base_url: format!("http://{}", addr),
            // No pooled keep-alive connections to hold up graceful shutdown
            client: Client::builder().pool_max_idle_per_host(0).build().unwrap(),
            shutdown: Some(shutdown_tx),
            join: Some(join),
            _db_dir: db_dir,
            _snapshot_dir: snapshot_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get(&self, path: &str) -> reqwest::blocking::Response {
        self.client.get(self.url(path)).send().unwrap()
    }

    fn get_json(&self, path: &str) -> (StatusCode, Value) {
        let response = self.get(path);
        let status = response.status();
        (status, response.json().unwrap())
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

// =============================================================================
// CRUD
// =============================================================================

#[test]
fn test_create_then_get_returns_matching_fields() {
    let server = TestServer::start();

    let response = server
        .client
        .post(server.url("/games"))
        .json(&json!({
            "game_name": "Star Racer",
            "genre_id": 3,
            "publisher_id": 2,
            "release_year": 2009
        }))
        .send()
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().unwrap();
    assert_eq!(body["message"], "Game created successfully!");
    let id = body["id"].as_i64().unwrap();

    let (status, game) = server.get_json(&format!("/games/{}", id));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(game["id"], id);
    assert_eq!(game["game_name"], "Star Racer");
    assert_eq!(game["genre_id"], 3);
    assert_eq!(game["publisher_id"], 2);
    assert_eq!(game["release_year"], 2009);

    let (_, all) = server.get_json("/games");
    assert_eq!(all["games"].as_array().unwrap().len(), 4);
}

#[test]
fn test_update_keeps_fields_not_sent() {
    let server = TestServer::start();

    let response = server
        .client
        .put(server.url("/games/2"))
        .json(&json!({ "game_name": "Block Drop DX" }))
        .send()
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (_, game) = server.get_json("/games/2");
    assert_eq!(game["game_name"], "Block Drop DX");
    assert_eq!(game["genre_id"], 2);
    assert_eq!(game["release_year"], 2006);
}

#[test]
fn test_delete_then_get_is_not_found() {
    let server = TestServer::start();

    // Insert a game nothing references so the FK constraints allow deletion
    let body: Value = server
        .client
        .post(server.url("/games"))
        .json(&json!({
            "game_name": "Short Lived",
            "genre_id": 1,
            "publisher_id": 1,
            "release_year": 2001
        }))
        .send()
        .unwrap()
        .json()
        .unwrap();
    let id = body["id"].as_i64().unwrap();

    let response = server.client.delete(server.url(&format!("/games/{}", id))).send().unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (status, body) = server.get_json(&format!("/games/{}", id));
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Game not found");
}

#[test]
fn test_create_with_unknown_genre_is_server_error() {
    let server = TestServer::start();

    let response = server
        .client
        .post(server.url("/games"))
        .json(&json!({
            "game_name": "Nowhere",
            "genre_id": 99,
            "publisher_id": 1,
            "release_year": 2001
        }))
        .send()
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = response.json().unwrap();
    assert!(body["detail"].as_str().unwrap().starts_with("Error creating game"));
}

#[test]
fn test_deleting_referenced_game_is_server_error() {
    let server = TestServer::start();

    let response = server.client.delete(server.url("/games/1")).send().unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let (status, _) = server.get_json("/games/1");
    assert_eq!(status, StatusCode::OK);
}

// =============================================================================
// Queries
// =============================================================================

#[test]
fn test_games_by_genre() {
    let server = TestServer::start();

    let (status, rows) = server.get_json("/games/genre?genre=puz");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        rows,
        json!([{ "game_name": "Block Drop", "platform_name": "DS", "release_year": 2006 }])
    );
}

#[test]
fn test_games_by_year_and_platform() {
    let server = TestServer::start();

    let (status, rows) = server.get_json("/games/year?year=2007&platform=ps");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        rows,
        json!([{ "game_name": "Kickoff", "platform_name": "PS2", "release_year": 2007 }])
    );
}

#[test]
fn test_games_by_year_requires_parameters() {
    let server = TestServer::start();

    let response = server.get("/games/year?year=2007");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[test]
fn test_publisher_sales() {
    let server = TestServer::start();

    let (_, rows) = server.get_json("/games/publisher-sales");
    assert_eq!(
        rows,
        json!([
            { "publisher_name": "Nintendo", "total_sales": 9.0 },
            { "publisher_name": "Sega", "total_sales": 1.5 }
        ])
    );
}

#[test]
fn test_platform_count_and_top_years() {
    let server = TestServer::start();

    let (_, platforms) = server.get_json("/games/platform-count");
    let platforms = platforms.as_array().unwrap();
    assert_eq!(platforms.len(), 3);
    assert_eq!(platforms[2], json!({ "platform_name": "PS2", "total_games": 1 }));

    let (_, years) = server.get_json("/games/top-release-year");
    let years = years.as_array().unwrap();
    assert_eq!(years.len(), 2);
    assert!(years.iter().all(|y| y["total_games"] == 2));
}

// =============================================================================
// Tables and charts
// =============================================================================

#[test]
fn test_table_reports_render_html() {
    let server = TestServer::start();

    let response = server.get("/tables/publishers");
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()["content-type"].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"));
    let html = response.text().unwrap();
    assert!(html.contains("<td>Nintendo</td><td>9.0</td>"));

    let html = server.get("/tables/genres").text().unwrap();
    assert!(html.contains("<td>Action</td><td>6.0</td>"));

    let html = server.get("/tables/platforms").text().unwrap();
    assert!(html.contains("<td>Wii</td><td>6.0</td>"));

    let html = server.get("/tables/regions").text().unwrap();
    assert!(html.contains("<td>North America</td><td>7.25</td>"));
}

#[test]
fn test_table_reports_without_snapshot() {
    let server = TestServer::start_with(false);

    let response = server.get("/tables/regions");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let html = response.text().unwrap();
    assert!(html.starts_with("<h1>Error</h1>"));
    assert!(html.contains("no snapshot directory"));

    // The rest of the API is unaffected
    let (status, _) = server.get_json("/games");
    assert_eq!(status, StatusCode::OK);
}

#[test]
fn test_charts_are_png() {
    let server = TestServer::start();

    for path in [
        "/charts/sales-by-genre",
        "/charts/sales-by-platform",
        "/charts/sales-by-year",
    ] {
        let response = server.get(path);
        assert_eq!(response.status(), StatusCode::OK, "{}", path);
        assert_eq!(response.headers()["content-type"], "image/png");
        let bytes = response.bytes().unwrap();
        assert!(bytes.starts_with(PNG_SIGNATURE), "{}", path);
    }
}

#[test]
fn test_unknown_route_is_not_found() {
    let server = TestServer::start();
    assert_eq!(server.get("/nothing-here").status(), StatusCode::NOT_FOUND);
}
