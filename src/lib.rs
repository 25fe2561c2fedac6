pub mod charts;
pub mod cli;
pub mod db;
pub mod filter;
pub mod paths;
pub mod reports;
pub mod schema;
pub mod server;
pub mod snapshot;
pub mod ui;

pub use cli::{Cli, Commands};
pub use db::Database;
pub use server::{AppState, ServerConfig};
pub use snapshot::Snapshot;
pub use ui::{ConsoleUi, Phase, SilentUi, Ui};
