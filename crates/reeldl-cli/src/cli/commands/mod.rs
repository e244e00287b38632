//! CLI command handlers. Each command is in its own file.

mod config;
mod get;
mod health;

pub use config::run_config;
pub use get::{run_get, GetArgs};
pub use health::run_health;
