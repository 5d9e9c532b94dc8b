//! Newsdesk Kernel Library
//!
//! Blog and news content API: configuration, database plumbing, the
//! content repository/use-case pair, and the HTTP routes. The `newsdesk`
//! binary wires these together with transport middleware.

pub mod config;
pub mod content;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod pagination;
pub mod routes;
pub mod state;

pub use config::{Config, ServerMode};
pub use error::{AppError, AppResult};
pub use state::AppState;
