//! # linkshelf-api
//!
//! HTTP API for linkshelf: bookmark CRUD, search, batch import, category
//! links, registration and login, and user role administration.
//!
//! The binary in `main.rs` wires configuration, logging, and the database
//! together; everything else lives here so it can be driven in-process.

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod routes;
pub mod services;
pub mod state;
pub mod telemetry;

pub use auth::{Credential, OptionalAuth, RequireAuth};
pub use config::ServerConfig;
pub use error::ApiError;
pub use extract::JsonBody;
pub use routes::{api_routes, build_app};
pub use state::AppState;
