//! HTTP handlers for linkshelf-api.

pub mod auth;
pub mod bookmarks;
pub mod categories;
pub mod system;
pub mod users;
