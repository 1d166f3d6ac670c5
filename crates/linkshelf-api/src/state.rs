//! Shared application state.

use axum::extract::FromRef;

use linkshelf_crypto::TokenSigner;
use linkshelf_db::Database;

/// Handles every request handler receives. Cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub signer: TokenSigner,
}

impl AppState {
    pub fn new(db: Database, signer: TokenSigner) -> Self {
        Self { db, signer }
    }
}

impl FromRef<AppState> for TokenSigner {
    fn from_ref(state: &AppState) -> Self {
        state.signer.clone()
    }
}
