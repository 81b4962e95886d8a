use axum::Router;

pub mod auth;
pub mod common;
pub mod expenses;
pub mod members;
pub mod notes;
pub mod public;
pub mod system;
pub mod workspaces;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .nest("/workspaces", workspaces::router())
        .nest("/members", members::router())
        .nest("/expenses", expenses::router())
        .nest("/notes", notes::router())
}

/// Endpoints reachable without a token.
pub fn public_router() -> Router {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/public", public::router())
}
