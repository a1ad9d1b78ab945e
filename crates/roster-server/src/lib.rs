//! HTTP server for Roster.
//!
//! Wraps the [`roster_api`] router with Basic authentication, which turns a
//! configured account into the [`Principal`](roster_core::principal::Principal)
//! the API acts for, and request tracing.

pub mod auth;
pub mod error;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{Router, middleware, routing::get};
use roster_core::store::RosterStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::{AccountConfig, Accounts};

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `ROSTER_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
  #[serde(default)]
  pub accounts:   Vec<AccountConfig>,
}

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state the router is built from.
#[derive(Clone)]
pub struct AppState<S: RosterStore> {
  pub store:    Arc<S>,
  pub accounts: Arc<Accounts>,
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the server's axum [`Router`]: `/health` is open, everything under
/// `/api` requires credentials.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: RosterStore + 'static,
{
  let api = roster_api::api_router(state.store.clone())
    .layer(middleware::from_fn_with_state(state.accounts.clone(), auth::authenticate));

  Router::new()
    .route("/health", get(|| async { "ok" }))
    .nest("/api", api)
    .layer(TraceLayer::new_for_http())
}

// ─── Integration tests ───────────────────────────────────────────────────────
