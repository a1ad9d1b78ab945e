//! JSON REST API for Roster.
//!
//! Exposes an axum [`Router`] backed by any [`roster_core::store::RosterStore`].
//! Authentication is the caller's responsibility: every handler reads the
//! acting [`Principal`](roster_core::principal::Principal) from the request
//! extensions and answers `401` when none was inserted.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", roster_api::api_router(store.clone()))
//! ```

pub mod applications;
pub mod directory;
pub mod error;
pub mod extract;
pub mod principal;
pub mod registry;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post, put},
};
use roster_core::store::RosterStore;

pub use error::ApiError;
pub use extract::{ApiJson, ApiPath, ApiQuery};
pub use principal::CurrentPrincipal;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: RosterStore + 'static,
{
  Router::new()
    // Applications
    .route(
      "/applications",
      get(applications::list::<S>).post(applications::submit::<S>),
    )
    .route("/applications/{id}", get(applications::get_one::<S>))
    .route("/applications/{id}/resolve", post(applications::resolve::<S>))
    // Directory
    .route("/directory", get(directory::query::<S>))
    // Registry
    .route("/agents", post(registry::create_agent::<S>))
    .route("/agents/{id}/public-listing", put(registry::set_public_listing::<S>))
    .route("/players", post(registry::create_player::<S>))
    .with_state(store)
}
