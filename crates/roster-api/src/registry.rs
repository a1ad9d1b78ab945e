//! Handlers for agent and player registration.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/agents` | Superadmin only; slug derived from the name when absent |
//! | `PUT`  | `/agents/{id}/public-listing` | Body: `{"public_listing":true}` |
//! | `POST` | `/players` | Superadmin only; players start unaffiliated |

use std::sync::Arc;

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use roster_core::{
  party::{AgentRecord, NewAgent, NewPlayer},
  registry::Registry,
  store::RosterStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  error::ApiError,
  extract::{ApiJson, ApiPath},
  principal::CurrentPrincipal,
};

/// `POST /agents`
pub async fn create_agent<S>(
  State(store): State<Arc<S>>,
  CurrentPrincipal(principal): CurrentPrincipal,
  ApiJson(body): ApiJson<NewAgent>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RosterStore,
{
  let agent = Registry::new(store.as_ref())
    .register_agent(&principal, body)
    .await?;
  Ok((StatusCode::CREATED, Json(agent)))
}

#[derive(Debug, Deserialize)]
pub struct ListingBody {
  pub public_listing: bool,
}

/// `PUT /agents/{id}/public-listing`
pub async fn set_public_listing<S>(
  State(store): State<Arc<S>>,
  CurrentPrincipal(principal): CurrentPrincipal,
  ApiPath(id): ApiPath<Uuid>,
  ApiJson(body): ApiJson<ListingBody>,
) -> Result<Json<AgentRecord>, ApiError>
where
  S: RosterStore,
{
  let agent = Registry::new(store.as_ref())
    .set_public_listing(&principal, id, body.public_listing)
    .await?;
  Ok(Json(agent))
}

/// `POST /players`
pub async fn create_player<S>(
  State(store): State<Arc<S>>,
  CurrentPrincipal(principal): CurrentPrincipal,
  ApiJson(body): ApiJson<NewPlayer>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RosterStore,
{
  let player = Registry::new(store.as_ref())
    .register_player(&principal, body)
    .await?;
  Ok((StatusCode::CREATED, Json(player)))
}
