//! Handlers for `/applications` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/applications` | Body: `{"agent_id":…,"message":…}`; player defaults to the caller |
//! | `GET`  | `/applications` | `?player_id=` or `?agent_id=`; defaults to the caller's own |
//! | `GET`  | `/applications/{id}` | Either party or a superadmin |
//! | `POST` | `/applications/{id}/resolve` | Body: `{"status":"accepted"\|"rejected"}` |

use std::sync::Arc;

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use roster_core::{
  access::DenyReason,
  application::{Application, ApplicationStatus, NewApplication},
  principal::Role,
  store::RosterStore,
  workflow::ApplicationWorkflow,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  error::ApiError,
  extract::{ApiJson, ApiPath, ApiQuery},
  principal::CurrentPrincipal,
};

// ─── Submit ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SubmitBody {
  /// Defaults to the caller.
  pub player_id: Option<Uuid>,
  pub agent_id:  Uuid,
  pub message:   Option<String>,
}

/// `POST /applications`
pub async fn submit<S>(
  State(store): State<Arc<S>>,
  CurrentPrincipal(principal): CurrentPrincipal,
  ApiJson(body): ApiJson<SubmitBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RosterStore,
{
  let input = NewApplication {
    player_id: body.player_id.unwrap_or(principal.id),
    agent_id:  body.agent_id,
    message:   body.message,
  };
  let app = ApplicationWorkflow::new(store.as_ref())
    .submit(&principal, input)
    .await?;
  Ok((StatusCode::CREATED, Json(app)))
}

// ─── List ────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  pub player_id: Option<Uuid>,
  pub agent_id:  Option<Uuid>,
}

/// `GET /applications[?player_id=<id>|?agent_id=<id>]`
///
/// Without a parameter, players get what they submitted and agents what was
/// addressed to them.
pub async fn list<S>(
  State(store): State<Arc<S>>,
  CurrentPrincipal(principal): CurrentPrincipal,
  ApiQuery(params): ApiQuery<ListParams>,
) -> Result<Json<Vec<Application>>, ApiError>
where
  S: RosterStore,
{
  let workflow = ApplicationWorkflow::new(store.as_ref());
  let apps = match (params.player_id, params.agent_id) {
    (Some(_), Some(_)) => {
      return Err(ApiError::BadRequest("pass either player_id or agent_id, not both".into()));
    }
    (Some(player_id), None) => workflow.list_for_player(&principal, player_id).await?,
    (None, Some(agent_id)) => workflow.list_for_agent(&principal, agent_id).await?,
    (None, None) => match principal.role {
      Role::Player => workflow.list_for_player(&principal, principal.id).await?,
      Role::Agent => workflow.list_for_agent(&principal, principal.id).await?,
      Role::Club => {
        return Err(roster_core::Error::Forbidden(DenyReason::RoleNotPermitted).into());
      }
      Role::Superadmin => {
        return Err(ApiError::BadRequest("player_id or agent_id is required".into()));
      }
    },
  };
  Ok(Json(apps))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// `GET /applications/{id}`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  CurrentPrincipal(principal): CurrentPrincipal,
  ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Application>, ApiError>
where
  S: RosterStore,
{
  let app = ApplicationWorkflow::new(store.as_ref())
    .get(&principal, id)
    .await?;
  Ok(Json(app))
}

// ─── Resolve ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ResolveBody {
  pub status: ApplicationStatus,
}

/// `POST /applications/{id}/resolve`
pub async fn resolve<S>(
  State(store): State<Arc<S>>,
  CurrentPrincipal(principal): CurrentPrincipal,
  ApiPath(id): ApiPath<Uuid>,
  ApiJson(body): ApiJson<ResolveBody>,
) -> Result<Json<Application>, ApiError>
where
  S: RosterStore,
{
  let app = ApplicationWorkflow::new(store.as_ref())
    .resolve(&principal, id, body.status)
    .await?;
  Ok(Json(app))
}
