//! The application workflow — submitting, listing and resolving roster
//! applications.
//!
//! Every operation consults the access gate first. Where the role alone
//! decides, the check runs before anything is read from the store; where the
//! decision depends on the record, it runs before anything is returned or
//! written.

use uuid::Uuid;

use crate::{
  Error, Result,
  access::{self, Action, DenyReason, Resource},
  application::{Application, ApplicationStatus, NewApplication},
  principal::Principal,
  store::{InsertOutcome, ResolveOutcome, RosterStore},
};

/// Request-scoped workflow facade over a [`RosterStore`].
pub struct ApplicationWorkflow<'s, S> {
  store: &'s S,
}

fn gate(principal: &Principal, action: Action, resource: Resource<'_>) -> Result<()> {
  access::authorize(principal, action, resource)
    .into_result()
    .map_err(|reason| {
      tracing::debug!(principal = %principal.id, role = %principal.role, ?action, ?reason, "access denied");
      Error::Forbidden(reason)
    })
}

fn gate_role(principal: &Principal, action: Action) -> Result<()> {
  if access::permits_role(principal.role, action) {
    Ok(())
  } else {
    tracing::debug!(principal = %principal.id, role = %principal.role, ?action, "access denied by role");
    Err(Error::Forbidden(DenyReason::RoleNotPermitted))
  }
}

impl<'s, S: RosterStore> ApplicationWorkflow<'s, S> {
  pub fn new(store: &'s S) -> Self { Self { store } }

  /// Create a `pending` application from `input.player_id` to
  /// `input.agent_id`.
  ///
  /// Fails with `Forbidden` unless `principal` is that player, `NotFound` if
  /// either party is unknown, and `Conflict` if the pair already has a
  /// pending application.
  pub async fn submit(&self, principal: &Principal, input: NewApplication) -> Result<Application> {
    gate(principal, Action::SubmitApplication, Resource::Applicant {
      player_id: input.player_id,
    })?;

    if self.store.get_player(input.player_id).await.map_err(Error::store)?.is_none() {
      return Err(Error::not_found("player", input.player_id));
    }
    if self.store.get_agent(input.agent_id).await.map_err(Error::store)?.is_none() {
      return Err(Error::not_found("agent", input.agent_id));
    }

    let (player_id, agent_id) = (input.player_id, input.agent_id);
    match self.store.insert_application(input).await.map_err(Error::store)? {
      InsertOutcome::Created(app) => {
        tracing::info!(
          application = %app.application_id,
          player = %player_id,
          agent = %agent_id,
          "application submitted"
        );
        Ok(app)
      }
      InsertOutcome::DuplicatePending { existing } => {
        tracing::debug!(%existing, player = %player_id, agent = %agent_id, "duplicate pending application");
        Err(Error::Conflict { player_id, agent_id })
      }
    }
  }

  /// Full application history submitted by `player_id`, oldest first.
  pub async fn list_for_player(&self, principal: &Principal, player_id: Uuid) -> Result<Vec<Application>> {
    gate(principal, Action::ListSubmittedApplications, Resource::PlayerApplications {
      player_id,
    })?;
    self
      .store
      .list_applications_for_player(player_id)
      .await
      .map_err(Error::store)
  }

  /// Full application history addressed to `agent_id`, oldest first.
  pub async fn list_for_agent(&self, principal: &Principal, agent_id: Uuid) -> Result<Vec<Application>> {
    gate(principal, Action::ListAddressedApplications, Resource::AgentApplications {
      agent_id,
    })?;
    self
      .store
      .list_applications_for_agent(agent_id)
      .await
      .map_err(Error::store)
  }

  /// A single application, visible to either party and to superadmins.
  pub async fn get(&self, principal: &Principal, application_id: Uuid) -> Result<Application> {
    gate_role(principal, Action::ReadApplication)?;
    let app = self.fetch(application_id).await?;
    gate(principal, Action::ReadApplication, Resource::Application(&app))?;
    Ok(app)
  }

  /// Move a pending application to `target`.
  ///
  /// - `Forbidden` if the caller is not the addressed agent (or a superadmin);
  /// - `AlreadyResolved` if the application is terminal, whatever `target`
  ///   is; the error carries the current status so a retrying client can tell
  ///   whether its own earlier attempt landed;
  /// - `InvalidTransition` if `target` is not a terminal status.
  ///
  /// Accepting sets the player's owning agent in the same atomic write. Of
  /// two concurrent calls at most one succeeds; the other sees
  /// `AlreadyResolved`.
  pub async fn resolve(
    &self,
    principal:      &Principal,
    application_id: Uuid,
    target:         ApplicationStatus,
  ) -> Result<Application> {
    gate_role(principal, Action::TransitionApplication)?;
    let app = self.fetch(application_id).await?;

    match access::authorize(principal, Action::TransitionApplication, Resource::Application(&app)) {
      access::AccessDecision::Allow => {}
      // Terminal applications report their state rather than a denial.
      access::AccessDecision::Deny(DenyReason::NotPending) => {}
      access::AccessDecision::Deny(reason) => {
        tracing::debug!(principal = %principal.id, application = %application_id, ?reason, "resolve denied");
        return Err(Error::Forbidden(reason));
      }
    }

    app
      .status
      .next(target)
      .map_err(|e| Error::transition(application_id, e))?;

    match self
      .store
      .resolve_application(application_id, target)
      .await
      .map_err(Error::store)?
    {
      ResolveOutcome::Applied(resolved) => {
        tracing::info!(
          application = %application_id,
          player = %resolved.player_id,
          agent = %resolved.agent_id,
          status = %resolved.status,
          by = %principal.id,
          "application resolved"
        );
        Ok(resolved)
      }
      ResolveOutcome::Lost(current) => {
        tracing::debug!(application = %application_id, current = %current.status, "resolve lost race");
        Err(Error::AlreadyResolved { application_id, current: current.status })
      }
      ResolveOutcome::Missing => Err(Error::not_found("application", application_id)),
    }
  }

  async fn fetch(&self, application_id: Uuid) -> Result<Application> {
    self
      .store
      .get_application(application_id)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::not_found("application", application_id))
  }
}
