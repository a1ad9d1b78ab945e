//! The access gate — one closed capability table for every operation.
//!
//! | Action | player | agent | club | superadmin |
//! |--------|--------|-------|------|------------|
//! | [`Action::SubmitApplication`] | own | – | – | – |
//! | [`Action::ListSubmittedApplications`] | own | – | – | all |
//! | [`Action::ListAddressedApplications`] | – | own | – | all |
//! | [`Action::ReadApplication`] | own | own | – | all |
//! | [`Action::TransitionApplication`] | – | own, while pending | – | all |
//! | [`Action::QueryDirectory`] | – | own roster | publicly listed | all |
//! | [`Action::RegisterAgent`] | – | – | – | all |
//! | [`Action::RegisterPlayer`] | – | – | – | all |
//! | [`Action::SetPublicListing`] | – | own | – | all |
//!
//! Every pair not in the table is denied, as is any action presented with a
//! resource of the wrong kind. Decisions are computed fresh on every call.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  application::{Application, ApplicationStatus},
  principal::{Principal, Role},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
  SubmitApplication,
  ListSubmittedApplications,
  ListAddressedApplications,
  ReadApplication,
  TransitionApplication,
  QueryDirectory,
  RegisterAgent,
  RegisterPlayer,
  SetPublicListing,
}

/// What an action is applied to, carrying just the keys the table needs.
#[derive(Debug, Clone, Copy)]
pub enum Resource<'a> {
  /// An application about to be created on behalf of `player_id`.
  Applicant { player_id: Uuid },
  /// Every application a player has submitted.
  PlayerApplications { player_id: Uuid },
  /// Every application addressed to an agent.
  AgentApplications { agent_id: Uuid },
  Application(&'a Application),
  /// The directory as a whole, before any record is read.
  Directory,
  /// A single player as seen through the directory.
  DirectoryRecord {
    owner_agent_id:  Option<Uuid>,
    /// The owning agent's public-listing flag; `false` when unowned.
    publicly_listed: bool,
  },
  /// Creation of new agent or player records.
  Registry,
  Agent { agent_id: Uuid },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
  #[error("role may not perform this action")]
  RoleNotPermitted,
  #[error("resource belongs to another principal")]
  NotOwner,
  #[error("application is no longer pending")]
  NotPending,
  #[error("record is not publicly listed")]
  NotPubliclyListed,
  #[error("action does not apply to this resource")]
  ResourceMismatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
  Allow,
  Deny(DenyReason),
}

impl AccessDecision {
  pub fn is_allowed(self) -> bool { matches!(self, Self::Allow) }

  pub fn into_result(self) -> Result<(), DenyReason> {
    match self {
      Self::Allow => Ok(()),
      Self::Deny(reason) => Err(reason),
    }
  }

  fn owner(principal: &Principal, owner: Uuid) -> Self {
    if principal.owns(owner) {
      Self::Allow
    } else {
      Self::Deny(DenyReason::NotOwner)
    }
  }
}

/// The role column of the table: whether `role` may ever perform `action`,
/// regardless of the resource. Lets callers deny before reading anything.
pub fn permits_role(role: Role, action: Action) -> bool {
  use Role::*;
  match action {
    Action::SubmitApplication => matches!(role, Player),
    Action::ListSubmittedApplications => matches!(role, Player | Superadmin),
    Action::ListAddressedApplications => matches!(role, Agent | Superadmin),
    Action::ReadApplication => matches!(role, Player | Agent | Superadmin),
    Action::TransitionApplication => matches!(role, Agent | Superadmin),
    Action::QueryDirectory => matches!(role, Agent | Club | Superadmin),
    Action::RegisterAgent | Action::RegisterPlayer => matches!(role, Superadmin),
    Action::SetPublicListing => matches!(role, Agent | Superadmin),
  }
}

/// Decide whether `principal` may perform `action` on `resource`.
pub fn authorize(principal: &Principal, action: Action, resource: Resource<'_>) -> AccessDecision {
  use AccessDecision::{Allow, Deny};

  if !permits_role(principal.role, action) {
    return Deny(DenyReason::RoleNotPermitted);
  }

  match (action, principal.role, resource) {
    (Action::SubmitApplication, Role::Player, Resource::Applicant { player_id }) => {
      AccessDecision::owner(principal, player_id)
    }

    (Action::ListSubmittedApplications, Role::Player, Resource::PlayerApplications { player_id }) => {
      AccessDecision::owner(principal, player_id)
    }
    (Action::ListSubmittedApplications, Role::Superadmin, Resource::PlayerApplications { .. }) => Allow,

    (Action::ListAddressedApplications, Role::Agent, Resource::AgentApplications { agent_id }) => {
      AccessDecision::owner(principal, agent_id)
    }
    (Action::ListAddressedApplications, Role::Superadmin, Resource::AgentApplications { .. }) => Allow,

    (Action::ReadApplication, Role::Player, Resource::Application(app)) => {
      AccessDecision::owner(principal, app.player_id)
    }
    (Action::ReadApplication, Role::Agent, Resource::Application(app)) => {
      AccessDecision::owner(principal, app.agent_id)
    }
    (Action::ReadApplication, Role::Superadmin, Resource::Application(_)) => Allow,

    (Action::TransitionApplication, Role::Agent, Resource::Application(app)) => {
      if !principal.owns(app.agent_id) {
        Deny(DenyReason::NotOwner)
      } else if app.status != ApplicationStatus::Pending {
        Deny(DenyReason::NotPending)
      } else {
        Allow
      }
    }
    (Action::TransitionApplication, Role::Superadmin, Resource::Application(_)) => Allow,

    (Action::QueryDirectory, _, Resource::Directory) => Allow,
    (Action::QueryDirectory, Role::Agent, Resource::DirectoryRecord { owner_agent_id, .. }) => {
      if owner_agent_id == Some(principal.id) {
        Allow
      } else {
        Deny(DenyReason::NotOwner)
      }
    }
    (
      Action::QueryDirectory,
      Role::Club,
      Resource::DirectoryRecord { owner_agent_id, publicly_listed },
    ) => {
      if owner_agent_id.is_some() && publicly_listed {
        Allow
      } else {
        Deny(DenyReason::NotPubliclyListed)
      }
    }
    (Action::QueryDirectory, Role::Superadmin, Resource::DirectoryRecord { .. }) => Allow,

    (Action::RegisterAgent | Action::RegisterPlayer, Role::Superadmin, Resource::Registry) => Allow,

    (Action::SetPublicListing, Role::Agent, Resource::Agent { agent_id }) => {
      AccessDecision::owner(principal, agent_id)
    }
    (Action::SetPublicListing, Role::Superadmin, Resource::Agent { .. }) => Allow,

    _ => Deny(DenyReason::ResourceMismatch),
  }
}
