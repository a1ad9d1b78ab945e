//! Error types for `roster-core`.

use thiserror::Error;
use uuid::Uuid;

use crate::{
  access::DenyReason,
  application::{ApplicationStatus, TransitionError},
  directory::FilterError,
};

#[derive(Debug, Error)]
pub enum Error {
  #[error("forbidden: {0}")]
  Forbidden(DenyReason),

  #[error("player {player_id} already has a pending application to agent {agent_id}")]
  Conflict { player_id: Uuid, agent_id: Uuid },

  #[error("agency slug {0:?} is already taken")]
  SlugTaken(String),

  #[error("invalid agency slug {0:?}")]
  InvalidSlug(String),

  #[error("cannot move application from {from} to {to}")]
  InvalidTransition {
    from: ApplicationStatus,
    to:   ApplicationStatus,
  },

  #[error("application {application_id} is already {current}")]
  AlreadyResolved {
    application_id: Uuid,
    current:        ApplicationStatus,
  },

  #[error("invalid filter: {0}")]
  InvalidFilter(#[from] FilterError),

  #[error("{kind} not found: {id}")]
  NotFound { kind: &'static str, id: Uuid },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(err))
  }

  pub(crate) fn transition(application_id: Uuid, err: TransitionError) -> Self {
    match err {
      TransitionError::AlreadyResolved { current } => {
        Self::AlreadyResolved { application_id, current }
      }
      TransitionError::Invalid { from, to } => Self::InvalidTransition { from, to },
    }
  }

  pub(crate) fn not_found(kind: &'static str, id: Uuid) -> Self { Self::NotFound { kind, id } }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
