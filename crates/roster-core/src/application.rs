//! Roster applications — a player's request to join an agency.
//!
//! An application is created `pending` and leaves that state exactly once,
//! to `accepted` or `rejected`. Terminal applications are kept forever as
//! an audit trail; nothing ever deletes them.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Status ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
  Pending,
  Accepted,
  Rejected,
}

/// Why [`ApplicationStatus::next`] refused a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
  /// The application already reached a terminal state.
  #[error("application is already {current}")]
  AlreadyResolved { current: ApplicationStatus },

  /// The requested target is not reachable from `from`.
  #[error("cannot move an application from {from} to {to}")]
  Invalid {
    from: ApplicationStatus,
    to:   ApplicationStatus,
  },
}

impl ApplicationStatus {
  pub const fn as_str(self) -> &'static str {
    match self {
      ApplicationStatus::Pending => "pending",
      ApplicationStatus::Accepted => "accepted",
      ApplicationStatus::Rejected => "rejected",
    }
  }

  pub fn parse(s: &str) -> Option<Self> {
    match s {
      "pending" => Some(ApplicationStatus::Pending),
      "accepted" => Some(ApplicationStatus::Accepted),
      "rejected" => Some(ApplicationStatus::Rejected),
      _ => None,
    }
  }

  /// `accepted` and `rejected` have no outgoing transitions.
  pub const fn is_terminal(self) -> bool { !matches!(self, ApplicationStatus::Pending) }

  /// The transition function: `pending` may move to either terminal state,
  /// and nothing else moves at all.
  pub fn next(self, target: ApplicationStatus) -> Result<ApplicationStatus, TransitionError> {
    match (self, target) {
      (ApplicationStatus::Pending, ApplicationStatus::Accepted | ApplicationStatus::Rejected) => {
        Ok(target)
      }
      (ApplicationStatus::Pending, ApplicationStatus::Pending) => {
        Err(TransitionError::Invalid { from: self, to: target })
      }
      (current, _) => Err(TransitionError::AlreadyResolved { current }),
    }
  }
}

impl fmt::Display for ApplicationStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── Records ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
  pub application_id: Uuid,
  pub player_id:      Uuid,
  pub agent_id:       Uuid,
  pub status:         ApplicationStatus,
  pub message:        Option<String>,
  pub created_at:     DateTime<Utc>,
  /// When the application left `pending`. Set by the store together with
  /// the status change.
  pub resolved_at:    Option<DateTime<Utc>>,
}

/// Input for [`crate::workflow::ApplicationWorkflow::submit`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewApplication {
  pub player_id: Uuid,
  pub agent_id:  Uuid,
  pub message:   Option<String>,
}

#[cfg(test)]
mod tests {
  use super::*;
  use ApplicationStatus::*;

  #[test]
  fn pending_moves_to_either_terminal_state() {
    assert_eq!(Pending.next(Accepted), Ok(Accepted));
    assert_eq!(Pending.next(Rejected), Ok(Rejected));
  }

  #[test]
  fn pending_to_pending_is_invalid() {
    assert_eq!(
      Pending.next(Pending),
      Err(TransitionError::Invalid { from: Pending, to: Pending })
    );
  }

  #[test]
  fn terminal_states_never_move() {
    for current in [Accepted, Rejected] {
      assert!(current.is_terminal());
      for target in [Pending, Accepted, Rejected] {
        assert_eq!(
          current.next(target),
          Err(TransitionError::AlreadyResolved { current })
        );
      }
    }
  }

  #[test]
  fn status_round_trips_through_str() {
    for s in [Pending, Accepted, Rejected] {
      assert_eq!(ApplicationStatus::parse(s.as_str()), Some(s));
    }
    assert_eq!(ApplicationStatus::parse("withdrawn"), None);
  }
}
