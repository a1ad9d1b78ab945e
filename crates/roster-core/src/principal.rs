//! Principal — the authenticated actor behind every call.
//!
//! The core never validates credentials. Adapters resolve a principal from
//! whatever authentication they use and hand it in with each request.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The role a principal acts under. Fixed for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  Player,
  Agent,
  Club,
  Superadmin,
}

impl Role {
  pub const fn as_str(self) -> &'static str {
    match self {
      Role::Player => "player",
      Role::Agent => "agent",
      Role::Club => "club",
      Role::Superadmin => "superadmin",
    }
  }
}

impl fmt::Display for Role {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Returned by [`Role::from_str`] for an unrecognised role name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0:?}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
  type Err = UnknownRole;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "player" => Ok(Role::Player),
      "agent" => Ok(Role::Agent),
      "club" => Ok(Role::Club),
      "superadmin" => Ok(Role::Superadmin),
      _ => Err(UnknownRole(s.to_owned())),
    }
  }
}

/// An authenticated actor. Ownership of resources is keyed off `id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
  pub id:   Uuid,
  pub role: Role,
}

impl Principal {
  pub const fn new(id: Uuid, role: Role) -> Self { Self { id, role } }

  pub const fn player(id: Uuid) -> Self { Self::new(id, Role::Player) }

  pub const fn agent(id: Uuid) -> Self { Self::new(id, Role::Agent) }

  pub const fn club(id: Uuid) -> Self { Self::new(id, Role::Club) }

  pub const fn superadmin(id: Uuid) -> Self { Self::new(id, Role::Superadmin) }

  /// `true` if `owner` is this principal's own id.
  pub fn owns(&self, owner: Uuid) -> bool { self.id == owner }
}
