//! Agents and players — the parties an application connects.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Contract status ─────────────────────────────────────────────────────────

/// A player's current contractual situation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractStatus {
  Free,
  Loaned,
  Contracted,
}

impl ContractStatus {
  pub const fn as_str(self) -> &'static str {
    match self {
      ContractStatus::Free => "free",
      ContractStatus::Loaned => "loaned",
      ContractStatus::Contracted => "contracted",
    }
  }

  pub fn parse(s: &str) -> Option<Self> {
    match s {
      "free" => Some(ContractStatus::Free),
      "loaned" => Some(ContractStatus::Loaned),
      "contracted" => Some(ContractStatus::Contracted),
      _ => None,
    }
  }
}

// ─── Players ─────────────────────────────────────────────────────────────────

/// A player profile as the directory and the workflow see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
  pub player_id:       Uuid,
  pub name:            String,
  /// Set once the player is on an agency's roster; the ownership link read
  /// by the access gate. `None` for unaffiliated players.
  pub owner_agent_id:  Option<Uuid>,
  /// Position labels exactly as the submitter wrote or picked them.
  pub positions:       Vec<String>,
  /// Raw `YYYY-MM-DD` birth date. Absent or unparseable means the age is
  /// unknown.
  pub birth_date:      Option<String>,
  pub contract_status: ContractStatus,
  pub created_at:      DateTime<Utc>,
}

impl PlayerRecord {
  /// The birth date, if present and well formed.
  pub fn date_of_birth(&self) -> Option<NaiveDate> {
    self.birth_date.as_deref().and_then(parse_birth_date)
  }
}

/// Parse an ISO `YYYY-MM-DD` birth date, tolerating surrounding whitespace.
pub fn parse_birth_date(raw: &str) -> Option<NaiveDate> {
  NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// Input for registering a new player. Players start unaffiliated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPlayer {
  pub name:            String,
  #[serde(default)]
  pub positions:       Vec<String>,
  pub birth_date:      Option<String>,
  pub contract_status: ContractStatus,
}

// ─── Agents ──────────────────────────────────────────────────────────────────

/// An agency. Its players form its roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRecord {
  pub agent_id:       Uuid,
  pub agency_name:    String,
  /// Public identifier; unique across agents.
  pub slug:           String,
  /// Whether clubs may see this agency's roster in the directory.
  pub public_listing: bool,
  pub created_at:     DateTime<Utc>,
}

/// Input for registering a new agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAgent {
  pub agency_name:    String,
  /// Derived from `agency_name` when absent.
  pub slug:           Option<String>,
  #[serde(default)]
  pub public_listing: bool,
}

/// Derive a slug: lowercase ASCII alphanumerics separated by single hyphens.
pub fn slugify(name: &str) -> String {
  let mut slug = String::with_capacity(name.len());
  for c in crate::position::fold_diacritics(&name.to_lowercase()).chars() {
    if c.is_ascii_alphanumeric() {
      slug.push(c);
    } else if !slug.is_empty() && !slug.ends_with('-') {
      slug.push('-');
    }
  }
  while slug.ends_with('-') {
    slug.pop();
  }
  slug
}

/// `true` if `slug` is already in canonical form.
pub fn is_valid_slug(slug: &str) -> bool {
  !slug.is_empty()
    && !slug.starts_with('-')
    && !slug.ends_with('-')
    && !slug.contains("--")
    && slug
      .chars()
      .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn slugify_folds_accents_and_punctuation() {
    assert_eq!(slugify("Gestión Deportiva & Asociados"), "gestion-deportiva-asociados");
    assert_eq!(slugify("  Top  Talent FC  "), "top-talent-fc");
    assert_eq!(slugify("!!!"), "");
  }

  #[test]
  fn slug_validation() {
    assert!(is_valid_slug("top-talent-2"));
    assert!(!is_valid_slug("Top-Talent"));
    assert!(!is_valid_slug("-leading"));
    assert!(!is_valid_slug("double--hyphen"));
    assert!(!is_valid_slug(""));
  }

  #[test]
  fn malformed_birth_date_is_unknown() {
    assert_eq!(parse_birth_date("2001-02-03"), NaiveDate::from_ymd_opt(2001, 2, 3));
    assert_eq!(parse_birth_date(" 2001-02-03 "), NaiveDate::from_ymd_opt(2001, 2, 3));
    assert_eq!(parse_birth_date("03/02/2001"), None);
    assert_eq!(parse_birth_date("2001-02-30"), None);
  }
}
