//! Conversions between domain types and the text stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings, UUIDs hyphenated lowercase, enums their
//! lowercase wire names, and position labels a compact JSON array.

use chrono::{DateTime, Utc};
use roster_core::{
  application::{Application, ApplicationStatus},
  party::{AgentRecord, ContractStatus, PlayerRecord},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn decode_status(s: &str) -> Result<ApplicationStatus> {
  ApplicationStatus::parse(s).ok_or_else(|| Error::Decode {
    column: "applications.status",
    value:  s.to_owned(),
  })
}

pub fn decode_contract_status(s: &str) -> Result<ContractStatus> {
  ContractStatus::parse(s).ok_or_else(|| Error::Decode {
    column: "players.contract_status",
    value:  s.to_owned(),
  })
}

pub fn encode_positions(positions: &[String]) -> Result<String> {
  Ok(serde_json::to_string(positions)?)
}

pub fn decode_positions(s: &str) -> Result<Vec<String>> { Ok(serde_json::from_str(s)?) }

// ─── Rows ────────────────────────────────────────────────────────────────────

pub const AGENT_COLUMNS: &str = "agent_id, agency_name, slug, public_listing, created_at";

/// Raw values read directly from an `agents` row.
pub struct RawAgent {
  pub agent_id:       String,
  pub agency_name:    String,
  pub slug:           String,
  pub public_listing: bool,
  pub created_at:     String,
}

impl RawAgent {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      agent_id:       row.get(0)?,
      agency_name:    row.get(1)?,
      slug:           row.get(2)?,
      public_listing: row.get(3)?,
      created_at:     row.get(4)?,
    })
  }

  pub fn into_agent(self) -> Result<AgentRecord> {
    Ok(AgentRecord {
      agent_id:       decode_uuid(&self.agent_id)?,
      agency_name:    self.agency_name,
      slug:           self.slug,
      public_listing: self.public_listing,
      created_at:     decode_dt(&self.created_at)?,
    })
  }
}

pub const PLAYER_COLUMNS: &str =
  "player_id, name, owner_agent_id, positions, birth_date, contract_status, created_at";

/// Raw values read directly from a `players` row.
pub struct RawPlayer {
  pub player_id:       String,
  pub name:            String,
  pub owner_agent_id:  Option<String>,
  pub positions:       String,
  pub birth_date:      Option<String>,
  pub contract_status: String,
  pub created_at:      String,
}

impl RawPlayer {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      player_id:       row.get(0)?,
      name:            row.get(1)?,
      owner_agent_id:  row.get(2)?,
      positions:       row.get(3)?,
      birth_date:      row.get(4)?,
      contract_status: row.get(5)?,
      created_at:      row.get(6)?,
    })
  }

  pub fn into_player(self) -> Result<PlayerRecord> {
    Ok(PlayerRecord {
      player_id:       decode_uuid(&self.player_id)?,
      name:            self.name,
      owner_agent_id:  self.owner_agent_id.as_deref().map(decode_uuid).transpose()?,
      positions:       decode_positions(&self.positions)?,
      // Stored as written; a malformed date only means "age unknown".
      birth_date:      self.birth_date,
      contract_status: decode_contract_status(&self.contract_status)?,
      created_at:      decode_dt(&self.created_at)?,
    })
  }
}

pub const APPLICATION_COLUMNS: &str =
  "application_id, player_id, agent_id, status, message, created_at, resolved_at";

/// Raw values read directly from an `applications` row.
pub struct RawApplication {
  pub application_id: String,
  pub player_id:      String,
  pub agent_id:       String,
  pub status:         String,
  pub message:        Option<String>,
  pub created_at:     String,
  pub resolved_at:    Option<String>,
}

impl RawApplication {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      application_id: row.get(0)?,
      player_id:      row.get(1)?,
      agent_id:       row.get(2)?,
      status:         row.get(3)?,
      message:        row.get(4)?,
      created_at:     row.get(5)?,
      resolved_at:    row.get(6)?,
    })
  }

  pub fn into_application(self) -> Result<Application> {
    Ok(Application {
      application_id: decode_uuid(&self.application_id)?,
      player_id:      decode_uuid(&self.player_id)?,
      agent_id:       decode_uuid(&self.agent_id)?,
      status:         decode_status(&self.status)?,
      message:        self.message,
      created_at:     decode_dt(&self.created_at)?,
      resolved_at:    self.resolved_at.as_deref().map(decode_dt).transpose()?,
    })
  }
}
