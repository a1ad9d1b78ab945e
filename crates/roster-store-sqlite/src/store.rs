//! [`SqliteStore`] — the SQLite implementation of [`RosterStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::{OptionalExtension as _, TransactionBehavior, params};
use uuid::Uuid;

use roster_core::{
  application::{Application, ApplicationStatus, NewApplication},
  party::{AgentRecord, NewPlayer, PlayerRecord},
  store::{InsertOutcome, ResolveOutcome, RosterStore},
};

use crate::{
  Error, Result,
  encode::{
    AGENT_COLUMNS, APPLICATION_COLUMNS, PLAYER_COLUMNS, RawAgent, RawApplication, RawPlayer,
    decode_uuid, encode_dt, encode_positions, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Roster store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn query_applications(&self, column: &'static str, id: Uuid) -> Result<Vec<Application>> {
    let id_str = encode_uuid(id);
    let raws: Vec<RawApplication> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {APPLICATION_COLUMNS} FROM applications WHERE {column} = ?1 ORDER BY rowid"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(params![id_str], RawApplication::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawApplication::into_application).collect()
  }
}

// ─── RosterStore impl ────────────────────────────────────────────────────────

impl RosterStore for SqliteStore {
  type Error = Error;

  // ── Agents ────────────────────────────────────────────────────────────────

  async fn add_agent(
    &self,
    agency_name: String,
    slug: String,
    public_listing: bool,
  ) -> Result<Option<AgentRecord>> {
    let agent = AgentRecord {
      agent_id: Uuid::new_v4(),
      agency_name,
      slug,
      public_listing,
      created_at: Utc::now(),
    };

    let id_str      = encode_uuid(agent.agent_id);
    let name_str    = agent.agency_name.clone();
    let slug_str    = agent.slug.clone();
    let created_str = encode_dt(agent.created_at);

    let inserted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let taken = tx
          .query_row("SELECT 1 FROM agents WHERE slug = ?1", params![slug_str], |_| Ok(()))
          .optional()?
          .is_some();
        if taken {
          return Ok(false);
        }
        tx.execute(
          "INSERT INTO agents (agent_id, agency_name, slug, public_listing, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          params![id_str, name_str, slug_str, public_listing, created_str],
        )?;
        tx.commit()?;
        Ok(true)
      })
      .await?;

    Ok(inserted.then_some(agent))
  }

  async fn get_agent(&self, id: Uuid) -> Result<Option<AgentRecord>> {
    let id_str = encode_uuid(id);
    let raw: Option<RawAgent> = self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT {AGENT_COLUMNS} FROM agents WHERE agent_id = ?1");
        Ok(conn.query_row(&sql, params![id_str], RawAgent::from_row).optional()?)
      })
      .await?;

    raw.map(RawAgent::into_agent).transpose()
  }

  async fn list_agents(&self) -> Result<Vec<AgentRecord>> {
    let raws: Vec<RawAgent> = self
      .conn
      .call(|conn| {
        let sql = format!("SELECT {AGENT_COLUMNS} FROM agents ORDER BY rowid");
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], RawAgent::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAgent::into_agent).collect()
  }

  async fn set_public_listing(&self, agent_id: Uuid, listed: bool) -> Result<Option<AgentRecord>> {
    let id_str = encode_uuid(agent_id);
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE agents SET public_listing = ?2 WHERE agent_id = ?1",
          params![id_str, listed],
        )?)
      })
      .await?;

    if changed == 0 {
      return Ok(None);
    }
    self.get_agent(agent_id).await
  }

  // ── Players ───────────────────────────────────────────────────────────────

  async fn add_player(&self, input: NewPlayer) -> Result<PlayerRecord> {
    let player = PlayerRecord {
      player_id:       Uuid::new_v4(),
      name:            input.name,
      owner_agent_id:  None,
      positions:       input.positions,
      birth_date:      input.birth_date,
      contract_status: input.contract_status,
      created_at:      Utc::now(),
    };

    let id_str        = encode_uuid(player.player_id);
    let name_str      = player.name.clone();
    let positions_str = encode_positions(&player.positions)?;
    let birth_str     = player.birth_date.clone();
    let contract_str  = player.contract_status.as_str();
    let created_str   = encode_dt(player.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO players (player_id, name, owner_agent_id, positions, birth_date,
                                contract_status, created_at)
           VALUES (?1, ?2, NULL, ?3, ?4, ?5, ?6)",
          params![id_str, name_str, positions_str, birth_str, contract_str, created_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(player)
  }

  async fn get_player(&self, id: Uuid) -> Result<Option<PlayerRecord>> {
    let id_str = encode_uuid(id);
    let raw: Option<RawPlayer> = self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT {PLAYER_COLUMNS} FROM players WHERE player_id = ?1");
        Ok(conn.query_row(&sql, params![id_str], RawPlayer::from_row).optional()?)
      })
      .await?;

    raw.map(RawPlayer::into_player).transpose()
  }

  async fn list_players(&self, owner_agent_id: Option<Uuid>) -> Result<Vec<PlayerRecord>> {
    let owner_str = owner_agent_id.map(encode_uuid);
    let raws: Vec<RawPlayer> = self
      .conn
      .call(move |conn| {
        let rows = match owner_str {
          Some(owner) => {
            let sql = format!(
              "SELECT {PLAYER_COLUMNS} FROM players WHERE owner_agent_id = ?1 ORDER BY rowid"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
              .query_map(params![owner], RawPlayer::from_row)?
              .collect::<rusqlite::Result<Vec<_>>>()?;
            rows
          }
          None => {
            let sql = format!("SELECT {PLAYER_COLUMNS} FROM players ORDER BY rowid");
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
              .query_map([], RawPlayer::from_row)?
              .collect::<rusqlite::Result<Vec<_>>>()?;
            rows
          }
        };
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPlayer::into_player).collect()
  }

  // ── Applications ──────────────────────────────────────────────────────────

  async fn insert_application(&self, input: NewApplication) -> Result<InsertOutcome> {
    let app = Application {
      application_id: Uuid::new_v4(),
      player_id:      input.player_id,
      agent_id:       input.agent_id,
      status:         ApplicationStatus::Pending,
      message:        input.message,
      created_at:     Utc::now(),
      resolved_at:    None,
    };

    let id_str      = encode_uuid(app.application_id);
    let player_str  = encode_uuid(app.player_id);
    let agent_str   = encode_uuid(app.agent_id);
    let message_str = app.message.clone();
    let created_str = encode_dt(app.created_at);

    // The duplicate check and the insert share one write lock, so two
    // concurrent submissions for the same pair cannot both pass the check.
    let existing: Option<String> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let existing: Option<String> = tx
          .query_row(
            "SELECT application_id FROM applications
             WHERE player_id = ?1 AND agent_id = ?2 AND status = 'pending'",
            params![player_str, agent_str],
            |r| r.get(0),
          )
          .optional()?;
        if existing.is_some() {
          return Ok(existing);
        }
        tx.execute(
          "INSERT INTO applications (application_id, player_id, agent_id, status, message,
                                     created_at, resolved_at)
           VALUES (?1, ?2, ?3, 'pending', ?4, ?5, NULL)",
          params![id_str, player_str, agent_str, message_str, created_str],
        )?;
        tx.commit()?;
        Ok(None)
      })
      .await?;

    match existing {
      Some(existing) => Ok(InsertOutcome::DuplicatePending { existing: decode_uuid(&existing)? }),
      None => Ok(InsertOutcome::Created(app)),
    }
  }

  async fn get_application(&self, id: Uuid) -> Result<Option<Application>> {
    let id_str = encode_uuid(id);
    let raw: Option<RawApplication> = self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT {APPLICATION_COLUMNS} FROM applications WHERE application_id = ?1");
        Ok(conn.query_row(&sql, params![id_str], RawApplication::from_row).optional()?)
      })
      .await?;

    raw.map(RawApplication::into_application).transpose()
  }

  async fn list_applications_for_player(&self, player_id: Uuid) -> Result<Vec<Application>> {
    self.query_applications("player_id", player_id).await
  }

  async fn list_applications_for_agent(&self, agent_id: Uuid) -> Result<Vec<Application>> {
    self.query_applications("agent_id", agent_id).await
  }

  async fn resolve_application(&self, id: Uuid, target: ApplicationStatus) -> Result<ResolveOutcome> {
    if !target.is_terminal() {
      return Err(Error::NonTerminalTarget(target));
    }

    let id_str       = encode_uuid(id);
    let status_str   = target.as_str();
    let resolved_str = encode_dt(Utc::now());
    let accept       = target == ApplicationStatus::Accepted;

    let (applied, raw): (bool, Option<RawApplication>) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        // Compare-and-set: only a pending row moves.
        let changed = tx.execute(
          "UPDATE applications SET status = ?2, resolved_at = ?3
           WHERE application_id = ?1 AND status = 'pending'",
          params![id_str, status_str, resolved_str],
        )?;

        if changed == 1 && accept {
          tx.execute(
            "UPDATE players
             SET owner_agent_id = (SELECT agent_id FROM applications WHERE application_id = ?1)
             WHERE player_id = (SELECT player_id FROM applications WHERE application_id = ?1)",
            params![id_str],
          )?;
        }

        let sql = format!("SELECT {APPLICATION_COLUMNS} FROM applications WHERE application_id = ?1");
        let raw = tx.query_row(&sql, params![id_str], RawApplication::from_row).optional()?;
        tx.commit()?;
        Ok((changed == 1, raw))
      })
      .await?;

    let Some(raw) = raw else {
      return Ok(ResolveOutcome::Missing);
    };
    let app = raw.into_application()?;
    if applied {
      Ok(ResolveOutcome::Applied(app))
    } else {
      tracing::debug!(application = %id, current = %app.status, "compare-and-set found no pending row");
      Ok(ResolveOutcome::Lost(app))
    }
  }
}
