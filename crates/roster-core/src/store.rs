//! The `RosterStore` trait — the persistence collaborator.
//!
//! The trait is implemented by storage backends (e.g. `roster-store-sqlite`).
//! Higher layers (`roster-api`, `roster-server`) depend on this abstraction
//! through the facades in this crate, not on any concrete backend.
//!
//! Stores do no authorization. Every method assumes the caller has already
//! been through the access gate.

use std::future::Future;

use uuid::Uuid;

use crate::{
  application::{Application, ApplicationStatus, NewApplication},
  party::{AgentRecord, NewPlayer, PlayerRecord},
};

// ─── Outcomes ────────────────────────────────────────────────────────────────

/// Result of [`RosterStore::insert_application`].
#[derive(Debug, Clone)]
pub enum InsertOutcome {
  Created(Application),
  /// A pending application for the same `(player_id, agent_id)` pair already
  /// exists; nothing was written.
  DuplicatePending { existing: Uuid },
}

/// Result of [`RosterStore::resolve_application`].
#[derive(Debug, Clone)]
pub enum ResolveOutcome {
  /// The compare-and-set won; the updated application.
  Applied(Application),
  /// The application was no longer pending; nothing was written. Carries the
  /// application as it currently stands.
  Lost(Application),
  /// No application with that id.
  Missing,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Roster store backend.
///
/// Applications are never deleted. Their only mutation is the single
/// `pending → terminal` compare-and-set in
/// [`resolve_application`](RosterStore::resolve_application).
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait RosterStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Agents ────────────────────────────────────────────────────────────

  /// Create and persist an agent. Returns `None` if `slug` is already taken.
  fn add_agent(
    &self,
    agency_name: String,
    slug: String,
    public_listing: bool,
  ) -> impl Future<Output = Result<Option<AgentRecord>, Self::Error>> + Send + '_;

  /// Retrieve an agent by UUID. Returns `None` if not found.
  fn get_agent(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<AgentRecord>, Self::Error>> + Send + '_;

  /// List all agents in registration order.
  fn list_agents(&self) -> impl Future<Output = Result<Vec<AgentRecord>, Self::Error>> + Send + '_;

  /// Update an agent's public-listing flag. Returns `None` if not found.
  fn set_public_listing(
    &self,
    agent_id: Uuid,
    listed: bool,
  ) -> impl Future<Output = Result<Option<AgentRecord>, Self::Error>> + Send + '_;

  // ── Players ───────────────────────────────────────────────────────────

  /// Create and persist an unaffiliated player.
  fn add_player(
    &self,
    input: NewPlayer,
  ) -> impl Future<Output = Result<PlayerRecord, Self::Error>> + Send + '_;

  /// Retrieve a player by UUID. Returns `None` if not found.
  fn get_player(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<PlayerRecord>, Self::Error>> + Send + '_;

  /// List players in registration order, optionally restricted to one
  /// agent's roster.
  fn list_players(
    &self,
    owner_agent_id: Option<Uuid>,
  ) -> impl Future<Output = Result<Vec<PlayerRecord>, Self::Error>> + Send + '_;

  // ── Applications ──────────────────────────────────────────────────────

  /// Persist a new `pending` application unless the pair already has one.
  /// The check and the insert are a single atomic unit.
  fn insert_application(
    &self,
    input: NewApplication,
  ) -> impl Future<Output = Result<InsertOutcome, Self::Error>> + Send + '_;

  /// Retrieve an application by UUID. Returns `None` if not found.
  fn get_application(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Application>, Self::Error>> + Send + '_;

  /// Every application a player submitted, oldest first.
  fn list_applications_for_player(
    &self,
    player_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Application>, Self::Error>> + Send + '_;

  /// Every application addressed to an agent, oldest first.
  fn list_applications_for_agent(
    &self,
    agent_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Application>, Self::Error>> + Send + '_;

  /// Atomically move a `pending` application to the terminal `target`.
  ///
  /// When `target` is [`ApplicationStatus::Accepted`] the referenced player's
  /// `owner_agent_id` is set to the application's agent in the same atomic
  /// unit: both writes land or neither does. Callers validate `target` with
  /// [`ApplicationStatus::next`] first.
  fn resolve_application(
    &self,
    id: Uuid,
    target: ApplicationStatus,
  ) -> impl Future<Output = Result<ResolveOutcome, Self::Error>> + Send + '_;
}
