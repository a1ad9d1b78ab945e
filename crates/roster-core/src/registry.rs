//! Registration of agents and players, and the agent's public-listing flag.

use uuid::Uuid;

use crate::{
  Error, Result,
  access::{self, Action, Resource},
  party::{AgentRecord, NewAgent, NewPlayer, PlayerRecord, is_valid_slug, slugify},
  principal::Principal,
  store::RosterStore,
};

/// Request-scoped registry facade over a [`RosterStore`].
pub struct Registry<'s, S> {
  store: &'s S,
}

impl<'s, S: RosterStore> Registry<'s, S> {
  pub fn new(store: &'s S) -> Self { Self { store } }

  /// Register a new agency. A missing slug is derived from the agency name;
  /// a supplied one must already be in canonical form.
  pub async fn register_agent(&self, principal: &Principal, input: NewAgent) -> Result<AgentRecord> {
    access::authorize(principal, Action::RegisterAgent, Resource::Registry)
      .into_result()
      .map_err(Error::Forbidden)?;

    let slug = match input.slug {
      Some(slug) if is_valid_slug(&slug) => slug,
      Some(slug) => return Err(Error::InvalidSlug(slug)),
      None => slugify(&input.agency_name),
    };
    if slug.is_empty() {
      return Err(Error::InvalidSlug(input.agency_name));
    }

    let agent = self
      .store
      .add_agent(input.agency_name, slug.clone(), input.public_listing)
      .await
      .map_err(Error::store)?
      .ok_or(Error::SlugTaken(slug))?;

    tracing::info!(agent = %agent.agent_id, slug = %agent.slug, "agent registered");
    Ok(agent)
  }

  /// Register a new, unaffiliated player.
  pub async fn register_player(&self, principal: &Principal, input: NewPlayer) -> Result<PlayerRecord> {
    access::authorize(principal, Action::RegisterPlayer, Resource::Registry)
      .into_result()
      .map_err(Error::Forbidden)?;

    let player = self.store.add_player(input).await.map_err(Error::store)?;
    tracing::info!(player = %player.player_id, "player registered");
    Ok(player)
  }

  /// Opt an agency's roster in or out of the club-facing directory.
  pub async fn set_public_listing(
    &self,
    principal: &Principal,
    agent_id:  Uuid,
    listed:    bool,
  ) -> Result<AgentRecord> {
    access::authorize(principal, Action::SetPublicListing, Resource::Agent { agent_id })
      .into_result()
      .map_err(Error::Forbidden)?;

    self
      .store
      .set_public_listing(agent_id, listed)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::not_found("agent", agent_id))
  }
}
