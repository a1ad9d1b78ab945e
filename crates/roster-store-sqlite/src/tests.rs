//! Integration tests for `SqliteStore` against an in-memory database.

use roster_core::{
  application::{ApplicationStatus, NewApplication},
  party::{ContractStatus, NewPlayer},
  store::{InsertOutcome, ResolveOutcome, RosterStore},
};
use uuid::Uuid;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn new_player(name: &str, positions: &[&str]) -> NewPlayer {
  NewPlayer {
    name:            name.into(),
    positions:       positions.iter().map(|p| p.to_string()).collect(),
    birth_date:      Some("2001-03-09".into()),
    contract_status: ContractStatus::Free,
  }
}

fn new_application(player_id: Uuid, agent_id: Uuid) -> NewApplication {
  NewApplication { player_id, agent_id, message: Some("Hola".into()) }
}

// ─── Agents ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_agent() {
  let s = store().await;

  let agent = s
    .add_agent("Norte Sports".into(), "norte-sports".into(), true)
    .await
    .unwrap()
    .expect("slug is free");
  assert_eq!(agent.slug, "norte-sports");
  assert!(agent.public_listing);

  let fetched = s.get_agent(agent.agent_id).await.unwrap().unwrap();
  assert_eq!(fetched, agent);
}

#[tokio::test]
async fn duplicate_slug_is_refused() {
  let s = store().await;
  s.add_agent("Norte".into(), "norte".into(), false).await.unwrap().unwrap();

  let second = s.add_agent("Norte Again".into(), "norte".into(), false).await.unwrap();
  assert!(second.is_none());
  assert_eq!(s.list_agents().await.unwrap().len(), 1);
}

#[tokio::test]
async fn set_public_listing_round_trips() {
  let s = store().await;
  let agent = s.add_agent("Sur".into(), "sur".into(), false).await.unwrap().unwrap();

  let updated = s.set_public_listing(agent.agent_id, true).await.unwrap().unwrap();
  assert!(updated.public_listing);

  assert!(s.set_public_listing(Uuid::new_v4(), true).await.unwrap().is_none());
}

// ─── Players ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn new_players_are_unaffiliated() {
  let s = store().await;
  let player = s.add_player(new_player("Ana", &["Volante Central"])).await.unwrap();
  assert_eq!(player.owner_agent_id, None);

  let fetched = s.get_player(player.player_id).await.unwrap().unwrap();
  assert_eq!(fetched, player);
}

#[tokio::test]
async fn malformed_birth_date_is_kept_verbatim() {
  let s = store().await;
  let mut input = new_player("Bea", &["Arquero"]);
  input.birth_date = Some("sometime in 2003".into());

  let player = s.add_player(input).await.unwrap();
  let fetched = s.get_player(player.player_id).await.unwrap().unwrap();
  assert_eq!(fetched.birth_date.as_deref(), Some("sometime in 2003"));
  assert_eq!(fetched.date_of_birth(), None);
}

#[tokio::test]
async fn list_players_by_owner() {
  let s = store().await;
  let agent = s.add_agent("Este".into(), "este".into(), false).await.unwrap().unwrap();
  let a = s.add_player(new_player("A", &[])).await.unwrap();
  let b = s.add_player(new_player("B", &[])).await.unwrap();

  let app = match s.insert_application(new_application(b.player_id, agent.agent_id)).await.unwrap() {
    InsertOutcome::Created(app) => app,
    other => panic!("unexpected {other:?}"),
  };
  s.resolve_application(app.application_id, ApplicationStatus::Accepted)
    .await
    .unwrap();

  let all: Vec<Uuid> = s.list_players(None).await.unwrap().iter().map(|p| p.player_id).collect();
  assert_eq!(all, vec![a.player_id, b.player_id]);

  let roster = s.list_players(Some(agent.agent_id)).await.unwrap();
  assert_eq!(roster.len(), 1);
  assert_eq!(roster[0].player_id, b.player_id);
}

// ─── Applications ────────────────────────────────────────────────────────────

#[tokio::test]
async fn second_pending_for_pair_is_a_duplicate() {
  let s = store().await;
  let agent = s.add_agent("Oeste".into(), "oeste".into(), false).await.unwrap().unwrap();
  let player = s.add_player(new_player("C", &[])).await.unwrap();

  let first = match s.insert_application(new_application(player.player_id, agent.agent_id)).await.unwrap() {
    InsertOutcome::Created(app) => app,
    other => panic!("unexpected {other:?}"),
  };
  assert_eq!(first.status, ApplicationStatus::Pending);

  match s.insert_application(new_application(player.player_id, agent.agent_id)).await.unwrap() {
    InsertOutcome::DuplicatePending { existing } => assert_eq!(existing, first.application_id),
    other => panic!("unexpected {other:?}"),
  }
  assert_eq!(s.list_applications_for_player(player.player_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn resolved_pair_may_apply_again() {
  let s = store().await;
  let agent = s.add_agent("Oeste".into(), "oeste".into(), false).await.unwrap().unwrap();
  let player = s.add_player(new_player("C", &[])).await.unwrap();

  let InsertOutcome::Created(first) = s
    .insert_application(new_application(player.player_id, agent.agent_id))
    .await
    .unwrap()
  else {
    panic!("first insert");
  };
  s.resolve_application(first.application_id, ApplicationStatus::Rejected)
    .await
    .unwrap();

  let again = s
    .insert_application(new_application(player.player_id, agent.agent_id))
    .await
    .unwrap();
  assert!(matches!(again, InsertOutcome::Created(_)));

  let history = s.list_applications_for_agent(agent.agent_id).await.unwrap();
  assert_eq!(history.len(), 2);
  assert_eq!(history[0].application_id, first.application_id);
  assert_eq!(history[0].status, ApplicationStatus::Rejected);
  assert_eq!(history[1].status, ApplicationStatus::Pending);
}

#[tokio::test]
async fn accept_sets_owner_and_resolved_at() {
  let s = store().await;
  let agent = s.add_agent("Centro".into(), "centro".into(), false).await.unwrap().unwrap();
  let player = s.add_player(new_player("D", &[])).await.unwrap();
  let InsertOutcome::Created(app) = s
    .insert_application(new_application(player.player_id, agent.agent_id))
    .await
    .unwrap()
  else {
    panic!("insert");
  };

  let outcome = s
    .resolve_application(app.application_id, ApplicationStatus::Accepted)
    .await
    .unwrap();
  let ResolveOutcome::Applied(resolved) = outcome else {
    panic!("expected Applied, got {outcome:?}");
  };
  assert_eq!(resolved.status, ApplicationStatus::Accepted);
  assert!(resolved.resolved_at.is_some());

  let player = s.get_player(player.player_id).await.unwrap().unwrap();
  assert_eq!(player.owner_agent_id, Some(agent.agent_id));
}

#[tokio::test]
async fn reject_leaves_owner_untouched() {
  let s = store().await;
  let agent = s.add_agent("Centro".into(), "centro".into(), false).await.unwrap().unwrap();
  let player = s.add_player(new_player("E", &[])).await.unwrap();
  let InsertOutcome::Created(app) = s
    .insert_application(new_application(player.player_id, agent.agent_id))
    .await
    .unwrap()
  else {
    panic!("insert");
  };

  s.resolve_application(app.application_id, ApplicationStatus::Rejected)
    .await
    .unwrap();
  let player = s.get_player(player.player_id).await.unwrap().unwrap();
  assert_eq!(player.owner_agent_id, None);
}

#[tokio::test]
async fn second_resolve_loses_and_writes_nothing() {
  let s = store().await;
  let agent = s.add_agent("Centro".into(), "centro".into(), false).await.unwrap().unwrap();
  let player = s.add_player(new_player("F", &[])).await.unwrap();
  let InsertOutcome::Created(app) = s
    .insert_application(new_application(player.player_id, agent.agent_id))
    .await
    .unwrap()
  else {
    panic!("insert");
  };

  let ResolveOutcome::Applied(first) = s
    .resolve_application(app.application_id, ApplicationStatus::Rejected)
    .await
    .unwrap()
  else {
    panic!("first resolve");
  };

  let outcome = s
    .resolve_application(app.application_id, ApplicationStatus::Accepted)
    .await
    .unwrap();
  let ResolveOutcome::Lost(current) = outcome else {
    panic!("expected Lost, got {outcome:?}");
  };
  assert_eq!(current, first);

  let player = s.get_player(player.player_id).await.unwrap().unwrap();
  assert_eq!(player.owner_agent_id, None);
}

#[tokio::test]
async fn resolve_missing_application() {
  let s = store().await;
  let outcome = s
    .resolve_application(Uuid::new_v4(), ApplicationStatus::Accepted)
    .await
    .unwrap();
  assert!(matches!(outcome, ResolveOutcome::Missing));
}

#[tokio::test]
async fn resolve_to_pending_is_refused() {
  let s = store().await;
  let err = s
    .resolve_application(Uuid::new_v4(), ApplicationStatus::Pending)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::NonTerminalTarget(ApplicationStatus::Pending)));
}

#[tokio::test]
async fn open_persists_to_file() {
  let dir = std::env::temp_dir().join(format!("roster-store-{}", Uuid::new_v4()));
  std::fs::create_dir_all(&dir).unwrap();
  let path = dir.join("roster.db");

  let agent_id = {
    let s = SqliteStore::open(&path).await.unwrap();
    s.add_agent("Persist".into(), "persist".into(), true)
      .await
      .unwrap()
      .unwrap()
      .agent_id
  };

  let reopened = SqliteStore::open(&path).await.unwrap();
  let agent = reopened.get_agent(agent_id).await.unwrap().unwrap();
  assert_eq!(agent.slug, "persist");

  let _ = std::fs::remove_dir_all(&dir);
}
