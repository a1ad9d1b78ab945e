//! Directory queries over player records.
//!
//! [`search`] is the pure engine: it filters a sequence of records by
//! position category, contract status and age range, preserving input order.
//! [`Directory`] wraps it with the access gate and the store, so agents see
//! their own roster, clubs see publicly listed rosters, and superadmins see
//! everyone.

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  access::{self, Action, Resource},
  party::{ContractStatus, PlayerRecord},
  position::{self, PositionCategory},
  principal::{Principal, Role},
  store::RosterStore,
};

// ─── Filter ──────────────────────────────────────────────────────────────────

/// Directory constraints. Absent fields constrain nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryFilter {
  pub category:        Option<PositionCategory>,
  pub contract_status: Option<ContractStatus>,
  /// Inclusive lower age bound.
  pub min_age:         Option<i32>,
  /// Inclusive upper age bound.
  pub max_age:         Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
  #[error("{field} must not be negative (got {value})")]
  NegativeAge { field: &'static str, value: i32 },

  #[error("min_age {min} is greater than max_age {max}")]
  InvertedAgeRange { min: i32, max: i32 },
}

impl DirectoryFilter {
  pub fn validate(&self) -> Result<(), FilterError> {
    for (field, bound) in [("min_age", self.min_age), ("max_age", self.max_age)] {
      if let Some(value) = bound
        && value < 0
      {
        return Err(FilterError::NegativeAge { field, value });
      }
    }
    if let (Some(min), Some(max)) = (self.min_age, self.max_age)
      && min > max
    {
      return Err(FilterError::InvertedAgeRange { min, max });
    }
    Ok(())
  }

  pub fn has_age_bounds(&self) -> bool { self.min_age.is_some() || self.max_age.is_some() }

  /// Whether `record` satisfies every present constraint as of `today`.
  pub fn matches(&self, record: &PlayerRecord, today: NaiveDate) -> bool {
    if let Some(category) = self.category
      && !record.positions.iter().any(|p| position::matches_category(p, category))
    {
      return false;
    }

    if let Some(status) = self.contract_status
      && record.contract_status != status
    {
      return false;
    }

    if self.has_age_bounds() {
      // Unknown age never satisfies a bound.
      let Some(born) = record.date_of_birth() else {
        return false;
      };
      let age = age_on(born, today);
      if self.min_age.is_some_and(|min| age < min) || self.max_age.is_some_and(|max| age > max) {
        return false;
      }
    }

    true
  }
}

/// Completed years between `born` and `today`: the calendar-year difference,
/// less one if this year's birthday has not come yet.
pub fn age_on(born: NaiveDate, today: NaiveDate) -> i32 {
  let mut age = today.year() - born.year();
  if (today.month(), today.day()) < (born.month(), born.day()) {
    age -= 1;
  }
  age
}

/// Filter `players` by `filter` as of `today`, keeping input order.
///
/// The filter is validated before any record is examined.
pub fn search<I>(players: I, filter: &DirectoryFilter, today: NaiveDate) -> Result<Vec<PlayerRecord>, FilterError>
where
  I: IntoIterator<Item = PlayerRecord>,
{
  filter.validate()?;
  Ok(
    players
      .into_iter()
      .filter(|p| filter.matches(p, today))
      .collect(),
  )
}

// ─── Gated query ─────────────────────────────────────────────────────────────

/// Request-scoped directory facade over a [`RosterStore`].
pub struct Directory<'s, S> {
  store: &'s S,
}

impl<'s, S: RosterStore> Directory<'s, S> {
  pub fn new(store: &'s S) -> Self { Self { store } }

  /// Run a directory query as `principal`.
  ///
  /// Players are refused outright. For everyone else the records the gate
  /// hides are dropped silently before filtering; hiding is not an error.
  pub async fn query(
    &self,
    principal: &Principal,
    filter:    &DirectoryFilter,
    today:     NaiveDate,
  ) -> Result<Vec<PlayerRecord>> {
    access::authorize(principal, Action::QueryDirectory, Resource::Directory)
      .into_result()
      .map_err(Error::Forbidden)?;
    filter.validate()?;

    let listed: HashSet<Uuid> = self
      .store
      .list_agents()
      .await
      .map_err(Error::store)?
      .into_iter()
      .filter(|a| a.public_listing)
      .map(|a| a.agent_id)
      .collect();

    // Agents only ever see their own roster; skip loading everyone else.
    let owner = (principal.role == Role::Agent).then_some(principal.id);
    let players = self.store.list_players(owner).await.map_err(Error::store)?;
    let scanned = players.len();

    let visible = players.into_iter().filter(|p| {
      let resource = Resource::DirectoryRecord {
        owner_agent_id:  p.owner_agent_id,
        publicly_listed: p.owner_agent_id.is_some_and(|id| listed.contains(&id)),
      };
      access::authorize(principal, Action::QueryDirectory, resource).is_allowed()
    });

    let results = search(visible, filter, today)?;
    tracing::debug!(
      role = %principal.role,
      scanned,
      returned = results.len(),
      "directory query"
    );
    Ok(results)
  }
}

#[cfg(test)]
mod tests {
  use chrono::Utc;

  use super::*;

  fn date(y: i32, m: u32, d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(y, m, d).unwrap() }

  fn player(positions: &[&str], birth_date: Option<&str>, status: ContractStatus) -> PlayerRecord {
    PlayerRecord {
      player_id:       Uuid::new_v4(),
      name:            "Test Player".into(),
      owner_agent_id:  None,
      positions:       positions.iter().map(|p| p.to_string()).collect(),
      birth_date:      birth_date.map(str::to_owned),
      contract_status: status,
      created_at:      Utc::now(),
    }
  }

  #[test]
  fn age_uses_month_day_correction() {
    let born = date(2008, 10, 16);
    assert_eq!(age_on(born, date(2026, 10, 16)), 18);
    assert_eq!(age_on(born, date(2026, 10, 15)), 17);
    assert_eq!(age_on(born, date(2026, 11, 1)), 18);
    assert_eq!(age_on(date(2004, 2, 29), date(2026, 2, 28)), 21);
    assert_eq!(age_on(date(2004, 2, 29), date(2026, 3, 1)), 22);
  }

  #[test]
  fn exact_birthday_is_inclusive() {
    let today = date(2026, 10, 16);
    let p = player(&["Arquero"], Some("2008-10-16"), ContractStatus::Free);

    let min18 = DirectoryFilter { min_age: Some(18), ..Default::default() };
    let max17 = DirectoryFilter { max_age: Some(17), ..Default::default() };
    assert_eq!(search(vec![p.clone()], &min18, today).unwrap(), vec![p.clone()]);
    assert!(search(vec![p], &max17, today).unwrap().is_empty());
  }

  #[test]
  fn volante_central_is_not_a_defender() {
    let today = date(2026, 10, 16);
    let p = player(&["Volante Central"], None, ContractStatus::Free);

    let defenders = DirectoryFilter { category: Some(PositionCategory::Defender), ..Default::default() };
    let mids = DirectoryFilter { category: Some(PositionCategory::Midfielder), ..Default::default() };
    assert!(search(vec![p.clone()], &defenders, today).unwrap().is_empty());
    assert_eq!(search(vec![p.clone()], &mids, today).unwrap(), vec![p]);
  }

  #[test]
  fn category_search_matches_classifier_exactly() {
    let today = date(2026, 10, 16);
    let players = vec![
      player(&["Arquero"], None, ContractStatus::Free),
      player(&["Lateral Derecho", "Volante"], None, ContractStatus::Free),
      player(&["Volante Central"], None, ContractStatus::Free),
      player(&["Mediapunta"], None, ContractStatus::Free),
      player(&["Delantero", "Extremo"], None, ContractStatus::Free),
      player(&["utilero"], None, ContractStatus::Free),
      player(&[], None, ContractStatus::Free),
    ];

    for category in PositionCategory::ALL {
      let filter = DirectoryFilter { category: Some(category), ..Default::default() };
      let found = search(players.clone(), &filter, today).unwrap();
      let expected: Vec<PlayerRecord> = players
        .iter()
        .filter(|p| position::classify_all(&p.positions).contains(&category))
        .cloned()
        .collect();
      assert_eq!(found, expected, "category {category}");
    }
  }

  #[test]
  fn contract_status_is_exact() {
    let today = date(2026, 10, 16);
    let free = player(&["Punta"], None, ContractStatus::Free);
    let loaned = player(&["Punta"], None, ContractStatus::Loaned);
    let filter = DirectoryFilter { contract_status: Some(ContractStatus::Loaned), ..Default::default() };
    assert_eq!(search(vec![free, loaned.clone()], &filter, today).unwrap(), vec![loaned]);
  }

  #[test]
  fn unknown_birth_date_only_fails_age_bounds() {
    let today = date(2026, 10, 16);
    let missing = player(&["Pivote"], None, ContractStatus::Free);
    let garbled = player(&["Pivote"], Some("16/10/2008"), ContractStatus::Free);
    let players = vec![missing, garbled];

    let by_category = DirectoryFilter { category: Some(PositionCategory::Midfielder), ..Default::default() };
    assert_eq!(search(players.clone(), &by_category, today).unwrap().len(), 2);

    let wide_age = DirectoryFilter { min_age: Some(0), max_age: Some(99), ..by_category };
    assert!(search(players, &wide_age, today).unwrap().is_empty());
  }

  #[test]
  fn results_keep_input_order() {
    let today = date(2026, 10, 16);
    let players: Vec<_> = (0..5).map(|_| player(&["Defensa"], None, ContractStatus::Free)).collect();
    let found = search(players.clone(), &DirectoryFilter::default(), today).unwrap();
    assert_eq!(found, players);
  }

  #[test]
  fn invalid_filters_are_rejected() {
    let today = date(2026, 10, 16);
    let negative = DirectoryFilter { min_age: Some(-1), ..Default::default() };
    assert_eq!(
      search(Vec::new(), &negative, today),
      Err(FilterError::NegativeAge { field: "min_age", value: -1 })
    );

    let inverted = DirectoryFilter { min_age: Some(20), max_age: Some(18), ..Default::default() };
    assert_eq!(
      search(Vec::new(), &inverted, today),
      Err(FilterError::InvertedAgeRange { min: 20, max: 18 })
    );
  }
}
