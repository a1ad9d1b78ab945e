//! Handler for `GET /directory`.
//!
//! Query parameters: `category`, `contract_status`, `min_age`, `max_age`,
//! `as_of` (`YYYY-MM-DD`, defaults to today in UTC), `limit`, `offset`.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State, rejection::QueryRejection},
};
use chrono::{NaiveDate, Utc};
use roster_core::{
  directory::{Directory, DirectoryFilter},
  party::{ContractStatus, PlayerRecord},
  position::PositionCategory,
  store::RosterStore,
};
use serde::{Deserialize, Serialize};

use crate::{error::ApiError, principal::CurrentPrincipal};

#[derive(Debug, Default, Deserialize)]
pub struct DirectoryParams {
  pub category:        Option<PositionCategory>,
  pub contract_status: Option<ContractStatus>,
  pub min_age:         Option<i32>,
  pub max_age:         Option<i32>,
  pub as_of:           Option<NaiveDate>,
  pub limit:           Option<usize>,
  #[serde(default)]
  pub offset:          usize,
}

/// One page of directory results. `total` counts every match before paging.
#[derive(Debug, Serialize)]
pub struct DirectoryPage {
  pub total:   usize,
  pub offset:  usize,
  pub players: Vec<PlayerRecord>,
}

/// `GET /directory`
pub async fn query<S>(
  State(store): State<Arc<S>>,
  CurrentPrincipal(principal): CurrentPrincipal,
  params: Result<Query<DirectoryParams>, QueryRejection>,
) -> Result<Json<DirectoryPage>, ApiError>
where
  S: RosterStore,
{
  // An unknown category or a non-numeric age is a bad filter, not a bad request.
  let Query(params) = params.map_err(|e| ApiError::InvalidFilterParams(e.body_text()))?;

  let filter = DirectoryFilter {
    category:        params.category,
    contract_status: params.contract_status,
    min_age:         params.min_age,
    max_age:         params.max_age,
  };
  let today = params.as_of.unwrap_or_else(|| Utc::now().date_naive());

  let matches = Directory::new(store.as_ref())
    .query(&principal, &filter, today)
    .await?;

  let total = matches.len();
  let players = matches
    .into_iter()
    .skip(params.offset)
    .take(params.limit.unwrap_or(usize::MAX))
    .collect();

  Ok(Json(DirectoryPage { total, offset: params.offset, players }))
}
