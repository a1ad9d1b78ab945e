//! Error type for `roster-store-sqlite`.

use roster_core::application::ApplicationStatus;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("cannot resolve an application to {0}")]
  NonTerminalTarget(ApplicationStatus),

  /// A column held a value outside its enum's vocabulary.
  #[error("cannot decode {column}: {value:?}")]
  Decode { column: &'static str, value: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
