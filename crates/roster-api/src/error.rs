//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every error body is `{"error": <message>, "code": <code>}`; a few codes
//! carry one extra field (`reason` for `forbidden`, `current` for
//! `already_resolved`).

use axum::{
  Json,
  extract::rejection::{JsonRejection, PathRejection, QueryRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use roster_core::Error as CoreError;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("authentication required")]
  Unauthenticated,

  #[error("bad request: {0}")]
  BadRequest(String),

  /// Directory query parameters that could not be parsed at all.
  #[error("invalid filter: {0}")]
  InvalidFilterParams(String),

  #[error(transparent)]
  Core(#[from] CoreError),
}

impl ApiError {
  fn status(&self) -> StatusCode {
    match self {
      ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
      ApiError::BadRequest(_) | ApiError::InvalidFilterParams(_) => StatusCode::BAD_REQUEST,
      ApiError::Core(e) => match e {
        CoreError::Forbidden(_) => StatusCode::FORBIDDEN,
        CoreError::NotFound { .. } => StatusCode::NOT_FOUND,
        CoreError::Conflict { .. }
        | CoreError::SlugTaken(_)
        | CoreError::AlreadyResolved { .. }
        | CoreError::InvalidTransition { .. } => StatusCode::CONFLICT,
        CoreError::InvalidFilter(_) | CoreError::InvalidSlug(_) => StatusCode::BAD_REQUEST,
        CoreError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
      },
    }
  }

  /// Stable, machine-readable error code.
  pub fn code(&self) -> &'static str {
    match self {
      ApiError::Unauthenticated => "unauthenticated",
      ApiError::BadRequest(_) => "bad_request",
      ApiError::InvalidFilterParams(_) => "invalid_filter",
      ApiError::Core(e) => match e {
        CoreError::Forbidden(_) => "forbidden",
        CoreError::NotFound { .. } => "not_found",
        CoreError::Conflict { .. } => "conflict",
        CoreError::SlugTaken(_) => "slug_taken",
        CoreError::AlreadyResolved { .. } => "already_resolved",
        CoreError::InvalidTransition { .. } => "invalid_transition",
        CoreError::InvalidFilter(_) => "invalid_filter",
        CoreError::InvalidSlug(_) => "invalid_slug",
        CoreError::Store(_) => "store",
      },
    }
  }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self { ApiError::BadRequest(rejection.body_text()) }
}

impl From<QueryRejection> for ApiError {
  fn from(rejection: QueryRejection) -> Self { ApiError::BadRequest(rejection.body_text()) }
}

impl From<PathRejection> for ApiError {
  fn from(rejection: PathRejection) -> Self { ApiError::BadRequest(rejection.body_text()) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    let code = self.code();

    if status.is_server_error() {
      tracing::error!(error = %self, "request failed");
    }

    let mut body = json!({ "error": self.to_string(), "code": code });
    match &self {
      ApiError::Core(CoreError::Forbidden(reason)) => {
        body["reason"] = json!(reason);
      }
      ApiError::Core(CoreError::AlreadyResolved { current, .. }) => {
        body["current"] = json!(current);
      }
      _ => {}
    }

    (status, Json(body)).into_response()
  }
}
