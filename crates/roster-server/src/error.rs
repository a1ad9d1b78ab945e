//! Error types and axum `IntoResponse` implementation.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unauthorized")]
  Unauthorized,

  #[error("account {0:?} is configured more than once")]
  DuplicateAccount(String),
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    match self {
      Error::Unauthorized => {
        let body = json!({ "error": "authentication required", "code": "unauthenticated" });
        let mut res = (StatusCode::UNAUTHORIZED, Json(body)).into_response();
        res.headers_mut().insert(
          header::WWW_AUTHENTICATE,
          HeaderValue::from_static("Basic realm=\"roster\""),
        );
        res
      }
      Error::DuplicateAccount(_) => {
        tracing::error!(error = %self, "misconfigured accounts");
        (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": self.to_string(), "code": "config" })))
          .into_response()
      }
    }
  }
}
