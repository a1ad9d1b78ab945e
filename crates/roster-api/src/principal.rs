//! Extractor for the authenticated caller.

use axum::{extract::FromRequestParts, http::request::Parts};
use roster_core::principal::Principal;

use crate::error::ApiError;

/// The principal an upstream layer attached to the request.
///
/// Rejects with `401` when the request carries no principal; anonymous
/// callers never reach the access gate.
#[derive(Debug, Clone, Copy)]
pub struct CurrentPrincipal(pub Principal);

impl<S: Send + Sync> FromRequestParts<S> for CurrentPrincipal {
  type Rejection = ApiError;

  async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
    parts
      .extensions
      .get::<Principal>()
      .copied()
      .map(CurrentPrincipal)
      .ok_or(ApiError::Unauthenticated)
  }
}
