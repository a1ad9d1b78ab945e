//! HTTP Basic authentication mapping configured accounts to principals.

use std::{collections::HashMap, sync::Arc};

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::{
  extract::{Request, State},
  http::HeaderMap,
  middleware::Next,
  response::Response,
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use roster_core::principal::{Principal, Role};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::Error;

/// One login, as written in `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountConfig {
  pub username:      String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
  /// The player, agent or club id this login acts as. Superadmins may use
  /// any id.
  pub principal_id:  Uuid,
  pub role:          Role,
}

/// Accounts indexed by username.
#[derive(Debug, Clone, Default)]
pub struct Accounts {
  by_username: HashMap<String, AccountConfig>,
}

impl Accounts {
  pub fn new(accounts: impl IntoIterator<Item = AccountConfig>) -> Result<Self, Error> {
    let mut by_username = HashMap::new();
    for account in accounts {
      if by_username.contains_key(&account.username) {
        return Err(Error::DuplicateAccount(account.username));
      }
      by_username.insert(account.username.clone(), account);
    }
    Ok(Self { by_username })
  }

  pub fn len(&self) -> usize { self.by_username.len() }

  pub fn is_empty(&self) -> bool { self.by_username.is_empty() }
}

/// Verify Basic credentials from `headers` and return the principal the
/// account acts as.
pub fn verify_auth(headers: &HeaderMap, accounts: &Accounts) -> Result<Principal, Error> {
  let header_val = headers
    .get(axum::http::header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(Error::Unauthorized)?;

  let encoded = header_val
    .strip_prefix("Basic ")
    .ok_or(Error::Unauthorized)?;

  let decoded = B64.decode(encoded).map_err(|_| Error::Unauthorized)?;
  let creds   = std::str::from_utf8(&decoded).map_err(|_| Error::Unauthorized)?;

  let (username, password) = creds.split_once(':').ok_or(Error::Unauthorized)?;

  let account = accounts
    .by_username
    .get(username)
    .ok_or(Error::Unauthorized)?;

  let parsed_hash = PasswordHash::new(&account.password_hash)
    .map_err(|_| Error::Unauthorized)?;

  Argon2::default()
    .verify_password(password.as_bytes(), &parsed_hash)
    .map_err(|_| Error::Unauthorized)?;

  Ok(Principal::new(account.principal_id, account.role))
}

/// Middleware: authenticate the request and attach its [`Principal`] to the
/// request extensions for the API handlers.
pub async fn authenticate(
  State(accounts): State<Arc<Accounts>>,
  mut req: Request,
  next: Next,
) -> Result<Response, Error> {
  let principal = verify_auth(req.headers(), &accounts).inspect_err(|_| {
    tracing::debug!(uri = %req.uri(), "rejected credentials");
  })?;
  tracing::debug!(principal = %principal.id, role = %principal.role, "authenticated");
  req.extensions_mut().insert(principal);
  Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
  use super::*;
  use axum::http::{HeaderValue, header};

  fn hash(password: &str) -> String {
    use argon2::{PasswordHasher, password_hash::SaltString};
    use rand_core::OsRng;
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .unwrap()
      .to_string()
  }

  fn accounts(agent_id: Uuid) -> Accounts {
    Accounts::new([AccountConfig {
      username:      "agent".to_string(),
      password_hash: hash("secret"),
      principal_id:  agent_id,
      role:          Role::Agent,
    }])
    .unwrap()
  }

  fn headers(value: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
    headers
  }

  fn basic(user: &str, pass: &str) -> String {
    let encoded = B64.encode(format!("{user}:{pass}"));
    format!("Basic {encoded}")
  }

  #[test]
  fn correct_credentials_yield_the_principal() {
    let id = Uuid::new_v4();
    let principal = verify_auth(&headers(&basic("agent", "secret")), &accounts(id)).unwrap();
    assert_eq!(principal, Principal::agent(id));
  }

  #[test]
  fn wrong_password() {
    let result = verify_auth(&headers(&basic("agent", "wrong")), &accounts(Uuid::new_v4()));
    assert!(matches!(result, Err(Error::Unauthorized)));
  }

  #[test]
  fn unknown_user() {
    let result = verify_auth(&headers(&basic("club", "secret")), &accounts(Uuid::new_v4()));
    assert!(matches!(result, Err(Error::Unauthorized)));
  }

  #[test]
  fn missing_header() {
    let result = verify_auth(&HeaderMap::new(), &accounts(Uuid::new_v4()));
    assert!(matches!(result, Err(Error::Unauthorized)));
  }

  #[test]
  fn invalid_base64() {
    let result = verify_auth(&headers("Basic !!!not-base64!!!"), &accounts(Uuid::new_v4()));
    assert!(matches!(result, Err(Error::Unauthorized)));
  }

  #[test]
  fn duplicate_usernames_are_rejected() {
    let account = AccountConfig {
      username:      "twice".to_string(),
      password_hash: "x".to_string(),
      principal_id:  Uuid::new_v4(),
      role:          Role::Club,
    };
    let result = Accounts::new([account.clone(), account]);
    assert!(matches!(result, Err(Error::DuplicateAccount(name)) if name == "twice"));
  }
}
