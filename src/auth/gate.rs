//! Access gate: resolves a bearer token to a stored admin

use crate::db::{Admin, AdminRepository};
use crate::error::{Error, Result};

use super::token::TokenService;

#[derive(Clone)]
pub struct AccessGate {
    tokens: TokenService,
    admins: AdminRepository,
}

impl AccessGate {
    pub fn new(tokens: TokenService, admins: AdminRepository) -> Self {
        Self { tokens, admins }
    }

    /// Resolve the raw `Authorization` header value to an admin.
    ///
    /// A token for an admin that no longer exists is rejected like any
    /// other invalid token.
    pub async fn authenticate(&self, authorization: Option<&str>) -> Result<Admin> {
        let token = authorization
            .and_then(bearer_token)
            .ok_or_else(|| Error::Unauthenticated("Not authenticated".into()))?;

        let username = self.tokens.verify_token(token)?;

        match self.admins.find_by_username(&username).await? {
            Some(admin) => Ok(admin),
            None => {
                tracing::warn!("Token subject '{}' has no matching admin", username);
                Err(Error::Unauthenticated("Could not validate credentials".into()))
            }
        }
    }
}

/// Extract the token from `Bearer <token>`; the scheme is case-insensitive
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
