//! Stateless bearer tokens (HS256 JWT)

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_TTL_MINUTES: i64 = 1440;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    /// Sign a token for `subject` expiring `ttl` from now
    pub fn issue_token(&self, subject: &str) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| Error::Internal(format!("failed to sign token: {}", e)))
    }

    /// Check signature and expiry and return the subject
    pub fn verify_token(&self, token: &str) -> Result<String> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            tracing::debug!("Token rejected: {}", e);
            invalid_token()
        })?;

        if data.claims.sub.is_empty() {
            return Err(invalid_token());
        }
        Ok(data.claims.sub)
    }
}

fn invalid_token() -> Error {
    Error::Unauthenticated("Could not validate credentials".into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let tokens = TokenService::new("secret", Duration::minutes(DEFAULT_TTL_MINUTES));
        let token = tokens.issue_token("alice").unwrap();
        assert_eq!(tokens.verify_token(&token).unwrap(), "alice");
    }

    #[test]
    fn test_wrong_secret() {
        let issuer = TokenService::new("secret-a", Duration::minutes(5));
        let verifier = TokenService::new("secret-b", Duration::minutes(5));
        let token = issuer.issue_token("alice").unwrap();
        assert!(matches!(
            verifier.verify_token(&token),
            Err(Error::Unauthenticated(_))
        ));
    }

    #[test]
    fn test_expired() {
        let tokens = TokenService::new("secret", Duration::minutes(-1));
        let token = tokens.issue_token("alice").unwrap();
        assert!(matches!(
            tokens.verify_token(&token),
            Err(Error::Unauthenticated(_))
        ));
    }

    #[test]
    fn test_garbage() {
        let tokens = TokenService::new("secret", Duration::minutes(5));
        assert!(tokens.verify_token("not.a.token").is_err());
        assert!(tokens.verify_token("").is_err());
    }

    #[test]
    fn test_missing_subject_claim() {
        #[derive(Serialize)]
        struct NoSubject {
            exp: i64,
        }

        let tokens = TokenService::new("secret", Duration::minutes(5));
        let token = encode(
            &Header::new(Algorithm::HS256),
            &NoSubject {
                exp: (Utc::now() + Duration::minutes(5)).timestamp(),
            },
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();
        assert!(tokens.verify_token(&token).is_err());
    }
}
