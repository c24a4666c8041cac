use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

const ACCESS_TOKEN_TTL_HOURS: i64 = 1;
const REFRESH_TOKEN_TTL_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid, // user_id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub kind: TokenKind,
    pub iat: i64,
    pub exp: i64, // expiration timestamp
    /// Rend chaque refresh token unique, même émis dans la même seconde
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<Uuid>,
}

/// Signe et vérifie les JWT HS256 du serveur
pub struct JwtIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl JwtIssuer {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn refresh_ttl() -> Duration {
        Duration::days(REFRESH_TOKEN_TTL_DAYS)
    }

    /// Access token (1h) : sub + email
    pub fn sign_access(
        &self,
        user_id: Uuid,
        email: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<String, AppError> {
        let claims = Claims {
            sub: user_id,
            email: email.map(str::to_string),
            kind: TokenKind::Access,
            iat: now.timestamp(),
            exp: (now + Duration::hours(ACCESS_TOKEN_TTL_HOURS)).timestamp(),
            jti: None,
        };
        self.sign(&claims)
    }

    /// Refresh token (7 jours) : sub + jti aléatoire
    pub fn sign_refresh(&self, user_id: Uuid, now: DateTime<Utc>) -> Result<String, AppError> {
        let claims = Claims {
            sub: user_id,
            email: None,
            kind: TokenKind::Refresh,
            iat: now.timestamp(),
            exp: (now + Self::refresh_ttl()).timestamp(),
            jti: Some(Uuid::new_v4()),
        };
        self.sign(&claims)
    }

    /// Vérifie un access token (signature, expiration, type)
    pub fn verify_access(&self, token: &str) -> Result<Claims, AppError> {
        let claims = decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims)
            .map_err(|e| AppError::unauthorized(format!("Invalid token: {}", e)))?;

        if claims.kind != TokenKind::Access {
            return Err(AppError::unauthorized("Invalid token: not an access token"));
        }

        Ok(claims)
    }

    fn sign(&self, claims: &Claims) -> Result<String, AppError> {
        encode(&Header::default(), claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_and_verify_token() {
        let issuer = JwtIssuer::new("test-secret");
        let user_id = Uuid::new_v4();

        let token = issuer.sign_access(user_id, Some("user@example.com"), Utc::now()).unwrap();
        let claims = issuer.verify_access(&token).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.email.as_deref(), Some("user@example.com"));
    }

    #[test]
    fn test_invalid_token() {
        let issuer = JwtIssuer::new("test-secret");
        let result = issuer.verify_access("invalid.token.here");
        assert!(result.is_err());
    }

    #[test]
    fn test_refresh_token_is_not_an_access_token() {
        let issuer = JwtIssuer::new("test-secret");
        let token = issuer.sign_refresh(Uuid::new_v4(), Utc::now()).unwrap();

        assert!(matches!(issuer.verify_access(&token), Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_refresh_tokens_are_unique() {
        let issuer = JwtIssuer::new("test-secret");
        let user_id = Uuid::new_v4();
        let now = Utc::now();

        assert_ne!(
            issuer.sign_refresh(user_id, now).unwrap(),
            issuer.sign_refresh(user_id, now).unwrap()
        );
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let issuer = JwtIssuer::new("test-secret");
        let token = issuer
            .sign_access(Uuid::new_v4(), None, Utc::now() - Duration::hours(3))
            .unwrap();

        assert!(issuer.verify_access(&token).is_err());
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = JwtIssuer::new("secret-a").sign_access(Uuid::new_v4(), None, Utc::now()).unwrap();
        assert!(JwtIssuer::new("secret-b").verify_access(&token).is_err());
    }
}
