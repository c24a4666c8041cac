// ============================================================================
// VÉRIFICATION DES ID TOKENS APPLE / GOOGLE
// ============================================================================
//
// Le client mobile envoie l'id_token obtenu auprès du provider. On vérifie :
//   - la signature RS256 avec la clé publique (JWKS) du provider, choisie
//     par le "kid" du header
//   - l'issuer et l'audience (client id Google / bundle id Apple)
//   - la présence du claim "sub" (= provider_id)
//
// Les JWKS sont téléchargés avec reqwest à chaque vérification.
//
// ============================================================================

use async_trait::async_trait;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use serde::Deserialize;
use thiserror::Error;

use crate::models::users::AuthProvider;

const GOOGLE_JWKS_URL: &str = "https://www.googleapis.com/oauth2/v3/certs";
const GOOGLE_ISSUER: &str = "https://accounts.google.com";
const APPLE_JWKS_URL: &str = "https://appleid.apple.com/auth/keys";
const APPLE_ISSUER: &str = "https://appleid.apple.com";

/// Identité extraite d'un id_token valide
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VerifiedIdentity {
    pub provider_id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub profile_image: Option<String>,
}

#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("Malformed token: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Failed to fetch signing keys: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("Unknown signing key: {0}")]
    UnknownKey(String),

    #[error("Token missing sub claim")]
    MissingSubject,
}

#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(
        &self,
        provider: AuthProvider,
        id_token: &str,
    ) -> Result<VerifiedIdentity, VerifyError>;
}

#[derive(Debug, Deserialize)]
struct IdTokenClaims {
    sub: Option<String>,
    email: Option<String>,
    name: Option<String>,
    picture: Option<String>,
}

pub struct OidcVerifier {
    http: reqwest::Client,
    google_client_id: String,
    apple_bundle_id: String,
}

impl OidcVerifier {
    pub fn new(google_client_id: String, apple_bundle_id: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            google_client_id,
            apple_bundle_id,
        }
    }

    /// (url JWKS, issuer, audience) attendus pour un provider
    fn expectations(&self, provider: AuthProvider) -> (&'static str, &'static str, &str) {
        match provider {
            AuthProvider::Google => (GOOGLE_JWKS_URL, GOOGLE_ISSUER, &self.google_client_id),
            AuthProvider::Apple => (APPLE_JWKS_URL, APPLE_ISSUER, &self.apple_bundle_id),
        }
    }

    async fn fetch_jwks(&self, url: &str) -> Result<JwkSet, VerifyError> {
        Ok(self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json::<JwkSet>()
            .await?)
    }
}

#[async_trait]
impl IdentityVerifier for OidcVerifier {
    async fn verify(
        &self,
        provider: AuthProvider,
        id_token: &str,
    ) -> Result<VerifiedIdentity, VerifyError> {
        let header = decode_header(id_token)?;
        let kid = header.kid.ok_or_else(|| VerifyError::UnknownKey("<none>".to_string()))?;

        let (jwks_url, issuer, audience) = self.expectations(provider);
        let jwks = self.fetch_jwks(jwks_url).await?;
        let jwk = jwks.find(&kid).ok_or_else(|| VerifyError::UnknownKey(kid.clone()))?;
        let key = DecodingKey::from_jwk(jwk)?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[issuer]);
        validation.set_audience(&[audience]);

        let claims = decode::<IdTokenClaims>(id_token, &key, &validation)?.claims;
        let provider_id = claims.sub.ok_or(VerifyError::MissingSubject)?;

        // Apple ne fournit jamais de photo
        let profile_image = match provider {
            AuthProvider::Google => claims.picture,
            AuthProvider::Apple => None,
        };

        Ok(VerifiedIdentity {
            provider_id,
            email: claims.email,
            name: claims.name,
            profile_image,
        })
    }
}
