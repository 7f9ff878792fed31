use std::sync::Arc;

use jsonwebtoken::{decode, decode_header, errors::ErrorKind, Validation};

use crate::{
    auth::{
        claims::{AccessClaim, TokenClaims},
        keys::{JwksKeySource, KeySource, SharedSecretKeys},
    },
    config::Config,
    errors::{AppError, AppResult},
};

/// Verifies bearer credentials and checks them against a required scope.
///
/// Shared across workers behind an `Arc`; the only mutable state is the key
/// cache inside the [`KeySource`].
pub struct AccessGuard {
    keys: Arc<dyn KeySource>,
    validation: Validation,
}

impl AccessGuard {
    pub fn new(keys: Arc<dyn KeySource>, audience: Option<&str>, issuer: Option<&str>) -> Self {
        let mut validation = Validation::new(keys.algorithm());
        let mut required = vec!["exp", "sub"];

        match audience {
            Some(audience) => {
                validation.set_audience(&[audience]);
                required.push("aud");
            }
            None => validation.validate_aud = false,
        }

        if let Some(issuer) = issuer {
            validation.set_issuer(&[issuer]);
            required.push("iss");
        }

        validation.set_required_spec_claims(&required);

        Self { keys, validation }
    }

    /// JWKS-backed guard when an identity provider domain is configured,
    /// shared-secret guard otherwise.
    pub fn from_config(config: &Config) -> Self {
        let issuer = config.token_issuer();

        let keys: Arc<dyn KeySource> = match config.jwks_url() {
            Some(url) => {
                log::info!("Verifying credentials against {}", url);
                Arc::new(JwksKeySource::new(&url, config.jwks_cache_ttl()))
            }
            None => {
                log::warn!("No identity provider configured, using shared-secret credentials");
                Arc::new(SharedSecretKeys::new(&config.jwt_secret))
            }
        };

        Self::new(keys, config.api_audience.as_deref(), issuer.as_deref())
    }

    pub async fn authorize(
        &self,
        credential: Option<&str>,
        required_scope: &str,
    ) -> AppResult<AccessClaim> {
        let token = credential
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Unauthenticated("Authorization header is expected".to_string()))?;

        let header = decode_header(token).map_err(|e| {
            log::warn!("Rejected credential with unreadable header: {}", e);
            AppError::Unauthenticated("Authorization malformed".to_string())
        })?;

        let key = self.keys.decoding_key(header.kid.as_deref()).await?;

        let claim: AccessClaim = decode::<TokenClaims>(token, &key, &self.validation)
            .map(|data| data.claims.into())
            .map_err(|e| {
                log::warn!("Rejected credential: {}", e);
                match e.kind() {
                    ErrorKind::ExpiredSignature => {
                        AppError::Unauthenticated("Token expired".to_string())
                    }
                    ErrorKind::InvalidSignature => {
                        AppError::Unauthenticated("Token signature is invalid".to_string())
                    }
                    ErrorKind::InvalidAudience | ErrorKind::InvalidIssuer => {
                        AppError::Unauthenticated(
                            "Incorrect claims, check the audience and issuer".to_string(),
                        )
                    }
                    ErrorKind::InvalidAlgorithm => {
                        AppError::Unauthenticated("Token algorithm is not accepted".to_string())
                    }
                    _ => AppError::Unauthenticated(format!("Unable to parse token: {}", e)),
                }
            })?;

        if !claim.has_scope(required_scope) {
            log::warn!(
                "Subject '{}' lacks scope '{}'",
                claim.subject,
                required_scope
            );
            return Err(AppError::Forbidden(format!(
                "Permission '{}' not granted",
                required_scope
            )));
        }

        Ok(claim)
    }
}
