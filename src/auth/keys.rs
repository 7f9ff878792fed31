use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::{jwk::JwkSet, Algorithm, DecodingKey};
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::RwLock;

use crate::errors::{AppError, AppResult};

/// Minimum spacing between JWKS fetches triggered by unknown key ids.
const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// Signing material published by the identity provider.
#[async_trait]
pub trait KeySource: Send + Sync {
    fn algorithm(&self) -> Algorithm;
    async fn decoding_key(&self, kid: Option<&str>) -> AppResult<DecodingKey>;
}

/// HS256 shared secret, for local development and tests.
pub struct SharedSecretKeys {
    decoding_key: DecodingKey,
}

impl SharedSecretKeys {
    pub fn new(secret: &SecretString) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.expose_secret().as_bytes()),
        }
    }
}

#[async_trait]
impl KeySource for SharedSecretKeys {
    fn algorithm(&self) -> Algorithm {
        Algorithm::HS256
    }

    async fn decoding_key(&self, _kid: Option<&str>) -> AppResult<DecodingKey> {
        Ok(self.decoding_key.clone())
    }
}

struct CachedKeys {
    keys: JwkSet,
    fetched_at: Instant,
}

/// RS256 keys from the provider's JWKS endpoint, cached for `ttl`.
pub struct JwksKeySource {
    jwks_url: String,
    ttl: Duration,
    http: reqwest::Client,
    cache: RwLock<Option<CachedKeys>>,
}

impl JwksKeySource {
    pub fn new(jwks_url: &str, ttl: Duration) -> Self {
        Self {
            jwks_url: jwks_url.to_string(),
            ttl,
            http: reqwest::Client::new(),
            cache: RwLock::new(None),
        }
    }

    /// Starts with an already known key set, counted as fetched just now.
    pub fn with_keys(jwks_url: &str, ttl: Duration, keys: JwkSet) -> Self {
        let source = Self::new(jwks_url, ttl);
        Self {
            cache: RwLock::new(Some(CachedKeys {
                keys,
                fetched_at: Instant::now(),
            })),
            ..source
        }
    }

    async fn fetch(&self) -> AppResult<JwkSet> {
        log::info!("Fetching signing keys from {}", self.jwks_url);

        let response = self
            .http
            .get(&self.jwks_url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                log::error!("JWKS request to {} failed: {}", self.jwks_url, e);
                AppError::Unauthenticated("Unable to fetch identity provider keys".to_string())
            })?;

        response.json::<JwkSet>().await.map_err(|e| {
            log::error!("JWKS document from {} is invalid: {}", self.jwks_url, e);
            AppError::Unauthenticated("Identity provider keys are malformed".to_string())
        })
    }

    async fn refresh_and_find(&self, kid: &str) -> AppResult<DecodingKey> {
        let mut cache = self.cache.write().await;

        // Another request may have refreshed while this one waited for the lock.
        let recently_fetched = cache
            .as_ref()
            .is_some_and(|c| c.fetched_at.elapsed() < MIN_REFRESH_INTERVAL);

        if !recently_fetched {
            let keys = self.fetch().await?;
            *cache = Some(CachedKeys {
                keys,
                fetched_at: Instant::now(),
            });
        }

        match cache.as_ref() {
            Some(cached) => find_key(&cached.keys, kid),
            None => Err(unknown_key()),
        }
    }
}

#[async_trait]
impl KeySource for JwksKeySource {
    fn algorithm(&self) -> Algorithm {
        Algorithm::RS256
    }

    async fn decoding_key(&self, kid: Option<&str>) -> AppResult<DecodingKey> {
        let kid = kid.ok_or_else(|| {
            AppError::Unauthenticated("Authorization malformed: token has no key id".to_string())
        })?;

        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if cached.fetched_at.elapsed() < self.ttl && cached.keys.find(kid).is_some() {
                    return find_key(&cached.keys, kid);
                }
            }
        }

        self.refresh_and_find(kid).await
    }
}

fn find_key(keys: &JwkSet, kid: &str) -> AppResult<DecodingKey> {
    let jwk = keys.find(kid).ok_or_else(unknown_key)?;
    DecodingKey::from_jwk(jwk)
        .map_err(|e| AppError::Unauthenticated(format!("Unusable signing key: {}", e)))
}

fn unknown_key() -> AppError {
    AppError::Unauthenticated("Unable to find the appropriate key".to_string())
}
