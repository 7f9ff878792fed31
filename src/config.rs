use std::env;
use std::time::Duration;

use secrecy::SecretString;

const DEFAULT_JWT_SECRET: &str = "dev_secret_key_change_in_production";

#[derive(Clone, Debug)]
pub struct Config {
    pub mongo_conn_string: String,
    pub mongo_db_name: String,
    pub questions_collection: String,
    pub categories_collection: String,
    pub web_server_host: String,
    pub web_server_port: u16,
    pub auth0_domain: Option<String>,
    pub api_audience: Option<String>,
    pub jwt_secret: SecretString,
    pub jwks_cache_ttl_secs: u64,
    pub questions_per_page: u64,
    pub app_env: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            mongo_conn_string: env::var("MONGO_CONN_STRING")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            mongo_db_name: env::var("MONGO_DB_NAME").unwrap_or_else(|_| "trivia-local".to_string()),
            questions_collection: env::var("QUESTIONS_COLLECTION")
                .unwrap_or_else(|_| "questions".to_string()),
            categories_collection: env::var("CATEGORIES_COLLECTION")
                .unwrap_or_else(|_| "categories".to_string()),
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "localhost".to_string()),
            web_server_port: env::var("WEB_SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            auth0_domain: env::var("AUTH0_DOMAIN").ok().filter(|d| !d.trim().is_empty()),
            api_audience: env::var("API_AUDIENCE").ok().filter(|a| !a.trim().is_empty()),
            jwt_secret: SecretString::from(
                env::var("JWT_SECRET").unwrap_or_else(|_| DEFAULT_JWT_SECRET.to_string()),
            ),
            jwks_cache_ttl_secs: env::var("JWKS_CACHE_TTL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(600),
            questions_per_page: env::var("QUESTIONS_PER_PAGE")
                .ok()
                .and_then(|n| n.parse().ok())
                .filter(|n: &u64| *n > 0)
                .unwrap_or(10),
            app_env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        }
    }

    pub fn is_production(&self) -> bool {
        self.app_env.eq_ignore_ascii_case("production")
    }

    pub fn jwks_url(&self) -> Option<String> {
        self.auth0_domain
            .as_ref()
            .map(|domain| format!("https://{}/.well-known/jwks.json", domain.trim_end_matches('/')))
    }

    pub fn token_issuer(&self) -> Option<String> {
        self.auth0_domain
            .as_ref()
            .map(|domain| format!("https://{}/", domain.trim_end_matches('/')))
    }

    pub fn jwks_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.jwks_cache_ttl_secs)
    }

    /// Validate that production-critical configuration is set
    /// Panics if the shared secret is still the development default
    pub fn validate_for_production(&self) {
        use secrecy::ExposeSecret;

        if self.auth0_domain.is_some() {
            if self.api_audience.is_none() {
                panic!("FATAL: API_AUDIENCE must be set when AUTH0_DOMAIN is configured.");
            }
            return;
        }

        let jwt_secret = self.jwt_secret.expose_secret();

        if jwt_secret == DEFAULT_JWT_SECRET {
            panic!(
                "FATAL: JWT_SECRET is using default value! Set AUTH0_DOMAIN or a secure JWT_SECRET."
            );
        }

        if jwt_secret.len() < 32 {
            panic!(
                "FATAL: JWT_SECRET is too short ({}). Must be at least 32 characters for security.",
                jwt_secret.len()
            );
        }
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            mongo_conn_string: "mongodb://localhost:27017".to_string(),
            mongo_db_name: "trivia-test".to_string(),
            questions_collection: "questions".to_string(),
            categories_collection: "categories".to_string(),
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            auth0_domain: None,
            api_audience: None,
            jwt_secret: SecretString::from("test_jwt_secret_key".to_string()),
            jwks_cache_ttl_secs: 600,
            questions_per_page: 10,
            app_env: "test".to_string(),
        }
    }
}
