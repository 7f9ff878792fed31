use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use secrecy::ExposeSecret;

use crate::{
    app_state::AppState,
    auth::{AccessGuard, SharedSecretKeys, TokenClaims},
    config::Config,
    db::Database,
    repositories::{MockCategoryRepository, MockQuestionRepository},
};

/// `Authorization` header value signed with the test config's shared secret.
pub fn bearer_token(permissions: &[&str]) -> String {
    let config = Config::test_config();
    let claims = TokenClaims::new("auth0|test-player", Utc::now() + Duration::hours(1), permissions);

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.expose_secret().as_bytes()),
    )
    .expect("test token should encode");

    format!("Bearer {}", token)
}

/// Application state over mocked repositories. The database handle is lazy and
/// never contacted unless a test hits the readiness probe.
pub async fn test_state(
    questions: MockQuestionRepository,
    categories: MockCategoryRepository,
) -> AppState {
    let config = Config::test_config();
    let guard = AccessGuard::new(
        Arc::new(SharedSecretKeys::new(&config.jwt_secret)),
        None,
        None,
    );
    let db = Database::connect_lazy(&config)
        .await
        .expect("lazy client should build");

    AppState::from_parts(Arc::new(questions), Arc::new(categories), guard, db, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::scopes;

    #[tokio::test]
    async fn test_bearer_token_is_accepted_by_test_state_guard() {
        let state = test_state(MockQuestionRepository::new(), MockCategoryRepository::new()).await;
        let header = bearer_token(&[scopes::GET_QUESTIONS]);
        let token = header.strip_prefix("Bearer ").unwrap();

        let claim = state
            .access_guard
            .authorize(Some(token), scopes::GET_QUESTIONS)
            .await
            .unwrap();
        assert_eq!(claim.subject, "auth0|test-player");
    }
}
