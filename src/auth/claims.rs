use std::collections::BTreeSet;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Claims as they appear in the token payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String, // Subject (identity provider user id)
    pub exp: usize,  // Expiration time (as UTC timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<usize>,
    /// RBAC permissions, e.g. `["get:questions", "post:quizzes"]`.
    #[serde(default)]
    pub permissions: Vec<String>,
    /// Space separated OAuth2 scopes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl TokenClaims {
    pub fn new(subject: &str, expires_at: DateTime<Utc>, permissions: &[&str]) -> Self {
        Self {
            sub: subject.to_string(),
            exp: expires_at.timestamp().max(0) as usize,
            iat: Some(Utc::now().timestamp().max(0) as usize),
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
            scope: None,
        }
    }
}

/// Verified identity handed to handlers after a successful authorization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessClaim {
    pub subject: String,
    pub scopes: BTreeSet<String>,
    pub expires_at: DateTime<Utc>,
}

impl AccessClaim {
    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes.contains(scope)
    }
}

impl From<TokenClaims> for AccessClaim {
    fn from(claims: TokenClaims) -> Self {
        let mut scopes: BTreeSet<String> = claims.permissions.into_iter().collect();
        if let Some(scope) = claims.scope {
            scopes.extend(scope.split_whitespace().map(str::to_string));
        }

        let expires_at = Utc
            .timestamp_opt(claims.exp as i64, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::MIN_UTC);

        Self {
            subject: claims.sub,
            scopes,
            expires_at,
        }
    }
}
