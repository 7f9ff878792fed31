pub mod claims;
pub mod guard;
pub mod keys;
pub mod scopes;

pub use claims::{AccessClaim, TokenClaims};
pub use guard::AccessGuard;
pub use keys::{JwksKeySource, KeySource, SharedSecretKeys};
