use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::OwnerId;

/// Lifetime of an issued bearer token
pub const SESSION_TTL_DAYS: i64 = 30;

/// A bearer token issued to an owner. Only the token's digest is kept.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub token_hash: String,
    pub owner: OwnerId,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Issue a fresh token for `owner`, returning the plain token with its session
    pub fn issue(owner: OwnerId, ttl: Duration) -> (String, Self) {
        let token = uuid::Uuid::new_v4().simple().to_string();
        let now = Utc::now();
        let session = Self {
            token_hash: Self::hash_token(&token),
            owner,
            created_at: now,
            expires_at: now + ttl,
        };
        (token, session)
    }

    /// SHA-256 hex digest of a plain token
    pub fn hash_token(token: &str) -> String {
        hex::encode(Sha256::digest(token.as_bytes()))
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_stores_digest_only() {
        let (token, session) = Session::issue(OwnerId::new("user-1"), Duration::days(SESSION_TTL_DAYS));
        assert_ne!(session.token_hash, token);
        assert_eq!(session.token_hash, Session::hash_token(&token));
        assert_eq!(session.token_hash.len(), 64);
    }

    #[test]
    fn test_expiry() {
        let (_token, session) = Session::issue(OwnerId::new("user-1"), Duration::days(1));
        assert!(!session.is_expired(Utc::now()));
        assert!(session.is_expired(Utc::now() + Duration::days(2)));
    }
}
