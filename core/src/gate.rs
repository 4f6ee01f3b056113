//! Resolving bearer credentials into owners.
//!
//! The list operations never authenticate; they take an [`OwnerId`] that an
//! [`AccessGate`] has already resolved.

use chrono::{Duration, Utc};

use crate::models::{OwnerId, Session, SESSION_TTL_DAYS};
use crate::storage::{Database, SessionRepository};
use crate::{Error, Result};

/// Turns an opaque credential into the owner it belongs to
pub trait AccessGate: Send + Sync {
    fn resolve(&self, credential: &str) -> Result<OwnerId>;
}

/// Gate backed by the `sessions` table
#[derive(Debug, Clone)]
pub struct SessionGate {
    db: Database,
    ttl: Duration,
}

impl SessionGate {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            ttl: Duration::days(SESSION_TTL_DAYS),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Issue a new token for `owner`, dropping sessions that have lapsed
    pub fn issue(&self, owner: &OwnerId) -> Result<String> {
        let conn = self.db.connect()?;
        let purged = SessionRepository::purge_expired(&conn, &Utc::now())?;
        if purged > 0 {
            tracing::debug!(purged, "purged expired sessions");
        }

        let (token, session) = Session::issue(owner.clone(), self.ttl);
        SessionRepository::create(&conn, &session)?;
        tracing::info!(%owner, expires_at = %session.expires_at, "issued token");
        Ok(token)
    }

    /// Revoke a single token
    pub fn revoke(&self, token: &str) -> Result<()> {
        let conn = self.db.connect()?;
        SessionRepository::delete(&conn, &Session::hash_token(token))
    }

    /// Revoke every token of `owner`
    pub fn revoke_all(&self, owner: &OwnerId) -> Result<usize> {
        let conn = self.db.connect()?;
        SessionRepository::delete_for_owner(&conn, owner)
    }
}

impl AccessGate for SessionGate {
    fn resolve(&self, credential: &str) -> Result<OwnerId> {
        let credential = credential.trim();
        if credential.is_empty() {
            return Err(Error::Auth("no token".to_string()));
        }

        let conn = self.db.connect()?;
        let session = match SessionRepository::get_by_token_hash(&conn, &Session::hash_token(credential)) {
            Ok(session) => session,
            Err(Error::Database(rusqlite::Error::QueryReturnedNoRows)) => {
                return Err(Error::Auth("token failed".to_string()));
            }
            Err(e) => return Err(e),
        };

        if session.is_expired(Utc::now()) {
            return Err(Error::Auth("token expired".to_string()));
        }

        Ok(session.owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn setup_gate() -> (tempfile::TempDir, SessionGate) {
        let dir = tempdir().unwrap();
        let db = Database::new(dir.path().join("test.db"));
        db.create().unwrap();
        (dir, SessionGate::new(db))
    }

    #[test]
    fn test_issue_and_resolve() {
        let (_dir, gate) = setup_gate();
        let owner = OwnerId::new("user-1");

        let token = gate.issue(&owner).unwrap();
        assert_eq!(gate.resolve(&token).unwrap(), owner);
    }

    #[test]
    fn test_unknown_and_empty_tokens() {
        let (_dir, gate) = setup_gate();
        assert!(matches!(gate.resolve("not-a-token"), Err(Error::Auth(_))));
        assert!(matches!(gate.resolve("  "), Err(Error::Auth(_))));
    }

    #[test]
    fn test_expired_token() {
        let (_dir, gate) = setup_gate();
        let gate = gate.with_ttl(Duration::seconds(-1));

        let token = gate.issue(&OwnerId::new("user-1")).unwrap();
        assert!(matches!(gate.resolve(&token), Err(Error::Auth(_))));
    }

    #[test]
    fn test_issue_drops_lapsed_sessions() {
        let (_dir, gate) = setup_gate();
        let owner = OwnerId::new("user-1");

        let stale = gate
            .clone()
            .with_ttl(Duration::seconds(-1))
            .issue(&owner)
            .unwrap();
        let fresh = gate.issue(&owner).unwrap();

        let conn = gate.db.connect().unwrap();
        assert!(SessionRepository::get_by_token_hash(&conn, &Session::hash_token(&stale)).is_err());
        assert!(SessionRepository::get_by_token_hash(&conn, &Session::hash_token(&fresh)).is_ok());
        assert_eq!(gate.revoke_all(&owner).unwrap(), 1);
    }

    #[test]
    fn test_revoke() {
        let (_dir, gate) = setup_gate();
        let owner = OwnerId::new("user-1");
        let first = gate.issue(&owner).unwrap();
        let second = gate.issue(&owner).unwrap();

        gate.revoke(&first).unwrap();
        assert!(gate.resolve(&first).is_err());
        assert!(gate.resolve(&second).is_ok());

        assert_eq!(gate.revoke_all(&owner).unwrap(), 1);
        assert!(gate.resolve(&second).is_err());
    }
}
