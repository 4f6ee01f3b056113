use crate::models::{datetime_to_timestamp, timestamp_to_datetime, OwnerId, Session};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

pub struct SessionRepository;

impl SessionRepository {
    /// Store an issued session
    pub fn create(conn: &Connection, session: &Session) -> Result<()> {
        conn.execute(
            "INSERT INTO sessions (token_hash, owner, created_at, expires_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                session.token_hash,
                session.owner.as_str(),
                datetime_to_timestamp(&session.created_at),
                datetime_to_timestamp(&session.expires_at),
            ],
        )?;

        Ok(())
    }

    /// Get a session by its token digest
    pub fn get_by_token_hash(conn: &Connection, token_hash: &str) -> Result<Session> {
        let session = conn.query_row(
            "SELECT token_hash, owner, created_at, expires_at FROM sessions WHERE token_hash = ?1",
            params![token_hash],
            |row| {
                Ok(Session {
                    token_hash: row.get(0)?,
                    owner: OwnerId::new(row.get::<_, String>(1)?),
                    created_at: timestamp_to_datetime(row.get(2)?),
                    expires_at: timestamp_to_datetime(row.get(3)?),
                })
            },
        )?;

        Ok(session)
    }

    /// Revoke one session
    pub fn delete(conn: &Connection, token_hash: &str) -> Result<()> {
        let rows_affected = conn.execute(
            "DELETE FROM sessions WHERE token_hash = ?1",
            params![token_hash],
        )?;

        if rows_affected == 0 {
            return Err(Error::NotFound("Session not found".to_string()));
        }

        Ok(())
    }

    /// Revoke every session of an owner, returning how many were removed
    pub fn delete_for_owner(conn: &Connection, owner: &OwnerId) -> Result<usize> {
        let rows_affected = conn.execute(
            "DELETE FROM sessions WHERE owner = ?1",
            params![owner.as_str()],
        )?;
        Ok(rows_affected)
    }

    /// Drop sessions that expired at or before `now`
    pub fn purge_expired(conn: &Connection, now: &DateTime<Utc>) -> Result<usize> {
        let rows_affected = conn.execute(
            "DELETE FROM sessions WHERE expires_at <= ?1",
            params![datetime_to_timestamp(now)],
        )?;
        Ok(rows_affected)
    }
}
