use crate::models::{
    datetime_to_timestamp, timestamp_to_datetime, OwnerId, RecipeReference, SavedList,
};
use crate::{Error, Result};
use rusqlite::{params, Connection};

pub struct SavedListRepository;

impl SavedListRepository {
    /// Insert an empty saved list row, leaving an existing row for the owner in place.
    /// Returns whether a row was inserted.
    pub fn create(conn: &Connection, list: &SavedList) -> Result<bool> {
        let rows_affected = conn.execute(
            "INSERT OR IGNORE INTO saved_lists (owner, created_at, modified_at) VALUES (?1, ?2, ?3)",
            params![
                list.owner.as_str(),
                datetime_to_timestamp(&list.created_at),
                datetime_to_timestamp(&list.modified_at),
            ],
        )?;

        Ok(rows_affected > 0)
    }

    /// Get an owner's list with its entries ordered by position
    pub fn get_by_owner(conn: &Connection, owner: &OwnerId) -> Result<SavedList> {
        let (created_at, modified_at): (i64, i64) = conn.query_row(
            "SELECT created_at, modified_at FROM saved_lists WHERE owner = ?1",
            params![owner.as_str()],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        let entries = Self::get_entries(conn, owner)?;

        Ok(SavedList::from_parts(
            owner.clone(),
            entries,
            timestamp_to_datetime(created_at),
            timestamp_to_datetime(modified_at),
        ))
    }

    /// Get an owner's list if one has been created
    pub fn find(conn: &Connection, owner: &OwnerId) -> Result<Option<SavedList>> {
        match Self::get_by_owner(conn, owner) {
            Ok(list) => Ok(Some(list)),
            Err(Error::Database(rusqlite::Error::QueryReturnedNoRows)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Get an owner's list, creating an empty one on first access
    pub fn get_or_create(conn: &Connection, owner: &OwnerId) -> Result<SavedList> {
        match Self::find(conn, owner)? {
            Some(list) => Ok(list),
            None => {
                // Another connection may create the row between the find and the insert
                if Self::create(conn, &SavedList::new(owner.clone()))? {
                    tracing::debug!(%owner, "created saved list");
                }
                Self::get_by_owner(conn, owner)
            }
        }
    }

    /// Entries for an owner ordered by position
    pub fn get_entries(conn: &Connection, owner: &OwnerId) -> Result<Vec<RecipeReference>> {
        let mut stmt = conn.prepare(
            "SELECT recipe_id, title, image, source_url, position, is_favorite
             FROM saved_recipes WHERE owner = ?1 ORDER BY position",
        )?;

        let entries = stmt
            .query_map(params![owner.as_str()], |row| {
                Ok(RecipeReference {
                    recipe_id: row.get(0)?,
                    title: row.get(1)?,
                    image: row.get(2)?,
                    source_url: row.get(3)?,
                    position: row.get(4)?,
                    is_favorite: row.get(5)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// Write back every entry of a list, replacing what is stored.
    ///
    /// Callers run this inside a transaction so the delete and the inserts
    /// commit together.
    pub fn save_entries(conn: &Connection, list: &SavedList) -> Result<()> {
        let rows_affected = conn.execute(
            "UPDATE saved_lists SET modified_at = ?1 WHERE owner = ?2",
            params![datetime_to_timestamp(&list.modified_at), list.owner.as_str()],
        )?;

        if rows_affected == 0 {
            return Err(Error::NotFound(format!("Saved list not found: {}", list.owner)));
        }

        conn.execute(
            "DELETE FROM saved_recipes WHERE owner = ?1",
            params![list.owner.as_str()],
        )?;

        let mut stmt = conn.prepare(
            "INSERT INTO saved_recipes (owner, recipe_id, title, image, source_url, position, is_favorite)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )?;
        for entry in list.entries() {
            stmt.execute(params![
                list.owner.as_str(),
                entry.recipe_id,
                entry.title,
                entry.image,
                entry.source_url,
                entry.position,
                entry.is_favorite,
            ])?;
        }

        Ok(())
    }
}
