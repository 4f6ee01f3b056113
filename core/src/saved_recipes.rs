//! List operations over each owner's saved recipes.
//!
//! Every mutation loads the owner's whole list inside an immediate SQLite
//! transaction, applies the change in memory and writes the list back before
//! committing. A failed operation rolls back and leaves the stored list as it
//! was. Mutations for the same owner are additionally serialized by an
//! in-process lock so two requests from one user cannot interleave; owners
//! never wait on each other.

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use rusqlite::TransactionBehavior;

use crate::models::{NewRecipe, OwnerId, RecipeReference, ReorderRequest, SaveOutcome, SavedList};
use crate::storage::{Database, SavedListRepository};
use crate::{Error, Result};

/// One mutex per owner with work in flight.
///
/// Handles are only cloned and dropped from the map under its shard lock, so
/// a strong count of one means no other caller holds or waits on the mutex.
#[derive(Debug, Default)]
struct OwnerLocks {
    locks: DashMap<OwnerId, Arc<Mutex<()>>>,
}

impl OwnerLocks {
    /// Run `f` while holding the owner's mutex
    fn with<T>(&self, owner: &OwnerId, f: impl FnOnce() -> T) -> T {
        let lock = self.locks.entry(owner.clone()).or_default().clone();
        let value = {
            let _guard = lock.lock();
            f()
        };
        drop(lock);

        self.locks.remove_if(owner, |_, lock| Arc::strong_count(lock) == 1);
        value
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks.len()
    }
}

/// How a mutation treats an owner that has no list yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Missing {
    Create,
    Fail,
}

pub struct SavedRecipes {
    db: Database,
    locks: OwnerLocks,
}

impl SavedRecipes {
    /// Open the store, creating the database and schema if needed
    pub fn open(db: Database) -> Result<Self> {
        db.get_or_create()?;
        Ok(Self {
            db,
            locks: OwnerLocks::default(),
        })
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// The owner's list, created empty on first access
    pub fn get_or_create(&self, owner: &OwnerId) -> Result<SavedList> {
        self.locks.with(owner, || {
            let conn = self.db.connect()?;
            SavedListRepository::get_or_create(&conn, owner)
        })
    }

    /// All saved recipes in position order
    pub fn list_sorted(&self, owner: &OwnerId) -> Result<Vec<RecipeReference>> {
        Ok(self.get_or_create(owner)?.into_entries())
    }

    /// Favorite recipes in position order
    pub fn list_favorites(&self, owner: &OwnerId) -> Result<Vec<RecipeReference>> {
        Ok(self.get_or_create(owner)?.favorites())
    }

    /// Save a recipe at the end of the list, or update the favorite flag of
    /// one that is already saved
    pub fn save(
        &self,
        owner: &OwnerId,
        recipe: NewRecipe,
    ) -> Result<(SaveOutcome, Vec<RecipeReference>)> {
        recipe.validate()?;

        let recipe_id = recipe.recipe_id.clone();
        let (outcome, list) = self.mutate(owner, Missing::Create, |list| list.save(recipe))?;
        tracing::info!(%owner, %recipe_id, ?outcome, count = list.len(), "saved recipe");

        Ok((outcome, list.into_entries()))
    }

    /// Remove a saved recipe and close the gap in positions
    pub fn remove(&self, owner: &OwnerId, recipe_id: &str) -> Result<Vec<RecipeReference>> {
        let (removed, list) = self.mutate(owner, Missing::Fail, |list| list.remove(recipe_id))?;
        tracing::info!(%owner, recipe_id, position = removed.position, "removed recipe");

        Ok(list.into_entries())
    }

    /// Move the recipe at `sourceIndex` to `destinationIndex` of the sorted view
    pub fn reorder(
        &self,
        owner: &OwnerId,
        request: &ReorderRequest,
    ) -> Result<Vec<RecipeReference>> {
        let (source, destination) = request.indices()?;

        let ((), list) = self.mutate(owner, Missing::Fail, |list| list.reorder(source, destination))?;
        tracing::info!(%owner, source, destination, "reordered saved recipes");

        Ok(list.into_entries())
    }

    /// Set the favorite flag of a saved recipe
    pub fn toggle_favorite(
        &self,
        owner: &OwnerId,
        recipe_id: &str,
        is_favorite: bool,
    ) -> Result<Vec<RecipeReference>> {
        let ((), list) = self.mutate(owner, Missing::Fail, |list| {
            list.set_favorite(recipe_id, is_favorite)
        })?;
        tracing::info!(%owner, recipe_id, is_favorite, "updated favorite");

        Ok(list.into_entries())
    }

    /// Run one read-modify-write of the owner's list
    fn mutate<T>(
        &self,
        owner: &OwnerId,
        missing: Missing,
        apply: impl FnOnce(&mut SavedList) -> Result<T>,
    ) -> Result<(T, SavedList)> {
        self.locks.with(owner, || {
            let mut conn = self.db.connect()?;
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let mut list = match missing {
                Missing::Create => SavedListRepository::get_or_create(&tx, owner)?,
                Missing::Fail => SavedListRepository::find(&tx, owner)?
                    .ok_or_else(|| Error::NotFound("No saved recipes found".to_string()))?,
            };

            let value = apply(&mut list)?;
            SavedListRepository::save_entries(&tx, &list)?;
            tx.commit()?;

            Ok((value, list))
        })
    }
}
