use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{NewRecipe, OwnerId, RecipeReference};
use crate::{Error, Result};

/// Whether a save appended a new reference or updated an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveOutcome {
    Created,
    Updated,
}

/// An owner's ordered collection of recipe references.
///
/// Entries are held sorted by position, and positions always form the dense
/// range `0..len`. Every mutating method either restores that invariant or
/// returns an error without touching the entries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SavedList {
    pub owner: OwnerId,
    entries: Vec<RecipeReference>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl SavedList {
    /// Create an empty list for `owner`
    pub fn new(owner: OwnerId) -> Self {
        let now = Utc::now();
        Self {
            owner,
            entries: Vec::new(),
            created_at: now,
            modified_at: now,
        }
    }

    /// Rebuild a list from stored entries, ordering them by position
    pub fn from_parts(
        owner: OwnerId,
        mut entries: Vec<RecipeReference>,
        created_at: DateTime<Utc>,
        modified_at: DateTime<Utc>,
    ) -> Self {
        entries.sort_by_key(|entry| entry.position);
        Self {
            owner,
            entries,
            created_at,
            modified_at,
        }
    }

    /// Entries in position order
    pub fn entries(&self) -> &[RecipeReference] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<RecipeReference> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, recipe_id: &str) -> Option<&RecipeReference> {
        self.entries.iter().find(|entry| entry.recipe_id == recipe_id)
    }

    /// Favorite entries, keeping their relative order
    pub fn favorites(&self) -> Vec<RecipeReference> {
        self.entries
            .iter()
            .filter(|entry| entry.is_favorite)
            .cloned()
            .collect()
    }

    /// Save a recipe.
    ///
    /// A new recipe is appended at the end. Saving a recipe that is already
    /// present updates its favorite flag in place when one is supplied and
    /// leaves its position alone.
    pub fn save(&mut self, recipe: NewRecipe) -> Result<SaveOutcome> {
        recipe.validate()?;

        if let Some(existing) = self
            .entries
            .iter_mut()
            .find(|entry| entry.recipe_id == recipe.recipe_id)
        {
            if let Some(is_favorite) = recipe.is_favorite {
                existing.is_favorite = is_favorite;
            }
            self.touch();
            return Ok(SaveOutcome::Updated);
        }

        let position = self.entries.len() as u32;
        self.entries.push(RecipeReference::new(recipe, position));
        self.touch();
        Ok(SaveOutcome::Created)
    }

    /// Remove a recipe and close the gap it leaves behind
    pub fn remove(&mut self, recipe_id: &str) -> Result<RecipeReference> {
        let index = self
            .entries
            .iter()
            .position(|entry| entry.recipe_id == recipe_id)
            .ok_or_else(|| Error::NotFound("Recipe not found in saved list".to_string()))?;

        let removed = self.entries.remove(index);
        for entry in &mut self.entries {
            if entry.position > removed.position {
                entry.position -= 1;
            }
        }
        self.touch();
        Ok(removed)
    }

    /// Move the entry at `source` to `destination` and renumber every position.
    ///
    /// Both indices address the position-sorted view and must lie in `0..len`.
    pub fn reorder(&mut self, source: i64, destination: i64) -> Result<()> {
        if self.entries.is_empty() {
            return Err(Error::NotFound("No saved recipes found".to_string()));
        }

        let source = self.checked_index(source, "sourceIndex")?;
        let destination = self.checked_index(destination, "destinationIndex")?;
        if source == destination {
            return Ok(());
        }

        let moved = self.entries.remove(source);
        self.entries.insert(destination, moved);
        self.renumber();
        self.touch();
        Ok(())
    }

    /// Set the favorite flag of a saved recipe
    pub fn set_favorite(&mut self, recipe_id: &str, is_favorite: bool) -> Result<()> {
        let entry = self
            .entries
            .iter_mut()
            .find(|entry| entry.recipe_id == recipe_id)
            .ok_or_else(|| Error::NotFound("Recipe not found in saved list".to_string()))?;

        entry.is_favorite = is_favorite;
        self.touch();
        Ok(())
    }

    /// Update the modified timestamp
    pub fn touch(&mut self) {
        self.modified_at = Utc::now();
    }

    fn checked_index(&self, index: i64, field: &str) -> Result<usize> {
        usize::try_from(index)
            .ok()
            .filter(|&index| index < self.entries.len())
            .ok_or_else(|| {
                Error::Validation(format!(
                    "{field} {index} is out of range for {} saved recipes",
                    self.entries.len()
                ))
            })
    }

    fn renumber(&mut self) {
        for (index, entry) in self.entries.iter_mut().enumerate() {
            entry.position = index as u32;
        }
    }
}
