use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Error, Result};

/// Identity of the user a saved list belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One bookmarked recipe in an owner's saved list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecipeReference {
    pub recipe_id: String,
    pub title: String,
    pub image: Option<String>,
    pub source_url: Option<String>,
    pub position: u32,
    pub is_favorite: bool,
}

impl RecipeReference {
    /// Build a reference at `position` from a validated save request
    pub fn new(recipe: NewRecipe, position: u32) -> Self {
        Self {
            recipe_id: recipe.recipe_id,
            title: recipe.title,
            image: recipe.image,
            source_url: recipe.source_url,
            position,
            is_favorite: recipe.is_favorite.unwrap_or(false),
        }
    }
}

/// Body of a save request.
///
/// Both identifying fields default to empty so that a missing field surfaces
/// through [`NewRecipe::validate`] rather than as a deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewRecipe {
    #[serde(default)]
    pub recipe_id: String,
    #[serde(default)]
    pub title: String,
    pub image: Option<String>,
    pub source_url: Option<String>,
    pub is_favorite: Option<bool>,
}

impl NewRecipe {
    pub fn new(recipe_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            recipe_id: recipe_id.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn favorite(mut self, is_favorite: bool) -> Self {
        self.is_favorite = Some(is_favorite);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.recipe_id.is_empty() || self.title.is_empty() {
            return Err(Error::Validation("Recipe ID and title are required".to_string()));
        }
        Ok(())
    }
}

/// Body of a reorder request; indices address the position-sorted view
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReorderRequest {
    pub source_index: Option<i64>,
    pub destination_index: Option<i64>,
}

impl ReorderRequest {
    pub fn new(source_index: i64, destination_index: i64) -> Self {
        Self {
            source_index: Some(source_index),
            destination_index: Some(destination_index),
        }
    }

    /// Both indices, or a validation error if either is missing
    pub fn indices(&self) -> Result<(i64, i64)> {
        match (self.source_index, self.destination_index) {
            (Some(source), Some(destination)) => Ok((source, destination)),
            _ => Err(Error::Validation(
                "Source and destination indices are required".to_string(),
            )),
        }
    }
}

/// Body of a favorite toggle request
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteUpdate {
    pub is_favorite: Option<bool>,
}

impl FavoriteUpdate {
    pub fn flag(&self) -> Result<bool> {
        self.is_favorite
            .ok_or_else(|| Error::Validation("isFavorite is required".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_defaults_to_not_favorite() {
        let reference = RecipeReference::new(NewRecipe::new("716429", "Pasta"), 3);
        assert_eq!(reference.position, 3);
        assert!(!reference.is_favorite);
        assert!(reference.image.is_none());
    }

    #[test]
    fn test_validate_requires_id_and_title() {
        assert!(NewRecipe::new("716429", "Pasta").validate().is_ok());
        assert!(matches!(
            NewRecipe::new("716429", "").validate(),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            NewRecipe::new("", "Pasta").validate(),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_validate_checks_presence_only() {
        assert!(NewRecipe::new("716429", "   ").validate().is_ok());
        assert!(NewRecipe::new(" ", "Pasta").validate().is_ok());
    }

    #[test]
    fn test_new_recipe_from_partial_json() {
        let recipe: NewRecipe = serde_json::from_str(r#"{"title":"Soup"}"#).unwrap();
        assert_eq!(recipe.recipe_id, "");
        assert!(recipe.validate().is_err());

        let recipe: NewRecipe = serde_json::from_str(
            r#"{"recipeId":"A","title":"Soup","sourceUrl":"https://example.com/soup","isFavorite":true}"#,
        )
        .unwrap();
        assert_eq!(recipe.source_url.as_deref(), Some("https://example.com/soup"));
        assert_eq!(recipe.is_favorite, Some(true));
    }

    #[test]
    fn test_reference_serializes_camel_case() {
        let reference = RecipeReference::new(NewRecipe::new("A", "Soup").favorite(true), 0);
        let value = serde_json::to_value(&reference).unwrap();
        assert_eq!(value["recipeId"], "A");
        assert_eq!(value["isFavorite"], true);
        assert_eq!(value["position"], 0);
        assert!(value["sourceUrl"].is_null());
    }

    #[test]
    fn test_reorder_indices_required() {
        assert_eq!(ReorderRequest::new(0, 2).indices().unwrap(), (0, 2));

        let partial = ReorderRequest {
            source_index: Some(1),
            destination_index: None,
        };
        assert!(matches!(partial.indices(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_favorite_flag_required() {
        assert!(FavoriteUpdate { is_favorite: Some(true) }.flag().unwrap());
        assert!(FavoriteUpdate::default().flag().is_err());
    }
}
