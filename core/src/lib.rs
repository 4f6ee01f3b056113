//! Saved-recipe bookkeeping for recipebox.
//!
//! Every user owns one ordered list of recipe references. Positions are kept
//! dense (`0..count`) across save, remove, reorder and favorite changes, and
//! each mutation is a single read-modify-write of the owner's list.

pub mod error;
pub mod gate;
pub mod models;
pub mod saved_recipes;
pub mod storage;

pub use error::{Error, Result};
pub use gate::{AccessGate, SessionGate};
pub use models::{NewRecipe, OwnerId, RecipeReference, SaveOutcome, SavedList};
pub use saved_recipes::SavedRecipes;
