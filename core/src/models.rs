mod recipe_reference;
mod saved_list;
mod session;

pub use recipe_reference::{FavoriteUpdate, NewRecipe, OwnerId, RecipeReference, ReorderRequest};
pub use saved_list::{SaveOutcome, SavedList};
pub use session::{Session, SESSION_TTL_DAYS};

use chrono::{DateTime, Utc};

/// Convert Unix timestamp (seconds) to DateTime<Utc>
pub fn timestamp_to_datetime(timestamp: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(timestamp, 0).unwrap_or_default()
}

/// Convert DateTime<Utc> to Unix timestamp (seconds)
pub fn datetime_to_timestamp(datetime: &DateTime<Utc>) -> i64 {
    datetime.timestamp()
}
