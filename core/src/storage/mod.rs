mod database;
mod saved_list_repository;
mod session_repository;

pub use database::{Database, Connection};
pub use saved_list_repository::SavedListRepository;
pub use session_repository::SessionRepository;
