use std::sync::Arc;

use recipebox_core::{storage::Database, AccessGate, SavedRecipes, SessionGate};

use super::config::Config;

pub struct AppState {
    pub config: Config,
    pub recipes: SavedRecipes,
    pub gate: Arc<dyn AccessGate>,
}

impl AppState {
    /// Open the database named by `config` and gate requests with its sessions
    pub fn new(config: Config) -> recipebox_core::Result<Arc<Self>> {
        let db = Database::new(&config.database_path);
        let recipes = SavedRecipes::open(db.clone())?;
        let gate = Arc::new(SessionGate::new(db));

        Ok(Arc::new(Self {
            config,
            recipes,
            gate,
        }))
    }
}
