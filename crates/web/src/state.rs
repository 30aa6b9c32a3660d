use std::sync::Arc;

use storage::{
    Database,
    repository::{
        AthleteStore, ReferenceLookup, athlete::AthleteRepository, reference::ReferenceRepository,
    },
};

/// Stores shared by every request
#[derive(Clone)]
pub struct AppState {
    pub athletes: Arc<dyn AthleteStore>,
    pub references: Arc<dyn ReferenceLookup>,
}

impl AppState {
    pub fn new(athletes: Arc<dyn AthleteStore>, references: Arc<dyn ReferenceLookup>) -> Self {
        Self {
            athletes,
            references,
        }
    }

    pub fn from_database(db: &Database) -> Self {
        Self::new(
            Arc::new(AthleteRepository::new(db.pool().clone())),
            Arc::new(ReferenceRepository::new(db.pool().clone())),
        )
    }
}
