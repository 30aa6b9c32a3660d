use async_trait::async_trait;
use uuid::Uuid;

use crate::dto::athlete::{ListAthletesQuery, UpdateAthleteRequest};
use crate::error::Result;
use crate::models::{Athlete, AthleteRecord, AthleteSummary, Category, TrainingCenter};

pub mod athlete;
#[cfg(any(test, feature = "testing"))]
pub mod memory;
pub mod reference;

/// Resolves reference entities by their unique name
#[async_trait]
pub trait ReferenceLookup: Send + Sync {
    /// Fails with `StorageError::ReferenceNotFound` on a miss
    async fn find_category_by_name(&self, name: &str) -> Result<Category>;

    /// Fails with `StorageError::ReferenceNotFound` on a miss
    async fn find_training_center_by_name(&self, name: &str) -> Result<TrainingCenter>;
}

/// Persistence of athletes, addressed by their public id
#[async_trait]
pub trait AthleteStore: Send + Sync {
    async fn insert(&self, athlete: &Athlete) -> Result<AthleteRecord>;

    async fn find_by_public_id(&self, id: Uuid) -> Result<AthleteRecord>;

    /// Returns the requested page of matches and the total number of matches
    async fn list(&self, query: &ListAthletesQuery) -> Result<(Vec<AthleteSummary>, i64)>;

    /// Applies the present fields of `changes` to the stored row in a single
    /// write, so concurrent updates of different fields do not overwrite each
    /// other. Fails with `StorageError::NotFound` for an unknown id.
    async fn update(&self, id: Uuid, changes: &UpdateAthleteRequest) -> Result<AthleteRecord>;

    async fn delete(&self, id: Uuid) -> Result<()>;
}
