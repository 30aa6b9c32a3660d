//! In-memory store honouring the same error contract as the PostgreSQL
//! repositories: unique cpf and public id, required references, and
//! `NotFound` for unknown ids.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::{AthleteStore, ReferenceLookup};
use crate::dto::athlete::{ListAthletesQuery, UpdateAthleteRequest};
use crate::error::{ReferenceKind, Result, StorageError, UniqueKey};
use crate::models::{Athlete, AthleteRecord, AthleteSummary, Category, Sex, TrainingCenter};
use crate::services::athlete::apply_update;

#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    categories: Vec<Category>,
    training_centers: Vec<TrainingCenter>,
    athletes: Vec<Athlete>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(self, name: &str) -> Self {
        {
            let mut state = self.lock();
            let category_id = state.categories.len() as i32 + 1;
            state.categories.push(Category {
                category_id,
                name: name.to_string(),
            });
        }
        self
    }

    pub fn with_training_center(self, name: &str) -> Self {
        {
            let mut state = self.lock();
            let training_center_id = state.training_centers.len() as i32 + 1;
            state.training_centers.push(TrainingCenter {
                training_center_id,
                name: name.to_string(),
                address: String::new(),
                owner: String::new(),
            });
        }
        self
    }

    pub fn athletes(&self) -> Vec<Athlete> {
        self.lock().athletes.clone()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl State {
    fn record(&self, athlete: &Athlete) -> Result<AthleteRecord> {
        let category = self
            .categories
            .iter()
            .find(|c| c.category_id == athlete.category_id);
        let training_center = self
            .training_centers
            .iter()
            .find(|t| t.training_center_id == athlete.training_center_id);

        match (category, training_center) {
            (Some(category), Some(training_center)) => Ok(AthleteRecord {
                athlete: athlete.clone(),
                category_name: category.name.clone(),
                training_center_name: training_center.name.clone(),
            }),
            _ => Err(StorageError::ConstraintViolation(
                "Referenced category or training center no longer exists".to_string(),
            )),
        }
    }

    fn cpf_taken(&self, cpf: &str, except: Option<Uuid>) -> bool {
        self.athletes
            .iter()
            .any(|a| a.cpf == cpf && Some(a.athlete_id) != except)
    }
}

#[async_trait]
impl ReferenceLookup for InMemoryStore {
    async fn find_category_by_name(&self, name: &str) -> Result<Category> {
        self.lock()
            .categories
            .iter()
            .find(|c| c.name == name)
            .cloned()
            .ok_or_else(|| StorageError::ReferenceNotFound {
                kind: ReferenceKind::Category,
                name: name.to_string(),
            })
    }

    async fn find_training_center_by_name(&self, name: &str) -> Result<TrainingCenter> {
        self.lock()
            .training_centers
            .iter()
            .find(|t| t.name == name)
            .cloned()
            .ok_or_else(|| StorageError::ReferenceNotFound {
                kind: ReferenceKind::TrainingCenter,
                name: name.to_string(),
            })
    }
}

#[async_trait]
impl AthleteStore for InMemoryStore {
    async fn insert(&self, athlete: &Athlete) -> Result<AthleteRecord> {
        let mut state = self.lock();

        if state
            .athletes
            .iter()
            .any(|a| a.athlete_id == athlete.athlete_id)
        {
            return Err(StorageError::DuplicateKey {
                key: UniqueKey::PublicId,
                value: athlete.athlete_id.to_string(),
            });
        }
        if state.cpf_taken(&athlete.cpf, None) {
            return Err(StorageError::DuplicateKey {
                key: UniqueKey::Cpf,
                value: athlete.cpf.clone(),
            });
        }

        let record = state.record(athlete)?;
        state.athletes.push(athlete.clone());
        Ok(record)
    }

    async fn find_by_public_id(&self, id: Uuid) -> Result<AthleteRecord> {
        let state = self.lock();
        let athlete = state
            .athletes
            .iter()
            .find(|a| a.athlete_id == id)
            .ok_or(StorageError::NotFound)?;
        state.record(athlete)
    }

    async fn list(&self, query: &ListAthletesQuery) -> Result<(Vec<AthleteSummary>, i64)> {
        let state = self.lock();
        let needle = query.name_filter().map(str::to_lowercase);
        let pagination = query.pagination();

        let mut matches: Vec<&Athlete> = state
            .athletes
            .iter()
            .filter(|a| {
                needle
                    .as_deref()
                    .is_none_or(|n| a.name.to_lowercase().contains(n))
            })
            .filter(|a| query.cpf_filter().is_none_or(|cpf| a.cpf == cpf))
            .collect();
        matches.sort_by(|a, b| (&a.name, a.created_at).cmp(&(&b.name, b.created_at)));

        let total_items = matches.len() as i64;
        let page = matches
            .into_iter()
            .skip(usize::try_from(pagination.offset()).unwrap_or(usize::MAX))
            .take(pagination.limit() as usize)
            .map(|a| {
                state.record(a).map(|r| AthleteSummary {
                    name: r.athlete.name,
                    category_name: r.category_name,
                    training_center_name: r.training_center_name,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok((page, total_items))
    }

    async fn update(&self, id: Uuid, changes: &UpdateAthleteRequest) -> Result<AthleteRecord> {
        let mut state = self.lock();

        if !state.athletes.iter().any(|a| a.athlete_id == id) {
            return Err(StorageError::NotFound);
        }
        if let Some(cpf) = &changes.cpf {
            if state.cpf_taken(cpf, Some(id)) {
                return Err(StorageError::DuplicateKey {
                    key: UniqueKey::Cpf,
                    value: cpf.clone(),
                });
            }
        }

        let stored = state
            .athletes
            .iter_mut()
            .find(|a| a.athlete_id == id)
            .ok_or(StorageError::NotFound)?;
        apply_update(stored, changes);

        let stored = stored.clone();
        state.record(&stored)
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let mut state = self.lock();
        let before = state.athletes.len();
        state.athletes.retain(|a| a.athlete_id != id);

        if state.athletes.len() == before {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }
}

/// An athlete linked to the first category and training center
pub fn sample_athlete(cpf: &str) -> Athlete {
    Athlete {
        athlete_id: Uuid::new_v4(),
        name: "Ana Souza".to_string(),
        cpf: cpf.to_string(),
        age: 27,
        weight: Decimal::new(615, 1),
        height: Decimal::new(168, 2),
        sex: Sex::F,
        created_at: Utc::now().naive_utc(),
        category_id: 1,
        training_center_id: 1,
    }
}
