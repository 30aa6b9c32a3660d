use chrono::Utc;
use uuid::Uuid;

use crate::dto::athlete::{CreateAthleteRequest, UpdateAthleteRequest};
use crate::models::{Athlete, Category, TrainingCenter};

/// Builds the row for a new athlete from a validated request and its resolved
/// references. The public id and the creation timestamp are assigned here.
pub fn new_athlete(
    req: &CreateAthleteRequest,
    category: &Category,
    training_center: &TrainingCenter,
) -> Athlete {
    Athlete {
        athlete_id: Uuid::new_v4(),
        name: req.name.clone(),
        cpf: req.cpf.clone(),
        age: req.age,
        weight: req.weight,
        height: req.height,
        sex: req.sex,
        created_at: Utc::now().naive_utc(),
        category_id: category.category_id,
        training_center_id: training_center.training_center_id,
    }
}

/// Applies the fields present in `changes` onto `athlete`.
///
/// Identity, creation time and both references are never touched.
pub fn apply_update(athlete: &mut Athlete, changes: &UpdateAthleteRequest) {
    if let Some(name) = &changes.name {
        athlete.name = name.clone();
    }
    if let Some(cpf) = &changes.cpf {
        athlete.cpf = cpf.clone();
    }
    if let Some(age) = changes.age {
        athlete.age = age;
    }
    if let Some(weight) = changes.weight {
        athlete.weight = weight;
    }
    if let Some(height) = changes.height {
        athlete.height = height;
    }
    if let Some(sex) = changes.sex {
        athlete.sex = sex;
    }
}
