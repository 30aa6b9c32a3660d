use storage::{
    dto::athlete::{CreateAthleteRequest, ListAthletesQuery, UpdateAthleteRequest},
    error::StorageError,
    models::{AthleteRecord, AthleteSummary},
    services::athlete::new_athlete,
};
use uuid::Uuid;

use crate::error::{WebError, WebResult};
use crate::state::AppState;

/// Resolve both references, then persist the new athlete
pub async fn create_athlete(
    state: &AppState,
    request: &CreateAthleteRequest,
) -> WebResult<AthleteRecord> {
    let category = state
        .references
        .find_category_by_name(request.category.as_str())
        .await?;
    let training_center = state
        .references
        .find_training_center_by_name(request.training_center.as_str())
        .await?;

    let athlete = new_athlete(request, &category, &training_center);
    let record = state.athletes.insert(&athlete).await?;

    tracing::info!(athlete_id = %record.athlete.athlete_id, "Athlete created");
    Ok(record)
}

/// List athletes matching the query, with the total match count
pub async fn list_athletes(
    state: &AppState,
    query: &ListAthletesQuery,
) -> WebResult<(Vec<AthleteSummary>, i64)> {
    Ok(state.athletes.list(query).await?)
}

pub async fn get_athlete(state: &AppState, id: Uuid) -> WebResult<AthleteRecord> {
    state
        .athletes
        .find_by_public_id(id)
        .await
        .map_err(|e| athlete_error(e, id))
}

/// Apply the supplied fields onto the stored athlete in one write
pub async fn update_athlete(
    state: &AppState,
    id: Uuid,
    changes: &UpdateAthleteRequest,
) -> WebResult<AthleteRecord> {
    let record = state
        .athletes
        .update(id, changes)
        .await
        .map_err(|e| athlete_error(e, id))?;

    tracing::info!(athlete_id = %id, "Athlete updated");
    Ok(record)
}

pub async fn delete_athlete(state: &AppState, id: Uuid) -> WebResult<()> {
    state
        .athletes
        .delete(id)
        .await
        .map_err(|e| athlete_error(e, id))?;

    tracing::info!(athlete_id = %id, "Athlete deleted");
    Ok(())
}

fn athlete_error(error: StorageError, id: Uuid) -> WebError {
    match error {
        StorageError::NotFound => WebError::NotFound(format!("Athlete not found with id {}", id)),
        other => WebError::Storage(other),
    }
}
