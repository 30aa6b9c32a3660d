use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::dto::{
    athlete::{
        AthleteListItem, AthleteResponse, CreateAthleteRequest, ListAthletesQuery,
        UpdateAthleteRequest,
    },
    common::PaginatedResponse,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::state::AppState;

use super::services;

#[utoipa::path(
    post,
    path = "/api/athletes",
    request_body = CreateAthleteRequest,
    responses(
        (status = 201, description = "Athlete created successfully", body = AthleteResponse),
        (status = 400, description = "Validation error or unknown category / training center"),
        (status = 409, description = "An athlete with this cpf already exists")
    ),
    tag = "athletes"
)]
pub async fn create_athlete(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateAthleteRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let athlete = services::create_athlete(&state, &req).await?;

    Ok((StatusCode::CREATED, Json(AthleteResponse::from(athlete))).into_response())
}

#[utoipa::path(
    get,
    path = "/api/athletes",
    params(ListAthletesQuery),
    responses(
        (status = 200, description = "Athletes listed successfully", body = PaginatedResponse<AthleteListItem>),
        (status = 400, description = "Invalid query parameters")
    ),
    tag = "athletes"
)]
pub async fn list_athletes(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ListAthletesQuery>,
) -> Result<Response, WebError> {
    query.validate().map_err(WebError::BadRequest)?;

    let (athletes, total_items) = services::list_athletes(&state, &query).await?;

    let response = PaginatedResponse::new(
        athletes.into_iter().map(AthleteListItem::from).collect(),
        query.page,
        query.page_size,
        total_items,
    );

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/athletes/{id}",
    params(
        ("id" = Uuid, Path, description = "Athlete public id")
    ),
    responses(
        (status = 200, description = "Athlete found", body = AthleteResponse),
        (status = 404, description = "Athlete not found")
    ),
    tag = "athletes"
)]
pub async fn get_athlete(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Response, WebError> {
    let athlete = services::get_athlete(&state, id).await?;

    Ok(Json(AthleteResponse::from(athlete)).into_response())
}

#[utoipa::path(
    patch,
    path = "/api/athletes/{id}",
    params(
        ("id" = Uuid, Path, description = "Athlete public id")
    ),
    request_body = UpdateAthleteRequest,
    responses(
        (status = 200, description = "Athlete updated successfully", body = AthleteResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Athlete not found"),
        (status = 409, description = "An athlete with this cpf already exists")
    ),
    tag = "athletes"
)]
pub async fn update_athlete(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(changes): AppJson<UpdateAthleteRequest>,
) -> Result<Response, WebError> {
    changes.validate()?;

    let updated = services::update_athlete(&state, id, &changes).await?;

    Ok(Json(AthleteResponse::from(updated)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/athletes/{id}",
    params(
        ("id" = Uuid, Path, description = "Athlete public id")
    ),
    responses(
        (status = 204, description = "Athlete deleted successfully"),
        (status = 404, description = "Athlete not found")
    ),
    tag = "athletes"
)]
pub async fn delete_athlete(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Response, WebError> {
    services::delete_athlete(&state, id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
