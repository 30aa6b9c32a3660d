use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::common::{PaginationParams, default_page, default_page_size};
use crate::models::{AthleteRecord, AthleteSummary, Sex};

/// Name of a category or training center as sent by clients.
///
/// Both `"Iniciante"` and `{"nome": "Iniciante"}` are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum ReferenceName {
    Plain(String),
    Named { nome: String },
}

impl ReferenceName {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Plain(name) => name,
            Self::Named { nome } => nome,
        }
    }
}

/// Name of a related entity, as rendered in responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ReferenceSummary {
    pub nome: String,
}

/// Full athlete representation
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AthleteResponse {
    pub id: Uuid,
    #[serde(rename = "nome")]
    pub name: String,
    pub cpf: String,
    #[serde(rename = "idade")]
    pub age: i32,
    #[serde(rename = "peso")]
    pub weight: Decimal,
    #[serde(rename = "altura")]
    pub height: Decimal,
    #[serde(rename = "sexo")]
    pub sex: Sex,
    pub created_at: NaiveDateTime,
    #[serde(rename = "categoria")]
    pub category: ReferenceSummary,
    #[serde(rename = "centro_treinamento")]
    pub training_center: ReferenceSummary,
}

/// Listing entry: the athlete name and where it belongs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AthleteListItem {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "centro_treinamento")]
    pub training_center: String,
}

/// Request payload for creating a new athlete
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateAthleteRequest {
    #[serde(rename = "nome")]
    #[validate(length(min = 1, max = 50, message = "Name must be between 1 and 50 characters"))]
    pub name: String,

    #[validate(custom(function = "validate_cpf"))]
    pub cpf: String,

    #[serde(rename = "idade")]
    #[validate(range(min = 0, max = 150, message = "Age must be between 0 and 150"))]
    pub age: i32,

    #[serde(rename = "peso")]
    #[validate(custom(function = "validate_weight"))]
    pub weight: Decimal,

    #[serde(rename = "altura")]
    #[validate(custom(function = "validate_height"))]
    pub height: Decimal,

    #[serde(rename = "sexo")]
    pub sex: Sex,

    #[serde(rename = "categoria")]
    #[validate(custom(function = "validate_category_name"))]
    pub category: ReferenceName,

    #[serde(rename = "centro_treinamento")]
    #[validate(custom(function = "validate_training_center_name"))]
    pub training_center: ReferenceName,
}

/// Request payload for a partial update.
///
/// A field left out of the payload (or sent as `null`) is `None` and keeps its
/// stored value. Any value that is present, empty strings and zero included,
/// replaces the stored one.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateAthleteRequest {
    #[serde(rename = "nome", default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 50, message = "Name must be between 1 and 50 characters"))]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_cpf"))]
    pub cpf: Option<String>,

    #[serde(rename = "idade", default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0, max = 150, message = "Age must be between 0 and 150"))]
    pub age: Option<i32>,

    #[serde(rename = "peso", default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_weight"))]
    pub weight: Option<Decimal>,

    #[serde(rename = "altura", default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_height"))]
    pub height: Option<Decimal>,

    #[serde(rename = "sexo", default, skip_serializing_if = "Option::is_none")]
    pub sex: Option<Sex>,
}

/// Query string of the athlete listing
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListAthletesQuery {
    /// Case-insensitive fragment of the athlete name
    #[serde(rename = "nome")]
    pub name: Option<String>,
    /// Exact cpf
    pub cpf: Option<String>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for ListAthletesQuery {
    fn default() -> Self {
        Self {
            name: None,
            cpf: None,
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

impl ListAthletesQuery {
    pub fn validate(&self) -> Result<(), String> {
        self.pagination().validate()
    }

    pub fn pagination(&self) -> PaginationParams {
        PaginationParams {
            page: self.page,
            page_size: self.page_size,
        }
    }

    /// Name fragment to filter on; an empty value means no filter
    pub fn name_filter(&self) -> Option<&str> {
        self.name.as_deref().filter(|s| !s.is_empty())
    }

    pub fn cpf_filter(&self) -> Option<&str> {
        self.cpf.as_deref().filter(|s| !s.is_empty())
    }
}

fn validate_cpf(cpf: &str) -> Result<(), ValidationError> {
    if cpf.len() == 11 && cpf.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        let mut err = ValidationError::new("invalid_cpf");
        err.message = Some("cpf must contain exactly 11 digits".into());
        Err(err)
    }
}

// NUMERIC(6, 2) and NUMERIC(4, 2) columns
const MAX_WEIGHT: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 2);
const MAX_HEIGHT: Decimal = Decimal::from_parts(10_000, 0, 0, false, 2);
const MEASURE_SCALE: u32 = 2;

const MAX_CATEGORY_NAME: usize = 10;
const MAX_TRAINING_CENTER_NAME: usize = 20;

fn validate_weight(value: &Decimal) -> Result<(), ValidationError> {
    validate_measure(value, MAX_WEIGHT)
}

fn validate_height(value: &Decimal) -> Result<(), ValidationError> {
    validate_measure(value, MAX_HEIGHT)
}

/// Strictly positive, below `max`, at most two decimal places
fn validate_measure(value: &Decimal, max: Decimal) -> Result<(), ValidationError> {
    if !value.is_sign_positive() || value.is_zero() {
        let mut err = ValidationError::new("not_positive");
        err.message = Some("must be greater than zero".into());
        return Err(err);
    }
    if *value >= max {
        let mut err = ValidationError::new("too_large");
        err.message = Some(format!("must be less than {}", max.normalize()).into());
        return Err(err);
    }
    if value.normalize().scale() > MEASURE_SCALE {
        let mut err = ValidationError::new("too_precise");
        err.message = Some("must have at most 2 decimal places".into());
        return Err(err);
    }
    Ok(())
}

fn validate_category_name(name: &ReferenceName) -> Result<(), ValidationError> {
    validate_reference_name(name, MAX_CATEGORY_NAME)
}

fn validate_training_center_name(name: &ReferenceName) -> Result<(), ValidationError> {
    validate_reference_name(name, MAX_TRAINING_CENTER_NAME)
}

fn validate_reference_name(name: &ReferenceName, max_chars: usize) -> Result<(), ValidationError> {
    let name = name.as_str();
    if name.trim().is_empty() {
        let mut err = ValidationError::new("empty_reference");
        err.message = Some("name is required".into());
        return Err(err);
    }
    if name.chars().count() > max_chars {
        let mut err = ValidationError::new("reference_too_long");
        err.message = Some(format!("name must be at most {} characters", max_chars).into());
        return Err(err);
    }
    Ok(())
}

impl From<AthleteRecord> for AthleteResponse {
    fn from(record: AthleteRecord) -> Self {
        let athlete = record.athlete;
        Self {
            id: athlete.athlete_id,
            name: athlete.name,
            cpf: athlete.cpf,
            age: athlete.age,
            weight: athlete.weight,
            height: athlete.height,
            sex: athlete.sex,
            created_at: athlete.created_at,
            category: ReferenceSummary {
                nome: record.category_name,
            },
            training_center: ReferenceSummary {
                nome: record.training_center_name,
            },
        }
    }
}

impl From<AthleteSummary> for AthleteListItem {
    fn from(summary: AthleteSummary) -> Self {
        Self {
            name: summary.name,
            category: summary.category_name,
            training_center: summary.training_center_name,
        }
    }
}
