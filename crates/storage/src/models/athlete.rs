use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "athlete_sex")]
pub enum Sex {
    M,
    F,
}

/// An athlete row. `athlete_id` is the public identifier; the serial key
/// of the table never leaves the database.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Athlete {
    pub athlete_id: Uuid,
    pub name: String,
    pub cpf: String,
    pub age: i32,
    pub weight: Decimal,
    pub height: Decimal,
    pub sex: Sex,
    pub created_at: NaiveDateTime,
    pub category_id: i32,
    pub training_center_id: i32,
}

/// An athlete joined with the names of its category and training center
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct AthleteRecord {
    #[sqlx(flatten)]
    pub athlete: Athlete,
    pub category_name: String,
    pub training_center_name: String,
}

/// Display-only projection used by the listing
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct AthleteSummary {
    pub name: String,
    pub category_name: String,
    pub training_center_name: String,
}
