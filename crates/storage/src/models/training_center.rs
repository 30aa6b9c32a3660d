use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct TrainingCenter {
    pub training_center_id: i32,
    pub name: String,
    pub address: String,
    pub owner: String,
}
