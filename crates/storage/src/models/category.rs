use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Category {
    pub category_id: i32,
    pub name: String,
}
