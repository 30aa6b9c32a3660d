use axum::Router;

use crate::state::AppState;

pub mod athletes;

pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/api/athletes", athletes::routes::routes())
        .with_state(state)
}
