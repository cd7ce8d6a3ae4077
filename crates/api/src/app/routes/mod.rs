use axum::Router;

pub mod students;
pub mod system;

/// Router for the student resource.
pub fn router() -> Router {
    Router::new().merge(students::router())
}
