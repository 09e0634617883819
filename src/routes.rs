use crate::{
    routes::{
        index::get_index_route,
        students::{delete_student, get_student, get_students, post_new_student, put_student},
    },
    state::StudentState,
};
use axum::{Router, extract::DefaultBodyLimit, routing::get};
use tower_http::trace::TraceLayer;

pub mod index;
pub mod students;

pub const MAX_BODY_BYTES: usize = 64 * 1024;

pub fn router(state: StudentState) -> Router {
    Router::new()
        .route("/", get(get_index_route))
        .route("/students", get(get_students).post(post_new_student))
        .route(
            "/students/{student_id}",
            get(get_student).put(put_student).delete(delete_student),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
