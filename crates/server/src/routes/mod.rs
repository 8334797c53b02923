use crate::{doc::ApiDoc, state::AppState};
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};

pub mod auth;
pub mod course;
pub mod enrollment;
pub mod health;
pub mod user;

/// Routes reachable without a bearer token
pub fn public_router() -> OpenApiRouter<AppState> {
    OpenApiRouter::with_openapi(ApiDoc::openapi())
        .routes(routes!(health::health))
        .routes(routes!(course::get_courses))
        .routes(routes!(course::get_course_by_id))
}

/// Routes that need the claims inserted by the resource server layer
pub fn protected_router() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(auth::me))
        .routes(routes!(course::create_course))
        .routes(routes!(course::update_course_status))
        .routes(routes!(course::get_course_enrollments))
        .routes(routes!(
            enrollment::create_enrollment,
            enrollment::list_enrollments
        ))
        .routes(routes!(
            enrollment::get_enrollment,
            enrollment::delete_enrollment
        ))
        .routes(routes!(enrollment::complete_lecture))
        .routes(routes!(user::set_user_role))
}
