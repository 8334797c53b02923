use crate::{
    dtos::enrollment::{
        CompleteLectureRequest, CreateEnrollmentRequest, EnrollmentData, EnrollmentDetailData,
        EnrollmentsData,
    },
    envelope::ApiResponse,
    error::AppError,
    extract::{ApiJson, ApiPath, CurrentUser},
    state::AppState,
};
use axum::extract::State;
use database::services::enrollment::EnrollmentService;
use uuid::Uuid;

/// Enroll the caller in a published course
#[utoipa::path(
    post,
    path = "/enrollments",
    request_body = CreateEnrollmentRequest,
    responses(
        (status = 201, description = "Enrolled", body = ApiResponse<EnrollmentData>),
        (status = 400, description = "Malformed request body"),
        (status = 401, description = "Unauthorized - invalid or missing JWT"),
        (status = 402, description = "Course requires payment"),
        (status = 404, description = "Course not found or not published"),
        (status = 409, description = "Already enrolled in this course")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Enrollments"
)]
pub async fn create_enrollment(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiJson(request): ApiJson<CreateEnrollmentRequest>,
) -> Result<ApiResponse<EnrollmentData>, AppError> {
    // Payment ids only come from the payment flow, never from the client
    let record = EnrollmentService::enroll(&state.db, request.course_id, user.id, None).await?;

    Ok(ApiResponse::created(
        "Enrolled",
        EnrollmentData {
            enrollment: record.into(),
        },
    ))
}

/// List the caller's active enrollments
#[utoipa::path(
    get,
    path = "/enrollments",
    responses(
        (status = 200, description = "Enrollments retrieved", body = ApiResponse<EnrollmentsData>),
        (status = 401, description = "Unauthorized - invalid or missing JWT")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Enrollments"
)]
pub async fn list_enrollments(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<ApiResponse<EnrollmentsData>, AppError> {
    let records = EnrollmentService::list_for_learner(&state.db, user.id).await?;

    Ok(ApiResponse::ok("Enrollments retrieved", records.into()))
}

/// Get an enrollment with its course and progress
#[utoipa::path(
    get,
    path = "/enrollments/{id}",
    params(
        ("id" = Uuid, Path, description = "Enrollment ID")
    ),
    responses(
        (status = 200, description = "Enrollment found", body = ApiResponse<EnrollmentDetailData>),
        (status = 401, description = "Unauthorized - invalid or missing JWT"),
        (status = 403, description = "Caller cannot read this enrollment"),
        (status = 404, description = "Enrollment not found")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Enrollments"
)]
pub async fn get_enrollment(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<ApiResponse<EnrollmentDetailData>, AppError> {
    let detail = EnrollmentService::detail(&state.db, &user, id).await?;

    Ok(ApiResponse::ok("Enrollment retrieved", detail.into()))
}

/// Mark a lecture of the enrolled course as completed
#[utoipa::path(
    post,
    path = "/enrollments/{id}/complete",
    params(
        ("id" = Uuid, Path, description = "Enrollment ID")
    ),
    request_body = CompleteLectureRequest,
    responses(
        (status = 200, description = "Lecture completed", body = ApiResponse<EnrollmentData>),
        (status = 400, description = "Item is not a lecture of this course"),
        (status = 401, description = "Unauthorized - invalid or missing JWT"),
        (status = 403, description = "Caller does not own this enrollment"),
        (status = 404, description = "Enrollment not found")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Enrollments"
)]
pub async fn complete_lecture(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<CompleteLectureRequest>,
) -> Result<ApiResponse<EnrollmentData>, AppError> {
    let record = EnrollmentService::complete_lecture(
        &state.db,
        &user,
        id,
        request.lecture_id,
        request.notes,
    )
    .await?;

    Ok(ApiResponse::ok(
        "Lecture completed",
        EnrollmentData {
            enrollment: record.into(),
        },
    ))
}

/// Remove an enrollment, keeping it for audit
#[utoipa::path(
    delete,
    path = "/enrollments/{id}",
    params(
        ("id" = Uuid, Path, description = "Enrollment ID")
    ),
    responses(
        (status = 200, description = "Enrollment removed", body = ApiResponse<EnrollmentData>),
        (status = 401, description = "Unauthorized - invalid or missing JWT"),
        (status = 403, description = "Caller cannot remove this enrollment"),
        (status = 404, description = "Enrollment not found")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Enrollments"
)]
pub async fn delete_enrollment(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<ApiResponse<EnrollmentData>, AppError> {
    let record = EnrollmentService::remove(&state.db, &user, id).await?;

    Ok(ApiResponse::ok(
        "Enrollment removed",
        EnrollmentData {
            enrollment: record.into(),
        },
    ))
}
