use crate::{
    dtos::{
        course::{
            CourseData, CourseQueryParams, CourseResponse, CreateCourseRequest,
            PaginatedCoursesResponse, PaginationMeta, UpdateStatusRequest,
        },
        enrollment::EnrollmentsData,
    },
    envelope::ApiResponse,
    error::AppError,
    extract::{ApiJson, ApiPath, ApiQuery, CurrentUser},
    state::AppState,
};
use axum::extract::State;
use database::services::{
    course::{CourseFilter, CourseService, NewCourse},
    enrollment::EnrollmentService,
};
use uuid::Uuid;

/// Get paginated list of published courses
#[utoipa::path(
    get,
    path = "/courses",
    params(CourseQueryParams),
    responses(
        (status = 200, description = "List of courses retrieved successfully", body = ApiResponse<PaginatedCoursesResponse>),
        (status = 400, description = "Invalid query parameters"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Courses"
)]
pub async fn get_courses(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<CourseQueryParams>,
) -> Result<ApiResponse<PaginatedCoursesResponse>, AppError> {
    let filter = CourseFilter::new(params.page, params.per_page, params.search)?;
    let (courses, total_items) = CourseService::list_courses(&state.db, &filter).await?;

    Ok(ApiResponse::ok(
        "Courses retrieved",
        PaginatedCoursesResponse {
            courses: courses.into_iter().map(CourseResponse::from).collect(),
            pagination: PaginationMeta::new(filter.page, filter.per_page, total_items),
        },
    ))
}

/// Get a published course by ID
#[utoipa::path(
    get,
    path = "/courses/{id}",
    params(
        ("id" = Uuid, Path, description = "Course ID")
    ),
    responses(
        (status = 200, description = "Course found", body = ApiResponse<CourseData>),
        (status = 400, description = "Malformed course ID"),
        (status = 404, description = "Course not found or not published"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Courses"
)]
pub async fn get_course_by_id(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<ApiResponse<CourseData>, AppError> {
    let course = CourseService::get_published_course(&state.db, id).await?;

    Ok(ApiResponse::ok(
        "Course retrieved",
        CourseData {
            course: course.into(),
        },
    ))
}

/// Create a draft course owned by the caller
#[utoipa::path(
    post,
    path = "/courses",
    request_body = CreateCourseRequest,
    responses(
        (status = 201, description = "Course created", body = ApiResponse<CourseData>),
        (status = 400, description = "Invalid course content"),
        (status = 401, description = "Unauthorized - invalid or missing JWT"),
        (status = 403, description = "Caller cannot author courses")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Courses"
)]
pub async fn create_course(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiJson(request): ApiJson<CreateCourseRequest>,
) -> Result<ApiResponse<CourseData>, AppError> {
    let new_course = NewCourse::try_from(request)?;
    let course = CourseService::create_course(&state.db, &user, new_course).await?;

    Ok(ApiResponse::created(
        "Course created",
        CourseData {
            course: course.into(),
        },
    ))
}

/// Move a course to another lifecycle status
#[utoipa::path(
    patch,
    path = "/courses/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Course ID")
    ),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<CourseData>),
        (status = 400, description = "Unknown status"),
        (status = 401, description = "Unauthorized - invalid or missing JWT"),
        (status = 403, description = "Caller does not manage this course"),
        (status = 404, description = "Course not found")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Courses"
)]
pub async fn update_course_status(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<UpdateStatusRequest>,
) -> Result<ApiResponse<CourseData>, AppError> {
    let course = CourseService::set_status(&state.db, &user, id, request.status).await?;

    Ok(ApiResponse::ok(
        "Course status updated",
        CourseData {
            course: course.into(),
        },
    ))
}

/// List the active enrollments of a course
#[utoipa::path(
    get,
    path = "/courses/{id}/enrollments",
    params(
        ("id" = Uuid, Path, description = "Course ID")
    ),
    responses(
        (status = 200, description = "Enrollments retrieved", body = ApiResponse<EnrollmentsData>),
        (status = 401, description = "Unauthorized - invalid or missing JWT"),
        (status = 403, description = "Caller does not manage this course"),
        (status = 404, description = "Course not found")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Courses"
)]
pub async fn get_course_enrollments(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<ApiResponse<EnrollmentsData>, AppError> {
    let records = EnrollmentService::list_for_course(&state.db, &user, id).await?;

    Ok(ApiResponse::ok("Enrollments retrieved", records.into()))
}
