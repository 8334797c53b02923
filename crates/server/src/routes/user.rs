use crate::{
    dtos::user::{SetRoleRequest, UserData},
    envelope::ApiResponse,
    error::AppError,
    extract::{ApiJson, ApiPath, CurrentUser},
    state::AppState,
};
use axum::extract::State;
use database::services::user::UserService;
use uuid::Uuid;

/// Change the role of a user
#[utoipa::path(
    put,
    path = "/users/{id}/role",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    request_body = SetRoleRequest,
    responses(
        (status = 200, description = "Role updated", body = ApiResponse<UserData>),
        (status = 400, description = "Invalid role"),
        (status = 401, description = "Unauthorized - invalid or missing JWT"),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "User not found")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Users"
)]
pub async fn set_user_role(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<SetRoleRequest>,
) -> Result<ApiResponse<UserData>, AppError> {
    let user = UserService::set_role(&state.db, &actor, id, request.role).await?;

    Ok(ApiResponse::ok(
        "Role updated",
        UserData { user: user.into() },
    ))
}
