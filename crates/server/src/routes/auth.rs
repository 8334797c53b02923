use crate::{
    dtos::user::{UserData, UserResponse},
    envelope::ApiResponse,
    extract::CurrentUser,
};

/// Returns the user behind the bearer token, provisioning it on first use
#[utoipa::path(
    get,
    path = "/me",
    responses(
        (status = 200, description = "Successfully authenticated", body = ApiResponse<UserData>),
        (status = 401, description = "Unauthorized - invalid or missing JWT")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Authentication"
)]
pub async fn me(CurrentUser(user): CurrentUser) -> ApiResponse<UserData> {
    ApiResponse::ok(
        "Authenticated",
        UserData {
            user: UserResponse::from(user),
        },
    )
}
