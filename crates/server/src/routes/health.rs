use crate::envelope::ApiResponse;

/// Simple endpoint that returns "OK" when the service is running properly
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = ApiResponse<String>)
    ),
    tag = "Health"
)]
pub async fn health() -> ApiResponse<&'static str> {
    ApiResponse::ok("Service is healthy", "OK")
}
