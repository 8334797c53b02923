use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use utoipa::ToSchema;

/// Wrapper around every response body
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    /// HTTP status code, repeated in the body
    #[schema(example = 200)]
    pub code: u16,
    /// Either `success` or `error`
    #[schema(example = "success")]
    pub status: &'static str,
    pub message: String,
    /// `null` on error
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(code: StatusCode, message: impl Into<String>, data: T) -> Self {
        Self {
            code: code.as_u16(),
            status: "success",
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self::success(StatusCode::OK, message, data)
    }

    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self::success(StatusCode::CREATED, message, data)
    }
}

impl ApiResponse<()> {
    pub fn error(code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            code: code.as_u16(),
            status: "error",
            message: message.into(),
            data: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_shape() {
        let body = serde_json::to_value(ApiResponse::created("Enrolled", json!({ "id": 1 }))).unwrap();

        assert_eq!(
            body,
            json!({
                "code": 201,
                "status": "success",
                "message": "Enrolled",
                "data": { "id": 1 }
            })
        );
    }

    #[test]
    fn test_error_has_null_data() {
        let body = serde_json::to_value(ApiResponse::error(StatusCode::NOT_FOUND, "Course not found"))
            .unwrap();

        assert_eq!(body["code"], 404);
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "Course not found");
        assert!(body["data"].is_null());
    }

    #[test]
    fn test_response_status_matches_code() {
        let response = ApiResponse::created("Created", ()).into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}
