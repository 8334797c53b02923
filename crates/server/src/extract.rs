use crate::{error::AppError, state::AppState};
use axum::{
    extract::{FromRequest, FromRequestParts},
    http::request::Parts,
};
use database::{entities::users, services::user::UserService};
use tower_oauth2_resource_server::claims::DefaultClaims;

/// `Json` whose rejection is rendered through the response envelope
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// `Path` whose rejection is rendered through the response envelope
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

/// `Query` whose rejection is rendered through the response envelope
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

/// The user behind the bearer token, provisioned on first request
pub struct CurrentUser(pub users::Model);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Claims are inserted by the resource server layer after validation
        let subject = usable_subject(
            parts
                .extensions
                .get::<DefaultClaims>()
                .and_then(|claims| claims.sub.as_ref())
                .map(|sub| sub.to_string()),
        )?;

        let user =
            UserService::find_or_create_by_subject(&state.db, &subject, &state.config.admin_subjects)
                .await?;

        Ok(Self(user))
    }
}

/// A token without a non-blank subject identifies nobody
fn usable_subject(sub: Option<String>) -> Result<String, AppError> {
    sub.map(|sub| sub.trim().to_string())
        .filter(|sub| !sub.is_empty())
        .ok_or(AppError::Unauthorized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_subject_is_unauthorized() {
        for sub in [None, Some(String::new()), Some("   ".to_string())] {
            assert!(matches!(usable_subject(sub), Err(AppError::Unauthorized)));
        }
    }

    #[test]
    fn test_subject_is_trimmed() {
        assert_eq!(usable_subject(Some(" alice ".to_string())).unwrap(), "alice");
    }
}
