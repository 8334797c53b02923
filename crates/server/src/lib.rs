use axum::Router;
use routes::{protected_router, public_router};
use state::AppState;
use tower_http::compression::CompressionLayer;
use utoipa_swagger_ui::SwaggerUi;

pub mod config;
pub mod doc;
pub mod dtos;
pub mod envelope;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;
pub mod utils;

/// Builds the full application.
///
/// `protect` wraps the routes that need an authenticated caller, the binary
/// passes the OAuth2 resource server layer here.
pub fn app<F>(state: AppState, protect: F) -> Router
where
    F: FnOnce(Router<AppState>) -> Router<AppState>,
{
    let (public, mut openapi) = public_router().split_for_parts();
    let (protected, protected_openapi) = protected_router().split_for_parts();
    openapi.merge(protected_openapi);

    public
        .merge(protect(protected))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        .layer(CompressionLayer::new())
        .with_state(state)
}
