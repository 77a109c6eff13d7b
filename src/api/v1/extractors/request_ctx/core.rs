use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::services::request::RequestContext;
use crate::state::AppState;

/// Handler で RequestContext を受け取るための extractor
/// request_scope middleware が insert 済みである前提。無ければ配線ミスなので 500
pub struct RequestCtx(pub RequestContext);

impl FromRequestParts<AppState> for RequestCtx
where
    AppState: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .map(RequestCtx)
            .ok_or_else(|| {
                tracing::error!("request context missing from extensions");
                AppError::Internal
            })
    }
}
