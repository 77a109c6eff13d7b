//! AccessOptions (名前 = ポリシー) を解決してアクセス可否を判定する
//!
//! - 未認証 → 401 (WWW-Authenticate: <scheme>)
//! - 認証済みだがロール不足 → AccessDecisionContext を作って 403

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::error::AppError;
use crate::services::auth::{AccessDecisionContext, AccessOptions, AuthProperties};
use crate::services::request::RequestContext;
use crate::state::AppState;

#[derive(Clone, Copy, Debug)]
struct AccessGate {
    policy: &'static str,
}

/// Guard every route of `router` with the named access policy.
///
/// ```ignore
/// let admin = Router::new().route("/admin/greeting", get(admin_greeting));
/// let admin = middleware::auth::access::apply(admin, ADMIN_POLICY);
/// ```
pub fn apply(router: Router<AppState>, policy: &'static str) -> Router<AppState> {
    router.route_layer(middleware::from_fn_with_state(
        AccessGate { policy },
        access_middleware,
    ))
}

async fn access_middleware(
    State(gate): State<AccessGate>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let ctx = req
        .extensions()
        .get::<RequestContext>()
        .cloned()
        .ok_or_else(|| {
            tracing::error!("request scope middleware is not installed");
            AppError::Internal
        })?;

    let access = ctx
        .get_options::<AccessOptions>(Some(gate.policy))
        .await?;

    if !access.authenticated {
        tracing::info!(
            request_id = ctx.request_id(),
            policy = gate.policy,
            "unauthenticated request"
        );
        return Err(AppError::Unauthorized {
            scheme: access.scheme.clone(),
        });
    }

    if !access.is_allowed() {
        let properties = AuthProperties::new()
            .with_item("policy", gate.policy)
            .with_item(
                "required_role",
                access.required_role.clone().unwrap_or_default(),
            );
        let decision =
            AccessDecisionContext::with_properties(ctx.clone(), &access.scheme, Some(properties))?;

        return Err(forbid(decision));
    }

    Ok(next.run(req).await)
}

/// Report a denial and turn it into the HTTP error.
fn forbid(decision: AccessDecisionContext) -> AppError {
    let request = decision.request();
    tracing::warn!(
        request_id = request.request_id(),
        method = %request.method(),
        uri = %request.uri(),
        scheme = decision.scheme(),
        properties = ?decision.properties().items,
        "access forbidden"
    );

    AppError::Forbidden {
        scheme: decision.scheme().to_string(),
    }
}
