//! リクエストごとに RequestContext (= request scope) を生成して extensions に入れる
//!
//! - options のキャッシュはこの RequestContext が所有する
//! - ハンドラ完了 (またはキャンセル) 時に ScopeGuard が scope を空にする
//!   (options が RequestContext を保持していても循環参照で残らない)

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};
use uuid::Uuid;

use crate::middleware::http::REQUEST_ID_HEADER;
use crate::services::request::RequestContext;
use crate::state::AppState;

pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.layer(middleware::from_fn_with_state(state, request_scope_middleware))
}

async fn request_scope_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let (parts, body) = req.into_parts();

    // 通常は SetRequestIdLayer が付与済み。単体でルーターを使う場合に備えて補完する
    let request_id = parts
        .headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let ctx = RequestContext::from_parts(&parts, request_id, Arc::clone(&state.options));

    let _scope = ctx.enter();

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(ctx);

    next.run(req).await
}
