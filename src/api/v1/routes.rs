/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - 認証が必要な範囲にだけ access middleware (ポリシー名付き) を route_layer で適用する
 */
use axum::{Router, routing::get};

use crate::middleware::auth::access;
use crate::services::auth::ADMIN_POLICY;
use crate::services::options::DEFAULT_NAME;
use crate::state::AppState;

use crate::api::v1::handlers::greeting::{admin_greeting, greeting, me};

pub fn routes() -> Router<AppState> {
    let public = Router::new().route("/greeting", get(greeting));

    let authenticated = access::apply(Router::new().route("/me", get(me)), DEFAULT_NAME);

    let admin = access::apply(
        Router::new().route("/admin/greeting", get(admin_greeting)),
        ADMIN_POLICY,
    );

    Router::new().merge(public).merge(authenticated).merge(admin)
}
