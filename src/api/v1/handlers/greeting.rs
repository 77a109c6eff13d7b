/*
 * Responsibility
 * - GET /greeting, GET /admin/greeting, GET /me
 * - request options の解決結果をそのまま返す (同じリクエスト内ではキャッシュ済みの値)
 */
use axum::Json;

use crate::api::v1::dto::greeting::{GreetingResponse, MeResponse};
use crate::api::v1::extractors::RequestCtx;
use crate::error::AppError;
use crate::services::auth::{ADMIN_POLICY, AccessOptions};
use crate::services::greeting::GreetingOptions;
use crate::services::request::RequestContext;

pub async fn greeting(RequestCtx(ctx): RequestCtx) -> Result<Json<GreetingResponse>, AppError> {
    respond(&ctx, None).await
}

pub async fn admin_greeting(
    RequestCtx(ctx): RequestCtx,
) -> Result<Json<GreetingResponse>, AppError> {
    respond(&ctx, Some(ADMIN_POLICY)).await
}

pub async fn me(RequestCtx(ctx): RequestCtx) -> Result<Json<MeResponse>, AppError> {
    // access middleware が解決済み
    let access = ctx.get_options::<AccessOptions>(None).await?;

    Ok(Json(MeResponse {
        scheme: access.scheme.clone(),
        roles: access.granted_roles.clone(),
        request_id: ctx.request_id().to_string(),
    }))
}

async fn respond(
    ctx: &RequestContext,
    name: Option<&str>,
) -> Result<Json<GreetingResponse>, AppError> {
    let options = ctx.get_options::<GreetingOptions>(name).await?;

    Ok(Json(GreetingResponse {
        message: options.message.clone(),
        locale: options.locale.clone(),
        request_id: ctx.request_id().to_string(),
    }))
}
