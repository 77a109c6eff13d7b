/*
 * Responsibility
 * - アクセス判定に使う options (AccessOptions) の定義と登録
 * - 名前 = ポリシー ("" は認証のみ / "admin" は admin ロール必須)
 * - 提示された API キーとロールは request ごとに async configurator で解決する
 */
use std::sync::Arc;

use axum::http::header;

use crate::config::Config;
use crate::services::auth::RoleStore;
use crate::services::options::{OptionsBuilder, OptionsError};
use crate::services::request::RequestContext;

pub const ADMIN_POLICY: &str = "admin";

#[derive(Debug, Clone, Default)]
pub struct AccessOptions {
    pub scheme: String,
    pub required_role: Option<String>,
    /// Filled per request.
    pub authenticated: bool,
    pub granted_roles: Vec<String>,
}

impl AccessOptions {
    pub fn is_allowed(&self) -> bool {
        match &self.required_role {
            Some(role) => self.granted_roles.iter().any(|r| r == role),
            None => true,
        }
    }
}

pub fn options(config: &Config, roles: Arc<dyn RoleStore>) -> OptionsBuilder<AccessOptions> {
    let scheme = config.auth_scheme.clone();

    OptionsBuilder::<AccessOptions>::new()
        .configure_all(move |o| o.scheme = scheme.clone())
        .configure_named(ADMIN_POLICY, |o| {
            o.required_role = Some(ADMIN_POLICY.to_string())
        })
        .validate(|o| !o.scheme.is_empty(), "auth scheme must not be empty")
        .configure_async(move |name, o, ctx| {
            let roles = Arc::clone(&roles);
            Box::pin(async move {
                let Some(api_key) = presented_key(ctx, &o.scheme) else {
                    return Ok(());
                };

                match roles.roles_for(api_key).await {
                    Ok(Some(granted)) => {
                        o.authenticated = true;
                        o.granted_roles = granted;
                    }
                    Ok(None) => {
                        tracing::debug!(request_id = ctx.request_id(), "unknown api key");
                    }
                    Err(err) => return Err(OptionsError::configure(name, err.to_string())),
                }

                Ok(())
            })
        })
}

/// `Authorization: <scheme> <key>`; scheme compared case-insensitively.
fn presented_key<'a>(ctx: &'a RequestContext, scheme: &str) -> Option<&'a str> {
    let value = ctx.header(header::AUTHORIZATION.as_str())?;
    let (given, key) = value.split_once(' ')?;
    let key = key.trim();

    if given.eq_ignore_ascii_case(scheme) && !key.is_empty() {
        Some(key)
    } else {
        None
    }
}
