/*
 * Responsibility
 * - GreetingOptions の定義と登録
 * - message は config から (同期)、locale は Accept-Language から (request ごと)
 */
use axum::http::header;

use crate::config::Config;
use crate::services::auth::ADMIN_POLICY;
use crate::services::options::OptionsBuilder;
use crate::services::request::RequestContext;

pub const DEFAULT_LOCALE: &str = "en";

#[derive(Debug, Clone, Default)]
pub struct GreetingOptions {
    pub message: String,
    pub locale: String,
}

pub fn options(config: &Config) -> OptionsBuilder<GreetingOptions> {
    let greeting = config.greeting.clone();
    let admin_greeting = config.admin_greeting.clone();

    OptionsBuilder::<GreetingOptions>::new()
        .configure_all(move |o| o.message = greeting.clone())
        .configure_named(ADMIN_POLICY, move |o| o.message = admin_greeting.clone())
        .post_configure_all(|o| {
            if o.locale.is_empty() {
                o.locale = DEFAULT_LOCALE.to_string();
            }
        })
        .validate(|o| !o.message.is_empty(), "greeting must not be empty")
        .configure_async(|_, o, ctx| {
            Box::pin(async move {
                if let Some(locale) = preferred_locale(ctx) {
                    o.locale = locale;
                }
                Ok(())
            })
        })
}

/// First language tag of `Accept-Language`, ignoring quality values.
fn preferred_locale(ctx: &RequestContext) -> Option<String> {
    let value = ctx.header(header::ACCEPT_LANGUAGE.as_str())?;
    let tag = value.split(',').next()?.split(';').next()?.trim();

    if tag.is_empty() || tag == "*" {
        None
    } else {
        Some(tag.to_ascii_lowercase())
    }
}
