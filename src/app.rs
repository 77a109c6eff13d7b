/*
 * Responsibility
 * - Config読み込み → 依存生成 (options registry) → Router 組み立て
 * - Middleware の適用 (http / request scope / access)
 * - axum::serve() で起動
 */
use std::{panic, process, sync::Arc};

use axum::{Router, routing::get};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::api::v1::handlers::health::health;
use crate::config::Config;
use crate::error::AppError;
use crate::middleware;
use crate::services::auth::{self, InMemoryRoleStore, RoleStore};
use crate::services::greeting;
use crate::services::options::OptionsRegistry;
use crate::state::AppState;

fn init_tracing() {
    // RUST_LOG が無ければ既定値
    // Ex:
    // RUST_LOG=info,request_options=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // development: fail fast / production: default hook (stderr) and keep serving
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<(), AppError> {
    init_tracing();
    let config = Config::from_env().map_err(|err| {
        tracing::error!(error = %err, "invalid configuration");
        AppError::from(err)
    })?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config);
    tracing::info!(
        options_types = state.options.len(),
        api_keys = config.api_keys.len(),
        "request options registered"
    );
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .map_err(|err| {
            tracing::error!(error = %err, "bind failed");
            AppError::Internal
        })?;
    axum::serve(listener, app)
        .await
        .map_err(|_| AppError::Internal)?;

    Ok(())
}

/// Process-level wiring: every options type the API resolves per request.
pub fn build_state(config: &Config) -> AppState {
    let roles: Arc<dyn RoleStore> = Arc::new(InMemoryRoleStore::new(&config.api_keys));

    let registry = OptionsRegistry::new()
        .add(greeting::options(config))
        .add(auth::access::options(config, roles));

    AppState::new(Arc::new(registry))
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api::v1::routes());

    let router = middleware::request_scope::apply(router, state.clone()).with_state(state);

    middleware::http::apply(router, config)
}
