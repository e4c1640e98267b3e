/*
 * Responsibility
 * - Config読み込み → 依存生成 (TokenVerifier / UserStore) → Router 組み立て
 * - HTTP 共通 middleware の適用
 * - axum::serve() で起動
 */
use std::{panic, process, sync::Arc, time::Duration};

use anyhow::Result;
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::middleware::http::HttpLimits;
use crate::repos::{InMemoryUserStore, PgUserStore, UserStore};
use crate::services::auth::build_token_verifier;
use crate::state::AppState;
use crate::{api, middleware};

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,auth_gate=debug,tower_http=debug cargo run
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
        // stderr can be hidden depending on how the process is launched
        tracing::error!(?info, "panic");

        // Development: crash the whole process so we notice immediately.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(?config, "starting auth gate");

    let state = build_state(&config).await?;
    let app = build_router(
        state,
        HttpLimits {
            body_limit_bytes: config.request_body_limit_bytes,
            timeout: Duration::from_secs(config.request_timeout_seconds),
        },
    );

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build process-level services and inject them into the shared application state.
pub async fn build_state(config: &Config) -> Result<AppState> {
    let verifier = build_token_verifier(config)?;

    let users: Arc<dyn UserStore> = match &config.database_url {
        Some(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(config.database_max_connections)
                .connect(url)
                .await?;
            Arc::new(PgUserStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL is not set; using an empty in-memory user store");
            Arc::new(InMemoryUserStore::new())
        }
    };

    Ok(AppState::new(verifier, users, config.request_body_limit_bytes))
}

pub fn build_router(state: AppState, limits: HttpLimits) -> Router {
    let router = Router::new()
        .nest("/api/v1", api::v1::routes(state.clone()))
        .with_state(state);

    middleware::http::apply(router, limits)
}
