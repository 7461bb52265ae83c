/*
 * Responsibility
 * - Config読み込み → 依存生成 → Router 組み立て
 * - Identity provider の初期化 (session を initialized にする)
 * - axum::serve() で起動
 */
use std::sync::Arc;
use std::time::Duration;
use std::{panic, process};

use anyhow::Result;
use axum::Router;
use tokio::task::JoinHandle;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::config::Config;
use crate::middleware;
use crate::services::auth::SessionContext;
use crate::services::identity::{IdentityProvider, KeycloakClient};
use crate::state::AppState;

fn init_tracing() {
    // RUST_LOG wins; otherwise a sensible default.
    // Ex:
    // RUST_LOG=info,toolrent_console=debug,tower_http=debug cargo run
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
        // stderr can be hidden depending on how the process is launched.
        tracing::error!(?info, "panic");

        // Development: crash the whole process so it gets noticed.
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

    tracing::info!(
        env = ?config.app_env,
        addr = %config.addr,
        backend = %config.backend_base_url,
        keycloak = %config.keycloak_url,
        realm = %config.keycloak_realm,
        "starting console"
    );

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.http_timeout_seconds))
        .build()?;
    let identity: Arc<dyn IdentityProvider> =
        Arc::new(KeycloakClient::from_config(http.clone(), &config));

    let addr = config.addr;
    let state = AppState::new(config, http, identity);

    spawn_session_logger(&state.session);
    spawn_identity_init(&state);

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Probe the identity provider in the background. The session becomes
/// initialized once the probe finishes, whatever its result; until then every
/// protected route renders nothing.
pub fn spawn_identity_init(state: &AppState) -> JoinHandle<()> {
    let identity = state.identity.clone();
    let session = state.session.clone();

    tokio::spawn(async move {
        match identity.init().await {
            Ok(meta) => tracing::info!(issuer = %meta.issuer, "identity provider ready"),
            Err(e) => tracing::warn!(error = %e, "identity provider probe failed; login may not work"),
        }
        session.mark_initialized();
    })
}

fn spawn_session_logger(session: &SessionContext) {
    let mut rx = session.subscribe();

    tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let s = rx.borrow_and_update().clone();
            tracing::info!(
                initialized = s.initialized,
                authenticated = s.authenticated,
                username = ?s.username,
                roles = ?s.roles,
                expires_at = ?s.expires_at(),
                "session changed"
            );
        }
    });
}

pub fn build_router(state: AppState) -> Router {
    let router = api::routes(state.clone());
    let router = middleware::same_origin::apply(router, &state.config.public_base_url);
    middleware::http::apply(router).with_state(state)
}
