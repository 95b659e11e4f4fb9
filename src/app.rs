/*
 * Responsibility
 * - Config読み込み → 依存生成 → Router 組み立て
 * - Middleware の適用 (request gate / authorization / HTTP 横断設定)
 * - axum::serve() で起動
 */
use std::{panic, process};

use anyhow::Result;
use axum::{Router, routing::get};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    api,
    config::Config,
    middleware,
    services::auth::{build_access_policy, build_auth_service},
    state::AppState,
};

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,dist_gateway=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    // Keep the default hook as a fallback (prints to stderr with location/payload).
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // development では即落として気付けるようにする
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
        "starting gateway in {:?} mode on {} (rule set: {:?})",
        config.app_env,
        config.addr,
        config.rule_set
    );

    let state = build_state(&config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_state(config: &Config) -> AppState {
    // allow-list / rule table はここで一度だけ作り、以降は read-only で共有する
    let auth = build_auth_service(config);
    let policy = build_access_policy(config);

    AppState::new(auth, policy)
}

fn build_router(state: AppState) -> Router {
    let gated = middleware::auth::apply(api::routes(), state.clone());

    // `/health` は gate の外（layer の後に足した route は layer を通らない）
    let router = gated
        .route("/health", get(api::handlers::health::health))
        .with_state(state);

    middleware::http::apply(router)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
    };
    use tower::ServiceExt;

    use super::*;
    use crate::services::auth::test_support::{SECRET, mint};
    use crate::services::auth::{AccessPolicy, AuthService, RuleSet};

    fn app() -> Router {
        build_router(AppState::new(
            Arc::new(AuthService::new(SECRET, None, 0)),
            Arc::new(AccessPolicy::new(RuleSet::Extended)),
        ))
    }

    async fn get_json(path: &str, token: Option<&str>) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::get(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let res = app()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn health_bypasses_the_gate() {
        let (status, body) = get_json("/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn me_returns_the_installed_principal() {
        let token = mint("logi-7", Some("logistic"), 600);
        let (status, body) = get_json("/api/auth/me", Some(&token)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["userId"], "logi-7");
        assert_eq!(body["authorities"], serde_json::json!(["ROLE_LOGISTIC"]));
    }

    #[tokio::test]
    async fn me_without_token_is_unauthorized() {
        let (status, _) = get_json("/api/auth/me", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn unknown_routes_pass_the_gate_then_404() {
        let token = mint("agency01", Some("agency"), 600);
        let (status, body) = get_json("/api/orders", Some(&token)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "not_found");

        // without a token the gate answers first
        let (status, _) = get_json("/api/orders", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn public_paths_reach_the_fallback_without_token() {
        let (status, _) = get_json("/api/login", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = get_json("/uploads/profile/x.png", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn role_mismatch_is_forbidden_before_the_handler() {
        let token = mint("agency01", Some("agency"), 600);
        let (status, _) = get_json("/api/head_office/reports", Some(&token)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }
}
