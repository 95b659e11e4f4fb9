/*
 * Responsibility
 * - この repo が持つ URL 構造を定義
 * - 業務 handler (受注・在庫など) は別 service の担当。ここに来たものは 404
 * - gate / authorization は app.rs で Router 全体に掛ける (fallback も対象)
 */
use axum::{Router, routing::get};

use crate::state::AppState;

use crate::api::handlers::{fallback::not_found, me::me};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/me", get(me))
        .fallback(not_found)
}
