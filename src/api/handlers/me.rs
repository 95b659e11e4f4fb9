/*
 * Responsibility
 * - GET /api/auth/me
 * - request gate が入れた Principal をそのまま返す (frontend の権限判定・疎通確認用)
 */
use axum::Json;

use crate::api::extractors::{CurrentPrincipal, Principal};

pub async fn me(CurrentPrincipal(principal): CurrentPrincipal) -> Json<Principal> {
    Json(principal)
}
