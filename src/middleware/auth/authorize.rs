//! Path-based authorization, evaluated after the request gate.
//!
//! First matching rule of the configured table decides; a denied request gets 403.

use axum::{
    body::Body,
    extract::{OriginalUri, State},
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::api::extractors::Principal;
use crate::error::AppError;
use crate::services::auth::Decision;
use crate::state::AppState;

pub async fn authorize_middleware(
    State(state): State<AppState>,
    OriginalUri(original_uri): OriginalUri,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let path = original_uri.path();
    let principal = req.extensions().get::<Principal>();

    let decision = state
        .policy
        .decide(path, principal.map(|p| &p.authorities));

    match decision {
        Decision::Allow => Ok(next.run(req).await),
        Decision::Deny => {
            tracing::debug!(
                path,
                user_id = principal.map(|p| p.user_id.as_str()),
                rule_set = ?state.policy.rule_set(),
                "access denied"
            );
            Err(AppError::Forbidden)
        }
    }
}
