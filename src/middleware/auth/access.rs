//! Request gate: allow-list → `Authorization: Bearer <jwt>` 検証 → Principal を extensions に入れる
//!
//! - 正規化されていない path (`..`, `//`, `%2e` など) → 400。allow-list 判定より前
//! - allow-list (prefix 一致) の path は token なしで通す
//! - header なし / `Bearer ` 以外 → 401 "Authorization header missing or invalid"
//! - 署名・期限の検証失敗 → 401 "Invalid or expired JWT token"
//! - Principal が既に入っていれば上書きしない

use axum::{
    body::Body,
    extract::{OriginalUri, State},
    http::{HeaderMap, Request, header},
    middleware::Next,
    response::Response,
};

use crate::api::extractors::Principal;
use crate::error::AppError;
use crate::services::auth::is_normalized;
use crate::state::AppState;

pub async fn access_middleware(
    State(state): State<AppState>,
    OriginalUri(original_uri): OriginalUri,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let path = original_uri.path();
    tracing::debug!(path, "request gate");

    if !is_normalized(path) {
        tracing::warn!(path, "rejected non-normalized request path");
        return Err(AppError::RejectedPath);
    }

    if state.policy.is_exempt(path) {
        return Ok(next.run(req).await);
    }

    let Some(token) = bearer_token(req.headers()) else {
        tracing::debug!(path, "authorization header missing or not a bearer token");
        return Err(AppError::MissingCredentials);
    };

    let verified = match state.auth.verify_verified(token) {
        Ok(verified) => verified,
        Err(err) => {
            tracing::warn!(path, error = ?err, "access token verification failed");
            return Err(AppError::InvalidToken);
        }
    };

    // sub が空の token は principal なしで通す（判定は authorization table に任せる）
    if let Some(user_id) = verified.subject {
        if req.extensions().get::<Principal>().is_none() {
            let authority = verified.role.authority();
            tracing::debug!(
                path,
                user_id = %user_id,
                %authority,
                expires_at = verified.expires_at,
                "principal installed"
            );

            // middleware → extractor への受け渡し
            req.extensions_mut()
                .insert(Principal::new(user_id, authority));
        }
    }

    Ok(next.run(req).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(header::AUTHORIZATION, value.parse().unwrap());
        h
    }

    #[test]
    fn bearer_prefix_is_required() {
        assert_eq!(bearer_token(&headers("Bearer abc.def.ghi")), Some("abc.def.ghi"));
        assert_eq!(bearer_token(&headers("Bearer ")), Some(""));

        assert_eq!(bearer_token(&headers("bearer abc")), None);
        assert_eq!(bearer_token(&headers("Basic dXNlcjpwdw==")), None);
        assert_eq!(bearer_token(&headers("abc.def.ghi")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
