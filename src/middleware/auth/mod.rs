pub mod access;
pub mod authorize;

use axum::{Router, middleware};

use crate::state::AppState;

/// Request gate + authorization table を Router に掛ける。
///
/// 実行順は gate → authorization → handler（後から足した layer が外側）。
///
/// 例：
/// ```ignore
/// let api = api::routes();
/// let api = middleware::auth::apply(api, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router
        .layer(middleware::from_fn_with_state(
            state.clone(),
            authorize::authorize_middleware,
        ))
        .layer(middleware::from_fn_with_state(state, access::access_middleware))
}
