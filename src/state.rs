/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - auth: token 検証, policy: allow-list + authorization table
 * - Clone 前提で持つ (内部は Arc で共有、起動後は read-only)
 */
use std::sync::Arc;

use crate::services::auth::{AccessPolicy, AuthService};

#[derive(Clone, Debug)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub policy: Arc<AccessPolicy>,
}

impl AppState {
    pub fn new(auth: Arc<AuthService>, policy: Arc<AccessPolicy>) -> Self {
        Self { auth, policy }
    }
}
