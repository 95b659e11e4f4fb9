/*
 * Responsibility
 * - Handler から見える「認証済み主体」の型
 * - request gate が検証して request extensions に格納し、handler はこの型だけを受け取る
 *
 * Notes
 * - 1 リクエストにつき高々 1 つ。格納済みなら gate は上書きしない
 */
use std::collections::BTreeSet;

use serde::Serialize;

use crate::services::auth::Authority;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub user_id: String,
    pub authorities: BTreeSet<Authority>,
}

impl Principal {
    pub fn new(user_id: impl Into<String>, authority: Authority) -> Self {
        Self {
            user_id: user_id.into(),
            authorities: BTreeSet::from([authority]),
        }
    }
}
