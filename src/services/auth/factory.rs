/// Factory: build process-level auth services from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::{AccessPolicy, AuthService};

pub fn build_auth_service(config: &Config) -> Arc<AuthService> {
    let auth = AuthService::new(
        config.jwt_secret.as_bytes(),
        config.jwt_issuer.as_deref(),
        config.jwt_leeway_seconds,
    );

    Arc::new(auth)
}

pub fn build_access_policy(config: &Config) -> Arc<AccessPolicy> {
    Arc::new(AccessPolicy::new(config.rule_set))
}
