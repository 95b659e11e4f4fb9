pub mod access_jwt;
pub mod access_policy;
pub mod factory;
pub mod role;

pub use access_jwt::AuthService;
pub use access_policy::{AccessPolicy, Decision, RuleSet, is_normalized};
pub use factory::{build_access_policy, build_auth_service};
pub use role::Authority;
