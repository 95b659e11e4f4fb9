use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use thiserror::Error;

use crate::services::auth::role::Role;

/// Verification failure.
///
/// The gate answers every variant with the same 401; variants exist for logging only.
#[derive(Debug, Error)]
pub enum TokenError {
    // malformed, bad signature, wrong algorithm, expired, issuer mismatch
    #[error("access token verification failed")]
    Jwt(#[source] jsonwebtoken::errors::Error),
    // subject present but no role claim; login never issues such tokens
    #[error("missing 'role' claim")]
    MissingRole,
}

/// Access token (JWT) claims as issued by the login endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessTokenClaims {
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    pub exp: u64,
}

/// AuthService が返す「検証済み・アプリ側で使う型」
///
/// - `subject` は空文字なら None（principal は作らない）
/// - `role` は既知の値以外 `Role::Unknown` に落とす。subject があるのに role claim がなければ検証失敗
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedAccessToken {
    pub subject: Option<String>,
    pub role: Role,
    pub expires_at: u64,
}

/// HS256 access-token verifier.
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct AuthService {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("AuthService")
            .field("validation", &self.validation)
            .finish()
    }
}

impl AuthService {
    pub fn new(secret: &[u8], issuer: Option<&str>, leeway_seconds: u64) -> Self {
        let decoding_key = DecodingKey::from_secret(secret);

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = leeway_seconds;
        // Login tokens carry no audience
        validation.validate_aud = false;
        if let Some(issuer) = issuer {
            validation.set_issuer(&[issuer]);
        }

        Self {
            decoding_key,
            validation,
        }
    }

    // Verify signature + exp (and iss when configured), then decode claims.
    pub fn verify(&self, token: &str) -> Result<AccessTokenClaims, TokenError> {
        let data =
            jsonwebtoken::decode::<AccessTokenClaims>(token, &self.decoding_key, &self.validation)
                .map_err(TokenError::Jwt)?;

        Ok(data.claims)
    }

    /// Verify, then convert claims into the type consumed by the request gate.
    pub fn verify_verified(&self, token: &str) -> Result<VerifiedAccessToken, TokenError> {
        let claims = self.verify(token)?;

        let subject = claims.sub.filter(|s| !s.trim().is_empty());

        // role is only read once a subject exists
        let role = match (&subject, claims.role.as_deref()) {
            (Some(_), None) => return Err(TokenError::MissingRole),
            (_, Some(role)) => Role::from_claim(role),
            (None, None) => Role::Unknown,
        };

        Ok(VerifiedAccessToken {
            subject,
            role,
            expires_at: claims.exp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::auth::test_support::{SECRET, mint, mint_with};
    use jsonwebtoken::{EncodingKey, Header};
    use std::error::Error as _;

    fn service() -> AuthService {
        AuthService::new(SECRET, None, 0)
    }

    #[test]
    fn accepts_valid_token() {
        let token = mint("agency01", Some("agency"), 600);
        let verified = service().verify_verified(&token).unwrap();

        assert_eq!(verified.subject.as_deref(), Some("agency01"));
        assert_eq!(verified.role, Role::Agency);
    }

    #[test]
    fn rejects_expired_token() {
        let token = mint("agency01", Some("agency"), -3600);
        let err = service().verify_verified(&token).unwrap_err();
        assert!(matches!(err, TokenError::Jwt(_)));
        assert_eq!(err.to_string(), "access token verification failed");
        assert!(err.source().is_some());
    }

    #[test]
    fn leeway_tolerates_recent_expiry() {
        let token = mint("agency01", Some("agency"), -5);
        assert!(service().verify_verified(&token).is_err());
        assert!(AuthService::new(SECRET, None, 60).verify_verified(&token).is_ok());
    }

    #[test]
    fn rejects_wrong_secret() {
        let token = mint("agency01", Some("agency"), 600);
        let other = AuthService::new(b"another-secret-another-secret-xx", None, 0);
        assert!(other.verify_verified(&token).is_err());
    }

    #[test]
    fn rejects_malformed_token() {
        for token in ["", "abc", "a.b.c", "Bearer x.y.z"] {
            assert!(service().verify_verified(token).is_err(), "{token}");
        }
    }

    #[test]
    fn rejects_other_algorithm() {
        let claims = serde_json::json!({
            "sub": "head01",
            "role": "head_office",
            "exp": chrono::Utc::now().timestamp() + 600,
        });
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();
        assert!(service().verify_verified(&token).is_err());
    }

    #[test]
    fn rejects_token_without_exp() {
        let claims = serde_json::json!({ "sub": "head01", "role": "head_office" });
        let token = mint_with(&claims);
        assert!(service().verify_verified(&token).is_err());
    }

    #[test]
    fn checks_issuer_only_when_configured() {
        let claims = serde_json::json!({
            "sub": "head01",
            "role": "head_office",
            "iss": "dist-login",
            "exp": chrono::Utc::now().timestamp() + 600,
        });
        let token = mint_with(&claims);

        assert!(service().verify_verified(&token).is_ok());
        assert!(
            AuthService::new(SECRET, Some("dist-login"), 0)
                .verify_verified(&token)
                .is_ok()
        );
        assert!(
            AuthService::new(SECRET, Some("someone-else"), 0)
                .verify_verified(&token)
                .is_err()
        );
    }

    #[test]
    fn missing_role_with_subject_is_rejected() {
        let token = mint("user01", None, 600);
        let err = service().verify_verified(&token).unwrap_err();
        assert!(matches!(err, TokenError::MissingRole));
    }

    #[test]
    fn empty_subject_skips_role_check() {
        let token = mint("  ", None, 600);
        let verified = service().verify_verified(&token).unwrap();
        assert_eq!(verified.subject, None);
        assert_eq!(verified.role, Role::Unknown);
    }

    #[test]
    fn unknown_role_string_is_not_an_error() {
        let token = mint("user01", Some("supplier"), 600);
        let verified = service().verify_verified(&token).unwrap();
        assert_eq!(verified.role, Role::Unknown);
        assert!(verified.expires_at > 0);
    }
}
