//! Caller tokens: HS256 JWTs whose `sub` claim is the user identity.

use std::collections::HashSet;

use jwt_simple::prelude::*;

use crate::error::{AppError, Result};

/// Verified identity of the user making a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    pub uid: String,
}

/// Shortest HS256 secret the token library accepts (96 bits).
pub const MIN_SECRET_LEN: usize = 12;

#[derive(Clone)]
pub struct CallerTokenKey {
    key: HS256Key,
    issuer: Option<String>,
}

impl CallerTokenKey {
    pub fn new(secret: &[u8], issuer: Option<String>) -> Self {
        Self {
            key: HS256Key::from_bytes(secret),
            issuer,
        }
    }

    /// Whether `secret` is long enough to sign and verify caller tokens.
    pub fn is_usable_secret(secret: &[u8]) -> bool {
        secret.len() >= MIN_SECRET_LEN
    }

    /// Validate a caller token and return the identity it carries.
    pub fn verify(&self, token: &str) -> Result<CallerIdentity> {
        let options = VerificationOptions {
            allowed_issuers: self
                .issuer
                .as_ref()
                .map(|iss| HashSet::from([iss.clone()])),
            ..Default::default()
        };

        let claims = self
            .key
            .verify_token::<NoCustomClaims>(token, Some(options))
            .map_err(|e| {
                tracing::debug!("Rejected caller token: {}", e);
                unauthenticated()
            })?;

        let uid = claims
            .subject
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(unauthenticated)?;

        Ok(CallerIdentity { uid })
    }

    /// Mint a token for `uid` valid for `ttl_secs` seconds.
    pub fn issue(&self, uid: &str, ttl_secs: u64) -> Result<String> {
        let mut claims = Claims::create(Duration::from_secs(ttl_secs)).with_subject(uid);
        if let Some(iss) = &self.issuer {
            claims = claims.with_issuer(iss);
        }
        self.key
            .authenticate(claims)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
    }
}

pub fn unauthenticated() -> AppError {
    AppError::Unauthenticated("Debes iniciar sesión para continuar.".into())
}
