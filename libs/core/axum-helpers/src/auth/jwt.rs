use super::config::JwtConfig;
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// JWT token time-to-live constants
pub const ACCESS_TOKEN_TTL: i64 = 900; // 15 minutes
pub const REFRESH_TOKEN_TTL: i64 = 86_400; // 1 day

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,  // Subject (user ID)
    pub role: String, // User role
    pub exp: i64,     // Expiration time
    pub iat: i64,     // Issued at
}

/// Stateless JWT token issuer/verifier.
///
/// Tokens are self-contained: there is no session store and no
/// revocation list. A token stays valid until its expiry, and becomes
/// unusable earlier only through a signing-key change or client discard.
#[derive(Clone)]
pub struct JwtAuth {
    secret: String,
}

impl JwtAuth {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            secret: config.secret.clone(),
        }
    }

    /// Create access token (15 min)
    pub fn create_access_token(&self, user_id: &str, role: &str) -> eyre::Result<String> {
        self.create_token(user_id, role, ACCESS_TOKEN_TTL)
    }

    /// Create refresh token (1 day)
    pub fn create_refresh_token(&self, user_id: &str, role: &str) -> eyre::Result<String> {
        self.create_token(user_id, role, REFRESH_TOKEN_TTL)
    }

    /// Create JWT token with the specified TTL
    fn create_token(&self, user_id: &str, role: &str, ttl_seconds: i64) -> eyre::Result<String> {
        let now = Utc::now();
        let claims = JwtClaims {
            sub: user_id.to_string(),
            role: role.to_string(),
            exp: (now + Duration::seconds(ttl_seconds)).timestamp(),
            iat: now.timestamp(),
        };

        let header = Header {
            alg: jsonwebtoken::Algorithm::HS256,
            ..Default::default()
        };

        let token = encode(
            &header,
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?;

        Ok(token)
    }

    /// Verify the token signature and expiry, and decode the claims.
    ///
    /// Expiry is checked with zero leeway.
    pub fn verify_token(&self, token: &str) -> eyre::Result<JwtClaims> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        let token_data = decode::<JwtClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )?;

        Ok(token_data.claims)
    }
}
