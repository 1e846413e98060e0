//! JWT token generation and validation
//!
//! Keys are derived once from the configured secret and shared behind `Arc`.

use crate::config::JwtConfig;
use anyhow::{anyhow, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Purpose a token was issued for
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    Access,
    Refresh,
    VerifyEmail,
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
            TokenType::VerifyEmail => "email verification",
        };
        f.write_str(name)
    }
}

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
    pub token_type: TokenType,
}

impl Claims {
    pub fn user_id(&self) -> Result<Uuid> {
        Uuid::parse_str(&self.sub).map_err(|_| anyhow!("Invalid user ID in token"))
    }
}

#[derive(Clone)]
struct JwtKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

/// Token issuing and checking with pre-computed keys
#[derive(Clone)]
pub struct JwtService {
    keys: JwtKeys,
    access_expiry_secs: i64,
    refresh_expiry_secs: i64,
    verification_expiry_secs: i64,
}

impl JwtService {
    /// Build the service once at startup and keep it in `AppState`
    pub fn new(config: &JwtConfig) -> Self {
        let secret = config.secret.as_bytes();
        Self {
            keys: JwtKeys {
                encoding: Arc::new(EncodingKey::from_secret(secret)),
                decoding: Arc::new(DecodingKey::from_secret(secret)),
            },
            access_expiry_secs: config.access_token_expiry_secs,
            refresh_expiry_secs: config.refresh_token_expiry_secs,
            verification_expiry_secs: config.verification_token_expiry_secs,
        }
    }

    #[inline]
    pub fn generate_access_token(&self, user_id: Uuid) -> Result<String> {
        self.generate(user_id, TokenType::Access, self.access_expiry_secs)
    }

    #[inline]
    pub fn generate_refresh_token(&self, user_id: Uuid) -> Result<String> {
        self.generate(user_id, TokenType::Refresh, self.refresh_expiry_secs)
    }

    #[inline]
    pub fn generate_verification_token(&self, user_id: Uuid) -> Result<String> {
        self.generate(user_id, TokenType::VerifyEmail, self.verification_expiry_secs)
    }

    fn generate(&self, user_id: Uuid, token_type: TokenType, expiry_secs: i64) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (now + Duration::seconds(expiry_secs)).timestamp(),
            iat: now.timestamp(),
            token_type,
        };

        encode(&Header::default(), &claims, &self.keys.encoding)
            .map_err(|e| anyhow!("Failed to generate {} token: {}", token_type, e))
    }

    /// Decode a token and check it was issued for `expected`
    pub fn validate(&self, token: &str, expected: TokenType) -> Result<Claims> {
        let claims = decode::<Claims>(token, &self.keys.decoding, &Validation::default())
            .map_err(|e| anyhow!("Invalid token: {}", e))?
            .claims;

        if claims.token_type != expected {
            return Err(anyhow!("Not an {} token", expected));
        }
        Ok(claims)
    }

    #[inline]
    pub fn validate_access_token(&self, token: &str) -> Result<Claims> {
        self.validate(token, TokenType::Access)
    }

    #[inline]
    pub fn validate_refresh_token(&self, token: &str) -> Result<Claims> {
        self.validate(token, TokenType::Refresh)
    }

    #[inline]
    pub fn validate_verification_token(&self, token: &str) -> Result<Claims> {
        self.validate(token, TokenType::VerifyEmail)
    }

    #[inline]
    pub fn access_token_expiry_secs(&self) -> i64 {
        self.access_expiry_secs
    }
}
