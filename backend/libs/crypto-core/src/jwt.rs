/// Shared JWT module for the blog platform
///
/// Tokens are signed with HS256 using a single shared secret loaded from the
/// service configuration. The payload carries the user id (`id`) and the
/// issue time; an `exp` claim is only present when a token lifetime has been
/// configured, otherwise tokens stay valid until the secret is rotated.
///
/// ## Usage
///
/// ```rust
/// use crypto_core::jwt::JwtService;
/// use uuid::Uuid;
///
/// let jwt = JwtService::new("a-long-shared-secret-of-at-least-32-bytes").unwrap();
/// let user_id = Uuid::new_v4();
/// let token = jwt.issue(user_id).unwrap();
/// assert_eq!(jwt.verify_user_id(&token).unwrap(), user_id);
/// ```
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

// ============================================================================
// Constants
// ============================================================================

/// Shared-secret algorithm used for every token
const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

/// Minimum secret length (256 bits) accepted outside development
pub const MIN_SECRET_LENGTH: usize = 32;

// ============================================================================
// Data Structures
// ============================================================================

/// Token payload
///
/// `id` is optional on the wire so that a token without a subject can be
/// told apart from a token that failed to decode.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// User id as UUID string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Issued at (Unix timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// Expiration time (Unix timestamp), absent when no lifetime is configured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

/// Token failures, ordered roughly by how early they are detected
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is missing")]
    Missing,

    #[error("token is malformed")]
    Malformed,

    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("token payload does not carry a user id")]
    MissingSubject,

    #[error("JWT secret must not be empty")]
    EmptySecret,

    #[error("failed to sign token: {0}")]
    Signing(String),
}

// ============================================================================
// Service
// ============================================================================

/// Issues and verifies tokens for one shared secret
///
/// Built once at startup and shared (cloned) into every worker. Holds no
/// mutable state.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Option<Duration>,
}

impl fmt::Debug for JwtService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtService")
            .field("algorithm", &JWT_ALGORITHM)
            .field("secret", &"[REDACTED]")
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl JwtService {
    /// Build a service from the shared secret
    ///
    /// Strength is not enforced here; callers decide with
    /// [`is_secret_strong`] whether a short secret is acceptable for the
    /// current environment.
    pub fn new(secret: &str) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::EmptySecret);
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl: None,
        })
    }

    /// Give every issued token an `exp` claim `ttl` after issue time
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// Issue a signed token for `user_id`
    pub fn issue(&self, user_id: Uuid) -> Result<String, TokenError> {
        let now = Utc::now();
        let exp = match self.ttl {
            Some(ttl) => Some(
                now.checked_add_signed(ttl)
                    .ok_or_else(|| TokenError::Signing("token lifetime overflows".to_string()))?
                    .timestamp(),
            ),
            None => None,
        };
        let claims = Claims {
            id: Some(user_id.to_string()),
            iat: Some(now.timestamp()),
            exp,
        };

        encode(&Header::new(JWT_ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Check the signature (and `exp` when present) and return the payload
    ///
    /// The payload is returned as-is; use [`JwtService::verify_user_id`] to
    /// also require a well-formed `id`.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(TokenError::Missing);
        }

        let mut validation = Validation::new(JWT_ALGORITHM);
        // `exp` is optional: tokens issued without a lifetime never expire
        validation.required_spec_claims.clear();
        validation.validate_exp = true;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                other => {
                    tracing::debug!(error = ?other, "JWT rejected");
                    TokenError::Malformed
                }
            })
    }

    /// Verify a token and extract the user id it was issued for
    pub fn verify_user_id(&self, token: &str) -> Result<Uuid, TokenError> {
        let claims = self.verify(token)?;
        let id = claims.id.ok_or(TokenError::MissingSubject)?;
        Uuid::parse_str(&id).map_err(|_| TokenError::Malformed)
    }
}

/// Whether `secret` is long enough to be used in production
pub fn is_secret_strong(secret: &str) -> bool {
    secret.len() >= MIN_SECRET_LENGTH
}

// ============================================================================
// Tests
// ============================================================================
