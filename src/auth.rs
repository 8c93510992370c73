use anyhow::{Context, Result};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;

/// Identity claims carried by a signed session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id, stringified per JWT convention.
    pub sub: String,
    pub username: String,
    pub iat: i64,
    pub exp: i64,
}

/// Signs and verifies session tokens with a process-wide HS256 secret.
///
/// There is no revocation mechanism: a token is valid until `exp` purely by
/// signature check.
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_hours: i64,
}

impl TokenIssuer {
    #[must_use]
    pub fn new(secret: &str, ttl_hours: u64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_hours: ttl_hours as i64,
        }
    }

    /// Build the issuer from config, falling back to the `CINELOG_SECRET`
    /// environment variable. A missing secret is a startup-time
    /// misconfiguration, not a per-request error.
    pub fn from_config(auth: &AuthConfig) -> Result<Self> {
        let secret = auth
            .secret
            .clone()
            .or_else(|| std::env::var("CINELOG_SECRET").ok())
            .context(
                "signing secret missing: set [auth].secret in config.toml \
                 or the CINELOG_SECRET environment variable",
            )?;

        Ok(Self::new(&secret, auth.token_ttl_hours))
    }

    pub fn issue(&self, user_id: i32, username: &str) -> Result<String> {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            iat: now,
            exp: now + self.ttl_hours * 3600,
        };

        encode(&Header::default(), &claims, &self.encoding).context("Failed to sign token")
    }

    pub fn verify(&self, token: &str) -> Result<Claims> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .context("Token rejected")?;
        Ok(data.claims)
    }
}

/// Hash a password using Argon2id with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

/// Compare a plaintext candidate against a stored hash. A malformed stored
/// hash counts as a mismatch, not an error.
#[must_use]
pub fn verify_password(candidate: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(candidate.as_bytes(), &parsed)
        .is_ok()
}
