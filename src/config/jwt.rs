use chrono::Duration;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Validation};
use secrecy::{ExposeSecret, SecretString};

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Signing secret and lifetime of the session tokens handed out at login.
#[derive(Debug, Clone)]
pub struct JwtSettings {
    secret: SecretString,
    token_ttl: Duration,
}

impl JwtSettings {
    pub fn new(secret: SecretString, token_ttl: Duration) -> Self {
        Self { secret, token_ttl }
    }

    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }

    pub fn algorithm(&self) -> Algorithm {
        ALGORITHM
    }

    pub fn encoding_key(&self) -> EncodingKey {
        EncodingKey::from_secret(self.secret.expose_secret().as_bytes())
    }

    pub fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_secret(self.secret.expose_secret().as_bytes())
    }

    /// Expiry is always checked; tokens carry no audience.
    pub fn validation(&self) -> Validation {
        Validation::new(ALGORITHM)
    }
}
