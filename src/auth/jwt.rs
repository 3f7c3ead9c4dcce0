use chrono::Utc;
use jsonwebtoken::{decode, encode, Header};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::jwt::JwtSettings;
use crate::models::user::UserRole;

/// What a session token asserts about its bearer.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: UserRole,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, email: &str, role: UserRole, settings: &JwtSettings) -> Self {
        let issued_at = Utc::now();
        Self {
            sub: user_id,
            email: email.to_string(),
            role,
            iat: issued_at.timestamp(),
            exp: (issued_at + settings.token_ttl()).timestamp(),
        }
    }

    pub fn user_id(&self) -> Uuid {
        self.sub
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

pub fn generate_token(claims: &Claims, settings: &JwtSettings) -> Result<String, jsonwebtoken::errors::Error> {
    encode(&Header::new(settings.algorithm()), claims, &settings.encoding_key())
}

/// Checks signature and expiry.
pub fn decode_token(token: &str, settings: &JwtSettings) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(token, &settings.decoding_key(), &settings.validation()).map(|data| data.claims)
}
