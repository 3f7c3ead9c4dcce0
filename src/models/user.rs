use std::fmt;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use secrecy::{ExposeSecret, SecretString};

/// Accounts linked to one player (a player and a parent, or two parents).
pub const MAX_ACCOUNTS_PER_PLAYER: i64 = 2;
pub const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Admin,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::User => write!(f, "user"),
            UserRole::Admin => write!(f, "admin"),
        }
    }
}

/// Account as listed to admins, with the linked player's name
#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct UserSummary {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub is_player: bool,
    pub is_parent: bool,
    pub mobile_number: Option<String>,
    pub linked_player_id: Uuid,
    pub linked_player_name: String,
    pub has_voted: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize)]
pub struct RegistrationRequest {
    pub email: String,
    #[serde(serialize_with = "serialize_secret_string", deserialize_with = "deserialize_secret_string")]
    pub password: SecretString,
    pub first_name: String,
    pub last_name: String,
    pub linked_player_id: Uuid,
    #[serde(default)]
    pub is_player: bool,
    #[serde(default)]
    pub is_parent: bool,
    pub mobile_number: Option<String>,
}

impl RegistrationRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.first_name.trim().is_empty() {
            return Err("First name is required".to_string());
        }
        if self.last_name.trim().is_empty() {
            return Err("Last name is required".to_string());
        }
        if !self.email.contains('@') {
            return Err("A valid email is required".to_string());
        }
        if self.password.expose_secret().chars().count() < MIN_PASSWORD_LENGTH {
            return Err(format!("Password must be at least {} characters", MIN_PASSWORD_LENGTH));
        }
        // Parents receive vote reminders by text message
        let has_mobile = self
            .mobile_number
            .as_deref()
            .is_some_and(|number| !number.trim().is_empty());
        if !self.is_player && !has_mobile {
            return Err("Mobile number is required for parent accounts".to_string());
        }
        Ok(())
    }
}

impl std::fmt::Display for RegistrationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Email: {}, Player: {}", self.email, self.linked_player_id)
    }
}

pub fn serialize_secret_string<S>(_: &SecretString, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str("[REDACTED]")
}

pub fn deserialize_secret_string<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Ok(SecretString::new(s.into_boxed_str()))
}
