//! User profile entity as returned by the marketplace accounts API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Marketplace role of a signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UserRole {
    /// A student looking for housing
    Student,
    /// A landlord listing apartments
    Landlord,
    /// A role this client does not know about yet
    Other(String),
}

impl UserRole {
    pub fn as_str(&self) -> &str {
        match self {
            UserRole::Student => "student",
            UserRole::Landlord => "landlord",
            UserRole::Other(role) => role,
        }
    }
}

impl From<&str> for UserRole {
    fn from(value: &str) -> Self {
        match value {
            "student" => UserRole::Student,
            "landlord" => UserRole::Landlord,
            other => UserRole::Other(other.to_string()),
        }
    }
}

impl Serialize for UserRole {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for UserRole {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(UserRole::from(raw.as_str()))
    }
}

/// Account record nested in the profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: u64,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// Profile of the signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Profile identifier
    pub id: u64,

    /// Underlying account
    pub user: UserAccount,

    /// Marketplace role
    pub role: UserRole,

    /// Contact phone number, if provided
    #[serde(default)]
    pub phone: Option<String>,

    /// Whether the profile has been verified by the marketplace
    #[serde(default)]
    pub verified: bool,

    /// When the profile was created
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl UserProfile {
    /// Name to show in greetings, falling back to the username
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.user.first_name, self.user.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.user.username.clone()
        } else {
            full.to_string()
        }
    }

    pub fn is_landlord(&self) -> bool {
        self.role == UserRole::Landlord
    }

    pub fn is_student(&self) -> bool {
        self.role == UserRole::Student
    }
}
