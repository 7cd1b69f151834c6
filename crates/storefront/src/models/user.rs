//! Account records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use teahouse_core::UserId;

/// A registered account as stored in the user directory.
///
/// The password is an opaque string compared verbatim at login; the source
/// system never hashed client-side and this port preserves that behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    pub id: UserId,
    /// Unique key within the directory.
    pub email: String,
    pub password: String,
    pub full_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    pub created_at: DateTime<Utc>,
}

impl UserAccount {
    /// The password-stripped view handed to the rest of the application.
    #[must_use]
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id.clone(),
            email: self.email.clone(),
            full_name: self.full_name.clone(),
            phone: self.phone.clone(),
            address: self.address.clone(),
            created_at: self.created_at,
        }
    }
}

/// The signed-in user as exposed outside the auth store.
///
/// Deliberately has no password field, so a leaked serialization of the
/// current user never includes the credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub email: String,
    pub full_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    /// Name shown in the header: the full name when present, else the email.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.full_name.is_empty() {
            &self.email
        } else {
            &self.full_name
        }
    }
}
