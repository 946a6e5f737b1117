//! Marketplace accounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// PHC-formatted password hash.
    pub password_hash: String,
    #[serde(default)]
    pub favorite_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            favorite_ids: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn has_favorite(&self, listing_id: Uuid) -> bool {
        self.favorite_ids.contains(&listing_id)
    }

    pub fn matches_email(&self, email: &str) -> bool {
        self.email.eq_ignore_ascii_case(email.trim())
    }
}

/// Login payload produced by the login wizard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Sign-up payload produced by the register wizard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl Identifiable for User {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for User {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Displayable for User {
    fn display_label(&self) -> String {
        format!("{} <{}>", self.name, self.email)
    }
}
