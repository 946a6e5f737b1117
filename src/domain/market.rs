//! The marketplace aggregate persisted as one snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::resolve_id;
use crate::domain::{Listing, Reservation, User};

pub const CURRENT_SCHEMA_VERSION: u8 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Market {
    pub schema_version: u8,
    #[serde(default)]
    pub listings: Vec<Listing>,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub reservations: Vec<Reservation>,
    pub updated_at: DateTime<Utc>,
}

impl Default for Market {
    fn default() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            listings: Vec::new(),
            users: Vec::new(),
            reservations: Vec::new(),
            updated_at: Utc::now(),
        }
    }
}

impl Market {
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn listing(&self, id: Uuid) -> Option<&Listing> {
        self.listings.iter().find(|listing| listing.id == id)
    }

    pub fn listing_mut(&mut self, id: Uuid) -> Option<&mut Listing> {
        self.listings.iter_mut().find(|listing| listing.id == id)
    }

    pub fn user(&self, id: Uuid) -> Option<&User> {
        self.users.iter().find(|user| user.id == id)
    }

    pub fn user_mut(&mut self, id: Uuid) -> Option<&mut User> {
        self.users.iter_mut().find(|user| user.id == id)
    }

    pub fn user_by_email(&self, email: &str) -> Option<&User> {
        self.users.iter().find(|user| user.matches_email(email))
    }

    pub fn reservation(&self, id: Uuid) -> Option<&Reservation> {
        self.reservations
            .iter()
            .find(|reservation| reservation.id == id)
    }

    pub fn reservations_for_listing(&self, listing_id: Uuid) -> impl Iterator<Item = &Reservation> {
        self.reservations
            .iter()
            .filter(move |reservation| reservation.listing_id == listing_id)
    }

    /// Accepts a full id or an unambiguous prefix such as the 8-digit short id.
    pub fn resolve_listing(&self, needle: &str) -> Option<Uuid> {
        resolve_id(&self.listings, needle)
    }

    pub fn resolve_reservation(&self, needle: &str) -> Option<Uuid> {
        resolve_id(&self.reservations, needle)
    }
}
