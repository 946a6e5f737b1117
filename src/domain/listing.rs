//! Domain types representing rental listings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::*;
use crate::domain::location::Location;

/// A property offered for rent by its owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub image_src: String,
    pub category: String,
    pub room_count: u32,
    pub bathroom_count: u32,
    pub guest_count: u32,
    /// Country code of the listing's location.
    pub location_value: String,
    /// Nightly price in whole currency units.
    pub price: u32,
    pub created_at: DateTime<Utc>,
}

/// Validated listing payload produced by the listing wizard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingDraft {
    pub category: String,
    pub location_value: String,
    pub guest_count: u32,
    pub room_count: u32,
    pub bathroom_count: u32,
    pub image_src: String,
    pub title: String,
    pub description: String,
    pub price: u32,
}

impl Listing {
    pub fn new(owner_id: Uuid, draft: ListingDraft) -> Self {
        let mut listing = Self {
            id: Uuid::new_v4(),
            owner_id,
            title: String::new(),
            description: String::new(),
            image_src: String::new(),
            category: String::new(),
            room_count: 0,
            bathroom_count: 0,
            guest_count: 0,
            location_value: String::new(),
            price: 0,
            created_at: Utc::now(),
        };
        listing.apply(draft);
        listing
    }

    /// Overwrites every editable field; id, owner and creation time stay.
    pub fn apply(&mut self, draft: ListingDraft) {
        self.category = draft.category;
        self.location_value = draft.location_value;
        self.guest_count = draft.guest_count;
        self.room_count = draft.room_count;
        self.bathroom_count = draft.bathroom_count;
        self.image_src = draft.image_src;
        self.title = draft.title;
        self.description = draft.description;
        self.price = draft.price;
    }

    pub fn draft(&self) -> ListingDraft {
        ListingDraft {
            category: self.category.clone(),
            location_value: self.location_value.clone(),
            guest_count: self.guest_count,
            room_count: self.room_count,
            bathroom_count: self.bathroom_count,
            image_src: self.image_src.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            price: self.price,
        }
    }

    pub fn location(&self) -> Option<Location> {
        Location::lookup(&self.location_value)
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.owner_id == user_id
    }
}

impl Identifiable for Listing {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for Listing {
    fn name(&self) -> &str {
        &self.title
    }
}

impl Displayable for Listing {
    fn display_label(&self) -> String {
        let place = self
            .location()
            .map(|location| format!("{}, {}", location.label, location.region))
            .unwrap_or_else(|| self.location_value.clone());
        format!("{} ({}, {})", self.title, place, self.category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ListingDraft {
        ListingDraft {
            category: "Beach".into(),
            location_value: "PT".into(),
            guest_count: 4,
            room_count: 2,
            bathroom_count: 1,
            image_src: "https://img.example.com/a.jpg".into(),
            title: "Sea view".into(),
            description: "Steps from the sand".into(),
            price: 120,
        }
    }

    #[test]
    fn draft_roundtrips_through_listing() {
        let owner = Uuid::new_v4();
        let listing = Listing::new(owner, draft());
        assert_eq!(listing.draft(), draft());
        assert!(listing.is_owned_by(owner));
    }

    #[test]
    fn apply_keeps_identity() {
        let mut listing = Listing::new(Uuid::new_v4(), draft());
        let id = listing.id;
        let created = listing.created_at;
        let mut changed = draft();
        changed.price = 95;
        changed.title = "Sea view loft".into();
        listing.apply(changed);
        assert_eq!(listing.id, id);
        assert_eq!(listing.created_at, created);
        assert_eq!(listing.price, 95);
        assert_eq!(
            listing.display_label(),
            "Sea view loft (Portugal, Europe, Beach)"
        );
    }
}
