use uuid::Uuid;

use crate::domain::{Category, Listing, ListingDraft, ListingQuery, Location, Market};

use super::{ServiceError, ServiceResult};

pub struct ListingService;

impl ListingService {
    /// Listings matching every filter of `query`, newest first.
    pub fn search<'a>(market: &'a Market, query: &ListingQuery) -> Vec<&'a Listing> {
        let window = query.date_range();
        let mut results: Vec<&Listing> = market
            .listings
            .iter()
            .filter(|listing| query.user_id.map_or(true, |id| listing.owner_id == id))
            .filter(|listing| {
                query
                    .category
                    .as_deref()
                    .map_or(true, |category| listing.category.eq_ignore_ascii_case(category))
            })
            .filter(|listing| {
                query
                    .location_value
                    .as_deref()
                    .map_or(true, |value| listing.location_value.eq_ignore_ascii_case(value))
            })
            .filter(|listing| query.guest_count.map_or(true, |min| listing.guest_count >= min))
            .filter(|listing| query.room_count.map_or(true, |min| listing.room_count >= min))
            .filter(|listing| {
                query
                    .bathroom_count
                    .map_or(true, |min| listing.bathroom_count >= min)
            })
            .filter(|listing| {
                window.map_or(true, |window| {
                    !market
                        .reservations_for_listing(listing.id)
                        .any(|reservation| reservation.range().overlaps(&window))
                })
            })
            .collect();
        results.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        results
    }

    pub fn create(market: &mut Market, owner_id: Uuid, draft: ListingDraft) -> ServiceResult<Listing> {
        if market.user(owner_id).is_none() {
            return Err(ServiceError::Unauthorized);
        }
        Self::validate(&draft)?;
        let listing = Listing::new(owner_id, draft);
        market.listings.push(listing.clone());
        market.touch();
        tracing::info!(listing = %listing.id, owner = %owner_id, "listing created");
        Ok(listing)
    }

    pub fn update(
        market: &mut Market,
        actor_id: Uuid,
        id: Uuid,
        draft: ListingDraft,
    ) -> ServiceResult<Listing> {
        Self::validate(&draft)?;
        let listing = market
            .listing_mut(id)
            .ok_or(ServiceError::NotFound("Listing"))?;
        if !listing.is_owned_by(actor_id) {
            return Err(ServiceError::Forbidden(
                "Only the owner can edit this property".into(),
            ));
        }
        listing.apply(draft);
        let updated = listing.clone();
        market.touch();
        tracing::info!(listing = %id, "listing updated");
        Ok(updated)
    }

    /// Removes a listing with its reservations and any favorites pointing at it.
    pub fn delete(market: &mut Market, actor_id: Uuid, id: Uuid) -> ServiceResult<Listing> {
        let listing = market
            .listing(id)
            .cloned()
            .ok_or(ServiceError::NotFound("Listing"))?;
        if !listing.is_owned_by(actor_id) {
            return Err(ServiceError::Forbidden(
                "Only the owner can delete this property".into(),
            ));
        }
        market.listings.retain(|candidate| candidate.id != id);
        let before = market.reservations.len();
        market
            .reservations
            .retain(|reservation| reservation.listing_id != id);
        let dropped = before - market.reservations.len();
        for user in &mut market.users {
            user.favorite_ids.retain(|favorite| *favorite != id);
        }
        market.touch();
        tracing::info!(listing = %id, reservations = dropped, "listing deleted");
        Ok(listing)
    }

    pub fn owned_by(market: &Market, owner_id: Uuid) -> Vec<&Listing> {
        Self::search(
            market,
            &ListingQuery {
                user_id: Some(owner_id),
                ..ListingQuery::default()
            },
        )
    }

    fn validate(draft: &ListingDraft) -> ServiceResult<()> {
        if Category::find(&draft.category).is_none() {
            return Err(ServiceError::Invalid(format!(
                "Unknown category `{}`",
                draft.category
            )));
        }
        if Location::lookup(&draft.location_value).is_none() {
            return Err(ServiceError::Invalid(format!(
                "Unknown location `{}`",
                draft.location_value
            )));
        }
        if draft.guest_count == 0 || draft.room_count == 0 || draft.bathroom_count == 0 {
            return Err(ServiceError::Invalid(
                "Guests, rooms and bathrooms must each be at least 1".into(),
            ));
        }
        if draft.title.trim().is_empty() || draft.description.trim().is_empty() {
            return Err(ServiceError::Invalid(
                "Title and description are required".into(),
            ));
        }
        if draft.price == 0 {
            return Err(ServiceError::Invalid("Price must be greater than zero".into()));
        }
        if url::Url::parse(&draft.image_src).is_err() {
            return Err(ServiceError::Invalid(format!(
                "Image `{}` is not a valid URL",
                draft.image_src
            )));
        }
        Ok(())
    }
}
