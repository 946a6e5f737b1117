use uuid::Uuid;

use crate::domain::{Listing, Market};

use super::{ServiceError, ServiceResult};

pub struct FavoriteService;

impl FavoriteService {
    /// Adds or removes `listing_id` from the user's favorites; returns whether
    /// it is a favorite afterwards.
    pub fn toggle(market: &mut Market, user_id: Uuid, listing_id: Uuid) -> ServiceResult<bool> {
        if market.listing(listing_id).is_none() {
            return Err(ServiceError::NotFound("Listing"));
        }
        let user = market.user_mut(user_id).ok_or(ServiceError::Unauthorized)?;
        let now_favorite = if user.has_favorite(listing_id) {
            user.favorite_ids.retain(|id| *id != listing_id);
            false
        } else {
            user.favorite_ids.push(listing_id);
            true
        };
        market.touch();
        tracing::debug!(user = %user_id, listing = %listing_id, now_favorite, "favorite toggled");
        Ok(now_favorite)
    }

    /// The user's favorite listings in the order they were added.
    pub fn list(market: &Market, user_id: Uuid) -> ServiceResult<Vec<&Listing>> {
        let user = market.user(user_id).ok_or(ServiceError::Unauthorized)?;
        Ok(user
            .favorite_ids
            .iter()
            .filter_map(|id| market.listing(*id))
            .collect())
    }
}
