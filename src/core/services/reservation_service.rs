use std::collections::BTreeSet;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::{DateRange, Listing, Market, Reservation};

use super::{ServiceError, ServiceResult};

pub struct ReservationService;

impl ReservationService {
    /// Total price of staying at `listing` for `range`.
    pub fn quote(listing: &Listing, range: &DateRange) -> u64 {
        u64::from(range.nights()) * u64::from(listing.price)
    }

    pub fn reserve(
        market: &mut Market,
        guest_id: Uuid,
        listing_id: Uuid,
        range: DateRange,
        today: NaiveDate,
    ) -> ServiceResult<Reservation> {
        if market.user(guest_id).is_none() {
            return Err(ServiceError::Unauthorized);
        }
        let listing = market
            .listing(listing_id)
            .ok_or(ServiceError::NotFound("Listing"))?;
        if listing.is_owned_by(guest_id) {
            return Err(ServiceError::Forbidden(
                "You cannot reserve your own property".into(),
            ));
        }
        if range.start < today {
            return Err(ServiceError::Invalid(
                "Reservations cannot start in the past".into(),
            ));
        }
        if range.nights() == 0 {
            return Err(ServiceError::Invalid(
                "A reservation needs at least one night".into(),
            ));
        }
        if market
            .reservations_for_listing(listing_id)
            .any(|existing| existing.range().overlaps(&range))
        {
            return Err(ServiceError::Invalid(format!(
                "{} overlaps an existing reservation",
                range
            )));
        }
        let total = Self::quote(listing, &range);
        let reservation = Reservation::new(listing_id, guest_id, range, total);
        market.reservations.push(reservation.clone());
        market.touch();
        tracing::info!(
            reservation = %reservation.id,
            listing = %listing_id,
            nights = range.nights(),
            total,
            "reservation created"
        );
        Ok(reservation)
    }

    /// Every date covered by an existing reservation, ascending.
    pub fn disabled_dates(market: &Market, listing_id: Uuid) -> Vec<NaiveDate> {
        let dates: BTreeSet<NaiveDate> = market
            .reservations_for_listing(listing_id)
            .flat_map(|reservation| reservation.range().days())
            .collect();
        dates.into_iter().collect()
    }

    /// Reservations the user made as a guest, newest first.
    pub fn trips(market: &Market, user_id: Uuid) -> Vec<&Reservation> {
        let mut trips: Vec<&Reservation> = market
            .reservations
            .iter()
            .filter(|reservation| reservation.user_id == user_id)
            .collect();
        trips.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        trips
    }

    /// Reservations other guests made on the user's listings, newest first.
    pub fn for_host(market: &Market, owner_id: Uuid) -> Vec<&Reservation> {
        let mut reservations: Vec<&Reservation> = market
            .reservations
            .iter()
            .filter(|reservation| {
                market
                    .listing(reservation.listing_id)
                    .map_or(false, |listing| listing.is_owned_by(owner_id))
            })
            .collect();
        reservations.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        reservations
    }

    /// Cancels a reservation on behalf of its guest or the listing owner.
    pub fn cancel(market: &mut Market, actor_id: Uuid, id: Uuid) -> ServiceResult<Reservation> {
        let reservation = market
            .reservation(id)
            .cloned()
            .ok_or(ServiceError::NotFound("Reservation"))?;
        let is_owner = market
            .listing(reservation.listing_id)
            .map_or(false, |listing| listing.is_owned_by(actor_id));
        if reservation.user_id != actor_id && !is_owner {
            return Err(ServiceError::Forbidden(
                "Only the guest or the host can cancel this reservation".into(),
            ));
        }
        market.reservations.retain(|candidate| candidate.id != id);
        market.touch();
        tracing::info!(reservation = %id, "reservation cancelled");
        Ok(reservation)
    }
}
