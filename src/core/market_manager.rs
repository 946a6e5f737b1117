use chrono::{Local, NaiveDate};
use uuid::Uuid;

use crate::core::services::{
    AccountService, FavoriteService, ListingService, ReservationService, ServiceError,
    ServiceResult,
};
use crate::domain::{
    Credentials, DateRange, Listing, ListingDraft, ListingQuery, Market, Registration,
    Reservation, User,
};
use crate::errors::MarketError;
use crate::storage::StorageBackend;

/// Facade that coordinates marketplace state, the signed-in session and persistence.
///
/// Every mutation runs against a copy of the market which replaces the live
/// state only after the storage backend accepted it.
pub struct MarketManager {
    market: Market,
    session: Option<Uuid>,
    storage: Box<dyn StorageBackend>,
    load_warnings: Vec<String>,
}

impl MarketManager {
    pub fn open(storage: Box<dyn StorageBackend>) -> Result<Self, MarketError> {
        let report = storage.load()?;
        tracing::info!(
            path = %storage.path().display(),
            listings = report.market.listings.len(),
            users = report.market.users.len(),
            "marketplace loaded"
        );
        Ok(Self {
            market: report.market,
            session: None,
            storage,
            load_warnings: report.warnings,
        })
    }

    pub fn market(&self) -> &Market {
        &self.market
    }

    pub fn storage(&self) -> &dyn StorageBackend {
        self.storage.as_ref()
    }

    pub fn load_warnings(&self) -> &[String] {
        &self.load_warnings
    }

    pub fn current_user(&self) -> Option<&User> {
        self.session.and_then(|id| self.market.user(id))
    }

    pub fn require_user(&self) -> ServiceResult<&User> {
        self.current_user().ok_or(ServiceError::Unauthorized)
    }

    fn require_user_id(&self) -> ServiceResult<Uuid> {
        self.require_user().map(|user| user.id)
    }

    fn commit<T>(&mut self, apply: impl FnOnce(&mut Market) -> ServiceResult<T>) -> ServiceResult<T> {
        let mut working = self.market.clone();
        let value = apply(&mut working)?;
        self.storage.save(&working)?;
        self.market = working;
        Ok(value)
    }

    pub fn register(&mut self, registration: Registration) -> ServiceResult<User> {
        self.commit(|market| AccountService::register(market, registration))
    }

    pub fn sign_in(&mut self, credentials: &Credentials) -> ServiceResult<User> {
        let user = AccountService::authenticate(&self.market, credentials)?;
        self.session = Some(user.id);
        Ok(user)
    }

    pub fn sign_out(&mut self) -> Option<User> {
        let user = self.current_user().cloned();
        self.session = None;
        user
    }

    pub fn listings(&self, query: &ListingQuery) -> Vec<&Listing> {
        ListingService::search(&self.market, query)
    }

    pub fn listing(&self, id: Uuid) -> ServiceResult<&Listing> {
        self.market
            .listing(id)
            .ok_or(ServiceError::NotFound("Listing"))
    }

    pub fn resolve_listing(&self, needle: &str) -> ServiceResult<Uuid> {
        self.market
            .resolve_listing(needle)
            .ok_or(ServiceError::NotFound("Listing"))
    }

    pub fn resolve_reservation(&self, needle: &str) -> ServiceResult<Uuid> {
        self.market
            .resolve_reservation(needle)
            .ok_or(ServiceError::NotFound("Reservation"))
    }

    pub fn properties(&self) -> ServiceResult<Vec<&Listing>> {
        let owner = self.require_user_id()?;
        Ok(ListingService::owned_by(&self.market, owner))
    }

    pub fn create_listing(&mut self, draft: ListingDraft) -> ServiceResult<Listing> {
        let owner = self.require_user_id()?;
        self.commit(|market| ListingService::create(market, owner, draft))
    }

    pub fn update_listing(&mut self, id: Uuid, draft: ListingDraft) -> ServiceResult<Listing> {
        let actor = self.require_user_id()?;
        self.commit(|market| ListingService::update(market, actor, id, draft))
    }

    pub fn delete_listing(&mut self, id: Uuid) -> ServiceResult<Listing> {
        let actor = self.require_user_id()?;
        self.commit(|market| ListingService::delete(market, actor, id))
    }

    pub fn toggle_favorite(&mut self, listing_id: Uuid) -> ServiceResult<bool> {
        let user = self.require_user_id()?;
        self.commit(|market| FavoriteService::toggle(market, user, listing_id))
    }

    pub fn favorites(&self) -> ServiceResult<Vec<&Listing>> {
        let user = self.require_user_id()?;
        FavoriteService::list(&self.market, user)
    }

    pub fn reserve(&mut self, listing_id: Uuid, range: DateRange) -> ServiceResult<Reservation> {
        let guest = self.require_user_id()?;
        let today = today();
        self.commit(|market| ReservationService::reserve(market, guest, listing_id, range, today))
    }

    pub fn trips(&self) -> ServiceResult<Vec<&Reservation>> {
        let user = self.require_user_id()?;
        Ok(ReservationService::trips(&self.market, user))
    }

    pub fn host_reservations(&self) -> ServiceResult<Vec<&Reservation>> {
        let user = self.require_user_id()?;
        Ok(ReservationService::for_host(&self.market, user))
    }

    pub fn cancel_reservation(&mut self, id: Uuid) -> ServiceResult<Reservation> {
        let actor = self.require_user_id()?;
        self.commit(|market| ReservationService::cancel(market, actor, id))
    }

    pub fn disabled_dates(&self, listing_id: Uuid) -> Vec<NaiveDate> {
        ReservationService::disabled_dates(&self.market, listing_id)
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::services::fixtures::draft;
    use crate::storage::JsonStorage;
    use tempfile::TempDir;

    fn manager() -> (MarketManager, TempDir) {
        let temp = TempDir::new().unwrap();
        let storage = JsonStorage::new(Some(temp.path().to_path_buf())).unwrap();
        (MarketManager::open(Box::new(storage)).unwrap(), temp)
    }

    fn sign_up(manager: &mut MarketManager, email: &str) -> User {
        manager
            .register(Registration {
                name: "Someone".into(),
                email: email.into(),
                password: "pw".into(),
            })
            .unwrap();
        manager
            .sign_in(&Credentials {
                email: email.into(),
                password: "pw".into(),
            })
            .unwrap()
    }

    #[test]
    fn mutations_require_a_session() {
        let (mut manager, _guard) = manager();
        assert!(matches!(
            manager.create_listing(draft("Orphan")),
            Err(ServiceError::Unauthorized)
        ));
        assert!(manager.trips().is_err());
    }

    #[test]
    fn changes_survive_reopen() {
        let (mut manager, guard) = manager();
        let user = sign_up(&mut manager, "host@example.com");
        let listing = manager.create_listing(draft("Persisted")).unwrap();
        assert_eq!(manager.current_user().map(|u| u.id), Some(user.id));

        let storage = JsonStorage::new(Some(guard.path().to_path_buf())).unwrap();
        let reopened = MarketManager::open(Box::new(storage)).unwrap();
        assert_eq!(reopened.listing(listing.id).unwrap().title, "Persisted");
        assert!(reopened.current_user().is_none());
        assert!(reopened.load_warnings().is_empty());
    }

    #[test]
    fn failed_service_call_leaves_state_untouched() {
        let (mut manager, _guard) = manager();
        sign_up(&mut manager, "host@example.com");
        let before = manager.market().clone();
        let mut bad = draft("Bad");
        bad.price = 0;
        assert!(manager.create_listing(bad).is_err());
        assert_eq!(manager.market(), &before);
    }

    #[test]
    fn sign_out_clears_session() {
        let (mut manager, _guard) = manager();
        let user = sign_up(&mut manager, "host@example.com");
        assert_eq!(manager.sign_out().map(|u| u.id), Some(user.id));
        assert!(manager.sign_out().is_none());
        assert!(manager.require_user().is_err());
    }
}
