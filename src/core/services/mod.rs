pub mod account_service;
pub mod favorite_service;
pub mod listing_service;
pub mod reservation_service;

pub use account_service::AccountService;
pub use favorite_service::FavoriteService;
pub use listing_service::ListingService;
pub use reservation_service::ReservationService;

use crate::errors::MarketError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Market(#[from] MarketError),
    #[error("{0}")]
    Invalid(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Please login to proceed")]
    Unauthorized,
    #[error("{0}")]
    Forbidden(String),
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::NaiveDate;
    use uuid::Uuid;

    use crate::domain::{ListingDraft, Market, User};

    pub fn date(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
    }

    pub fn draft(title: &str) -> ListingDraft {
        ListingDraft {
            category: "Beach".into(),
            location_value: "PT".into(),
            guest_count: 4,
            room_count: 2,
            bathroom_count: 1,
            image_src: "https://img.example.com/beach.jpg".into(),
            title: title.into(),
            description: "Steps from the sand".into(),
            price: 100,
        }
    }

    pub fn add_user(market: &mut Market, name: &str) -> Uuid {
        let user = User::new(name, format!("{}@example.com", name.to_lowercase()), "hash");
        let id = user.id;
        market.users.push(user);
        id
    }
}
