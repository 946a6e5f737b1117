pub mod category;
pub mod common;
pub mod listing;
pub mod location;
pub mod market;
pub mod query;
pub mod reservation;
pub mod user;

pub use category::{Category, CATEGORIES};
pub use common::{short_id, Displayable, Identifiable, NamedEntity};
pub use listing::{Listing, ListingDraft};
pub use location::Location;
pub use market::{Market, CURRENT_SCHEMA_VERSION};
pub use query::{ListingQuery, QueryError};
pub use reservation::{DateRange, DateRangeError, Reservation};
pub use user::{Credentials, Registration, User};
