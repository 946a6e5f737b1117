pub mod json_backend;

use std::path::Path;

use crate::{domain::Market, errors::MarketError};

pub type Result<T> = std::result::Result<T, MarketError>;

/// Outcome of loading the marketplace snapshot.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub market: Market,
    pub warnings: Vec<String>,
}

/// Abstraction over persistence backends capable of storing the marketplace.
pub trait StorageBackend: Send + Sync {
    /// Loads the snapshot, or an empty marketplace when none exists yet.
    fn load(&self) -> Result<LoadReport>;
    fn save(&self, market: &Market) -> Result<()>;
    fn path(&self) -> &Path;
}

pub use json_backend::{market_warnings, JsonStorage};
