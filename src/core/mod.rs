pub mod hosts;
pub mod market_manager;
pub mod services;

pub use market_manager::MarketManager;
