#![doc(test(attr(deny(warnings))))]

//! Rental Core is the engine behind a vacation-rental marketplace: listings,
//! accounts, favorites and reservations, plus the step wizards and modal
//! state that drive data entry from the shell front end.

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod modal;
pub mod storage;
pub mod utils;
pub mod wizard;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Rental Core tracing initialized.");
    });
}
