pub mod account;
pub mod config;
pub mod favorite;
pub mod listing;
pub mod reservation;
pub mod system;

use crate::cli::core::CommandError;
use crate::cli::registry::CommandRegistry;

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    let groups = [
        system::definitions(),
        config::definitions(),
        account::definitions(),
        listing::definitions(),
        favorite::definitions(),
        reservation::definitions(),
    ];
    for entry in groups.into_iter().flatten() {
        registry.register(entry);
    }
}

/// The first argument, or a usage error.
pub(crate) fn required_arg<'a>(args: &[&'a str], usage: &str) -> Result<&'a str, CommandError> {
    args.first()
        .copied()
        .ok_or_else(|| CommandError::InvalidArguments(format!("usage: {}", usage)))
}

/// Prints a page-level empty state.
pub(crate) fn empty_state(title: &str, subtitle: &str) {
    crate::cli::io::print_info(format!("{} - {}", title, subtitle));
}
