use super::{empty_state, required_arg};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::domain::{DateRange, Identifiable, Reservation};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "reserve",
            "Reserve a listing for a date range",
            "reserve <listing-id> <start> <end>",
            cmd_reserve,
        ),
        CommandEntry::new("trips", "Where you've been and where you're going", "trips", cmd_trips),
        CommandEntry::new(
            "reservations",
            "Bookings on your properties",
            "reservations",
            cmd_reservations,
        ),
        CommandEntry::new(
            "cancel",
            "Cancel a trip or a booking on your property",
            "cancel <reservation-id>",
            cmd_cancel,
        ),
    ]
}

fn parse_range(args: &[&str]) -> Result<DateRange, CommandError> {
    match args {
        [range] => Ok(DateRange::parse(range)?),
        [start, end] => Ok(DateRange::parse(&format!("{}..{}", start, end))?),
        _ => Err(CommandError::InvalidArguments(
            "usage: reserve <listing-id> <start> <end>".into(),
        )),
    }
}

fn cmd_reserve(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let needle = required_arg(args, "reserve <listing-id> <start> <end>")?;
    let range = parse_range(&args[1..])?;
    let listing_id = context.resolve_listing(needle)?;
    let reservation = context.manager.reserve(listing_id, range)?;
    io::print_success("Listing reserved!");
    io::print_info(format!(
        "  {}  {} ({} nights)  Total: {}",
        reservation.short_id(),
        range,
        range.nights(),
        context.price(reservation.total_price)
    ));
    Ok(())
}

fn print_reservation_row(context: &ShellContext, reservation: &Reservation, show_guest: bool) {
    let market = context.manager.market();
    let title = market
        .listing(reservation.listing_id)
        .map_or("(removed listing)", |listing| listing.title.as_str());
    let mut line = format!(
        "  {}  {:<24} {}  {}",
        reservation.short_id(),
        title,
        reservation.range(),
        context.price(reservation.total_price)
    );
    if show_guest {
        if let Some(guest) = market.user(reservation.user_id) {
            line.push_str(&format!("  guest: {}", guest.name));
        }
    }
    io::print_info(line);
}

fn cmd_trips(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let trips = context.manager.trips()?;
    output_section("Trips");
    io::print_info("Where you've been and where you're going");
    if trips.is_empty() {
        empty_state("No trips found", "You have no upcoming trips");
        return Ok(());
    }
    for reservation in trips {
        print_reservation_row(context, reservation, false);
    }
    Ok(())
}

fn cmd_reservations(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let reservations = context.manager.host_reservations()?;
    output_section("Reservations");
    io::print_info("Bookings on your properties");
    if reservations.is_empty() {
        empty_state("No reservations found", "Looks like you have no reservations on your properties");
        return Ok(());
    }
    for reservation in reservations {
        print_reservation_row(context, reservation, true);
    }
    Ok(())
}

fn cmd_cancel(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let needle = required_arg(args, "cancel <reservation-id>")?;
    context.manager.require_user()?;
    let id = context.resolve_reservation(needle)?;
    let removed = context.manager.cancel_reservation(id)?;
    io::print_success("Reservation cancelled");
    let still_blocked = context.manager.disabled_dates(removed.listing_id).len();
    tracing::debug!(reservation = %removed.id, still_blocked, "dates released");
    Ok(())
}
