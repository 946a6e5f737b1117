use uuid::Uuid;

use super::{empty_state, required_arg};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::forms::{self, FormResult};
use crate::cli::io;
use crate::cli::output::{self, section as output_section};
use crate::cli::registry::CommandEntry;
use crate::core::hosts::{ListingHost, SearchHost};
use crate::domain::{Category, Identifiable, Listing, ListingQuery, CATEGORIES};
use crate::modal::DeleteConfirmation;
use crate::wizard::listing::ListingWizard;
use crate::wizard::search::SearchWizard;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "listings",
            "Browse listings; filters replace the current ones",
            "listings [category=<c>] [location=<country>] [guests=<n>] [rooms=<n>] [bathrooms=<n>] [start=<date>] [end=<date>]",
            cmd_listings,
        ),
        CommandEntry::new("listing", "Show one listing", "listing <id>", cmd_listing),
        CommandEntry::new(
            "search",
            "Refine the current filters with the search wizard",
            "search [location=<country>] [dates=<start>..<end>] [guest_count=<n>] [room_count=<n>] [bathroom_count=<n>]",
            cmd_search,
        ),
        CommandEntry::new("categories", "List listing categories", "categories", cmd_categories),
        CommandEntry::new(
            "rent",
            "Put your home on the market",
            "rent [category=<c> location=<country> guest_count=<n> room_count=<n> bathroom_count=<n> image_src=<url> title=<t> description=<d> price=<n>]",
            cmd_rent,
        ),
        CommandEntry::new("properties", "List your properties", "properties", cmd_properties),
        CommandEntry::new(
            "property",
            "Edit or delete one of your properties",
            "property <edit <id> [field=value...]|delete <id> [--yes]>",
            cmd_property,
        ),
    ]
}

/// One-line summary used by every listing table.
pub(crate) fn print_listing_row(context: &ShellContext, listing: &Listing) {
    let place = listing
        .location()
        .map(|location| format!("{}, {}", location.region, location.label))
        .unwrap_or_else(|| listing.location_value.clone());
    let favorite = context
        .manager
        .current_user()
        .map_or(false, |user| user.has_favorite(listing.id));
    io::print_info(format!(
        "  {}  {:<24} {:<28} {:<12} {} night{}",
        listing.short_id(),
        listing.title,
        place,
        listing.category,
        context.price(u64::from(listing.price)),
        if favorite { "  [fav]" } else { "" }
    ));
}

fn show_listings(context: &ShellContext) {
    output_section("Listings");
    if !context.query.is_empty() {
        io::print_info(format!("Filters: {}", context.query.to_query_string()));
    }
    let results = context.manager.listings(&context.query);
    if results.is_empty() {
        empty_state("No exact matches", "go easy on the filter");
        if !context.query.is_empty() {
            io::print_hint("Use `listings` without filters to remove all filters.");
        }
        return;
    }
    for listing in results {
        print_listing_row(context, listing);
    }
}

fn cmd_listings(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    context.query = ListingQuery::from_args(args)?;
    show_listings(context);
    Ok(())
}

fn cmd_listing(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let needle = required_arg(args, "listing <id>")?;
    let Ok(id) = context.manager.resolve_listing(needle) else {
        empty_state(
            "No listing matched",
            "It might be temporarily unavailable, we will let you know when its back",
        );
        return Ok(());
    };
    let listing = context.manager.listing(id)?;

    output_section(&listing.title);
    if let Some(location) = listing.location() {
        io::print_info(format!("  {}", location));
    }
    if let Some(host) = context.manager.market().user(listing.owner_id) {
        io::print_info(format!("  Hosted by {}", host.name));
    }
    io::print_info(format!(
        "  {} guests  {} rooms  {} bathrooms",
        listing.guest_count, listing.room_count, listing.bathroom_count
    ));
    if let Some(category) = Category::find(&listing.category) {
        io::print_info(format!("  {}: {}", category.label, category.description));
    }
    io::print_info(format!("  {}", listing.description));
    io::print_info(format!("  Photo: {}", listing.image_src));
    io::print_info(format!("  {} night", context.price(u64::from(listing.price))));

    output::separator();
    let booked: Vec<String> = context
        .manager
        .market()
        .reservations_for_listing(listing.id)
        .map(|reservation| reservation.range().to_string())
        .collect();
    if booked.is_empty() {
        io::print_info("  Available on every date.");
    } else {
        io::print_info(format!("  Unavailable: {}", booked.join("; ")));
    }
    io::print_hint(format!(
        "Use `reserve {} <start> <end>` to book.",
        listing.short_id()
    ));
    Ok(())
}

fn cmd_search(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    context.modals.search.open(());
    let mut wizard = SearchWizard::from_query(&context.query);
    let mut host = SearchHost::new(context.query.clone());
    let result = forms::drive(context.mode, &context.theme, &mut wizard, &mut host, args);
    context.modals.search.close();

    match result? {
        FormResult::Completed(query) => {
            context.query = query;
            show_listings(context);
        }
        FormResult::Cancelled => io::print_info("Search cancelled."),
    }
    Ok(())
}

fn cmd_categories(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output_section("Categories");
    let selected = context.query.category.as_deref();
    for category in CATEGORIES.iter() {
        let marker = if selected == Some(category.label) { "*" } else { " " };
        io::print_info(format!(
            "{} {:<12} {}",
            marker, category.label, category.description
        ));
    }
    io::print_hint("Use `listings category=<label>` to filter.");
    Ok(())
}

fn cmd_rent(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    context.manager.require_user()?;
    context.modals.rent.open(None);
    let mut wizard = ListingWizard::new();
    let mut host = ListingHost::new(&mut context.manager);
    let result = forms::drive(context.mode, &context.theme, &mut wizard, &mut host, args);
    context.modals.rent.close();

    match result? {
        FormResult::Completed(listing) => {
            io::print_success("Listing Created!");
            io::print_info(format!("  {} {}", listing.short_id(), listing.title));
        }
        FormResult::Cancelled => io::print_info("Operation cancelled."),
    }
    Ok(())
}

fn cmd_properties(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let properties = context.manager.properties()?;
    output_section("Properties");
    io::print_info("List of your properties");
    if properties.is_empty() {
        empty_state("No properties found", "You have no properties listing with us");
        return Ok(());
    }
    for listing in properties {
        print_listing_row(context, listing);
    }
    Ok(())
}

fn cmd_property(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    const USAGE: &str = "property <edit|delete> <id>";
    let action = required_arg(args, USAGE)?;
    let needle = required_arg(&args[1..], USAGE)?;
    let id = context.resolve_listing(needle)?;
    let user = context.manager.require_user()?.id;
    let listing = context.manager.listing(id)?.clone();
    if !listing.is_owned_by(user) {
        return Err(CommandError::InvalidArguments(format!(
            "`{}` is not one of your properties",
            listing.title
        )));
    }

    match action.to_lowercase().as_str() {
        "edit" => edit_property(context, &listing, &args[2..]),
        "delete" => {
            let confirmed = args[2..].iter().any(|arg| *arg == "--yes");
            delete_property(context, &listing, confirmed)
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown property subcommand `{}`",
            other
        ))),
    }
}

fn edit_property(context: &mut ShellContext, listing: &Listing, args: &[&str]) -> CommandResult {
    context.modals.rent.open(Some(listing.id));
    let mut wizard = ListingWizard::for_listing(listing);
    let mut host = ListingHost::new(&mut context.manager);
    let result = forms::drive(context.mode, &context.theme, &mut wizard, &mut host, args);
    context.modals.rent.close();

    match result? {
        FormResult::Completed(_) => io::print_success("Property Details Updated!"),
        FormResult::Cancelled => io::print_info("Operation cancelled."),
    }
    Ok(())
}

fn delete_property(context: &mut ShellContext, listing: &Listing, confirmed: bool) -> CommandResult {
    let dialog = DeleteConfirmation::new(listing.title.clone());
    output_section(dialog.heading());
    io::print_warning(DeleteConfirmation::BODY);
    context.modals.delete.open((listing.id, dialog));

    let decision = confirm_delete(context, confirmed);
    let Some((id, _)) = context.modals.delete.close() else {
        return Ok(());
    };
    if !decision? {
        io::print_info(format!("{}: nothing was deleted.", DeleteConfirmation::CANCEL_LABEL));
        return Ok(());
    }
    delete_listing(context, id)
}

fn confirm_delete(context: &ShellContext, confirmed: bool) -> Result<bool, CommandError> {
    if confirmed {
        return Ok(true);
    }
    if !context.can_prompt() {
        return Err(CommandError::InvalidArguments(
            "property delete needs --yes when not running interactively".into(),
        ));
    }
    io::confirm_action(&context.theme, DeleteConfirmation::CONFIRM_LABEL, false)
}

fn delete_listing(context: &mut ShellContext, id: Uuid) -> CommandResult {
    let removed = context.manager.delete_listing(id)?;
    io::print_success("Listing deleted");
    tracing::info!(listing = %removed.id, "listing deleted from shell");
    Ok(())
}
