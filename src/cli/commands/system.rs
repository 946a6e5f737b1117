use std::collections::BTreeSet;

use chrono::Local;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::help;
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::domain::CURRENT_SCHEMA_VERSION;
use crate::utils::build_info;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "version",
            "Show build metadata and marketplace totals",
            "version",
            cmd_version,
        ),
        CommandEntry::new(
            "help",
            "Show available commands",
            "help [command]",
            cmd_help,
        ),
        CommandEntry::new("exit", "Exit the shell", "exit", cmd_exit),
    ]
}

/// One-line size of the marketplace, e.g. `3 listings in 2 countries, 1 upcoming stay`.
pub(crate) fn market_overview(context: &ShellContext) -> String {
    let market = context.manager.market();
    let countries: BTreeSet<&str> = market
        .listings
        .iter()
        .map(|listing| listing.location_value.as_str())
        .collect();
    let today = Local::now().date_naive();
    let upcoming = market
        .reservations
        .iter()
        .filter(|reservation| reservation.end_date >= today)
        .count();
    format!(
        "{} in {}, {}",
        plural(market.listings.len(), "listing"),
        plural(countries.len(), "country"),
        plural(upcoming, "upcoming stay")
    )
}

fn plural(count: usize, noun: &str) -> String {
    match (count, noun.strip_suffix('y')) {
        (1, _) => format!("1 {noun}"),
        (_, Some(stem)) if !noun.ends_with("ay") => format!("{count} {stem}ies"),
        _ => format!("{count} {noun}s"),
    }
}

fn cmd_version(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output_section(format!("Rental Core {}", meta.version));
    io::print_info(format!("  Marketplace  : {}", market_overview(context)));
    io::print_info(format!(
        "  Accounts     : {}",
        context.manager.market().users.len()
    ));
    match context.manager.current_user() {
        Some(user) => io::print_info(format!("  Signed in    : {}", user.email)),
        None => io::print_info("  Signed in    : no"),
    }
    io::print_info(format!(
        "  Data file    : {} (schema v{})",
        context.manager.storage().path().display(),
        CURRENT_SCHEMA_VERSION
    ));
    io::print_info(format!(
        "  Currency     : {} ({})",
        context.config.currency,
        context.config.currency_symbol()
    ));
    io::print_info(format!("  CLI version  : {}", build_info::CLI_VERSION));
    io::print_info(format!(
        "  Build        : {} ({}) {} {}",
        meta.git_hash, meta.git_status, meta.target, meta.profile
    ));
    io::print_info(format!("  Built at     : {} with {}", meta.timestamp, meta.rustc));
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(command) = args.first().map(|name| name.to_lowercase()) {
        if let Some(command) = context.command(&command) {
            help::print_command(command);
        } else {
            context.suggest_command(args[0]);
        }
        return Ok(());
    }

    help::print_overview(&context.registry);
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
