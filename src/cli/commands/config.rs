use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "View and manage CLI preferences",
        "config [show|set <locale|currency|last_email> <value>]",
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() || args[0].eq_ignore_ascii_case("show") {
        return show_config(context);
    }

    match args[0].to_lowercase().as_str() {
        "set" => {
            if args.len() < 3 {
                return Err(CommandError::InvalidArguments(
                    "usage: config set <locale|currency|last_email> <value>".into(),
                ));
            }
            let key = args[1];
            let value = args[2..].join(" ");
            context.config.set(key, &value)?;
            context.persist_config()?;
            io::print_success(format!("Updated `{}`.", key.to_ascii_lowercase()));
            Ok(())
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown config subcommand `{}`",
            other
        ))),
    }
}

fn show_config(context: &ShellContext) -> CommandResult {
    let config = &context.config;
    output_section("Configuration");
    io::print_info(format!("  locale     : {}", config.locale));
    io::print_info(format!(
        "  currency   : {} ({})",
        config.currency,
        config.currency_symbol()
    ));
    io::print_info(format!(
        "  last_email : {}",
        config.last_email.as_deref().unwrap_or("none")
    ));
    io::print_info(format!(
        "  file       : {}",
        context.config_manager.path().display()
    ));
    Ok(())
}
