use super::{empty_state, listing::print_listing_row, required_arg};
use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "favorite",
            "Add or remove a listing from your favorites",
            "favorite <listing-id>",
            cmd_favorite,
        ),
        CommandEntry::new("favorites", "List your favorite places", "favorites", cmd_favorites),
    ]
}

fn cmd_favorite(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let needle = required_arg(args, "favorite <listing-id>")?;
    context.manager.require_user()?;
    let id = context.resolve_listing(needle)?;
    let now_favorite = context.manager.toggle_favorite(id)?;
    let title = context.manager.listing(id)?.title.clone();
    if now_favorite {
        io::print_success(format!("Added `{}` to favorites", title));
    } else {
        io::print_success(format!("Removed `{}` from favorites", title));
    }
    Ok(())
}

fn cmd_favorites(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let favorites = context.manager.favorites()?;
    output_section("Favorites");
    io::print_info("List of places you favorited!");
    if favorites.is_empty() {
        empty_state("No favorites found", "You have no favorite listings");
        return Ok(());
    }
    for listing in favorites {
        print_listing_row(context, listing);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::cli::core::process_script;
    use tempfile::tempdir;

    #[test]
    fn favorite_toggles_membership() {
        let dir = tempdir().unwrap();
        let mut context = process_script(
            dir.path(),
            &[
                "register email=host@example.com name=Host password=pw",
                "rent category=Ski location=CH image_src=https://img.example/ski.jpg \
                 title=Chalet description=Snowy price=200",
            ],
        )
        .unwrap();
        let id = context.manager.market().listings[0].id;
        let line = format!("favorite {}", id);

        context.process_line(&line).unwrap();
        assert!(context.manager.current_user().unwrap().has_favorite(id));
        context.process_line(&line).unwrap();
        assert!(!context.manager.current_user().unwrap().has_favorite(id));
    }

    #[test]
    fn favorites_need_a_session() {
        let dir = tempdir().unwrap();
        let mut context = process_script(dir.path(), &[]).unwrap();
        assert!(context.process_line("favorites").is_err());
    }
}
