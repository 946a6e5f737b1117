use std::{
    borrow::Cow,
    fmt,
    io::{self, BufRead},
};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::Validator,
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};
use colored::Colorize;
use shell_words::split;

use crate::cli::commands::system;
use crate::cli::core::{CliError, CliMode, CommandError, LoopControl, ShellContext};
use crate::cli::output::{self, info as output_info, OutputPreferences};
use crate::domain::{Category, Location};
use crate::utils::build_info;

pub const SCRIPT_ENV: &str = "RENTAL_CORE_CLI_SCRIPT";

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };
    output::set_preferences(OutputPreferences {
        plain: mode == CliMode::Script,
        quiet: mode == CliMode::Script,
    });

    let mut context = ShellContext::new(mode)?;
    tracing::info!(
        build = %build_info::current().summary(),
        data = %context.manager.storage().path().display(),
        ?mode,
        "shell starting"
    );

    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => {
            let stdin = io::stdin();
            run_script(&mut context, stdin.lock().lines()).map(|_| ())
        }
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
    editor.set_helper(Some(CommandHelper::from_context(context)));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);

    print_banner(context);

    while context.running {
        let line = match editor.readline(&context.prompt()) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                if context.confirm_exit()? {
                    break;
                }
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        editor.add_history_entry(trimmed).ok();

        match handle_line(context, trimmed) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => context.report_error(err)?,
        }
    }

    match context.manager.current_user() {
        Some(user) => output_info(format!("Goodbye, {}.", user.name)),
        None => output_info("Goodbye."),
    }
    Ok(())
}

fn print_banner(context: &ShellContext) {
    output::section("Rental Core");
    output_info(system::market_overview(context));
    match context.manager.current_user() {
        Some(user) => output_info(format!("Signed in as {} <{}>", user.name, user.email)),
        None => output::hint("Browsing as a guest. `login` or `register` to book or host a stay."),
    }
    output_info("Type `help` to list commands, `?` completes.");
}

/// Counts for one pass over a command script.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ScriptSummary {
    pub executed: usize,
    pub failed: usize,
}

/// Runs one command per line; blank lines and `#` comments are skipped.
/// A failing command is reported and the script keeps going.
pub(crate) fn run_script<I>(context: &mut ShellContext, lines: I) -> Result<ScriptSummary, CliError>
where
    I: IntoIterator<Item = io::Result<String>>,
{
    let mut summary = ScriptSummary::default();
    for line in lines {
        if !context.running {
            break;
        }
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        summary.executed += 1;
        match handle_line(context, trimmed) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => {
                summary.failed += 1;
                tracing::debug!(line = trimmed, error = %err, "script command failed");
                context.report_error(err)?;
            }
        }
    }

    tracing::info!(
        executed = summary.executed,
        failed = summary.failed,
        listings = context.manager.market().listings.len(),
        "script finished"
    );
    if summary.failed > 0 {
        output::warning(format!(
            "{} of {} commands failed",
            summary.failed, summary.executed
        ));
    }
    Ok(summary)
}

fn handle_line(context: &mut ShellContext, line: &str) -> Result<LoopControl, CommandError> {
    let tokens = match parse_command_line(line) {
        Ok(tokens) => tokens,
        Err(err) => return Err(CommandError::InvalidArguments(err.message)),
    };
    let Some((raw, rest)) = tokens.split_first() else {
        return Ok(LoopControl::Continue);
    };

    let command = raw.to_lowercase();
    let args: Vec<&str> = rest.iter().map(String::as_str).collect();
    context.last_command = Some(line.to_string());
    tracing::debug!(%command, signed_in = context.manager.current_user().is_some(), "dispatching");

    let control = context.dispatch(&command, raw, &args)?;
    if control == LoopControl::Exit {
        context.running = false;
    }
    Ok(control)
}

/// Tab completion for command names and for `category=` / `location=` values.
struct CommandHelper {
    commands: Vec<(&'static str, &'static str)>,
}

impl CommandHelper {
    fn from_context(context: &ShellContext) -> Self {
        Self::new(
            context
                .command_names()
                .into_iter()
                .filter_map(|name| context.command(name))
                .map(|entry| (entry.name, entry.usage))
                .collect(),
        )
    }

    fn new(mut commands: Vec<(&'static str, &'static str)>) -> Self {
        commands.sort_by_key(|(name, _)| *name);
        commands.dedup_by_key(|(name, _)| *name);
        Self { commands }
    }

    fn command_candidates(&self, needle: &str) -> Vec<Pair> {
        let needle = needle.to_ascii_lowercase();
        self.commands
            .iter()
            .filter(|(name, _)| name.starts_with(&needle))
            .map(|(name, _)| Pair {
                display: name.to_string(),
                replacement: name.to_string(),
            })
            .collect()
    }

    fn value_candidates(&self, token: &str) -> Vec<Pair> {
        let Some((key, partial)) = token.split_once('=') else {
            return Vec::new();
        };
        let partial = partial.to_lowercase();
        match key {
            "category" => Category::labels()
                .into_iter()
                .filter(|label| label.to_lowercase().starts_with(&partial))
                .map(|label| Pair {
                    display: label.to_string(),
                    replacement: format!("{key}={label}"),
                })
                .collect(),
            "location" => Location::all()
                .into_iter()
                .filter(|country| {
                    country.value.to_lowercase().starts_with(&partial)
                        || country.label.to_lowercase().starts_with(&partial)
                })
                .map(|country| Pair {
                    display: format!("{} {}", country.value, country.label),
                    replacement: format!("{key}={}", country.value),
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Argument placeholders for a fully typed command name.
    fn usage_hint(&self, line: &str) -> Option<String> {
        let name = line.strip_suffix(' ')?.trim_start();
        let (_, usage) = self.commands.iter().find(|(command, _)| *command == name)?;
        usage
            .strip_prefix(name)
            .map(str::trim_start)
            .filter(|rest| !rest.is_empty())
            .map(str::to_string)
    }
}

impl Helper for CommandHelper {}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let prefix = &line[..pos];
        let start = prefix
            .rfind(char::is_whitespace)
            .map(|idx| idx + 1)
            .unwrap_or(0);
        let token = &prefix[start..];

        if prefix[..start].trim().is_empty() {
            Ok((start, self.command_candidates(token)))
        } else {
            Ok((start, self.value_candidates(token)))
        }
    }
}

impl Hinter for CommandHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &ReadlineContext<'_>) -> Option<String> {
        if pos < line.len() {
            return None;
        }
        self.usage_hint(line)
    }
}

impl Highlighter for CommandHelper {
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(hint.dimmed().to_string())
    }
}

impl Validator for CommandHelper {}

pub(crate) fn parse_command_line(input: &str) -> Result<Vec<String>, ParseError> {
    split(input).map_err(|err| ParseError {
        message: err.to_string(),
    })
}

#[derive(Debug)]
pub(crate) struct ParseError {
    message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn helper() -> CommandHelper {
        CommandHelper::new(vec![
            ("favorites", "favorites"),
            ("favorite", "favorite <listing>"),
            ("trips", "trips"),
            ("reserve", "reserve <listing> <start> <end>"),
        ])
    }

    fn script(lines: &[&str]) -> Vec<io::Result<String>> {
        lines.iter().map(|line| Ok(line.to_string())).collect()
    }

    #[test]
    fn completes_command_names_first() {
        let names: Vec<String> = helper()
            .command_candidates("FAV")
            .into_iter()
            .map(|p| p.display)
            .collect();
        assert_eq!(names, vec!["favorite", "favorites"]);
        assert!(helper().command_candidates("x").is_empty());
    }

    #[test]
    fn completes_category_and_country_values() {
        let helper = helper();
        let categories: Vec<String> = helper
            .value_candidates("category=ca")
            .into_iter()
            .map(|p| p.replacement)
            .collect();
        assert_eq!(categories, vec!["category=Castle", "category=Camping", "category=Cave"]);

        let countries = helper.value_candidates("location=portu");
        assert_eq!(countries.len(), 1);
        assert_eq!(countries[0].replacement, "location=PT");
        assert!(helper.value_candidates("title=Dun").is_empty());
        assert!(helper.value_candidates("trips").is_empty());
    }

    #[test]
    fn hints_the_arguments_of_a_typed_command() {
        let helper = helper();
        assert_eq!(
            helper.usage_hint("reserve ").as_deref(),
            Some("<listing> <start> <end>")
        );
        assert_eq!(helper.usage_hint("trips "), None);
        assert_eq!(helper.usage_hint("reserve"), None);
    }

    #[test]
    fn unbalanced_quotes_are_reported() {
        assert!(parse_command_line("rent title=\"open").is_err());
    }

    #[test]
    fn script_counts_failed_commands_and_keeps_going() {
        let dir = tempdir().unwrap();
        let mut context =
            ShellContext::with_base_dir(CliMode::Script, dir.path().to_path_buf()).unwrap();
        let summary = run_script(
            &mut context,
            script(&[
                "# guests cannot host",
                "rent category=Beach",
                "",
                "register email=host@example.com name=Host password=pw",
                "favorite nothing-here",
                "trips",
            ]),
        )
        .unwrap();
        assert_eq!(summary, ScriptSummary { executed: 4, failed: 2 });
        assert!(context.manager.current_user().is_some());
    }

    #[test]
    fn script_stops_at_exit() {
        let dir = tempdir().unwrap();
        let mut context =
            ShellContext::with_base_dir(CliMode::Script, dir.path().to_path_buf()).unwrap();
        let summary = run_script(
            &mut context,
            script(&["exit", "register email=late@example.com name=Late password=pw"]),
        )
        .unwrap();
        assert_eq!(summary.executed, 1);
        assert!(!context.running);
        assert!(context.manager.market().users.is_empty());
    }
}
