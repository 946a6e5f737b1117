//! Core CLI loop, dispatch, and shell context helpers.

use std::{io, path::PathBuf};

use dialoguer::theme::ColorfulTheme;
use strsim::levenshtein;
use uuid::Uuid;

use crate::{
    config::{Config, ConfigError, ConfigManager},
    core::{services::ServiceError, MarketManager},
    domain::{DateRangeError, ListingQuery, QueryError},
    errors::MarketError,
    modal::Modals,
    storage::JsonStorage,
    utils::PathResolver,
};

pub use crate::errors::CliError;

use super::commands;
use super::io as cli_io;
use super::registry::{CommandEntry, CommandRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub manager: MarketManager,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub theme: ColorfulTheme,
    /// Filters of the last `listings` or `search`.
    pub query: ListingQuery,
    pub modals: Modals,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_base_dir(mode, PathResolver::base_dir())
    }

    pub fn with_base_dir(mode: CliMode, base: PathBuf) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let storage = JsonStorage::new(Some(base.clone()))?;
        let manager = MarketManager::open(Box::new(storage))?;
        let config_manager = ConfigManager::with_base_dir(base)?;
        let config = config_manager.load()?;

        for warning in manager.load_warnings() {
            cli_io::print_warning(warning);
        }

        Ok(Self {
            mode,
            registry,
            manager,
            config_manager,
            config,
            theme: ColorfulTheme::default(),
            query: ListingQuery::default(),
            modals: Modals::default(),
            last_command: None,
            running: true,
        })
    }

    pub fn can_prompt(&self) -> bool {
        self.mode == CliMode::Interactive
    }

    pub fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub fn prompt(&self) -> String {
        match self.manager.current_user() {
            Some(user) => format!("rental({})> ", user.email),
            None => "rental> ".to_string(),
        }
    }

    pub(crate) fn persist_config(&self) -> CommandResult {
        self.config_manager
            .save(&self.config)
            .map_err(CommandError::from)
    }

    /// Remembers the email of the account that just signed in.
    pub(crate) fn remember_email(&mut self, email: &str) -> CommandResult {
        if self.config.last_email.as_deref() == Some(email) {
            return Ok(());
        }
        self.config.last_email = Some(email.to_string());
        self.persist_config()
    }

    pub(crate) fn resolve_listing(&self, needle: &str) -> Result<Uuid, CommandError> {
        self.manager.resolve_listing(needle).map_err(|_| {
            CommandError::InvalidArguments(format!("no listing matches `{}`", needle))
        })
    }

    pub(crate) fn resolve_reservation(&self, needle: &str) -> Result<Uuid, CommandError> {
        self.manager.resolve_reservation(needle).map_err(|_| {
            CommandError::InvalidArguments(format!("no reservation matches `{}`", needle))
        })
    }

    pub(crate) fn price(&self, amount: u64) -> String {
        self.config.format_price(amount)
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    #[cfg(test)]
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match crate::cli::shell::parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                cli_io::print_warning(err);
                return Ok(LoopControl::Continue);
            }
        };

        if tokens.is_empty() {
            return Ok(LoopControl::Continue);
        }

        let command = tokens[0].to_lowercase();
        let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();
        self.dispatch(&command, &tokens[0], &args)
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let needle = input.to_lowercase();
        let best = self
            .registry
            .names()
            .map(|key| (levenshtein(key, &needle), key))
            .min_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = best {
            if distance <= 3 {
                cli_io::print_info(format!("Suggestion: `{}`?", best));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, "Exit shell?", true).map_err(CliError::from)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(message);
                cli_io::print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::Unauthorized => {
                cli_io::print_error("Unauthorized: Please login to proceed");
                cli_io::print_hint("Use `login` or `register` first.");
                Ok(())
            }
            other => {
                cli_io::print_error(other);
                Ok(())
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Please login to proceed")]
    Unauthorized,
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Core(#[from] MarketError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<ServiceError> for CommandError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Market(inner) => CommandError::Core(inner),
            ServiceError::Unauthorized => CommandError::Unauthorized,
            ServiceError::Invalid(message) => CommandError::InvalidArguments(message),
            other => CommandError::Message(other.to_string()),
        }
    }
}

impl From<QueryError> for CommandError {
    fn from(err: QueryError) -> Self {
        CommandError::InvalidArguments(err.to_string())
    }
}

impl From<DateRangeError> for CommandError {
    fn from(err: DateRangeError) -> Self {
        CommandError::InvalidArguments(err.to_string())
    }
}

impl From<ConfigError> for CommandError {
    fn from(err: ConfigError) -> Self {
        CommandError::InvalidArguments(err.to_string())
    }
}

impl From<CliError> for CommandError {
    fn from(err: CliError) -> Self {
        match err {
            CliError::Core(inner) => CommandError::Core(inner),
            CliError::Input(message) | CliError::Command(message) => {
                CommandError::InvalidArguments(message)
            }
        }
    }
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}

#[cfg(test)]
pub(crate) fn process_script(
    base: &std::path::Path,
    lines: &[&str],
) -> Result<ShellContext, CliError> {
    let mut app = ShellContext::with_base_dir(CliMode::Script, base.to_path_buf())?;
    for line in lines {
        match app.process_line(line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => app.report_error(err)?,
        }
    }
    Ok(app)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SIGN_UP: &str = "register email=host@example.com name=Host password=pw";
    const RENT: &str = "rent category=Beach location=PT guest_count=4 room_count=2 \
        image_src=https://img.example/a.jpg title=\"Sea Breeze\" description=\"By the dunes\" price=120";

    #[test]
    fn parse_line_handles_quotes() {
        let tokens =
            crate::cli::shell::parse_command_line("rent title=\"Sea Breeze\" price=90").unwrap();
        assert_eq!(tokens, vec!["rent", "title=Sea Breeze", "price=90"]);
    }

    #[test]
    fn script_runner_registers_and_creates_a_listing() {
        let dir = tempdir().unwrap();
        let context = process_script(dir.path(), &[SIGN_UP, RENT, "exit"]).unwrap();
        let user = context.manager.current_user().expect("signed in");
        assert_eq!(user.email, "host@example.com");
        let listings = &context.manager.market().listings;
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].title, "Sea Breeze");
        assert_eq!(listings[0].owner_id, user.id);
        assert_eq!(context.config.last_email.as_deref(), Some("host@example.com"));
        assert!(context.modals.open_names().is_empty());
    }

    #[test]
    fn rent_requires_a_session() {
        let dir = tempdir().unwrap();
        let context = process_script(dir.path(), &[RENT]).unwrap();
        assert!(context.manager.market().listings.is_empty());
        assert!(!context.modals.rent.is_open());
    }

    #[test]
    fn search_merges_onto_current_filters() {
        let dir = tempdir().unwrap();
        let context = process_script(
            dir.path(),
            &[
                "listings category=beach",
                "search location=PT dates=2025-07-01..2025-07-04 guest_count=3",
            ],
        )
        .unwrap();
        assert_eq!(context.query.category.as_deref(), Some("Beach"));
        assert_eq!(context.query.location_value.as_deref(), Some("PT"));
        assert_eq!(context.query.guest_count, Some(3));
        assert!(!context.modals.search.is_open());
    }

    #[test]
    fn property_delete_needs_confirmation_in_scripts() {
        let dir = tempdir().unwrap();
        let mut context = process_script(dir.path(), &[SIGN_UP, RENT]).unwrap();
        let id = context.manager.market().listings[0].id;
        let short = crate::domain::short_id(id);

        let result = context.process_line(&format!("property delete {}", short));
        assert!(matches!(result, Err(CommandError::InvalidArguments(_))));
        assert_eq!(context.manager.market().listings.len(), 1);
        assert!(!context.modals.delete.is_open());

        context
            .process_line(&format!("property delete {} --yes", short))
            .unwrap();
        assert!(context.manager.market().listings.is_empty());
    }

    #[test]
    fn unknown_command_is_not_an_error() {
        let dir = tempdir().unwrap();
        let mut context = ShellContext::with_base_dir(CliMode::Script, dir.path().to_path_buf()).unwrap();
        assert_eq!(context.process_line("trps").unwrap(), LoopControl::Continue);
        assert_eq!(context.process_line("exit").unwrap(), LoopControl::Exit);
    }
}
