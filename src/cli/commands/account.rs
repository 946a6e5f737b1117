use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::forms::{self, FormResult};
use crate::cli::io;
use crate::cli::registry::CommandEntry;
use crate::core::hosts::{LoginHost, RegisterHost};
use crate::domain::Displayable;
use crate::wizard::auth::{LoginStep, LoginWizard, RegisterWizard, EMAIL};
use crate::wizard::{FieldValue, WizardStep};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "register",
            "Create an account and sign in",
            "register [email=<email> name=<name> password=<password>]",
            cmd_register,
        ),
        CommandEntry::new(
            "login",
            "Sign in to an existing account",
            "login [email=<email> password=<password>]",
            cmd_login,
        ),
        CommandEntry::new("logout", "Sign out", "logout", cmd_logout),
        CommandEntry::new("whoami", "Show the signed-in account", "whoami", cmd_whoami),
    ]
}

fn cmd_register(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    context.modals.open_register();
    let mut wizard = RegisterWizard::new();
    let mut host = RegisterHost::new(&mut context.manager);
    let result = forms::drive(context.mode, &context.theme, &mut wizard, &mut host, args);
    context.modals.close_register();

    match result? {
        FormResult::Completed(user) => {
            context.remember_email(&user.email)?;
            io::print_success(format!("Account created. Signed in as {}.", user.display_label()));
        }
        FormResult::Cancelled => {
            io::print_info("Operation cancelled.");
            io::print_hint("Already have an account? Use `login`.");
        }
    }
    Ok(())
}

fn cmd_login(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    context.modals.open_login();
    let mut fields = LoginStep::defaults();
    if let Some(email) = &context.config.last_email {
        fields.set(EMAIL, FieldValue::Text(email.clone()));
    }
    let mut wizard = LoginWizard::with_fields(None, fields);
    let mut host = LoginHost::new(&mut context.manager);
    let result = forms::drive(context.mode, &context.theme, &mut wizard, &mut host, args);
    context.modals.close_login();

    match result? {
        FormResult::Completed(user) => {
            context.remember_email(&user.email)?;
            io::print_success("Logged in");
            io::print_info(format!("Welcome back, {}.", user.name));
        }
        FormResult::Cancelled => {
            io::print_info("Operation cancelled.");
            io::print_hint("First time here? Use `register` to create an account.");
        }
    }
    Ok(())
}

fn cmd_logout(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    match context.manager.sign_out() {
        Some(user) => io::print_success(format!("Signed out {}.", user.email)),
        None => io::print_info("Nobody is signed in."),
    }
    Ok(())
}

fn cmd_whoami(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    match context.manager.current_user() {
        Some(user) => {
            io::print_info(user.display_label());
            io::print_info(format!("  Favorites: {}", user.favorite_ids.len()));
        }
        None => io::print_info("Not signed in."),
    }
    Ok(())
}
