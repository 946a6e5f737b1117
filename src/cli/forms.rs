//! Drives a [`StepWizard`] from the shell, interactively or from `key=value` arguments.

use std::collections::BTreeMap;

use dialoguer::theme::ColorfulTheme;

use crate::cli::core::{CliMode, CommandError};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::domain::Category;
use crate::wizard::{
    FieldKind, FieldSpec, StepWizard, SubmitOutcome, Transition, WizardHost, WizardStep,
};

/// High-level lifecycle states emitted by the form runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormResult<T> {
    Completed(T),
    Cancelled,
}

/// Describes how prompts can be answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptResponse {
    /// User supplied a concrete value.
    Value(String),
    /// Keep whatever the field already holds.
    Keep,
    /// Go back to the previous step.
    Back,
    /// Abort the wizard.
    Cancel,
}

/// What the step header shows.
pub struct StepView {
    pub heading: &'static str,
    pub subtitle: Option<&'static str>,
    pub index: usize,
    pub total: usize,
    pub action_label: &'static str,
    pub secondary_label: Option<String>,
}

pub struct PromptContext<'a> {
    pub spec: &'a FieldSpec,
    /// Current value, rendered the way it would be typed.
    pub current: Option<String>,
    pub step_index: usize,
}

pub trait StepInteraction {
    fn begin_step(&mut self, view: &StepView);

    fn prompt_field(&mut self, context: &PromptContext<'_>) -> PromptResponse;

    /// Shows a rejection. Returns `true` to ask again, `false` to give up.
    fn reject(&mut self, message: &str) -> bool;
}

/// Runs `wizard` until it submits, is cancelled, or the interaction gives up.
pub fn run_wizard<S, H, I>(
    wizard: &mut StepWizard<S>,
    host: &mut H,
    interaction: &mut I,
) -> Result<FormResult<H::Entity>, CommandError>
where
    S: WizardStep,
    H: WizardHost,
    I: StepInteraction,
{
    'steps: loop {
        let step = wizard.current_step();
        interaction.begin_step(&StepView {
            heading: step.heading(),
            subtitle: step.subtitle(),
            index: wizard.step_index(),
            total: wizard.step_count(),
            action_label: wizard.action_label(),
            secondary_label: wizard.secondary_label(),
        });

        for spec in step.fields() {
            loop {
                let context = PromptContext {
                    spec,
                    current: wizard.fields().get(spec.key).map(|value| value.to_input()),
                    step_index: wizard.step_index(),
                };
                match interaction.prompt_field(&context) {
                    PromptResponse::Keep => break,
                    PromptResponse::Value(raw) => match spec.parse(&raw) {
                        Ok(value) => {
                            wizard.set_field(spec.key, value);
                            break;
                        }
                        Err(err) => {
                            if !interaction.reject(&err.to_string()) {
                                wizard.cancel(host);
                                return Err(CommandError::InvalidArguments(err.to_string()));
                            }
                        }
                    },
                    PromptResponse::Back => match wizard.retreat(host) {
                        Transition::Closed => return Ok(FormResult::Cancelled),
                        _ => continue 'steps,
                    },
                    PromptResponse::Cancel => {
                        wizard.cancel(host);
                        return Ok(FormResult::Cancelled);
                    }
                }
            }
        }

        match wizard.advance(host) {
            Transition::Moved(_) => {}
            Transition::Blocked => {
                let message = missing_message(step);
                if !interaction.reject(&message) {
                    wizard.cancel(host);
                    return Err(CommandError::InvalidArguments(message));
                }
            }
            Transition::Closed => return Ok(FormResult::Cancelled),
            Transition::Submitted(SubmitOutcome::Completed(entity)) => {
                return Ok(FormResult::Completed(entity));
            }
            Transition::Submitted(SubmitOutcome::Failed(err)) => {
                if !interaction.reject(&err.to_string()) {
                    wizard.cancel(host);
                    return Err(CommandError::Message(err.to_string()));
                }
            }
            Transition::Busy | Transition::Submitted(SubmitOutcome::Busy | SubmitOutcome::Stale) => {
                return Err(CommandError::Message("A submission is already in progress".into()));
            }
        }
    }
}

/// Picks the interaction for the shell mode: `key=value` arguments or a
/// script always run scripted, otherwise the user is prompted.
pub fn drive<S, H>(
    mode: CliMode,
    theme: &ColorfulTheme,
    wizard: &mut StepWizard<S>,
    host: &mut H,
    args: &[&str],
) -> Result<FormResult<H::Entity>, CommandError>
where
    S: WizardStep,
    H: WizardHost,
{
    if mode == CliMode::Script || !args.is_empty() {
        let mut interaction = ScriptedInteraction::from_args::<S>(args)?;
        run_wizard(wizard, host, &mut interaction)
    } else {
        let mut interaction = DialoguerInteraction::new(theme);
        run_wizard(wizard, host, &mut interaction)
    }
}

fn missing_message<S: WizardStep>(step: S) -> String {
    let labels: Vec<&str> = step.fields().iter().map(|spec| spec.label).collect();
    format!("{}: please provide {}", step.heading(), labels.join(", ").to_lowercase())
}

/// Prompts with dialoguer. `:back` and `:cancel` navigate.
pub struct DialoguerInteraction<'a> {
    theme: &'a ColorfulTheme,
}

impl<'a> DialoguerInteraction<'a> {
    pub fn new(theme: &'a ColorfulTheme) -> Self {
        Self { theme }
    }

    fn prompt_category(&self, context: &PromptContext<'_>) -> PromptResponse {
        let labels = Category::labels();
        let initial = context
            .current
            .as_deref()
            .and_then(|current| labels.iter().position(|label| *label == current))
            .unwrap_or(0);
        match io::select_option(self.theme, context.spec.label, &labels, initial) {
            Ok(Some(index)) => PromptResponse::Value(labels[index].to_string()),
            Ok(None) if context.step_index > 0 => PromptResponse::Back,
            _ => PromptResponse::Cancel,
        }
    }
}

impl StepInteraction for DialoguerInteraction<'_> {
    fn begin_step(&mut self, view: &StepView) {
        output_section(format!("Step {} of {}: {}", view.index + 1, view.total, view.heading));
        if let Some(subtitle) = view.subtitle {
            io::print_info(subtitle);
        }
        let mut keys = vec![format!("Enter continues ({})", view.action_label)];
        if let Some(back) = &view.secondary_label {
            keys.push(format!(":back ({})", back));
        }
        keys.push(":cancel closes".into());
        io::print_hint(keys.join(" | "));
    }

    fn prompt_field(&mut self, context: &PromptContext<'_>) -> PromptResponse {
        if context.spec.kind == FieldKind::Category {
            return self.prompt_category(context);
        }
        if let Some(help) = context.spec.help {
            io::print_hint(help);
        }
        let answer = if context.spec.kind == FieldKind::Secret {
            io::prompt_secret(self.theme, context.spec.label)
        } else {
            io::prompt_text(self.theme, context.spec.label, context.current.as_deref())
        };
        match answer {
            Ok(raw) => match raw.trim() {
                ":back" => PromptResponse::Back,
                ":cancel" => PromptResponse::Cancel,
                "" if context.current.is_some() => PromptResponse::Keep,
                _ => PromptResponse::Value(raw),
            },
            Err(_) => PromptResponse::Cancel,
        }
    }

    fn reject(&mut self, message: &str) -> bool {
        io::print_warning(message);
        true
    }
}

/// Answers prompts from `key=value` arguments and never retries.
#[derive(Debug, Default)]
pub struct ScriptedInteraction {
    values: BTreeMap<String, String>,
}

impl ScriptedInteraction {
    /// Accepts only keys some step of `S` collects.
    pub fn from_args<S: WizardStep>(args: &[&str]) -> Result<Self, CommandError> {
        let mut values = BTreeMap::new();
        for arg in args {
            let (key, value) = arg.split_once('=').ok_or_else(|| {
                CommandError::InvalidArguments(format!("expected key=value, got `{}`", arg))
            })?;
            let known = S::SEQUENCE
                .iter()
                .flat_map(|step| step.fields())
                .any(|spec| spec.key == key);
            if !known {
                return Err(CommandError::InvalidArguments(format!(
                    "unknown field `{}` (expected one of: {})",
                    key,
                    field_keys::<S>().join(", ")
                )));
            }
            values.insert(key.to_string(), value.to_string());
        }
        Ok(Self { values })
    }
}

/// Every key collected by the steps of `S`, in prompt order.
pub fn field_keys<S: WizardStep>() -> Vec<&'static str> {
    S::SEQUENCE
        .iter()
        .flat_map(|step| step.fields())
        .map(|spec| spec.key)
        .collect()
}

impl StepInteraction for ScriptedInteraction {
    fn begin_step(&mut self, view: &StepView) {
        tracing::debug!(step = view.index, heading = view.heading, "scripted step");
    }

    fn prompt_field(&mut self, context: &PromptContext<'_>) -> PromptResponse {
        match self.values.remove(context.spec.key) {
            Some(raw) => PromptResponse::Value(raw),
            None => PromptResponse::Keep,
        }
    }

    fn reject(&mut self, _message: &str) -> bool {
        false
    }
}
