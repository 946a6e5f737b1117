//! Single-step login and sign-up forms.

use crate::domain::{Credentials, Registration};

use super::{FieldError, FieldKind, FieldMap, FieldSpec, StepWizard, WizardStep};

pub const EMAIL: &str = "email";
pub const NAME: &str = "name";
pub const PASSWORD: &str = "password";

const LOGIN_FIELDS: &[FieldSpec] = &[
    FieldSpec::new(EMAIL, "Email", FieldKind::Text),
    FieldSpec::new(PASSWORD, "Password", FieldKind::Secret),
];
const REGISTER_FIELDS: &[FieldSpec] = &[
    FieldSpec::new(EMAIL, "Email", FieldKind::Text),
    FieldSpec::new(NAME, "Name", FieldKind::Text),
    FieldSpec::new(PASSWORD, "Password", FieldKind::Secret),
];

fn has_email(fields: &FieldMap) -> bool {
    fields.text(EMAIL).map_or(false, |email| email.contains('@'))
}

fn has_password(fields: &FieldMap) -> bool {
    fields.text(PASSWORD).map_or(false, |password| !password.is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginStep {
    Credentials,
}

impl WizardStep for LoginStep {
    const SEQUENCE: &'static [Self] = &[LoginStep::Credentials];

    fn label(self) -> &'static str {
        "Login"
    }

    fn heading(self) -> &'static str {
        "Welcome back"
    }

    fn subtitle(self) -> Option<&'static str> {
        Some("Login to your account!")
    }

    fn fields(self) -> &'static [FieldSpec] {
        LOGIN_FIELDS
    }

    fn is_satisfied(self, fields: &FieldMap) -> bool {
        has_email(fields) && has_password(fields)
    }

    fn submit_label(_editing: bool) -> &'static str {
        "Continue"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterStep {
    Account,
}

impl WizardStep for RegisterStep {
    const SEQUENCE: &'static [Self] = &[RegisterStep::Account];

    fn label(self) -> &'static str {
        "Register"
    }

    fn heading(self) -> &'static str {
        "Welcome to Airbnb"
    }

    fn subtitle(self) -> Option<&'static str> {
        Some("Create an account!")
    }

    fn fields(self) -> &'static [FieldSpec] {
        REGISTER_FIELDS
    }

    fn is_satisfied(self, fields: &FieldMap) -> bool {
        has_email(fields) && fields.has_text(NAME) && has_password(fields)
    }

    fn submit_label(_editing: bool) -> &'static str {
        "Continue"
    }
}

pub type LoginWizard = StepWizard<LoginStep>;
pub type RegisterWizard = StepWizard<RegisterStep>;

fn require_password(fields: &FieldMap) -> Result<String, FieldError> {
    fields
        .text(PASSWORD)
        .filter(|password| !password.is_empty())
        .map(str::to_string)
        .ok_or(FieldError::missing(PASSWORD))
}

impl TryFrom<&FieldMap> for Credentials {
    type Error = FieldError;

    fn try_from(fields: &FieldMap) -> Result<Self, Self::Error> {
        Ok(Credentials {
            email: fields.require_text(EMAIL)?,
            password: require_password(fields)?,
        })
    }
}

impl TryFrom<&FieldMap> for Registration {
    type Error = FieldError;

    fn try_from(fields: &FieldMap) -> Result<Self, Self::Error> {
        Ok(Registration {
            name: fields.require_text(NAME)?,
            email: fields.require_text(EMAIL)?,
            password: require_password(fields)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::testing::RecordingHost;
    use crate::wizard::{FieldValue, Transition};

    #[test]
    fn login_needs_an_email_and_a_password() {
        let mut host = RecordingHost::new();
        let mut wizard = LoginWizard::new();
        wizard.set_field(EMAIL, FieldValue::Text("ana.example.com".into()));
        wizard.set_field(PASSWORD, FieldValue::Text("pw".into()));
        assert_eq!(wizard.advance(&mut host), Transition::Blocked);
        assert!(wizard.secondary_label().is_none());

        wizard.set_field(EMAIL, FieldValue::Text("ana@example.com".into()));
        assert_eq!(wizard.action_label(), "Continue");
        assert!(matches!(wizard.advance(&mut host), Transition::Submitted(_)));
        let credentials = Credentials::try_from(&host.persisted[0].1).unwrap();
        assert_eq!(credentials.email, "ana@example.com");
    }

    #[test]
    fn register_also_needs_a_name() {
        let fields = FieldMap::new()
            .with(EMAIL, FieldValue::Text("bob@example.com".into()))
            .with(PASSWORD, FieldValue::Text("pw".into()));
        assert!(!RegisterStep::Account.is_satisfied(&fields));
        let fields = fields.with(NAME, FieldValue::Text("Bob".into()));
        assert!(RegisterStep::Account.is_satisfied(&fields));
        assert_eq!(Registration::try_from(&fields).unwrap().name, "Bob");
    }
}
