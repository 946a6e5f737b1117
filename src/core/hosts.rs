//! Wizard hosts backed by the marketplace facade.
//!
//! Each host turns the collected fields into a typed record at the submit
//! boundary and forwards it to [`MarketManager`]. Close and failure signals
//! are recorded so the caller can react once the wizard returns.

use uuid::Uuid;

use crate::domain::{Credentials, Listing, ListingDraft, ListingQuery, Registration, User};
use crate::wizard::search::SearchQuery;
use crate::wizard::{CloseReason, FieldMap, PersistError, WizardHost};

use super::MarketManager;

/// What happened to the hosting modal while the wizard ran.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HostSignals {
    pub closed: Option<CloseReason>,
    pub failure: Option<String>,
}

impl HostSignals {
    fn close(&mut self, reason: CloseReason) {
        tracing::debug!(?reason, "wizard closed");
        self.closed = Some(reason);
    }

    fn fail(&mut self, error: &PersistError) {
        tracing::warn!(%error, "wizard submit failed");
        self.failure = Some(error.to_string());
    }
}

/// Creates or updates listings for the signed-in user.
pub struct ListingHost<'a> {
    manager: &'a mut MarketManager,
    pub signals: HostSignals,
}

impl<'a> ListingHost<'a> {
    pub fn new(manager: &'a mut MarketManager) -> Self {
        Self {
            manager,
            signals: HostSignals::default(),
        }
    }
}

impl WizardHost for ListingHost<'_> {
    type Entity = Listing;

    fn persist(&mut self, entity_id: Option<Uuid>, fields: &FieldMap) -> Result<Listing, PersistError> {
        let draft = ListingDraft::try_from(fields)?;
        let listing = match entity_id {
            Some(id) => self.manager.update_listing(id, draft)?,
            None => self.manager.create_listing(draft)?,
        };
        Ok(listing)
    }

    fn close(&mut self, reason: CloseReason) {
        self.signals.close(reason);
    }

    fn report_failure(&mut self, error: &PersistError) {
        self.signals.fail(error);
    }
}

/// Produces the next listing query; nothing is stored.
pub struct SearchHost {
    base: ListingQuery,
    pub signals: HostSignals,
}

impl SearchHost {
    pub fn new(base: ListingQuery) -> Self {
        Self {
            base,
            signals: HostSignals::default(),
        }
    }
}

impl WizardHost for SearchHost {
    type Entity = ListingQuery;

    fn persist(&mut self, _entity_id: Option<Uuid>, fields: &FieldMap) -> Result<ListingQuery, PersistError> {
        let search = SearchQuery::try_from(fields)?;
        Ok(search.merge_into(&self.base))
    }

    fn close(&mut self, reason: CloseReason) {
        self.signals.close(reason);
    }

    fn report_failure(&mut self, error: &PersistError) {
        self.signals.fail(error);
    }
}

pub struct LoginHost<'a> {
    manager: &'a mut MarketManager,
    pub signals: HostSignals,
}

impl<'a> LoginHost<'a> {
    pub fn new(manager: &'a mut MarketManager) -> Self {
        Self {
            manager,
            signals: HostSignals::default(),
        }
    }
}

impl WizardHost for LoginHost<'_> {
    type Entity = User;

    fn persist(&mut self, _entity_id: Option<Uuid>, fields: &FieldMap) -> Result<User, PersistError> {
        let credentials = Credentials::try_from(fields)?;
        Ok(self.manager.sign_in(&credentials)?)
    }

    fn close(&mut self, reason: CloseReason) {
        self.signals.close(reason);
    }

    fn report_failure(&mut self, error: &PersistError) {
        self.signals.fail(error);
    }
}

/// Registers an account and signs it in.
pub struct RegisterHost<'a> {
    manager: &'a mut MarketManager,
    pub signals: HostSignals,
}

impl<'a> RegisterHost<'a> {
    pub fn new(manager: &'a mut MarketManager) -> Self {
        Self {
            manager,
            signals: HostSignals::default(),
        }
    }
}

impl WizardHost for RegisterHost<'_> {
    type Entity = User;

    fn persist(&mut self, _entity_id: Option<Uuid>, fields: &FieldMap) -> Result<User, PersistError> {
        let registration = Registration::try_from(fields)?;
        let credentials = Credentials {
            email: registration.email.clone(),
            password: registration.password.clone(),
        };
        self.manager.register(registration)?;
        Ok(self.manager.sign_in(&credentials)?)
    }

    fn close(&mut self, reason: CloseReason) {
        self.signals.close(reason);
    }

    fn report_failure(&mut self, error: &PersistError) {
        self.signals.fail(error);
    }
}
