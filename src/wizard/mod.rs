//! Step-driven wizard engine shared by the listing, search and account flows.
//!
//! A [`StepWizard`] owns the position within an ordered step sequence, the
//! fields collected so far and the submit guard. Each step is gated by a pure
//! predicate over the fields: forward navigation is refused while it fails,
//! and advancing from the last step submits instead of moving. Hosts plug in
//! through [`WizardHost`], which persists the fields and is told when the
//! wizard closes.
//!
//! Submission is two-phase so a host may complete it later:
//! [`StepWizard::begin_submit`] hands out a [`SubmitTicket`] and
//! [`StepWizard::complete_submit`] applies the result. Tickets carry the
//! wizard generation; a result arriving after a reset or cancel is ignored.

pub mod auth;
pub mod field;
pub mod listing;
pub mod search;

use std::fmt;
use std::marker::PhantomData;

use thiserror::Error;
use uuid::Uuid;

use crate::core::services::ServiceError;

pub use field::{FieldError, FieldKind, FieldMap, FieldSpec, FieldValue};

/// One step of a wizard. Implemented by fieldless enums listing their steps in order.
pub trait WizardStep: Copy + PartialEq + fmt::Debug + 'static {
    /// Every step, first to last. Must not be empty.
    const SEQUENCE: &'static [Self];

    fn label(self) -> &'static str;

    /// Heading shown while the step is active.
    fn heading(self) -> &'static str {
        self.label()
    }

    fn subtitle(self) -> Option<&'static str> {
        None
    }

    /// Fields collected on this step, in prompt order.
    fn fields(self) -> &'static [FieldSpec];

    /// Whether the step's required fields are present. Must be pure.
    fn is_satisfied(self, fields: &FieldMap) -> bool;

    /// Field values of a blank form.
    fn defaults() -> FieldMap {
        FieldMap::default()
    }

    /// Action label on the last step.
    fn submit_label(editing: bool) -> &'static str {
        if editing {
            "Update"
        } else {
            "Create"
        }
    }

    /// Secondary action label on any step after the first.
    fn back_label(previous: Self) -> String {
        let _ = previous;
        "Back".to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// The user backed out or cancelled.
    Cancelled,
    /// Persist succeeded.
    Submitted,
}

/// Failure reported by [`WizardHost::persist`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistError {
    /// Collected data did not pass the schema check or a business rule.
    #[error("{0}")]
    Invalid(String),
    /// The backend could not store the data.
    #[error("Something went wrong: {0}")]
    Rejected(String),
}

impl From<FieldError> for PersistError {
    fn from(err: FieldError) -> Self {
        PersistError::Invalid(err.to_string())
    }
}

impl From<ServiceError> for PersistError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Market(inner) => PersistError::Rejected(inner.to_string()),
            other => PersistError::Invalid(other.to_string()),
        }
    }
}

/// The collaborator a wizard submits to.
pub trait WizardHost {
    type Entity;

    /// Creates when `entity_id` is `None`, updates otherwise.
    fn persist(
        &mut self,
        entity_id: Option<Uuid>,
        fields: &FieldMap,
    ) -> Result<Self::Entity, PersistError>;

    fn close(&mut self, reason: CloseReason);

    /// Surfaces a failed persist; the wizard stays open.
    fn report_failure(&mut self, error: &PersistError) {
        tracing::warn!(%error, "wizard submit failed");
    }
}

/// Outcome of a submit attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome<E> {
    Completed(E),
    Failed(PersistError),
    /// Another submit is already in flight.
    Busy,
    /// The ticket belonged to a wizard that has since been reset.
    Stale,
}

/// Outcome of [`StepWizard::advance`] and [`StepWizard::retreat`].
#[derive(Debug, Clone, PartialEq)]
pub enum Transition<E> {
    /// Now on the step at this index.
    Moved(usize),
    /// The current step's predicate is unmet; nothing changed.
    Blocked,
    /// Navigation is disabled while a submit is in flight.
    Busy,
    /// Retreated from the first step; the host was asked to close.
    Closed,
    Submitted(SubmitOutcome<E>),
}

/// Snapshot handed out by [`StepWizard::begin_submit`].
#[derive(Debug, Clone)]
pub struct SubmitTicket {
    generation: u64,
    entity_id: Option<Uuid>,
    fields: FieldMap,
}

impl SubmitTicket {
    pub fn entity_id(&self) -> Option<Uuid> {
        self.entity_id
    }

    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }
}

pub struct StepWizard<S: WizardStep> {
    index: usize,
    fields: FieldMap,
    is_submitting: bool,
    entity_id: Option<Uuid>,
    generation: u64,
    steps: PhantomData<S>,
}

impl<S: WizardStep> fmt::Debug for StepWizard<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepWizard")
            .field("step", &self.current_step())
            .field("fields", &self.fields)
            .field("is_submitting", &self.is_submitting)
            .field("entity_id", &self.entity_id)
            .finish()
    }
}

impl<S: WizardStep> Default for StepWizard<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: WizardStep> StepWizard<S> {
    /// A blank wizard for creating a new entity.
    pub fn new() -> Self {
        Self::with_fields(None, S::defaults())
    }

    /// A wizard pre-populated with `fields`, editing `entity_id` when given.
    pub fn with_fields(entity_id: Option<Uuid>, fields: FieldMap) -> Self {
        debug_assert!(!S::SEQUENCE.is_empty(), "wizard without steps");
        Self {
            index: 0,
            fields,
            is_submitting: false,
            entity_id,
            generation: 0,
            steps: PhantomData,
        }
    }

    pub fn current_step(&self) -> S {
        S::SEQUENCE[self.index]
    }

    pub fn step_index(&self) -> usize {
        self.index
    }

    pub fn step_count(&self) -> usize {
        S::SEQUENCE.len()
    }

    pub fn is_first_step(&self) -> bool {
        self.index == 0
    }

    pub fn is_final_step(&self) -> bool {
        self.index + 1 == self.step_count()
    }

    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    pub fn entity_id(&self) -> Option<Uuid> {
        self.entity_id
    }

    /// Whether the current step's predicate currently holds.
    pub fn can_advance(&self) -> bool {
        self.current_step().is_satisfied(&self.fields)
    }

    pub fn action_label(&self) -> &'static str {
        if self.is_final_step() {
            S::submit_label(self.entity_id.is_some())
        } else {
            "Next"
        }
    }

    pub fn secondary_label(&self) -> Option<String> {
        if self.index == 0 {
            None
        } else {
            Some(S::back_label(S::SEQUENCE[self.index - 1]))
        }
    }

    /// Merges a value into the fields. No transition and no validation.
    pub fn set_field(&mut self, key: &str, value: FieldValue) {
        self.fields.set(key, value);
    }

    pub fn advance<H: WizardHost>(&mut self, host: &mut H) -> Transition<H::Entity> {
        if self.is_submitting {
            return Transition::Busy;
        }
        if !self.can_advance() {
            tracing::debug!(step = ?self.current_step(), "advance blocked");
            return Transition::Blocked;
        }
        if self.is_final_step() {
            return Transition::Submitted(self.submit(host));
        }
        self.index += 1;
        tracing::debug!(step = ?self.current_step(), "advanced");
        Transition::Moved(self.index)
    }

    pub fn retreat<H: WizardHost>(&mut self, host: &mut H) -> Transition<H::Entity> {
        if self.is_submitting {
            return Transition::Busy;
        }
        if self.index == 0 {
            host.close(CloseReason::Cancelled);
            return Transition::Closed;
        }
        self.index -= 1;
        tracing::debug!(step = ?self.current_step(), "retreated");
        Transition::Moved(self.index)
    }

    /// Runs both submit phases back to back against `host`.
    pub fn submit<H: WizardHost>(&mut self, host: &mut H) -> SubmitOutcome<H::Entity> {
        let Some(ticket) = self.begin_submit() else {
            return SubmitOutcome::Busy;
        };
        let result = host.persist(ticket.entity_id, &ticket.fields);
        self.complete_submit(ticket, result, host)
    }

    /// Raises the submit guard and snapshots what should be persisted.
    /// Returns `None` while another submit is in flight.
    pub fn begin_submit(&mut self) -> Option<SubmitTicket> {
        if self.is_submitting {
            return None;
        }
        self.is_submitting = true;
        Some(SubmitTicket {
            generation: self.generation,
            entity_id: self.entity_id,
            fields: self.fields.clone(),
        })
    }

    /// Applies the persist result for `ticket`.
    pub fn complete_submit<H: WizardHost>(
        &mut self,
        ticket: SubmitTicket,
        result: Result<H::Entity, PersistError>,
        host: &mut H,
    ) -> SubmitOutcome<H::Entity> {
        if ticket.generation != self.generation {
            tracing::debug!("ignoring completion of a closed wizard");
            return SubmitOutcome::Stale;
        }
        match result {
            Ok(entity) => {
                self.reset();
                host.close(CloseReason::Submitted);
                SubmitOutcome::Completed(entity)
            }
            Err(error) => {
                self.is_submitting = false;
                host.report_failure(&error);
                SubmitOutcome::Failed(error)
            }
        }
    }

    /// Back to the first step with blank-form fields. Outstanding tickets go stale.
    pub fn reset(&mut self) {
        self.index = 0;
        self.fields = S::defaults();
        self.is_submitting = false;
        self.generation += 1;
    }

    /// Explicit cancellation: resets and asks the host to close.
    pub fn cancel<H: WizardHost>(&mut self, host: &mut H) {
        self.reset();
        host.close(CloseReason::Cancelled);
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Host that records every interaction and answers persist from a queue.
    pub struct RecordingHost {
        pub persisted: Vec<(Option<Uuid>, FieldMap)>,
        pub closes: Vec<CloseReason>,
        pub failures: Vec<PersistError>,
        pub reject_next: Option<PersistError>,
    }

    impl RecordingHost {
        pub fn new() -> Self {
            Self {
                persisted: Vec::new(),
                closes: Vec::new(),
                failures: Vec::new(),
                reject_next: None,
            }
        }

        pub fn rejecting(error: PersistError) -> Self {
            let mut host = Self::new();
            host.reject_next = Some(error);
            host
        }
    }

    impl WizardHost for RecordingHost {
        type Entity = FieldMap;

        fn persist(
            &mut self,
            entity_id: Option<Uuid>,
            fields: &FieldMap,
        ) -> Result<FieldMap, PersistError> {
            self.persisted.push((entity_id, fields.clone()));
            match self.reject_next.take() {
                Some(error) => Err(error),
                None => Ok(fields.clone()),
            }
        }

        fn close(&mut self, reason: CloseReason) {
            self.closes.push(reason);
        }

        fn report_failure(&mut self, error: &PersistError) {
            self.failures.push(error.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::RecordingHost;
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Demo {
        Name,
        Age,
        Done,
    }

    const NAME: &[FieldSpec] = &[FieldSpec::new("name", "Name", FieldKind::Text)];
    const AGE: &[FieldSpec] = &[FieldSpec::new("age", "Age", FieldKind::Count)];
    const NONE: &[FieldSpec] = &[];

    impl WizardStep for Demo {
        const SEQUENCE: &'static [Self] = &[Demo::Name, Demo::Age, Demo::Done];

        fn label(self) -> &'static str {
            match self {
                Demo::Name => "Name",
                Demo::Age => "Age",
                Demo::Done => "Done",
            }
        }

        fn fields(self) -> &'static [FieldSpec] {
            match self {
                Demo::Name => NAME,
                Demo::Age => AGE,
                Demo::Done => NONE,
            }
        }

        fn is_satisfied(self, fields: &FieldMap) -> bool {
            match self {
                Demo::Name => fields.has_text("name"),
                Demo::Age => fields.count("age").map_or(false, |age| age > 0),
                Demo::Done => true,
            }
        }

        fn defaults() -> FieldMap {
            FieldMap::new().with("age", FieldValue::Count(0))
        }
    }

    fn filled() -> StepWizard<Demo> {
        let mut wizard = StepWizard::<Demo>::new();
        wizard.set_field("name", FieldValue::Text("Ana".into()));
        wizard.set_field("age", FieldValue::Count(30));
        wizard
    }

    #[test]
    fn labels_follow_position() {
        let mut host = RecordingHost::new();
        let mut wizard = filled();
        assert_eq!(wizard.action_label(), "Next");
        assert_eq!(wizard.secondary_label(), None);
        wizard.advance(&mut host);
        wizard.advance(&mut host);
        assert!(wizard.is_final_step());
        assert_eq!(wizard.action_label(), "Create");
        assert_eq!(wizard.secondary_label().as_deref(), Some("Back"));

        let editing = StepWizard::<Demo>::with_fields(Some(Uuid::new_v4()), FieldMap::new());
        assert_eq!(editing.action_label(), "Next");
        assert_eq!(Demo::submit_label(true), "Update");
    }

    #[test]
    fn retreat_at_first_step_closes_once_and_keeps_fields() {
        let mut host = RecordingHost::new();
        let mut wizard = filled();
        let before = wizard.fields().clone();
        assert_eq!(wizard.retreat(&mut host), Transition::Closed);
        assert_eq!(host.closes, vec![CloseReason::Cancelled]);
        assert_eq!(wizard.fields(), &before);
        assert_eq!(wizard.step_index(), 0);
    }

    #[test]
    fn blocked_advance_changes_nothing() {
        let mut host = RecordingHost::new();
        let mut wizard = StepWizard::<Demo>::new();
        let before = wizard.fields().clone();
        assert_eq!(wizard.advance(&mut host), Transition::Blocked);
        assert_eq!(wizard.step_index(), 0);
        assert_eq!(wizard.fields(), &before);
        assert!(!wizard.is_submitting());
        assert!(host.persisted.is_empty());
    }

    #[test]
    fn set_field_is_idempotent() {
        let mut once = StepWizard::<Demo>::new();
        let mut twice = StepWizard::<Demo>::new();
        once.set_field("name", FieldValue::Text("Ana".into()));
        twice.set_field("name", FieldValue::Text("Ana".into()));
        twice.set_field("name", FieldValue::Text("Ana".into()));
        assert_eq!(once.fields(), twice.fields());
        assert_eq!(once.step_index(), twice.step_index());
    }

    #[test]
    fn step_index_stays_in_bounds_for_every_short_sequence() {
        // 0 = advance, 1 = retreat, 2 = fill the current step, 3 = clear the name
        for seed in 0..4usize.pow(6) {
            let mut host = RecordingHost::new();
            let mut wizard = StepWizard::<Demo>::new();
            let mut code = seed;
            for _ in 0..6 {
                match code % 4 {
                    0 => {
                        wizard.advance(&mut host);
                    }
                    1 => {
                        wizard.retreat(&mut host);
                    }
                    2 => {
                        wizard.set_field("name", FieldValue::Text("Ana".into()));
                        wizard.set_field("age", FieldValue::Count(3));
                    }
                    _ => wizard.set_field("name", FieldValue::Text(String::new())),
                }
                code /= 4;
                assert!(wizard.step_index() < wizard.step_count(), "seed {seed}");
                assert!(!wizard.is_submitting(), "seed {seed}");
            }
        }
    }

    #[test]
    fn successful_submit_resets_and_closes() {
        let mut host = RecordingHost::new();
        let mut wizard = filled();
        wizard.advance(&mut host);
        wizard.advance(&mut host);
        let outcome = wizard.advance(&mut host);
        let expected = FieldMap::new()
            .with("name", FieldValue::Text("Ana".into()))
            .with("age", FieldValue::Count(30));
        assert_eq!(
            outcome,
            Transition::Submitted(SubmitOutcome::Completed(expected.clone()))
        );
        assert_eq!(host.persisted, vec![(None, expected)]);
        assert_eq!(host.closes, vec![CloseReason::Submitted]);
        assert_eq!(wizard.step_index(), 0);
        assert_eq!(wizard.fields(), &Demo::defaults());
        assert!(!wizard.is_submitting());
    }

    #[test]
    fn rejected_submit_keeps_state_and_allows_retry() {
        let mut host = RecordingHost::rejecting(PersistError::Rejected("offline".into()));
        let mut wizard = filled();
        wizard.advance(&mut host);
        wizard.advance(&mut host);
        let before = wizard.fields().clone();

        let outcome = wizard.advance(&mut host);
        assert!(matches!(
            outcome,
            Transition::Submitted(SubmitOutcome::Failed(PersistError::Rejected(_)))
        ));
        assert_eq!(wizard.step_index(), 2);
        assert_eq!(wizard.fields(), &before);
        assert!(!wizard.is_submitting());
        assert_eq!(host.failures.len(), 1);
        assert!(host.closes.is_empty());

        assert!(matches!(wizard.submit(&mut host), SubmitOutcome::Completed(_)));
        assert_eq!(host.persisted.len(), 2);
    }

    #[test]
    fn second_submit_while_in_flight_is_refused() {
        let mut host = RecordingHost::new();
        let mut wizard = filled();
        let ticket = wizard.begin_submit().expect("first ticket");
        assert!(wizard.begin_submit().is_none());
        assert_eq!(wizard.submit(&mut host), SubmitOutcome::Busy);
        assert_eq!(wizard.advance(&mut host), Transition::Busy);
        assert_eq!(wizard.retreat(&mut host), Transition::Busy);
        assert!(host.persisted.is_empty());

        let fields = ticket.fields().clone();
        let outcome = wizard.complete_submit(ticket, Ok(fields), &mut host);
        assert!(matches!(outcome, SubmitOutcome::Completed(_)));
        assert!(!wizard.is_submitting());
    }

    #[test]
    fn completion_after_cancel_is_ignored() {
        let mut host = RecordingHost::new();
        let mut wizard = filled();
        let ticket = wizard.begin_submit().expect("ticket");
        wizard.cancel(&mut host);
        assert_eq!(host.closes, vec![CloseReason::Cancelled]);

        wizard.set_field("name", FieldValue::Text("Bea".into()));
        let outcome = wizard.complete_submit(ticket, Ok(FieldMap::new()), &mut host);
        assert_eq!(outcome, SubmitOutcome::Stale);
        assert_eq!(host.closes.len(), 1);
        assert_eq!(wizard.fields().text("name"), Some("Bea"));
    }
}
