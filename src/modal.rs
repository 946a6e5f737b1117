//! Open/closed state for the dialogs the shell can show.

/// Visibility of one modal plus whatever it was opened with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalState<P> {
    payload: Option<P>,
}

impl<P> Default for ModalState<P> {
    fn default() -> Self {
        Self { payload: None }
    }
}

impl<P> ModalState<P> {
    pub fn open(&mut self, payload: P) {
        self.payload = Some(payload);
    }

    /// Closes the modal and hands back its payload.
    pub fn close(&mut self) -> Option<P> {
        self.payload.take()
    }

    pub fn is_open(&self) -> bool {
        self.payload.is_some()
    }

    pub fn payload(&self) -> Option<&P> {
        self.payload.as_ref()
    }
}

/// Body of the delete confirmation dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteConfirmation {
    title: String,
}

impl DeleteConfirmation {
    pub const BODY: &'static str = "This action cannot be undone please proceed carefully";
    pub const CANCEL_LABEL: &'static str = "Cancel";
    pub const CONFIRM_LABEL: &'static str = "Continue";

    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }

    pub fn heading(&self) -> String {
        format!("Delete {}", self.title)
    }
}

/// Every modal the shell hosts. Login and sign-up are mutually exclusive.
#[derive(Debug, Default)]
pub struct Modals {
    /// Listing wizard; carries the listing id when editing.
    pub rent: ModalState<Option<uuid::Uuid>>,
    pub search: ModalState<()>,
    login: ModalState<()>,
    register: ModalState<()>,
    pub delete: ModalState<(uuid::Uuid, DeleteConfirmation)>,
}

impl Modals {
    pub fn open_login(&mut self) {
        self.register.close();
        self.login.open(());
    }

    pub fn open_register(&mut self) {
        self.login.close();
        self.register.open(());
    }

    pub fn close_login(&mut self) {
        self.login.close();
    }

    pub fn close_register(&mut self) {
        self.register.close();
    }

    pub fn login_open(&self) -> bool {
        self.login.is_open()
    }

    pub fn register_open(&self) -> bool {
        self.register.is_open()
    }

    /// Names of the modals currently open.
    pub fn open_names(&self) -> Vec<&'static str> {
        let states = [
            ("rent", self.rent.is_open()),
            ("search", self.search.is_open()),
            ("login", self.login.is_open()),
            ("register", self.register.is_open()),
            ("delete", self.delete.is_open()),
        ];
        states
            .into_iter()
            .filter_map(|(name, open)| open.then_some(name))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn close_returns_the_payload_once() {
        let mut modal = ModalState::default();
        assert!(!modal.is_open());
        let id = Uuid::new_v4();
        modal.open(Some(id));
        assert_eq!(modal.payload(), Some(&Some(id)));
        assert_eq!(modal.close(), Some(Some(id)));
        assert_eq!(modal.close(), None);
    }

    #[test]
    fn login_and_register_toggle() {
        let mut modals = Modals::default();
        modals.open_login();
        modals.open_register();
        assert!(!modals.login_open());
        assert!(modals.register_open());
        modals.open_login();
        assert_eq!(modals.open_names(), vec!["login"]);
    }

    #[test]
    fn delete_dialog_copy() {
        let dialog = DeleteConfirmation::new("Beach House");
        assert_eq!(dialog.heading(), "Delete Beach House");
        assert_eq!(DeleteConfirmation::CONFIRM_LABEL, "Continue");
    }
}
