use std::time::Duration;

use crate::selection::{CommandTarget, Selection};

// How long the modal stays on screen after the login call settles, before
// the outcome banner replaces it.
pub const CLOSE_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub context: String,
    pub username: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), String> {
        if self.context.is_empty() || self.username.is_empty() || self.password.is_empty() {
            return Err("context, username and password are all required".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginState {
    Closed,
    Open,
    Submitting,
}

// Process-wide singleton: at most one login modal exists at a time. A Login
// action while the flow is open reuses the existing modal; any close resets
// the singleton so the next action opens a fresh one.
pub struct LoginFlow {
    state: LoginState,
    pending: Option<LoginForm>,
}

impl Default for LoginFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl LoginFlow {
    pub fn new() -> Self {
        Self {
            state: LoginState::Closed,
            pending: None,
        }
    }

    pub fn state(&self) -> LoginState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state != LoginState::Closed
    }

    // Returns the prefilled form when a new modal should open, None when the
    // existing one is reused. The context field is seeded from the context
    // component of the current selection.
    pub fn open(&mut self, selection: &Selection) -> Option<LoginForm> {
        if self.is_open() {
            log::debug!("[login] modal already open, reusing it");
            return None;
        }
        let context = CommandTarget::parse(selection.current())
            .map(|target| target.context)
            .unwrap_or_default();
        self.state = LoginState::Open;
        Some(LoginForm {
            context,
            ..LoginForm::default()
        })
    }

    pub fn begin_submit(&mut self, form: &LoginForm) -> Result<(), String> {
        match self.state {
            LoginState::Closed => Err("no login in progress".to_string()),
            LoginState::Submitting => Err("login already submitting".to_string()),
            LoginState::Open => {
                form.validate()?;
                self.pending = Some(form.clone());
                self.state = LoginState::Submitting;
                Ok(())
            }
        }
    }

    // The in-flight attempt while Submitting; destroyed on any close.
    pub fn pending(&self) -> Option<&LoginForm> {
        self.pending.as_ref()
    }

    pub fn close(&mut self) {
        self.state = LoginState::Closed;
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> LoginForm {
        LoginForm {
            context: "db".to_string(),
            username: "operator".to_string(),
            password: "secret".to_string(),
        }
    }

    #[test]
    fn open_is_a_singleton() {
        let mut flow = LoginFlow::new();
        let selection = Selection::new();

        assert!(flow.open(&selection).is_some());
        assert_eq!(flow.state(), LoginState::Open);
        // Second Login action before the modal closes: no second modal.
        assert!(flow.open(&selection).is_none());
        assert_eq!(flow.state(), LoginState::Open);
    }

    #[test]
    fn open_prefills_context_from_selection() {
        let mut flow = LoginFlow::new();
        let mut selection = Selection::new();
        selection.set("db.pg".to_string());

        let form = flow.open(&selection).unwrap();
        assert_eq!(form.context, "db");
        assert!(form.username.is_empty());
    }

    #[test]
    fn close_resets_the_singleton() {
        let mut flow = LoginFlow::new();
        let selection = Selection::new();

        assert!(flow.open(&selection).is_some());
        flow.close();
        assert_eq!(flow.state(), LoginState::Closed);
        assert!(flow.open(&selection).is_some());
    }

    #[test]
    fn submit_requires_every_field() {
        let mut flow = LoginFlow::new();
        flow.open(&Selection::new());

        let mut incomplete = form();
        incomplete.password.clear();
        assert!(flow.begin_submit(&incomplete).is_err());
        assert_eq!(flow.state(), LoginState::Open);

        assert!(flow.begin_submit(&form()).is_ok());
        assert_eq!(flow.state(), LoginState::Submitting);
        assert_eq!(flow.pending(), Some(&form()));

        flow.close();
        assert!(flow.pending().is_none());
    }

    #[test]
    fn submit_outside_an_open_modal_is_rejected() {
        let mut flow = LoginFlow::new();
        assert!(flow.begin_submit(&form()).is_err());

        flow.open(&Selection::new());
        flow.begin_submit(&form()).unwrap();
        assert!(flow.begin_submit(&form()).is_err());
    }
}
