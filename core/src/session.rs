//! Authentication flag and workflow state for one interactive run.
//!
//! A `Session` is owned by whoever drives the interaction; nothing here is
//! global or persisted. Workflow views are only reachable while
//! authenticated, and logging out returns to `LoggedOut` from any view.

use std::fmt;

use tracing::info;

use crate::error::SessionError;
use crate::service::RecordService;
use crate::transport::Transport;
use crate::types::LoginOutcome;

/// Current screen of the interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    LoggedOut,
    Create,
    Browse,
    Update,
    Delete,
}

/// A menu entry selectable once logged in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Browse,
    Update,
    Delete,
    Logout,
}

impl Action {
    /// Menu order.
    pub const ALL: [Action; 5] = [
        Action::Create,
        Action::Browse,
        Action::Update,
        Action::Delete,
        Action::Logout,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Action::Create => "Add data",
            Action::Browse => "View data",
            Action::Update => "Update data",
            Action::Delete => "Delete data",
            Action::Logout => "Logout",
        }
    }

    /// 1-based menu number to action.
    pub fn from_menu(choice: usize) -> Option<Action> {
        choice.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    authenticated: bool,
    view: View,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            authenticated: false,
            view: View::LoggedOut,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn view(&self) -> View {
        self.view
    }

    /// Attempt a login against the API and record the outcome.
    pub fn login<T: Transport>(
        &mut self,
        service: &RecordService<T>,
        username: &str,
        password: &str,
    ) -> LoginOutcome {
        let outcome = service.login(username, password);
        self.record_login(outcome);
        outcome
    }

    /// Apply a login outcome. Success lands on the first menu entry; a
    /// rejection leaves the session logged out.
    pub fn record_login(&mut self, outcome: LoginOutcome) {
        match outcome {
            LoginOutcome::Authenticated => {
                info!("session authenticated");
                self.authenticated = true;
                self.view = View::Create;
            }
            LoginOutcome::Rejected => {
                self.authenticated = false;
                self.view = View::LoggedOut;
            }
        }
    }

    /// Switch workflow. Refused while logged out.
    pub fn select(&mut self, action: Action) -> Result<View, SessionError> {
        if !self.authenticated {
            return Err(SessionError::NotAuthenticated);
        }
        self.view = match action {
            Action::Create => View::Create,
            Action::Browse => View::Browse,
            Action::Update => View::Update,
            Action::Delete => View::Delete,
            Action::Logout => {
                self.logout();
                View::LoggedOut
            }
        };
        Ok(self.view)
    }

    pub fn logout(&mut self) {
        if self.authenticated {
            info!("session logged out");
        }
        self.authenticated = false;
        self.view = View::LoggedOut;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::RecordsClient;
    use crate::transport::ScriptedTransport;

    fn service(transport: ScriptedTransport) -> RecordService<ScriptedTransport> {
        RecordService::new(RecordsClient::new("http://api.test"), transport)
    }

    #[test]
    fn starts_logged_out() {
        let session = Session::new();
        assert!(!session.is_authenticated());
        assert_eq!(session.view(), View::LoggedOut);
    }

    #[test]
    fn successful_login_authenticates() {
        let svc = service(ScriptedTransport::new().respond(200, r#"{"message":"ok"}"#));
        let mut session = Session::new();
        assert_eq!(session.login(&svc, "admin", "admin"), LoginOutcome::Authenticated);
        assert!(session.is_authenticated());
        assert_eq!(session.view(), View::Create);
    }

    #[test]
    fn any_other_status_leaves_session_logged_out() {
        for status in [201, 400, 401, 403, 500] {
            let svc = service(ScriptedTransport::new().respond(status, ""));
            let mut session = Session::new();
            assert_eq!(session.login(&svc, "admin", "wrong"), LoginOutcome::Rejected);
            assert!(!session.is_authenticated(), "status {status}");
            assert_eq!(session.view(), View::LoggedOut);
        }
    }

    #[test]
    fn selecting_requires_login() {
        let mut session = Session::new();
        assert_eq!(
            session.select(Action::Browse),
            Err(SessionError::NotAuthenticated)
        );
    }

    #[test]
    fn select_switches_views_and_logout_clears_flag() {
        let mut session = Session::new();
        session.record_login(LoginOutcome::Authenticated);
        assert_eq!(session.select(Action::Browse), Ok(View::Browse));
        assert_eq!(session.select(Action::Delete), Ok(View::Delete));
        assert_eq!(session.select(Action::Logout), Ok(View::LoggedOut));
        assert!(!session.is_authenticated());
        assert!(session.select(Action::Update).is_err());
    }

    #[test]
    fn menu_numbers_are_one_based() {
        assert_eq!(Action::from_menu(1), Some(Action::Create));
        assert_eq!(Action::from_menu(5), Some(Action::Logout));
        assert_eq!(Action::from_menu(0), None);
        assert_eq!(Action::from_menu(6), None);
    }
}
