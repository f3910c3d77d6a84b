//! Login and registration against the account endpoints, with the result
//! recorded in session storage.

use chrono::Utc;
use sportshop_core::{
    AuthSession, LoginForm, LoginIssue, RegistrationForm, RegistrationIssue, SessionUser,
    REGISTERED_NOTICE,
};

use crate::client::CatalogClient;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// The form was incomplete; nothing was sent.
    Invalid(Vec<LoginIssue>),
    SignedIn(SessionUser),
    /// The server refused or could not be reached; the message is ready to
    /// show.
    Rejected(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterOutcome {
    Invalid(Vec<RegistrationIssue>),
    /// The account exists; a notice waits for the login view.
    Registered,
    Rejected(String),
}

#[derive(Debug, Clone)]
pub struct AccountService {
    client: CatalogClient,
    session: AuthSession,
}

impl AccountService {
    #[must_use]
    pub fn new(client: CatalogClient, session: AuthSession) -> Self {
        Self { client, session }
    }

    #[must_use]
    pub fn session(&self) -> &AuthSession {
        &self.session
    }

    /// One-shot notice for the login view (set after registration).
    #[must_use]
    pub fn take_notice(&self) -> Option<String> {
        self.session.take_notice()
    }

    /// Validates and submits the login form. On success the echoed name (or
    /// the submitted one) and the sign-in time go to session storage.
    pub async fn login(&self, form: &LoginForm) -> LoginOutcome {
        if let Err(issues) = form.validate() {
            return LoginOutcome::Invalid(issues);
        }
        let name = form.name.trim();

        let reply = match self.client.login(name, &form.password).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(error = %e, "login failed");
                return LoginOutcome::Rejected(e.user_message());
            }
        };

        let display_name = reply.display_name().unwrap_or(name);
        if let Err(e) = self.session.sign_in(display_name, Utc::now()) {
            tracing::warn!(error = %e, "could not persist session");
            return LoginOutcome::Rejected("Impossible d'enregistrer la session.".to_owned());
        }
        tracing::info!(user = %display_name, "signed in");
        match self.session.current_user() {
            Some(user) => LoginOutcome::SignedIn(user),
            None => LoginOutcome::Rejected("Impossible d'enregistrer la session.".to_owned()),
        }
    }

    /// Validates and submits the registration form. On success the login
    /// view's notice is set.
    pub async fn register(&self, form: &RegistrationForm) -> RegisterOutcome {
        let level = match (form.validate(), form.level) {
            (Ok(()), Some(level)) => level,
            (Err(issues), _) => return RegisterOutcome::Invalid(issues),
            (Ok(()), None) => {
                return RegisterOutcome::Invalid(vec![RegistrationIssue::MissingLevel])
            }
        };

        if let Err(e) = self
            .client
            .register(form.name.trim(), &form.password, form.sport.trim(), level)
            .await
        {
            tracing::warn!(error = %e, "registration failed");
            return RegisterOutcome::Rejected(e.user_message());
        }

        if let Err(e) = self.session.set_notice(REGISTERED_NOTICE) {
            tracing::warn!(error = %e, "could not store registration notice");
        }
        tracing::info!(user = %form.name.trim(), "account created");
        RegisterOutcome::Registered
    }

    /// Signs out.
    ///
    /// # Errors
    ///
    /// Returns [`sportshop_core::CoreError::Storage`] if session storage
    /// cannot be cleared.
    pub fn logout(&self) -> Result<(), sportshop_core::CoreError> {
        self.session.sign_out()
    }
}
