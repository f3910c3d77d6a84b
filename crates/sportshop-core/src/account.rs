//! Login and registration forms, validated before any request is sent.

use crate::products::Level;

/// Notice left for the login view after a successful registration.
pub const REGISTERED_NOTICE: &str = "Compte cree. Vous pouvez maintenant vous connecter.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginIssue {
    MissingName,
    MissingPassword,
}

impl LoginIssue {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            LoginIssue::MissingName => "Renseignez votre identifiant.",
            LoginIssue::MissingPassword => "Renseignez votre mot de passe.",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub name: String,
    pub password: String,
}

impl LoginForm {
    /// # Errors
    ///
    /// Returns every issue found, in field order.
    pub fn validate(&self) -> Result<(), Vec<LoginIssue>> {
        let mut issues = Vec::new();
        if self.name.trim().is_empty() {
            issues.push(LoginIssue::MissingName);
        }
        if self.password.trim().is_empty() {
            issues.push(LoginIssue::MissingPassword);
        }
        if issues.is_empty() {
            Ok(())
        } else {
            Err(issues)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationIssue {
    MissingName,
    MissingPassword,
    MissingConfirmation,
    PasswordMismatch,
    MissingSport,
    MissingLevel,
}

impl RegistrationIssue {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            RegistrationIssue::MissingName => "Renseignez un identifiant.",
            RegistrationIssue::MissingPassword => "Renseignez un mot de passe.",
            RegistrationIssue::MissingConfirmation => "Confirmez le mot de passe.",
            RegistrationIssue::PasswordMismatch => "Les mots de passe ne correspondent pas.",
            RegistrationIssue::MissingSport => "Choisissez un sport.",
            RegistrationIssue::MissingLevel => "Choisissez un niveau.",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub name: String,
    pub password: String,
    pub confirm_password: String,
    /// Sport key, e.g. `"RUNNING"`.
    pub sport: String,
    pub level: Option<Level>,
}

impl RegistrationForm {
    /// # Errors
    ///
    /// Returns every issue found, in field order. A mismatch is only
    /// reported when both passwords are filled in.
    pub fn validate(&self) -> Result<(), Vec<RegistrationIssue>> {
        let mut issues = Vec::new();
        if self.name.trim().is_empty() {
            issues.push(RegistrationIssue::MissingName);
        }
        let password_set = !self.password.trim().is_empty();
        let confirmation_set = !self.confirm_password.trim().is_empty();
        if !password_set {
            issues.push(RegistrationIssue::MissingPassword);
        }
        if !confirmation_set {
            issues.push(RegistrationIssue::MissingConfirmation);
        }
        if password_set && confirmation_set && self.password != self.confirm_password {
            issues.push(RegistrationIssue::PasswordMismatch);
        }
        if self.sport.trim().is_empty() {
            issues.push(RegistrationIssue::MissingSport);
        }
        if self.level.is_none() {
            issues.push(RegistrationIssue::MissingLevel);
        }
        if issues.is_empty() {
            Ok(())
        } else {
            Err(issues)
        }
    }
}
