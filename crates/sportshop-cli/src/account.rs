//! Account command handlers: login, register, profile and logout.
//!
//! Validation problems are printed one per line and end the command with an
//! error, so nothing is sent for an incomplete form.

use sportshop_client::{LoginOutcome, RegisterOutcome};
use sportshop_core::{Level, LoginForm, RegistrationForm};

use crate::app::App;
use crate::render;

async fn report_issues(app: &App, messages: &[&str]) {
    app.prime(messages.iter().copied()).await;
    for message in messages {
        eprintln!("- {}", app.t(message));
    }
}

async fn translated(app: &App, message: &str) -> String {
    app.prime([message]).await;
    app.t(message)
}

/// Sign in and store the session.
///
/// A notice left by a previous registration is shown first.
///
/// # Errors
///
/// Returns an error if the form is incomplete or the server refuses it.
pub(crate) async fn run_login(app: &App, name: String, password: String) -> anyhow::Result<()> {
    if let Some(notice) = app.accounts.take_notice() {
        println!("{}", translated(app, &notice).await);
    }

    let form = LoginForm { name, password };
    match app.accounts.login(&form).await {
        LoginOutcome::SignedIn(user) => {
            println!("{}", render::profile(Some(&user)));
            Ok(())
        }
        LoginOutcome::Invalid(issues) => {
            let messages: Vec<&str> = issues.iter().map(|i| i.message()).collect();
            report_issues(app, &messages).await;
            anyhow::bail!("login form has {} problem(s)", messages.len())
        }
        LoginOutcome::Rejected(message) => anyhow::bail!("{}", translated(app, &message).await),
    }
}

/// Builds the registration form from raw flags. A blank level is left unset
/// so validation reports it.
///
/// # Errors
///
/// Returns an error if `level` is not a known level key.
pub(crate) fn registration_form(
    name: String,
    password: String,
    confirm_password: String,
    sport: String,
    level: Option<&str>,
) -> anyhow::Result<RegistrationForm> {
    let level = level
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .map(str::parse::<Level>)
        .transpose()?;
    Ok(RegistrationForm {
        name,
        password,
        confirm_password,
        sport: sport.trim().to_ascii_uppercase(),
        level,
    })
}

/// Create an account.
///
/// # Errors
///
/// Returns an error if the form is invalid or the server refuses it.
pub(crate) async fn run_register(app: &App, form: &RegistrationForm) -> anyhow::Result<()> {
    match app.accounts.register(form).await {
        RegisterOutcome::Registered => {
            let done = translated(app, "Compte cree. Connectez-vous avec `sportshop login`.").await;
            println!("{done}");
            Ok(())
        }
        RegisterOutcome::Invalid(issues) => {
            let messages: Vec<&str> = issues.iter().map(|i| i.message()).collect();
            report_issues(app, &messages).await;
            anyhow::bail!("registration form has {} problem(s)", messages.len())
        }
        RegisterOutcome::Rejected(message) => anyhow::bail!("{}", translated(app, &message).await),
    }
}

pub(crate) async fn run_profile(app: &App) {
    match app.accounts.session().current_user() {
        Some(user) => println!("{}", render::profile(Some(&user))),
        None => println!("{}", translated(app, render::SIGNED_OUT).await),
    }
}

/// # Errors
///
/// Returns an error if session storage cannot be cleared.
pub(crate) async fn run_logout(app: &App) -> anyhow::Result<()> {
    app.accounts.logout()?;
    println!("{}", translated(app, "Vous etes deconnecte.").await);
    Ok(())
}
