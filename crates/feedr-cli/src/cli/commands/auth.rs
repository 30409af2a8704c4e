//! Auth command handlers.

use std::io::{self, BufRead, IsTerminal, Write};

use anyhow::Result;
use feedr_core::api::types::LoginRequest;
use feedr_core::gate::Route;
use feedr_core::session::SessionStore;

pub async fn login(session: &mut SessionStore, email: &str) -> Result<()> {
    if session.is_authenticated() {
        if let Some(user) = session.current_user() {
            println!("Already logged in as {} <{}>.", user.name, user.email);
        }
        println!("A new login replaces the existing session.");
    }

    let password = read_password()?;
    if password.is_empty() {
        anyhow::bail!("Password cannot be empty");
    }

    let ok = session
        .login(LoginRequest {
            email: email.to_string(),
            password,
        })
        .await?;

    if !ok {
        anyhow::bail!("Login failed: invalid credentials or unavailable profile");
    }

    // Authenticated landing: the CLI's navigation to "/".
    if let Some(user) = session.current_user() {
        println!("✓ Logged in as {} <{}>", user.name, user.email);
    }
    println!("  Session saved to: {}", session.store().path().display());

    Ok(())
}

pub fn logout(session: &mut SessionStore) -> Result<()> {
    let was_authenticated = session.is_authenticated();

    // Unconditional: clears the session even when already Anonymous.
    session.logout();

    if was_authenticated {
        println!("✓ Logged out");
        println!(
            "  Session removed from: {}",
            session.store().path().display()
        );
    } else {
        println!("Not logged in (no session found).");
    }
    println!("Run `feedr login --email <EMAIL>` to start a new session.");

    Ok(())
}

pub fn whoami(session: &SessionStore) -> Result<()> {
    let Some(user) = session.current_user() else {
        // The gate admits this command only when authenticated.
        anyhow::bail!("No session user (redirected to {})", Route::Login.path());
    };

    println!("{} <{}>", user.name, user.email);
    println!("  id: {}", user.id);
    println!("  member since: {}", user.created_at.format("%Y-%m-%d"));

    Ok(())
}

/// Reads the password from stdin: prompted on a terminal, read from the
/// pipe otherwise. Never accepted as a command-line argument.
fn read_password() -> Result<String> {
    if io::stdin().is_terminal() {
        print!("Password: ");
        io::stdout().flush()?;
    }

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;
    Ok(input.trim().to_string())
}
