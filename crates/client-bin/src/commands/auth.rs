//! Authentication commands.

use super::App;
use anyhow::Result;
use auth_gateway::ProfileUpdate;
use session_engine::SessionStatus;
use std::io::{self, Write};

fn prompt(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;
    let mut value = String::new();
    io::stdin().read_line(&mut value)?;
    Ok(value.trim().to_string())
}

fn prompt_or(provided: Option<String>, label: &str) -> Result<String> {
    match provided {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => prompt(label),
    }
}

/// Login with email and password.
pub async fn login(app: &App, email: Option<String>) -> Result<()> {
    let session = app.bootstrap().await?;

    if let Some(identity) = session.identity() {
        println!("Already logged in as {}", identity.username);
        return Ok(());
    }

    let email = prompt_or(email, "Email")?;
    if email.is_empty() {
        println!("Email is required");
        return Ok(());
    }

    let password = rpassword::prompt_password("Password: ")?;
    if password.is_empty() {
        println!("Password is required");
        return Ok(());
    }

    println!("Logging in...");
    match app.controller.login(&email, &password).await {
        Ok(identity) => println!("Logged in as {}", identity.username),
        Err(e) => println!("Login failed: {}", e),
    }

    Ok(())
}

/// Create a new account, then offer the usual next step.
pub async fn register(app: &App, email: Option<String>, username: Option<String>) -> Result<()> {
    app.bootstrap().await?;

    let email = prompt_or(email, "Email")?;
    let username = prompt_or(username, "Username")?;
    if email.is_empty() || username.is_empty() {
        println!("Email and username are required");
        return Ok(());
    }

    let password = rpassword::prompt_password("Password: ")?;
    let confirm = rpassword::prompt_password("Confirm password: ")?;
    if password != confirm {
        println!("Passwords do not match");
        return Ok(());
    }

    match app.controller.register(&email, &username, &password).await {
        Ok(identity) => {
            println!(
                "Account created for {}. Run `shopsense login` to start a session.",
                identity.username
            );
        }
        Err(e) => println!("Registration failed: {}", e),
    }

    Ok(())
}

/// Logout and clear the stored credential.
///
/// Deliberately skips bootstrap: teardown must not wait on the network.
pub async fn logout(app: &App) -> Result<()> {
    app.controller.logout();
    println!("Logged out");
    Ok(())
}

/// Show session status.
pub async fn status(app: &App) -> Result<()> {
    let session = app.bootstrap().await?;

    match (session.status(), session.identity()) {
        (SessionStatus::Authenticated, Some(identity)) => {
            println!("Auth:      logged in");
            println!("Username:  {}", identity.username);
            println!("Email:     {}", identity.email);
        }
        (SessionStatus::Anonymous, _) => println!("Auth:      not logged in"),
        _ => println!("Auth:      restoring session..."),
    }

    Ok(())
}

/// Show the authenticated profile.
pub async fn whoami(app: &App) -> Result<()> {
    let session = app.bootstrap().await?;
    if !super::require_authenticated(&session, "/profile") {
        return Ok(());
    }

    if let Some(identity) = session.identity() {
        println!("{} <{}> (id {})", identity.username, identity.email, identity.id);
    }
    Ok(())
}

/// Update the authenticated profile.
pub async fn update_profile(
    app: &App,
    username: Option<String>,
    email: Option<String>,
) -> Result<()> {
    let session = app.bootstrap().await?;
    if !super::require_authenticated(&session, "/profile") {
        return Ok(());
    }

    if username.is_none() && email.is_none() {
        println!("Nothing to update; pass --username and/or --email");
        return Ok(());
    }

    let update = ProfileUpdate { username, email };
    match app.controller.update_profile(&update).await {
        Ok(identity) => println!("Profile updated: {} <{}>", identity.username, identity.email),
        Err(e) => println!("Profile update failed: {}", e),
    }

    Ok(())
}

/// Change the account password.
pub async fn change_password(app: &App) -> Result<()> {
    let session = app.bootstrap().await?;
    if !super::require_authenticated(&session, "/profile") {
        return Ok(());
    }

    let current = rpassword::prompt_password("Current password: ")?;
    let next = rpassword::prompt_password("New password: ")?;
    let confirm = rpassword::prompt_password("Confirm new password: ")?;

    if next != confirm {
        println!("New passwords do not match");
        return Ok(());
    }
    if next.len() < 6 {
        println!("Password must be at least 6 characters");
        return Ok(());
    }

    match app.controller.change_password(&current, &next).await {
        Ok(()) => println!("Password changed"),
        Err(e) => println!("Password change failed: {}", e),
    }

    Ok(())
}
