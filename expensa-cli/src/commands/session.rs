use anyhow::{Result, anyhow};
use chrono::Utc;
use clap::{Args, Subcommand};
use client::{Claims, LogoutReason, Session};
use shared::models::LoginRequest;

use super::{prompt, read_password};
use crate::{GlobalArgs, context::AppContext, output::{ApiResultExt, print_json}};

#[derive(Subcommand, Debug)]
pub enum SessionCommand {
    /// Sign in and store the session locally
    Login(LoginArgs),
    /// Show the signed-in user, refreshed from the backend
    Me,
    /// Forget the stored session
    Logout,
}

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Username to sign in with; prompted for when omitted
    #[arg(long, short)]
    pub username: Option<String>,

    /// Read the password from the first line of stdin instead of prompting
    #[arg(long)]
    pub password_stdin: bool,
}

pub async fn run(command: SessionCommand, global: &GlobalArgs) -> Result<()> {
    let ctx = AppContext::load(global)?;
    match command {
        SessionCommand::Login(args) => login(&ctx, args).await,
        SessionCommand::Me => me(&ctx).await,
        SessionCommand::Logout => logout(&ctx),
    }
}

async fn login(ctx: &AppContext, args: LoginArgs) -> Result<()> {
    let username = match args.username {
        Some(username) if !username.trim().is_empty() => username.trim().to_string(),
        _ => prompt("Username: ")?,
    };
    let password = read_password("Password: ", args.password_stdin)?;

    let session = ctx
        .store
        .sign_in(&LoginRequest { username, password })
        .await
        .map_err(|err| {
            let message = err.user_message();
            anyhow!(err).context(format!("login failed: {message}"))
        })?;

    if ctx.json {
        return print_json(&session.user);
    }
    print_session_summary(&session, ctx);
    Ok(())
}

async fn me(ctx: &AppContext) -> Result<()> {
    ctx.require_session()?;
    let session = ctx
        .store
        .refresh_profile()
        .await
        .or_explain("load the current user")?;

    if ctx.json {
        return print_json(&session.user);
    }
    print_session_summary(&session, ctx);
    Ok(())
}

fn logout(ctx: &AppContext) -> Result<()> {
    let had_session = ctx.store.is_authenticated();
    ctx.store.logout()?;
    if had_session {
        println!("Removed session at {}", ctx.session_path.display());
    } else {
        println!("No session found at {}", ctx.session_path.display());
    }
    Ok(())
}

pub fn print_session_summary(session: &Session, ctx: &AppContext) {
    let Some(user) = session.user.as_ref() else {
        println!("Signed in (profile unavailable)");
        return;
    };
    println!("Signed in as {}", user.display_name());
    if !user.username.is_empty() {
        println!("  username: {}", user.username);
    }
    if !user.email.is_empty() {
        println!("  email:    {}", user.email);
    }
    println!("  roles:    {}", user.roles.join(", "));
    println!(
        "  access:   {}",
        match (session.is_admin(), session.is_manager()) {
            (true, _) => "admin",
            (false, true) => "manager",
            (false, false) => "employee",
        }
    );
    if let Some(claims) = session
        .token
        .as_deref()
        .and_then(|token| Claims::decode(token).ok())
    {
        if let Some(expiry) = claims.expires_at() {
            let note = if claims.is_expired_at(Utc::now()) { " (expired)" } else { "" };
            println!("  expires:  {}{note}", expiry.format("%Y-%m-%d %H:%M UTC"));
        }
    }
    println!("  server:   {}", ctx.api().base_url());
    println!("Session stored at {}", ctx.session_path.display());
}

/// Message printed when a command ends the session on the user's behalf.
pub fn describe_logout(reason: LogoutReason) -> &'static str {
    match reason {
        LogoutReason::UserRequested => "signed out",
        LogoutReason::Expired => "session expired; run `expensa session login` to sign in again",
    }
}
