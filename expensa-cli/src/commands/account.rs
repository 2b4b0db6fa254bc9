use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use shared::models::{SignUpRequest, UpdateProfileRequest};

use super::read_password;
use crate::{
    GlobalArgs,
    context::AppContext,
    output::{ApiResultExt, print_json},
};

#[derive(Args, Debug)]
pub struct RegisterArgs {
    #[arg(long, short)]
    pub username: String,

    #[arg(long)]
    pub full_name: String,

    #[arg(long, short)]
    pub email: String,

    /// Read the password from the first line of stdin instead of prompting
    #[arg(long)]
    pub password_stdin: bool,
}

#[derive(Subcommand, Debug)]
pub enum PasswordCommand {
    /// Ask for a reset link to be mailed
    Forgot {
        #[arg(long, short)]
        email: String,
    },
    /// Set a new password with the token from the reset mail
    Reset {
        #[arg(long, short)]
        token: String,

        /// Read the new password from the first line of stdin instead of prompting
        #[arg(long)]
        password_stdin: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommand {
    /// Change name, email or password of the signed-in user
    Update {
        #[arg(long)]
        full_name: Option<String>,

        #[arg(long, short)]
        email: Option<String>,

        /// Prompt for a new password
        #[arg(long)]
        change_password: bool,

        /// Read the new password from the first line of stdin instead of prompting
        #[arg(long, requires = "change_password")]
        password_stdin: bool,
    },
}

pub async fn register(args: RegisterArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = AppContext::load(global)?;
    let password = read_password("Password: ", args.password_stdin)?;
    let request = SignUpRequest {
        username: args.username.trim().to_string(),
        full_name: args.full_name.trim().to_string(),
        email: args.email.trim().to_string(),
        password,
    };
    if let Err(problems) = request.validate() {
        bail!("invalid registration: {}", problems.join("; "));
    }

    let response = ctx.api().auth().sign_up(&request).await.or_explain("register")?;
    println!("{}", non_empty_or(&response.message, "Account created."));
    println!("Sign in with `expensa session login --username {}`", request.username);
    Ok(())
}

pub async fn password(command: PasswordCommand, global: &GlobalArgs) -> Result<()> {
    let ctx = AppContext::load(global)?;
    let response = match command {
        PasswordCommand::Forgot { email } => ctx
            .api()
            .auth()
            .forgot_password(&email)
            .await
            .or_explain("request a password reset")?,
        PasswordCommand::Reset {
            token,
            password_stdin,
        } => {
            let new_password = read_password("New password: ", password_stdin)?;
            ctx.api()
                .auth()
                .reset_password(token.trim(), &new_password)
                .await
                .or_explain("reset the password")?
        }
    };
    println!("{}", non_empty_or(&response.message, "Done."));
    Ok(())
}

pub async fn profile(command: ProfileCommand, global: &GlobalArgs) -> Result<()> {
    let ctx = AppContext::load(global)?;
    let session = ctx.require_session()?;
    let ProfileCommand::Update {
        full_name,
        email,
        change_password,
        password_stdin,
    } = command;

    let current = session.user.unwrap_or_default();
    let password = if change_password {
        Some(read_password("New password: ", password_stdin)?)
    } else {
        None
    };
    let request = UpdateProfileRequest {
        full_name: full_name.unwrap_or(current.full_name).trim().to_string(),
        email: email.unwrap_or(current.email).trim().to_string(),
        password,
    };
    if let Err(problems) = request.validate() {
        bail!("invalid profile: {}", problems.join("; "));
    }

    let updated = ctx
        .store
        .save_profile(&request)
        .await
        .or_explain("update the profile")?;
    if ctx.json {
        return print_json(&updated);
    }
    println!("Profile updated for {}", updated.display_name());
    Ok(())
}

fn non_empty_or<'a>(message: &'a str, fallback: &'a str) -> &'a str {
    if message.trim().is_empty() { fallback } else { message }
}
