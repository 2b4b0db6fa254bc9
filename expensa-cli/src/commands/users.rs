use anyhow::{Result, bail};
use clap::Subcommand;
use shared::models::{Role, UserProfile};

use crate::{
    GlobalArgs,
    context::AppContext,
    output::{ApiResultExt, print_json, truncate},
};

#[derive(Subcommand, Debug)]
pub enum UsersCommand {
    /// List every account
    List,
    /// Replace the roles of an account
    Roles {
        id: i64,

        /// Role to grant (`ROLE_USER`, `ROLE_MANAGER`, `ROLE_ADMIN`); repeat for several
        #[arg(long = "role", short, required = true)]
        roles: Vec<Role>,
    },
    /// Allow an account to sign in again
    Enable { id: i64 },
    /// Block an account from signing in
    Disable { id: i64 },
}

pub async fn run(command: UsersCommand, global: &GlobalArgs) -> Result<()> {
    let ctx = AppContext::load(global)?;
    let session = ctx.require_session()?;
    if !session.is_admin() {
        eprintln!("warning: user administration is reserved for admins");
    }
    let users = ctx.api().users();

    match command {
        UsersCommand::List => {
            let accounts = users.list().await.or_explain("list users")?;
            if ctx.json {
                return print_json(&accounts);
            }
            println!(
                "{:>6}  {:<16}  {:<24}  {:<28}  {:<8}  {}",
                "ID", "USERNAME", "NAME", "EMAIL", "ENABLED", "ROLES"
            );
            for account in &accounts {
                println!(
                    "{:>6}  {:<16}  {:<24}  {:<28}  {:<8}  {}",
                    account.id.map(|id| id.to_string()).unwrap_or_default(),
                    truncate(&account.username, 16),
                    truncate(&account.full_name, 24),
                    truncate(&account.email, 28),
                    if account.enabled { "yes" } else { "no" },
                    account.roles.join(",")
                );
            }
        }
        UsersCommand::Roles { id, roles } => {
            if session.user.as_ref().and_then(|user| user.id) == Some(id)
                && !roles.contains(&Role::Admin)
            {
                bail!("refusing to remove your own admin role");
            }
            let updated = users.set_roles(id, &roles).await.or_explain("update roles")?;
            report(&ctx, &updated, &format!("roles set to {}", updated.roles.join(", ")))?;
        }
        UsersCommand::Enable { id } => {
            let updated = users.set_enabled(id, true).await.or_explain("enable the account")?;
            report(&ctx, &updated, "enabled")?;
        }
        UsersCommand::Disable { id } => {
            let updated = users
                .set_enabled(id, false)
                .await
                .or_explain("disable the account")?;
            report(&ctx, &updated, "disabled")?;
        }
    }
    Ok(())
}

fn report(ctx: &AppContext, user: &UserProfile, change: &str) -> Result<()> {
    if ctx.json {
        return print_json(user);
    }
    println!("{}: {change}", user.display_name());
    Ok(())
}
