use anyhow::Result;
use clap::Subcommand;

use crate::{
    GlobalArgs,
    context::AppContext,
    output::{ApiResultExt, print_json},
};

#[derive(Subcommand, Debug)]
pub enum NotificationsCommand {
    /// Show your notifications, newest first
    List {
        /// Only show unread notifications
        #[arg(long)]
        unread: bool,
    },
    /// Mark one notification as read
    Read { id: i64 },
    /// Mark every notification as read
    ReadAll,
}

pub async fn run(command: NotificationsCommand, global: &GlobalArgs) -> Result<()> {
    let ctx = AppContext::load(global)?;
    ctx.require_session()?;
    let notifications = ctx.api().notifications();

    match command {
        NotificationsCommand::List { unread } => {
            let mut items = notifications
                .list()
                .await
                .or_explain("load notifications")?;
            if unread {
                items.retain(|notification| !notification.read);
            }
            if ctx.json {
                return print_json(&items);
            }
            if items.is_empty() {
                println!("No notifications.");
                return Ok(());
            }
            for notification in &items {
                let when = notification
                    .created_at
                    .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_default();
                println!(
                    "{} {:>5}  {:<16}  {}",
                    if notification.read { " " } else { "*" },
                    notification.id,
                    when,
                    notification.message
                );
            }
        }
        NotificationsCommand::Read { id } => {
            notifications
                .mark_read(id)
                .await
                .or_explain("mark the notification as read")?;
            println!("Marked notification {id} as read");
        }
        NotificationsCommand::ReadAll => {
            notifications
                .mark_all_read()
                .await
                .or_explain("mark notifications as read")?;
            println!("All notifications marked as read");
        }
    }
    Ok(())
}
