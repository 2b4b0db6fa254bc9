use anyhow::Result;
use clap::Subcommand;
use shared::models::{ApprovalDecision, ApprovalRequest, PageQuery, UserProfile};

use crate::{
    GlobalArgs,
    context::AppContext,
    output::{ApiResultExt, print_json, print_page_footer, truncate},
};

#[derive(Subcommand, Debug)]
pub enum ApprovalsCommand {
    /// Show requests waiting for a decision
    List {
        #[arg(long, default_value_t = 0)]
        page: u32,

        #[arg(long, default_value_t = 20)]
        size: u32,
    },
    /// Approve a request
    Approve {
        id: i64,

        #[arg(long, short)]
        comment: Option<String>,
    },
    /// Reject a request
    Reject {
        id: i64,

        #[arg(long, short)]
        comment: Option<String>,
    },
}

pub async fn run(command: ApprovalsCommand, global: &GlobalArgs) -> Result<()> {
    let ctx = AppContext::load(global)?;
    let session = ctx.require_session()?;
    if !session.roles.can_review() {
        eprintln!("warning: approvals are reserved for managers and admins");
    }
    let approvals = ctx.api().approvals();

    match command {
        ApprovalsCommand::List { page, size } => {
            let queue = approvals
                .pending(PageQuery::new(page, size))
                .await
                .or_explain("load the approval queue")?;
            if ctx.json {
                return print_json(&queue);
            }
            if queue.is_empty() {
                println!("Nothing waiting for approval.");
                return Ok(());
            }
            let me = session.user.unwrap_or_default();
            print_table(&queue.content, &me);
            print_page_footer(&queue);
        }
        ApprovalsCommand::Approve { id, comment } => {
            let decision = ApprovalDecision::with_comment(comment.unwrap_or_default());
            let decided = approvals
                .approve(id, &decision)
                .await
                .or_explain("approve the request")?;
            println!("Approved request {} for \"{}\"", decided.id, decided.expense.title);
        }
        ApprovalsCommand::Reject { id, comment } => {
            let decision = ApprovalDecision::with_comment(comment.unwrap_or_default());
            let decided = approvals
                .reject(id, &decision)
                .await
                .or_explain("reject the request")?;
            println!("Rejected request {} for \"{}\"", decided.id, decided.expense.title);
        }
    }
    Ok(())
}

fn print_table(requests: &[ApprovalRequest], me: &UserProfile) {
    println!(
        "{:>6}  {:<20}  {:<28}  {:>14}  {:<8}  {:<10}",
        "ID", "REQUESTER", "EXPENSE", "AMOUNT", "LEVEL", "DECIDABLE"
    );
    for request in requests {
        println!(
            "{:>6}  {:<20}  {:<28}  {:>14}  {:<8}  {:<10}",
            request.id,
            truncate(&request.requester.full_name, 20),
            truncate(&request.expense.title, 28),
            request.expense.formatted_amount(),
            request.level.label(),
            if request.can_decide(me) { "yes" } else { "no" }
        );
    }
}
