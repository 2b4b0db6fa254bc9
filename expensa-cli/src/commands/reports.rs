use anyhow::{Result, bail};
use chrono::NaiveDate;
use clap::Args;
use shared::models::{AuditFilter, DateRange, PageQuery};

use crate::{
    GlobalArgs,
    context::AppContext,
    output::{ApiResultExt, print_json, print_page_footer, truncate},
};

#[derive(Args, Debug)]
pub struct AnalyticsArgs {
    /// Start of the reporting window (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// End of the reporting window (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub struct AuditArgs {
    /// Only entries with this action (e.g. `EXPENSE_APPROVED`)
    #[arg(long)]
    pub action: Option<String>,

    /// Only entries recorded for this user
    #[arg(long)]
    pub actor: Option<String>,

    #[arg(long, default_value_t = 0)]
    pub page: u32,

    #[arg(long, default_value_t = 20)]
    pub size: u32,
}

pub async fn analytics(args: AnalyticsArgs, global: &GlobalArgs) -> Result<()> {
    if let (Some(from), Some(to)) = (args.from, args.to) {
        if from > to {
            bail!("--from ({from}) must not be after --to ({to})");
        }
    }
    let ctx = AppContext::load(global)?;
    ctx.require_session()?;

    let summary = ctx
        .api()
        .analytics()
        .summary(DateRange {
            from: args.from,
            to: args.to,
        })
        .await
        .or_explain("load analytics")?;
    if ctx.json {
        return print_json(&summary);
    }

    println!("Total spent:   {:.2}", summary.total_amount);
    println!("Expenses:      {}", summary.expense_count);
    println!("Pending:       {}", summary.pending_count);
    if let Some(top) = summary.top_category() {
        println!("Top category:  {} ({:.2})", top.category, top.total);
    }
    if !summary.by_category.is_empty() {
        println!();
        println!("{:<20}  {:>12}  {:>6}", "CATEGORY", "TOTAL", "SHARE");
        for category in &summary.by_category {
            println!(
                "{:<20}  {:>12.2}  {:>5.1}%",
                truncate(&category.category, 20),
                category.total,
                summary.category_share(category)
            );
        }
    }
    if !summary.by_status.is_empty() {
        println!();
        for status in &summary.by_status {
            println!("{:<10} {}", status.status.label(), status.count);
        }
    }
    if !summary.monthly.is_empty() {
        println!();
        for month in &summary.monthly {
            println!("{}  {:>12.2}", month.month, month.total);
        }
    }
    Ok(())
}

pub async fn audit(args: AuditArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = AppContext::load(global)?;
    let session = ctx.require_session()?;
    if !session.is_admin() {
        eprintln!("warning: the audit log is reserved for admins");
    }

    let filter = AuditFilter {
        action: args.action,
        actor: args.actor,
    };
    let page = ctx
        .api()
        .audit()
        .list(&filter, PageQuery::new(args.page, args.size))
        .await
        .or_explain("load the audit log")?;
    if ctx.json {
        return print_json(&page);
    }
    if page.is_empty() {
        println!("No audit entries found.");
        return Ok(());
    }

    println!(
        "{:<20}  {:<16}  {:<22}  {:<16}  {}",
        "TIME", "ACTOR", "ACTION", "ENTITY", "DETAILS"
    );
    for entry in &page.content {
        println!(
            "{:<20}  {:<16}  {:<22}  {:<16}  {}",
            entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
            truncate(&entry.actor, 16),
            truncate(&entry.action, 22),
            entry.entity_label().unwrap_or_default(),
            entry.details.as_deref().unwrap_or_default()
        );
    }
    print_page_footer(&page);
    Ok(())
}
