use anyhow::{Result, bail};
use chrono::{Local, NaiveDate};
use clap::{Args, Subcommand};
use shared::models::{Expense, ExpenseFilter, ExpenseRequest, ExpenseStatus, PageQuery};

use crate::{
    GlobalArgs,
    context::AppContext,
    output::{ApiResultExt, print_json, print_page_footer, truncate},
};

#[derive(Subcommand, Debug)]
pub enum ExpensesCommand {
    /// List your expenses
    List(ListArgs),
    /// Record a new draft expense
    Create(CreateArgs),
    /// Change a draft expense
    Update(UpdateArgs),
    /// Delete a draft expense
    Delete {
        id: i64,
    },
    /// Send a draft into the approval chain
    Submit {
        id: i64,
    },
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only show expenses in this state (draft, pending, approved, rejected, paid)
    #[arg(long)]
    pub status: Option<ExpenseStatus>,

    #[arg(long)]
    pub category: Option<String>,

    /// Free-text search over title and description
    #[arg(long)]
    pub search: Option<String>,

    /// Earliest expense date (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Latest expense date (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Zero-based page number
    #[arg(long, default_value_t = 0)]
    pub page: u32,

    #[arg(long, default_value_t = 20)]
    pub size: u32,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    #[arg(long, short)]
    pub title: String,

    #[arg(long, short)]
    pub amount: f64,

    /// ISO currency code
    #[arg(long, default_value = "USD")]
    pub currency: String,

    #[arg(long)]
    pub category: String,

    /// Date of the expense (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub date: Option<NaiveDate>,

    #[arg(long, short)]
    pub description: Option<String>,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    pub id: i64,

    #[arg(long, short)]
    pub title: Option<String>,

    #[arg(long, short)]
    pub amount: Option<f64>,

    #[arg(long)]
    pub currency: Option<String>,

    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub date: Option<NaiveDate>,

    #[arg(long, short)]
    pub description: Option<String>,
}

pub async fn run(command: ExpensesCommand, global: &GlobalArgs) -> Result<()> {
    let ctx = AppContext::load(global)?;
    ctx.require_session()?;
    let expenses = ctx.api().expenses();

    match command {
        ExpensesCommand::List(args) => {
            let filter = ExpenseFilter {
                status: args.status,
                category: args.category,
                search: args.search,
                from: args.from,
                to: args.to,
            };
            let page = expenses
                .list(&filter, PageQuery::new(args.page, args.size))
                .await
                .or_explain("list expenses")?;
            if ctx.json {
                return print_json(&page);
            }
            if page.is_empty() {
                println!("No expenses found.");
                return Ok(());
            }
            print_table(&page.content);
            print_page_footer(&page);
        }
        ExpensesCommand::Create(args) => {
            let request = ExpenseRequest {
                title: args.title.trim().to_string(),
                description: args.description.filter(|text| !text.trim().is_empty()),
                amount: args.amount,
                currency: args.currency.trim().to_ascii_uppercase(),
                category: args.category.trim().to_string(),
                expense_date: args.date.unwrap_or_else(|| Local::now().date_naive()),
            };
            validate(&request)?;
            let created = expenses.create(&request).await.or_explain("create the expense")?;
            report(&ctx, "Created", &created)?;
        }
        ExpensesCommand::Update(args) => {
            let current = expenses.get(args.id).await.or_explain("load the expense")?;
            if !current.status.is_editable() {
                bail!(
                    "expense {} is {} and can no longer be edited",
                    current.id,
                    current.status.label().to_lowercase()
                );
            }
            let mut request = ExpenseRequest::from(&current);
            if let Some(title) = args.title {
                request.title = title.trim().to_string();
            }
            if let Some(amount) = args.amount {
                request.amount = amount;
            }
            if let Some(currency) = args.currency {
                request.currency = currency.trim().to_ascii_uppercase();
            }
            if let Some(category) = args.category {
                request.category = category.trim().to_string();
            }
            if let Some(date) = args.date {
                request.expense_date = date;
            }
            if let Some(description) = args.description {
                request.description = Some(description).filter(|text| !text.trim().is_empty());
            }
            validate(&request)?;
            let updated = expenses
                .update(args.id, &request)
                .await
                .or_explain("update the expense")?;
            report(&ctx, "Updated", &updated)?;
        }
        ExpensesCommand::Delete { id } => {
            expenses.delete(id).await.or_explain("delete the expense")?;
            println!("Deleted expense {id}");
        }
        ExpensesCommand::Submit { id } => {
            let submitted = expenses.submit(id).await.or_explain("submit the expense")?;
            report(&ctx, "Submitted", &submitted)?;
        }
    }
    Ok(())
}

fn validate(request: &ExpenseRequest) -> Result<()> {
    if let Err(problems) = request.validate() {
        bail!("invalid expense: {}", problems.join("; "));
    }
    Ok(())
}

fn report(ctx: &AppContext, verb: &str, expense: &Expense) -> Result<()> {
    if ctx.json {
        return print_json(expense);
    }
    println!(
        "{verb} expense {} \"{}\" ({}, {})",
        expense.id,
        expense.title,
        expense.formatted_amount(),
        expense.status.label()
    );
    Ok(())
}

fn print_table(expenses: &[Expense]) {
    println!(
        "{:>6}  {:<10}  {:<28}  {:<14}  {:>14}  {:<9}",
        "ID", "DATE", "TITLE", "CATEGORY", "AMOUNT", "STATUS"
    );
    for expense in expenses {
        println!(
            "{:>6}  {:<10}  {:<28}  {:<14}  {:>14}  {:<9}",
            expense.id,
            expense.expense_date,
            truncate(&expense.title, 28),
            truncate(&expense.category, 14),
            expense.formatted_amount(),
            expense.status.label()
        );
    }
}
