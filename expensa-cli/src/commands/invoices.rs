use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::Subcommand;
use shared::models::PageQuery;

use crate::{
    GlobalArgs,
    context::AppContext,
    output::{ApiResultExt, print_json, print_page_footer},
};

#[derive(Subcommand, Debug)]
pub enum InvoicesCommand {
    /// List issued invoices
    List {
        #[arg(long, default_value_t = 0)]
        page: u32,

        #[arg(long, default_value_t = 20)]
        size: u32,
    },
    /// Issue an invoice for an approved expense
    Generate {
        /// Identifier of the approved expense
        expense_id: i64,
    },
    /// Save the PDF of an invoice
    Download {
        id: i64,

        /// Output file; defaults to `invoice-<id>.pdf` in the current directory
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

pub async fn run(command: InvoicesCommand, global: &GlobalArgs) -> Result<()> {
    let ctx = AppContext::load(global)?;
    ctx.require_session()?;
    let invoices = ctx.api().invoices();

    match command {
        InvoicesCommand::List { page, size } => {
            let page = invoices
                .list(PageQuery::new(page, size))
                .await
                .or_explain("list invoices")?;
            if ctx.json {
                return print_json(&page);
            }
            if page.is_empty() {
                println!("No invoices issued yet.");
                return Ok(());
            }
            println!(
                "{:>6}  {:<16}  {:>8}  {:>14}  {:<10}  {:<7}",
                "ID", "NUMBER", "EXPENSE", "AMOUNT", "ISSUED", "STATUS"
            );
            for invoice in &page.content {
                println!(
                    "{:>6}  {:<16}  {:>8}  {:>10.2} {:<3}  {:<10}  {:<7}",
                    invoice.id,
                    invoice.number,
                    invoice.expense_id,
                    invoice.amount,
                    invoice.currency,
                    invoice.issued_at.format("%Y-%m-%d"),
                    invoice.status.label()
                );
            }
            print_page_footer(&page);
        }
        InvoicesCommand::Generate { expense_id } => {
            let invoice = invoices
                .generate(expense_id)
                .await
                .or_explain("generate the invoice")?;
            if ctx.json {
                return print_json(&invoice);
            }
            println!(
                "Issued invoice {} (id {}) for expense {}",
                invoice.number, invoice.id, invoice.expense_id
            );
        }
        InvoicesCommand::Download { id, output } => {
            let pdf = invoices
                .download(id)
                .await
                .or_explain("download the invoice")?;
            let path = output.unwrap_or_else(|| PathBuf::from(format!("invoice-{id}.pdf")));
            fs::write(&path, &pdf)
                .with_context(|| format!("failed to write invoice to {}", path.display()))?;
            println!("Saved {} bytes to {}", pdf.len(), path.display());
        }
    }
    Ok(())
}
