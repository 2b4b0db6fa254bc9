pub mod account;
pub mod approvals;
pub mod completion;
pub mod config;
pub mod expenses;
pub mod invoices;
pub mod notifications;
pub mod reports;
pub mod session;
pub mod users;

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result, bail};
use rpassword::prompt_password;

/// Reads a line from the terminal after printing `message`.
pub fn prompt(message: &str) -> Result<String> {
    print!("{message}");
    io::stdout().flush().ok();
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let trimmed = input.trim().to_string();
    if trimmed.is_empty() {
        bail!("input must not be empty");
    }
    Ok(trimmed)
}

/// Reads a password from the first line of stdin, or prompts for it without
/// echo.
pub fn read_password(message: &str, from_stdin: bool) -> Result<String> {
    let password = if from_stdin {
        let mut line = String::new();
        io::stdin()
            .lock()
            .read_line(&mut line)
            .context("failed to read password from stdin")?;
        line.trim_end_matches(['\r', '\n']).to_string()
    } else {
        prompt_password(message).context("failed to read password")?
    };
    if password.trim().is_empty() {
        bail!("password must not be empty");
    }
    Ok(password)
}
