use anyhow::{Context, Result, anyhow};
use client::ApiError;
use serde::Serialize;
use shared::models::Page;

/// Converts backend failures into CLI errors with a hint on what to do next.
pub trait ApiResultExt<T> {
    fn or_explain(self, action: &str) -> Result<T>;
}

impl<T> ApiResultExt<T> for Result<T, ApiError> {
    fn or_explain(self, action: &str) -> Result<T> {
        self.map_err(|err| {
            let message = err.user_message();
            let hint = if err.is_auth_failure() {
                "; run `expensa session login` to sign in again"
            } else if err.is_forbidden() {
                "; your account lacks the role this command needs"
            } else {
                ""
            };
            anyhow!(err).context(format!("failed to {action}: {message}{hint}"))
        })
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to render JSON")?;
    println!("{rendered}");
    Ok(())
}

pub fn print_page_footer<T>(page: &Page<T>) {
    println!(
        "page {} of {} ({} total)",
        page.number + 1,
        page.total_pages.max(1),
        page.total_elements
    );
}

/// Cuts `value` to `width` characters, marking the cut with `…`.
pub fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        value.to_string()
    } else {
        let kept: String = value.chars().take(width.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}
