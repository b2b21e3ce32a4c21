//! Output formatting

use serde::Serialize;

use ppc_core::types::{Page, PublicCitizen};

use crate::commands::OutputFormat;
use crate::error::CliResult;

fn print_json<T: Serialize>(data: &T) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}

/// Clip `value` to `width` characters, marking the cut
fn fit(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        value.to_string()
    } else {
        let mut clipped: String = value.chars().take(width.saturating_sub(1)).collect();
        clipped.push('…');
        clipped
    }
}

fn citizen_row(citizen: &PublicCitizen) -> String {
    format!(
        "{:<36}  {:<32}  {:<7}  {:<24}  {}",
        citizen.id,
        fit(&citizen.email, 32),
        citizen.role,
        fit(&citizen.name, 24),
        citizen.created_at.format("%Y-%m-%d"),
    )
}

/// Print one page of the citizen directory
pub fn print_citizens(page: &Page<PublicCitizen>, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(page),
        OutputFormat::Table => {
            println!(
                "{:<36}  {:<32}  {:<7}  {:<24}  JOINED",
                "ID", "EMAIL", "ROLE", "NAME"
            );
            for citizen in &page.items {
                println!("{}", citizen_row(citizen));
            }
            println!();
            println!(
                "Page {} of {} ({} citizens)",
                page.pagination.page,
                page.pagination.pages.max(1),
                page.pagination.total
            );
            Ok(())
        }
    }
}

/// Print the accounts found by an email cleanup
pub fn print_cleanup(removed: &[PublicCitizen], dry_run: bool, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(&removed),
        OutputFormat::Table => {
            for citizen in removed {
                println!("{}", citizen_row(citizen));
            }
            let verb = if dry_run { "Would remove" } else { "Removed" };
            println!("{} {} account(s) with invalid emails", verb, removed.len());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit() {
        assert_eq!(fit("short", 10), "short");
        assert_eq!(fit("exactly-10", 10), "exactly-10");
        assert_eq!(fit("much-too-long", 6), "much-…");
    }
}
