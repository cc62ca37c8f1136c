//! Display utilities.

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Table};
use console::{Term, style};
use cryptingtool::audit::{AuditLog, LogLevel};
use cryptingtool::capability::{self, mode_name};
use cryptingtool::config::APP_NAME;
use cryptingtool::file::FileInfo;
use cryptingtool::types::Operation;
use figlet_rs::FIGfont;

const NAME_WIDTH: usize = 32;

pub fn clear_screen() -> Result<()> {
    Term::stdout().clear_screen().context("failed to clear screen")
}

pub fn print_banner() -> Result<()> {
    let font = FIGfont::standard().map_err(|err| anyhow!("failed to load banner font: {err}"))?;
    let banner = font.convert(APP_NAME).context("failed to render banner")?;
    println!("{}", style(banner).cyan().bold());
    Ok(())
}

/// Lists discovered files, numbered from 1 in selection order.
pub fn show_files(files: &[FileInfo]) {
    if files.is_empty() {
        println!("{}", style("No files found").yellow());
        return;
    }

    println!();
    println!("{} {}", style("✓").green(), style(format!("Found {} file(s):", files.len())).bold());

    let mut table = new_table(&["No", "Name", "Size", "Modified"]);
    for (index, file) in files.iter().enumerate() {
        table.add_row(vec![
            Cell::new(index + 1),
            Cell::new(truncate_name(file.name(), NAME_WIDTH)).fg(Color::Green),
            Cell::new(file.formatted_size()),
            Cell::new(file.formatted_modified()),
        ]);
    }

    println!("{table}");
}

pub fn show_algorithms() {
    println!("{}", algorithm_table());
}

/// The capability matrix, one row per algorithm.
fn algorithm_table() -> Table {
    let mut table = new_table(&["Algorithm", "Tier", "Key sizes", "Modes", "Description"]);
    for algorithm in capability::algorithms() {
        let info = capability::info(algorithm);
        let sizes = info.key_sizes.iter().map(u32::to_string).collect::<Vec<_>>().join(", ");
        let modes = capability::supported_modes(algorithm).iter().map(|&mode| mode_name(mode)).collect::<Vec<_>>().join(", ");

        table.add_row(vec![Cell::new(info.name).fg(Color::Cyan), Cell::new(info.tier.label()), Cell::new(sizes), Cell::new(modes), Cell::new(info.description)]);
    }

    table
}

pub fn show_engine(version: &str, algorithm_ids: Option<&[i32]>, mode_ids: Option<&[i32]>, self_test: &Result<()>) {
    let ids = |ids: Option<&[i32]>| ids.map_or_else(|| "not reported".to_owned(), |ids| ids.iter().map(i32::to_string).collect::<Vec<_>>().join(", "));
    let verdict = match self_test {
        Ok(()) => style("passed".to_owned()).green(),
        Err(err) => style(format!("failed: {err:#}")).red(),
    };

    let mut table = new_table(&["Property", "Value"]);
    table.add_row(vec!["Version".to_owned(), version.to_owned()]);
    table.add_row(vec!["Algorithm ids".to_owned(), ids(algorithm_ids)]);
    table.add_row(vec!["Mode ids".to_owned(), ids(mode_ids)]);
    table.add_row(vec!["Self-test".to_owned(), verdict.to_string()]);
    println!("{table}");
}

pub fn show_success(operation: Operation, path: &Path) {
    println!();
    println!("{} {}", style("✓").green(), style(format!("File {} successfully: {}", operation.past(), path.display())).bold());
}

/// Prints the audit log oldest first, like a console scrolling down.
pub fn show_log(log: &AuditLog) {
    if log.is_empty() {
        return;
    }

    println!();
    println!("{}", style("Activity").bold().underlined());

    let entries: Vec<_> = log.iter().collect();
    for entry in entries.into_iter().rev() {
        let level = match entry.level() {
            LogLevel::Info => style(entry.level().display_name()).blue(),
            LogLevel::Warning => style(entry.level().display_name()).yellow(),
            LogLevel::Error => style(entry.level().display_name()).red(),
            LogLevel::Success => style(entry.level().display_name()).green(),
        };

        println!(
            "  {:>9}  {:<7}  {:<6}  {}",
            style(entry.formatted_time()).dim(),
            level,
            style(entry.source().unwrap_or("-")).dim(),
            entry.message()
        );
    }
}

fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_content_arrangement(ContentArrangement::Dynamic).set_header(header.to_vec());
    table
}

/// Shortens `name` to at most `width` characters, marking the cut with `...`.
fn truncate_name(name: &str, width: usize) -> String {
    if name.chars().count() <= width {
        return name.to_owned();
    }

    let kept: String = name.chars().take(width.saturating_sub(3)).collect();
    format!("{kept}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_name() {
        assert_eq!(truncate_name("short.txt", 32), "short.txt");
        assert_eq!(truncate_name("a_really_long_file_name.txt", 10), "a_reall...");
        assert_eq!(truncate_name("ünïcödé_náme.txt", 8), "ünïcö...");
    }

    #[test]
    fn test_algorithm_table_lists_every_algorithm() {
        let table = algorithm_table();
        assert_eq!(table.row_iter().count(), capability::algorithms().count());

        let rendered = table.to_string();
        for algorithm in capability::algorithms() {
            assert!(rendered.contains(capability::algorithm_name(algorithm)), "{algorithm} missing");
        }
    }
}
