//! Terminal rendering of an analysis report: per-seed suggestion lists,
//! the combined list, and a bar chart of the ranked table.

use std::io::{self, Write};

use tagpulse_scraper::AnalysisReport;

/// Widest bar in the chart, in block characters.
const MAX_BAR_WIDTH: usize = 40;

/// Writes the full report to `out`.
///
/// An empty ranked table prints an explicit no-data line instead of an
/// empty chart, so a fully degraded run is visibly distinct from a
/// rendering problem.
///
/// # Errors
///
/// Propagates any `io::Error` from `out`.
pub fn render_report(report: &AnalysisReport, out: &mut impl Write) -> io::Result<()> {
    for seed in &report.per_seed {
        writeln!(out, "Hashtags for #{}:", seed.seed)?;
        if seed.hashtags.is_empty() {
            writeln!(out, "  (no suggestions)")?;
        } else {
            writeln!(out, "  {}", seed.hashtags.join(" "))?;
        }
        writeln!(out)?;
    }

    let all = report.all_hashtags();
    if !all.is_empty() {
        writeln!(out, "All suggested hashtags:")?;
        writeln!(out, "  {}", all.join(" "))?;
        writeln!(out)?;
    }

    writeln!(out, "Hashtag popularity:")?;
    if report.global.is_empty() {
        writeln!(out, "  no hashtag data to display")?;
        return Ok(());
    }

    let name_width = report
        .global
        .iter()
        .map(|e| e.hashtag.chars().count())
        .max()
        .unwrap_or(0);
    // Ranking guarantees descending order, so the first entry is the max.
    let max_count = report.global[0].count;

    let bar_width = MAX_BAR_WIDTH;
    for entry in &report.global {
        let bar = bar_for(entry.count, max_count);
        writeln!(
            out,
            "  {:<name_width$}  {bar:<bar_width$}  {}",
            entry.hashtag,
            group_digits(entry.count),
        )?;
    }
    Ok(())
}

/// Bar scaled linearly against the table maximum; every positive count gets
/// at least one block so small entries stay visible.
#[allow(clippy::cast_possible_truncation)]
fn bar_for(count: u64, max_count: u64) -> String {
    debug_assert!(count > 0 && count <= max_count);
    let width = (u128::from(count) * MAX_BAR_WIDTH as u128 / u128::from(max_count)) as usize;
    "█".repeat(width.max(1))
}

/// `1234567` → `"1,234,567"`.
fn group_digits(count: u64) -> String {
    let digits = count.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
