//! Terminal output helpers.
//!
//! Boxed sections for summaries, one-glyph status lines for everything
//! else. The console crate drops the colors on its own when stdout is not
//! a terminal; [`is_terminal`] is for callers that want to switch to
//! plain, greppable output entirely.

#![allow(dead_code)]

use std::time::Duration;

use console::{measure_text_width, style};
use indicatif::{ProgressBar, ProgressStyle};

/// Outer width of boxed sections, borders included.
const BOX_WIDTH: usize = 56;

pub mod colors {
    use console::Color;

    /// Moss green, the all-clear color.
    pub const ACCENT: Color = Color::Color256(108);
    /// Copper, for drift and findings.
    pub const WARN: Color = Color::Color256(173);
    /// Rust red, for failures.
    pub const FAIL: Color = Color::Color256(167);
    /// Slate blue, for hints.
    pub const INFO: Color = Color::Color256(67);
    /// Grey, for everything incidental.
    pub const MUTED: Color = Color::Color256(246);
}

pub mod symbols {
    pub const OK: &str = "●";
    pub const WARN: &str = "▲";
    pub const FAIL: &str = "✖";
    pub const ARROW: &str = "→";
    pub const DOT: &str = "·";
    pub const BAR_FULL: &str = "█";
    pub const BAR_EMPTY: &str = "░";
}

/// Whether stdout is an interactive terminal.
pub fn is_terminal() -> bool {
    atty::is(atty::Stream::Stdout)
}

pub fn box_header(title: &str) {
    let inner = BOX_WIDTH - 2;
    println!("{}", style(format!("╭{}╮", "─".repeat(inner))).fg(colors::MUTED));
    box_line(&style(title).bold().to_string());
    println!("{}", style(format!("├{}┤", "─".repeat(inner))).fg(colors::MUTED));
}

pub fn box_line(content: &str) {
    println!("{}", compose_line(content));
}

pub fn box_footer() {
    let inner = BOX_WIDTH - 2;
    println!("{}", style(format!("╰{}╯", "─".repeat(inner))).fg(colors::MUTED));
}

fn compose_line(content: &str) -> String {
    let inner = BOX_WIDTH - 2;
    let pad = inner.saturating_sub(measure_text_width(content) + 1);
    format!(
        "{} {}{}{}",
        style("│").fg(colors::MUTED),
        content,
        " ".repeat(pad),
        style("│").fg(colors::MUTED),
    )
}

pub fn success(message: &str) {
    println!("  {} {}", style(symbols::OK).fg(colors::ACCENT), message);
}

pub fn warn(message: &str) {
    println!("  {} {}", style(symbols::WARN).fg(colors::WARN), message);
}

pub fn error(message: &str) {
    eprintln!("  {} {}", style(symbols::FAIL).fg(colors::FAIL), message);
}

pub fn info(message: &str) {
    println!("  {} {}", style(symbols::ARROW).fg(colors::INFO), message);
}

pub fn dim(message: &str) {
    println!("  {}", style(message).fg(colors::MUTED));
}

pub fn blank() {
    println!();
}

/// One per-schema drift line: padded name, matching-fields bar, deltas.
pub fn drift_summary(name: &str, new_fields: usize, removed_fields: usize, matching: usize) -> String {
    let cells = 10;
    let total = matching + new_fields + removed_fields;
    let filled = matching_cells(matching, total, cells);

    let bar = format!(
        "{}{}",
        style(symbols::BAR_FULL.repeat(filled)).fg(colors::ACCENT),
        style(symbols::BAR_EMPTY.repeat(cells - filled)).fg(colors::MUTED),
    );
    let deltas = format!("+{new_fields} -{removed_fields}");
    let deltas = if new_fields + removed_fields == 0 {
        style(deltas).fg(colors::MUTED)
    } else {
        style(deltas).fg(colors::WARN)
    };

    let padded = format!("{name:<20}");
    format!("{} {bar} {deltas}", style(padded).bold())
}

// An empty schema counts as fully matching; there is nothing to drift.
fn matching_cells(matching: usize, total: usize, cells: usize) -> usize {
    if total == 0 {
        cells
    } else {
        matching * cells / total
    }
}

pub fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "·"])
            .template("{spinner} {msg}")
            .unwrap(),
    );
    bar.enable_steady_tick(Duration::from_millis(80));
    bar.set_message(message.to_string());
    bar
}

/// Elapsed-time footer line.
pub fn timing(elapsed: Duration) {
    dim(&format!("done in {}", format_duration(elapsed)));
}

fn format_duration(elapsed: Duration) -> String {
    let millis = elapsed.as_millis();
    if millis < 1000 {
        format!("{millis}ms")
    } else {
        format!("{:.2}s", elapsed.as_secs_f64())
    }
}
