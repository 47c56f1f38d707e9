//! Display utilities for terminal output.
//!
//! Shared formatting used by the `date-range` CLI.
//!
//! # Functions
//!
//! - [`make_bar`] - Create visual bar charts for relative values
//! - [`print_section`] / [`print_section_simple`] - Print section headers
//! - [`display_selection`] / [`display_derived`] / [`display_presets`] - Display picker state

use std::fmt;

use chrono::{DateTime, NaiveDate, TimeZone};

use crate::preset::Preset;
use crate::selection::{Derived, SelectionState, CIVIL_DATE_FORMAT};
use crate::session::Origin;
use crate::validate::Policy;

/// Create a visual bar for displaying relative values.
///
/// Uses Unicode block characters to create a proportional bar chart.
///
/// # Arguments
///
/// * `value` - The value to represent (negative values treated as 0)
/// * `max_value` - The maximum value (determines 100% width)
/// * `width` - The total width of the bar in characters
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss, clippy::cast_sign_loss)]
pub fn make_bar(value: i64, max_value: i64, width: usize) -> String {
    if max_value <= 0 || value <= 0 {
        return " ".repeat(width);
    }
    let ratio = (value as f64 / max_value as f64).clamp(0.0, 1.0);
    let filled = (ratio * width as f64) as usize;
    let empty = width.saturating_sub(filled);
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

/// Print a section header with equals signs.
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(50));
    println!("  {title}");
    println!("{}", "=".repeat(50));
}

/// Print a simple section header with dashes.
pub fn print_section_simple(title: &str) {
    println!("\n{title}");
    println!("{}", "-".repeat(30));
}

fn civil_or_dash(date: Option<NaiveDate>) -> String {
    date.map_or_else(|| "-".to_string(), |d| d.format(CIVIL_DATE_FORMAT).to_string())
}

/// Display the stored selection and where the session got it from.
pub fn display_selection(selection: &SelectionState, origin: Origin) {
    println!(
        "  Preset:           {} ({})",
        selection.preset.display_name(),
        selection.preset
    );
    println!("  Loaded from:      {}", origin.label());
    println!("  Custom start:     {}", civil_or_dash(selection.custom_start));
    println!("  Custom end:       {}", civil_or_dash(selection.custom_end));
}

/// Display the resolved range and every violation found.
pub fn display_derived<Tz>(derived: &Derived<Tz>, policy: &Policy)
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let Some(range) = derived.range.as_ref() else {
        println!("  Range:            (pick both a start and an end date)");
        return;
    };

    let days = range.inclusive_days();
    println!("  Range:            {range}");
    println!("  Start:            {}", range.start_iso());
    println!("  End:              {}", range.end_iso());
    println!("  Days:             {:>10}", days.get());

    if let Some(max_days) = policy.window_limit() {
        let bar = make_bar(days.get(), i64::from(max_days), 20);
        println!("  Window:           {bar} {days}/{max_days}");
    }

    if derived.outcome.is_valid() {
        println!("  Status:           ready to apply");
    } else {
        for message in derived.outcome.messages() {
            println!("  ! {message}");
        }
    }
}

/// Display every preset resolved at `now`.
pub fn display_presets<Tz: TimeZone>(presets: &[(Preset, Derived<Tz>)], current: Preset) {
    for (preset, derived) in presets {
        let marker = if *preset == current { "*" } else { " " };
        let range = derived
            .range
            .as_ref()
            .map_or_else(|| "-".to_string(), ToString::to_string);
        let status = if derived.is_unresolved() {
            ""
        } else if derived.outcome.is_valid() {
            "ok"
        } else {
            "blocked"
        };
        println!(
            " {marker} {:<10} {:<14} {:<25} {status}",
            preset.as_str(),
            preset.display_name(),
            range
        );
    }
}

/// Latest selectable date hint, when capped.
#[must_use]
pub fn input_cap_hint<Tz: TimeZone>(policy: &Policy, now: &DateTime<Tz>) -> Option<String> {
    policy
        .max_input_date(now)
        .map(|d| format!("dates after {} are not selectable", d.format(CIVIL_DATE_FORMAT)))
}
