//! Terminal visualization for statistics.
//!
//! Provides ASCII charts, graphs, and visual representations.

use chrono::{Days, NaiveDate};
use std::collections::HashMap;

use super::engine::CalendarDay;
use crate::core::week_start_sunday;

/// Characters for bar chart rendering.
const BAR_CHARS: [char; 8] = [' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇'];
const FULL_BLOCK: char = '█';

/// Render a horizontal bar chart.
///
/// # Arguments
///
/// * `data` - Vec of (label, value) pairs
/// * `max_label_width` - Maximum width for labels
/// * `bar_width` - Width of the bar portion
///
/// # Returns
///
/// A multi-line string with the chart.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn render_bar_chart(data: &[(String, usize)], max_label_width: usize, bar_width: usize) -> String {
    if data.is_empty() {
        return String::new();
    }

    let max_value = data.iter().map(|(_, v)| *v).max().unwrap_or(1).max(1);
    let mut lines = Vec::new();

    for (label, value) in data {
        let truncated_label = if label.chars().count() > max_label_width {
            let head: String = label.chars().take(max_label_width.saturating_sub(3)).collect();
            format!("{head}...")
        } else {
            format!("{label:max_label_width$}")
        };

        let bar_length = (*value as f64 / max_value as f64 * bar_width as f64) as usize;
        let bar = FULL_BLOCK.to_string().repeat(bar_length);
        let padding = " ".repeat(bar_width - bar_length);

        lines.push(format!("{truncated_label} |{bar}{padding} {value}"));
    }

    lines.join("\n")
}

/// Render a sparkline (compact inline chart).
///
/// # Arguments
///
/// * `values` - Slice of values to render
///
/// # Returns
///
/// A single-line string with the sparkline.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn render_sparkline(values: &[usize]) -> String {
    if values.is_empty() {
        return String::new();
    }

    let max_value = values.iter().max().copied().unwrap_or(1).max(1);

    values
        .iter()
        .map(|&v| {
            let normalized = (v as f64 / max_value as f64 * 7.0) as usize;
            if v == 0 {
                BAR_CHARS[0]
            } else {
                BAR_CHARS[normalized.clamp(1, 7)]
            }
        })
        .collect()
}

/// Render a completion heatmap.
///
/// Rows are weekdays starting on Sunday, columns are weeks. Intensity follows
/// each day's completion rate; days without entries show as `·`.
///
/// # Returns
///
/// Multi-line string with the heatmap.
pub fn render_heatmap(days: &[CalendarDay], start: NaiveDate, end: NaiveDate) -> String {
    let by_date: HashMap<NaiveDate, u32> =
        days.iter().map(|d| (d.date, d.completion_rate)).collect();

    let first_week = week_start_sunday(start);
    let weeks = usize::try_from((end - first_week).num_days() / 7 + 1).unwrap_or(0);

    let mut lines = Vec::new();
    let day_labels = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

    for (day_idx, label) in day_labels.iter().enumerate() {
        let mut row = format!("{label} ");

        for week in 0..weeks {
            let offset = u64::try_from(week * 7 + day_idx).unwrap_or(u64::MAX);
            let Some(date) = first_week.checked_add_days(Days::new(offset)) else {
                break;
            };

            if date < start || date > end {
                row.push(' ');
                continue;
            }

            let cell = match by_date.get(&date).copied() {
                None => '·',
                Some(0..=24) => '░',
                Some(25..=49) => '▒',
                Some(50..=74) => '▓',
                Some(_) => '█',
            };
            row.push(cell);
        }

        lines.push(row.trim_end().to_string());
    }

    lines.push(String::new());
    lines.push("Legend: · = none  ░ = <25%  ▒ = <50%  ▓ = <75%  █ = 75%+".to_string());

    lines.join("\n")
}

/// Render a simple progress bar.
///
/// # Arguments
///
/// * `current` - Current value
/// * `total` - Total value
/// * `width` - Width of the progress bar
///
/// # Returns
///
/// A single-line string with the progress bar.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn render_progress_bar(current: usize, total: usize, width: usize) -> String {
    let total = total.max(1);
    let progress = (current as f64 / total as f64).min(1.0);
    let filled = (progress * width as f64) as usize;
    let empty = width - filled;

    let bar = format!(
        "[{}{}]",
        FULL_BLOCK.to_string().repeat(filled),
        "░".repeat(empty)
    );

    format!("{bar} {:.0}%", progress * 100.0)
}

/// Render a summary box with key metrics.
///
/// # Arguments
///
/// * `title` - Box title
/// * `items` - Vec of (label, value) pairs
///
/// # Returns
///
/// Multi-line string with a bordered box.
pub fn render_summary_box(title: &str, items: &[(&str, String)]) -> String {
    let width = |s: &str| s.chars().count();
    let max_label_len = items.iter().map(|(l, _)| width(l)).max().unwrap_or(0);
    let max_value_len = items.iter().map(|(_, v)| width(v)).max().unwrap_or(0);
    let content_width = max_label_len + max_value_len + 3; // " : "
    let box_width = content_width.max(width(title)) + 4;

    let mut lines = Vec::new();

    lines.push(format!("┌{}┐", "─".repeat(box_width)));

    let title_padding = (box_width - width(title)) / 2;
    lines.push(format!(
        "│{}{}{}│",
        " ".repeat(title_padding),
        title,
        " ".repeat(box_width - title_padding - width(title))
    ));

    lines.push(format!("├{}┤", "─".repeat(box_width)));

    for (label, value) in items {
        let item_str = format!("{label:>max_label_len$} : {value}");
        let padding = box_width - width(&item_str);
        lines.push(format!("│ {}{} │", item_str, " ".repeat(padding - 2)));
    }

    lines.push(format!("└{}┘", "─".repeat(box_width)));

    lines.join("\n")
}
