//! Text formatting functions for `equipment_tracker`.
//!
//! Provides plain text (non-ANSI) formatting for terminal output:
//! - Change type icons (+ - * x ~)
//! - Equipment tables aligned by display width
//! - Transaction log lines
//! - The inventory status line

use chrono::{DateTime, Local, Utc};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::model::{ChangeType, Equipment, Transaction};
use crate::storage::InventorySummary;

/// Change type marker characters.
pub mod icons {
    /// Item created.
    pub const CREATE: &str = "*";
    /// Metadata edited.
    pub const UPDATE: &str = "~";
    /// Stock added.
    pub const ADD: &str = "+";
    /// Stock removed.
    pub const REMOVE: &str = "-";
    /// Item deleted.
    pub const DELETE: &str = "x";
    /// Low stock flag in tables.
    pub const LOW_STOCK: &str = "!";
}

const NAME_COLUMN_MAX: usize = 40;

#[must_use]
pub const fn format_change_icon(change_type: ChangeType) -> &'static str {
    match change_type {
        ChangeType::Create => icons::CREATE,
        ChangeType::Update => icons::UPDATE,
        ChangeType::Add => icons::ADD,
        ChangeType::Remove => icons::REMOVE,
        ChangeType::Delete => icons::DELETE,
    }
}

/// Local wall-clock rendering (`2026-01-19 14:30`).
#[must_use]
pub fn format_local_time(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

/// Cut `s` to at most `width` display columns, marking the cut with `…`.
#[must_use]
pub fn truncate_to_width(s: &str, width: usize) -> String {
    if s.width() <= width {
        return s.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// Left-align `s` in `width` display columns.
#[must_use]
pub fn pad_to_width(s: &str, width: usize) -> String {
    let pad = width.saturating_sub(s.width());
    format!("{s}{}", " ".repeat(pad))
}

/// One-line summary: `{id} {name} x{quantity} [{category}]`.
#[must_use]
pub fn format_equipment_line(item: &Equipment) -> String {
    let mut line = format!("{} {} x{}", item.id, item.name, item.quantity);
    if let Some(category) = &item.category {
        line.push_str(&format!(" [{category}]"));
    }
    if item.is_low_stock() {
        line.push_str(&format!(" {}", icons::LOW_STOCK));
    }
    line
}

/// Aligned table with a header row. Low-stock rows carry a `!` marker.
#[must_use]
pub fn format_equipment_table(items: &[Equipment], show_low_stock: bool) -> String {
    let headers = ["ID", "NAME", "QTY", "MIN", "CATEGORY", "UPDATED"];
    let rows: Vec<[String; 6]> = items
        .iter()
        .map(|item| {
            [
                item.id.clone(),
                truncate_to_width(&item.name, NAME_COLUMN_MAX),
                item.quantity.to_string(),
                item.min_stock_level.to_string(),
                item.category.clone().unwrap_or_default(),
                format_local_time(item.last_updated),
            ]
        })
        .collect();

    let mut widths = headers.map(|h| h.width());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.width());
        }
    }

    let mut out = String::new();
    let render = |cells: &[&str], marker: &str, out: &mut String| {
        out.push_str(marker);
        let line: Vec<String> = cells
            .iter()
            .zip(widths.iter())
            .map(|(cell, width)| pad_to_width(cell, *width))
            .collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    };

    render(&headers, "  ", &mut out);
    for (item, row) in items.iter().zip(rows.iter()) {
        let marker = if show_low_stock && item.is_low_stock() {
            "! "
        } else {
            "  "
        };
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        render(&cells, marker, &mut out);
    }
    out
}

/// `#{id} {time} {icon} {name} ({id}) {old} -> {new}  {notes}`
#[must_use]
pub fn format_transaction_line(tx: &Transaction) -> String {
    let mut line = format!(
        "#{:<5} {} {} {:<6} {} ({}) {} -> {}",
        tx.id,
        format_local_time(tx.timestamp),
        format_change_icon(tx.change_type),
        tx.change_type.as_str(),
        tx.equipment_name,
        tx.equipment_id,
        tx.old_quantity,
        tx.new_quantity,
    );
    if !tx.notes.is_empty() {
        line.push_str("  ");
        line.push_str(&tx.notes);
    }
    line
}

/// `Total Equipment: N | Low Stock Alerts: M`
#[must_use]
pub fn format_status_line(summary: &InventorySummary) -> String {
    format!(
        "Total Equipment: {} | Low Stock Alerts: {}",
        summary.total_items, summary.low_stock_items
    )
}
