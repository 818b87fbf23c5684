//! Reply formatting for projections and events.
//!
//! Everything here is presentation: the numbers come from the projector untouched.

use crate::{
    core::{
        calendar::LedgerClock,
        event::{EventKind, LedgerEvent},
        money,
        projector::{CustomerOverview, LedgerLine, Projection},
    },
    errors::Result,
};
use std::fmt::Write;

/// Discord rejects messages longer than this.
pub const MESSAGE_LIMIT: usize = 2000;

/// An amount with the currency symbol, e.g. `$12.50` or `-$2.00`.
#[must_use]
pub fn currency(symbol: &str, minor: i64) -> String {
    if minor < 0 {
        format!("-{symbol}{}", money::format_amount(minor).trim_start_matches('-'))
    } else {
        format!("{symbol}{}", money::format_amount(minor))
    }
}

/// One-line summary of an event, without a running balance.
#[must_use]
pub fn event_summary(event: &LedgerEvent, clock: &LedgerClock, symbol: &str) -> String {
    let sign = match event.kind {
        EventKind::Debt => '+',
        EventKind::Repayment => '-',
    };
    let mut line = format!(
        "`{} #{}` {} {sign}{} in **{}**",
        event.kind,
        event.id,
        event.local_date(clock),
        currency(symbol, event.amount),
        event.category
    );
    if !event.item_names.is_empty() {
        line.push_str(&format!(" [{}]", event.item_names.join(", ")));
    }
    if let Some(note) = event.note.as_deref().filter(|n| !n.is_empty()) {
        line.push_str(&format!(" - {note}"));
    }
    line
}

/// The size of a negative balance, without its sign.
fn credit(symbol: &str, balance: i64) -> String {
    format!(
        "{symbol}{}",
        money::format_amount(balance).trim_start_matches('-')
    )
}

fn ledger_line(line: &LedgerLine, clock: &LedgerClock, symbol: &str) -> String {
    format!(
        "{} → {}",
        event_summary(&line.event, clock, symbol),
        currency(symbol, line.running_balance)
    )
}

/// Renders a single projection under `title`.
pub fn projection(
    title: &str,
    projection: &Projection,
    clock: &LedgerClock,
    symbol: &str,
) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "**{title}**")?;
    writeln!(out, "Opening: {}", currency(symbol, projection.opening))?;
    if projection.entries.is_empty() {
        writeln!(out, "_No entries._")?;
    }
    for line in &projection.entries {
        writeln!(out, "• {}", ledger_line(line, clock, symbol))?;
    }
    write!(out, "Closing: **{}**", currency(symbol, projection.closing))?;
    Ok(truncate(out))
}

/// Renders a per-category overview of one customer.
pub fn overview(
    customer_name: &str,
    overview: &CustomerOverview,
    clock: &LedgerClock,
    symbol: &str,
) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "**{customer_name}**")?;
    if overview.rows.is_empty() {
        writeln!(out, "_No entries._")?;
    }
    for row in &overview.rows {
        writeln!(
            out,
            "__{}__: {} → **{}**",
            row.category,
            currency(symbol, row.opening),
            currency(symbol, row.closing)
        )?;
        for line in &row.entries {
            writeln!(out, "  • {}", ledger_line(line, clock, symbol))?;
        }
    }
    write!(out, "Total owed: **{}**", currency(symbol, overview.display_total()))?;
    if overview.total.closing < 0 {
        write!(out, " (in credit by {})", credit(symbol, overview.total.closing))?;
    }
    Ok(truncate(out))
}

/// Cuts a reply to fit in one Discord message.
#[must_use]
pub fn truncate(mut text: String) -> String {
    const MARKER: &str = "\n…";
    if text.chars().count() <= MESSAGE_LIMIT {
        return text;
    }
    let keep = MESSAGE_LIMIT - MARKER.chars().count();
    if let Some((byte_index, _)) = text.char_indices().nth(keep) {
        text.truncate(byte_index);
    }
    text.push_str(MARKER);
    text
}
