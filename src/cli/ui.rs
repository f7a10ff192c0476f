use crate::core::currency::{Currency, format_currency};
use crate::core::domain::ExpiryStatus;
use crate::core::notice::{Notice, NoticeKind};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    TotalLabel,
    TotalValue,
    Error,
    Warning,
    Success,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::TotalLabel => style(text).bold(),
        StyleType::TotalValue => style(text).green().bold(),
        StyleType::Error => style(text).red(),
        StyleType::Warning => style(text).yellow(),
        StyleType::Success => style(text).green(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Right aligned amount with the currency symbol.
pub fn money_cell(amount: f64, currency: Currency) -> Cell {
    Cell::new(format_currency(amount, currency)).set_alignment(CellAlignment::Right)
}

/// Formats an `Option<T>` into a `Cell`. `None` is displayed as "N/A".
pub fn format_optional_cell<T>(value: Option<T>, format_fn: impl Fn(T) -> String) -> Cell {
    value.map_or(
        Cell::new("N/A")
            .fg(Color::DarkGrey)
            .set_alignment(CellAlignment::Right),
        |v| Cell::new(format_fn(v)).set_alignment(CellAlignment::Right),
    )
}

/// Budget usage in percent; green while within budget, red once over it.
pub fn usage_cell(percent: f64) -> Cell {
    let color = if percent > 100.0 {
        Color::Red
    } else if percent > 80.0 {
        Color::Yellow
    } else {
        Color::Green
    };
    Cell::new(format!("{percent:.2}%"))
        .fg(color)
        .set_alignment(CellAlignment::Right)
}

/// Days left and status band of a domain, color coded by urgency.
pub fn expiry_cells(days_left: i64, status: ExpiryStatus) -> [Cell; 2] {
    let color = match status {
        ExpiryStatus::Expired | ExpiryStatus::Critical => Color::Red,
        ExpiryStatus::Warning => Color::Yellow,
        ExpiryStatus::Attention => Color::Blue,
        ExpiryStatus::Safe => Color::Green,
    };
    [
        Cell::new(days_left)
            .fg(color)
            .set_alignment(CellAlignment::Right),
        Cell::new(status).fg(color),
    ]
}

/// Creates a spinner shown while waiting on the network.
pub fn new_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}")
    {
        pb.set_style(spinner_style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

pub fn format_notice(notice: &Notice) -> String {
    match notice.kind {
        NoticeKind::Default => notice.message.clone(),
        NoticeKind::Error => style_text(&format!("Error: {}", notice.message), StyleType::Error),
        NoticeKind::Warning => {
            style_text(&format!("Warning: {}", notice.message), StyleType::Warning)
        }
        NoticeKind::Success => style_text(&notice.message, StyleType::Success),
    }
}

pub fn print_notices(notices: &[Notice]) {
    for notice in notices {
        eprintln!("{}", format_notice(notice));
    }
}

/// Prints a separator line matching the terminal width.
pub fn print_separator() {
    let term_width = console::Term::stdout()
        .size_checked()
        .map(|(_, w)| w as usize)
        .unwrap_or(80);
    println!("\n{}", "─".repeat(term_width));
}
