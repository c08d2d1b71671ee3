// Number formatters
//
// Shared formatting utilities for displaying amounts in the TUI.

/// Format a large number with commas for readability
///
/// # Examples
/// ```ignore
/// assert_eq!(format_number(1234567), "1,234,567");
/// assert_eq!(format_number(42), "42");
/// ```
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();

    for (count, ch) in s.chars().rev().enumerate() {
        if count > 0 && count % 3 == 0 {
            result.insert(0, ',');
        }
        result.insert(0, ch);
    }

    result
}

/// Format a dollar amount with grouped thousands and two decimals
///
/// # Examples
/// ```ignore
/// assert_eq!(format_amount(84532.0), "$84,532.00");
/// ```
pub fn format_amount(amount: f64) -> String {
    let whole = amount.trunc().abs() as u64;
    let cents = ((amount.abs() - amount.trunc().abs()) * 100.0).round() as u64;
    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, format_number(whole), cents)
}

/// Format a chart axis label compactly with a K suffix
///
/// # Examples
/// ```ignore
/// assert_eq!(format_axis_amount(45_000.0), "45K");
/// ```
pub fn format_axis_amount(amount: f64) -> String {
    if amount >= 1_000.0 {
        format!("{:.0}K", amount / 1_000.0)
    } else {
        format!("{:.0}", amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_group_thousands() {
        assert_eq!(format_amount(84_532.0), "$84,532.00");
        assert_eq!(format_amount(500.5), "$500.50");
        assert_eq!(format_amount(-1_200.0), "-$1,200.00");
    }

    #[test]
    fn axis_labels_are_compact() {
        assert_eq!(format_axis_amount(45_000.0), "45K");
        assert_eq!(format_axis_amount(0.0), "0");
    }
}
