//! Display formatting for amounts and dates (Indonesian locale conventions).

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::Currency;

/// Formats an amount the way the tracker displays money: `.` groups thousands
/// and `,` separates decimals.
///
/// IDR is shown without decimals (`Rp 1.000.000`), USD with two (`US$ 1.000,00`).
pub fn format_amount(amount: Decimal, currency: Currency) -> String {
    let (symbol, decimals) = match currency {
        Currency::Idr => ("Rp", 0),
        Currency::Usd => ("US$", 2),
    };

    let rounded = amount.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    let plain = format!("{:.*}", decimals as usize, rounded.abs());
    let (int_part, frac_part) = match plain.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (plain.as_str(), None),
    };

    let mut out = String::new();
    if rounded.is_sign_negative() && !rounded.is_zero() {
        out.push('-');
    }
    out.push_str(symbol);
    out.push(' ');
    out.push_str(&group_thousands(int_part));
    if let Some(frac) = frac_part {
        out.push(',');
        out.push_str(frac);
    }
    out
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    grouped
}

/// Short calendar date, e.g. `8 Jan 2024`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%-d %b %Y").to_string()
}
