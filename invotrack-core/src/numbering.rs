//! Sequential `INV-###` invoice numbers.

use std::sync::OnceLock;

use regex::Regex;

/// Prefix shared by every generated invoice number.
pub const NUMBER_PREFIX: &str = "INV-";

const NUMBER_PAD: usize = 3;

fn number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"INV-(\d+)").expect("invoice number pattern is valid"))
}

/// Extracts the counter from the first `INV-<digits>` run in `number`.
///
/// The match is unanchored, so `INV-202401-007` reads as 202401 and
/// `INV-005a` as 5. Returns `None` when there is no such run or the digits
/// do not fit in `u64`.
pub fn parse_invoice_number(number: &str) -> Option<u64> {
    let digits = number_pattern().captures(number)?.get(1)?;
    digits.as_str().parse().ok()
}

/// Formats `n` as `INV-` followed by at least three digits.
pub fn format_invoice_number(n: u64) -> String {
    format!("{}{:0>width$}", NUMBER_PREFIX, n, width = NUMBER_PAD)
}

/// Monotonic invoice number allocator.
///
/// Seeded from the highest suffix among existing numbers so that new numbers
/// continue the sequence without reuse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InvoiceNumberSequence {
    last: u64,
}

impl InvoiceNumberSequence {
    pub fn starting_after(last: u64) -> Self {
        Self { last }
    }

    /// Seeds the sequence from existing numbers; unparseable entries count as 0.
    pub fn seeded_from<'a, I>(numbers: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let last = numbers
            .into_iter()
            .filter_map(parse_invoice_number)
            .max()
            .unwrap_or(0);
        Self { last }
    }

    /// Last allocated (or seeded) counter value.
    pub fn last(&self) -> u64 {
        self.last
    }

    /// Counter value the next allocation will use, or `None` once the counter
    /// is exhausted.
    pub fn peek(&self) -> Option<u64> {
        self.last.checked_add(1)
    }

    /// Allocates the next number.
    ///
    /// Returns `None` without changing the sequence when the counter cannot
    /// grow any further.
    pub fn advance(&mut self) -> Option<String> {
        let next = self.peek()?;
        self.last = next;
        Some(format_invoice_number(next))
    }
}
