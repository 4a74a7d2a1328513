//! Price-input parsing with shift-register digit semantics.
//!
//! The displayed, already-formatted amount is re-consumed as raw text on
//! every edit: new keystrokes push digits in from the right, and the last
//! two digits always represent cents. Typing `5` into `0,00` yields `0,05`;
//! typing `3` into that yields `0,53`.

use crate::ledger::money::Cents;

/// Parse a raw edited display string into signed cents.
///
/// The sign is taken from whatever remains once digits, commas and periods
/// are stripped; the magnitude is the remaining digit string read as an
/// integer number of cents. There is no failure mode: input without usable
/// digits degrades to 0.
pub fn parse_price(input: &str) -> Cents {
    let non_numeric: String = input
        .chars()
        .filter(|c| !(c.is_ascii_digit() || *c == ',' || *c == '.'))
        .collect();
    let negative = non_numeric.starts_with('-');

    let digits: String = input.chars().filter(|c| c.is_ascii_digit()).collect();
    let magnitude: Cents = digits.parse().unwrap_or(0);

    if negative {
        -magnitude
    } else {
        magnitude
    }
}
