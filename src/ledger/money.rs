//! Fixed-point money representation.
//!
//! All prices are exact multiples of one cent; floats exist only at the
//! presentation and serialization boundary.

/// Signed fixed-point amount with 2 decimal places (cents).
/// This avoids floating point drift in the ledger itself.
pub type Cents = i64;

/// Conversion factor: 1 currency unit = 100 cents.
pub const CENT_SCALE: i64 = 100;

/// Convert a two-decimal float (e.g. a deserialized price) to `Cents`.
#[inline]
pub fn to_cents(value: f64) -> Cents {
    (value * CENT_SCALE as f64).round() as Cents
}

/// Convert `Cents` back to a float for display or serialization.
#[inline]
pub fn from_cents(cents: Cents) -> f64 {
    cents as f64 / CENT_SCALE as f64
}
