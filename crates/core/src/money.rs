//! Money
//!
//! Currency amounts are [`Decimal`] values in BRL. Display rounding is
//! half-to-even at two decimal places with a `.` separator; the same policy
//! is used everywhere an amount reaches a document or a message so repeated
//! composition of the same snapshot is byte-identical.

use rust_decimal::{Decimal, RoundingStrategy};

/// Round an amount to two decimal places, half-to-even.
pub fn round_amount(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
}

/// Format an amount with exactly two decimal digits, e.g. `399.80`.
pub fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", round_amount(amount))
}

/// Format an amount with the `R$` prefix used in order messages.
pub fn format_brl(amount: Decimal) -> String {
    format!("R$ {}", format_amount(amount))
}
