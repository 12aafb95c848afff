//! Money

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, iso};

/// Converts a Rupiah amount into an IDR money value.
///
/// Returns `None` when the amount does not fit in minor units.
pub fn rupiah(amount: Decimal) -> Option<Money<'static, iso::Currency>> {
    to_minor_units(amount).map(|minor| Money::from_minor(minor, iso::IDR))
}

/// Formats a Rupiah amount for display.
pub fn format_rupiah(amount: Decimal) -> String {
    rupiah(amount).map_or_else(|| format!("IDR {amount}"), |money| format!("{money}"))
}

/// Line subtotal: unit price times quantity, saturating at the decimal range.
pub fn line_total(unit_price: Decimal, quantity: Decimal) -> Decimal {
    unit_price.saturating_mul(quantity)
}

/// Sum of amounts, saturating at the decimal range.
pub fn sum(amounts: impl IntoIterator<Item = Decimal>) -> Decimal {
    amounts
        .into_iter()
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

fn to_minor_units(amount: Decimal) -> Option<i64> {
    amount
        .checked_mul(Decimal::ONE_HUNDRED)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
}
