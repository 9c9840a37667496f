//! Prices

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};

use crate::cart::CartLine;

/// Surcharge added to a menu when the maxi variant is chosen.
pub const MAXI_SURCHARGE: Decimal = Decimal::ONE;

/// Surcharge added to a standalone drink when the large size is chosen.
pub const LARGE_DRINK_SURCHARGE: Decimal = Decimal::from_parts(50, 0, 0, false, 2);

/// Price of a single line: unit price times quantity.
pub fn line_total(line: &CartLine) -> Decimal {
    line.unit_price() * Decimal::from(line.quantity())
}

/// Calculates the total price of a list of cart lines.
///
/// An empty list totals to zero in the given currency.
pub fn total_price<'a>(lines: &[CartLine], currency: &'a Currency) -> Money<'a, Currency> {
    let amount: Decimal = lines.iter().map(line_total).sum();

    Money::from_decimal(amount, currency)
}

/// Formats money for the kiosk display: two decimals, a comma separator and
/// the currency symbol after the amount (`15,00 €`).
pub fn format_money(money: &Money<'_, Currency>) -> String {
    let amount = money.amount().round_dp(2);
    let digits = format!("{amount:.2}").replace('.', ",");

    format!("{digits} {}", money.currency().symbol)
}
