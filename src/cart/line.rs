//! Cart Lines

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::uuids::TypedUuid;

/// Cart Line Id
pub type LineId = TypedUuid<CartLine>;

/// Option labels attached to a line, in the order they were chosen.
pub type LineOptions = SmallVec<[String; 3]>;

/// A single normalized cart entry: one distinct `(name, unit price, options)`
/// combination and how many of it were ordered.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    id: LineId,
    name: String,
    #[serde(with = "rust_decimal::serde::float")]
    unit_price: Decimal,
    options: LineOptions,
    quantity: u32,
}

impl CartLine {
    /// Creates a new line with a freshly generated id.
    pub fn new(
        name: impl Into<String>,
        unit_price: Decimal,
        options: LineOptions,
        quantity: u32,
    ) -> Self {
        Self {
            id: LineId::generate(),
            name: name.into(),
            unit_price,
            options,
            quantity,
        }
    }

    /// Returns the line id
    pub fn id(&self) -> LineId {
        self.id
    }

    /// Returns the display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the price of one unit
    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    /// Returns the option labels
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Returns the quantity
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Whether this line holds the given `(name, price, options)` combination.
    ///
    /// Options are compared as an ordered sequence.
    pub fn is_same_line(&self, name: &str, unit_price: Decimal, options: &[String]) -> bool {
        self.name == name && self.unit_price == unit_price && self.options.as_slice() == options
    }

    pub(crate) fn increase_quantity(&mut self, by: u32) {
        self.quantity = self.quantity.saturating_add(by);
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use smallvec::smallvec;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn same_line_requires_identical_options_order() {
        let line = CartLine::new(
            "Menu Best Of Big",
            Decimal::new(700, 2),
            smallvec!["Frites".to_string(), "Cola".to_string()],
            1,
        );

        let same = ["Frites".to_string(), "Cola".to_string()];
        let swapped = ["Cola".to_string(), "Frites".to_string()];

        assert!(line.is_same_line("Menu Best Of Big", Decimal::new(7, 0), &same));
        assert!(!line.is_same_line("Menu Best Of Big", Decimal::new(7, 0), &swapped));
    }

    #[test]
    fn same_line_compares_price_numerically() {
        let line = CartLine::new("Cheeseburger", Decimal::new(250, 2), smallvec![], 1);

        assert!(line.is_same_line("Cheeseburger", Decimal::new(25, 1), &[]));
        assert!(!line.is_same_line("Cheeseburger", Decimal::new(251, 2), &[]));
    }

    #[test]
    fn serializes_with_camel_case_fields_and_numeric_price() -> TestResult {
        let line = CartLine::new("Coca-Cola", Decimal::new(240, 2), smallvec!["50 cl".into()], 2);

        let json = serde_json::to_value(&line)?;

        assert_eq!(json.pointer("/name"), Some(&json!("Coca-Cola")));
        assert_eq!(json.pointer("/unitPrice"), Some(&json!(2.4)));
        assert_eq!(json.pointer("/options/0"), Some(&json!("50 cl")));
        assert_eq!(json.pointer("/quantity"), Some(&json!(2)));

        Ok(())
    }

    #[test]
    fn increase_quantity_saturates() {
        let mut line = CartLine::new("Sundae", Decimal::ONE, smallvec![], u32::MAX - 1);

        line.increase_quantity(5);

        assert_eq!(line.quantity(), u32::MAX);
    }
}
