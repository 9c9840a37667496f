//! Cart

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use tracing::debug;

use crate::pricing::{format_money, total_price};

pub mod engine;
pub mod line;

pub use engine::{CartEngine, CartListener, MockCartListener, NoopListener};
pub use line::{CartLine, LineId, LineOptions};

/// Ordered sequence of cart lines; insertion order is display order.
///
/// Lines are unique by `(name, unit price, options)`: adding an existing
/// combination again bumps its quantity instead of appending a new line.
#[derive(Clone, Debug, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
    currency: &'static Currency,
}

impl Cart {
    /// Create a new, empty cart.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Cart {
            lines: Vec::new(),
            currency,
        }
    }

    /// Create a cart from previously persisted lines.
    ///
    /// Lines with a zero quantity are dropped. Lines repeating an earlier
    /// `(name, unit price, options)` combination are folded into it, keeping
    /// the earlier line's id.
    pub fn with_lines(
        lines: impl IntoIterator<Item = CartLine>,
        currency: &'static Currency,
    ) -> Self {
        let mut cart = Cart::new(currency);

        for line in lines {
            if line.quantity() == 0 {
                continue;
            }

            let existing = cart.lines.iter_mut().find(|existing| {
                existing.is_same_line(line.name(), line.unit_price(), line.options())
            });

            if let Some(existing) = existing {
                debug!(name = line.name(), "merging duplicate persisted line");

                existing.increase_quantity(line.quantity());
            } else {
                cart.lines.push(line);
            }
        }

        cart
    }

    /// Add `quantity` units of a `(name, price, options)` combination.
    ///
    /// Returns the id of the line that now holds it, or `None` when
    /// `quantity` is zero and nothing was added.
    pub fn add(
        &mut self,
        name: &str,
        unit_price: Decimal,
        options: LineOptions,
        quantity: u32,
    ) -> Option<LineId> {
        if quantity == 0 {
            debug!(name, "ignoring add with zero quantity");

            return None;
        }

        if let Some(existing) = self
            .lines
            .iter_mut()
            .find(|line| line.is_same_line(name, unit_price, &options))
        {
            existing.increase_quantity(quantity);

            return Some(existing.id());
        }

        let line = CartLine::new(name, unit_price, options, quantity);
        let id = line.id();

        self.lines.push(line);

        Some(id)
    }

    /// Remove the line with the given id.
    ///
    /// Returns whether a line was removed; unknown ids are ignored.
    pub fn remove(&mut self, id: LineId) -> bool {
        let before = self.lines.len();

        self.lines.retain(|line| line.id() != id);

        self.lines.len() != before
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of unit price times quantity over all lines.
    pub fn total(&self) -> Money<'static, Currency> {
        total_price(&self.lines, self.currency)
    }

    /// Total formatted for display, e.g. `15,00 €`.
    pub fn formatted_total(&self) -> String {
        format_money(&self.total())
    }

    /// Get a line by id.
    pub fn get(&self, id: LineId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.id() == id)
    }

    /// The lines in display order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Iterate over the lines in display order.
    pub fn iter(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.iter()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Get the currency of the cart.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartLine;
    type IntoIter = std::slice::Iter<'a, CartLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::EUR;
    use smallvec::smallvec;
    use testresult::TestResult;

    use super::*;

    fn options(labels: &[&str]) -> LineOptions {
        labels.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn repeat_add_merges_into_one_line() -> TestResult {
        let mut cart = Cart::new(EUR);

        let first = cart.add("Burger", Decimal::new(500, 2), smallvec![], 1);
        let second = cart.add("Burger", Decimal::new(500, 2), smallvec![], 2);

        assert_eq!(first, second);
        assert_eq!(cart.len(), 1);

        let line = cart.lines().first().ok_or("expected a line")?;

        assert_eq!(line.quantity(), 3);
        assert_eq!(cart.total(), Money::from_decimal(Decimal::new(15, 0), EUR));

        Ok(())
    }

    #[test]
    fn different_options_create_separate_lines() {
        let mut cart = Cart::new(EUR);

        cart.add("Menu Best Of Big", Decimal::new(7, 0), options(&["Frites", "Cola"]), 1);
        cart.add("Menu Best Of Big", Decimal::new(7, 0), options(&["Potatoes", "Cola"]), 1);
        cart.add("Menu Best Of Big", Decimal::new(7, 0), options(&["Cola", "Frites"]), 1);

        assert_eq!(cart.len(), 3);
    }

    #[test]
    fn different_price_creates_separate_line() {
        let mut cart = Cart::new(EUR);

        cart.add("Coca-Cola", Decimal::new(190, 2), options(&["30 cl"]), 1);
        cart.add("Coca-Cola", Decimal::new(240, 2), options(&["30 cl"]), 1);

        assert_eq!(cart.len(), 2);
    }

    #[test]
    fn add_zero_quantity_is_ignored() {
        let mut cart = Cart::new(EUR);

        assert_eq!(cart.add("Burger", Decimal::ONE, smallvec![], 0), None);
        assert!(cart.is_empty());
    }

    #[test]
    fn lines_keep_insertion_order() {
        let mut cart = Cart::new(EUR);

        cart.add("Wrap", Decimal::new(4, 0), smallvec![], 1);
        cart.add("Salade", Decimal::new(6, 0), smallvec![], 1);
        cart.add("Wrap", Decimal::new(4, 0), smallvec![], 1);

        let names: Vec<&str> = cart.iter().map(CartLine::name).collect();

        assert_eq!(names, vec!["Wrap", "Salade"]);
    }

    #[test]
    fn remove_is_idempotent() -> TestResult {
        let mut cart = Cart::new(EUR);

        let burger = cart
            .add("Burger", Decimal::new(5, 0), smallvec![], 1)
            .ok_or("expected id")?;
        cart.add("Frites", Decimal::new(3, 0), smallvec![], 1);

        assert!(cart.remove(burger));

        let after_first = cart.clone();

        assert!(!cart.remove(burger));
        assert_eq!(cart, after_first);
        assert_eq!(cart.len(), 1);

        Ok(())
    }

    #[test]
    fn clear_empties_cart_and_zeroes_total() {
        let mut cart = Cart::new(EUR);

        cart.add("Burger", Decimal::new(5, 0), smallvec![], 2);
        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart.total(), Money::from_minor(0, EUR));
    }

    #[test]
    fn formatted_total_uses_display_format() {
        let mut cart = Cart::new(EUR);

        cart.add("Burger", Decimal::new(5, 0), smallvec![], 3);

        assert_eq!(cart.formatted_total(), "15,00 €");
    }

    #[test]
    fn with_lines_drops_zero_quantity_lines() {
        let lines = [
            CartLine::new("Burger", Decimal::ONE, smallvec![], 0),
            CartLine::new("Frites", Decimal::ONE, smallvec![], 2),
        ];

        let cart = Cart::with_lines(lines, EUR);

        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn with_lines_merges_duplicate_lines() -> TestResult {
        let first = CartLine::new("Burger", Decimal::new(500, 2), smallvec![], 1);
        let first_id = first.id();

        let lines = [
            first,
            CartLine::new("Frites", Decimal::new(3, 0), smallvec![], 1),
            CartLine::new("Burger", Decimal::new(5, 0), smallvec![], 2),
        ];

        let cart = Cart::with_lines(lines, EUR);

        assert_eq!(cart.len(), 2);

        let burger = cart.get(first_id).ok_or("expected the first burger line")?;

        assert_eq!(burger.quantity(), 3);
        assert_eq!(cart.formatted_total(), "18,00 €");

        Ok(())
    }

    #[test]
    fn get_returns_line_by_id() -> TestResult {
        let mut cart = Cart::new(EUR);

        let id = cart
            .add("Sundae", Decimal::new(3, 0), smallvec![], 1)
            .ok_or("expected id")?;

        assert_eq!(cart.get(id).map(CartLine::name), Some("Sundae"));
        assert!(cart.get(LineId::generate()).is_none());

        Ok(())
    }
}
