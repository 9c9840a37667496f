//! Render
//!
//! Terminal tables for the catalog and the cart.

use std::io;

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    catalog::{Catalog, CategoryKind},
    pricing::{format_money, line_total},
    session::CartView,
};

/// Errors that can occur while rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Writing to the output failed.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

/// Write the cart table followed by the total and any status message.
///
/// # Errors
///
/// Returns an error if the output can't be written.
pub fn write_cart(
    mut out: impl io::Write,
    view: &CartView,
    currency: &'static Currency,
) -> Result<(), RenderError> {
    if view.lines.is_empty() {
        writeln!(out, "Your cart is empty.")?;
    } else {
        let mut builder = Builder::default();

        builder.push_record(["Id", "Item", "Options", "Qty", "Unit Price", "Line Total"]);

        for line in &view.lines {
            builder.push_record([
                line.id().to_string(),
                line.name().to_string(),
                line.options().join(", "),
                line.quantity().to_string(),
                format_amount(line.unit_price(), currency),
                format_amount(line_total(line), currency),
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Columns::new(3..6), Alignment::right());

        writeln!(out, "{table}")?;
    }

    writeln!(out, "Total: {}", view.total)?;

    if let Some(status) = view.status {
        writeln!(out, "{status}")?;
    }

    Ok(())
}

/// Write every category with its products.
///
/// # Errors
///
/// Returns an error if the output can't be written.
pub fn write_catalog(
    mut out: impl io::Write,
    catalog: &Catalog,
    currency: &'static Currency,
) -> Result<(), RenderError> {
    let mut builder = Builder::default();

    builder.push_record(["Category", "Kind", "Product", "Price"]);

    for category in catalog.categories() {
        for product in catalog.products_in(category) {
            builder.push_record([
                category.title.clone(),
                kind_label(category.kind).to_string(),
                product.name.clone(),
                format_amount(product.price, currency),
            ]);
        }
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(3..4), Alignment::right());

    writeln!(out, "{table}")?;

    Ok(())
}

fn kind_label(kind: CategoryKind) -> &'static str {
    match kind {
        CategoryKind::Menus => "menu",
        CategoryKind::Drinks => "drink",
        CategoryKind::Simple => "item",
    }
}

fn format_amount(amount: Decimal, currency: &'static Currency) -> String {
    format_money(&Money::from_decimal(amount, currency))
}
