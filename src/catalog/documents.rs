//! Catalog Documents
//!
//! Shapes of the two JSON documents the data provider serves.

use rust_decimal::{Decimal, prelude::FromPrimitive};
use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::catalog::{CatalogError, CategoryKind, Product};

/// File name of the category list.
pub const CATEGORIES_FILE: &str = "categories.json";

/// File name of the products document.
pub const PRODUCTS_FILE: &str = "produits.json";

/// Products document key holding the menus.
pub const MENUS_SECTION: &str = "menus";

/// Products document key holding the drinks.
pub const DRINKS_SECTION: &str = "boissons";

/// One entry of `categories.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryDocument {
    /// Category id
    pub id: u32,

    /// Category title, also the key of its products in the products document
    pub title: String,

    /// Image path
    pub image: String,
}

/// One product entry of `produits.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductDocument {
    /// Product name
    pub nom: String,

    /// Product price as a two-decimal float
    pub prix: f64,

    /// Image path
    pub image: String,
}

/// `produits.json`: product lists keyed by category title.
pub type ProductsDocument = FxHashMap<String, Vec<ProductDocument>>;

impl ProductDocument {
    /// Convert into a catalog product of the given kind.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidPrice`] if the price is negative or not a finite number.
    pub fn try_into_product(self, kind: CategoryKind) -> Result<Product, CatalogError> {
        let price = parse_price(self.prix).ok_or_else(|| CatalogError::InvalidPrice {
            name: self.nom.clone(),
            price: self.prix,
        })?;

        Ok(Product {
            name: self.nom,
            price,
            image: self.image,
            kind,
        })
    }
}

/// Convert a float price into a two-place decimal.
fn parse_price(value: f64) -> Option<Decimal> {
    Decimal::from_f64(value)
        .map(|price| price.round_dp(2))
        .filter(|price| !price.is_sign_negative())
}
