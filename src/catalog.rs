//! Catalog
//!
//! The product catalog the kiosk sells from, built from the data provider's
//! two JSON documents. Each category carries an explicit [`CategoryKind`] so
//! selection logic never has to guess from display text.

use std::{fs, io, path::Path};

use reqwest::Client;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use serde::de::DeserializeOwned;
use slotmap::{SlotMap, new_key_type};
use thiserror::Error;
use tracing::{debug, info};

pub mod documents;

use documents::{
    CATEGORIES_FILE, CategoryDocument, DRINKS_SECTION, MENUS_SECTION, PRODUCTS_FILE,
    ProductsDocument,
};

/// Message shown in place of the catalog when it can't be loaded.
pub const LOAD_FAILURE_MESSAGE: &str = "Unable to load data. Please try again later.";

/// Errors raised while loading the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A catalog file could not be read.
    #[error("failed to read catalog file: {0}")]
    Io(#[from] io::Error),

    /// A catalog document is not valid JSON of the expected shape.
    #[error("failed to parse catalog document: {0}")]
    Json(#[from] serde_json::Error),

    /// The data provider could not be reached.
    #[error("failed to fetch catalog: {0}")]
    Http(#[from] reqwest::Error),

    /// The data provider answered with a non-success status.
    #[error("catalog request to {url} failed with status {status}")]
    Status {
        /// Requested URL
        url: String,

        /// HTTP status code
        status: u16,
    },

    /// A fixed section (`menus` or `boissons`) is missing from the products document.
    #[error("products document has no `{0}` section")]
    MissingSection(&'static str),

    /// A category has no product list in the products document.
    #[error("category `{0}` has no products")]
    MissingCategory(String),

    /// A product price is negative or not a number.
    #[error("product `{name}` has invalid price {price}")]
    InvalidPrice {
        /// Product name
        name: String,

        /// Price as found in the document
        price: f64,
    },
}

impl CatalogError {
    /// The message to show the customer in place of the catalog.
    #[expect(
        clippy::unused_self,
        reason = "every load failure shows the same message"
    )]
    pub fn user_message(&self) -> &'static str {
        LOAD_FAILURE_MESSAGE
    }
}

new_key_type! {
    /// Product Key
    pub struct ProductKey;
}

/// How products of a category are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryKind {
    /// Composite menus, ordered through the menu flow.
    Menus,

    /// Drinks, ordered through the size and quantity flow.
    Drinks,

    /// Everything else, added to the cart directly.
    Simple,
}

impl CategoryKind {
    /// The kind of the products listed under a products document key.
    pub fn for_section(section: &str) -> Self {
        match section {
            MENUS_SECTION => Self::Menus,
            DRINKS_SECTION => Self::Drinks,
            _ => Self::Simple,
        }
    }
}

/// Product
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Product name
    pub name: String,

    /// Product price
    pub price: Decimal,

    /// Image path
    pub image: String,

    /// Kind of the category the product is listed under
    pub kind: CategoryKind,
}

/// Category
#[derive(Debug, Clone)]
pub struct Category {
    /// Category id
    pub id: u32,

    /// Category title
    pub title: String,

    /// Image path
    pub image: String,

    /// How products of this category are ordered
    pub kind: CategoryKind,

    products: Vec<ProductKey>,
}

impl Category {
    /// Keys of the category's products, in catalog order.
    pub fn product_keys(&self) -> &[ProductKey] {
        &self.products
    }
}

/// Catalog
#[derive(Debug, Default)]
pub struct Catalog {
    categories: Vec<Category>,
    products: SlotMap<ProductKey, Product>,
    sections: FxHashMap<String, Vec<ProductKey>>,
}

impl Catalog {
    /// Build a catalog from the two raw JSON documents.
    ///
    /// # Errors
    ///
    /// Returns an error if either document is malformed or inconsistent.
    pub fn from_json(categories: &str, products: &str) -> Result<Self, CatalogError> {
        Self::from_documents(
            serde_json::from_str(categories)?,
            serde_json::from_str(products)?,
        )
    }

    /// Build a catalog from parsed documents.
    ///
    /// # Errors
    ///
    /// Returns an error if a fixed section or a category's products are
    /// missing, or a price is invalid.
    pub fn from_documents(
        categories: Vec<CategoryDocument>,
        products: ProductsDocument,
    ) -> Result<Self, CatalogError> {
        for section in [MENUS_SECTION, DRINKS_SECTION] {
            if !products.contains_key(section) {
                return Err(CatalogError::MissingSection(section));
            }
        }

        let mut catalog = Catalog::default();

        for (section, entries) in products {
            let kind = CategoryKind::for_section(&section);
            let mut keys = Vec::with_capacity(entries.len());

            for entry in entries {
                keys.push(catalog.products.insert(entry.try_into_product(kind)?));
            }

            catalog.sections.insert(section, keys);
        }

        for doc in categories {
            let keys = catalog
                .sections
                .get(&doc.title)
                .cloned()
                .ok_or_else(|| CatalogError::MissingCategory(doc.title.clone()))?;

            catalog.categories.push(Category {
                id: doc.id,
                kind: CategoryKind::for_section(&doc.title),
                title: doc.title,
                image: doc.image,
                products: keys,
            });
        }

        debug!(
            categories = catalog.categories.len(),
            products = catalog.products.len(),
            "built catalog"
        );

        Ok(catalog)
    }

    /// Load `categories.json` and `produits.json` from a directory.
    ///
    /// # Errors
    ///
    /// Returns an error if a file can't be read or the documents are invalid.
    pub fn load_dir(dir: &Path) -> Result<Self, CatalogError> {
        let categories = fs::read_to_string(dir.join(CATEGORIES_FILE))?;
        let products = fs::read_to_string(dir.join(PRODUCTS_FILE))?;

        info!(dir = %dir.display(), "loading catalog");

        Self::from_json(&categories, &products)
    }

    /// Fetch both documents from `base_url` and build the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error on HTTP failure, a non-success status, or invalid documents.
    pub async fn fetch(client: &Client, base_url: &str) -> Result<Self, CatalogError> {
        let base = base_url.trim_end_matches('/');

        info!(base_url = base, "fetching catalog");

        let (categories, products) = tokio::try_join!(
            fetch_document::<Vec<CategoryDocument>>(client, format!("{base}/{CATEGORIES_FILE}")),
            fetch_document::<ProductsDocument>(client, format!("{base}/{PRODUCTS_FILE}")),
        )?;

        Self::from_documents(categories, products)
    }

    /// All categories, in catalog order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Look up a category by id.
    pub fn category(&self, id: u32) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    /// Look up a category by title, ignoring case.
    pub fn category_by_title(&self, title: &str) -> Option<&Category> {
        self.categories
            .iter()
            .find(|category| category.title.eq_ignore_ascii_case(title))
    }

    /// Look up a product by key.
    pub fn product(&self, key: ProductKey) -> Option<&Product> {
        self.products.get(key)
    }

    /// Products of a category, in catalog order.
    pub fn products_in<'a>(&'a self, category: &'a Category) -> impl Iterator<Item = &'a Product> {
        category
            .products
            .iter()
            .filter_map(|key| self.products.get(*key))
    }

    /// Find a product by name, ignoring case, across every section.
    pub fn find_product(&self, name: &str) -> Option<(ProductKey, &Product)> {
        self.products
            .iter()
            .find(|(_, product)| product.name.eq_ignore_ascii_case(name))
    }

    /// Products of the fixed `menus` section.
    pub fn menus(&self) -> impl Iterator<Item = &Product> {
        self.section(MENUS_SECTION)
    }

    /// Products of the fixed `boissons` section, offered as menu drinks.
    pub fn drinks(&self) -> impl Iterator<Item = &Product> {
        self.section(DRINKS_SECTION)
    }

    fn section(&self, name: &str) -> impl Iterator<Item = &Product> {
        self.sections
            .get(name)
            .into_iter()
            .flatten()
            .filter_map(|key| self.products.get(*key))
    }
}

async fn fetch_document<T: DeserializeOwned>(
    client: &Client,
    url: String,
) -> Result<T, CatalogError> {
    let response = client.get(&url).send().await?;

    if !response.status().is_success() {
        return Err(CatalogError::Status {
            url,
            status: response.status().as_u16(),
        });
    }

    Ok(response.json().await?)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    const CATEGORIES: &str = r#"[
        { "id": 1, "title": "menus", "image": "/images/menus.png" },
        { "id": 2, "title": "boissons", "image": "/images/boissons.png" },
        { "id": 3, "title": "burgers", "image": "/images/burgers.png" }
    ]"#;

    const PRODUCTS: &str = r#"{
        "menus": [
            { "nom": "Menu Big Mac", "prix": 8.0, "image": "/images/menus/bigmac.png" },
            { "nom": "Menu Royal Cheese", "prix": 7.5, "image": "/images/menus/royal.png" }
        ],
        "boissons": [
            { "nom": "Coca-Cola", "prix": 1.9, "image": "/images/boissons/coca.png" }
        ],
        "burgers": [
            { "nom": "Cheeseburger", "prix": 2.5, "image": "/images/burgers/cheese.png" }
        ]
    }"#;

    #[test]
    fn builds_categories_with_kinds() -> TestResult {
        let catalog = Catalog::from_json(CATEGORIES, PRODUCTS)?;

        let kinds: Vec<CategoryKind> = catalog.categories().iter().map(|c| c.kind).collect();

        assert_eq!(
            kinds,
            vec![CategoryKind::Menus, CategoryKind::Drinks, CategoryKind::Simple]
        );

        Ok(())
    }

    #[test]
    fn products_keep_document_order() -> TestResult {
        let catalog = Catalog::from_json(CATEGORIES, PRODUCTS)?;
        let menus = catalog.category(1).ok_or("missing menus category")?;

        let names: Vec<&str> = catalog
            .products_in(menus)
            .map(|product| product.name.as_str())
            .collect();

        assert_eq!(names, vec!["Menu Big Mac", "Menu Royal Cheese"]);

        Ok(())
    }

    #[test]
    fn find_product_is_case_insensitive() -> TestResult {
        let catalog = Catalog::from_json(CATEGORIES, PRODUCTS)?;

        let (_, product) = catalog
            .find_product("cheeseburger")
            .ok_or("missing product")?;

        assert_eq!(product.price, Decimal::new(250, 2));
        assert_eq!(product.kind, CategoryKind::Simple);

        Ok(())
    }

    #[test]
    fn exposes_fixed_sections() -> TestResult {
        let catalog = Catalog::from_json(CATEGORIES, PRODUCTS)?;

        assert_eq!(catalog.menus().count(), 2);
        assert_eq!(catalog.drinks().count(), 1);

        Ok(())
    }

    #[test]
    fn missing_fixed_section_is_an_error() {
        let result = Catalog::from_json("[]", r#"{ "menus": [] }"#);

        assert!(matches!(
            result,
            Err(CatalogError::MissingSection(DRINKS_SECTION))
        ));
    }

    #[test]
    fn category_without_products_is_an_error() {
        let categories = r#"[{ "id": 9, "title": "sauces", "image": "" }]"#;
        let result = Catalog::from_json(categories, r#"{ "menus": [], "boissons": [] }"#);

        assert!(matches!(result, Err(CatalogError::MissingCategory(title)) if title == "sauces"));
    }

    #[test]
    fn malformed_json_is_an_error_with_user_message() -> TestResult {
        let result = Catalog::from_json("[", PRODUCTS);

        let Err(err) = result else {
            return Err("expected malformed JSON to fail".into());
        };

        assert!(matches!(err, CatalogError::Json(_)));
        assert_eq!(err.user_message(), LOAD_FAILURE_MESSAGE);

        Ok(())
    }

    #[test]
    fn load_dir_reads_both_documents() -> TestResult {
        let dir = tempfile::tempdir()?;

        fs::write(dir.path().join(CATEGORIES_FILE), CATEGORIES)?;
        fs::write(dir.path().join(PRODUCTS_FILE), PRODUCTS)?;

        let catalog = Catalog::load_dir(dir.path())?;

        assert_eq!(catalog.categories().len(), 3);

        Ok(())
    }

    #[test]
    fn load_dir_missing_file_is_io_error() -> TestResult {
        let dir = tempfile::tempdir()?;

        assert!(matches!(
            Catalog::load_dir(dir.path()),
            Err(CatalogError::Io(_))
        ));

        Ok(())
    }
}
