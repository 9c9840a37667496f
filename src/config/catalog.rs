//! Catalog Config

use std::path::{Path, PathBuf};

use clap::Args;

/// Catalog source settings.
#[derive(Debug, Args)]
pub struct CatalogConfig {
    /// Directory holding `categories.json` and `produits.json`
    #[arg(long, env = "KIOSK_DATA_DIR", default_value = "fixtures")]
    pub data_dir: PathBuf,

    /// Base URL serving the catalog documents; takes precedence over the data directory
    #[arg(long, env = "KIOSK_CATALOG_URL")]
    pub catalog_url: Option<String>,
}

/// Where the catalog is loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSource<'a> {
    /// A local directory
    Dir(&'a Path),

    /// A remote base URL
    Url(&'a str),
}

impl CatalogConfig {
    /// The configured catalog source.
    #[must_use]
    pub fn source(&self) -> CatalogSource<'_> {
        match &self.catalog_url {
            Some(url) => CatalogSource::Url(url),
            None => CatalogSource::Dir(&self.data_dir),
        }
    }
}
