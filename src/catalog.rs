use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Number of products shown per page before "show all" is toggled.
pub const PAGE_SIZE: usize = 6;

const EMBEDDED_CATALOG: &str = include_str!("../assets/products.json");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub brand: String,
    pub category: String,
    pub description: String,
    #[serde(default)]
    pub image: String,
}

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    products: Vec<Product>,
}

#[derive(Debug)]
pub enum CatalogError {
    Io { path: PathBuf, message: String },
    Parse(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, message } => {
                write!(f, "failed to read catalog at {}: {message}", path.display())
            }
            Self::Parse(message) => write!(f, "failed to parse catalog: {message}"),
        }
    }
}

impl std::error::Error for CatalogError {}

/// The full unfiltered product set. Source of truth is the catalog
/// document; loaded once per process.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn load_embedded() -> Result<Self, CatalogError> {
        Self::from_document(EMBEDDED_CATALOG)
    }

    pub fn load_from_path(path: &Path) -> Result<Self, CatalogError> {
        let data = fs::read_to_string(path).map_err(|err| CatalogError::Io {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        Self::from_document(&data)
    }

    pub fn from_products(products: Vec<Product>) -> Self {
        Self { products }
    }

    fn from_document(data: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument =
            serde_json::from_str(data).map_err(|err| CatalogError::Parse(err.to_string()))?;
        Ok(Self {
            products: document.products,
        })
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn categories(&self) -> Vec<String> {
        let unique: BTreeSet<&str> = self
            .products
            .iter()
            .map(|product| product.category.as_str())
            .collect();
        unique.into_iter().map(str::to_string).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub search: String,
}

impl ProductFilter {
    pub fn is_active(&self) -> bool {
        self.category.is_some() || !self.search.trim().is_empty()
    }

    pub fn apply(&self, products: &[Product]) -> Vec<Product> {
        let term = self.search.trim().to_lowercase();
        products
            .iter()
            .filter(|product| self.matches_category(product) && matches_term(product, &term))
            .cloned()
            .collect()
    }

    fn matches_category(&self, product: &Product) -> bool {
        match &self.category {
            Some(category) => product.category == *category,
            None => true,
        }
    }
}

fn matches_term(product: &Product, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    product.name.to_lowercase().contains(term)
        || product.brand.to_lowercase().contains(term)
        || product.description.to_lowercase().contains(term)
}

/// Derived view over the catalog: the last filtered list plus the
/// pagination state. Toggling "show all" re-slices the stored list
/// without re-running the filter.
#[derive(Debug, Clone)]
pub struct CatalogView {
    filtered: Vec<Product>,
    filter_active: bool,
    showing_all: bool,
}

impl CatalogView {
    pub fn new(catalog: &Catalog) -> Self {
        Self {
            filtered: catalog.products().to_vec(),
            filter_active: false,
            showing_all: false,
        }
    }

    pub fn refilter(&mut self, catalog: &Catalog, filter: &ProductFilter) {
        self.filtered = filter.apply(catalog.products());
        self.filter_active = filter.is_active();
        self.showing_all = false;
    }

    pub fn visible(&self) -> &[Product] {
        if !self.showing_all && self.filtered.len() > PAGE_SIZE {
            &self.filtered[..PAGE_SIZE]
        } else {
            &self.filtered
        }
    }

    /// True when the filtered list exceeds one page; the show-more
    /// control is hidden otherwise.
    pub fn has_overflow(&self) -> bool {
        self.filtered.len() > PAGE_SIZE
    }

    pub fn showing_all(&self) -> bool {
        self.showing_all
    }

    pub fn toggle_show_all(&mut self) {
        self.showing_all = !self.showing_all;
    }

    /// Distinguishes "the active filter matched nothing" from an
    /// unfiltered empty catalog.
    pub fn is_empty_result(&self) -> bool {
        self.filtered.is_empty() && self.filter_active
    }
}
