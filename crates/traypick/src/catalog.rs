//! Product catalog: immutable id/name lookup plus per-category weight
//! tolerances.
//!
//! The catalog is built once at startup — from the embedded default table
//! via `Default`, or from a JSON file — and never mutated afterwards, so it
//! is safe to share across concurrent judgments by reference.

mod builtin;

use std::collections::HashMap;
use std::path::Path;

use crate::detection::HAND_CLASS_ID;

/// Product category. Each category carries a fixed fractional weight
/// tolerance reflecting how much unit weights of its products vary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Beverage,
    Snack,
    Candy,
    Food,
    Dairy,
    Health,
    Frozen,
    #[default]
    Etc,
}

impl Category {
    /// Largest fractional tolerance over all categories. Weight accounting
    /// never accepts a combination beyond `observed * (1 + MAX_TOLERANCE)`.
    pub const MAX_TOLERANCE: f64 = 0.15;

    /// Fractional weight tolerance for this category.
    pub fn tolerance(self) -> f64 {
        match self {
            Category::Beverage => 0.05,
            Category::Snack => 0.10,
            Category::Candy => 0.10,
            Category::Food => 0.08,
            Category::Dairy => 0.07,
            Category::Health => 0.10,
            // Frost accumulation makes frozen weights the least repeatable.
            Category::Frozen => 0.15,
            Category::Etc => 0.15,
        }
    }

    /// Parse a category name; unknown or missing names map to `Etc`.
    pub fn from_name(name: &str) -> Category {
        match name {
            "beverage" => Category::Beverage,
            "snack" => Category::Snack,
            "candy" => Category::Candy,
            "food" => Category::Food,
            "dairy" => Category::Dairy,
            "health" => Category::Health,
            "frozen" => Category::Frozen,
            _ => Category::Etc,
        }
    }

    /// Canonical lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Category::Beverage => "beverage",
            Category::Snack => "snack",
            Category::Candy => "candy",
            Category::Food => "food",
            Category::Dairy => "dairy",
            Category::Health => "health",
            Category::Frozen => "frozen",
            Category::Etc => "etc",
        }
    }
}

/// One catalog entry, immutable after load.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Product {
    /// Unique product id; matches the detector's class id namespace.
    pub id: u32,
    /// Identifier string; matches detection class names.
    pub name: String,
    /// Unit weight in grams. Zero means weight-unknown: the product is
    /// excluded from weight matching.
    pub unit_weight_g: f64,
    /// Unit price in currency minor units.
    pub unit_price: u32,
    pub category: Category,
}

impl Product {
    /// Fractional weight tolerance from the product's category.
    pub fn tolerance(&self) -> f64 {
        self.category.tolerance()
    }

    /// `true` when the unit weight is usable for weight matching.
    pub fn has_known_weight(&self) -> bool {
        self.unit_weight_g > 0.0
    }
}

/// Catalog construction failure.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("catalog contains no products")]
    Empty,
    #[error("duplicate product id {0}")]
    DuplicateId(u32),
    #[error("duplicate product name `{0}`")]
    DuplicateName(String),
}

/// Immutable product lookup service.
///
/// All lookups go through `&self`; share across workers via `Arc`.
#[derive(Debug, Clone)]
pub struct ProductCatalog {
    products: Vec<Product>,
    id_to_idx: HashMap<u32, usize>,
    name_to_idx: HashMap<String, usize>,
}

impl ProductCatalog {
    /// Build a catalog from explicit products.
    ///
    /// Entries with id [`HAND_CLASS_ID`] are skipped (reserved for the hand
    /// class, never a product). Duplicate ids or names are rejected.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let products: Vec<Product> = products
            .into_iter()
            .filter(|p| p.id != HAND_CLASS_ID)
            .collect();
        if products.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut id_to_idx = HashMap::with_capacity(products.len());
        let mut name_to_idx = HashMap::with_capacity(products.len());
        for (idx, product) in products.iter().enumerate() {
            if id_to_idx.insert(product.id, idx).is_some() {
                return Err(CatalogError::DuplicateId(product.id));
            }
            if name_to_idx.insert(product.name.clone(), idx).is_some() {
                return Err(CatalogError::DuplicateName(product.name.clone()));
            }
        }

        Ok(Self {
            products,
            id_to_idx,
            name_to_idx,
        })
    }

    /// Load a catalog from a JSON file.
    ///
    /// Accepts either `{"products": [...]}` or a bare array. Entries carry
    /// `id`, `name`, `weight` (grams) and optionally `price` and `category`
    /// (missing category maps to `etc`).
    pub fn from_json_file(path: &Path) -> Result<Self, CatalogError> {
        let data = std::fs::read_to_string(path)?;
        let file: CatalogFile = serde_json::from_str(&data)?;
        let raw = match file {
            CatalogFile::Wrapped { products } => products,
            CatalogFile::Bare(products) => products,
        };
        let products = raw
            .into_iter()
            .map(|entry| Product {
                id: entry.id,
                name: entry.name,
                unit_weight_g: entry.weight,
                unit_price: entry.price,
                category: entry
                    .category
                    .as_deref()
                    .map(Category::from_name)
                    .unwrap_or_default(),
            })
            .collect();
        let catalog = Self::new(products)?;
        tracing::info!(
            "loaded catalog with {} products from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Look up a product by id.
    pub fn by_id(&self, id: u32) -> Option<&Product> {
        self.id_to_idx.get(&id).map(|&idx| &self.products[idx])
    }

    /// Look up a product by name.
    pub fn by_name(&self, name: &str) -> Option<&Product> {
        self.name_to_idx.get(name).map(|&idx| &self.products[idx])
    }

    /// All products, in catalog order.
    pub fn all(&self) -> &[Product] {
        &self.products
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Products whose unit weight falls within `tolerance` (fractional) of
    /// `target_g`. Weight-unknown products never match.
    pub fn search_by_weight(&self, target_g: f64, tolerance: f64) -> Vec<&Product> {
        let min_g = target_g * (1.0 - tolerance);
        let max_g = target_g * (1.0 + tolerance);
        self.products
            .iter()
            .filter(|p| p.has_known_weight() && p.unit_weight_g >= min_g && p.unit_weight_g <= max_g)
            .collect()
    }
}

impl Default for ProductCatalog {
    /// The embedded default table (~50 products).
    fn default() -> Self {
        let products = builtin::BUILTIN_PRODUCTS
            .iter()
            .map(|entry| Product {
                id: entry.id,
                name: entry.name.to_string(),
                unit_weight_g: entry.weight_g,
                unit_price: entry.price,
                category: entry.category,
            })
            .collect();
        Self::new(products).expect("embedded catalog is non-empty and unique")
    }
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    Wrapped { products: Vec<RawProduct> },
    Bare(Vec<RawProduct>),
}

/// File-format entry; key names follow the deployed catalog files.
#[derive(serde::Deserialize)]
struct RawProduct {
    id: u32,
    name: String,
    #[serde(default)]
    category: Option<String>,
    weight: f64,
    #[serde(default)]
    price: u32,
}
