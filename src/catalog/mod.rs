mod loader;

pub use loader::{load_catalog, parse_catalog, LoadError};

use serde::Serialize;

/// A single catalog row, frozen at load time.
#[derive(Debug, Clone, Serialize)]
pub struct ProductRecord {
    pub id: usize,
    pub product: String,
    pub description: String,
    pub category: String,
    pub brand: String,
    pub input_text: String,
}

impl ProductRecord {
    /// Searchable text for a product: name and description joined by a
    /// single space, both kept verbatim.
    pub fn compose(product: &str, description: &str) -> String {
        format!("{} {}", product, description)
    }
}

/// Read-only snapshot of the loaded catalog. Built once at startup and
/// shared with every request afterwards.
#[derive(Debug, Default)]
pub struct Catalog {
    records: Vec<ProductRecord>,
}

impl Catalog {
    pub fn new(records: Vec<ProductRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[ProductRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The composed search corpus, in row order.
    pub fn input_texts(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.input_text.as_str())
    }
}
