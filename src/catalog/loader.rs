use serde::Deserialize;
use thiserror::Error;

use super::{Catalog, ProductRecord};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to fetch catalog: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error("Failed to parse catalog CSV: {0}")]
    Parse(#[from] csv::Error),
    #[error("Catalog row {row} is missing required field `{field}`")]
    MissingField { row: usize, field: &'static str },
}

#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(default)]
    product: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    brand: Option<String>,
}

/// Fetch the catalog CSV from a remote URL and build the in-memory snapshot.
/// Any fetch or parse failure here is fatal to startup.
pub async fn load_catalog(url: &str) -> Result<Catalog, LoadError> {
    log::info!("Fetching catalog from {}", url);

    let body = reqwest::get(url)
        .await?
        .error_for_status()?
        .bytes()
        .await?;

    parse_catalog(body.as_ref())
}

pub fn parse_catalog(data: &[u8]) -> Result<Catalog, LoadError> {
    let mut reader = csv::Reader::from_reader(data);
    let mut records = Vec::new();

    for (row, result) in reader.deserialize::<RawRow>().enumerate() {
        let raw = result?;
        let product = required(raw.product, row, "product")?;
        let description = required(raw.description, row, "description")?;
        let input_text = ProductRecord::compose(&product, &description);

        records.push(ProductRecord {
            id: records.len(),
            product,
            description,
            category: raw.category.unwrap_or_default(),
            brand: raw.brand.unwrap_or_default(),
            input_text,
        });
    }

    log::info!("Loaded {} catalog rows", records.len());
    Ok(Catalog::new(records))
}

fn required(
    value: Option<String>,
    row: usize,
    field: &'static str,
) -> Result<String, LoadError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(LoadError::MissingField { row, field }),
    }
}
