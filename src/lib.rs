pub mod api;
pub mod catalog;
pub mod config;
pub mod embedding;
pub mod index;
pub mod qa;
pub mod tokenize;

// Re-export commonly used items
pub use catalog::{Catalog, ProductRecord};
pub use embedding::EmbeddingEncoder;
pub use qa::{AnswerExtractor, QaSpanModel};
