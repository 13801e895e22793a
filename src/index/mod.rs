use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use thiserror::Error;

use crate::catalog::ProductRecord;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Request to vector store failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Vector store rejected batch: status {status}, body: {body}")]
    Rejected { status: u16, body: String },
    #[error("Batch shape mismatch: {records} records but {vectors} vectors")]
    BatchShapeMismatch { records: usize, vectors: usize },
    #[error("Vector length mismatch at document {id}: got {actual}, expected {expected}")]
    VectorLengthMismatch { id: usize, actual: usize, expected: usize },
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentMetadata {
    pub product: String,
    pub category: String,
    pub brand: String,
    pub description: String,
}

/// The unit shipped to the vector store. Ids are assigned by batch
/// position and are only unique within a single batch.
#[derive(Debug, Clone, Serialize)]
pub struct IndexedDocument {
    pub id: usize,
    pub vector: Vec<f32>,
    pub metadata: DocumentMetadata,
}

#[derive(Serialize)]
struct IndexRequest<'a> {
    documents: &'a [IndexedDocument],
}

/// Pair catalog records with their embeddings into an indexing batch.
/// All vectors must share the length of the first one.
pub fn build_documents(
    records: &[ProductRecord],
    embeddings: Vec<Vec<f32>>,
) -> Result<Vec<IndexedDocument>, IndexError> {
    if records.len() != embeddings.len() {
        return Err(IndexError::BatchShapeMismatch {
            records: records.len(),
            vectors: embeddings.len(),
        });
    }

    let expected = embeddings.first().map(|v| v.len()).unwrap_or(0);

    records
        .iter()
        .zip(embeddings)
        .enumerate()
        .map(|(id, (record, vector))| {
            if vector.len() != expected {
                return Err(IndexError::VectorLengthMismatch {
                    id,
                    actual: vector.len(),
                    expected,
                });
            }

            Ok(IndexedDocument {
                id,
                vector,
                metadata: DocumentMetadata {
                    product: record.product.clone(),
                    category: record.category.clone(),
                    brand: record.brand.clone(),
                    description: record.description.clone(),
                },
            })
        })
        .collect()
}

#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Submit a batch in one shot. No retry on failure; whether a rerun
    /// overwrites or duplicates documents is up to the store.
    async fn index_batch(&self, documents: &[IndexedDocument]) -> Result<(), IndexError>;
}

/// Vector store client speaking plain JSON over HTTP.
pub struct HttpVectorIndex {
    client: Client,
    endpoint: String,
}

impl HttpVectorIndex {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl VectorIndex for HttpVectorIndex {
    async fn index_batch(&self, documents: &[IndexedDocument]) -> Result<(), IndexError> {
        log::info!(
            "Submitting {} documents to vector store at {}",
            documents.len(),
            self.endpoint
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(&IndexRequest { documents })
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(IndexError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}
