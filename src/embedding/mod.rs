mod encoder;

pub use encoder::{EmbeddingEncoder, EncodingError};
