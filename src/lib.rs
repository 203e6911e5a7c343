pub mod codec;
pub mod embedding;
pub mod format;
pub mod plan;
pub mod registry;
pub mod sqlite;
pub mod vector;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VectorCodecError {
    #[error("Encode Error: {0}")]
    EncodeError(String),
    #[error("Decode Error: {0}")]
    DecodeError(String),
    #[error("Parse Error: {0}")]
    ParseError(String),
    #[error("Plan Error: {0}")]
    PlanError(String),
    #[error("Embedding Error: {0}")]
    EmbeddingError(String),
    #[error("Serialization Error: {0}")]
    SerializationError(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, VectorCodecError>;

// Re-export main types for convenience
pub use codec::{Codec, CodecConfig, VectorCodec};
pub use embedding::{embed_vectors, EmbeddingProvider};
pub use format::{Format, FormatCode, BINARY_FORMAT_CODE, TEXT_FORMAT_CODE};
pub use plan::{EncodePlan, ScanPlan};
pub use registry::{register_types, DataType, TypeMap};
pub use vector::{ReservedBytes, Vector, MAX_DIM};
