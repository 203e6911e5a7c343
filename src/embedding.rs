//! Boundary to an embedding provider.
//!
//! The provider (HTTP client, credentials, retries) lives outside this crate.
//! What lives here is the trait it implements and the JSON shapes of the
//! OpenAI-style embeddings endpoint, so a provider can build requests and turn
//! responses into [`Vector`]s without reinventing them.

use crate::{vector::Vector, Result, VectorCodecError};
use serde::{Deserialize, Serialize};

pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

pub trait EmbeddingProvider {
    /// Returns one embedding per input string, in input order.
    fn embed(&self, input: &[String]) -> Result<Vec<Vec<f32>>>;
}

/// Embeds `input` and wraps each embedding as a [`Vector`].
pub fn embed_vectors<P>(provider: &P, input: &[String]) -> Result<Vec<Vector>>
where
    P: EmbeddingProvider + ?Sized,
{
    let embeddings = provider.embed(input)?;
    if embeddings.len() != input.len() {
        return Err(VectorCodecError::EmbeddingError(format!(
            "provider returned {} embeddings for {} inputs",
            embeddings.len(),
            input.len()
        )));
    }
    Ok(embeddings.into_iter().map(Vector::new).collect())
}

#[derive(Debug, Clone, Serialize)]
pub struct EmbeddingRequest<'a> {
    pub input: &'a [String],
    pub model: &'a str,
}

impl<'a> EmbeddingRequest<'a> {
    pub fn new(input: &'a [String]) -> Self {
        Self {
            input,
            model: DEFAULT_EMBEDDING_MODEL,
        }
    }

    pub fn with_model(input: &'a [String], model: &'a str) -> Self {
        Self { input, model }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| VectorCodecError::SerializationError(format!("Failed to serialize embedding request: {}", e)))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingResponse {
    pub data: Vec<EmbeddingData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingData {
    #[serde(default)]
    pub index: usize,
    pub embedding: Vec<f32>,
}

impl EmbeddingResponse {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| VectorCodecError::SerializationError(format!("Failed to parse embedding response: {}", e)))
    }

    /// Embeddings ordered by their `index` field.
    pub fn into_embeddings(mut self) -> Vec<Vec<f32>> {
        self.data.sort_by_key(|item| item.index);
        self.data.into_iter().map(|item| item.embedding).collect()
    }
}
