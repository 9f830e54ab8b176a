use prism_core::Vector;
use serde_json::Value;

use crate::error::{PlatformError, PlatformResult};
use crate::model::{Capability, Model, Options};
use crate::raw::RawResult;
use crate::result::ModelResult;

/// Turns a provider's raw response into a typed `ModelResult`.
pub trait ResultConverter: Send + Sync + std::fmt::Debug {
    /// Whether this converter understands responses for `model`.
    fn supports(&self, model: &Model) -> bool;

    fn convert(&self, raw: &dyn RawResult, options: &Options) -> PlatformResult<ModelResult>;
}

fn lookup<'a>(data: &'a Value, pointer: &str) -> PlatformResult<&'a Value> {
    data.pointer(pointer)
        .ok_or_else(|| PlatformError::Conversion(format!("Response has no value at '{}'", pointer)))
}

/// Reads a string at a JSON pointer as text output.
#[derive(Debug, Clone)]
pub struct TextConverter {
    pointer: String,
}

impl TextConverter {
    pub fn new(pointer: impl Into<String>) -> Self {
        TextConverter { pointer: pointer.into() }
    }
}

impl Default for TextConverter {
    fn default() -> Self {
        TextConverter::new("/text")
    }
}

impl ResultConverter for TextConverter {
    fn supports(&self, model: &Model) -> bool {
        model.supports(Capability::OutputText)
    }

    fn convert(&self, raw: &dyn RawResult, _options: &Options) -> PlatformResult<ModelResult> {
        let data = raw.data()?;
        let text = lookup(&data, &self.pointer)?
            .as_str()
            .ok_or_else(|| PlatformError::Conversion(format!("Value at '{}' is not a string", self.pointer)))?;
        Ok(ModelResult::text(text))
    }
}

/// Reads a list of number lists at a JSON pointer as embedding vectors.
#[derive(Debug, Clone)]
pub struct EmbeddingsConverter {
    pointer: String,
}

impl EmbeddingsConverter {
    pub fn new(pointer: impl Into<String>) -> Self {
        EmbeddingsConverter { pointer: pointer.into() }
    }
}

impl Default for EmbeddingsConverter {
    fn default() -> Self {
        EmbeddingsConverter::new("/embeddings")
    }
}

impl ResultConverter for EmbeddingsConverter {
    fn supports(&self, model: &Model) -> bool {
        model.supports(Capability::Embeddings)
    }

    fn convert(&self, raw: &dyn RawResult, _options: &Options) -> PlatformResult<ModelResult> {
        let data = raw.data()?;
        let embeddings: Vec<Vec<f32>> = serde_json::from_value(lookup(&data, &self.pointer)?.clone())
            .map_err(|e| PlatformError::Conversion(format!("Invalid embeddings at '{}': {}", self.pointer, e)))?;
        Ok(ModelResult::vectors(embeddings.into_iter().map(Vector::from).collect()))
    }
}
