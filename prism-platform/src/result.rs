//! Typed results produced by converting a provider's raw response.

use std::sync::Arc;

use prism_core::{Metadata, Vector};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{PlatformError, PlatformResult};
use crate::raw::RawResult;

/// A tool invocation requested by a model. Carried as data only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

/// The converted payload of a model response.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    Text(String),
    Vectors(Vec<Vector>),
    Object(Value),
    ToolCalls(Vec<ToolCall>),
    Binary { data: Vec<u8>, mime_type: Option<String> },
    /// Several alternative outputs for a single request.
    Choices(Vec<Output>),
}

impl Output {
    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Output::Text(_) => "text",
            Output::Vectors(_) => "vectors",
            Output::Object(_) => "object",
            Output::ToolCalls(_) => "tool_calls",
            Output::Binary { .. } => "binary",
            Output::Choices(_) => "choices",
        }
    }

    pub fn as_text(&self) -> PlatformResult<&str> {
        match self {
            Output::Text(text) => Ok(text),
            other => Err(PlatformError::UnexpectedResultType { expected: "text", actual: other.kind() }),
        }
    }

    pub fn as_vectors(&self) -> PlatformResult<&[Vector]> {
        match self {
            Output::Vectors(vectors) => Ok(vectors),
            other => Err(PlatformError::UnexpectedResultType { expected: "vectors", actual: other.kind() }),
        }
    }

    pub fn as_object(&self) -> PlatformResult<&Value> {
        match self {
            Output::Object(value) => Ok(value),
            other => Err(PlatformError::UnexpectedResultType { expected: "object", actual: other.kind() }),
        }
    }

    pub fn as_tool_calls(&self) -> PlatformResult<&[ToolCall]> {
        match self {
            Output::ToolCalls(calls) => Ok(calls),
            other => Err(PlatformError::UnexpectedResultType { expected: "tool_calls", actual: other.kind() }),
        }
    }
}

/// A converted model response together with its metadata and the raw
/// response it came from.
///
/// The raw response can be attached once. A second `set_raw_result` call
/// fails with `PlatformError::RawResultAlreadySet`.
#[derive(Debug, Clone)]
pub struct ModelResult {
    output: Output,
    metadata: Metadata,
    raw: Option<Arc<dyn RawResult>>,
}

impl ModelResult {
    pub fn new(output: Output) -> Self {
        ModelResult {
            output,
            metadata: Metadata::new(),
            raw: None,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(Output::Text(text.into()))
    }

    pub fn vectors(vectors: Vec<Vector>) -> Self {
        Self::new(Output::Vectors(vectors))
    }

    pub fn object(value: Value) -> Self {
        Self::new(Output::Object(value))
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn content(&self) -> &Output {
        &self.output
    }

    pub fn into_content(self) -> Output {
        self.output
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }

    pub fn raw_result(&self) -> Option<&Arc<dyn RawResult>> {
        self.raw.as_ref()
    }

    pub fn has_raw_result(&self) -> bool {
        self.raw.is_some()
    }

    /// Attaches the raw response this result was converted from.
    pub fn set_raw_result(&mut self, raw: Arc<dyn RawResult>) -> PlatformResult<()> {
        if self.raw.is_some() {
            return Err(PlatformError::RawResultAlreadySet);
        }
        self.raw = Some(raw);
        Ok(())
    }
}
