use serde_json::Value;

use crate::error::PlatformResult;

/// An unconverted provider response.
///
/// Implementations are opaque to the deferred-result machinery; only
/// converters look inside them.
pub trait RawResult: std::fmt::Debug + Send + Sync {
    /// Decoded response body.
    fn data(&self) -> PlatformResult<Value>;
}

/// Raw result holding an already-decoded JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct InMemoryRawResult {
    data: Value,
}

impl InMemoryRawResult {
    pub fn new(data: Value) -> Self {
        InMemoryRawResult { data }
    }
}

impl RawResult for InMemoryRawResult {
    fn data(&self) -> PlatformResult<Value> {
        Ok(self.data.clone())
    }
}
