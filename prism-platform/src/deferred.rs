//! Convert-once wrapper around a provider's raw response.

use std::cell::OnceCell;
use std::sync::Arc;

use prism_core::Vector;
use serde_json::Value;
use tracing::debug;

use crate::converter::ResultConverter;
use crate::error::PlatformResult;
use crate::model::Options;
use crate::raw::RawResult;
use crate::result::{ModelResult, Output};

/// A raw response paired with the converter that will turn it into a
/// `ModelResult` on first access.
///
/// Conversion runs at most once per successful call; the result is
/// memoised and every later accessor reads the cached value. A failed
/// conversion is not cached, so the next access tries again.
///
/// Memoisation uses `OnceCell`: the wrapper can be moved between threads
/// but not shared by them.
#[derive(Debug)]
pub struct DeferredResult {
    converter: Arc<dyn ResultConverter>,
    raw: Arc<dyn RawResult>,
    options: Options,
    result: OnceCell<ModelResult>,
}

impl DeferredResult {
    pub fn new(converter: Arc<dyn ResultConverter>, raw: Arc<dyn RawResult>, options: Options) -> Self {
        DeferredResult {
            converter,
            raw,
            options,
            result: OnceCell::new(),
        }
    }

    pub fn without_options(converter: Arc<dyn ResultConverter>, raw: Arc<dyn RawResult>) -> Self {
        Self::new(converter, raw, Options::new())
    }

    fn convert(&self) -> PlatformResult<ModelResult> {
        debug!(converter = ?self.converter, "Converting raw result");
        let mut converted = self.converter.convert(self.raw.as_ref(), &self.options)?;
        // Keep a raw result the converter attached itself
        if !converted.has_raw_result() {
            converted.set_raw_result(Arc::clone(&self.raw))?;
        }
        Ok(converted)
    }

    /// Converts on first call, then returns the memoised result.
    pub fn result(&self) -> PlatformResult<&ModelResult> {
        if let Some(result) = self.result.get() {
            return Ok(result);
        }
        let converted = self.convert()?;
        Ok(self.result.get_or_init(|| converted))
    }

    /// Same as [`DeferredResult::result`].
    pub fn await_result(&self) -> PlatformResult<&ModelResult> {
        self.result()
    }

    /// Consumes the wrapper and returns the converted result.
    pub fn into_result(mut self) -> PlatformResult<ModelResult> {
        match self.result.take() {
            Some(result) => Ok(result),
            None => self.convert(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.result.get().is_some()
    }

    pub fn content(&self) -> PlatformResult<&Output> {
        Ok(self.result()?.content())
    }

    pub fn as_text(&self) -> PlatformResult<&str> {
        self.content()?.as_text()
    }

    pub fn as_vectors(&self) -> PlatformResult<&[Vector]> {
        self.content()?.as_vectors()
    }

    pub fn as_object(&self) -> PlatformResult<&Value> {
        self.content()?.as_object()
    }

    /// The original raw handle, whether or not conversion has happened.
    pub fn raw_response(&self) -> &Arc<dyn RawResult> {
        &self.raw
    }

    pub fn options(&self) -> &Options {
        &self.options
    }
}
