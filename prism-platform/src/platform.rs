use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

use crate::converter::ResultConverter;
use crate::deferred::DeferredResult;
use crate::error::{PlatformError, PlatformResult};
use crate::model::{Model, ModelCatalog, Options};
use crate::raw::RawResult;

/// Sends a request for a model and returns the provider's raw response.
///
/// The wire format (HTTP, gRPC, local runtime, ...) is entirely up to the
/// implementation.
#[async_trait]
pub trait ModelClient: Send + Sync + std::fmt::Debug {
    fn supports(&self, model: &Model) -> bool;

    async fn request(&self, model: &Model, input: Value, options: &Options) -> PlatformResult<Arc<dyn RawResult>>;
}

/// Resolves a model, dispatches the request to a client and hands back a
/// `DeferredResult` bound to a matching converter.
#[derive(Debug)]
pub struct Platform {
    catalog: Arc<dyn ModelCatalog>,
    clients: Vec<Arc<dyn ModelClient>>,
    converters: Vec<Arc<dyn ResultConverter>>,
}

impl Platform {
    pub fn new(
        catalog: Arc<dyn ModelCatalog>,
        clients: Vec<Arc<dyn ModelClient>>,
        converters: Vec<Arc<dyn ResultConverter>>,
    ) -> Self {
        Platform { catalog, clients, converters }
    }

    pub fn catalog(&self) -> &dyn ModelCatalog {
        self.catalog.as_ref()
    }

    /// Invokes `model_name` with `input`.
    ///
    /// Options from the catalog (including any `?key=value` suffix on the
    /// name) are merged with `options`; call options win on conflicts.
    /// The first client and the first converter that support the model
    /// are used.
    pub async fn invoke(&self, model_name: &str, input: Value, options: Options) -> PlatformResult<DeferredResult> {
        let model = self.catalog.model(model_name)?;

        let client = self
            .clients
            .iter()
            .find(|client| client.supports(&model))
            .ok_or_else(|| PlatformError::NoClientFor(model.name().to_string()))?;
        // Resolve the converter before sending so an unsupported model never hits the provider
        let converter = self
            .converters
            .iter()
            .find(|converter| converter.supports(&model))
            .ok_or_else(|| PlatformError::NoConverterFor(model.name().to_string()))?;

        let mut merged = model.options().clone();
        merged.extend(options);

        info!(model = %model, options = merged.len(), "Invoking model");
        let raw = client.request(&model, input, &merged).await?;
        debug!(model = %model, "Raw response received, conversion deferred");

        Ok(DeferredResult::new(Arc::clone(converter), raw, merged))
    }
}
