pub mod converter;
pub mod deferred;
pub mod error;
pub mod model;
pub mod platform;
pub mod raw;
pub mod result;

// Re-export key types/traits for easier use
pub use converter::{EmbeddingsConverter, ResultConverter, TextConverter};
pub use deferred::DeferredResult;
pub use error::{PlatformError, PlatformResult};
pub use model::{Capability, FallbackModelCatalog, Model, ModelCatalog, Options, StaticModelCatalog};
pub use platform::{ModelClient, Platform};
pub use raw::{InMemoryRawResult, RawResult};
pub use result::{ModelResult, Output, ToolCall};
