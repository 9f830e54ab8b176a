//! Models, their capabilities and the catalogs that resolve model names.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use tracing::debug;

use crate::error::{PlatformError, PlatformResult};

/// Free-form options passed along with a model invocation.
pub type Options = Map<String, Value>;

/// What a model can consume or produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    InputText,
    InputMessages,
    InputImage,
    InputAudio,
    InputPdf,
    OutputText,
    OutputStreaming,
    OutputStructured,
    OutputImage,
    OutputAudio,
    ToolCalling,
    Embeddings,
}

impl Capability {
    pub const ALL: [Capability; 12] = [
        Capability::InputText,
        Capability::InputMessages,
        Capability::InputImage,
        Capability::InputAudio,
        Capability::InputPdf,
        Capability::OutputText,
        Capability::OutputStreaming,
        Capability::OutputStructured,
        Capability::OutputImage,
        Capability::OutputAudio,
        Capability::ToolCalling,
        Capability::Embeddings,
    ];
}

/// A resolved model: its name, what it supports and its default options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    name: String,
    #[serde(default)]
    capabilities: BTreeSet<Capability>,
    #[serde(default)]
    options: Options,
}

impl Model {
    pub fn new(name: impl Into<String>, capabilities: impl IntoIterator<Item = Capability>) -> Self {
        Model {
            name: name.into(),
            capabilities: capabilities.into_iter().collect(),
            options: Options::new(),
        }
    }

    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capabilities(&self) -> impl Iterator<Item = Capability> + '_ {
        self.capabilities.iter().copied()
    }

    pub fn supports(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    pub fn options(&self) -> &Options {
        &self.options
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Resolves model names into `Model`s.
pub trait ModelCatalog: Send + Sync + fmt::Debug {
    /// Resolves `name`, which may carry a `?key=value&...` option suffix.
    fn model(&self, name: &str) -> PlatformResult<Model>;

    /// All models known to the catalog, sorted by name.
    fn models(&self) -> Vec<Model>;
}

/// Catalog entry as read from configuration.
#[derive(Debug, Clone, Default, Deserialize)]
struct ModelDefinition {
    #[serde(default)]
    capabilities: BTreeSet<Capability>,
    #[serde(default)]
    options: Options,
}

/// Immutable name -> capabilities table, built once at startup.
#[derive(Debug, Clone, Default)]
pub struct StaticModelCatalog {
    models: HashMap<String, ModelDefinition>,
}

impl StaticModelCatalog {
    pub fn new(models: impl IntoIterator<Item = Model>) -> Self {
        StaticModelCatalog {
            models: models
                .into_iter()
                .map(|model| {
                    (
                        model.name,
                        ModelDefinition {
                            capabilities: model.capabilities,
                            options: model.options,
                        },
                    )
                })
                .collect(),
        }
    }

    /// Loads a catalog from a JSON object keyed by model name:
    ///
    /// ```json
    /// { "text-embedding-3-small": { "capabilities": ["input-text", "embeddings"] } }
    /// ```
    pub fn from_json_str(json: &str) -> PlatformResult<Self> {
        let models: HashMap<String, ModelDefinition> = serde_json::from_str(json)
            .map_err(|e| PlatformError::Configuration(format!("Invalid model catalog: {}", e)))?;
        if let Some(name) = models.keys().find(|name| name.trim().is_empty() || name.contains('?')) {
            return Err(PlatformError::Configuration(format!("Invalid model name in catalog: '{}'", name)));
        }
        debug!(models = models.len(), "Loaded model catalog");
        Ok(StaticModelCatalog { models })
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl ModelCatalog for StaticModelCatalog {
    fn model(&self, name: &str) -> PlatformResult<Model> {
        let (base, query_options) = parse_model_name(name)?;
        let definition = self
            .models
            .get(base)
            .ok_or_else(|| PlatformError::ModelNotFound(base.to_string()))?;

        let mut options = definition.options.clone();
        options.extend(query_options);
        Ok(Model {
            name: base.to_string(),
            capabilities: definition.capabilities.clone(),
            options,
        })
    }

    fn models(&self) -> Vec<Model> {
        let mut models: Vec<Model> = self
            .models
            .iter()
            .map(|(name, definition)| Model {
                name: name.clone(),
                capabilities: definition.capabilities.clone(),
                options: definition.options.clone(),
            })
            .collect();
        models.sort_by(|a, b| a.name.cmp(&b.name));
        models
    }
}

/// Catalog that accepts any model name and grants every capability.
///
/// For providers whose model list is open-ended (e.g. self-hosted runtimes).
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackModelCatalog;

impl ModelCatalog for FallbackModelCatalog {
    fn model(&self, name: &str) -> PlatformResult<Model> {
        let (base, options) = parse_model_name(name)?;
        Ok(Model::new(base, Capability::ALL).with_options(options))
    }

    fn models(&self) -> Vec<Model> {
        Vec::new()
    }
}

/// Splits `"name?key=value&flag=true"` into the base name and parsed options.
///
/// Values are read as integers, then floats, then booleans, and fall back
/// to strings. A key without `=` is `true`.
fn parse_model_name(name: &str) -> PlatformResult<(&str, Options)> {
    let (base, query) = match name.split_once('?') {
        Some((base, query)) => (base.trim(), Some(query)),
        None => (name.trim(), None),
    };
    if base.is_empty() {
        return Err(PlatformError::ModelNotFound(name.to_string()));
    }

    let mut options = Options::new();
    for pair in query.unwrap_or_default().split('&').filter(|pair| !pair.is_empty()) {
        match pair.split_once('=') {
            Some((key, value)) => options.insert(key.to_string(), parse_option_value(value)),
            None => options.insert(pair.to_string(), Value::Bool(true)),
        };
    }
    Ok((base, options))
}

fn parse_option_value(raw: &str) -> Value {
    if let Ok(int) = raw.parse::<i64>() {
        return Value::Number(int.into());
    }
    if let Some(float) = raw.parse::<f64>().ok().and_then(Number::from_f64) {
        return Value::Number(float);
    }
    match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => Value::String(raw.to_string()),
    }
}
