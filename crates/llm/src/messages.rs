use config::{DEFAULT_TEMPERATURE, ExtraFields, GenerationDefaults};
use serde::{Deserialize, Serialize, ser::SerializeMap};
use serde_json::{Map, Value};

/// Key under which the top response text is exposed.
pub const CONTENT_KEY: &str = "content";

/// Role of a message author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// Instructions steering the model.
    System,
    /// The human side of the conversation.
    User,
    /// Earlier model output.
    Assistant,
}

/// One turn of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChatMessage {
    /// Author of the message.
    pub role: ChatRole,
    /// Free text.
    pub content: String,
}

impl ChatMessage {
    /// Create a message with the given role.
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(ChatRole::System, content)
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content)
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, content)
    }
}

/// Sampling controls, scoped to a single request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParameters {
    /// Sampling temperature. Higher values produce more random output.
    pub temperature: f32,
    /// Upper bound on generated tokens.
    pub max_tokens: Option<u32>,
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: None,
        }
    }
}

impl GenerationParameters {
    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the token limit.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

impl From<GenerationDefaults> for GenerationParameters {
    fn from(defaults: GenerationDefaults) -> Self {
        Self {
            temperature: defaults.temperature,
            max_tokens: defaults.max_tokens,
        }
    }
}

/// Per-call options beyond the generation parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtraOptions {
    /// Overrides the configured model for this call.
    pub model: Option<String>,
    /// Opaque fields, forwarded verbatim to the provider.
    ///
    /// Fields naming a parameter the connector sets itself are dropped.
    pub fields: ExtraFields,
}

impl ExtraOptions {
    /// Override the model for this call.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Add a pass-through field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }
}

/// An embedding, dimensionality defined by the provider's model.
pub type EmbeddingVector = Vec<f32>;

/// Normalized chat response.
///
/// `content` always holds the top response text and is never empty. Anything else the
/// provider returned at the top level is kept unmodified in the extras. Serializes as
/// a single flat object in which `content` takes precedence over a vendor field of the
/// same name.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatResult {
    content: String,
    extras: Map<String, Value>,
}

impl ChatResult {
    /// Returns `None` when `content` is empty.
    pub(crate) fn new(content: String, mut extras: Map<String, Value>) -> Option<Self> {
        if content.is_empty() {
            return None;
        }

        extras.remove(CONTENT_KEY);

        Some(Self { content, extras })
    }

    /// Top response text.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// A provider-specific field, e.g. `choices` or `candidates`.
    pub fn extra(&self, key: &str) -> Option<&Value> {
        self.extras.get(key)
    }

    /// All provider-specific fields.
    pub fn extras(&self) -> &Map<String, Value> {
        &self.extras
    }

    /// Consume the result, keeping only the text.
    pub fn into_content(self) -> String {
        self.content
    }
}

impl Serialize for ChatResult {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.extras.len() + 1))?;
        map.serialize_entry(CONTENT_KEY, &self.content)?;

        for (key, value) in &self.extras {
            map.serialize_entry(key, value)?;
        }

        map.end()
    }
}
