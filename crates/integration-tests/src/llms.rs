pub mod common;
pub mod google;
pub mod openai;
mod provider;

pub use common::{RecordedRequest, RequestLog};
pub use google::GoogleMock;
pub use openai::OpenAIMock;
pub use provider::{LlmProviderConfig, ProviderType, TestLlmProvider, generate_config};
