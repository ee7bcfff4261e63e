//! LLM integration: the provider abstraction, the Gemini implementation,
//! and the gateway that the rest of the crate calls.

pub mod gateway;
pub mod mock;
pub mod provider;
pub mod providers;

pub use gateway::{ModelGateway, ModelTier};
pub use provider::{LLMError, LLMProvider, LLMRequest, LLMResponse, LLMStream, LLMStreamEvent};
