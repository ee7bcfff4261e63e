//! Core library for Sidekick, an editor side-panel chat assistant.
//!
//! The interesting part is the context-selection pipeline: classify the
//! query, pick the workspace files worth sending, fold in conversation
//! history, then stream a Gemini answer back through a typed event channel.
//! Everything presentation-shaped lives in the front-end binary.

pub mod classifier;
pub mod config;
pub mod context;
pub mod gemini;
pub mod image;
pub mod llm;
pub mod prompts;
pub mod session;

pub use classifier::{QueryClassifier, QueryKind};
pub use config::SidekickConfig;
pub use context::{ContextCollector, ContextSnippet};
pub use image::ImageData;
pub use llm::{LLMError, ModelGateway, ModelTier};
pub use session::events::{event_channel, EventReceiver, EventSender, UiEvent};
pub use session::{ConversationSession, SessionCommand};
