//! Typed outbound event channel between the session and the presentation
//! sink.
//!
//! The session writes tagged events; the front-end drains them and decides
//! how to render. Serialization is part of the contract so a webview or any
//! other host can consume the same stream as JSON.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::context::ContextSnippet;
use crate::session::state::Speaker;

/// Everything the session ever tells the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum UiEvent {
    AppendMessage {
        sender: Speaker,
        text: String,
    },
    /// Loading started; `phases` are display labels cycled for pacing only.
    StartLoading {
        phases: Vec<String>,
    },
    StopLoading,
    StreamChunk {
        text: String,
    },
    /// Offer a follow-up answer over a larger file set. Carries the query
    /// and the exact snippets the first answer was grounded on.
    OfferLargerContext {
        query: String,
        context: Vec<ContextSnippet>,
    },
    ShowImagePreview {
        data_url: String,
    },
    ClearImagePreview,
    FileSuggestions {
        names: Vec<String>,
    },
}

pub type EventSender = mpsc::UnboundedSender<UiEvent>;
pub type EventReceiver = mpsc::UnboundedReceiver<UiEvent>;

pub fn event_channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}
