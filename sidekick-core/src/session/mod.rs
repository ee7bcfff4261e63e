//! The conversation session: per-panel orchestrator that turns inbound
//! commands into classified, context-grounded, streamed answers.
//!
//! Commands are processed strictly sequentially by one consumer loop. A
//! prompt arriving while a stream is in flight waits in the channel and runs
//! after the current turn, so a turn always reaches idle before the next
//! begins.

pub mod events;
pub mod mentions;
pub mod state;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::classifier::{QueryClassifier, QueryKind};
use crate::config::constants::ui;
use crate::context::{ContextCollector, ContextSnippet};
use crate::image::ImageData;
use crate::llm::{LLMStreamEvent, ModelGateway};
use crate::session::events::{EventSender, UiEvent};
use crate::session::state::{ConversationState, Speaker};

/// Inbound commands accepted from the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum SessionCommand {
    /// A user message. The attachment travels with the prompt it belongs
    /// to; the session never holds one between turns.
    UserPrompt {
        text: String,
        attachment: Option<ImageData>,
    },
    /// Replay of an earlier [`UiEvent::OfferLargerContext`] payload.
    RequestLargerContext {
        query: String,
        context: Vec<ContextSnippet>,
    },
    /// Ask for file-name suggestions matching a typed fragment.
    GetFileList { query: String },
}

pub struct ConversationSession {
    gateway: Arc<ModelGateway>,
    classifier: QueryClassifier,
    collector: ContextCollector,
    events: EventSender,
    state: ConversationState,
    active_file: Option<PathBuf>,
    /// Workspace paths preloaded once for `@` suggestions.
    suggestion_paths: Vec<PathBuf>,
}

impl ConversationSession {
    pub fn new(
        gateway: Arc<ModelGateway>,
        collector: ContextCollector,
        events: EventSender,
        active_file: Option<PathBuf>,
    ) -> Self {
        let suggestion_paths = collector.candidate_files();
        Self {
            classifier: QueryClassifier::new(gateway.clone()),
            gateway,
            collector,
            events,
            state: ConversationState::new(),
            active_file,
            suggestion_paths,
        }
    }

    pub fn set_active_file(&mut self, path: Option<PathBuf>) {
        self.active_file = path;
    }

    pub fn history(&self) -> &ConversationState {
        &self.state
    }

    /// Drain the command channel until the sender side closes.
    pub async fn run(mut self, mut commands: mpsc::UnboundedReceiver<SessionCommand>) {
        while let Some(command) = commands.recv().await {
            self.handle(command).await;
        }
    }

    pub async fn handle(&mut self, command: SessionCommand) {
        match command {
            SessionCommand::UserPrompt { text, attachment } => {
                self.prompt_turn(text, attachment).await;
            }
            SessionCommand::RequestLargerContext { query, context } => {
                self.expansion_turn(query, context).await;
            }
            SessionCommand::GetFileList { query } => self.suggest_files(&query),
        }
    }

    async fn prompt_turn(&mut self, text: String, attachment: Option<ImageData>) {
        self.state.push_user(text.clone());
        self.emit(UiEvent::AppendMessage {
            sender: Speaker::User,
            text: text.clone(),
        });
        self.emit(UiEvent::StartLoading {
            phases: phase_labels(ui::PROMPT_PHASES),
        });

        if !self.gateway.has_credential() {
            self.emit(UiEvent::AppendMessage {
                sender: Speaker::Assistant,
                text: "No Gemini API key configured. Set GEMINI_API_KEY and restart.".to_string(),
            });
            self.emit(UiEvent::StopLoading);
            self.emit(UiEvent::ClearImagePreview);
            return;
        }

        let kind = self.classifier.classify_kind(&text).await;
        let file_paths = self.select_context_paths(&kind, &text).await;
        let mut context = self.collector.collect_for(&file_paths);
        if let Some(history) = self.state.history_snippet() {
            context.insert(0, history);
        }

        self.emit(UiEvent::AppendMessage {
            sender: Speaker::Assistant,
            text: file_list_message("Context files", &file_paths),
        });

        let answer = self.stream_answer(&context, &text, attachment).await;
        self.emit(UiEvent::StopLoading);
        self.emit(UiEvent::ClearImagePreview);
        self.state.push_assistant(answer);

        if kind.takes_code_query_path() {
            self.emit(UiEvent::OfferLargerContext {
                query: text,
                context,
            });
        }
    }

    /// One level deeper: rerun the query over the original snippets plus any
    /// files the classifier asks for. No further expansion is offered.
    async fn expansion_turn(&mut self, query: String, context: Vec<ContextSnippet>) {
        self.state.push_user(format!("[Larger context] {query}"));
        self.emit(UiEvent::StartLoading {
            phases: phase_labels(ui::EXPANSION_PHASES),
        });

        let additional = self.classifier.select_additional_files(&query, &context).await;
        let mut full_context = context;
        if additional.is_empty() {
            self.emit(UiEvent::AppendMessage {
                sender: Speaker::Assistant,
                text: "Additional context files (0): None".to_string(),
            });
        } else {
            let paths: Vec<PathBuf> = additional.iter().map(PathBuf::from).collect();
            full_context.extend(self.collector.collect_for(&paths));
            self.emit(UiEvent::AppendMessage {
                sender: Speaker::Assistant,
                text: file_list_message("Additional context files", &paths),
            });
        }
        self.emit(UiEvent::AppendMessage {
            sender: Speaker::Assistant,
            text: "### Answer with larger context:".to_string(),
        });

        let answer = self.stream_answer(&full_context, &query, None).await;
        self.emit(UiEvent::StopLoading);
        self.state.push_assistant(answer);
    }

    fn suggest_files(&self, query: &str) {
        let fragment = query.to_lowercase();
        let names: Vec<String> = self
            .suggestion_paths
            .iter()
            .filter(|path| path.to_string_lossy().to_lowercase().contains(&fragment))
            .take(ui::MAX_FILE_SUGGESTIONS)
            .filter_map(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .collect();
        self.emit(UiEvent::FileSuggestions { names });
    }

    /// Context-selection decision procedure: empty for small talk, the
    /// active file for explain-file, mention-then-classifier selection for
    /// the code-query branch with an active-file fallback.
    async fn select_context_paths(&self, kind: &QueryKind, query: &str) -> Vec<PathBuf> {
        match kind {
            QueryKind::SmallTalk => Vec::new(),
            QueryKind::ExplainFile => self.active_file.iter().cloned().collect(),
            QueryKind::CodeQuery | QueryKind::Unrecognized(_) => {
                let candidates = self.collector.candidate_files();
                let (mentioned, other) = mentions::partition_by_mention(query, &candidates);
                let pool = if mentioned.is_empty() { &candidates } else { &other };
                let pool_strings: Vec<String> =
                    pool.iter().map(|p| p.display().to_string()).collect();
                let classifier_picked = self.classifier.select_files(query, &pool_strings).await;

                let mut selected = mentioned.clone();
                for picked in classifier_picked {
                    let path = PathBuf::from(picked);
                    if !selected.contains(&path) {
                        selected.push(path);
                    }
                }
                if selected.is_empty() {
                    selected = self.active_file.iter().cloned().collect();
                }
                selected
            }
        }
    }

    /// Stream one answer, forwarding each chunk as an event. A mid-stream
    /// provider failure keeps the chunks already emitted; the accumulated
    /// text still becomes the assistant turn.
    async fn stream_answer(
        &self,
        context: &[ContextSnippet],
        query: &str,
        attachment: Option<ImageData>,
    ) -> String {
        let mut stream = self
            .gateway
            .generate_streaming(context, query, attachment)
            .await;
        let mut answer = String::new();
        while let Some(item) = stream.next().await {
            match item {
                Ok(LLMStreamEvent::Token { delta }) => {
                    answer.push_str(&delta);
                    self.emit(UiEvent::StreamChunk { text: delta });
                }
                Ok(LLMStreamEvent::Completed) => break,
                Err(error) => {
                    tracing::warn!("stream failed mid-answer: {error}");
                    self.emit(UiEvent::AppendMessage {
                        sender: Speaker::Assistant,
                        text: format!("AI request failed: {error}"),
                    });
                    break;
                }
            }
        }
        answer
    }

    fn emit(&self, event: UiEvent) {
        if self.events.send(event).is_err() {
            tracing::debug!("event channel closed; presentation sink is gone");
        }
    }
}

fn phase_labels(phases: &[&str]) -> Vec<String> {
    phases.iter().map(|p| p.to_string()).collect()
}

fn file_list_message(heading: &str, paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return format!("{heading} (0): None");
    }
    let names: Vec<String> = paths.iter().map(|p| bold_base_name(p)).collect();
    format!("{heading} ({}):\n{}", paths.len(), names.join("\n"))
}

fn bold_base_name(path: &Path) -> String {
    let base = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    format!("**{base}**")
}
