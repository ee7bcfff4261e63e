//! Terminal presentation sink: a line-based REPL that drains the session's
//! event channel and renders it to stdout.
//!
//! The REPL owns the pending-attachment slot. An `:attach` stores the image
//! locally; the next prompt carries it inside the `UserPrompt` command, so
//! nothing ambient can clear it out from under an unrelated turn.

use std::io::Write as _;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use sidekick_core::session::state::Speaker;
use sidekick_core::{
    event_channel, ContextCollector, ContextSnippet, ConversationSession, EventReceiver,
    ImageData, ModelGateway, SessionCommand, SidekickConfig, UiEvent,
};

/// The last larger-context offer, replayed by `:expand`.
type OfferSlot = Arc<Mutex<Option<(String, Vec<ContextSnippet>)>>>;

pub async fn run(config: SidekickConfig, active_file: Option<PathBuf>) -> Result<()> {
    let gateway = Arc::new(ModelGateway::from_config(&config));
    let collector = ContextCollector::new(&config.workspace_root);
    let (events_tx, events_rx) = event_channel();
    let session = ConversationSession::new(gateway, collector, events_tx, active_file);

    let (commands_tx, commands_rx) = mpsc::unbounded_channel();
    let session_task = tokio::spawn(session.run(commands_rx));

    let offer: OfferSlot = Arc::new(Mutex::new(None));
    let renderer = tokio::spawn(render_events(events_rx, offer.clone()));

    println!("Sidekick ready. Type a question, :attach <path>, :files <fragment>, :expand, or :quit.");
    let mut pending_attachment: Option<ImageData> = None;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }
        if line == ":quit" || line == ":exit" {
            break;
        }
        if let Some(path) = line.strip_prefix(":attach ") {
            match ImageData::from_path(path.trim()) {
                Ok(image) => {
                    println!("[attached {} image]", image.mime_type);
                    pending_attachment = Some(image);
                }
                Err(error) => println!("[attach failed: {error}]"),
            }
            continue;
        }
        if let Some(fragment) = line.strip_prefix(":files ") {
            let _ = commands_tx.send(SessionCommand::GetFileList {
                query: fragment.trim().to_string(),
            });
            continue;
        }
        if line == ":expand" {
            let stored = offer.lock().unwrap().take();
            match stored {
                Some((query, context)) => {
                    let _ = commands_tx.send(SessionCommand::RequestLargerContext { query, context });
                }
                None => println!("[no larger-context offer available]"),
            }
            continue;
        }
        let _ = commands_tx.send(SessionCommand::UserPrompt {
            text: line,
            attachment: pending_attachment.take(),
        });
    }

    drop(commands_tx);
    session_task.await?;
    renderer.await?;
    Ok(())
}

async fn render_events(mut events: EventReceiver, offer: OfferSlot) {
    while let Some(event) = events.recv().await {
        match event {
            UiEvent::AppendMessage { sender, text } => {
                println!("[{}] {text}", sender_label(sender));
            }
            UiEvent::StartLoading { phases } => {
                println!("[loading] {}", phases.join(", "));
            }
            UiEvent::StopLoading => {
                println!();
            }
            UiEvent::StreamChunk { text } => {
                print!("{text}");
                std::io::stdout().flush().ok();
            }
            UiEvent::OfferLargerContext { query, context } => {
                *offer.lock().unwrap() = Some((query, context));
                println!("[type :expand for an answer with larger context]");
            }
            UiEvent::ShowImagePreview { data_url } => {
                println!("[image preview: {} bytes of data URL]", data_url.len());
            }
            UiEvent::ClearImagePreview => {}
            UiEvent::FileSuggestions { names } => {
                println!("[suggestions] {}", names.join(", "));
            }
        }
    }
}

fn sender_label(sender: Speaker) -> &'static str {
    match sender {
        Speaker::User => "you",
        Speaker::Assistant => "sidekick",
    }
}
