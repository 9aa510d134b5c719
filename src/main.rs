//! LOGEAUM terminal chat
//!
//! A line-based presentation layer over the conversation runtime.

use logeaum::{
    spawn_conversation, ClientConfig, ConversationEvent, ConversationHandle, HttpDialogueClient,
    LoggingService, Role, Turn,
};
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so the conversation stays readable on stdout
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "logeaum=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let config = ClientConfig::from_env()?;
    tracing::info!(api = %config.api_base_url, "Using dialogue service");

    let client = HttpDialogueClient::new(&config.api_base_url)?;
    let handle = spawn_conversation(LoggingService::new(Arc::new(client)));
    let mut events = handle.subscribe();

    println!("LOGEAUM - your mental health companion");
    println!();
    for turn in handle.snapshot() {
        print_turn(&turn);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let start_len = handle.snapshot().len();
        handle.submit(line).await?;
        wait_for_reply(&handle, &mut events, start_len).await;
    }

    Ok(())
}

/// Render events until the submission settles or is rejected
///
/// Assumes this binary is the only submitter, so any `Rejected` event is ours.
async fn wait_for_reply(
    handle: &ConversationHandle,
    events: &mut broadcast::Receiver<ConversationEvent>,
    start_len: usize,
) {
    loop {
        match events.recv().await {
            Ok(ConversationEvent::TurnAppended { turn }) if turn.role() == Role::Assistant => {
                print_turn(&turn);
            }
            Ok(ConversationEvent::BusyChanged { busy: true }) => {
                println!("  ...");
            }
            Ok(ConversationEvent::ReplySettled { .. }) => return,
            Ok(ConversationEvent::Rejected { message }) => {
                println!("  ({message})");
                return;
            }
            Ok(_) => {}
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Display fell behind");
                // The reply may have been among the skipped events
                let turns = handle.snapshot();
                if turns.len() >= start_len + 2 {
                    turns
                        .iter()
                        .skip(start_len)
                        .filter(|turn| turn.role() == Role::Assistant)
                        .for_each(print_turn);
                    return;
                }
            }
            Err(broadcast::error::RecvError::Closed) => return,
        }
    }
}

fn print_turn(turn: &Turn) {
    let speaker = match turn.role() {
        Role::User => "you",
        Role::Assistant => "logeaum",
    };
    println!("{speaker}: {}", turn.content().trim_end());
    println!();
}
