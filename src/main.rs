use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use log::{error, info, warn, LevelFilter};

mod utils;

use palaver::config::{self, AssistantConfig};
use palaver::seed;
use palaver::store::{ChatStore, StoreUpdate, ASSISTANT_CHAT_ID};
use palaver::{GeminiClient, MessageStatus};

/// Command line arguments for Palaver
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Palaver: a terminal chat client with an AI assistant thread.",
    long_about = "Palaver is a line-oriented chat client backed by in-memory demo data.\n\n\
    Messages sent to the 'ai-assistant' thread are answered by a remote\n\
    text-generation endpoint; everything else is simulated locally."
)]
struct Args {
    /// Override the assistant config file location
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write the log to this file instead of palaver.log
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

/// Read a line of input from stdin, trimming whitespace
fn read_line() -> Result<String> {
    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

/// Get the assistant config: environment variables win over the config
/// file; with neither, prompt for an API key.
fn resolve_config() -> Result<AssistantConfig> {
    if let Some(config) = config::resolve_config()? {
        return Ok(config);
    }

    eprintln!("Enter an API key for the text-generation endpoint (blank to skip):");
    let api_key = read_line().unwrap_or_default();
    let config = AssistantConfig::new(&api_key);

    if api_key.is_empty() {
        warn!("No API key configured; assistant replies will fall back to the apology message");
    } else if let Err(e) = config::save_config(&config) {
        eprintln!("Warning: Failed to save assistant config: {}", e);
    }

    Ok(config)
}

const HELP_TEXT: &str = "\
Commands:
  /chats         list chat summaries
  /contacts      list contacts
  /open <id>     switch the active thread
  /help          show this list
  /quit          exit
Anything else is sent to the active thread.";

fn print_help() {
    println!("{}", HELP_TEXT);
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_file_path = args
        .log_file
        .unwrap_or_else(|| PathBuf::from("palaver.log"));
    utils::setup_logging(&log_file_path, LevelFilter::Debug)?;

    info!("Palaver chat client starting up");
    info!(
        "System information: {} {}",
        std::env::consts::OS,
        std::env::consts::ARCH
    );

    if let Some(path) = args.config {
        config::set_config_path_override(path);
    }

    let assistant_config = resolve_config()?;
    let generator = Arc::new(GeminiClient::new(&assistant_config));

    let local_user = seed::demo_user();
    let (store, mut update_rx) = ChatStore::new(local_user.clone(), generator);
    store.seed_demo().await;

    println!(
        "Signed in as {} <{}>. Active thread: {}",
        local_user.display_name, local_user.email, ASSISTANT_CHAT_ID
    );
    print_help();

    let mut active_chat = ASSISTANT_CHAT_ID.to_string();

    // Blocking stdin reads happen on their own thread; lines arrive over a
    // channel so the loop can also drain store updates.
    let (input_tx, mut input_rx) = tokio::sync::mpsc::channel::<String>(16);
    std::thread::spawn(move || loop {
        match read_line() {
            Ok(line) => {
                if input_tx.blocking_send(line).is_err() {
                    break;
                }
            }
            Err(e) => {
                error!("Failed to read input: {}", e);
                break;
            }
        }
    });

    loop {
        tokio::select! {
            Some(line) = input_rx.recv() => {
                if line.is_empty() {
                    continue;
                }

                if line == "/quit" {
                    break;
                } else if line == "/help" {
                    print_help();
                } else if line == "/chats" {
                    for chat in store.chats().await {
                        let preview = chat
                            .last_message
                            .map(|m| m.text)
                            .unwrap_or_else(|| "(no messages)".to_string());
                        println!(
                            "  {} — {} [{} unread] {}",
                            chat.id, chat.display_name, chat.unread_count, preview
                        );
                    }
                } else if line == "/contacts" {
                    for contact in store.contacts().await {
                        let presence = if contact.is_online { "online" } else { "offline" };
                        println!("  {} — {} ({})", contact.id, contact.display_name, presence);
                    }
                } else if let Some(id) = line.strip_prefix("/open ") {
                    match store.chat_by_id(id.trim()).await {
                        Some(chat) => {
                            active_chat = chat.id.clone();
                            println!("Opened thread with {}", chat.display_name);
                            for message in store.messages(&active_chat).await {
                                println!("  {}: {}", message.sender_id, message.text);
                            }
                        }
                        None => println!("No chat or contact with id '{}'", id.trim()),
                    }
                } else if line.starts_with('/') {
                    println!("Unknown command: {}", line);
                } else {
                    store
                        .send_message(&active_chat, &line, &local_user.id, &Utc::now().to_rfc3339())
                        .await;
                }
            }
            Some(update) = update_rx.recv() => {
                match update {
                    StoreUpdate::MessageAppended { chat_id, message } => {
                        // The local user's own lines are already on screen.
                        if message.sender_id != local_user.id {
                            println!("[{}] {}: {}", chat_id, message.sender_id, message.text);
                        }
                    }
                    StoreUpdate::StatusChanged { message_id, status, .. } => {
                        let mark = match status {
                            MessageStatus::Sent => "sent",
                            MessageStatus::Delivered => "delivered",
                            MessageStatus::Read => "read",
                        };
                        info!("Message {} is now {}", message_id, mark);
                    }
                    StoreUpdate::Generating(true) => println!("(assistant is typing...)"),
                    StoreUpdate::Generating(false) => {}
                }
            }
            else => break,
        }
    }

    println!("Chat session ended.");
    Ok(())
}
