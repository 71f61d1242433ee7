// In-memory chat store with simulated delivery acknowledgements.
//
// The store owns the chat/contact/message collections, keeps chat summaries
// consistent with their threads, and delegates sends in the assistant
// conversation to the remote text generator. Delivery acknowledgements are
// simulated: every sent message is marked delivered and then read on fixed
// timers, with no real acknowledgement behind them.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use log::{debug, error, info};
use tokio::sync::mpsc;
use tokio::sync::Mutex as TokioMutex;

use crate::assistant::TextGenerator;
use crate::models::{Chat, Contact, LastMessage, Message, MessageStatus, UserProfile};

/// The one conversation id that triggers a remote generation call instead of
/// ordinary peer messaging.
pub const ASSISTANT_CHAT_ID: &str = "ai-assistant";

/// Substituted as the assistant's reply whenever the remote call fails.
pub const ASSISTANT_FALLBACK_REPLY: &str =
    "I apologize, but I encountered an error while processing your message. Please try again.";

/// How long after a send the simulated acknowledgements arrive. Both delays
/// are measured from the send itself, so `read` should exceed `delivered`.
#[derive(Debug, Clone, Copy)]
pub struct StatusDelays {
    pub delivered: Duration,
    pub read: Duration,
}

impl Default for StatusDelays {
    fn default() -> Self {
        StatusDelays {
            delivered: Duration::from_secs(1),
            read: Duration::from_secs(2),
        }
    }
}

/// Pushed to the presentation layer as the store mutates.
#[derive(Debug, Clone)]
pub enum StoreUpdate {
    MessageAppended {
        chat_id: String,
        message: Message,
    },
    StatusChanged {
        chat_id: String,
        message_id: String,
        status: MessageStatus,
    },
    /// The assistant generation call started (true) or finished (false).
    Generating(bool),
}

#[derive(Default)]
struct StoreInner {
    chats: Vec<Chat>,
    contacts: Vec<Contact>,
    messages: HashMap<String, Vec<Message>>,
}

/// Clonable handle over the shared chat state. Cloning is cheap; all clones
/// see the same collections.
#[derive(Clone)]
pub struct ChatStore {
    inner: Arc<TokioMutex<StoreInner>>,
    update_tx: mpsc::Sender<StoreUpdate>,
    local_user: UserProfile,
    generator: Arc<dyn TextGenerator>,
    generating: Arc<AtomicBool>,
    delays: StatusDelays,
    send_counter: Arc<AtomicU64>,
}

impl ChatStore {
    /// Create an empty store. Returns the store plus the receiver end of the
    /// update channel the presentation layer drains.
    pub fn new(
        local_user: UserProfile,
        generator: Arc<dyn TextGenerator>,
    ) -> (Self, mpsc::Receiver<StoreUpdate>) {
        Self::with_delays(local_user, generator, StatusDelays::default())
    }

    pub fn with_delays(
        local_user: UserProfile,
        generator: Arc<dyn TextGenerator>,
        delays: StatusDelays,
    ) -> (Self, mpsc::Receiver<StoreUpdate>) {
        let (update_tx, update_rx) = mpsc::channel(100);

        let store = ChatStore {
            inner: Arc::new(TokioMutex::new(StoreInner::default())),
            update_tx,
            local_user,
            generator,
            generating: Arc::new(AtomicBool::new(false)),
            delays,
            send_counter: Arc::new(AtomicU64::new(0)),
        };

        (store, update_rx)
    }

    /// Replace the collections with the canned demo data.
    pub async fn seed_demo(&self) {
        let mut inner = self.inner.lock().await;
        inner.chats = crate::seed::demo_chats();
        inner.contacts = crate::seed::demo_contacts();
        inner.messages = crate::seed::demo_messages();
        info!(
            "Seeded demo data: {} chats, {} contacts",
            inner.chats.len(),
            inner.contacts.len()
        );
    }

    /// Append a message to a chat, keep the chat summary consistent, and
    /// kick off the simulated acknowledgement timers. Sends to the
    /// assistant conversation additionally produce a generated reply (or the
    /// fixed apology if the remote call fails). Failures are absorbed; this
    /// never returns an error to the caller.
    pub async fn send_message(&self, chat_id: &str, text: &str, sender_id: &str, timestamp: &str) {
        let message = Message {
            id: self.next_message_id(),
            text: text.to_string(),
            sender_id: sender_id.to_string(),
            timestamp: timestamp.to_string(),
            status: MessageStatus::Sent,
        };
        let message_id = message.id.clone();

        {
            let mut inner = self.inner.lock().await;
            inner
                .messages
                .entry(chat_id.to_string())
                .or_default()
                .push(message.clone());
            touch_chat_summary(
                &mut inner,
                chat_id,
                text,
                timestamp,
                sender_id,
                &self.local_user.id,
            );
        }

        debug!("Appended message {} to chat {}", message_id, chat_id);
        self.emit(StoreUpdate::MessageAppended {
            chat_id: chat_id.to_string(),
            message,
        })
        .await;

        if chat_id == ASSISTANT_CHAT_ID {
            self.append_assistant_reply(text).await;
        }

        self.schedule_status_updates(chat_id, &message_id);
    }

    /// Whether an assistant generation call is currently in flight, for a
    /// "generating" indicator in the thread view.
    pub fn is_generating(&self) -> bool {
        self.generating.load(Ordering::SeqCst)
    }

    pub async fn chats(&self) -> Vec<Chat> {
        self.inner.lock().await.chats.clone()
    }

    pub async fn contacts(&self) -> Vec<Contact> {
        self.inner.lock().await.contacts.clone()
    }

    /// The ordered message sequence for a chat. Empty if nothing has been
    /// sent there yet.
    pub async fn messages(&self, chat_id: &str) -> Vec<Message> {
        self.inner
            .lock()
            .await
            .messages
            .get(chat_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Look up a chat summary by id, falling back to synthesizing a header
    /// from the contact list so a thread can be opened from the contacts
    /// screen before any message exists.
    pub async fn chat_by_id(&self, id: &str) -> Option<Chat> {
        let inner = self.inner.lock().await;

        if let Some(chat) = inner.chats.iter().find(|chat| chat.id == id) {
            return Some(chat.clone());
        }

        inner
            .contacts
            .iter()
            .find(|contact| contact.id == id)
            .map(|contact| Chat {
                id: contact.id.clone(),
                display_name: contact.display_name.clone(),
                avatar_url: contact.avatar_url.clone(),
                last_message: None,
                unread_count: 0,
                is_online: contact.is_online,
            })
    }

    pub fn local_user(&self) -> &UserProfile {
        &self.local_user
    }

    /// Run the remote generation call and append the outcome as an
    /// assistant-authored message. The generating flag is cleared no matter
    /// how the call ends.
    async fn append_assistant_reply(&self, prompt: &str) {
        self.generating.store(true, Ordering::SeqCst);
        self.emit(StoreUpdate::Generating(true)).await;

        let reply = match self.generator.generate(prompt).await {
            Ok(text) => text,
            Err(e) => {
                error!("Assistant generation failed: {}", e);
                ASSISTANT_FALLBACK_REPLY.to_string()
            }
        };

        self.generating.store(false, Ordering::SeqCst);
        self.emit(StoreUpdate::Generating(false)).await;

        let message = Message {
            id: self.next_message_id(),
            text: reply,
            sender_id: ASSISTANT_CHAT_ID.to_string(),
            timestamp: Utc::now().to_rfc3339(),
            status: MessageStatus::Sent,
        };

        {
            let mut inner = self.inner.lock().await;
            inner
                .messages
                .entry(ASSISTANT_CHAT_ID.to_string())
                .or_default()
                .push(message.clone());
        }

        self.emit(StoreUpdate::MessageAppended {
            chat_id: ASSISTANT_CHAT_ID.to_string(),
            message,
        })
        .await;
    }

    /// Spawn the two independent acknowledgement timers for a just-sent
    /// message. Each runs to completion whether or not the message still
    /// exists by then; a miss is a silent no-op.
    fn schedule_status_updates(&self, chat_id: &str, message_id: &str) {
        let transitions = [
            (self.delays.delivered, MessageStatus::Delivered),
            (self.delays.read, MessageStatus::Read),
        ];

        for (delay, status) in transitions {
            let store = self.clone();
            let chat_id = chat_id.to_string();
            let message_id = message_id.to_string();

            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                store.apply_status(&chat_id, &message_id, status).await;
            });
        }
    }

    async fn apply_status(&self, chat_id: &str, message_id: &str, status: MessageStatus) {
        let changed = {
            let mut inner = self.inner.lock().await;
            match inner
                .messages
                .get_mut(chat_id)
                .and_then(|thread| thread.iter_mut().find(|message| message.id == message_id))
            {
                // Forward-only: never regress a status that already advanced.
                Some(message) if status > message.status => {
                    message.status = status;
                    true
                }
                Some(_) => false,
                None => {
                    debug!(
                        "Status update for unknown message {} in chat {}",
                        message_id, chat_id
                    );
                    false
                }
            }
        };

        if changed {
            self.emit(StoreUpdate::StatusChanged {
                chat_id: chat_id.to_string(),
                message_id: message_id.to_string(),
                status,
            })
            .await;
        }
    }

    async fn emit(&self, update: StoreUpdate) {
        // A dropped receiver just means nobody is listening anymore.
        if let Err(e) = self.update_tx.send(update).await {
            debug!("No update listener: {}", e);
        }
    }

    /// Ids are derived from the current time, with a process-local counter
    /// mixed in so same-millisecond sends stay unique.
    fn next_message_id(&self) -> String {
        let counter = self.send_counter.fetch_add(1, Ordering::Relaxed);
        format!("{}-{}", Utc::now().timestamp_millis(), counter)
    }
}

/// Refresh a chat's last-message snapshot and unread counter after an
/// append. Unknown chat ids are left alone; the thread itself still exists.
fn touch_chat_summary(
    inner: &mut StoreInner,
    chat_id: &str,
    text: &str,
    timestamp: &str,
    sender_id: &str,
    local_user_id: &str,
) {
    if let Some(chat) = inner.chats.iter_mut().find(|chat| chat.id == chat_id) {
        chat.last_message = Some(LastMessage {
            text: text.to_string(),
            timestamp: timestamp.to_string(),
            sender_id: sender_id.to_string(),
        });

        if sender_id == local_user_id {
            chat.unread_count = 0;
        } else {
            chat.unread_count += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::GenerateError;
    use async_trait::async_trait;

    struct SilentGenerator;

    #[async_trait]
    impl TextGenerator for SilentGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, GenerateError> {
            Ok(String::new())
        }
    }

    fn test_user() -> UserProfile {
        UserProfile {
            id: "2".to_string(),
            display_name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            avatar_url: String::new(),
        }
    }

    #[test]
    fn test_message_ids_are_unique_within_a_millisecond() {
        let (store, _rx) = ChatStore::new(test_user(), Arc::new(SilentGenerator));

        let mut ids: Vec<String> = (0..100).map(|_| store.next_message_id()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 100, "ids collided");
    }

    #[tokio::test]
    async fn test_chat_by_id_falls_back_to_contact() {
        let (store, _rx) = ChatStore::new(test_user(), Arc::new(SilentGenerator));
        store.seed_demo().await;

        // "3" is a contact with no chat summary.
        let header = store.chat_by_id("3").await.unwrap();
        assert_eq!(header.display_name, "Alex Johnson");
        assert!(header.last_message.is_none());
        assert_eq!(header.unread_count, 0);

        // Unknown ids resolve to nothing.
        assert!(store.chat_by_id("nope").await.is_none());
    }
}
