use serde::{Deserialize, Serialize};

/// Delivery state of a message bubble.
///
/// Transitions are forward-only: Sent -> Delivered -> Read. The derived
/// ordering is what the store uses to refuse regressions.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Sent = 0,      // Appended locally, acknowledgement pending
    Delivered = 1, // Delivered to the recipient's device
    Read = 2,      // Read by the recipient
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub text: String,
    pub sender_id: String,
    /// RFC 3339 timestamp string, as the presentation layer expects it.
    pub timestamp: String,
    pub status: MessageStatus,
}

/// Denormalized snapshot of the newest message in a chat, kept on the chat
/// summary so list screens never have to walk the full thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LastMessage {
    pub text: String,
    pub timestamp: String,
    pub sender_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    pub id: String,
    pub display_name: String,
    pub avatar_url: String,
    pub last_message: Option<LastMessage>,
    pub unread_count: u32,
    pub is_online: bool,
}

/// An entry in the contacts list. Static for the lifetime of the process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    pub display_name: String,
    pub email: String,
    pub avatar_url: String,
    pub is_online: bool,
}

/// The authenticated local user, supplied by an external auth collaborator.
/// This crate only ever reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub display_name: String,
    pub email: String,
    pub avatar_url: String,
}
