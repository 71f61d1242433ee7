// Canned demo data. Everything here is process-lifetime only and resets on
// restart; there is no persistence behind the store.

use std::collections::HashMap;

use chrono::{Duration, Utc};

use crate::models::{Chat, Contact, LastMessage, Message, MessageStatus, UserProfile};
use crate::store::ASSISTANT_CHAT_ID;

fn minutes_ago(minutes: i64) -> String {
    (Utc::now() - Duration::minutes(minutes)).to_rfc3339()
}

/// The demo local user. Matches sender id "2" in the canned threads.
pub fn demo_user() -> UserProfile {
    UserProfile {
        id: "2".to_string(),
        display_name: "Demo User".to_string(),
        email: "demo.user@example.com".to_string(),
        avatar_url: "https://images.pexels.com/photos/733872/pexels-photo-733872.jpeg".to_string(),
    }
}

pub fn demo_chats() -> Vec<Chat> {
    vec![
        Chat {
            id: "1".to_string(),
            display_name: "John Doe".to_string(),
            avatar_url: "https://images.pexels.com/photos/614810/pexels-photo-614810.jpeg"
                .to_string(),
            last_message: Some(LastMessage {
                text: "Hey, how are you doing?".to_string(),
                timestamp: minutes_ago(5),
                sender_id: "2".to_string(),
            }),
            unread_count: 2,
            is_online: true,
        },
        Chat {
            id: "2".to_string(),
            display_name: "Jane Smith".to_string(),
            avatar_url: "https://images.pexels.com/photos/733872/pexels-photo-733872.jpeg"
                .to_string(),
            last_message: Some(LastMessage {
                text: "Let me know when you're free to chat!".to_string(),
                timestamp: minutes_ago(60),
                sender_id: "1".to_string(),
            }),
            unread_count: 0,
            is_online: false,
        },
    ]
}

pub fn demo_contacts() -> Vec<Contact> {
    vec![
        Contact {
            id: "1".to_string(),
            display_name: "John Doe".to_string(),
            email: "john.doe@example.com".to_string(),
            avatar_url: "https://images.pexels.com/photos/614810/pexels-photo-614810.jpeg"
                .to_string(),
            is_online: true,
        },
        Contact {
            id: "2".to_string(),
            display_name: "Jane Smith".to_string(),
            email: "jane.smith@example.com".to_string(),
            avatar_url: "https://images.pexels.com/photos/733872/pexels-photo-733872.jpeg"
                .to_string(),
            is_online: false,
        },
        Contact {
            id: "3".to_string(),
            display_name: "Alex Johnson".to_string(),
            email: "alex.johnson@example.com".to_string(),
            avatar_url: "https://images.pexels.com/photos/1222271/pexels-photo-1222271.jpeg"
                .to_string(),
            is_online: true,
        },
        Contact {
            id: ASSISTANT_CHAT_ID.to_string(),
            display_name: "AI Assistant".to_string(),
            email: "ai@assistant.com".to_string(),
            avatar_url: "https://images.pexels.com/photos/8386440/pexels-photo-8386440.jpeg"
                .to_string(),
            is_online: true,
        },
    ]
}

pub fn demo_messages() -> HashMap<String, Vec<Message>> {
    let mut messages = HashMap::new();

    messages.insert(
        "1".to_string(),
        vec![
            demo_message("101", "Hey there!", "1", 60, MessageStatus::Read),
            demo_message("102", "Hi! How are you doing?", "2", 30, MessageStatus::Read),
            demo_message(
                "103",
                "I'm doing well, thanks for asking. How about you?",
                "1",
                25,
                MessageStatus::Read,
            ),
            demo_message(
                "104",
                "Pretty good! Just working on some projects.",
                "2",
                10,
                MessageStatus::Delivered,
            ),
            demo_message(
                "105",
                "Hey, how are you doing?",
                "1",
                5,
                MessageStatus::Delivered,
            ),
        ],
    );

    messages.insert(
        "2".to_string(),
        vec![
            demo_message("201", "Hello!", "2", 120, MessageStatus::Read),
            demo_message(
                "202",
                "Hi there! I was wondering if you'd like to meet up this weekend?",
                "1",
                60,
                MessageStatus::Read,
            ),
            demo_message(
                "203",
                "Let me know when you're free to chat!",
                "2",
                59,
                MessageStatus::Delivered,
            ),
        ],
    );

    // The assistant thread starts empty.
    messages.insert(ASSISTANT_CHAT_ID.to_string(), Vec::new());

    messages
}

fn demo_message(
    id: &str,
    text: &str,
    sender_id: &str,
    minutes: i64,
    status: MessageStatus,
) -> Message {
    Message {
        id: id.to_string(),
        text: text.to_string(),
        sender_id: sender_id.to_string(),
        timestamp: minutes_ago(minutes),
        status,
    }
}
