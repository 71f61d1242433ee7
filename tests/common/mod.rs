// Common test utilities for integration tests
// This module contains shared code for all integration tests

use std::sync::Arc;
use std::sync::Once;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use log::{info, LevelFilter};
use tokio::sync::mpsc::Receiver;
use tokio::time::timeout;

use palaver::assistant::{GenerateError, TextGenerator};
use palaver::models::UserProfile;
use palaver::store::{ChatStore, StatusDelays, StoreUpdate};

// Initialize logging once
static INIT_LOGGER: Once = Once::new();

/// Set up the logger for the tests
pub fn setup_logging() {
    INIT_LOGGER.call_once(|| {
        env_logger::Builder::new()
            .filter_level(LevelFilter::Debug)
            .is_test(true)
            .init();
    });
}

/// Stubbed generation outcome for driving the assistant path without a
/// network.
pub enum StubOutcome {
    Reply(String),
    /// Reply after a pause, to observe the generating flag mid-flight.
    SlowReply(Duration, String),
    Fail,
}

pub struct StubGenerator {
    outcome: StubOutcome,
}

impl StubGenerator {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(StubGenerator {
            outcome: StubOutcome::Reply(text.to_string()),
        })
    }

    pub fn slow(delay: Duration, text: &str) -> Arc<Self> {
        Arc::new(StubGenerator {
            outcome: StubOutcome::SlowReply(delay, text.to_string()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(StubGenerator {
            outcome: StubOutcome::Fail,
        })
    }
}

#[async_trait]
impl TextGenerator for StubGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, GenerateError> {
        match &self.outcome {
            StubOutcome::Reply(text) => Ok(text.clone()),
            StubOutcome::SlowReply(delay, text) => {
                tokio::time::sleep(*delay).await;
                Ok(text.clone())
            }
            StubOutcome::Fail => Err(GenerateError::Status(
                reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            )),
        }
    }
}

/// The local user the demo threads are written around.
pub fn test_user() -> UserProfile {
    UserProfile {
        id: "2".to_string(),
        display_name: "Test User".to_string(),
        email: "test.user@example.com".to_string(),
        avatar_url: String::new(),
    }
}

/// Delays short enough for tests while keeping the two transitions clearly
/// separated.
pub fn fast_delays() -> StatusDelays {
    StatusDelays {
        delivered: Duration::from_millis(100),
        read: Duration::from_millis(200),
    }
}

/// Build a demo-seeded store with fast acknowledgement timers.
pub async fn seeded_store(
    generator: Arc<dyn TextGenerator>,
) -> (ChatStore, Receiver<StoreUpdate>) {
    let (store, update_rx) = ChatStore::with_delays(test_user(), generator, fast_delays());
    store.seed_demo().await;
    (store, update_rx)
}

/// Wait for a specific store update matching the predicate with timeout
pub async fn wait_for_update(
    update_rx: &mut Receiver<StoreUpdate>,
    predicate: impl Fn(&StoreUpdate) -> bool,
    timeout_secs: u64,
) -> Result<StoreUpdate> {
    info!("Waiting for store update...");
    match timeout(Duration::from_secs(timeout_secs), async {
        while let Some(update) = update_rx.recv().await {
            if predicate(&update) {
                return Ok(update);
            }
        }
        Err(anyhow::anyhow!("Update receiver closed"))
    })
    .await
    {
        Ok(result) => result,
        Err(_) => Err(anyhow::anyhow!("Timed out waiting for store update")),
    }
}
