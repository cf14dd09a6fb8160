//! Dialogue state machine
//!
//! UNSTARTED → STARTED → AWAITING_SELECTION ⇄ AWAITING_PHOTO
//!
//! Every inbound message produces exactly one reply. The only I/O performed
//! here is the verification call made when a photo arrives while a landmark
//! is selected; the user's session stays locked until its outcome is applied.

use crate::catalog::Catalog;
use crate::classifier::{Event, EventClassifier, BEGIN_LABEL, RESTART_COMMAND};
use crate::models::{InboundMessage, Reply, UserId, VerificationOutcome};
use crate::state::{SessionState, SessionStore};
use crate::verification::Verifier;
use std::sync::Arc;
use tracing::{debug, info};

pub struct Dialogue {
    classifier: EventClassifier,
    catalog: Arc<Catalog>,
    sessions: Arc<dyn SessionStore>,
    verifier: Arc<dyn Verifier>,
}

impl Dialogue {
    pub fn new(
        catalog: Arc<Catalog>,
        sessions: Arc<dyn SessionStore>,
        verifier: Arc<dyn Verifier>,
    ) -> Self {
        Self {
            classifier: EventClassifier::default(),
            catalog,
            sessions,
            verifier,
        }
    }

    /// Also accept commands addressed to `bot_name` (`/start@bot_name`)
    pub fn with_bot_name(mut self, bot_name: Option<&str>) -> Self {
        self.classifier = EventClassifier::new(bot_name);
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn sessions(&self) -> &Arc<dyn SessionStore> {
        &self.sessions
    }

    /// Handle one inbound message for `user` and produce its reply
    pub async fn handle(&self, user: UserId, message: InboundMessage) -> Reply {
        let event = self.classifier.classify(message);
        let handle = self.sessions.session(user).await;

        // Held across the verification call: one event per user at a time
        let mut session = handle.lock().await;

        let from = session.name();
        let trigger = event.name();
        let (next, reply) = self.step(&session, event).await;

        if next != *session {
            debug!(user_id = %user, from, to = next.name(), trigger, "Session transition");
            *session = next;
        }

        reply
    }

    async fn step(&self, session: &SessionState, event: Event) -> (SessionState, Reply) {
        match (session, event) {

            // =============================
            // Restart wins from any state
            // =============================

            (_, Event::Restart) => (
                SessionState::Started,
                Reply::with_options(
                    format!("Hi! Press '{}' to begin.", BEGIN_LABEL),
                    vec![BEGIN_LABEL.to_string()],
                ),
            ),

            (SessionState::Unstarted, _) => (
                SessionState::Unstarted,
                Reply::text(format!("Unknown command. Send {} to begin.", RESTART_COMMAND)),
            ),

            // =============================
            // Started
            // =============================

            (SessionState::Started, Event::Begin) => (
                SessionState::AwaitingSelection,
                self.catalog_reply("Choose a landmark from the list:"),
            ),

            (SessionState::Started, _) => (
                SessionState::Started,
                Reply::with_options(
                    format!("Press '{}' to begin.", BEGIN_LABEL),
                    vec![BEGIN_LABEL.to_string()],
                ),
            ),

            // =============================
            // Awaiting selection
            // =============================

            (SessionState::AwaitingSelection, Event::Text(text)) => {
                match self.catalog.find_by_name(&text) {
                    Some(item) => (
                        SessionState::AwaitingPhoto { item: item.clone() },
                        Reply::removing_options(format!(
                            "You selected {}. Now send a photo of this landmark.",
                            item.name
                        )),
                    ),
                    None => (
                        SessionState::AwaitingSelection,
                        self.catalog_reply("Please choose a landmark from the list:"),
                    ),
                }
            }

            (SessionState::AwaitingSelection, Event::Begin) => (
                SessionState::AwaitingSelection,
                self.catalog_reply("Choose a landmark from the list:"),
            ),

            (SessionState::AwaitingSelection, Event::Photo(_)) => (
                SessionState::AwaitingSelection,
                self.catalog_reply("Pick a landmark first."),
            ),

            // =============================
            // Awaiting photo
            // =============================

            (SessionState::AwaitingPhoto { item }, Event::Photo(photo)) => {
                info!(landmark = %item.id, "Photo received, verifying");

                let outcome = self.verifier.verify(&item.id, photo).await;
                let verdict = match outcome {
                    VerificationOutcome::Matched(result) => format!("✅ Result: {}", result),
                    VerificationOutcome::Rejected => "🚫 Wrong landmark.".to_string(),
                    VerificationOutcome::Failed(error) => {
                        format!("⚠️ Verification failed: {}", error)
                    }
                };

                (
                    SessionState::AwaitingSelection,
                    self.catalog_reply(&format!("{}\n\nYou can pick another landmark:", verdict)),
                )
            }

            (SessionState::AwaitingPhoto { item }, Event::Text(_) | Event::Begin) => (
                session.clone(),
                Reply::text(format!("Now send a photo of {}.", item.name)),
            ),
        }
    }

    fn catalog_reply(&self, text: &str) -> Reply {
        Reply::with_options(text, self.catalog.names())
    }
}
