//! Core data models for the landmark bot

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use uuid::Uuid;

//
// ================= Identity =================
//

/// Identity of the user a session belongs to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Map a transport-level user identifier onto a session key.
    ///
    /// UUIDs are used as-is; anything else (chat ids, usernames) is hashed
    /// into a stable v4-shaped UUID so the same user always lands on the
    /// same session.
    pub fn from_external(value: &str) -> Self {
        let value = value.trim();
        match Uuid::parse_str(value) {
            Ok(id) => Self(id),
            Err(_) => Self(stable_uuid_from_string(value)),
        }
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn stable_uuid_from_string(input: &str) -> Uuid {
    let hash = Sha256::digest(input.as_bytes());
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&hash[..16]);

    // Set UUID version (4) and variant (RFC4122) bits.
    bytes[6] = (bytes[6] & 0x0f) | 0x40;
    bytes[8] = (bytes[8] & 0x3f) | 0x80;

    Uuid::from_bytes(bytes)
}

//
// ================= Inbound =================
//

/// A raw message as delivered by a transport, before classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundMessage {
    Text(String),
    Photo(Vec<u8>),
}

//
// ================= Outbound =================
//

/// What the transport should do with its selectable options
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "labels", rename_all = "lowercase")]
pub enum Keyboard {
    /// Leave whatever is currently displayed
    Keep,
    /// Present these labels as the only valid next inputs
    Options(Vec<String>),
    /// Hide previously presented options
    Remove,
}

/// Exactly one of these is produced per handled event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub keyboard: Keyboard,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: Keyboard::Keep,
        }
    }

    pub fn with_options(text: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: Keyboard::Options(options),
        }
    }

    pub fn removing_options(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: Keyboard::Remove,
        }
    }

    /// Labels the transport should offer, if any
    pub fn options(&self) -> &[String] {
        match &self.keyboard {
            Keyboard::Options(labels) => labels,
            Keyboard::Keep | Keyboard::Remove => &[],
        }
    }
}

//
// ================= Verification =================
//

/// Verdict of a single remote verification attempt
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "outcome", content = "detail", rename_all = "lowercase")]
pub enum VerificationOutcome {
    /// The photo shows the claimed landmark
    Matched(String),
    /// The photo shows something else
    Rejected,
    /// No verdict could be obtained
    Failed(String),
}

impl VerificationOutcome {
    pub fn kind(&self) -> &'static str {
        match self {
            VerificationOutcome::Matched(_) => "matched",
            VerificationOutcome::Rejected => "rejected",
            VerificationOutcome::Failed(_) => "failed",
        }
    }
}
