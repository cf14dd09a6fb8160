//! Event Classifier
//!
//! Turns a raw inbound message into the event the dialogue reacts to.
//! Precedence: restart command, then photo, then the begin button, then
//! free text.

use crate::models::InboundMessage;

/// Command that resets the session
pub const RESTART_COMMAND: &str = "/start";

/// Label of the button that begins the selection flow
pub const BEGIN_LABEL: &str = "🚀 Start";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Restart,
    Photo(Vec<u8>),
    Begin,
    Text(String),
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::Restart => "restart",
            Event::Photo(_) => "photo",
            Event::Begin => "begin",
            Event::Text(_) => "text",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EventClassifier {
    /// Username commands may be addressed to (`/start@<name>`)
    bot_name: Option<String>,
}

impl EventClassifier {
    pub fn new(bot_name: Option<&str>) -> Self {
        Self {
            bot_name: bot_name
                .map(|name| name.trim().trim_start_matches('@').to_string())
                .filter(|name| !name.is_empty()),
        }
    }

    pub fn classify(&self, message: InboundMessage) -> Event {
        match message {
            InboundMessage::Text(text) if self.is_restart_command(&text) => Event::Restart,
            InboundMessage::Photo(bytes) => Event::Photo(bytes),
            InboundMessage::Text(text) if text == BEGIN_LABEL => Event::Begin,
            InboundMessage::Text(text) => Event::Text(text),
        }
    }

    /// `/start` at offset 0, then nothing, whitespace-separated arguments,
    /// or `@<bot name>` naming this bot
    fn is_restart_command(&self, text: &str) -> bool {
        let Some(rest) = text.strip_prefix(RESTART_COMMAND) else {
            return false;
        };

        if rest.is_empty() || rest.starts_with(char::is_whitespace) {
            return true;
        }

        let Some(addressed) = rest.strip_prefix('@') else {
            return false;
        };
        let name = addressed
            .split(char::is_whitespace)
            .next()
            .unwrap_or(addressed);

        match &self.bot_name {
            Some(own) => name.eq_ignore_ascii_case(own),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> InboundMessage {
        InboundMessage::Text(s.to_string())
    }

    fn classify(s: &str) -> Event {
        EventClassifier::new(Some("landmark_bot")).classify(text(s))
    }

    #[test]
    fn test_restart_variants() {
        let cases = vec![
            "/start",
            "/start@landmark_bot",
            "/start@Landmark_Bot",
            "/start deep-link",
            "/start\tjunk",
            "/start@landmark_bot deep-link",
        ];

        for c in cases {
            assert_eq!(classify(c), Event::Restart, "{:?}", c);
        }
    }

    #[test]
    fn test_restart_must_be_exact() {
        let cases = vec![
            "  /start",
            "/start@other_bot",
            "/start@landmark_bot_two",
            "/started",
            "/Start",
            "x /start",
        ];

        for c in cases {
            assert_eq!(classify(c), Event::Text(c.to_string()), "{:?}", c);
        }
    }

    #[test]
    fn test_addressed_restart_needs_configured_name() {
        let classifier = EventClassifier::default();

        assert_eq!(classifier.classify(text("/start")), Event::Restart);
        assert_eq!(
            classifier.classify(text("/start@landmark_bot")),
            Event::Text("/start@landmark_bot".to_string())
        );
        assert_eq!(
            EventClassifier::new(Some("@landmark_bot")).classify(text("/start@landmark_bot")),
            Event::Restart
        );
    }

    #[test]
    fn test_begin_is_exact() {
        assert_eq!(classify(BEGIN_LABEL), Event::Begin);
        assert_eq!(classify("🚀 start"), Event::Text("🚀 start".to_string()));
        assert_eq!(
            classify(&format!(" {}", BEGIN_LABEL)),
            Event::Text(format!(" {}", BEGIN_LABEL))
        );
    }

    #[test]
    fn test_photo_and_text() {
        let classifier = EventClassifier::default();

        assert_eq!(
            classifier.classify(InboundMessage::Photo(vec![1, 2, 3])),
            Event::Photo(vec![1, 2, 3])
        );
        assert_eq!(classify(""), Event::Text(String::new()));
    }
}
