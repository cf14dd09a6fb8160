//! Console transport: talk to the bot from a terminal.
//!
//! `/photo <path>` sends a JPEG from disk, `/quit` exits, anything else is
//! sent as text.

use landmark_bot::{
    catalog::Catalog,
    config::BotConfig,
    dialogue::Dialogue,
    models::{InboundMessage, Keyboard, Reply, UserId},
    state::InMemorySessionStore,
    verification::HttpVerifier,
};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const CONSOLE_USER: &str = "console";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    // Logs go to stderr so they don't interleave with the conversation
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = BotConfig::from_env()?;

    let verifier = Arc::new(HttpVerifier::new(
        config.verify_url.clone(),
        config.verify_timeout,
    )?);
    let dialogue = Dialogue::new(
        Arc::new(Catalog::landmarks()?),
        Arc::new(InMemorySessionStore::new()),
        verifier,
    )
    .with_bot_name(config.bot_name.as_deref());

    info!(verify_url = %config.verify_url, "Console bot started");
    println!("Landmark bot. Type /start to begin, /photo <path> to send a photo, /quit to exit.");

    let user = UserId::from_external(CONSOLE_USER);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim_end_matches(['\r', '\n']).to_string();

        if line == "/quit" {
            break;
        }

        let message = match line.strip_prefix("/photo ") {
            Some(path) => match tokio::fs::read(path.trim()).await {
                Ok(bytes) => InboundMessage::Photo(bytes),
                Err(e) => {
                    warn!(path = %path.trim(), error = %e, "Could not read photo");
                    println!("! could not read {}: {}", path.trim(), e);
                    continue;
                }
            },
            None => InboundMessage::Text(line),
        };

        let reply = dialogue.handle(user, message).await;
        print_reply(&reply);
    }

    Ok(())
}

fn print_reply(reply: &Reply) {
    println!("bot> {}", reply.text);

    match &reply.keyboard {
        Keyboard::Options(labels) => {
            for label in labels {
                println!("     [{}]", label);
            }
        }
        Keyboard::Remove | Keyboard::Keep => {}
    }
}
