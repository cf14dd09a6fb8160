//! Landmark Verification Bot
//!
//! A conversational agent that:
//! - Walks each user through picking a landmark from a fixed catalog
//! - Accepts a photo of the chosen landmark
//! - Forwards photo + landmark id to a remote verification service
//! - Relays the verdict and offers the catalog again
//!
//! FLOW:
//! /start → START BUTTON → PICK LANDMARK → SEND PHOTO → VERDICT → PICK AGAIN

pub mod api;
pub mod catalog;
pub mod classifier;
pub mod config;
pub mod dialogue;
pub mod error;
pub mod models;
pub mod state;
pub mod verification;

pub use error::Result;

// Re-export common types
pub use models::*;
pub use catalog::{Catalog, CatalogEntry};
pub use classifier::{Event, EventClassifier};
pub use dialogue::Dialogue;
