//! Voice assistant
//!
//! Free-text commands are classified into an [`Intent`] by an ordered rule
//! table, then answered by [`VoiceAssistant`] using the POI catalog and
//! proximity search.

pub mod intent;
pub mod responder;

pub use intent::{Intent, IntentCategory, IntentClassifier, Landmark, PlaceKind};
pub use responder::{AssistantResponse, VoiceAssistant};
