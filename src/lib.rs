//! storycast - structured character extraction from stories
//!
//! Reads a story, asks a hosted chat-completion model for character
//! information constrained to a JSON schema, validates the response, and
//! returns typed records. One request per operation, no retries.

pub mod client;
pub mod config;
pub mod error;
pub mod extractor;
pub mod splitter;
pub mod types;

pub use client::{ChatModel, CompletionRequest, OpenAiChat};
pub use config::Config;
pub use error::{Error, Result};
pub use extractor::Extractor;
pub use splitter::TextSplitter;
pub use types::{CastMember, SceneAnalysis, SceneCharacter, StoryCharacter};
