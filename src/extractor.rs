//! Character and scene extraction over a schema-constrained chat model

use crate::client::{ChatModel, CompletionRequest, OpenAiChat};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::splitter::TextSplitter;
use crate::types::{
    cast_schema, names_schema, scene_schema, story_character_schema, CastMember, CastResponse,
    NamesResponse, SceneAnalysis, StoryCharacter,
};

/// Fixed template for single-character extraction; `{story}` is replaced
/// with the story text verbatim
const CHARACTER_PROMPT: &str =
    "based on the following story, create a list of characters: {story}";

/// Only this many leading characters are scanned for bare name extraction
const NAME_SCAN_CHARS: usize = 8000;

/// Maximum overlap between adjacent scene chunks
const MAX_SCENE_OVERLAP: usize = 200;

/// Extracts structured character information from story text by delegating
/// understanding to a hosted model. Each operation issues exactly one
/// request per chunk of input and never retries.
pub struct Extractor<M: ChatModel> {
    model: M,
}

impl Extractor<OpenAiChat> {
    /// Build an extractor backed by an OpenAI-compatible endpoint
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(OpenAiChat::from_config(config)?))
    }
}

impl<M: ChatModel> Extractor<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    /// Extract a single character record from the story
    pub async fn extract_character(&self, story_text: &str) -> Result<StoryCharacter> {
        let story_text = require_story(story_text)?;

        let prompt = CHARACTER_PROMPT.replace("{story}", story_text);
        let content = self
            .model
            .complete(CompletionRequest {
                prompt,
                schema_name: "story_character".to_string(),
                schema: story_character_schema(),
            })
            .await?;

        let character: StoryCharacter = parse_payload(&content)?;
        if character.name.trim().is_empty() {
            return Err(Error::Schema("character name is empty".to_string()));
        }

        Ok(character)
    }

    /// Extract every main and supporting character with full detail
    pub async fn extract_cast(&self, story_text: &str) -> Result<Vec<CastMember>> {
        let story_text = require_story(story_text)?;

        let prompt = format!(
            "Analyze the following story script and identify all unique characters. \
             For each character, extract their name, provide a detailed physical description, \
             list their key personality traits, and summarize their background. \
             If any information is not explicitly stated, make reasonable inferences based on \
             the character's dialogue and actions.\n\n\
             Focus on identifying main and supporting characters only. \
             Ignore minor background characters that have no significant role.\n\n\
             Story script:\n{}",
            story_text
        );

        let content = self
            .model
            .complete(CompletionRequest {
                prompt,
                schema_name: "character_extraction".to_string(),
                schema: cast_schema(),
            })
            .await?;

        let response: CastResponse = parse_payload(&content)?;
        if response.characters.iter().any(|c| c.name.trim().is_empty()) {
            return Err(Error::Schema("cast contains a character with an empty name".to_string()));
        }

        tracing::debug!(count = response.characters.len(), "extracted cast");

        Ok(response.characters)
    }

    /// Extract bare character names from the beginning of the story
    pub async fn extract_character_names(&self, story_text: &str) -> Result<Vec<String>> {
        let story_text = require_story(story_text)?;
        let scan: String = story_text.chars().take(NAME_SCAN_CHARS).collect();

        let prompt = format!(
            "Analyze the beginning of this story and extract a list of character names that appear.\n\
             Only include actual character names, not generic terms like \"the man\" or \"a woman\" \
             unless they are the only way the character is referred to throughout the text.\n\n\
             Story beginning:\n{}\n\n\
             Extract all character names as simple strings in an array with no additional information.",
            scan
        );

        let content = self
            .model
            .complete(CompletionRequest {
                prompt,
                schema_name: "character_names".to_string(),
                schema: names_schema(),
            })
            .await?;

        let response: NamesResponse = parse_payload(&content)?;
        let names: Vec<String> = response
            .characters
            .into_iter()
            .filter(|n| !n.trim().is_empty())
            .collect();

        Ok(names)
    }

    /// Split the story into `num_scenes` chunks and analyze each one. When
    /// `character_names` is non-empty the model is told to use only those
    /// names, and anything else in its output is dropped.
    pub async fn extract_scenes(
        &self,
        story_text: &str,
        num_scenes: usize,
        character_names: &[String],
    ) -> Result<Vec<SceneAnalysis>> {
        let story_text = require_story(story_text)?;
        if num_scenes == 0 {
            return Err(Error::Input("number of scenes must be at least 1".to_string()));
        }

        let text_len = story_text.chars().count();
        let chunk_size = text_len.div_ceil(num_scenes);
        let chunk_overlap = (chunk_size / 10).min(MAX_SCENE_OVERLAP);

        let splitter = TextSplitter::new(chunk_size, chunk_overlap);
        let mut chunks = splitter.split(story_text);
        chunks.truncate(num_scenes);

        tracing::debug!(
            text_len,
            chunk_size,
            chunk_overlap,
            chunks = chunks.len(),
            "split story for scene analysis"
        );

        let mut scenes = Vec::with_capacity(chunks.len());
        for chunk in &chunks {
            let scene = self.analyze_chunk(chunk, character_names).await?;
            scenes.push(scene);
        }

        Ok(scenes)
    }

    async fn analyze_chunk(
        &self,
        chunk: &str,
        character_names: &[String],
    ) -> Result<SceneAnalysis> {
        let mut prompt = String::from(
            "Analyze this chunk of a story and extract key information that could be used \
             to create a visual scene.\n",
        );

        if !character_names.is_empty() {
            let quoted: Vec<String> = character_names.iter().map(|n| format!("\"{}\"", n)).collect();
            prompt.push_str(&format!(
                "\nIMPORTANT: You must only use these EXACT character names in your output \
                 (copy and paste them):\n{}\n\n\
                 If a character in the text is not in this list, match them to the closest name \
                 in the list or omit them.\n\
                 Do not add any new characters or modify the names in any way.\n",
                quoted.join(", ")
            ));
        } else {
            prompt.push_str(
                "\nExtract any character names that appear in this chunk. \
                 Use the exact name as it appears in the text.\n",
            );
        }

        prompt.push_str(&format!("\nStory chunk:\n{}", chunk));

        let content = self
            .model
            .complete(CompletionRequest {
                prompt,
                schema_name: "scene_analysis".to_string(),
                schema: scene_schema(),
            })
            .await?;

        let mut scene: SceneAnalysis = parse_payload(&content)?;

        if !character_names.is_empty() {
            let before = scene.characters.len();
            scene
                .characters
                .retain(|c| character_names.iter().any(|n| n == &c.name));
            if scene.characters.len() < before {
                tracing::warn!(
                    dropped = before - scene.characters.len(),
                    "scene contained character names outside the provided list"
                );
            }
        }

        Ok(scene)
    }
}

/// Reject empty input before any network activity
fn require_story(story_text: &str) -> Result<&str> {
    if story_text.trim().is_empty() {
        return Err(Error::Input("story text is empty".to_string()));
    }
    Ok(story_text)
}

fn parse_payload<T: serde::de::DeserializeOwned>(content: &str) -> Result<T> {
    serde_json::from_str(content)
        .map_err(|e| Error::Schema(format!("response did not match the requested shape: {}", e)))
}
