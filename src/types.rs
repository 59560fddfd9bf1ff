// Core records extracted from stories, plus their JSON schemas

use serde::{Deserialize, Serialize};
use serde_json::json;

/// A single character extracted from a story
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoryCharacter {
    pub name: String,
    pub description: String,
    pub traits: Vec<String>,
}

/// A member of the full cast, with background detail
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CastMember {
    pub name: String,
    pub description: String,
    pub traits: Vec<String>,
    pub background: String,
}

/// Wrapper for list-shaped responses; the provider requires object-typed
/// schemas at the top level
#[derive(Debug, Deserialize)]
pub struct CastResponse {
    pub characters: Vec<CastMember>,
}

#[derive(Debug, Deserialize)]
pub struct NamesResponse {
    pub characters: Vec<String>,
}

/// A character's appearance within one scene
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SceneCharacter {
    pub name: String,
    /// How important the character is to this scene, 1-10
    pub importance: u8,
}

/// Analysis of one chunk of the story
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SceneAnalysis {
    pub summary: String,
    pub characters: Vec<SceneCharacter>,
    pub setting: String,
    pub mood: String,
    pub visual_description: String,
}

/// JSON schema for a single [`StoryCharacter`]
pub fn story_character_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "name": { "type": "string", "description": "The character's name" },
            "description": { "type": "string", "description": "A brief description of the character" },
            "traits": {
                "type": "array",
                "items": { "type": "string" },
                "description": "List of character traits"
            }
        },
        "required": ["name", "description", "traits"],
        "additionalProperties": false
    })
}

/// JSON schema for the full-cast response
pub fn cast_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "characters": {
                "type": "array",
                "description": "All characters that appear in the story with relevant details",
                "items": {
                    "type": "object",
                    "properties": {
                        "name": { "type": "string", "description": "The character's full name" },
                        "description": { "type": "string", "description": "A detailed physical description of the character" },
                        "traits": {
                            "type": "array",
                            "items": { "type": "string" },
                            "description": "Key personality traits of the character"
                        },
                        "background": { "type": "string", "description": "Brief background or history of the character" }
                    },
                    "required": ["name", "description", "traits", "background"],
                    "additionalProperties": false
                }
            }
        },
        "required": ["characters"],
        "additionalProperties": false
    })
}

/// JSON schema for bare character-name extraction
pub fn names_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "characters": {
                "type": "array",
                "items": { "type": "string", "description": "A character name that appears in the story" },
                "description": "List of character names found in the story"
            }
        },
        "required": ["characters"],
        "additionalProperties": false
    })
}

/// JSON schema for one scene analysis
pub fn scene_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "summary": { "type": "string", "description": "A brief summary of what happens in this chunk of the story" },
            "characters": {
                "type": "array",
                "description": "Characters that appear in this chunk of the story",
                "items": {
                    "type": "object",
                    "properties": {
                        "name": { "type": "string", "description": "The character's name as it appears in the story" },
                        "importance": { "type": "integer", "minimum": 1, "maximum": 10, "description": "How important this character is to this chunk (1-10)" }
                    },
                    "required": ["name", "importance"],
                    "additionalProperties": false
                }
            },
            "setting": { "type": "string", "description": "The setting or location where this part of the story takes place" },
            "mood": { "type": "string", "description": "The mood or emotional tone of this part of the story" },
            "visual_description": { "type": "string", "description": "A detailed visual description of how this part of the story should look as an image" }
        },
        "required": ["summary", "characters", "setting", "mood", "visual_description"],
        "additionalProperties": false
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_story_character_schema_requires_all_fields() {
        let schema = story_character_schema();
        let required = schema["required"].as_array().unwrap();
        assert_eq!(required.len(), 3);
        assert!(required.iter().any(|v| v == "name"));
        assert!(required.iter().any(|v| v == "traits"));
    }

    #[test]
    fn test_character_deserializes_from_valid_payload() {
        let payload = r#"{"name":"Ada","description":"A curious inventor","traits":["clever","persistent"]}"#;
        let character: StoryCharacter = serde_json::from_str(payload).unwrap();
        assert_eq!(character.name, "Ada");
        assert_eq!(character.traits, vec!["clever", "persistent"]);
    }

    #[test]
    fn test_character_rejects_missing_field() {
        let payload = r#"{"description":"A curious inventor","traits":[]}"#;
        assert!(serde_json::from_str::<StoryCharacter>(payload).is_err());
    }

    #[test]
    fn test_empty_traits_is_well_typed() {
        let payload = r#"{"name":"Ada","description":"x","traits":[]}"#;
        let character: StoryCharacter = serde_json::from_str(payload).unwrap();
        assert!(character.traits.is_empty());
    }
}
