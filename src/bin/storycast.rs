//! Storycast binary - extract structured character information from a story

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use storycast::{Config, Error, Extractor};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the story text file
    story: PathBuf,

    /// Path to configuration file (default: ~/.config/storycast/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Model identifier (overrides config)
    #[arg(long)]
    model: Option<String>,

    /// Chat-completions endpoint base URL (overrides config)
    #[arg(long)]
    endpoint: Option<String>,

    /// Sampling temperature (overrides config)
    #[arg(long)]
    temperature: Option<f32>,

    /// What to extract from the story
    #[arg(long, value_enum, default_value = "character")]
    mode: Mode,

    /// Number of scenes to extract in scenes mode
    #[arg(long, default_value_t = 3)]
    num_scenes: usize,

    /// Character name to allow in scenes mode (repeatable); when omitted,
    /// names are first extracted from the story
    #[arg(long = "character")]
    characters: Vec<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq)]
enum Mode {
    /// Single character record (name, description, traits)
    Character,
    /// Full cast with backgrounds
    Cast,
    /// Bare character names
    Names,
    /// Scene-by-scene analysis
    Scenes,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    // Load config, falling back to defaults when no file exists
    let mut config = match args.config.clone().or_else(Config::default_path) {
        Some(path) if path.exists() => Config::from_file(&path)?,
        _ => Config::default(),
    };

    // Apply CLI overrides
    if let Some(model) = args.model {
        config.model = model;
    }
    if let Some(endpoint) = args.endpoint {
        config.endpoint = endpoint;
    }
    if let Some(temperature) = args.temperature {
        config.temperature = temperature;
    }

    let story = read_story(&args.story)?;

    println!("Story: {} ({} chars)", args.story.display(), story.chars().count());
    println!("Model: {}\n", config.model);

    let extractor = Extractor::from_config(&config)?;

    match args.mode {
        Mode::Character => {
            let character = extractor.extract_character(&story).await?;
            println!("{}", serde_json::to_string_pretty(&character)?);
        }
        Mode::Cast => {
            let cast = extractor.extract_cast(&story).await?;
            println!("Extracted {} character(s):\n", cast.len());
            println!("{}", serde_json::to_string_pretty(&cast)?);
        }
        Mode::Names => {
            let names = extractor.extract_character_names(&story).await?;
            println!("Extracted {} name(s):", names.len());
            for name in names {
                println!("  - {}", name);
            }
        }
        Mode::Scenes => {
            let names = if args.characters.is_empty() {
                println!("No character names provided, extracting them from the story...");
                let names = extractor.extract_character_names(&story).await?;
                println!("Using characters: {}\n", names.join(", "));
                names
            } else {
                args.characters
            };

            let scenes = extractor.extract_scenes(&story, args.num_scenes, &names).await?;
            println!("Extracted {} scene(s):\n", scenes.len());
            println!("{}", serde_json::to_string_pretty(&scenes)?);
        }
    }

    Ok(())
}

/// Read the story file, rejecting missing or empty input before any network
/// call is attempted
fn read_story(path: &PathBuf) -> Result<String, Error> {
    let story = std::fs::read_to_string(path)
        .map_err(|e| Error::Input(format!("cannot read {}: {}", path.display(), e)))?;

    if story.trim().is_empty() {
        return Err(Error::Input(format!("story file {} is empty", path.display())));
    }

    Ok(story)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_story_missing_file() {
        let err = read_story(&PathBuf::from("/nonexistent/story.txt")).unwrap_err();
        assert!(matches!(err, Error::Input(_)));
    }

    #[test]
    fn test_read_story_empty_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "  \n\n ").unwrap();

        let err = read_story(&file.path().to_path_buf()).unwrap_err();
        assert!(matches!(err, Error::Input(_)));
    }

    #[test]
    fn test_read_story_ok() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "Once upon a time.").unwrap();

        let story = read_story(&file.path().to_path_buf()).unwrap();
        assert_eq!(story, "Once upon a time.");
    }
}
