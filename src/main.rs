use anyhow::{Context, Result};
use care_label::config::AppConfig;
use care_label::material_dictionary::{Language, MaterialDictionary};
use care_label::material_extractor::{MaterialExtractor, OcrLine};
use care_label::observability;
use care_label::recommendation::{ClothingItem, RecommendationEngine, WeatherReading};
use serde::Serialize;
use std::env;
use std::fs;
use tracing::info;

const USAGE: &str = "Usage:
  care-label extract <text...>
  care-label lines <ocr_lines.json>
  care-label recommend <weather.json> <items.json>
  care-label properties <material> [japanese|english|chinese]";

/// Load and validate configuration at startup
fn load_configuration() -> Result<AppConfig> {
    let config = AppConfig::from_env().map_err(|e| {
        anyhow::anyhow!("Configuration loading failed: {}. Please check your environment variables.", e)
    })?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Configuration validation failed: {}", e))?;
    Ok(config)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &str) -> Result<T> {
    let content = fs::read_to_string(path).with_context(|| format!("Failed to read '{}'", path))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse '{}'", path))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    // Load environment variables from .env file first
    dotenvy::dotenv().ok();

    let config = load_configuration()?;
    observability::init_tracing(&config.logging)?;
    info!("{}", config.summary());

    let args: Vec<String> = env::args().skip(1).collect();
    let Some((command, rest)) = args.split_first() else {
        anyhow::bail!("{}", USAGE);
    };

    let dictionary = MaterialDictionary::shared();

    match command.as_str() {
        "extract" if !rest.is_empty() => {
            let extractor = MaterialExtractor::with_config(dictionary, config.extraction)?;
            let materials = extractor.extract(&rest.join(" "));
            print_json(&materials)
        }
        "lines" if rest.len() == 1 => {
            let lines: Vec<OcrLine> = read_json(&rest[0])?;
            let extractor = MaterialExtractor::with_config(dictionary, config.extraction)?;
            print_json(&extractor.process_lines(&lines))
        }
        "recommend" if rest.len() == 2 => {
            let weather: WeatherReading = read_json(&rest[0])?;
            let items: Vec<ClothingItem> = read_json(&rest[1])?;
            let engine = RecommendationEngine::new(dictionary);
            let result = engine.recommend(&items, &weather)?;
            print_json(&result)
        }
        "properties" if !rest.is_empty() && rest.len() <= 2 => {
            let language = match rest.get(1) {
                Some(language) => language.parse::<Language>()?,
                None => Language::English,
            };
            let engine = RecommendationEngine::new(dictionary);
            match engine.material_properties(&rest[0], language) {
                Some(properties) => print_json(properties),
                None => {
                    println!("null");
                    Ok(())
                }
            }
        }
        _ => anyhow::bail!("{}", USAGE),
    }
}
