//! # Care-Label Material Extraction
//!
//! Extracts canonical garment materials from noisy Japanese / English OCR
//! text printed on clothing care labels, and derives weather-appropriate
//! wear recommendations from stored garments.

pub mod config;
pub mod errors;
pub mod fuzzy_matcher;
pub mod material_dictionary;
pub mod material_extractor;
pub mod observability;
pub mod recommendation;
pub mod segmenter;
pub mod text_normalizer;

// Re-export types for easier access
pub use material_dictionary::{CanonicalMaterial, Language, MaterialDictionary, MaterialProperties};
pub use material_extractor::{LabelExtraction, MaterialExtractor, MaterialMatch, OcrLine};
pub use recommendation::{
    ClothingItem, GarmentCategory, RecommendationEngine, RecommendationResult, WeatherReading,
};
