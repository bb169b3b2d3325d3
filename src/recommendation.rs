//! # Wear Recommendations
//!
//! Maps a weather reading to a temperature band, a recommendation text and
//! the garment categories suited to it, then filters the caller's stored
//! items down to those categories.
//!
//! Bands are evaluated in descending-threshold order and the first match
//! wins:
//!
//! | Temperature  | Band                                   | Categories                   |
//! |--------------|----------------------------------------|------------------------------|
//! | t ≥ 30       | hot                                    | tshirt, shortpant            |
//! | 25 ≤ t < 30  | humid-warm (humidity > 70) or warm     | tshirt, shortpant            |
//! | 20 ≤ t < 25  | mild-rain (Rain / Drizzle) or pleasant | longsleeve, pant (+shortpant)|
//! | 15 ≤ t < 20  | cool                                   | longsleeve, pant             |
//! | 10 ≤ t < 15  | getting-cold                           | longsleeve, pant             |
//! | t < 10       | cold                                   | longsleeve, pant             |
//!
//! Only the garment category decides which items are recommended. Material
//! properties are available through
//! [`RecommendationEngine::material_properties`] for detail views.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::{error_logging, AppError, AppResult};
use crate::material_dictionary::{Language, MaterialDictionary, MaterialProperties};
use crate::observability;

/// Garment category produced by the upstream image classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GarmentCategory {
    Pant,
    ShortPant,
    LongSleeve,
    TShirt,
}

impl GarmentCategory {
    pub const ALL: [GarmentCategory; 4] = [
        GarmentCategory::Pant,
        GarmentCategory::ShortPant,
        GarmentCategory::LongSleeve,
        GarmentCategory::TShirt,
    ];

    /// Identifier used in storage (`"shortpant"`)
    pub fn as_str(&self) -> &'static str {
        match self {
            GarmentCategory::Pant => "pant",
            GarmentCategory::ShortPant => "shortpant",
            GarmentCategory::LongSleeve => "longsleeve",
            GarmentCategory::TShirt => "tshirt",
        }
    }

    /// Human-readable label (`"Short Pants"`)
    pub fn display_label(&self) -> &'static str {
        match self {
            GarmentCategory::Pant => "Pants",
            GarmentCategory::ShortPant => "Short Pants",
            GarmentCategory::LongSleeve => "Long Sleeve",
            GarmentCategory::TShirt => "T-shirt",
        }
    }
}

impl fmt::Display for GarmentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GarmentCategory {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GarmentCategory::ALL
            .iter()
            .copied()
            .find(|category| category.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| AppError::InvalidInput(format!("Unknown garment category '{}'", s)))
    }
}

fn default_temperature() -> f64 {
    20.0
}

fn default_humidity() -> f64 {
    50.0
}

fn default_condition() -> String {
    "Clear".to_string()
}

/// Current weather supplied by the weather collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    /// Temperature in °C
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Relative humidity in %
    #[serde(default = "default_humidity")]
    pub humidity: f64,
    /// Condition tag such as "Clear", "Rain" or "Snow"
    #[serde(default = "default_condition")]
    pub condition: String,
}

impl Default for WeatherReading {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            humidity: default_humidity(),
            condition: default_condition(),
        }
    }
}

impl WeatherReading {
    pub fn new(temperature: f64, humidity: f64, condition: impl Into<String>) -> Self {
        Self {
            temperature,
            humidity,
            condition: condition.into(),
        }
    }

    fn validate(&self) -> AppResult<()> {
        if !self.temperature.is_finite() {
            return Err(AppError::InvalidInput(format!(
                "temperature must be a finite number, got {}",
                self.temperature
            )));
        }
        if !self.humidity.is_finite() {
            return Err(AppError::InvalidInput(format!(
                "humidity must be a finite number, got {}",
                self.humidity
            )));
        }
        Ok(())
    }
}

/// Temperature band selected for a weather reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherBand {
    Hot,
    HumidWarm,
    Warm,
    MildRain,
    Pleasant,
    Cool,
    GettingCold,
    Cold,
}

impl WeatherBand {
    /// Select the band for a reading.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidInput`] when temperature or humidity is
    /// not finite.
    pub fn classify(weather: &WeatherReading) -> AppResult<Self> {
        weather.validate()?;
        let t = weather.temperature;

        let band = if t >= 30.0 {
            WeatherBand::Hot
        } else if t >= 25.0 {
            if weather.humidity > 70.0 {
                WeatherBand::HumidWarm
            } else {
                WeatherBand::Warm
            }
        } else if t >= 20.0 {
            if matches!(weather.condition.as_str(), "Rain" | "Drizzle") {
                WeatherBand::MildRain
            } else {
                WeatherBand::Pleasant
            }
        } else if t >= 15.0 {
            WeatherBand::Cool
        } else if t >= 10.0 {
            WeatherBand::GettingCold
        } else {
            WeatherBand::Cold
        };
        Ok(band)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherBand::Hot => "hot",
            WeatherBand::HumidWarm => "humid_warm",
            WeatherBand::Warm => "warm",
            WeatherBand::MildRain => "mild_rain",
            WeatherBand::Pleasant => "pleasant",
            WeatherBand::Cool => "cool",
            WeatherBand::GettingCold => "getting_cold",
            WeatherBand::Cold => "cold",
        }
    }

    /// Garment categories recommended in this band
    pub fn categories(&self) -> &'static [GarmentCategory] {
        use GarmentCategory::*;
        match self {
            WeatherBand::Hot | WeatherBand::HumidWarm | WeatherBand::Warm => &[TShirt, ShortPant],
            WeatherBand::Pleasant => &[LongSleeve, Pant, ShortPant],
            WeatherBand::MildRain
            | WeatherBand::Cool
            | WeatherBand::GettingCold
            | WeatherBand::Cold => &[LongSleeve, Pant],
        }
    }

    /// Recommendation text for this band
    pub fn render(&self, weather: &WeatherReading) -> String {
        let t = weather.temperature;
        match self {
            WeatherBand::Hot => format!(
                "Hot weather ({t}°C):\n\
                 Recommended clothing:\n\
                 - Loose, lightweight cotton T-shirts\n\
                 - Breathable shorts\n\
                 Tips:\n\
                 - Choose light-colored clothing\n\
                 - Avoid tight-fitting clothes\n\
                 - Consider wearing a sun hat"
            ),
            WeatherBand::HumidWarm => format!(
                "Humid and warm ({t}°C, Humidity {h}%):\n\
                 Recommended clothing:\n\
                 - Moisture-wicking short-sleeve T-shirts\n\
                 - Loose-fitting shorts\n\
                 Material recommendations:\n\
                 - Prefer cotton and linen fabrics\n\
                 - Avoid non-breathable synthetic materials",
                h = weather.humidity
            ),
            WeatherBand::Warm => format!(
                "Warm weather ({t}°C):\n\
                 Recommended clothing:\n\
                 - Comfortable short-sleeve T-shirts\n\
                 - Casual shorts\n\
                 - Consider bringing a light jacket"
            ),
            WeatherBand::MildRain => format!(
                "Mild with rain ({t}°C):\n\
                 Recommended clothing:\n\
                 - Long-sleeve shirts or T-shirts\n\
                 - Long pants\n\
                 Material recommendations:\n\
                 - Choose water-resistant or quick-drying fabrics\n\
                 - Avoid easily discolored clothing"
            ),
            WeatherBand::Pleasant => format!(
                "Pleasant weather ({t}°C):\n\
                 Recommended clothing:\n\
                 - Long-sleeve T-shirts or shirts\n\
                 - Choice of long pants or shorts\n\
                 Tips:\n\
                 - Bring a light jacket\n\
                 - Adjust based on activities"
            ),
            WeatherBand::Cool => format!(
                "Cool weather ({t}°C):\n\
                 Recommended clothing:\n\
                 - Long-sleeve shirts or sweaters\n\
                 - Long pants\n\
                 Tips:\n\
                 - Consider a light coat\n\
                 - Jeans or casual pants recommended"
            ),
            WeatherBand::GettingCold => format!(
                "Getting cold ({t}°C):\n\
                 Recommended clothing:\n\
                 - Warm long-sleeve tops\n\
                 - Thicker pants\n\
                 Tips:\n\
                 - Layer with a light sweater\n\
                 - Consider thermal underwear"
            ),
            WeatherBand::Cold => format!(
                "Cold weather ({t}°C):\n\
                 Recommended clothing:\n\
                 - Thermal underwear\n\
                 - Sweater or warm top\n\
                 - Insulated pants\n\
                 Tips:\n\
                 - Wear thermal base layers\n\
                 - Choose wool, down, or other warm materials\n\
                 - Pay attention to keeping neck and other exposed areas warm"
            ),
        }
    }
}

/// A stored garment offered to the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClothingItem {
    pub id: i64,
    pub category: GarmentCategory,
    /// Material identifiers as stored; passed through unchanged
    #[serde(default)]
    pub materials: Vec<String>,
    #[serde(default)]
    pub recognized_text: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub label_image_url: Option<String>,
}

impl ClothingItem {
    pub fn new(id: i64, category: GarmentCategory) -> Self {
        Self {
            id,
            category,
            materials: Vec::new(),
            recognized_text: None,
            image_url: None,
            label_image_url: None,
        }
    }

    pub fn with_materials<I, S>(mut self, materials: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.materials = materials.into_iter().map(Into::into).collect();
        self
    }
}

/// A recommended item annotated for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendedItem {
    pub id: i64,
    pub category: GarmentCategory,
    pub category_label: &'static str,
    pub materials: Vec<String>,
    pub recognized_text: Option<String>,
    pub image_url: Option<String>,
    pub label_image_url: Option<String>,
}

impl From<&ClothingItem> for RecommendedItem {
    fn from(item: &ClothingItem) -> Self {
        Self {
            id: item.id,
            category: item.category,
            category_label: item.category.display_label(),
            materials: item.materials.clone(),
            recognized_text: item.recognized_text.clone(),
            image_url: item.image_url.clone(),
            label_image_url: item.label_image_url.clone(),
        }
    }
}

/// Recommendation for one weather reading
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationResult {
    pub band: WeatherBand,
    pub text: String,
    pub categories: Vec<GarmentCategory>,
    pub items: Vec<RecommendedItem>,
    pub temperature: f64,
    pub humidity: f64,
    pub condition: String,
}

/// Weather-driven recommendation rules
#[derive(Debug, Clone)]
pub struct RecommendationEngine {
    dictionary: Arc<MaterialDictionary>,
}

impl RecommendationEngine {
    pub fn new(dictionary: Arc<MaterialDictionary>) -> Self {
        Self { dictionary }
    }

    /// Build a recommendation and filter `items` to the band's categories
    pub fn recommend(&self, items: &[ClothingItem], weather: &WeatherReading) -> AppResult<RecommendationResult> {
        let band = WeatherBand::classify(weather).inspect_err(|e| {
            error_logging::log_invalid_input(
                e,
                "recommend",
                "weather",
                Some(format!("{:?}", weather).as_str()),
            );
        })?;
        let categories = band.categories();

        let recommended: Vec<RecommendedItem> = items
            .iter()
            .filter(|item| categories.contains(&item.category))
            .map(RecommendedItem::from)
            .collect();

        debug!(
            band = band.as_str(),
            categories = ?categories,
            candidates = items.len(),
            "Weather band selected"
        );
        observability::record_recommendation(band.as_str(), items.len(), recommended.len());
        info!(
            temperature = weather.temperature,
            humidity = weather.humidity,
            condition = %weather.condition,
            band = band.as_str(),
            recommended = recommended.len(),
            "Recommendation generated"
        );

        Ok(RecommendationResult {
            band,
            text: band.render(weather),
            categories: categories.to_vec(),
            items: recommended,
            temperature: weather.temperature,
            humidity: weather.humidity,
            condition: weather.condition.clone(),
        })
    }

    /// Detail lookup of a material's properties; does not affect filtering
    pub fn material_properties(&self, material: &str, language: Language) -> Option<&'static MaterialProperties> {
        self.dictionary.material_properties(material, language)
    }
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::new(MaterialDictionary::shared())
    }
}
