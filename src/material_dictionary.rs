//! # Material Dictionary
//!
//! The closed catalog of canonical garment materials, the surface forms
//! (Japanese, English, Chinese and known OCR mis-reads) that denote them, and
//! the per-material property table used for detail displays.
//!
//! The dictionary is built once from static tables and shared read-only via
//! [`MaterialDictionary::shared`]. Extraction never creates a material that is
//! not in the catalog.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use lazy_static::lazy_static;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use crate::errors::AppError;
use crate::text_normalizer::normalize_strict;

/// Language of a surface form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Japanese,
    English,
    Chinese,
}

impl FromStr for Language {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "japanese" | "ja" => Ok(Language::Japanese),
            "english" | "en" => Ok(Language::English),
            "chinese" | "zh" => Ok(Language::Chinese),
            other => Err(AppError::InvalidInput(format!(
                "Unsupported language '{}'",
                other
            ))),
        }
    }
}

/// A catalog row: one canonical material and every form that denotes it
#[derive(Debug)]
struct CatalogEntry {
    id: &'static str,
    japanese: &'static [&'static str],
    english: &'static [&'static str],
    chinese: &'static [&'static str],
    /// Glyphs the label OCR commonly returns instead of the real name
    ocr_misreads: &'static [&'static str],
}

static CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        id: "cotton",
        japanese: &["綿", "コットン"],
        english: &["cotton"],
        chinese: &["棉", "棉花"],
        ocr_misreads: &["錦"],
    },
    CatalogEntry {
        id: "linen",
        japanese: &["リネン"],
        english: &["linen"],
        chinese: &["麻", "亚麻"],
        ocr_misreads: &[],
    },
    CatalogEntry {
        id: "silk",
        japanese: &["絹", "シルク"],
        english: &["silk", "silk fiber"],
        chinese: &["丝绸", "蚕丝"],
        ocr_misreads: &[],
    },
    CatalogEntry {
        id: "wool",
        japanese: &["毛", "ウール"],
        english: &["wool"],
        chinese: &["羊毛"],
        ocr_misreads: &[],
    },
    CatalogEntry {
        id: "cashmere",
        japanese: &["カシミヤ", "カシミア"],
        english: &["cashmere"],
        chinese: &["羊绒", "开司米羊绒"],
        ocr_misreads: &[],
    },
    CatalogEntry {
        id: "polyester",
        japanese: &["ポリエステル"],
        english: &["polyester"],
        chinese: &["涤纶", "聚酯纤维"],
        ocr_misreads: &[],
    },
    CatalogEntry {
        id: "nylon",
        japanese: &["ナイロン"],
        english: &["nylon"],
        chinese: &["锦纶", "尼龙"],
        ocr_misreads: &[],
    },
    CatalogEntry {
        id: "acrylic",
        japanese: &["アクリル"],
        english: &["acrylic"],
        chinese: &["腈纶", "丙烯酸纤维"],
        ocr_misreads: &[],
    },
    CatalogEntry {
        id: "spandex",
        japanese: &["スパンデックス", "エラスタン"],
        english: &["spandex", "elastane", "lycra"],
        chinese: &["氨纶", "莱卡", "弹力纤维"],
        ocr_misreads: &[],
    },
    CatalogEntry {
        id: "vinylon",
        japanese: &["ビニロン"],
        english: &["vinylon", "polyvinyl alcohol fiber"],
        chinese: &["维纶", "聚乙烯醇纤维"],
        ocr_misreads: &[],
    },
    CatalogEntry {
        id: "polypropylene",
        japanese: &["ポリプロピレン"],
        english: &["polypropylene"],
        chinese: &["丙纶", "聚丙烯纤维"],
        ocr_misreads: &[],
    },
    CatalogEntry {
        id: "polyurethane",
        japanese: &["ポリウレタン"],
        english: &["polyurethane"],
        chinese: &["聚氨酯"],
        ocr_misreads: &[],
    },
    CatalogEntry {
        id: "polyethylene",
        japanese: &["ポリエチレン"],
        english: &["polyethylene"],
        chinese: &["聚乙烯"],
        ocr_misreads: &[],
    },
    CatalogEntry {
        id: "rayon",
        japanese: &["レーヨン", "人絹", "ビスコース"],
        english: &["rayon", "viscose"],
        chinese: &["人造丝", "再生纤维素纤维"],
        ocr_misreads: &[],
    },
    CatalogEntry {
        id: "modal",
        japanese: &["モダール"],
        english: &["modal"],
        chinese: &["莫代尔", "莫代尔纤维"],
        ocr_misreads: &[],
    },
    CatalogEntry {
        id: "lyocell",
        japanese: &["テンセル", "リヨセル"],
        english: &["lyocell", "tencel"],
        chinese: &["天丝", "莱赛尔"],
        ocr_misreads: &[],
    },
    CatalogEntry {
        id: "bamboo fiber",
        japanese: &["竹繊維", "バンブーファイバー"],
        english: &["bamboo fiber", "bamboo charcoal fiber"],
        chinese: &["竹纤维", "竹炭纤维"],
        ocr_misreads: &[],
    },
    CatalogEntry {
        id: "acetate",
        japanese: &["アセテート"],
        english: &["acetate", "acetate fiber"],
        chinese: &["醋酸纤维", "醋酸酯"],
        ocr_misreads: &[],
    },
    CatalogEntry {
        id: "triacetate",
        japanese: &["トリアセテート"],
        english: &["triacetate"],
        chinese: &["三醋酸纤维"],
        ocr_misreads: &[],
    },
    CatalogEntry {
        id: "leather",
        japanese: &["レザー", "革"],
        english: &["leather", "genuine leather"],
        chinese: &["皮革", "真皮", "牛皮"],
        ocr_misreads: &[],
    },
    CatalogEntry {
        id: "alpaca",
        japanese: &["アルパカ", "アルパカウール"],
        english: &["alpaca", "alpaca wool"],
        chinese: &["羊驼毛", "羊驼绒"],
        ocr_misreads: &[],
    },
    CatalogEntry {
        id: "velvet",
        japanese: &["ベルベット", "ビロード"],
        english: &["velvet"],
        chinese: &["天鹅绒", "丝绒"],
        ocr_misreads: &[],
    },
    CatalogEntry {
        id: "flannel",
        japanese: &["フランネル", "ネル生地"],
        english: &["flannel"],
        chinese: &["法兰绒", "绒毛布"],
        ocr_misreads: &[],
    },
    CatalogEntry {
        id: "corduroy",
        japanese: &["コーデュロイ", "畝物", "畝布"],
        english: &["corduroy"],
        chinese: &["灯芯绒", "条绒"],
        ocr_misreads: &[],
    },
    CatalogEntry {
        id: "denim",
        japanese: &["デニム"],
        english: &["denim"],
        chinese: &["牛仔布", "丹宁布"],
        ocr_misreads: &[],
    },
    CatalogEntry {
        id: "lamb wool",
        japanese: &["ラムウール"],
        english: &["lamb wool", "ram wool", "lambswool"],
        chinese: &["羊羔毛"],
        ocr_misreads: &[],
    },
    CatalogEntry {
        id: "angora",
        japanese: &["アンゴラ"],
        english: &["angora"],
        chinese: &["兔毛", "安哥拉兔毛"],
        ocr_misreads: &[],
    },
    CatalogEntry {
        id: "hemp",
        japanese: &["麻", "ヘンプ"],
        english: &["hemp"],
        chinese: &["麻", "大麻纤维"],
        ocr_misreads: &[],
    },
    CatalogEntry {
        id: "fleece",
        japanese: &["フリース"],
        english: &["fleece"],
        chinese: &["抓绒", "摇粒绒"],
        ocr_misreads: &[],
    },
];

/// Physical and seasonal properties of a material, for detail displays
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialProperties {
    /// Comfortable temperature range in °C (min, max)
    pub temp_range: (i32, i32),
    /// Comfortable relative humidity range in % (min, max)
    pub humidity_range: (i32, i32),
    pub weather_conditions: &'static [&'static str],
    pub properties: &'static [&'static str],
    pub description: &'static str,
    pub seasonal_use: &'static [&'static str],
}

// rayon, polyurethane, vinylon, polypropylene, polyethylene, acetate and
// triacetate have no entry.
static PROPERTIES: &[(&str, MaterialProperties)] = &[
    (
        "cotton",
        MaterialProperties {
            temp_range: (15, 30),
            humidity_range: (30, 60),
            weather_conditions: &["Clear", "Clouds", "Light Rain"],
            properties: &["breathable", "moisture-wicking", "comfortable"],
            description: "Perfect for warm weather, cotton offers excellent breathability and moisture absorption.",
            seasonal_use: &["spring", "summer"],
        },
    ),
    (
        "linen",
        MaterialProperties {
            temp_range: (20, 35),
            humidity_range: (30, 70),
            weather_conditions: &["Clear", "Clouds", "Hot"],
            properties: &["highly breathable", "moisture-wicking", "cooling"],
            description: "Ideal for hot weather, linen keeps you cool with superior breathability.",
            seasonal_use: &["summer"],
        },
    ),
    (
        "silk",
        MaterialProperties {
            temp_range: (18, 25),
            humidity_range: (40, 60),
            weather_conditions: &["Clear", "Clouds"],
            properties: &["temperature-regulating", "lightweight", "smooth"],
            description: "A versatile luxury fiber that adapts to body temperature.",
            seasonal_use: &["spring", "summer", "fall"],
        },
    ),
    (
        "wool",
        MaterialProperties {
            temp_range: (-10, 15),
            humidity_range: (40, 70),
            weather_conditions: &["Cold", "Snow", "Rain", "Clear"],
            properties: &["warm", "water-resistant", "insulating"],
            description: "Excellent for cold weather, providing warmth even when damp.",
            seasonal_use: &["fall", "winter"],
        },
    ),
    (
        "cashmere",
        MaterialProperties {
            temp_range: (-5, 15),
            humidity_range: (30, 50),
            weather_conditions: &["Clear", "Cold", "Snow"],
            properties: &["extremely soft", "warm", "lightweight"],
            description: "Premium warm material perfect for cold weather while remaining lightweight.",
            seasonal_use: &["fall", "winter"],
        },
    ),
    (
        "polyester",
        MaterialProperties {
            temp_range: (10, 25),
            humidity_range: (30, 80),
            weather_conditions: &["Clear", "Rain", "Snow", "Clouds"],
            properties: &["durable", "quick-drying", "lightweight"],
            description: "Versatile synthetic fiber suitable for various weather conditions.",
            seasonal_use: &["all seasons"],
        },
    ),
    (
        "nylon",
        MaterialProperties {
            temp_range: (5, 25),
            humidity_range: (30, 80),
            weather_conditions: &["Clear", "Rain", "Light Snow"],
            properties: &["strong", "water-resistant", "lightweight"],
            description: "Durable synthetic material good for outdoor activities.",
            seasonal_use: &["all seasons"],
        },
    ),
    (
        "spandex",
        MaterialProperties {
            temp_range: (15, 30),
            humidity_range: (30, 70),
            weather_conditions: &["Clear", "Clouds", "Indoor"],
            properties: &["stretchy", "form-fitting", "moisture-wicking"],
            description: "Stretchy material perfect for athletic wear and comfort.",
            seasonal_use: &["all seasons"],
        },
    ),
    (
        "modal",
        MaterialProperties {
            temp_range: (15, 30),
            humidity_range: (40, 60),
            weather_conditions: &["Clear", "Clouds"],
            properties: &["soft", "breathable", "eco-friendly"],
            description: "Sustainable fabric with excellent softness and breathability.",
            seasonal_use: &["spring", "summer"],
        },
    ),
    (
        "lyocell",
        MaterialProperties {
            temp_range: (15, 30),
            humidity_range: (40, 60),
            weather_conditions: &["Clear", "Clouds", "Light Rain"],
            properties: &["eco-friendly", "moisture-wicking", "antibacterial"],
            description: "Sustainable material with excellent moisture management.",
            seasonal_use: &["spring", "summer", "fall"],
        },
    ),
    (
        "bamboo fiber",
        MaterialProperties {
            temp_range: (15, 30),
            humidity_range: (40, 70),
            weather_conditions: &["Clear", "Clouds", "Humid"],
            properties: &["antibacterial", "moisture-wicking", "eco-friendly"],
            description: "Natural fiber with antibacterial properties and good breathability.",
            seasonal_use: &["spring", "summer"],
        },
    ),
    (
        "leather",
        MaterialProperties {
            temp_range: (5, 20),
            humidity_range: (40, 60),
            weather_conditions: &["Clear", "Light Rain", "Cold"],
            properties: &["durable", "water-resistant", "protective"],
            description: "Durable material that offers protection and style.",
            seasonal_use: &["fall", "winter"],
        },
    ),
    (
        "corduroy",
        MaterialProperties {
            temp_range: (5, 20),
            humidity_range: (30, 60),
            weather_conditions: &["Clear", "Cold", "Clouds"],
            properties: &["warm", "durable", "comfortable"],
            description: "Warm and durable fabric perfect for cool weather.",
            seasonal_use: &["fall", "winter"],
        },
    ),
    (
        "denim",
        MaterialProperties {
            temp_range: (10, 25),
            humidity_range: (30, 70),
            weather_conditions: &["Clear", "Clouds", "Light Rain"],
            properties: &["durable", "versatile", "protective"],
            description: "Sturdy and versatile material suitable for various conditions.",
            seasonal_use: &["all seasons"],
        },
    ),
    (
        "flannel",
        MaterialProperties {
            temp_range: (0, 15),
            humidity_range: (30, 60),
            weather_conditions: &["Cold", "Clear", "Snow"],
            properties: &["warm", "soft", "comfortable"],
            description: "Soft, warm fabric ideal for cold weather comfort.",
            seasonal_use: &["fall", "winter"],
        },
    ),
    (
        "velvet",
        MaterialProperties {
            temp_range: (5, 20),
            humidity_range: (30, 50),
            weather_conditions: &["Clear", "Cold", "Indoor"],
            properties: &["warm", "luxurious", "soft"],
            description: "Luxurious fabric best suited for cooler temperatures.",
            seasonal_use: &["fall", "winter"],
        },
    ),
    (
        "lamb wool",
        MaterialProperties {
            temp_range: (-5, 15),
            humidity_range: (40, 60),
            weather_conditions: &["Cold", "Snow", "Clear"],
            properties: &["warm", "soft", "lightweight"],
            description: "Soft and warm wool from young sheep, perfect for cold weather.",
            seasonal_use: &["fall", "winter"],
        },
    ),
    (
        "angora",
        MaterialProperties {
            temp_range: (-3, 10),
            humidity_range: (30, 50),
            weather_conditions: &["Cold", "Clear"],
            properties: &["extremely soft", "warm", "fluffy"],
            description: "Luxuriously soft wool from Angora rabbits, providing exceptional warmth.",
            seasonal_use: &["winter"],
        },
    ),
    (
        "hemp",
        MaterialProperties {
            temp_range: (15, 30),
            humidity_range: (40, 70),
            weather_conditions: &["Clear", "Clouds", "Mild"],
            properties: &["durable", "breathable", "eco-friendly"],
            description: "Sustainable and strong natural fiber with excellent breathability.",
            seasonal_use: &["spring", "summer", "fall"],
        },
    ),
    (
        "fleece",
        MaterialProperties {
            temp_range: (0, 15),
            humidity_range: (30, 60),
            weather_conditions: &["Cold", "Clear", "Snow"],
            properties: &["warm", "soft", "lightweight"],
            description: "Synthetic fabric that provides excellent insulation and warmth.",
            seasonal_use: &["fall", "winter"],
        },
    ),
    (
        "alpaca",
        MaterialProperties {
            temp_range: (-5, 15),
            humidity_range: (40, 60),
            weather_conditions: &["Cold", "Snow", "Clear"],
            properties: &["warmer than wool", "soft", "lightweight"],
            description: "Warmer and lighter than traditional wool, perfect for cold weather.",
            seasonal_use: &["fall", "winter"],
        },
    ),
    (
        "acrylic",
        MaterialProperties {
            temp_range: (10, 25),
            humidity_range: (30, 70),
            weather_conditions: &["Clouds", "Light Rain", "Clear", "Indoor"],
            properties: &["warm", "lightweight", "soft", "quick-drying"],
            description: "Synthetic fiber with good insulation and versatility, suitable for various conditions.",
            seasonal_use: &["fall", "spring", "early winter"],
        },
    ),
];

/// A canonical material identifier from the closed catalog.
///
/// Values can only be obtained from a [`MaterialDictionary`], so every
/// instance names a catalog material. Serializes as a plain string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalMaterial(&'static str);

impl CanonicalMaterial {
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for CanonicalMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl Serialize for CanonicalMaterial {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0)
    }
}

impl<'de> Deserialize<'de> for CanonicalMaterial {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let id = String::deserialize(deserializer)?;
        MaterialDictionary::shared()
            .canonical(&id)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown material '{}'", id)))
    }
}

/// Lookup tables over the static catalog
#[derive(Debug)]
pub struct MaterialDictionary {
    /// Normalized surface form -> canonical material
    index: HashMap<String, CanonicalMaterial>,
    /// Index keys in registration order
    surface_forms: Vec<String>,
    canonical_ids: HashMap<&'static str, CanonicalMaterial>,
    properties: HashMap<&'static str, &'static MaterialProperties>,
}

lazy_static! {
    static ref SHARED_DICTIONARY: Arc<MaterialDictionary> = Arc::new(MaterialDictionary::builtin());
}

impl MaterialDictionary {
    /// Build the dictionary from the built-in catalog and property table
    pub fn builtin() -> Self {
        let mut index = HashMap::new();
        let mut surface_forms = Vec::new();
        let mut canonical_ids = HashMap::new();

        for entry in CATALOG {
            let material = CanonicalMaterial(entry.id);
            canonical_ids.insert(entry.id, material);

            let forms = entry
                .japanese
                .iter()
                .chain(entry.english.iter())
                .chain(entry.ocr_misreads.iter());
            for form in forms {
                let key = normalize_strict(form);
                if key.is_empty() || index.contains_key(&key) {
                    continue;
                }
                index.insert(key.clone(), material);
                surface_forms.push(key);
            }
        }

        let properties = PROPERTIES
            .iter()
            .map(|(id, props)| (*id, props))
            .collect();

        debug!(
            materials = canonical_ids.len(),
            surface_forms = surface_forms.len(),
            "Material dictionary built"
        );

        Self {
            index,
            surface_forms,
            canonical_ids,
            properties,
        }
    }

    /// The process-wide dictionary instance
    pub fn shared() -> Arc<MaterialDictionary> {
        Arc::clone(&SHARED_DICTIONARY)
    }

    /// Resolve a canonical id (`"cotton"`) to its material
    pub fn canonical(&self, id: &str) -> Option<CanonicalMaterial> {
        self.canonical_ids.get(id.trim().to_lowercase().as_str()).copied()
    }

    /// All canonical materials in catalog order
    pub fn materials(&self) -> impl Iterator<Item = CanonicalMaterial> + '_ {
        CATALOG.iter().map(|entry| CanonicalMaterial(entry.id))
    }

    /// Exact, case-insensitive lookup of a normalized surface form
    pub fn lookup(&self, normalized_form: &str) -> Option<CanonicalMaterial> {
        self.index.get(&normalized_form.to_lowercase()).copied()
    }

    /// True when the string is a known surface form
    pub fn is_surface_form(&self, normalized_form: &str) -> bool {
        self.lookup(normalized_form).is_some()
    }

    /// Every indexed surface form, normalized, in registration order
    pub fn all_surface_forms(&self) -> &[String] {
        &self.surface_forms
    }

    /// Find the material a surface form denotes in one language's synonym list
    pub fn canonical_of(&self, surface_form: &str, language: Language) -> Option<CanonicalMaterial> {
        let needle = surface_form.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        CATALOG
            .iter()
            .find(|entry| {
                let forms = match language {
                    Language::Japanese => entry.japanese,
                    Language::English => entry.english,
                    Language::Chinese => entry.chinese,
                };
                forms.iter().any(|form| form.to_lowercase() == needle)
            })
            .map(|entry| CanonicalMaterial(entry.id))
    }

    /// Translate a material name into its canonical English name.
    ///
    /// English synonyms (`"ram wool"`) resolve to their canonical id like
    /// any other language. When no translation is found the lower-cased
    /// input is returned as a best-effort guess.
    pub fn normalize_material_name(&self, material: &str, language: Language) -> Option<String> {
        let material = material.trim().to_lowercase();
        if material.is_empty() {
            return None;
        }
        Some(
            self.canonical_of(&material, language)
                .map(|m| m.as_str().to_string())
                .unwrap_or(material),
        )
    }

    /// Property entry of a canonical material, if the table has one
    pub fn properties_of(&self, material: &CanonicalMaterial) -> Option<&'static MaterialProperties> {
        self.properties.get(material.as_str()).copied()
    }

    /// Detail lookup by name in any supported language
    pub fn material_properties(&self, material: &str, language: Language) -> Option<&'static MaterialProperties> {
        let name = self.normalize_material_name(material, language)?;
        self.properties.get(name.as_str()).copied()
    }
}

impl Default for MaterialDictionary {
    fn default() -> Self {
        Self::builtin()
    }
}
