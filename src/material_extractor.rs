//! # Material Extraction
//!
//! Turns noisy care-label OCR output into an ordered, de-duplicated list of
//! canonical materials.
//!
//! ## Pipeline
//!
//! ```text
//! full text ──normalize_strict──▶ segment ──▶ per token:
//!     exact dictionary lookup
//!     └─ miss: fuzzy rank over all surface forms, accept top-1 if score ≥ threshold
//! ```
//!
//! Line-level OCR boxes go through [`MaterialExtractor::potential_material`],
//! which adds a containment fallback for short, clipped readings.
//!
//! Extraction never fails. Partial labels are the common case, so unmatched
//! tokens are dropped and processing continues.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use crate::config::ExtractionConfig;
use crate::errors::AppResult;
use crate::fuzzy_matcher::{similarity, FuzzyMatcher};
use crate::material_dictionary::{CanonicalMaterial, MaterialDictionary};
use crate::observability;
use crate::segmenter::Segmenter;
use crate::text_normalizer::{is_blank, normalize_strict};

/// One line of text returned by the OCR collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrLine {
    pub text: String,
    /// Recognition confidence in [0, 1]
    #[serde(default = "default_line_confidence")]
    pub confidence: f64,
}

fn default_line_confidence() -> f64 {
    0.5
}

impl OcrLine {
    pub fn new(text: impl Into<String>, confidence: f64) -> Self {
        Self {
            text: text.into(),
            confidence,
        }
    }
}

/// A candidate token produced by segmentation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecognizedToken {
    /// Token as it appeared after segmentation
    pub text: String,
    /// Strictly normalized, case-folded form used for lookup
    pub normalized: String,
    /// Upstream OCR confidence, when the token came from a single line
    pub confidence: Option<f64>,
}

impl RecognizedToken {
    pub fn new(text: impl Into<String>, confidence: Option<f64>) -> Self {
        let text = text.into();
        let normalized = normalize_strict(&text).to_lowercase();
        Self {
            text,
            normalized,
            confidence,
        }
    }
}

/// How a token was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    Exact,
    Fuzzy,
    Containment,
}

impl MatchKind {
    fn as_str(self) -> &'static str {
        match self {
            MatchKind::Exact => "exact",
            MatchKind::Fuzzy => "fuzzy",
            MatchKind::Containment => "containment",
        }
    }
}

/// A token resolved to a canonical material
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialMatch {
    pub material: CanonicalMaterial,
    /// The dictionary surface form that matched
    pub surface_form: String,
    pub kind: MatchKind,
    /// Match confidence in [0, 100]; exact matches are always 100
    pub confidence: f64,
    pub token: RecognizedToken,
}

/// Outcome of processing a set of OCR lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStatus {
    Success,
    /// No non-blank line was supplied
    NoText,
}

/// Everything extracted from one label's OCR output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelExtraction {
    pub status: ExtractionStatus,
    /// Non-blank input lines, trimmed, with their confidences
    pub detected_texts: Vec<OcrLine>,
    pub recognized_texts: Vec<String>,
    /// Recognized texts joined with single spaces
    pub full_text: String,
    pub matches: Vec<MaterialMatch>,
    /// De-duplicated materials in first-seen order
    pub materials: Vec<CanonicalMaterial>,
}

impl LabelExtraction {
    fn no_text() -> Self {
        Self {
            status: ExtractionStatus::NoText,
            detected_texts: Vec::new(),
            recognized_texts: Vec::new(),
            full_text: String::new(),
            matches: Vec::new(),
            materials: Vec::new(),
        }
    }
}

/// Resolves label text to canonical materials
#[derive(Debug, Clone)]
pub struct MaterialExtractor {
    dictionary: Arc<MaterialDictionary>,
    segmenter: Segmenter,
    matcher: FuzzyMatcher,
    config: ExtractionConfig,
}

impl MaterialExtractor {
    /// Create an extractor with the default thresholds
    pub fn new(dictionary: Arc<MaterialDictionary>) -> AppResult<Self> {
        Self::with_config(dictionary, ExtractionConfig::default())
    }

    /// Create an extractor with custom thresholds
    pub fn with_config(dictionary: Arc<MaterialDictionary>, config: ExtractionConfig) -> AppResult<Self> {
        config.validate()?;
        let segmenter = Segmenter::new(Arc::clone(&dictionary))?;
        let matcher = FuzzyMatcher::new(config.fuzzy_candidate_limit);
        Ok(Self {
            dictionary,
            segmenter,
            matcher,
            config,
        })
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    pub fn dictionary(&self) -> &Arc<MaterialDictionary> {
        &self.dictionary
    }

    /// Extract canonical materials from a full label text.
    ///
    /// # Examples
    ///
    /// ```
    /// use care_label::material_dictionary::MaterialDictionary;
    /// use care_label::material_extractor::MaterialExtractor;
    ///
    /// let extractor = MaterialExtractor::new(MaterialDictionary::shared()).unwrap();
    /// let materials = extractor.extract("ポリエステル100% コットン 20%");
    /// let ids: Vec<&str> = materials.iter().map(|m| m.as_str()).collect();
    /// assert_eq!(ids, vec!["polyester", "cotton"]);
    /// ```
    pub fn extract(&self, full_text: &str) -> Vec<CanonicalMaterial> {
        self.extract_matches(full_text)
            .into_iter()
            .map(|m| m.material)
            .collect()
    }

    /// Like [`MaterialExtractor::extract`], keeping how each material was matched
    pub fn extract_matches(&self, full_text: &str) -> Vec<MaterialMatch> {
        let start = Instant::now();
        let normalized = normalize_strict(full_text);
        let tokens = self.segmenter.segment(&normalized);
        debug!(text = %full_text, tokens = ?tokens, "Segmented label text");

        let mut seen = HashSet::new();
        let mut matches = Vec::new();
        for raw in &tokens {
            let token = RecognizedToken::new(raw.as_str(), None);
            if is_blank(&token.normalized) {
                continue;
            }
            match self.resolve_token(token) {
                Some(found) => {
                    observability::record_token_resolution(found.kind.as_str());
                    if seen.insert(found.material) {
                        debug!(
                            token = %found.token.text,
                            material = %found.material,
                            kind = ?found.kind,
                            confidence = found.confidence,
                            "Material found"
                        );
                        matches.push(found);
                    }
                }
                None => {
                    observability::record_token_resolution("none");
                    trace!(token = %raw, "No material match for token");
                }
            }
        }

        observability::record_extraction("full_text", tokens.len(), matches.len(), start.elapsed());
        info!(
            token_count = tokens.len(),
            materials = ?matches.iter().map(|m| m.material.as_str()).collect::<Vec<_>>(),
            "Material extraction completed"
        );
        matches
    }

    /// Resolve one token: exact lookup, then fuzzy top-1 against the threshold
    pub fn resolve_token(&self, token: RecognizedToken) -> Option<MaterialMatch> {
        if let Some(material) = self.dictionary.lookup(&token.normalized) {
            return Some(MaterialMatch {
                material,
                surface_form: token.normalized.clone(),
                kind: MatchKind::Exact,
                confidence: 100.0,
                token,
            });
        }
        self.fuzzy_resolve(token)
    }

    fn fuzzy_resolve(&self, token: RecognizedToken) -> Option<MaterialMatch> {
        let ranked = match self
            .matcher
            .best_matches(&token.normalized, self.dictionary.all_surface_forms())
        {
            Ok(ranked) => ranked,
            Err(e) => {
                warn!(error = %e, token = %token.text, "Fuzzy matching skipped");
                return None;
            }
        };

        let best = ranked.into_iter().next()?;
        trace!(token = %token.normalized, best = %best.candidate, score = best.score, "Best fuzzy candidate");
        if best.score < self.config.fuzzy_threshold {
            return None;
        }

        let material = self.dictionary.lookup(&best.candidate)?;
        Some(MaterialMatch {
            material,
            surface_form: best.candidate,
            kind: MatchKind::Fuzzy,
            confidence: best.score,
            token,
        })
    }

    /// Check whether a standalone string (one OCR box) names a material
    pub fn is_potential_material(&self, text: &str) -> (bool, Option<CanonicalMaterial>) {
        match self.potential_material(text) {
            Some(found) => (true, Some(found.material)),
            None => (false, None),
        }
    }

    /// Resolve a standalone string: exact, then fuzzy, then containment
    pub fn potential_material(&self, text: &str) -> Option<MaterialMatch> {
        self.potential_material_with_confidence(text, None)
    }

    fn potential_material_with_confidence(&self, text: &str, confidence: Option<f64>) -> Option<MaterialMatch> {
        let token = RecognizedToken::new(text, confidence);
        if is_blank(&token.normalized) {
            trace!(text = %text, "Empty or punctuation-only candidate");
            return None;
        }

        if let Some(found) = self.resolve_token(token.clone()) {
            return Some(found);
        }

        let candidate = token.normalized.as_str();
        let candidate_len = candidate.chars().count();
        let contained = self.dictionary.all_surface_forms().iter().find(|form| {
            let form_len = form.chars().count();
            (form.contains(candidate) || candidate.contains(form.as_str()))
                && form_len.abs_diff(candidate_len) <= self.config.containment_max_length_difference
        })?;

        let material = self.dictionary.lookup(contained)?;
        debug!(text = %text, material = %material, "Material found by containment");
        Some(MaterialMatch {
            material,
            surface_form: contained.clone(),
            kind: MatchKind::Containment,
            confidence: similarity(candidate, contained),
            token,
        })
    }

    /// Process line-level OCR output for one label.
    ///
    /// Each non-blank line is checked on its own first; the joined text is
    /// then run through [`MaterialExtractor::extract_matches`] to pick up
    /// materials spread across lines.
    pub fn process_lines(&self, lines: &[OcrLine]) -> LabelExtraction {
        let start = Instant::now();
        let detected_texts: Vec<OcrLine> = lines
            .iter()
            .filter(|line| !line.text.trim().is_empty())
            .map(|line| OcrLine::new(line.text.trim(), line.confidence))
            .collect();

        if detected_texts.is_empty() {
            warn!(line_count = lines.len(), "No text detected in OCR output");
            return LabelExtraction::no_text();
        }

        let mut seen = HashSet::new();
        let mut matches = Vec::new();
        for line in &detected_texts {
            if let Some(found) = self.potential_material_with_confidence(&line.text, Some(line.confidence)) {
                if seen.insert(found.material) {
                    debug!(line = %line.text, material = %found.material, "Material found in line");
                    matches.push(found);
                }
            }
        }

        let recognized_texts: Vec<String> = detected_texts.iter().map(|l| l.text.clone()).collect();
        let full_text = recognized_texts.join(" ");
        for found in self.extract_matches(&full_text) {
            if seen.insert(found.material) {
                debug!(material = %found.material, "Additional material found in full text");
                matches.push(found);
            }
        }

        let materials: Vec<CanonicalMaterial> = matches.iter().map(|m| m.material).collect();
        observability::record_extraction("lines", detected_texts.len(), materials.len(), start.elapsed());
        info!(
            line_count = detected_texts.len(),
            materials = ?materials.iter().map(|m| m.as_str()).collect::<Vec<_>>(),
            "Label lines processed"
        );

        LabelExtraction {
            status: ExtractionStatus::Success,
            detected_texts,
            recognized_texts,
            full_text,
            matches,
            materials,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> MaterialExtractor {
        MaterialExtractor::new(MaterialDictionary::shared()).unwrap()
    }

    fn ids(materials: &[CanonicalMaterial]) -> Vec<&'static str> {
        materials.iter().map(|m| m.as_str()).collect()
    }

    #[test]
    fn test_recognized_token_normalization() {
        let token = RecognizedToken::new("ＣＯＴＴＯＮ 60%", Some(0.9));
        assert_eq!(token.normalized, "cotton");
        assert_eq!(token.confidence, Some(0.9));
    }

    #[test]
    fn test_exact_match_confidence_is_100() {
        let found = extractor()
            .resolve_token(RecognizedToken::new("ウール", None))
            .unwrap();
        assert_eq!(found.material.as_str(), "wool");
        assert_eq!(found.kind, MatchKind::Exact);
        assert_eq!(found.confidence, 100.0);
    }

    #[test]
    fn test_fuzzy_match_recovers_ocr_typo() {
        let found = extractor()
            .resolve_token(RecognizedToken::new("polyestr", None))
            .unwrap();
        assert_eq!(found.material.as_str(), "polyester");
        assert_eq!(found.kind, MatchKind::Fuzzy);
        assert!(found.confidence >= 70.0 && found.confidence < 100.0);
    }

    #[test]
    fn test_english_label() {
        let materials = extractor().extract("COTTON 60% POLYESTER 40%");
        assert_eq!(ids(&materials), vec!["cotton", "polyester"]);
    }

    #[test]
    fn test_misread_glyph_maps_to_cotton() {
        assert_eq!(ids(&extractor().extract("錦 100%")), vec!["cotton"]);
    }

    #[test]
    fn test_raised_threshold_rejects_fuzzy_match() {
        let config = ExtractionConfig {
            fuzzy_threshold: 95.0,
            ..Default::default()
        };
        let strict = MaterialExtractor::with_config(MaterialDictionary::shared(), config).unwrap();
        assert!(strict.extract("polyestr").is_empty());
        assert_eq!(ids(&extractor().extract("polyestr")), vec!["polyester"]);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = ExtractionConfig {
            fuzzy_candidate_limit: 0,
            ..Default::default()
        };
        assert!(MaterialExtractor::with_config(MaterialDictionary::shared(), config).is_err());
    }

    #[test]
    fn test_is_potential_material_exact_and_fuzzy() {
        let extractor = extractor();
        let (is_material, material) = extractor.is_potential_material("ナイロン 15%");
        assert!(is_material);
        assert_eq!(material.map(|m| m.as_str()), Some("nylon"));

        let (is_material, material) = extractor.is_potential_material("Cashmer");
        assert!(is_material);
        assert_eq!(material.map(|m| m.as_str()), Some("cashmere"));
    }

    #[test]
    fn test_is_potential_material_containment() {
        // "羊毛" is not indexed and scores 66.7 against "毛", but contains it
        let found = extractor().potential_material("羊毛").unwrap();
        assert_eq!(found.material.as_str(), "wool");
        assert_eq!(found.kind, MatchKind::Containment);
    }

    #[test]
    fn test_containment_respects_length_bound() {
        // Contains "毛" but is four characters longer
        assert_eq!(extractor().is_potential_material("毛玉取り方法"), (false, None));
    }

    #[test]
    fn test_is_potential_material_rejects_noise() {
        let extractor = extractor();
        assert_eq!(extractor.is_potential_material(""), (false, None));
        assert_eq!(extractor.is_potential_material("・。、"), (false, None));
        assert_eq!(extractor.is_potential_material("100%"), (false, None));
        assert_eq!(extractor.is_potential_material("日本製"), (false, None));
    }

    #[test]
    fn test_process_lines_combines_line_and_full_text_matches() {
        let lines = vec![
            OcrLine::new("表地", 0.95),
            OcrLine::new("ポリエステル 65%", 0.91),
            OcrLine::new("   ", 0.2),
            OcrLine::new("綿 35%", 0.88),
            OcrLine::new("ネル", 0.7),
            OcrLine::new("生地", 0.7),
        ];
        let result = extractor().process_lines(&lines);

        assert_eq!(result.status, ExtractionStatus::Success);
        assert_eq!(result.detected_texts.len(), 5);
        assert_eq!(result.full_text, "表地 ポリエステル 65% 綿 35% ネル 生地");
        assert_eq!(ids(&result.materials), vec!["polyester", "cotton", "flannel"]);
        assert_eq!(result.matches[0].token.confidence, Some(0.91));
    }

    #[test]
    fn test_process_lines_without_text() {
        let result = extractor().process_lines(&[OcrLine::new(" ", 0.9)]);
        assert_eq!(result.status, ExtractionStatus::NoText);
        assert!(result.materials.is_empty());
    }

    #[test]
    fn test_ocr_line_default_confidence() {
        let line: OcrLine = serde_json::from_str(r#"{"text": "綿"}"#).unwrap();
        assert_eq!(line.confidence, 0.5);
    }
}
