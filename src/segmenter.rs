//! # Label Text Segmentation
//!
//! Splits normalized label text into candidate material tokens.
//!
//! Whitespace has already been removed by normalization, so word boundaries
//! come from the script of each character. The pattern alternatives are tried
//! in this order at each position:
//!
//! 1. Known single-script surface forms, longest first, kept atomic so that
//!    `ポリエステルコットン` splits into `ポリエステル` + `コットン`
//! 2. Latin letter runs
//! 3. Katakana runs, including the long-vowel mark `ー`
//! 4. Hiragana runs
//! 5. CJK ideograph runs, ended early where a known ideograph form begins,
//!    so that `本体綿` yields `本体` + `綿`
//!
//! A single forward merge pass then rejoins adjacent tokens whose
//! concatenation is a known surface form. This recovers names that span a
//! script boundary (`ネル` + `生地`).

use std::sync::Arc;

use regex::Regex;
use tracing::{debug, trace};

use crate::errors::{AppError, AppResult};
use crate::material_dictionary::MaterialDictionary;

const LATIN_RUN: &str = r"[a-z]+";
const KATAKANA_RUN: &str = r"[ァ-ヶー]+";
const HIRAGANA_RUN: &str = r"[ぁ-ん]+";
const IDEOGRAPH_RUN: &str = r"[一-龥]+";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Script {
    Latin,
    Katakana,
    Hiragana,
    Ideograph,
}

fn script_of(c: char) -> Option<Script> {
    match c {
        'a'..='z' => Some(Script::Latin),
        'ァ'..='ヶ' | 'ー' => Some(Script::Katakana),
        'ぁ'..='ん' => Some(Script::Hiragana),
        '一'..='龥' => Some(Script::Ideograph),
        _ => None,
    }
}

/// Whether every character of `form` belongs to the same script
fn is_single_script(form: &str) -> bool {
    let mut scripts = form.chars().map(script_of);
    match scripts.next() {
        Some(Some(first)) => scripts.all(|script| script == Some(first)),
        _ => false,
    }
}

/// Known single-script forms, longest first so that `トリアセテート` wins
/// over `アセテート`
fn atomic_forms(dictionary: &MaterialDictionary) -> Vec<&str> {
    let mut atomic: Vec<&str> = dictionary
        .all_surface_forms()
        .iter()
        .map(String::as_str)
        .filter(|form| is_single_script(form))
        .collect();
    atomic.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then(a.cmp(b)));
    atomic
}

/// Build the segmentation pattern from the dictionary's surface forms
fn build_segment_pattern(dictionary: &MaterialDictionary) -> String {
    let mut alternatives: Vec<String> = atomic_forms(dictionary)
        .into_iter()
        .map(regex::escape)
        .collect();
    alternatives.extend(
        [LATIN_RUN, KATAKANA_RUN, HIRAGANA_RUN, IDEOGRAPH_RUN]
            .iter()
            .map(|p| p.to_string()),
    );
    alternatives.join("|")
}

/// Alternation of the known forms written in ideographs only
fn build_ideograph_form_pattern(dictionary: &MaterialDictionary) -> String {
    atomic_forms(dictionary)
        .into_iter()
        .filter(|form| form.chars().next().and_then(script_of) == Some(Script::Ideograph))
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join("|")
}

/// Script-aware tokenizer bound to a material dictionary
#[derive(Debug, Clone)]
pub struct Segmenter {
    dictionary: Arc<MaterialDictionary>,
    pattern: Regex,
    ideograph_forms: Regex,
}

impl Segmenter {
    /// Compile the segmentation pattern for `dictionary`
    pub fn new(dictionary: Arc<MaterialDictionary>) -> AppResult<Self> {
        let pattern_str = build_segment_pattern(&dictionary);
        let pattern = Regex::new(&pattern_str).map_err(|e| {
            AppError::Internal(format!("Failed to compile segmentation pattern: {}", e))
        })?;
        let ideograph_forms =
            Regex::new(&build_ideograph_form_pattern(&dictionary)).map_err(|e| {
                AppError::Internal(format!("Failed to compile ideograph form pattern: {}", e))
            })?;
        debug!(pattern_len = pattern_str.len(), "Segmentation pattern compiled");
        Ok(Self {
            dictionary,
            pattern,
            ideograph_forms,
        })
    }

    /// Split normalized text into candidate tokens, then merge known pairs
    pub fn segment(&self, text: &str) -> Vec<String> {
        let mut raw = Vec::new();
        let mut pos = 0;
        while let Some(found) = self.pattern.find_at(text, pos) {
            let end = self
                .ideograph_run_end(found.as_str())
                .map_or(found.end(), |len| found.start() + len);
            raw.push(text[found.start()..end].to_string());
            pos = end;
        }
        trace!(tokens = ?raw, "Initial split");
        self.merge_known_pairs(raw)
    }

    /// Byte length at which an unknown ideograph run must stop because a
    /// known ideograph form starts inside it
    fn ideograph_run_end(&self, token: &str) -> Option<usize> {
        let first = token.chars().next()?;
        if script_of(first) != Some(Script::Ideograph) || self.dictionary.is_surface_form(token) {
            return None;
        }
        let skip = first.len_utf8();
        self.ideograph_forms
            .find(&token[skip..])
            .map(|inner| skip + inner.start())
    }

    /// Rejoin adjacent tokens whose concatenation is a known surface form.
    ///
    /// A merged token stays eligible for merging with the token after it.
    pub fn merge_known_pairs(&self, tokens: Vec<String>) -> Vec<String> {
        let mut merged: Vec<String> = Vec::with_capacity(tokens.len());
        for token in tokens {
            if let Some(last) = merged.last_mut() {
                let combined = format!("{}{}", last, token);
                if self.dictionary.is_surface_form(&combined.to_lowercase()) {
                    trace!(left = %last, right = %token, merged = %combined, "Merged token pair");
                    *last = combined;
                    continue;
                }
            }
            merged.push(token);
        }
        merged
    }
}
