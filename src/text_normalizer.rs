//! # Text Normalization
//!
//! Normalization applied to OCR output before segmentation and lookup.
//!
//! Care labels mix full-width and half-width glyphs, spaced-out katakana and
//! percentage figures. Two pure normalizers are provided:
//!
//! - [`normalize`]: NFKC composition, whitespace removal, hyphen removal and
//!   lower-casing, in that order, then a final NFKC pass to recompose marks
//!   that the removals left next to a new base character.
//! - [`normalize_strict`]: everything [`normalize`] does, followed by removal
//!   of label punctuation (`・ . 。 , 、 ／ /`) and percentage markers such as
//!   `100%` or `20％`.
//!
//! An empty result is a valid output and means "no signal".

use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref WHITESPACE_REGEX: Regex =
        Regex::new(r"\s+").expect("Whitespace pattern should be valid");
    static ref LABEL_PUNCTUATION_REGEX: Regex =
        Regex::new(r"[・.。,、／/]").expect("Label punctuation pattern should be valid");
    static ref PERCENTAGE_REGEX: Regex =
        Regex::new(r"\d+[%％]").expect("Percentage pattern should be valid");
}

/// Normalize raw OCR text into a compact, case-folded form.
///
/// # Examples
///
/// ```
/// use care_label::text_normalizer::normalize;
///
/// assert_eq!(normalize("ＣＯＴＴＯＮ  100"), "cotton100");
/// assert_eq!(normalize("ポリ-エステル"), "ポリエステル");
/// ```
pub fn normalize(text: &str) -> String {
    let composed: String = text.nfkc().collect();
    let compact = WHITESPACE_REGEX.replace_all(&composed, "");
    // "ｶ ﾞ" is "カ" + U+3099 once the space is gone
    compact.replace('-', "").to_lowercase().nfkc().collect()
}

/// Normalize a material-name candidate.
///
/// Applies [`normalize`], then strips label punctuation and percentage
/// markers so that `"綿 100%"` and `"綿"` resolve to the same key.
pub fn normalize_strict(text: &str) -> String {
    let base = normalize(text);
    let without_punctuation = LABEL_PUNCTUATION_REGEX.replace_all(&base, "");
    PERCENTAGE_REGEX
        .replace_all(&without_punctuation, "")
        .into_owned()
}

/// True when a normalized string carries no usable characters.
pub fn is_blank(normalized: &str) -> bool {
    normalized.chars().all(|c| !c.is_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_width_variants() {
        assert_eq!(normalize("ＰＯＬＹＥＳＴＥＲ"), "polyester");
        // Half-width katakana composes into full-width
        assert_eq!(normalize("ｺｯﾄﾝ"), "コットン");
    }

    #[test]
    fn test_normalize_strips_whitespace_and_hyphens() {
        assert_eq!(normalize(" lamb  wool\t"), "lambwool");
        assert_eq!(normalize("poly-urethane"), "polyurethane");
        assert_eq!(normalize("ナイ　ロン"), "ナイロン");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let samples = [
            "ポリエステル100% コットン 20%",
            "ＣＯＴＴＯＮ　６０％",
            "Made in Japan - 日本製",
            "ｱｸﾘﾙ 30%",
            "",
            "・。、",
        ];
        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", sample);
        }
    }

    #[test]
    fn test_separated_combining_marks_are_recomposed() {
        assert_eq!(normalize("ｶ ﾞ"), "ガ");
        assert_eq!(normalize("ﾎ ﾟﾘｴｽﾃﾙ"), "ポリエステル");
        assert_eq!(normalize("e \u{301}"), "\u{e9}");
        assert_eq!(normalize("cafe´"), "caf\u{e9}");

        for sample in ["ｶ ﾞ", "ﾎ ﾟﾘｴｽﾃﾙ", "e \u{301}", "cafe´", "コ゛ム"] {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", sample);
        }
    }

    #[test]
    fn test_normalize_strict_removes_percentages() {
        assert_eq!(normalize_strict("ポリエステル100% コットン 20%"), "ポリエステルコットン");
        assert_eq!(normalize_strict("綿１００％"), "綿");
        assert_eq!(normalize_strict("Cotton 60%, Polyester 40%"), "cottonpolyester");
    }

    #[test]
    fn test_normalize_strict_removes_label_punctuation() {
        assert_eq!(normalize_strict("毛・アクリル"), "毛アクリル");
        assert_eq!(normalize_strict("綿、麻。"), "綿麻");
        assert_eq!(normalize_strict("silk/wool"), "silkwool");
        assert_eq!(normalize_strict("silk／wool"), "silkwool");
    }

    #[test]
    fn test_punctuation_only_input_is_empty() {
        assert_eq!(normalize_strict(" - ・ 。 、 "), "");
        assert!(is_blank(&normalize_strict("100%")));
        assert!(!is_blank("綿"));
    }
}
