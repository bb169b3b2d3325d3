//! # Material Extraction Tests
//!
//! End-to-end tests for the label text → canonical material pipeline.

use care_label::fuzzy_matcher::similarity;
use care_label::material_dictionary::{CanonicalMaterial, MaterialDictionary};
use care_label::material_extractor::{ExtractionStatus, MaterialExtractor, OcrLine};
use care_label::segmenter::Segmenter;
use care_label::text_normalizer::normalize;
use std::sync::Arc;

#[cfg(test)]
mod tests {
    use super::*;

    fn create_extractor() -> MaterialExtractor {
        MaterialExtractor::new(MaterialDictionary::shared()).unwrap()
    }

    fn ids(materials: &[CanonicalMaterial]) -> Vec<&'static str> {
        materials.iter().map(|m| m.as_str()).collect()
    }

    #[test]
    fn test_japanese_label_scenario() {
        let extractor = create_extractor();
        let materials = extractor.extract("ポリエステル100% コットン 20%");
        assert_eq!(ids(&materials), vec!["polyester", "cotton"]);
    }

    #[test]
    fn test_every_surface_form_extracts_to_its_material() {
        let extractor = create_extractor();
        let dictionary = extractor.dictionary();

        for form in dictionary.all_surface_forms() {
            let expected = dictionary.lookup(form).unwrap();
            assert_eq!(
                extractor.extract(form),
                vec![expected],
                "surface form {:?} did not extract to {}",
                form,
                expected
            );
        }
    }

    #[test]
    fn test_forms_with_inserted_spaces_still_extract() {
        // Whitespace is removed before segmentation, so an OCR gap inside a
        // name never reaches the segmenter
        let extractor = create_extractor();
        let dictionary = extractor.dictionary();

        for form in dictionary.all_surface_forms() {
            let expected = dictionary.lookup(form).unwrap();
            let chars: Vec<char> = form.chars().collect();
            for split in 1..chars.len() {
                let left: String = chars[..split].iter().collect();
                let right: String = chars[split..].iter().collect();
                let text = format!("{} {}", left, right);
                assert_eq!(extractor.extract(&text), vec![expected], "split text {:?}", text);
            }
        }
    }

    #[test]
    fn test_merge_pass_rejoins_any_split_form() {
        let segmenter = Segmenter::new(MaterialDictionary::shared()).unwrap();
        let dictionary = MaterialDictionary::shared();

        for form in dictionary.all_surface_forms() {
            let chars: Vec<char> = form.chars().collect();
            for split in 1..chars.len() {
                let tokens = vec![
                    chars[..split].iter().collect::<String>(),
                    chars[split..].iter().collect::<String>(),
                ];
                assert_eq!(
                    segmenter.merge_known_pairs(tokens.clone()),
                    vec![form.clone()],
                    "tokens {:?}",
                    tokens
                );
            }
        }
    }

    #[test]
    fn test_name_split_across_scripts_by_segmenter_is_recovered() {
        let extractor = create_extractor();
        let segmenter = Segmenter::new(MaterialDictionary::shared()).unwrap();

        // The katakana and ideograph alternatives split the name, the merge
        // pass joins it back
        assert_eq!(segmenter.segment("ネル生地"), vec!["ネル生地"]);
        assert_eq!(ids(&extractor.extract("裏地 ネル生地")), vec!["flannel"]);
        assert_eq!(ids(&extractor.extract("綿 ネル生地")), vec!["cotton", "flannel"]);
    }

    #[test]
    fn test_cross_script_name_is_merged() {
        let extractor = create_extractor();
        // Segmented as katakana "ネル" + ideographs "生地", then merged
        assert_eq!(ids(&extractor.extract("ネル生地 100%")), vec!["flannel"]);
        assert_eq!(ids(&extractor.extract("ﾈﾙ 生地")), vec!["flannel"]);
    }

    #[test]
    fn test_repeated_material_is_deduplicated() {
        let extractor = create_extractor();
        for form in extractor.dictionary().all_surface_forms() {
            let text = format!("{} {}", form, form);
            assert_eq!(extractor.extract(&text).len(), 1, "duplicate for {:?}", text);
        }
        assert_eq!(ids(&extractor.extract("綿 50% コットン 50% cotton")), vec!["cotton"]);
    }

    #[test]
    fn test_first_seen_order_is_preserved() {
        let extractor = create_extractor();
        let materials = extractor.extract("表地 毛 80% ナイロン 20% 裏地 ポリエステル 100% ウール");
        assert_eq!(ids(&materials), vec!["wool", "nylon", "polyester"]);
    }

    #[test]
    fn test_fuzzy_threshold_boundary() {
        let extractor = create_extractor();

        // LCS 7 against "polyester", lengths 11 + 9: exactly 70
        assert_eq!(similarity("polyestxxxx", "polyester"), 70.0);
        assert_eq!(ids(&extractor.extract("polyestxxxx")), vec!["polyester"]);

        // LCS 8, lengths 14 + 9: 69.57, just under the threshold
        let score = similarity("polyestexxxxxx", "polyester");
        assert!(score > 69.0 && score < 70.0);
        assert!(extractor.extract("polyestexxxxxx").is_empty());
    }

    #[test]
    fn test_unmatched_tokens_are_dropped() {
        let extractor = create_extractor();
        assert!(extractor.extract("").is_empty());
        assert!(extractor.extract("日本製 MADE IN JAPAN").is_empty());
        assert_eq!(ids(&extractor.extract("綿 100% 日本製")), vec!["cotton"]);
    }

    #[test]
    fn test_single_kanji_material_after_kanji_word() {
        let extractor = create_extractor();
        assert_eq!(ids(&extractor.extract("本体 綿100%")), vec!["cotton"]);
        assert_eq!(ids(&extractor.extract("表地 毛 100%")), vec!["wool"]);
        assert_eq!(ids(&extractor.extract("洗濯機 綿 100% 日本製")), vec!["cotton"]);
        assert_eq!(
            ids(&extractor.extract("本体 綿 60% 麻 40% 裏地 絹 100%")),
            vec!["cotton", "hemp", "silk"]
        );
    }

    #[test]
    fn test_half_width_katakana_with_detached_sound_mark() {
        let extractor = create_extractor();
        assert_eq!(ids(&extractor.extract("ﾎ ﾟﾘｴｽﾃﾙ 100%")), vec!["polyester"]);
        assert_eq!(ids(&extractor.extract("ﾅｲﾛﾝ 80% ﾎﾟﾘｳﾚﾀﾝ 20%")), vec!["nylon", "polyurethane"]);
    }

    #[test]
    fn test_english_and_full_width_labels() {
        let extractor = create_extractor();
        assert_eq!(
            ids(&extractor.extract("Polyester 65% / Rayon 35%")),
            vec!["polyester", "rayon"]
        );
        assert_eq!(ids(&extractor.extract("ＷＯＯＬ　１００％")), vec!["wool"]);
        assert_eq!(ids(&extractor.extract("Lamb Wool 70% Nylon 30%")), vec!["lamb wool", "nylon"]);
    }

    #[test]
    fn test_synonyms_resolve_to_one_canonical_material() {
        let extractor = create_extractor();
        assert_eq!(ids(&extractor.extract("Tencel テンセル lyocell")), vec!["lyocell"]);
        assert_eq!(ids(&extractor.extract("エラスタン 5% spandex")), vec!["spandex"]);
        assert_eq!(ids(&extractor.extract("ビスコース viscose")), vec!["rayon"]);
    }

    #[test]
    fn test_extraction_output_round_trips_through_json() {
        let extractor = create_extractor();
        let materials = extractor.extract("ポリエステル100% コットン 20%");

        let json = serde_json::to_string(&materials).unwrap();
        assert_eq!(json, r#"["polyester","cotton"]"#);

        let restored: Vec<CanonicalMaterial> = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, materials);
    }

    #[test]
    fn test_process_lines_from_json() {
        let extractor = create_extractor();
        let lines: Vec<OcrLine> = serde_json::from_str(
            r#"[
                {"text": "本体", "confidence": 0.98},
                {"text": "ｱｸﾘﾙ 60%", "confidence": 0.81},
                {"text": "毛 40%"},
                {"text": "", "confidence": 0.1}
            ]"#,
        )
        .unwrap();

        let result = extractor.process_lines(&lines);
        assert_eq!(result.status, ExtractionStatus::Success);
        assert_eq!(result.recognized_texts, vec!["本体", "ｱｸﾘﾙ 60%", "毛 40%"]);
        assert_eq!(ids(&result.materials), vec!["acrylic", "wool"]);
        assert_eq!(result.detected_texts[2].confidence, 0.5);
    }

    #[test]
    fn test_process_lines_empty_input() {
        let result = create_extractor().process_lines(&[]);
        assert_eq!(result.status, ExtractionStatus::NoText);
        assert!(result.recognized_texts.is_empty());
    }

    #[test]
    fn test_normalize_is_idempotent_on_label_samples() {
        let samples = [
            "ポリエステル100% コットン 20%",
            "ｱｸﾘﾙ 60% ／ 毛 40%",
            "Cotton-Polyester Blend",
            "ＷＯＯＬ　１００％",
            "表地・裏地",
            "ﾎ ﾟﾘｴｽﾃﾙ",
            "cafe´",
        ];
        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn test_extractor_is_shareable_across_threads() {
        let extractor = Arc::new(create_extractor());
        std::thread::scope(|scope| {
            for _ in 0..4 {
                let extractor = Arc::clone(&extractor);
                scope.spawn(move || {
                    let materials = extractor.extract("ナイロン 80% ポリウレタン 20%");
                    assert_eq!(ids(&materials), vec!["nylon", "polyurethane"]);
                });
            }
        });
    }
}
