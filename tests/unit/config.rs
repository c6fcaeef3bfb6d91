//! Index configuration as persisted in store metadata.

use simgram::{ExtractorKind, FeatureExtractor, IndexConfig, IndexError, Normalization};

#[test]
fn test_config_survives_json() {
    let config = IndexConfig {
        kind: ExtractorKind::Word,
        n: 2,
        boundary: "<s>".to_string(),
        delimiter: "|".to_string(),
        normalization: Normalization::Fold,
    };
    let json = config.to_json().unwrap();
    assert!(json.contains("\"kind\":\"word\""), "{json}");
    assert!(json.contains("\"normalization\":\"fold\""), "{json}");
    assert_eq!(IndexConfig::from_json(&json).unwrap(), config);
}

#[test]
fn test_missing_fields_take_defaults() {
    let config = IndexConfig::from_json(r#"{"kind":"word"}"#).unwrap();
    assert_eq!(config, IndexConfig::word(3));
    assert_eq!(IndexConfig::from_json("{}").unwrap(), IndexConfig::default());
}

#[test]
fn test_unbuildable_configs_are_rejected() {
    assert!(matches!(
        IndexConfig::from_json(r#"{"n":0}"#),
        Err(IndexError::InvalidConfig(_))
    ));
    assert!(matches!(
        IndexConfig::from_json(r#"{"kind":"character","boundary":"ab"}"#),
        Err(IndexError::InvalidConfig(_))
    ));
    assert!(matches!(
        IndexConfig::from_json(r#"{"kind":"word","delimiter":""}"#),
        Err(IndexError::InvalidConfig(_))
    ));
    assert!(matches!(
        IndexConfig::from_json(r#"{"kind":"sentence"}"#),
        Err(IndexError::Json(_))
    ));
}

#[test]
fn test_multi_character_boundary_is_fine_for_words() {
    let config = IndexConfig {
        boundary: "<pad>".to_string(),
        ..IndexConfig::word(2)
    };
    assert!(config.validate().is_ok());
}

#[test]
fn test_built_extractor_reports_its_settings() {
    let ex = IndexConfig::word(4)
        .with_normalization(Normalization::Lowercase)
        .build_extractor()
        .unwrap();
    assert_eq!(ex.kind(), ExtractorKind::Word);
    assert_eq!(ex.n(), 4);
    assert_eq!(ex.normalization(), Normalization::Lowercase);
}

#[cfg(feature = "unicode-normalization")]
#[test]
fn test_fold_normalization_ignores_accents_and_spacing() {
    let ex = IndexConfig::character(3)
        .with_normalization(Normalization::Fold)
        .build_extractor()
        .unwrap();
    assert_eq!(ex.features("Café  Crème"), ex.features("cafe creme"));
}

#[test]
fn test_fold_normalization_ignores_case_and_spacing() {
    let ex = IndexConfig::character(3)
        .with_normalization(Normalization::Fold)
        .build_extractor()
        .unwrap();
    assert_eq!(ex.features("  Heart\tATTACK "), ex.features("heart attack"));
}

#[test]
fn test_kind_and_normalization_parse_from_flags() {
    assert_eq!("word".parse::<ExtractorKind>().unwrap(), ExtractorKind::Word);
    assert_eq!("fold".parse::<Normalization>().unwrap(), Normalization::Fold);
    assert!("bytes".parse::<ExtractorKind>().is_err());
}
