use super::*;

#[test]
fn parse_keywords_reads_fields() {
    let yaml = r#"
keywords:
  sodium: ["salt", "sal"]
  fiber: ["dietary fibre"]
"#;
    let file = parse_keywords(yaml).unwrap();
    assert_eq!(file.extra_keywords(NutrientField::Sodium), ["salt", "sal"]);
    assert_eq!(
        file.extra_keywords(NutrientField::Fiber),
        ["dietary fibre"]
    );
    assert!(file.extra_keywords(NutrientField::Protein).is_empty());
}

#[test]
fn parse_keywords_lowercases_and_trims() {
    let yaml = "keywords:\n  sugar: [\"  Zucker \"]\n";
    let file = parse_keywords(yaml).unwrap();
    assert_eq!(file.extra_keywords(NutrientField::Sugar), ["zucker"]);
}

#[test]
fn parse_keywords_accepts_empty_document_map() {
    let file = parse_keywords("keywords: {}\n").unwrap();
    assert!(file.keywords.is_empty());
}

#[test]
fn parse_keywords_rejects_unknown_field() {
    let yaml = "keywords:\n  vitamin_c: [\"ascorbic\"]\n";
    let err = parse_keywords(yaml).unwrap_err();
    assert!(matches!(err, ConfigError::KeywordsFileParse(_)), "got: {err:?}");
}

#[test]
fn parse_keywords_rejects_blank_keyword() {
    let yaml = "keywords:\n  fat: [\"   \"]\n";
    let err = parse_keywords(yaml).unwrap_err();
    assert!(
        matches!(err, ConfigError::Validation(ref msg) if msg.contains("blank")),
        "got: {err:?}"
    );
}

#[test]
fn parse_keywords_rejects_case_insensitive_duplicate() {
    let yaml = "keywords:\n  fat: [\"Lard\", \"lard\"]\n";
    let err = parse_keywords(yaml).unwrap_err();
    assert!(
        matches!(err, ConfigError::Validation(ref msg) if msg.contains("duplicate")),
        "got: {err:?}"
    );
}

#[test]
fn load_keywords_reports_missing_file() {
    let path = std::env::temp_dir().join("ecoscan-keywords-does-not-exist.yaml");
    let err = load_keywords(&path).unwrap_err();
    assert!(matches!(err, ConfigError::KeywordsFileIo { .. }), "got: {err:?}");
}

#[test]
fn example_keywords_file_is_valid() {
    let file = parse_keywords(include_str!("../../../config/keywords.example.yaml"))
        .expect("example keywords file should parse");
    assert_eq!(
        file.extra_keywords(NutrientField::Sodium),
        ["salt".to_string(), "sal".to_string()]
    );
}
