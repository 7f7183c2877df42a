use std::io::Write;

use serde_json::json;
use triage::diagram::flowchart;
use triage::extract::{extract_from_chunks, extract_from_file, Chunk, ExtractError};
use triage::{Error, Record, SchemaError};

fn guideline() -> Vec<Chunk> {
    vec![
        Chunk::new("p41-1", "Does the child have cough or difficult breathing?"),
        Chunk::new("p41-2", "If danger_sign is true, classify as SEVERE_PNEUMONIA"),
        Chunk::new("p41-3", "If chest_indrawing OR stridor, classify as SEVERE_PNEUMONIA"),
        Chunk::new("p41-4", "If fast_breathing AND NOT wheeze, classify as PNEUMONIA"),
        Chunk::new("p41-5", "Otherwise classify as COUGH_OR_COLD"),
    ]
}

#[test]
fn extracted_ruleset_compiles_and_evaluates() {
    let ruleset = extract_from_chunks(&guideline()).unwrap();
    let interpreter = ruleset.compile().unwrap();
    assert_eq!(interpreter.rule_ids(), vec!["R2", "R3", "R4"]);

    let record = Record::new()
        .with_id("P1")
        .set("danger_sign", false)
        .set("chest_indrawing", false)
        .set("stridor", false)
        .set("fast_breathing", true)
        .set("wheeze", false);
    let verdict = interpreter.evaluate(&record).unwrap();
    assert_eq!(verdict.outcome(), "PNEUMONIA");
    assert_eq!(verdict.matched_rule(), Some("R4"));
    assert_eq!(verdict.evidence(), Some(&json!("p41-4")));

    let record = record.set("wheeze", true);
    let verdict = interpreter.evaluate(&record).unwrap();
    assert_eq!(verdict.outcome(), "COUGH_OR_COLD");
    assert_eq!(verdict.path(), &["R2", "R3", "R4"]);
}

#[test]
fn extracted_ruleset_renders_flowchart() {
    let ruleset = extract_from_chunks(&guideline()).unwrap();
    let chart = flowchart(&ruleset);
    assert!(chart.starts_with("flowchart TD\n"));
    assert!(chart.contains("    rule_1{\"R3: chest_indrawing OR stridor\"}"));
    assert!(chart.contains("    outcome_2[\"COUGH_OR_COLD\"]"));
    assert!(chart.contains("    rule_2 -->|No| outcome_2"));
    // one node per distinct outcome
    assert_eq!(chart.matches("[\"SEVERE_PNEUMONIA\"]").count(), 1);
}

#[test]
fn extract_from_jsonl_file() {
    let path = std::env::temp_dir().join(format!("triage-extract-{}.jsonl", std::process::id()));
    {
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, r#"{{"chunk_id": 1, "text": "If a, classify as X"}}"#).unwrap();
        writeln!(file).unwrap();
        writeln!(file, r#"{{"chunk_id": 2, "text": "Otherwise classify as Y"}}"#).unwrap();
    }
    let ruleset = extract_from_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(ruleset.rules.len(), 1);
    assert_eq!(ruleset.rules[0].id, "R1");
    assert_eq!(ruleset.rules[0].evidence, Some(json!(1)));
    assert_eq!(ruleset.default, "Y");
}

#[test]
fn missing_file_is_io_error() {
    let err = extract_from_file("/nonexistent/chunks.jsonl").unwrap_err();
    assert!(matches!(err, ExtractError::Io(_)));
}

#[test]
fn extraction_errors_convert_into_crate_error() {
    let chunks = vec![Chunk::new("c1", "If a, classify as X")];
    let err: Error = extract_from_chunks(&chunks).unwrap_err().into();
    assert!(matches!(
        err,
        Error::Extract(ExtractError::Schema(SchemaError::MissingDefault))
    ));
    assert_eq!(err.to_string(), "ruleset has no default outcome");
}
