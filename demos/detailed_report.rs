use triage::{Interpreter, Record};
use tracing_subscriber::EnvFilter;

const RULESET: &str = r#"{
    "name": "cough",
    "variables": ["danger_sign", "chest_indrawing", "stridor", "fast_breathing"],
    "rules": [
        {"id": "R1", "when": "danger_sign", "then": "SEVERE", "evidence": "chunk-12"},
        {"id": "R2", "when": "chest_indrawing OR stridor", "then": "SEVERE"},
        {"id": "R3", "when": "fast_breathing AND NOT stridor", "then": "PNEUMONIA"}
    ],
    "default": "COUGH_NO_PNEUMONIA"
}"#;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let interpreter = Interpreter::from_json(RULESET).expect("failed to compile ruleset");

    let record = Record::from_json(
        r#"{"id": "P7", "danger_sign": false, "chest_indrawing": false, "stridor": false, "fast_breathing": false}"#,
    )
    .expect("invalid record");

    let report = interpreter
        .evaluate_detailed(&record)
        .expect("record does not fit the ruleset");

    println!("{report}");
    println!();
    println!("Path: {:?}", report.verdict().path());
    println!("Justification: {}", report.verdict().justification());
    println!("Duration: {:?}", report.duration());
    println!();
    println!(
        "{}",
        serde_json::to_string_pretty(report.verdict()).expect("verdict serializes")
    );
}
