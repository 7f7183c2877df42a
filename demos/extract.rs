use triage::diagram::flowchart;
use triage::extract::{extract_from_chunks, read_chunks};
use triage::Record;
use tracing_subscriber::EnvFilter;

const GUIDELINE: &str = r#"{"chunk_id": "p41-1", "text": "Does the child have cough or difficult breathing?"}
{"chunk_id": "p41-2", "text": "If danger_sign is true, classify as SEVERE_PNEUMONIA"}
{"chunk_id": "p41-3", "text": "If chest_indrawing OR stridor, classify as SEVERE_PNEUMONIA"}
{"chunk_id": "p41-4", "text": "If fast_breathing, classify as PNEUMONIA"}
{"chunk_id": "p41-5", "text": "Otherwise classify as COUGH_OR_COLD"}
"#;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let chunks = read_chunks(GUIDELINE.as_bytes()).expect("invalid chunk file");
    let ruleset = extract_from_chunks(&chunks).expect("failed to extract rules");

    println!(
        "{}",
        serde_json::to_string_pretty(&ruleset).expect("ruleset serializes")
    );
    println!();
    println!("{}", flowchart(&ruleset));

    let interpreter = ruleset.compile().expect("failed to compile extracted rules");
    let record = Record::new()
        .with_id("P1")
        .set("danger_sign", false)
        .set("chest_indrawing", false)
        .set("stridor", true)
        .set("fast_breathing", true);

    let verdict = interpreter.evaluate(&record).expect("record does not fit");
    println!("{verdict}");
    if let Some(evidence) = verdict.evidence() {
        println!("Source: {evidence}");
    }
}
