use triage::{Record, RulesetBuilder};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Define rules
    let interpreter = RulesetBuilder::new("cough")
        .variables(["danger_sign", "chest_indrawing", "stridor", "fast_breathing"])
        .rule("R1", |r| r.when("danger_sign").then("SEVERE"))
        .rule("R2", |r| r.when("chest_indrawing OR stridor").then("SEVERE"))
        .rule("R3", |r| r.when("fast_breathing").then("PNEUMONIA"))
        .default_outcome("COUGH_NO_PNEUMONIA")
        .compile()
        .expect("failed to compile ruleset");

    println!("{interpreter}");

    // Evaluate a record
    let record = Record::new()
        .with_id("P2")
        .set("danger_sign", false)
        .set("chest_indrawing", true)
        .set("stridor", false)
        .set("fast_breathing", false);

    match interpreter.evaluate(&record) {
        Ok(verdict) => {
            println!("Result: {verdict}");
            println!("{}", verdict.justification());
        }
        Err(e) => println!("Cannot evaluate: {e}"),
    }
}
