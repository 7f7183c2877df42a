use std::sync::Arc;
use std::thread;

use triage::{Record, RulesetBuilder};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let interpreter = Arc::new(
        RulesetBuilder::new("cough")
            .variables(["danger_sign", "stridor", "fast_breathing"])
            .rule("R1", |r| r.when("danger_sign").then("SEVERE"))
            .rule("R2", |r| r.when("stridor").then("SEVERE"))
            .rule("R3", |r| r.when("fast_breathing").then("PNEUMONIA"))
            .default_outcome("COUGH_NO_PNEUMONIA")
            .compile()
            .expect("failed to compile ruleset"),
    );

    let handles: Vec<_> = (0..4_u8)
        .map(|i| {
            let interp = Arc::clone(&interpreter);
            thread::spawn(move || {
                let record = Record::new()
                    .with_id(format!("P{i}"))
                    .set("danger_sign", i == 0)
                    .set("stridor", i == 1)
                    .set("fast_breathing", i == 2);

                let result = interp.evaluate(&record);
                println!("Thread {i}: {result:?}");
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }
}
