use std::collections::BTreeSet;

use tracing::{debug, trace};

use crate::{CompiledRule, EvalError, Record, RuleCheck, Verdict};

/// Every declared variable must be present and boolean before any rule runs.
pub(crate) fn validate(variables: &BTreeSet<String>, record: &Record) -> Result<(), EvalError> {
    for name in variables {
        record.get_bool(name)?;
    }
    Ok(())
}

/// Test rules in declaration order and stop at the first whose condition holds.
///
/// `observe` sees each tested rule with its result, in order.
pub(crate) fn evaluate(
    rules: &[CompiledRule],
    variables: &BTreeSet<String>,
    default: &str,
    record: &Record,
    mut observe: impl FnMut(&CompiledRule, bool),
) -> Result<Verdict, EvalError> {
    validate(variables, record)?;

    let patient_id = record.display_id();
    let mut path = Vec::with_capacity(rules.len());

    for rule in rules {
        path.push(rule.id.clone());
        let result = rule.expression.evaluate(record)?;
        trace!(record = patient_id, rule = %rule.id, result, "tested rule");
        observe(rule, result);

        if result {
            debug!(record = patient_id, rule = %rule.id, outcome = %rule.then, "rule matched");
            return Ok(Verdict::matched(
                patient_id,
                &rule.id,
                &rule.when,
                &rule.then,
                path,
                rule.evidence.clone(),
            ));
        }
    }

    debug!(record = patient_id, outcome = default, "no rule matched; using default");
    Ok(Verdict::fallback(patient_id, default, path))
}

pub(crate) fn evaluate_traced(
    rules: &[CompiledRule],
    variables: &BTreeSet<String>,
    default: &str,
    record: &Record,
) -> Result<(Verdict, Vec<RuleCheck>), EvalError> {
    let mut checks = Vec::new();
    let verdict = evaluate(rules, variables, default, record, |rule, result| {
        checks.push(RuleCheck {
            rule: rule.id.clone(),
            result,
        });
    })?;
    Ok((verdict, checks))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{EvalError, Interpreter, Record, RulesetBuilder};

    fn cough() -> Interpreter {
        RulesetBuilder::new("cough")
            .variables(["danger_sign", "chest_indrawing", "stridor", "fast_breathing"])
            .rule("R1", |r| r.when("danger_sign").then("SEVERE").evidence("chunk-1"))
            .rule("R2", |r| r.when("chest_indrawing OR stridor").then("SEVERE"))
            .rule("R3", |r| r.when("fast_breathing").then("PNEUMONIA"))
            .default_outcome("COUGH_NO_PNEUMONIA")
            .compile()
            .unwrap()
    }

    fn patient(id: &str, danger: bool, indrawing: bool, stridor: bool, fast: bool) -> Record {
        Record::new()
            .with_id(id)
            .set("danger_sign", danger)
            .set("chest_indrawing", indrawing)
            .set("stridor", stridor)
            .set("fast_breathing", fast)
    }

    #[test]
    fn eval_first_rule_matches() {
        let v = cough()
            .evaluate(&patient("P1", true, false, false, false))
            .unwrap();
        assert_eq!(v.patient_id(), "P1");
        assert_eq!(v.outcome(), "SEVERE");
        assert_eq!(v.matched_rule(), Some("R1"));
        assert_eq!(v.path(), &["R1"]);
        assert_eq!(v.evidence(), Some(&json!("chunk-1")));
    }

    #[test]
    fn eval_or_condition_matches_second_rule() {
        let v = cough()
            .evaluate(&patient("P2", false, true, false, false))
            .unwrap();
        assert_eq!(v.matched_rule(), Some("R2"));
        assert_eq!(v.path(), &["R1", "R2"]);
        assert_eq!(v.evidence(), None);
    }

    #[test]
    fn eval_first_match_wins_over_later_rules() {
        let v = cough()
            .evaluate(&patient("P5", false, false, true, true))
            .unwrap();
        assert_eq!(v.matched_rule(), Some("R2"));
        assert_eq!(v.outcome(), "SEVERE");
    }

    #[test]
    fn eval_default_when_nothing_matches() {
        let v = cough()
            .evaluate(&patient("P3", false, false, false, false))
            .unwrap();
        assert_eq!(v.outcome(), "COUGH_NO_PNEUMONIA");
        assert_eq!(v.matched_rule(), None);
        assert_eq!(v.path(), &["R1", "R2", "R3"]);
        assert_eq!(v.evidence(), None);
        assert!(v.justification().contains("COUGH_NO_PNEUMONIA"));
    }

    #[test]
    fn eval_missing_field_before_any_rule() {
        // danger_sign is true, so R1 would match if validation ran lazily
        let record = Record::new()
            .with_id("P4")
            .set("danger_sign", true)
            .set("chest_indrawing", false)
            .set("fast_breathing", false);
        assert_eq!(
            cough().evaluate(&record).unwrap_err(),
            EvalError::MissingField {
                record: "P4".into(),
                field: "stridor".into(),
            }
        );
    }

    #[test]
    fn eval_non_boolean_rejected_upfront() {
        let record = patient("P6", true, false, false, false).set("fast_breathing", "yes");
        assert_eq!(
            cough().evaluate(&record).unwrap_err(),
            EvalError::NotBoolean {
                record: "P6".into(),
                field: "fast_breathing".into(),
                found: "string",
            }
        );
    }

    #[test]
    fn eval_missing_id_reports_unknown() {
        let record = Record::new().set("danger_sign", true);
        let err = cough().evaluate(&record).unwrap_err();
        assert!(matches!(err, EvalError::MissingField { record, .. } if record == "unknown"));
    }

    #[test]
    fn eval_extra_fields_ignored() {
        let record = patient("P7", false, false, false, true).set("wheeze", 3_i64);
        let v = cough().evaluate(&record).unwrap();
        assert_eq!(v.outcome(), "PNEUMONIA");
    }

    #[test]
    fn eval_literal_conditions() {
        let interpreter = RulesetBuilder::new("lit")
            .variable("a")
            .rule("never", |r| r.when("false").then("X"))
            .rule("always", |r| r.when("true").then("Y"))
            .default_outcome("Z")
            .compile()
            .unwrap();
        let v = interpreter
            .evaluate(&Record::new().with_id("p").set("a", false))
            .unwrap();
        assert_eq!(v.matched_rule(), Some("always"));
        assert_eq!(v.path(), &["never", "always"]);
    }

    #[test]
    fn traced_checks_match_path() {
        let interpreter = cough();
        let report = interpreter
            .evaluate_detailed(&patient("P2", false, true, false, false))
            .unwrap();
        let rules: Vec<&str> = report.checks().iter().map(|c| c.rule.as_str()).collect();
        let results: Vec<bool> = report.checks().iter().map(|c| c.result).collect();
        assert_eq!(rules, vec!["R1", "R2"]);
        assert_eq!(results, vec![false, true]);
        assert_eq!(report.verdict().path(), &["R1", "R2"]);
    }
}
