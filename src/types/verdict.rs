use std::fmt;

use serde::{Deserialize, Serialize};

/// The result of evaluating one record: the outcome, which rule produced it,
/// the audit trail of rules tested, and why.
///
/// Serializes to the result document
/// `{ patient_id, outcome, matched_rule, path, justification, evidence }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[must_use]
pub struct Verdict {
    patient_id: String,
    outcome: String,
    matched_rule: Option<String>,
    path: Vec<String>,
    justification: String,
    evidence: Option<serde_json::Value>,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.matched_rule {
            Some(rule) => write!(f, "{}: {} (rule {rule})", self.patient_id, self.outcome),
            None => write!(f, "{}: {} (default)", self.patient_id, self.outcome),
        }
    }
}

impl Verdict {
    pub(crate) fn matched(
        patient_id: impl Into<String>,
        rule: &str,
        condition: &str,
        outcome: &str,
        path: Vec<String>,
        evidence: Option<serde_json::Value>,
    ) -> Self {
        Self {
            patient_id: patient_id.into(),
            outcome: outcome.to_owned(),
            matched_rule: Some(rule.to_owned()),
            justification: format!(
                "rule {rule} matched: condition \"{condition}\" is true, so the outcome is {outcome}"
            ),
            path,
            evidence,
        }
    }

    pub(crate) fn fallback(patient_id: impl Into<String>, default: &str, path: Vec<String>) -> Self {
        Self {
            patient_id: patient_id.into(),
            outcome: default.to_owned(),
            matched_rule: None,
            justification: format!(
                "no rule matched after testing [{}], so the default outcome {default} applies",
                path.join(", ")
            ),
            path,
            evidence: None,
        }
    }

    #[must_use]
    pub fn patient_id(&self) -> &str {
        &self.patient_id
    }

    #[must_use]
    pub fn outcome(&self) -> &str {
        &self.outcome
    }

    /// Id of the first rule whose condition held, or `None` for the default.
    #[must_use]
    pub fn matched_rule(&self) -> Option<&str> {
        self.matched_rule.as_deref()
    }

    /// Ids of every rule tested, in order, including the matching one.
    #[must_use]
    pub fn path(&self) -> &[String] {
        &self.path
    }

    #[must_use]
    pub fn justification(&self) -> &str {
        &self.justification
    }

    #[must_use]
    pub fn evidence(&self) -> Option<&serde_json::Value> {
        self.evidence.as_ref()
    }

    #[must_use]
    pub fn is_default(&self) -> bool {
        self.matched_rule.is_none()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn matched_verdict() {
        let v = Verdict::matched(
            "P1",
            "R2",
            "chest_indrawing OR stridor",
            "SEVERE",
            vec!["R1".into(), "R2".into()],
            Some(json!("chunk-7")),
        );
        assert_eq!(v.patient_id(), "P1");
        assert_eq!(v.outcome(), "SEVERE");
        assert_eq!(v.matched_rule(), Some("R2"));
        assert_eq!(v.path(), &["R1", "R2"]);
        assert_eq!(v.evidence(), Some(&json!("chunk-7")));
        assert!(!v.is_default());
        assert!(v.justification().contains("R2"));
        assert!(v.justification().contains("chest_indrawing OR stridor"));
        assert!(v.justification().contains("SEVERE"));
    }

    #[test]
    fn fallback_verdict() {
        let v = Verdict::fallback("P3", "COUGH_NO_PNEUMONIA", vec!["R1".into(), "R2".into()]);
        assert_eq!(v.matched_rule(), None);
        assert_eq!(v.evidence(), None);
        assert!(v.is_default());
        assert_eq!(
            v.justification(),
            "no rule matched after testing [R1, R2], so the default outcome COUGH_NO_PNEUMONIA applies"
        );
    }

    #[test]
    fn display() {
        let v = Verdict::fallback("P3", "OK", vec![]);
        assert_eq!(v.to_string(), "P3: OK (default)");
        let v = Verdict::matched("P1", "R1", "a", "BAD", vec!["R1".into()], None);
        assert_eq!(v.to_string(), "P1: BAD (rule R1)");
    }

    #[test]
    fn serializes_to_result_document() {
        let v = Verdict::fallback("P3", "OK", vec!["R1".into()]);
        let doc = serde_json::to_value(&v).unwrap();
        assert_eq!(
            doc,
            json!({
                "patient_id": "P3",
                "outcome": "OK",
                "matched_rule": null,
                "path": ["R1"],
                "justification": v.justification(),
                "evidence": null,
            })
        );
    }

    #[test]
    fn verdict_equality() {
        let v1 = Verdict::matched("P", "R1", "a", "X", vec!["R1".into()], None);
        let v2 = Verdict::matched("P", "R1", "a", "X", vec!["R1".into()], None);
        assert_eq!(v1, v2);
    }
}
