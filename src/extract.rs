//! Derive a [`Ruleset`] from free-text guideline chunks.
//!
//! Recognizes two sentence shapes:
//!
//! - `If <condition>, classify as <OUTCOME>` becomes rule `R<n>`, where `n`
//!   is the 1-based position of the chunk, with the chunk id as evidence.
//!   A trailing `is true` on the condition is dropped.
//! - Any chunk mentioning `otherwise` sets the default from its
//!   `classify as <OUTCOME>`.
//!
//! Chunks matching neither shape are skipped. Declared variables are the
//! lowercase identifiers found in the extracted conditions.

use std::collections::BTreeSet;
use std::io::BufRead;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::{Rule, Ruleset, SchemaError};

static OUTCOME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)classify as (\w+)").expect("outcome pattern is valid"));

static CONDITION_IS_TRUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)if (.*?) is true,? classify").expect("condition pattern is valid")
});

static CONDITION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)if (.*?),? classify").expect("condition pattern is valid"));

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([a-z_]\w*)\b").expect("identifier pattern is valid"));

const NOT_VARIABLES: [&str; 6] = ["OR", "AND", "NOT", "TRUE", "FALSE", "IS"];

/// Name given to every extracted ruleset.
pub const EXTRACTED_NAME: &str = "extracted_ruleset";

/// One unit of guideline text, as stored one JSON object per line.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Chunk {
    pub chunk_id: serde_json::Value,
    pub text: String,
}

impl Chunk {
    pub fn new(chunk_id: impl Into<serde_json::Value>, text: &str) -> Self {
        Self {
            chunk_id: chunk_id.into(),
            text: text.to_owned(),
        }
    }

    fn label(&self) -> String {
        match &self.chunk_id {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// A rule extracted from one chunk, together with the variables its
/// condition references.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedRule {
    pub rule: Rule,
    pub variables: BTreeSet<String>,
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("cannot extract outcome from chunk {chunk}: '{text}'")]
    MissingOutcome { chunk: String, text: String },

    #[error("cannot extract condition from chunk {chunk}: '{text}'")]
    MissingCondition { chunk: String, text: String },

    #[error("invalid chunk on line {line}: {source}")]
    Json {
        line: usize,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Lowercase-initial identifiers in a condition, excluding connective words.
#[must_use]
pub fn condition_variables(condition: &str) -> BTreeSet<String> {
    IDENTIFIER
        .captures_iter(condition)
        .map(|c| c[1].to_owned())
        .filter(|word| !NOT_VARIABLES.contains(&word.to_uppercase().as_str()))
        .collect()
}

/// Extract the outcome of an `Otherwise classify as X` chunk.
///
/// # Errors
///
/// Returns [`ExtractError::MissingOutcome`] if no `classify as` phrase is present.
pub fn extract_default(chunk: &Chunk) -> Result<String, ExtractError> {
    OUTCOME
        .captures(&chunk.text)
        .map(|c| c[1].to_owned())
        .ok_or_else(|| ExtractError::MissingOutcome {
            chunk: chunk.label(),
            text: chunk.text.clone(),
        })
}

/// Extract a rule from an `If ..., classify as X` chunk.
///
/// Returns `Ok(None)` for chunks that do not start with `if`.
///
/// # Errors
///
/// Returns [`ExtractError::MissingOutcome`] or [`ExtractError::MissingCondition`]
/// when the chunk starts with `if` but is otherwise malformed.
pub fn extract_rule(chunk: &Chunk, position: usize) -> Result<Option<ExtractedRule>, ExtractError> {
    if !chunk.text.to_lowercase().starts_with("if ") {
        return Ok(None);
    }

    let outcome = extract_default(chunk)?;
    let condition = CONDITION_IS_TRUE
        .captures(&chunk.text)
        .or_else(|| CONDITION.captures(&chunk.text))
        .map(|c| c[1].trim().to_owned())
        .ok_or_else(|| ExtractError::MissingCondition {
            chunk: chunk.label(),
            text: chunk.text.clone(),
        })?;

    let variables = condition_variables(&condition);
    Ok(Some(ExtractedRule {
        rule: Rule {
            id: format!("R{position}"),
            when: condition,
            then: outcome,
            evidence: Some(chunk.chunk_id.clone()),
        },
        variables,
    }))
}

/// Build a ruleset from chunks in order.
///
/// # Errors
///
/// Returns [`ExtractError`] for malformed rule or default chunks, and
/// [`SchemaError::MissingDefault`] / [`SchemaError::NoRules`] when the text
/// yields no default or no rules.
pub fn extract_from_chunks(chunks: &[Chunk]) -> Result<Ruleset, ExtractError> {
    let mut rules = Vec::new();
    let mut variables = BTreeSet::new();
    let mut default = None;

    for (i, chunk) in chunks.iter().enumerate() {
        if chunk.text.to_lowercase().contains("otherwise") {
            default = Some(extract_default(chunk)?);
            continue;
        }
        match extract_rule(chunk, i + 1)? {
            Some(extracted) => {
                variables.extend(extracted.variables);
                rules.push(extracted.rule);
            }
            None => debug!(chunk = %chunk.label(), "skipping chunk without a rule"),
        }
    }

    let default = default.ok_or(SchemaError::MissingDefault)?;
    if rules.is_empty() {
        return Err(SchemaError::NoRules.into());
    }

    Ok(Ruleset {
        name: EXTRACTED_NAME.to_owned(),
        variables,
        rules,
        default,
    })
}

/// Read chunks from JSON lines, skipping blank lines.
///
/// # Errors
///
/// Returns [`ExtractError::Json`] with the 1-based line number of a bad line.
pub fn read_chunks(reader: impl BufRead) -> Result<Vec<Chunk>, ExtractError> {
    let mut chunks = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let chunk = serde_json::from_str(&line).map_err(|source| ExtractError::Json {
            line: i + 1,
            source,
        })?;
        chunks.push(chunk);
    }
    Ok(chunks)
}

/// Read a JSON-lines chunk file and extract a ruleset from it.
///
/// # Errors
///
/// Returns [`ExtractError`] on I/O, JSON, or extraction failure.
pub fn extract_from_file(path: impl AsRef<std::path::Path>) -> Result<Ruleset, ExtractError> {
    let file = std::fs::File::open(path)?;
    let chunks = read_chunks(std::io::BufReader::new(file))?;
    extract_from_chunks(&chunks)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn variables_skip_connectives() {
        let vars = condition_variables("chest_indrawing OR stridor and not wheeze is true");
        let vars: Vec<&str> = vars.iter().map(String::as_str).collect();
        assert_eq!(vars, vec!["chest_indrawing", "stridor", "wheeze"]);
    }

    #[test]
    fn variables_ignore_uppercase_initial_words() {
        assert!(condition_variables("Fever AND NOT Cough").is_empty());
    }

    #[test]
    fn rule_with_is_true_suffix() {
        let chunk = Chunk::new("c1", "If danger_sign is true, classify as SEVERE.");
        let extracted = extract_rule(&chunk, 1).unwrap().unwrap();
        assert_eq!(extracted.rule.id, "R1");
        assert_eq!(extracted.rule.when, "danger_sign");
        assert_eq!(extracted.rule.then, "SEVERE");
        assert_eq!(extracted.rule.evidence, Some(json!("c1")));
    }

    #[test]
    fn rule_without_comma() {
        let chunk = Chunk::new(7, "IF chest_indrawing OR stridor classify as SEVERE");
        let extracted = extract_rule(&chunk, 3).unwrap().unwrap();
        assert_eq!(extracted.rule.id, "R3");
        assert_eq!(extracted.rule.when, "chest_indrawing OR stridor");
        assert_eq!(extracted.rule.evidence, Some(json!(7)));
        assert_eq!(extracted.variables.len(), 2);
    }

    #[test]
    fn non_rule_chunk_skipped() {
        let chunk = Chunk::new("c0", "Assess the child for cough.");
        assert!(extract_rule(&chunk, 1).unwrap().is_none());
    }

    #[test]
    fn rule_without_outcome_is_error() {
        let chunk = Chunk::new("c9", "If fast_breathing, refer.");
        let err = extract_rule(&chunk, 1).unwrap_err();
        assert!(matches!(err, ExtractError::MissingOutcome { ref chunk, .. } if chunk == "c9"));
        assert_eq!(
            err.to_string(),
            "cannot extract outcome from chunk c9: 'If fast_breathing, refer.'"
        );
    }

    #[test]
    fn rule_without_condition_is_error() {
        let chunk = Chunk::new("c4", "If: see table. Then classify as SEVERE");
        assert!(matches!(
            extract_rule(&chunk, 1),
            Err(ExtractError::MissingCondition { .. })
        ));
    }

    #[test]
    fn full_extraction() {
        let chunks = vec![
            Chunk::new("c0", "Cough or difficult breathing."),
            Chunk::new("c1", "If danger_sign is true, classify as SEVERE"),
            Chunk::new("c2", "If chest_indrawing OR stridor, classify as SEVERE"),
            Chunk::new("c3", "If fast_breathing, classify as PNEUMONIA"),
            Chunk::new("c4", "Otherwise classify as COUGH_NO_PNEUMONIA"),
        ];
        let ruleset = extract_from_chunks(&chunks).unwrap();
        assert_eq!(ruleset.name, EXTRACTED_NAME);
        assert_eq!(ruleset.default, "COUGH_NO_PNEUMONIA");
        let ids: Vec<&str> = ruleset.rules.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["R2", "R3", "R4"]);
        let vars: Vec<&str> = ruleset.variables.iter().map(String::as_str).collect();
        assert_eq!(
            vars,
            vec!["chest_indrawing", "danger_sign", "fast_breathing", "stridor"]
        );
        assert!(ruleset.validate().is_ok());
    }

    #[test]
    fn extraction_requires_default() {
        let chunks = vec![Chunk::new("c1", "If a, classify as X")];
        assert!(matches!(
            extract_from_chunks(&chunks),
            Err(ExtractError::Schema(SchemaError::MissingDefault))
        ));
    }

    #[test]
    fn extraction_requires_rules() {
        let chunks = vec![Chunk::new("c1", "Otherwise classify as X")];
        assert!(matches!(
            extract_from_chunks(&chunks),
            Err(ExtractError::Schema(SchemaError::NoRules))
        ));
    }

    #[test]
    fn read_chunks_skips_blank_lines() {
        let input = "{\"chunk_id\": \"a\", \"text\": \"If x, classify as Y\"}\n\n{\"chunk_id\": \"b\", \"text\": \"Otherwise classify as Z\"}\n";
        let chunks = read_chunks(input.as_bytes()).unwrap();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1].chunk_id, json!("b"));
    }

    #[test]
    fn read_chunks_reports_line() {
        let input = "{\"chunk_id\": \"a\", \"text\": \"t\"}\n{oops}\n";
        assert!(matches!(
            read_chunks(input.as_bytes()),
            Err(ExtractError::Json { line: 2, .. })
        ));
    }
}
