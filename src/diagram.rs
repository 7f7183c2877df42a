//! Mermaid flowchart rendering of a [`Ruleset`].
//!
//! Each rule becomes a decision node labelled with its id and condition. The `Yes`
//! edge leads to the rule's outcome and the `No` edge to the next rule, or to
//! the default outcome after the last rule.

use std::fmt;

use crate::Ruleset;

/// Render a ruleset as a Mermaid `flowchart TD` description.
#[must_use]
pub fn flowchart(ruleset: &Ruleset) -> String {
    Flowchart(ruleset).to_string()
}

/// [`Display`](fmt::Display) adapter writing a ruleset as a Mermaid flowchart.
///
/// Node ids are positional (`rule_0`, `outcome_0`, ...); rule ids, conditions
/// and outcome names only appear in labels, so distinct names never share a node.
#[derive(Debug, Clone, Copy)]
pub struct Flowchart<'a>(pub &'a Ruleset);

impl fmt::Display for Flowchart<'_> {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ruleset = self.0;
        let mut outcomes: Vec<&str> = Vec::new();
        for outcome in ruleset
            .rules
            .iter()
            .map(|r| r.then.as_str())
            .chain(std::iter::once(ruleset.default.as_str()))
        {
            if !outcomes.contains(&outcome) {
                outcomes.push(outcome);
            }
        }
        let outcome_node = |outcome: &str| {
            let index = outcomes.iter().position(|o| *o == outcome).unwrap_or_default();
            format!("outcome_{index}")
        };
        let default_node = outcome_node(&ruleset.default);

        writeln!(out, "flowchart TD")?;
        writeln!(out, "    start([Start])")?;
        for (i, rule) in ruleset.rules.iter().enumerate() {
            writeln!(out, "    rule_{i}{{\"{}: {}\"}}", label(&rule.id), label(&rule.when))?;
        }
        for (i, outcome) in outcomes.iter().enumerate() {
            writeln!(out, "    outcome_{i}[\"{}\"]", label(outcome))?;
        }

        if ruleset.rules.is_empty() {
            writeln!(out, "    start --> {default_node}")?;
        } else {
            writeln!(out, "    start --> rule_0")?;
        }
        let last = ruleset.rules.len().saturating_sub(1);
        for (i, rule) in ruleset.rules.iter().enumerate() {
            writeln!(out, "    rule_{i} -->|Yes| {}", outcome_node(&rule.then))?;
            if i == last {
                writeln!(out, "    rule_{i} -->|No| {default_node}")?;
            } else {
                writeln!(out, "    rule_{i} -->|No| rule_{}", i + 1)?;
            }
        }
        Ok(())
    }
}

fn label(text: &str) -> String {
    text.replace('"', "#quot;")
}
