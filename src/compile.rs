use tracing::debug;

use crate::parse::{ParseOptions, Parser};
use crate::{CompileError, CompiledRule, Error, Interpreter, Ruleset};

/// Validate a ruleset and parse every condition, in declaration order.
///
/// The first failure aborts compilation; no partially compiled interpreter
/// is ever returned.
pub(crate) fn compile(ruleset: &Ruleset, options: ParseOptions) -> Result<Interpreter, Error> {
    ruleset.validate()?;

    let parser = Parser::new(ruleset.variables.iter().cloned()).with_options(options);

    let rules = ruleset
        .rules
        .iter()
        .map(|rule| {
            let expression = parser
                .parse(&rule.when)
                .map_err(|e| CompileError::from_parse(&rule.id, e))?;
            Ok(CompiledRule {
                id: rule.id.clone(),
                when: rule.when.clone(),
                then: rule.then.clone(),
                expression,
                evidence: rule.evidence.clone(),
            })
        })
        .collect::<Result<Vec<_>, CompileError>>()?;

    debug!(
        ruleset = %ruleset.name,
        rules = rules.len(),
        variables = ruleset.variables.len(),
        "compiled ruleset"
    );

    Ok(Interpreter {
        name: ruleset.name.clone(),
        variables: ruleset.variables.clone(),
        rules,
        default: ruleset.default.clone(),
        options,
    })
}
