use crate::source::CardSource;
use crate::Result;
use brewer_core::candidate::CommanderCandidate;
use brewer_core::color::ColorIdentity;
use brewer_core::rules::PairingRule;
use futures::future::{join_all, try_join_all};
use serde::Serialize;
use std::collections::BTreeMap;

/// A recovered failure, reported next to the results instead of aborting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    /// What failed: a rule name, a candidate, a card name.
    pub scope: String,
    pub message: String,
}

impl Diagnostic {
    pub fn new(scope: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            message: message.into(),
        }
    }
}

/// Outcome of one resolve call. Owned by the caller; nothing is shared
/// between requests.
#[derive(Debug, Default, Serialize)]
pub struct Resolution {
    pub candidates: BTreeMap<String, CommanderCandidate>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Resolution {
    pub fn into_candidates(self) -> Vec<CommanderCandidate> {
        self.candidates.into_values().collect()
    }
}

/// Find every commander (or commander pair) whose identity covers `target`.
///
/// All rules search concurrently; their results are merged in
/// [`PairingRule::all`] order. A failing rule contributes nothing and leaves
/// a diagnostic.
pub async fn resolve<S: CardSource>(source: &S, target: ColorIdentity) -> Resolution {
    let rules = PairingRule::all();
    let outcomes = join_all(rules.iter().map(|&rule| run_rule(source, rule, target))).await;

    let mut resolution = Resolution::default();
    for (&rule, outcome) in rules.iter().zip(outcomes) {
        match outcome {
            Ok(candidates) => {
                tracing::info!(%rule, found = candidates.len(), "rule resolved");
                merge(&mut resolution, candidates);
            }
            Err(e) => {
                tracing::warn!(%rule, error = %e, "rule failed");
                resolution
                    .diagnostics
                    .push(Diagnostic::new(rule.as_str(), e.to_string()));
            }
        }
    }
    resolution
}

async fn run_rule<S: CardSource>(
    source: &S,
    rule: PairingRule,
    target: ColorIdentity,
) -> Result<Vec<CommanderCandidate>> {
    let queries = rule.queries(target);
    let results = try_join_all(queries.iter().map(|q| source.search(q))).await?;
    Ok(rule.combine(target, results))
}

fn merge(resolution: &mut Resolution, candidates: Vec<CommanderCandidate>) {
    for candidate in candidates {
        let rule = candidate.rule;
        if let Some(previous) = resolution
            .candidates
            .insert(candidate.display_name.clone(), candidate)
        {
            if previous.rule != rule {
                let name = previous.display_name;
                tracing::warn!(%name, kept = %rule, dropped = %previous.rule, "display name collision");
                resolution.diagnostics.push(Diagnostic::new(
                    name,
                    format!("found by both {} and {rule}; keeping {rule}", previous.rule),
                ));
            }
        }
    }
}
