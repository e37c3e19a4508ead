use crate::candidate::CommanderCandidate;
use std::cmp::Ordering;

/// Order candidates best-first: score descending, then popularity (lower
/// EDHREC rank first, unranked last), then display name.
pub fn rank(mut candidates: Vec<CommanderCandidate>, top: usize, include_zero: bool) -> Vec<CommanderCandidate> {
    candidates.retain(|c| include_zero || c.synergy.score > 0);
    candidates.sort_by(compare);
    candidates.truncate(top);
    candidates
}

fn compare(a: &CommanderCandidate, b: &CommanderCandidate) -> Ordering {
    b.synergy
        .score
        .cmp(&a.synergy.score)
        .then_with(|| match (a.popularity, b.popularity) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| a.display_name.cmp(&b.display_name))
}
