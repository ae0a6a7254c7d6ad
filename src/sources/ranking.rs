//! Picks the single best subtitle among the candidates a provider scraped.

use std::cmp::Ordering;

use crate::domain::models::Candidate;

/// One criterion of the tie-break chain. `Greater` means `a` is preferred.
type TieBreak = fn(&Candidate, &Candidate) -> Ordering;

/// Most significant first; each step only decides ties left by the previous ones
const TIE_BREAKS: &[TieBreak] = &[
    by_link,
    by_release_match,
    by_completion,
    by_downloads,
    by_sequences,
];

fn by_link(a: &Candidate, b: &Candidate) -> Ordering {
    a.has_link().cmp(&b.has_link())
}

fn by_release_match(a: &Candidate, b: &Candidate) -> Ordering {
    a.matches.cmp(&b.matches)
}

fn by_completion(a: &Candidate, b: &Candidate) -> Ordering {
    a.completed.cmp(&b.completed)
}

fn by_downloads(a: &Candidate, b: &Candidate) -> Ordering {
    a.downloads.cmp(&b.downloads)
}

fn by_sequences(a: &Candidate, b: &Candidate) -> Ordering {
    a.sequences.cmp(&b.sequences)
}

/// Total preorder over candidates, `Greater` when `a` should win over `b`
pub fn compare(a: &Candidate, b: &Candidate) -> Ordering {
    TIE_BREAKS
        .iter()
        .map(|step| step(a, b))
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Best usable candidate, or `None` when no candidate carries a link.
///
/// Among equally ranked candidates the first one in input order wins.
pub fn best(candidates: &[Candidate]) -> Option<&Candidate> {
    candidates
        .iter()
        .reduce(|best, candidate| {
            if compare(candidate, best).is_gt() {
                candidate
            } else {
                best
            }
        })
        .filter(|best| best.has_link())
}
