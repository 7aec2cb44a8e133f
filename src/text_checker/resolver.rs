// Overlap resolver: turns the unpruned candidate list into the final ordered,
// pairwise-disjoint sequence of matches.

use super::RawMatch;

/// Resolve overlapping candidates into the display-ready match sequence.
///
/// Candidates are ordered by start offset ascending, span length descending,
/// entry id ascending; a greedy sweep then accepts every candidate that does
/// not overlap an already accepted one. Earlier starts win, at equal starts
/// the longer span wins, and a candidate identical in start and length to
/// another is decided by entry id (entry ids follow the index's deterministic
/// ordering, so the result is stable across runs).
///
/// The output is sorted ascending, pairwise disjoint, and a fixed point:
/// resolving an already resolved list returns it unchanged.
pub fn resolve_overlaps(mut candidates: Vec<RawMatch>) -> Vec<RawMatch> {
    candidates.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then_with(|| (b.end - b.start).cmp(&(a.end - a.start)))
            .then_with(|| a.entry.cmp(&b.entry))
    });

    let mut accepted = Vec::with_capacity(candidates.len());
    let mut last_end = 0;
    for candidate in candidates {
        if candidate.start >= last_end {
            last_end = candidate.end;
            accepted.push(candidate);
        }
    }
    accepted
}
