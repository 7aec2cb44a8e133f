// Phrase matcher: finds every occurrence of every index entry compatible with
// the requested language, including overlapping and nested occurrences.
// Pruning is the resolver's job, not the matcher's.

use tracing::debug;

use super::folding::fold_text;
use super::RawMatch;
use crate::term_index::{Lang, TermIndex};

/// Scan `text` for all candidate occurrences of index entries in `lang`.
///
/// Candidates are reported as character spans over the original text. A
/// candidate must sit on word boundaries: the characters adjacent to the span
/// in the original text must not be alphanumeric, so "Indian" never matches
/// inside "Indianer". Candidate order is not specified at this stage.
pub fn find_matches(text: &str, lang: Lang, index: &TermIndex) -> Vec<RawMatch> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    let Some(lang_automaton) = index.automaton(lang) else {
        return Vec::new();
    };

    let folded = fold_text(text);
    let chars: Vec<char> = text.chars().collect();
    let mut candidates = Vec::new();

    for hit in lang_automaton.automaton.find_overlapping_iter(folded.as_str()) {
        let Some((start, end)) = folded.char_span(hit.start(), hit.end()) else {
            continue;
        };
        if !is_word_bounded(&chars, start, end) {
            continue;
        }
        candidates.push(RawMatch {
            start,
            end,
            entry: lang_automaton.entry_ids[hit.pattern().as_usize()],
        });
    }

    debug!(
        "Found {} candidate matches in {} characters",
        candidates.len(),
        chars.len()
    );
    candidates
}

/// A span matches as a phrase only if it is not glued to word characters on
/// either side in the source text.
fn is_word_bounded(chars: &[char], start: usize, end: usize) -> bool {
    let free_before = start == 0 || !chars[start - 1].is_alphanumeric();
    let free_after = end >= chars.len() || !chars[end].is_alphanumeric();
    free_before && free_after
}
