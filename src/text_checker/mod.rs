// Text checker core: scan free text against the term index and produce the
// final non-overlapping highlighted spans. The matcher collects every
// candidate occurrence, the resolver prunes overlaps; both are pure functions
// over the text and an index snapshot.

use serde::Serialize;
use thiserror::Error;

pub mod folding;
pub mod matcher;
pub mod resolver;

pub use matcher::find_matches;
pub use resolver::resolve_overlaps;

use crate::term_index::{EntryRef, Lang, TermIndex};

/// Errors a single analysis call can produce. All of them are local to the
/// call; the shared index snapshot is never affected.
#[derive(Debug, Error)]
pub enum CheckError {
    /// The platform knows exactly two languages; anything else is rejected at
    /// the parse boundary.
    #[error("unknown language tag `{0}`, expected `de` or `en`")]
    UnknownLang(String),
    /// No index snapshot has been published yet. Callers that prefer an empty
    /// result over an error can `unwrap_or_default` at their layer; the core
    /// never swallows a missing index silently.
    #[error("term index has not been loaded yet")]
    IndexNotReady,
    #[error("failed to compile term index automaton")]
    Automaton(#[from] aho_corasick::BuildError),
}

/// Candidate occurrence prior to overlap resolution: a character span over
/// the analyzed text plus the id of the matched index entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawMatch {
    pub start: usize,
    pub end: usize,
    pub entry: usize,
}

/// Finalized highlighted span. Spans are character offsets, half-open, and in
/// a resolved list they are ascending and pairwise disjoint; the text between
/// them is implicit no-match text rendered verbatim by consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhraseMatch {
    pub start: usize,
    pub end: usize,
    /// The matched index entry's surface text in its original casing, not the
    /// folded search key.
    pub display: String,
    /// The term/translation records this span represents.
    #[serde(rename = "entries")]
    pub refs: Vec<EntryRef>,
}

/// Run one full analysis: find all candidates, resolve overlaps, annotate.
pub fn check_text(text: &str, lang: Lang, index: &TermIndex) -> Vec<PhraseMatch> {
    let candidates = find_matches(text, lang, index);
    resolve_overlaps(candidates)
        .into_iter()
        .map(|m| {
            let entry = index.entry(m.entry);
            PhraseMatch {
                start: m.start,
                end: m.end,
                display: entry.display.clone(),
                refs: entry.refs.clone(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term_index::{RefKind, TermRecord, TranslationRecord};

    fn sample_index() -> TermIndex {
        let terms = vec![TermRecord {
            id: "t1".to_string(),
            value: "Indianer".to_string(),
            lang: Lang::De,
            hide_from_list: false,
            examples: Vec::new(),
        }];
        let translations = vec![TranslationRecord {
            id: "tr1".to_string(),
            value: "Indian".to_string(),
            lang: Lang::En,
            term_id: "t1".to_string(),
        }];
        TermIndex::build(&terms, &translations).unwrap()
    }

    #[test]
    fn test_end_to_end_scenario() {
        let index = sample_index();
        let matches = check_text("Der Indianer rennt.", Lang::De, &index);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].start, 4);
        assert_eq!(matches[0].end, 12);
        assert_eq!(matches[0].refs.len(), 1);
        assert_eq!(matches[0].refs[0].kind, RefKind::Term);
        assert_eq!(matches[0].refs[0].id, "t1");
    }

    #[test]
    fn test_display_keeps_entry_casing() {
        let index = sample_index();
        let matches = check_text("der indianer", Lang::De, &index);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].display, "Indianer");
    }

    #[test]
    fn test_match_serialization_shape() {
        let index = sample_index();
        let matches = check_text("Der Indianer rennt.", Lang::De, &index);
        let json = serde_json::to_value(&matches).unwrap();
        assert_eq!(json[0]["start"], 4);
        assert_eq!(json[0]["end"], 12);
        assert_eq!(json[0]["entries"][0]["kind"], "term");
        assert_eq!(json[0]["entries"][0]["id"], "t1");
    }

    #[test]
    fn test_empty_text_is_valid() {
        let index = sample_index();
        assert!(check_text("", Lang::De, &index).is_empty());
    }
}
