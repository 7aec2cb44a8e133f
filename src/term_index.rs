use aho_corasick::{AhoCorasick, MatchKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

use crate::media::MediaSource;
use crate::text_checker::folding::fold_value;
use crate::text_checker::CheckError;

/// The two languages the platform operates over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    De,
    En,
}

impl Lang {
    /// Wire tag as used in the term export and the CLI.
    pub fn code(self) -> &'static str {
        match self {
            Lang::De => "de",
            Lang::En => "en",
        }
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Lang {
    type Err = CheckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "de" => Ok(Lang::De),
            "en" => Ok(Lang::En),
            other => Err(CheckError::UnknownLang(other.to_string())),
        }
    }
}

/// A headword as exported by the content-management surface. Read-only here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermRecord {
    pub id: String,
    pub value: String,
    pub lang: Lang,
    /// Admin flag controlling list visibility; matched terms keep matching.
    #[serde(default)]
    pub hide_from_list: bool,
    /// Example usages citing the media they appeared in.
    #[serde(default)]
    pub examples: Vec<MediaSource>,
}

/// A proposed rendering of a term in the other language.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationRecord {
    pub id: String,
    pub value: String,
    pub lang: Lang,
    pub term_id: String,
}

/// On-disk export document carrying the full term/translation snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermExport {
    #[serde(default)]
    pub terms: Vec<TermRecord>,
    #[serde(default)]
    pub translations: Vec<TranslationRecord>,
}

impl TermExport {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

/// What kind of record an index back-reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefKind {
    Term,
    Translation,
}

/// Back-reference from an index entry to an originating record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryRef {
    pub kind: RefKind,
    pub id: String,
}

/// Matcher-friendly projection of one distinct surface text in one language.
///
/// Records of either kind that case-fold to the same text within one language
/// collapse into a single entry carrying all their back-references. Entries
/// never merge across languages.
#[derive(Debug, Clone)]
pub struct TermIndexEntry {
    /// Surface text in the casing of the first record that contributed it.
    pub display: String,
    /// Case-folded match key.
    pub folded: String,
    pub lang: Lang,
    /// Non-empty list of originating records.
    pub refs: Vec<EntryRef>,
}

impl TermIndexEntry {
    /// Key length in characters, the unit match spans are reported in.
    pub fn char_len(&self) -> usize {
        self.folded.chars().count()
    }
}

/// Per-language compiled automaton over the folded entry texts.
#[derive(Debug)]
pub(crate) struct LangAutomaton {
    pub automaton: AhoCorasick,
    /// Pattern id -> entry id in `TermIndex::entries`.
    pub entry_ids: Vec<usize>,
}

/// Immutable, matcher-ready lookup structure over all known terms and
/// translations. Built once per data refresh and shared read-only across
/// analyses; see `snapshot::IndexSlot` for the publish lifecycle.
#[derive(Debug)]
pub struct TermIndex {
    entries: Vec<TermIndexEntry>,
    automata: HashMap<Lang, LangAutomaton>,
}

impl TermIndex {
    /// Build the index from an export snapshot.
    ///
    /// Records with empty or whitespace-only values are excluded. Entries are
    /// ordered by descending key length, ties by first contribution; entry
    /// ids derived from this ordering are the resolver's final tie-break.
    pub fn build(
        terms: &[TermRecord],
        translations: &[TranslationRecord],
    ) -> Result<Self, CheckError> {
        let mut entries: Vec<TermIndexEntry> = Vec::new();
        let mut by_key: HashMap<(Lang, String), usize> = HashMap::new();
        let mut skipped = 0usize;

        let mut add = |value: &str, lang: Lang, entry_ref: EntryRef| {
            let value = value.trim();
            if value.is_empty() {
                skipped += 1;
                return;
            }
            let folded = fold_value(value);
            match by_key.get(&(lang, folded.clone())) {
                Some(&i) => entries[i].refs.push(entry_ref),
                None => {
                    by_key.insert((lang, folded.clone()), entries.len());
                    entries.push(TermIndexEntry {
                        display: value.to_string(),
                        folded,
                        lang,
                        refs: vec![entry_ref],
                    });
                }
            }
        };

        for term in terms {
            add(
                &term.value,
                term.lang,
                EntryRef {
                    kind: RefKind::Term,
                    id: term.id.clone(),
                },
            );
        }
        for translation in translations {
            add(
                &translation.value,
                translation.lang,
                EntryRef {
                    kind: RefKind::Translation,
                    id: translation.id.clone(),
                },
            );
        }

        if skipped > 0 {
            debug!("Excluded {} records with empty values", skipped);
        }

        // Longest keys first so multi-word phrases outrank the single words
        // they contain; stable sort keeps contribution order for equal lengths.
        entries.sort_by(|a, b| b.char_len().cmp(&a.char_len()));

        let mut automata = HashMap::new();
        for lang in [Lang::De, Lang::En] {
            let entry_ids: Vec<usize> = entries
                .iter()
                .enumerate()
                .filter(|(_, e)| e.lang == lang)
                .map(|(i, _)| i)
                .collect();
            if entry_ids.is_empty() {
                continue;
            }
            let patterns: Vec<&str> = entry_ids.iter().map(|&i| entries[i].folded.as_str()).collect();
            // Standard match kind is required for the overlapping search the
            // matcher runs; leftmost kinds drop nested candidates.
            let automaton = AhoCorasick::builder()
                .match_kind(MatchKind::Standard)
                .build(&patterns)?;
            automata.insert(lang, LangAutomaton { automaton, entry_ids });
        }

        info!(
            "Built term index: {} entries from {} terms and {} translations",
            entries.len(),
            terms.len(),
            translations.len()
        );

        Ok(Self { entries, automata })
    }

    pub fn entries(&self) -> &[TermIndexEntry] {
        &self.entries
    }

    pub fn entry(&self, id: usize) -> &TermIndexEntry {
        &self.entries[id]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn automaton(&self, lang: Lang) -> Option<&LangAutomaton> {
        self.automata.get(&lang)
    }
}
