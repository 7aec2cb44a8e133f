// Shared index lifecycle: the term index is process-wide read-mostly state
// with an explicit load-then-refresh cycle. Refreshes publish a whole new
// snapshot; analyses in flight keep the snapshot they were handed.

use std::sync::{Arc, RwLock};
use tracing::info;

use crate::term_index::{Lang, TermIndex};
use crate::text_checker::{check_text, CheckError, PhraseMatch};

/// Swappable holder for the current index snapshot.
///
/// `publish` replaces the snapshot atomically; it never mutates one in place,
/// so readers holding an `Arc` from `snapshot` keep a consistent view for the
/// duration of their analysis.
pub struct IndexSlot {
    current: RwLock<Option<Arc<TermIndex>>>,
}

impl IndexSlot {
    pub fn new() -> Self {
        Self {
            current: RwLock::new(None),
        }
    }

    /// Publish a freshly built index, replacing any previous snapshot.
    pub fn publish(&self, index: TermIndex) {
        let entries = index.len();
        let mut slot = self.current.write().expect("index slot lock poisoned");
        *slot = Some(Arc::new(index));
        info!("Published term index snapshot with {} entries", entries);
    }

    /// Drop the current snapshot, returning the slot to the not-ready state.
    pub fn clear(&self) {
        let mut slot = self.current.write().expect("index slot lock poisoned");
        *slot = None;
    }

    /// Hand out the current snapshot, or `IndexNotReady` before first publish.
    pub fn snapshot(&self) -> Result<Arc<TermIndex>, CheckError> {
        let slot = self.current.read().expect("index slot lock poisoned");
        slot.clone().ok_or(CheckError::IndexNotReady)
    }

    pub fn is_ready(&self) -> bool {
        self.current
            .read()
            .expect("index slot lock poisoned")
            .is_some()
    }
}

impl Default for IndexSlot {
    fn default() -> Self {
        Self::new()
    }
}

/// Analysis front door: an `IndexSlot` plus the check call that enforces the
/// not-ready contract from the error design.
pub struct TextChecker {
    slot: IndexSlot,
}

impl TextChecker {
    pub fn new() -> Self {
        Self {
            slot: IndexSlot::new(),
        }
    }

    pub fn publish(&self, index: TermIndex) {
        self.slot.publish(index);
    }

    pub fn is_ready(&self) -> bool {
        self.slot.is_ready()
    }

    /// Current snapshot for callers that run many analyses against one view.
    pub fn snapshot(&self) -> Result<Arc<TermIndex>, CheckError> {
        self.slot.snapshot()
    }

    /// Analyze one text against the current snapshot.
    pub fn check(&self, text: &str, lang: Lang) -> Result<Vec<PhraseMatch>, CheckError> {
        let snapshot = self.slot.snapshot()?;
        Ok(check_text(text, lang, &snapshot))
    }
}

impl Default for TextChecker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term_index::TermRecord;

    fn small_index(value: &str) -> TermIndex {
        let terms = vec![TermRecord {
            id: "t1".to_string(),
            value: value.to_string(),
            lang: Lang::De,
            hide_from_list: false,
            examples: Vec::new(),
        }];
        TermIndex::build(&terms, &[]).unwrap()
    }

    #[test]
    fn test_not_ready_before_publish() {
        let checker = TextChecker::new();
        assert!(!checker.is_ready());
        let err = checker.check("Der Indianer rennt.", Lang::De).unwrap_err();
        assert!(matches!(err, CheckError::IndexNotReady));
    }

    #[test]
    fn test_ready_after_publish() {
        let checker = TextChecker::new();
        checker.publish(small_index("Indianer"));
        assert!(checker.is_ready());
        let matches = checker.check("Der Indianer rennt.", Lang::De).unwrap();
        assert_eq!(matches.len(), 1);
    }

    #[test]
    fn test_publish_replaces_snapshot() {
        let checker = TextChecker::new();
        checker.publish(small_index("Indianer"));
        checker.publish(small_index("Zigeuner"));
        let matches = checker.check("Der Indianer rennt.", Lang::De).unwrap();
        assert!(matches.is_empty());
        let matches = checker.check("Das Wort Zigeuner.", Lang::De).unwrap();
        assert_eq!(matches.len(), 1);
    }

    #[test]
    fn test_clear_returns_to_not_ready() {
        let slot = IndexSlot::new();
        slot.publish(small_index("Indianer"));
        assert!(slot.is_ready());
        slot.clear();
        assert!(matches!(
            slot.snapshot().unwrap_err(),
            CheckError::IndexNotReady
        ));
    }

    #[test]
    fn test_in_flight_snapshot_survives_republish() {
        let slot = IndexSlot::new();
        slot.publish(small_index("Indianer"));
        let held = slot.snapshot().unwrap();
        slot.publish(small_index("Zigeuner"));
        // The old snapshot is still fully usable for the analysis that holds it.
        let matches = check_text("Der Indianer rennt.", Lang::De, &held);
        assert_eq!(matches.len(), 1);
    }

    #[test]
    fn test_concurrent_readers_during_publish() {
        let slot = Arc::new(IndexSlot::new());
        slot.publish(small_index("Indianer"));

        let mut handles = Vec::new();
        for _ in 0..4 {
            let slot = Arc::clone(&slot);
            handles.push(std::thread::spawn(move || {
                for _ in 0..200 {
                    let snapshot = slot.snapshot().unwrap();
                    let matches = check_text("Der Indianer rennt.", Lang::De, &snapshot);
                    // Every analysis sees a consistent snapshot: one entry or
                    // the replacement, never a torn mix.
                    assert!(matches.len() <= 1);
                }
            }));
        }
        for _ in 0..50 {
            slot.publish(small_index("Indianer"));
        }
        for handle in handles {
            handle.join().unwrap();
        }
    }
}
