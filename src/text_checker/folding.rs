// Case folding for match keys and analyzed text, with an offset map back to
// the original character positions. Index keys and analyzed text must go
// through the same routine so both sides agree on every key.

/// Fold an index value to its match key.
pub fn fold_value(value: &str) -> String {
    value.chars().flat_map(char::to_lowercase).collect()
}

/// Analyzed text in folded form, with a per-byte map to original character
/// offsets so automaton hits can be reported in original positions.
pub struct FoldedText {
    folded: String,
    /// For every byte of `folded`, the original character offset of the
    /// character it was folded from; one sentinel entry at the end holds the
    /// original character count.
    char_at_byte: Vec<usize>,
}

/// Fold text for matching, per-character, recording provenance of every byte.
pub fn fold_text(text: &str) -> FoldedText {
    let mut folded = String::with_capacity(text.len());
    let mut char_at_byte = Vec::with_capacity(text.len() + 1);
    let mut char_count = 0;

    for (char_offset, ch) in text.chars().enumerate() {
        for low in ch.to_lowercase() {
            let from = folded.len();
            folded.push(low);
            for _ in from..folded.len() {
                char_at_byte.push(char_offset);
            }
        }
        char_count = char_offset + 1;
    }
    char_at_byte.push(char_count);

    FoldedText { folded, char_at_byte }
}

impl FoldedText {
    pub fn as_str(&self) -> &str {
        &self.folded
    }

    pub fn is_empty(&self) -> bool {
        self.folded.is_empty()
    }

    /// Map a folded byte range to the original character span it covers.
    ///
    /// Returns `None` when a boundary falls inside the multi-character
    /// expansion of a single original character (possible for folds like
    /// İ → i + combining dot); such a hit covers part of a character and
    /// cannot be reported as a span over the original text.
    pub fn char_span(&self, start: usize, end: usize) -> Option<(usize, usize)> {
        debug_assert!(start < end && end <= self.folded.len());
        let starts_aligned = start == 0 || self.char_at_byte[start] != self.char_at_byte[start - 1];
        let ends_aligned =
            end == self.folded.len() || self.char_at_byte[end] != self.char_at_byte[end - 1];
        if !starts_aligned || !ends_aligned {
            return None;
        }
        Some((self.char_at_byte[start], self.char_at_byte[end]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_value_ascii_and_umlauts() {
        assert_eq!(fold_value("Indianer"), "indianer");
        assert_eq!(fold_value("ÄRZTIN"), "ärztin");
        assert_eq!(fold_value("New York"), "new york");
    }

    #[test]
    fn test_fold_text_matches_fold_value() {
        let text = "Der Indianer RENNT.";
        assert_eq!(fold_text(text).as_str(), fold_value(text));
    }

    #[test]
    fn test_char_span_ascii() {
        let folded = fold_text("Der Indianer rennt.");
        // "indianer" in the folded text: bytes 4..12, same as char offsets.
        assert_eq!(folded.char_span(4, 12), Some((4, 12)));
        assert_eq!(folded.char_span(0, 3), Some((0, 3)));
    }

    #[test]
    fn test_char_span_multibyte() {
        // 'Ä' folds to 'ä' (two bytes); char offsets stay per-character.
        let folded = fold_text("Ärztin da");
        let key = fold_value("Ärztin");
        let start = folded.as_str().find(&key).unwrap();
        assert_eq!(folded.char_span(start, start + key.len()), Some((0, 6)));
    }

    #[test]
    fn test_char_span_rejects_split_expansion() {
        // 'İ' folds to "i\u{307}": a hit ending after the bare 'i' splits the
        // expansion and must be rejected.
        let folded = fold_text("İstanbul");
        assert_eq!(&folded.as_str()[0..1], "i");
        assert_eq!(folded.char_span(0, 1), None);
    }

    #[test]
    fn test_char_span_full_text() {
        let folded = fold_text("Wort");
        assert_eq!(folded.char_span(0, 4), Some((0, 4)));
    }

    #[test]
    fn test_fold_empty() {
        assert!(fold_text("").is_empty());
        assert_eq!(fold_value(""), "");
    }
}
