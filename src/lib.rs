pub mod batch;
pub mod media;
pub mod snapshot;
pub mod term_index;
pub mod text_checker;

// Re-export main types for convenient access
pub use term_index::{
    EntryRef, Lang, RefKind, TermExport, TermIndex, TermIndexEntry, TermRecord, TranslationRecord,
};
pub use text_checker::{
    check_text, find_matches, resolve_overlaps, CheckError, PhraseMatch, RawMatch,
};
pub use snapshot::{IndexSlot, TextChecker};
pub use media::MediaSource;

// Re-export batch utilities for the CLI and external drivers
pub use batch::{
    check_files, expand_inputs, marks_file_exists, marks_file_path, write_marks_file, BatchConfig,
    FileCheckStats, RunStats,
};
