pub mod hardcoded;
pub mod key_extractor;
pub mod walker;

pub use hardcoded::{
    finding_count, scan_for_hardcoded_text, HardcodedFinding, HardcodedReport, HardcodedScanner,
    PatternKind,
};
pub use key_extractor::{scan_corpus, CorpusScan, DynamicKeyRef, FileKeys, KeyExtractor, KeyUsageMap};
pub use walker::{collect_source_files, relative_to};
