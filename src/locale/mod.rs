pub mod format;
pub mod store;
pub mod tree;

pub use format::LocaleFormat;
pub use store::{write_atomic, LocaleFile, LocaleStore};
pub use tree::{LocaleNode, LocaleTree, KEY_DELIMITER};
