//! Grammar file loading helpers (JSON conversion, kind prefixing, file reader).

pub mod document;
pub mod grammar;
pub mod prefix;

pub use document::{grammar_from_value, parse_str};
pub use grammar::GrammarLoader;
pub use prefix::prefix_operand_kinds;
