//! File-level loading: reads grammar documents, applies kind prefixes, and keeps the raw bytes
//! for provenance.

use std::fs;
use std::path::{Path, PathBuf};

use crate::loader::document::parse_str;
use crate::loader::prefix::prefix_operand_kinds;
use crate::tables::digest::GrammarDigest;
use crate::tables::error::{GrammarError, GrammarResult};
use crate::tables::model::Grammar;

#[derive(Debug, Default)]
pub struct GrammarLoader {
    sources: Vec<(PathBuf, Vec<u8>)>,
}

impl GrammarLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads and converts one grammar file. When `prefix` is given, every operand kind the
    /// file declares is renamed before the grammar is returned.
    pub fn load<P: AsRef<Path>>(&mut self, path: P, prefix: Option<&str>) -> GrammarResult<Grammar> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let src = std::str::from_utf8(&bytes).map_err(|err| {
            GrammarError::malformed(
                path.display().to_string(),
                format!("invalid UTF-8 at byte {}", err.valid_up_to()),
            )
        })?;
        let mut grammar = parse_str(src).map_err(|err| Self::locate(path, err))?;
        if let Some(prefix) = prefix {
            prefix_operand_kinds(&mut grammar, prefix);
        }
        tracing::debug!(
            path = %path.display(),
            instructions = grammar.instructions.len(),
            operand_kinds = grammar.operand_kinds.len(),
            "loaded grammar"
        );
        self.sources.push((path.to_path_buf(), bytes));
        Ok(grammar)
    }

    /// Paths loaded so far, in load order.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.sources.iter().map(|(path, _)| path.as_path())
    }

    /// Digest over the bytes of every file loaded so far, in load order.
    pub fn digest(&self) -> GrammarDigest {
        GrammarDigest::of_sources(self.sources.iter().map(|(_, bytes)| bytes))
    }

    fn locate(path: &Path, err: GrammarError) -> GrammarError {
        match err {
            GrammarError::Malformed { context, message } => GrammarError::Malformed {
                context: format!("{}: {context}", path.display()),
                message,
            },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn grammar_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write grammar");
        file
    }

    #[test]
    fn load_applies_prefix_and_records_digest() {
        let file = grammar_file(
            r#"{ "instructions": [{ "opname": "DebugInfoNone", "opcode": 0 }],
                 "operand_kinds": [{ "kind": "DebugInfoFlags", "category": "BitEnum", "enumerants": [] }] }"#,
        );
        let mut loader = GrammarLoader::new();
        let grammar = loader.load(file.path(), Some("DEBUG_")).expect("grammar loads");
        assert_eq!(grammar.operand_kinds[0].name, "DEBUG_DebugInfoFlags");
        assert_eq!(loader.paths().count(), 1);

        let bytes = fs::read(file.path()).expect("reread");
        assert_eq!(loader.digest(), GrammarDigest::of_sources([bytes]));
    }

    #[test]
    fn malformed_errors_name_the_file() {
        let file = grammar_file(r#"{ "instructions": [{ "opcode": 3 }] }"#);
        let err = GrammarLoader::new()
            .load(file.path(), None)
            .expect_err("opname is required");
        match err {
            GrammarError::Malformed { context, .. } => {
                assert!(context.starts_with(&file.path().display().to_string()));
                assert!(context.ends_with("instructions[0]"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(b"{ \"instructions\": [{ \"opname\": \"Ro\xFFund\", \"opcode\": 1 }] }")
            .expect("write grammar");
        let mut loader = GrammarLoader::new();
        let err = loader
            .load(file.path(), None)
            .expect_err("names must not be lossily decoded");
        match err {
            GrammarError::Malformed { context, message } => {
                assert_eq!(context, file.path().display().to_string());
                assert_eq!(message, "invalid UTF-8 at byte 34");
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(loader.paths().count(), 0);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = GrammarLoader::new()
            .load(dir.path().join("absent.json"), None)
            .expect_err("file is absent");
        assert!(matches!(err, GrammarError::Io(_)));
    }
}
