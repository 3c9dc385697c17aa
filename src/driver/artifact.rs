//! Rendered output files and the writer that commits them.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::request::Artifacts;
use crate::tables::digest::GrammarDigest;
use crate::tables::error::GrammarResult;

/// One fully rendered output file, held in memory until every artifact is ready.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedArtifact {
    pub artifact: Artifacts,
    pub path: PathBuf,
    pub contents: String,
}

impl RenderedArtifact {
    /// Prepends the provenance header to `body`.
    pub fn new(artifact: Artifacts, path: impl Into<PathBuf>, digest: &GrammarDigest, body: &str) -> Self {
        let mut contents = digest.header();
        contents.push_str(body);
        Self {
            artifact,
            path: path.into(),
            contents,
        }
    }
}

/// Writes every artifact, creating missing parent directories.
///
/// Every file is first staged as a temporary file next to its target. Targets are only
/// replaced once all artifacts are staged, and files created by this call are removed again
/// if a later target cannot be replaced.
pub fn write_artifacts(artifacts: &[RenderedArtifact]) -> GrammarResult<()> {
    let staged = artifacts
        .iter()
        .map(|rendered| stage(rendered).map(|file| (rendered, file)))
        .collect::<GrammarResult<Vec<_>>>()?;

    let mut created: Vec<&Path> = Vec::new();
    for (rendered, file) in staged {
        let existed = rendered.path.exists();
        if let Err(err) = file.persist(&rendered.path) {
            for path in created {
                if let Err(cleanup) = fs::remove_file(path) {
                    tracing::warn!(path = %path.display(), error = %cleanup, "could not remove partial output");
                }
            }
            return Err(err.error.into());
        }
        if !existed {
            created.push(&rendered.path);
        }
        tracing::info!(
            artifact = ?rendered.artifact,
            path = %rendered.path.display(),
            bytes = rendered.contents.len(),
            "wrote artifact"
        );
    }
    Ok(())
}

fn stage(rendered: &RenderedArtifact) -> GrammarResult<NamedTempFile> {
    let parent = rendered
        .path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent)?;
    if rendered.path.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::IsADirectory,
            format!("output {} is a directory", rendered.path.display()),
        )
        .into());
    }
    let mut file = NamedTempFile::new_in(parent)?;
    file.write_all(rendered.contents.as_bytes())?;
    file.flush()?;
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_nested_outputs_with_header() {
        let dir = tempfile::tempdir().expect("temp dir");
        let digest = GrammarDigest::of_sources([b"{}".as_slice()]);
        let path = dir.path().join("gen").join("glsl.std.450.insts.inc");
        let rendered = RenderedArtifact::new(Artifacts::GLSL_INSTS, &path, &digest, "body\n");

        write_artifacts(std::slice::from_ref(&rendered)).expect("write succeeds");

        let written = fs::read_to_string(&path).expect("read back");
        assert!(written.starts_with("// Generated by gramtab from grammar sha256:"));
        assert!(written.ends_with("body\n"));
        assert_eq!(written, rendered.contents);
    }

    #[test]
    fn failed_target_leaves_no_output_behind() {
        let dir = tempfile::tempdir().expect("temp dir");
        let digest = GrammarDigest::of_sources([b"{}".as_slice()]);
        let first = dir.path().join("glsl.std.450.insts.inc");
        let blocked = dir.path().join("opencl.std.insts.inc");
        fs::create_dir(&blocked).expect("directory in the way");
        let artifacts = [
            RenderedArtifact::new(Artifacts::GLSL_INSTS, &first, &digest, "glsl\n"),
            RenderedArtifact::new(Artifacts::OPENCL_INSTS, &blocked, &digest, "opencl\n"),
        ];

        let err = write_artifacts(&artifacts).expect_err("second target is a directory");

        assert!(matches!(err, crate::tables::error::GrammarError::Io(_)));
        assert!(!first.exists());
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .expect("list dir")
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| *path != blocked)
            .collect();
        assert!(leftovers.is_empty(), "staged files left behind: {leftovers:?}");
    }

    #[test]
    fn replaces_existing_outputs() {
        let dir = tempfile::tempdir().expect("temp dir");
        let digest = GrammarDigest::of_sources([b"{}".as_slice()]);
        let path = dir.path().join("extension_enum.inc");
        fs::write(&path, "stale").expect("seed output");

        write_artifacts(&[RenderedArtifact::new(Artifacts::EXTENSION_ENUM, &path, &digest, "fresh\n")])
            .expect("write succeeds");

        assert!(fs::read_to_string(&path).expect("read back").ends_with("fresh\n"));
    }
}
