//! Version applicability bounds and their packed encoding.

use std::fmt;

/// A version marker as written in the grammar's `version` / `lastVersion` fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrammarVersion {
    Release { major: u8, minor: u8 },
    /// The literal `None`: never promoted to a core version.
    Unreleased,
}

impl GrammarVersion {
    /// Parses `"X.Y"` or the literal `"None"`.
    pub fn parse(text: &str) -> Option<Self> {
        if text == "None" {
            return Some(GrammarVersion::Unreleased);
        }
        let (major, minor) = text.split_once('.')?;
        Some(GrammarVersion::Release {
            major: major.parse().ok()?,
            minor: minor.parse().ok()?,
        })
    }
}

/// Encoded version bound stored in a descriptor.
///
/// `Sentinel` is the all-ones word. On a lower bound it means "no applicable core version",
/// on an upper bound "still current".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VersionWord {
    Packed { major: u8, minor: u8 },
    Sentinel,
}

impl VersionWord {
    pub const SENTINEL_BITS: u32 = u32::MAX;

    /// Encodes a lower bound: absent means 1.0.
    pub fn minimum(version: Option<GrammarVersion>) -> Self {
        match version {
            None => VersionWord::Packed { major: 1, minor: 0 },
            Some(GrammarVersion::Unreleased) => VersionWord::Sentinel,
            Some(GrammarVersion::Release { major, minor }) => VersionWord::Packed { major, minor },
        }
    }

    /// Encodes an upper bound: absent means still current.
    pub fn maximum(version: Option<GrammarVersion>) -> Self {
        match version {
            None | Some(GrammarVersion::Unreleased) => VersionWord::Sentinel,
            Some(GrammarVersion::Release { major, minor }) => VersionWord::Packed { major, minor },
        }
    }

    /// The 32-bit word layout `0 | major | minor | 0`.
    pub fn bits(self) -> u32 {
        match self {
            VersionWord::Packed { major, minor } => (u32::from(major) << 16) | (u32::from(minor) << 8),
            VersionWord::Sentinel => Self::SENTINEL_BITS,
        }
    }
}

impl fmt::Display for VersionWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionWord::Packed { major, minor } => {
                write!(f, "SPV_SPIRV_VERSION_WORD({major}, {minor})")
            }
            VersionWord::Sentinel => f.write_str("0xffffffffu"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_minimum_is_one_zero() {
        let word = VersionWord::minimum(None);
        assert_eq!(word, VersionWord::Packed { major: 1, minor: 0 });
        assert_eq!(word.bits(), 0x0001_0000);
    }

    #[test]
    fn none_minimum_and_absent_maximum_share_the_sentinel() {
        let low = VersionWord::minimum(GrammarVersion::parse("None"));
        let high = VersionWord::maximum(None);
        assert_eq!(low.bits(), u32::MAX);
        assert_eq!(low.bits(), high.bits());
        assert_eq!(low.to_string(), "0xffffffffu");
    }

    #[test]
    fn explicit_versions_pack_major_minor() {
        let word = VersionWord::minimum(GrammarVersion::parse("1.3"));
        assert_eq!(word.bits(), 0x0001_0300);
        assert_eq!(word.to_string(), "SPV_SPIRV_VERSION_WORD(1, 3)");
        let last = VersionWord::maximum(GrammarVersion::parse("1.5"));
        assert_eq!(last.bits(), 0x0001_0500);
    }

    #[test]
    fn rejects_garbage_versions() {
        assert_eq!(GrammarVersion::parse("1"), None);
        assert_eq!(GrammarVersion::parse("one.two"), None);
    }
}
