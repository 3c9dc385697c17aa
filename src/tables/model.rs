//! Typed grammar model shared by every table builder.
//!
//! The loader produces these records from the JSON tree; after [`merge`](super::merge) has
//! reconciled aliased enumerants the model is treated as read-only for the rest of the pass.

use smallvec::SmallVec;

use super::version::GrammarVersion;

/// Ordered capability or extension names attached to an instruction or enumerant.
pub type NameTuple = SmallVec<[String; 4]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantifier {
    Mandatory,
    Optional,
    Variadic,
}

impl Quantifier {
    /// Maps the grammar's quantifier marker (`None`, `"?"`, `"*"`) to a quantifier.
    pub fn from_marker(marker: Option<&str>) -> Option<Self> {
        match marker {
            None | Some("") => Some(Quantifier::Mandatory),
            Some("?") => Some(Quantifier::Optional),
            Some("*") => Some(Quantifier::Variadic),
            Some(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperandSpec {
    pub kind: String,
    pub quantifier: Quantifier,
    pub name: Option<String>,
}

impl OperandSpec {
    pub fn new(kind: impl Into<String>, quantifier: Quantifier) -> Self {
        Self {
            kind: kind.into(),
            quantifier,
            name: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub name: String,
    pub opcode: u32,
    pub capabilities: NameTuple,
    pub extensions: NameTuple,
    pub operands: Vec<OperandSpec>,
    pub version: Option<GrammarVersion>,
    pub last_version: Option<GrammarVersion>,
}

impl Instruction {
    pub fn new(name: impl Into<String>, opcode: u32) -> Self {
        Self {
            name: name.into(),
            opcode,
            capabilities: NameTuple::new(),
            extensions: NameTuple::new(),
            operands: Vec::new(),
            version: None,
            last_version: None,
        }
    }

    /// True when any operand uses the raw (pre-canonicalization) kind `kind`.
    pub fn has_operand_kind(&self, kind: &str) -> bool {
        self.operands.iter().any(|operand| operand.kind == kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OperandCategory {
    ValueEnum,
    BitEnum,
    Other(String),
}

impl OperandCategory {
    pub fn from_name(name: &str) -> Self {
        match name {
            "ValueEnum" => OperandCategory::ValueEnum,
            "BitEnum" => OperandCategory::BitEnum,
            other => OperandCategory::Other(other.to_string()),
        }
    }

    /// Only enumerated kinds carry enumerants worth tabulating.
    pub fn is_tabulated(&self) -> bool {
        matches!(self, OperandCategory::ValueEnum | OperandCategory::BitEnum)
    }
}

/// Enumerant value as written in the grammar plus its parsed integer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumerantValue {
    pub numeric: u64,
    pub literal: String,
}

impl EnumerantValue {
    pub fn decimal(numeric: u64) -> Self {
        Self {
            numeric,
            literal: numeric.to_string(),
        }
    }

    /// Parses a bit-enumeration literal such as `0x0004`.
    pub fn hex(literal: impl Into<String>) -> Option<Self> {
        let literal = literal.into();
        let digits = literal
            .strip_prefix("0x")
            .or_else(|| literal.strip_prefix("0X"))
            .unwrap_or(&literal);
        let numeric = u64::from_str_radix(digits, 16).ok()?;
        Some(Self { numeric, literal })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enumerant {
    pub name: String,
    pub value: EnumerantValue,
    pub capabilities: NameTuple,
    pub extensions: NameTuple,
    pub parameters: Vec<OperandSpec>,
    pub version: Option<GrammarVersion>,
    pub last_version: Option<GrammarVersion>,
}

impl Enumerant {
    pub fn new(name: impl Into<String>, value: EnumerantValue) -> Self {
        Self {
            name: name.into(),
            value,
            capabilities: NameTuple::new(),
            extensions: NameTuple::new(),
            parameters: Vec::new(),
            version: None,
            last_version: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperandKind {
    pub name: String,
    pub category: OperandCategory,
    pub enumerants: Vec<Enumerant>,
}

/// One grammar document, or several merged into a single instruction + operand-kind universe.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grammar {
    pub instructions: Vec<Instruction>,
    pub operand_kinds: Vec<OperandKind>,
}

impl Grammar {
    /// Concatenates documents in order; later documents append after earlier ones.
    pub fn merged(documents: impl IntoIterator<Item = Grammar>) -> Self {
        let mut merged = Grammar::default();
        for doc in documents {
            merged.instructions.extend(doc.instructions);
            merged.operand_kinds.extend(doc.operand_kinds);
        }
        merged
    }

    pub fn operand_kind(&self, name: &str) -> Option<&OperandKind> {
        self.operand_kinds.iter().find(|kind| kind.name == name)
    }

    /// Every enumerant of every operand kind, in declaration order.
    pub fn enumerants(&self) -> impl Iterator<Item = &Enumerant> {
        self.operand_kinds
            .iter()
            .flat_map(|kind| kind.enumerants.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantifier_markers() {
        assert_eq!(Quantifier::from_marker(None), Some(Quantifier::Mandatory));
        assert_eq!(Quantifier::from_marker(Some("?")), Some(Quantifier::Optional));
        assert_eq!(Quantifier::from_marker(Some("*")), Some(Quantifier::Variadic));
        assert_eq!(Quantifier::from_marker(Some("+")), None);
    }

    #[test]
    fn hex_values_keep_their_spelling() {
        let value = EnumerantValue::hex("0x0400").expect("valid hex");
        assert_eq!(value.numeric, 0x400);
        assert_eq!(value.literal, "0x0400");
        assert!(EnumerantValue::hex("0xZZ").is_none());
    }

    #[test]
    fn merged_preserves_document_order() {
        let first = Grammar {
            instructions: vec![Instruction::new("OpA", 1)],
            operand_kinds: Vec::new(),
        };
        let second = Grammar {
            instructions: vec![Instruction::new("OpB", 0)],
            operand_kinds: Vec::new(),
        };
        let merged = Grammar::merged([first, second]);
        let names: Vec<_> = merged.instructions.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["OpA", "OpB"]);
    }
}
