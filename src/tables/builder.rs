//! In-memory [`Grammar`] assembly, mostly for fixtures. Each builder pushes its item into the
//! parent when finished, so a whole grammar reads as one chain of calls.

use super::model::{
    Enumerant, EnumerantValue, Grammar, Instruction, OperandCategory, OperandKind, OperandSpec,
    Quantifier,
};
use super::version::GrammarVersion;

/// Convenience wrapper for assembling a grammar in memory.
#[derive(Debug, Default)]
pub struct GrammarBuilder {
    grammar: Grammar,
}

impl GrammarBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begins an instruction; call [`InstructionBuilder::finish`] to push it.
    pub fn instruction(&mut self, name: impl Into<String>, opcode: u32) -> InstructionBuilder<'_> {
        InstructionBuilder {
            builder: self,
            inst: Instruction::new(name, opcode),
        }
    }

    /// Begins an operand kind; call [`OperandKindBuilder::finish`] to push it.
    pub fn operand_kind(
        &mut self,
        name: impl Into<String>,
        category: OperandCategory,
    ) -> OperandKindBuilder<'_> {
        OperandKindBuilder {
            builder: self,
            kind: OperandKind {
                name: name.into(),
                category,
                enumerants: Vec::new(),
            },
        }
    }

    /// Finishes building and returns the assembled grammar.
    pub fn build(self) -> Grammar {
        self.grammar
    }
}

pub struct InstructionBuilder<'a> {
    builder: &'a mut GrammarBuilder,
    inst: Instruction,
}

impl<'a> InstructionBuilder<'a> {
    pub fn operand(mut self, kind: impl Into<String>, quantifier: Quantifier) -> Self {
        self.inst.operands.push(OperandSpec::new(kind, quantifier));
        self
    }

    pub fn capabilities<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inst.capabilities = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn extensions<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inst.extensions = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn version(mut self, version: GrammarVersion) -> Self {
        self.inst.version = Some(version);
        self
    }

    pub fn last_version(mut self, version: GrammarVersion) -> Self {
        self.inst.last_version = Some(version);
        self
    }

    pub fn finish(self) -> &'a mut GrammarBuilder {
        self.builder.grammar.instructions.push(self.inst);
        self.builder
    }
}

pub struct OperandKindBuilder<'a> {
    builder: &'a mut GrammarBuilder,
    kind: OperandKind,
}

impl<'a> OperandKindBuilder<'a> {
    /// Begins an enumerant; [`EnumerantBuilder::done`] returns to this kind.
    pub fn enumerant(self, name: impl Into<String>, value: EnumerantValue) -> EnumerantBuilder<'a> {
        EnumerantBuilder {
            kind: self,
            enumerant: Enumerant::new(name, value),
        }
    }

    pub fn finish(self) -> &'a mut GrammarBuilder {
        self.builder.grammar.operand_kinds.push(self.kind);
        self.builder
    }
}

pub struct EnumerantBuilder<'a> {
    kind: OperandKindBuilder<'a>,
    enumerant: Enumerant,
}

impl<'a> EnumerantBuilder<'a> {
    pub fn capabilities<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enumerant.capabilities = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn extensions<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enumerant.extensions = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn parameter(mut self, kind: impl Into<String>) -> Self {
        self.enumerant
            .parameters
            .push(OperandSpec::new(kind, Quantifier::Mandatory));
        self
    }

    pub fn version(mut self, version: GrammarVersion) -> Self {
        self.enumerant.version = Some(version);
        self
    }

    pub fn done(mut self) -> OperandKindBuilder<'a> {
        self.kind.kind.enumerants.push(self.enumerant);
        self.kind
    }
}

/// Bit-enumeration value spelled the way grammars write masks (`0x0004`).
pub fn bits(mask: u64) -> EnumerantValue {
    EnumerantValue {
        numeric: mask,
        literal: format!("0x{mask:04x}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_instructions_and_kinds_in_order() {
        let mut builder = GrammarBuilder::new();
        builder
            .instruction("OpNop", 0)
            .capabilities(["Shader"])
            .finish();
        builder
            .operand_kind("MemoryAccess", OperandCategory::BitEnum)
            .enumerant("None", bits(0x0000))
            .done()
            .enumerant("Aligned", bits(0x0002))
            .parameter("LiteralInteger")
            .done()
            .finish();
        let grammar = builder.build();

        assert_eq!(grammar.instructions.len(), 1);
        assert_eq!(grammar.instructions[0].capabilities.as_slice(), ["Shader".to_string()]);
        let kind = grammar.operand_kind("MemoryAccess").expect("kind present");
        assert_eq!(kind.enumerants.len(), 2);
        assert_eq!(kind.enumerants[1].value.numeric, 2);
        assert_eq!(kind.enumerants[1].value.literal, "0x0002");
        assert_eq!(kind.enumerants[1].parameters[0].kind, "LiteralInteger");
    }
}
