//! Operand-kind name prefixing for independently authored grammars sharing one namespace.

use ahash::AHashMap;

use crate::tables::model::Grammar;

/// Prepends `prefix` to every operand kind declared by `grammar` and rewrites every operand
/// (instruction operands and enumerant parameters) that references one of those kinds.
/// References to kinds declared elsewhere are left untouched.
pub fn prefix_operand_kinds(grammar: &mut Grammar, prefix: &str) {
    if prefix.is_empty() {
        return;
    }
    let mut renamed: AHashMap<String, String> = AHashMap::with_capacity(grammar.operand_kinds.len());
    for kind in &mut grammar.operand_kinds {
        let new_name = format!("{prefix}{}", kind.name);
        renamed.insert(std::mem::replace(&mut kind.name, new_name.clone()), new_name);
    }

    let operands = grammar
        .instructions
        .iter_mut()
        .flat_map(|inst| inst.operands.iter_mut())
        .chain(
            grammar
                .operand_kinds
                .iter_mut()
                .flat_map(|kind| kind.enumerants.iter_mut())
                .flat_map(|e| e.parameters.iter_mut()),
        );
    let mut rewritten = 0usize;
    for operand in operands {
        if let Some(new_name) = renamed.get(&operand.kind) {
            operand.kind = new_name.clone();
            rewritten += 1;
        }
    }
    tracing::debug!(
        prefix,
        kinds = renamed.len(),
        operands = rewritten,
        "prefixed operand kinds"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::builder::GrammarBuilder;
    use crate::tables::model::{EnumerantValue, OperandCategory, Quantifier};

    #[test]
    fn renames_kinds_and_their_references() {
        let mut builder = GrammarBuilder::new();
        builder
            .instruction("DebugTypeBasic", 2)
            .operand("IdRef", Quantifier::Mandatory)
            .operand("DebugBaseTypeAttributeEncoding", Quantifier::Mandatory)
            .finish();
        builder
            .operand_kind("DebugBaseTypeAttributeEncoding", OperandCategory::ValueEnum)
            .enumerant("Unspecified", EnumerantValue::decimal(0))
            .done()
            .finish();
        builder
            .operand_kind("DebugOperation", OperandCategory::ValueEnum)
            .enumerant("Deref", EnumerantValue::decimal(0))
            .parameter("DebugBaseTypeAttributeEncoding")
            .done()
            .finish();
        let mut grammar = builder.build();

        prefix_operand_kinds(&mut grammar, "CLDEBUG100_");

        assert_eq!(
            grammar.operand_kinds[0].name,
            "CLDEBUG100_DebugBaseTypeAttributeEncoding"
        );
        let operands = &grammar.instructions[0].operands;
        assert_eq!(operands[0].kind, "IdRef", "foreign kinds keep their names");
        assert_eq!(operands[1].kind, "CLDEBUG100_DebugBaseTypeAttributeEncoding");
        assert_eq!(
            grammar.operand_kinds[1].enumerants[0].parameters[0].kind,
            "CLDEBUG100_DebugBaseTypeAttributeEncoding"
        );
    }

    #[test]
    fn empty_prefix_is_a_no_op() {
        let mut builder = GrammarBuilder::new();
        builder
            .operand_kind("Dim", OperandCategory::ValueEnum)
            .finish();
        let mut grammar = builder.build();
        let before = grammar.clone();
        prefix_operand_kinds(&mut grammar, "");
        assert_eq!(grammar, before);
    }
}
