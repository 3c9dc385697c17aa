//! Canonical operand-type identifiers.
//!
//! Grammar kind names are renamed into the runtime's vocabulary, wrapped by their quantifier,
//! and spelled in upper snake case under the configured namespace:
//! `(IdRef, "*")` becomes `SPV_OPERAND_TYPE_VARIABLE_ID`.

use super::config::{GeneratorConfig, RenameRule};
use super::model::{OperandSpec, Quantifier};

pub struct OperandKindCanonicalizer<'a> {
    rules: &'a [RenameRule],
    prefix: &'a str,
}

impl<'a> OperandKindCanonicalizer<'a> {
    pub fn new(config: &'a GeneratorConfig) -> Self {
        Self {
            rules: config.rename_rules(),
            prefix: config.operand_type_prefix(),
        }
    }

    /// Resolves a raw grammar kind under `quantifier` to its canonical identifier.
    pub fn canonicalize(&self, kind: &str, quantifier: Quantifier) -> String {
        self.identifier(self.rename(kind), quantifier)
    }

    pub fn canonicalize_operand(&self, operand: &OperandSpec) -> String {
        self.canonicalize(&operand.kind, operand.quantifier)
    }

    /// Identifier of a trailing variadic id-reference list.
    pub fn variadic_id(&self) -> String {
        self.identifier("Id", Quantifier::Variadic)
    }

    fn rename<'k>(&'k self, kind: &'k str) -> &'k str {
        self.rules
            .iter()
            .find(|rule| rule.from == kind)
            .map(|rule| rule.to.as_str())
            .unwrap_or(kind)
    }

    fn identifier(&self, kind: &str, quantifier: Quantifier) -> String {
        let wrapped = match quantifier {
            Quantifier::Mandatory => kind.to_string(),
            Quantifier::Optional => format!("Optional{kind}"),
            Quantifier::Variadic => format!("Variable{kind}"),
        };
        format!("{}{}", self.prefix, screaming_snake(&wrapped))
    }
}

/// Inserts `_` at every lowercase-to-uppercase boundary, then upper-cases.
pub fn screaming_snake(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 8);
    let mut prev_lower = false;
    for ch in name.chars() {
        if prev_lower && ch.is_ascii_uppercase() {
            out.push('_');
        }
        prev_lower = ch.is_ascii_lowercase();
        out.push(ch.to_ascii_uppercase());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canon(kind: &str, quantifier: Quantifier) -> String {
        let config = GeneratorConfig::default();
        OperandKindCanonicalizer::new(&config).canonicalize(kind, quantifier)
    }

    #[test]
    fn renames_result_and_type_ids() {
        assert_eq!(canon("IdResultType", Quantifier::Mandatory), "SPV_OPERAND_TYPE_TYPE_ID");
        assert_eq!(canon("IdResult", Quantifier::Mandatory), "SPV_OPERAND_TYPE_RESULT_ID");
        assert_eq!(canon("IdRef", Quantifier::Mandatory), "SPV_OPERAND_TYPE_ID");
    }

    #[test]
    fn memory_semantics_and_scope_spellings_collapse() {
        let a = canon("IdMemorySemantics", Quantifier::Mandatory);
        let b = canon("MemorySemantics", Quantifier::Mandatory);
        assert_eq!(a, b);
        assert_eq!(a, "SPV_OPERAND_TYPE_MEMORY_SEMANTICS_ID");
        assert_eq!(
            canon("IdScope", Quantifier::Mandatory),
            canon("Scope", Quantifier::Mandatory)
        );
    }

    #[test]
    fn quantifiers_wrap_after_renaming() {
        assert_eq!(
            canon("IdRef", Quantifier::Variadic),
            "SPV_OPERAND_TYPE_VARIABLE_ID"
        );
        assert_eq!(
            canon("ImageOperands", Quantifier::Optional),
            "SPV_OPERAND_TYPE_OPTIONAL_IMAGE"
        );
        assert_eq!(
            canon("PairIdRefIdRef", Quantifier::Variadic),
            "SPV_OPERAND_TYPE_VARIABLE_ID"
        );
        assert_eq!(
            canon("PairLiteralIntegerIdRef", Quantifier::Variadic),
            "SPV_OPERAND_TYPE_VARIABLE_LITERAL_INTEGER_ID"
        );
    }

    #[test]
    fn floating_point_kinds_split_on_case_boundary() {
        assert_eq!(
            canon("FPRoundingMode", Quantifier::Mandatory),
            "SPV_OPERAND_TYPE_FP_ROUNDING_MODE"
        );
        assert_eq!(
            canon("FPFastMathMode", Quantifier::Optional),
            "SPV_OPERAND_TYPE_OPTIONAL_FP_FAST_MATH_MODE"
        );
    }

    #[test]
    fn unmapped_kinds_pass_through() {
        assert_eq!(
            canon("LiteralString", Quantifier::Mandatory),
            "SPV_OPERAND_TYPE_LITERAL_STRING"
        );
        assert_eq!(
            canon("CLDEBUG100_DebugInfoFlags", Quantifier::Mandatory),
            "SPV_OPERAND_TYPE_CLDEBUG100_DEBUG_INFO_FLAGS"
        );
    }

    #[test]
    fn first_matching_rule_wins() {
        let config = GeneratorConfig::builder()
            .rename_rules([RenameRule::new("Foo", "Bar"), RenameRule::new("Foo", "Baz")])
            .build();
        let canonicalizer = OperandKindCanonicalizer::new(&config);
        assert_eq!(
            canonicalizer.canonicalize("Foo", Quantifier::Mandatory),
            "SPV_OPERAND_TYPE_BAR"
        );
        assert_eq!(
            canonicalizer.canonicalize("IdRef", Quantifier::Mandatory),
            "SPV_OPERAND_TYPE_ID_REF"
        );
    }

    #[test]
    fn screaming_snake_only_splits_lower_upper_pairs() {
        assert_eq!(screaming_snake("SamplerImageFormat"), "SAMPLER_IMAGE_FORMAT");
        assert_eq!(screaming_snake("KernelEnqFlags"), "KERNEL_ENQ_FLAGS");
        assert_eq!(screaming_snake("ABCd"), "ABCD");
    }
}
