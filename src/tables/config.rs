//! Fixed vocabulary and lists that parameterize table generation.
//!
//! Everything the builders would otherwise hardcode lives here so tests can substitute
//! alternate configurations. [`GeneratorConfig::default`] describes the SPIR-V runtime.

/// One `(source, target)` operand-kind substitution. Rules are checked in order and the first
/// match wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameRule {
    pub from: String,
    pub to: String,
}

impl RenameRule {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

const SPIRV_RENAMES: &[(&str, &str)] = &[
    ("IdResultType", "TypeId"),
    ("IdResult", "ResultId"),
    ("IdMemorySemantics", "MemorySemanticsId"),
    ("MemorySemantics", "MemorySemanticsId"),
    ("IdScope", "ScopeId"),
    ("Scope", "ScopeId"),
    ("IdRef", "Id"),
    ("ImageOperands", "Image"),
    ("Dim", "Dimensionality"),
    ("ImageFormat", "SamplerImageFormat"),
    ("KernelEnqueueFlags", "KernelEnqFlags"),
    ("LiteralExtInstInteger", "ExtensionInstructionNumber"),
    ("LiteralSpecConstantOpInteger", "SpecConstantOpNumber"),
    ("LiteralContextDependentNumber", "TypedLiteralNumber"),
    ("PairLiteralIntegerIdRef", "LiteralIntegerId"),
    ("PairIdRefLiteralInteger", "IdLiteralInteger"),
    ("PairIdRefIdRef", "Id"),
    ("FPRoundingMode", "FpRoundingMode"),
    ("FPFastMathMode", "FpFastMathMode"),
];

/// Extensions known to the registry but absent from machine-readable grammars.
const SPIRV_SUPPLEMENTARY_EXTENSIONS: &[&str] = &[
    "SPV_AMD_gcn_shader",
    "SPV_AMD_gpu_shader_half_float",
    "SPV_AMD_gpu_shader_int16",
    "SPV_AMD_shader_trinary_minmax",
    "SPV_KHR_non_semantic_info",
];

/// Lets the validator skip its type-declaration uniqueness check. Not a real extension.
const SPIRV_RESERVED_EXTENSION: &str = "SPV_VALIDATOR_ignore_type_decl_unique";

/// Enumerated kinds referenced both as mandatory and optional operands.
const SPIRV_OPTIONAL_DUPLICATES: &[&str] = &["ImageOperands", "AccessQualifier", "MemoryAccess"];

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    variable_prefix: String,
    operand_type_prefix: String,
    instruction_prefix: String,
    opcode_symbol_prefix: String,
    capability_type: String,
    capability_symbol_prefix: String,
    extension_type: String,
    extension_symbol_prefix: String,
    ext_inst_name: String,
    capability_kind: String,
    debug_info_kind_prefix: String,
    rename_rules: Vec<RenameRule>,
    supplementary_extensions: Vec<String>,
    reserved_extension: String,
    optional_duplicate_kinds: Vec<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            variable_prefix: "pygen_variable".to_string(),
            operand_type_prefix: "SPV_OPERAND_TYPE_".to_string(),
            instruction_prefix: "Op".to_string(),
            opcode_symbol_prefix: "SpvOp".to_string(),
            capability_type: "SpvCapability".to_string(),
            capability_symbol_prefix: "SpvCapability".to_string(),
            extension_type: "spvtools::Extension".to_string(),
            extension_symbol_prefix: "spvtools::Extension::k".to_string(),
            ext_inst_name: "ExtInst".to_string(),
            capability_kind: "Capability".to_string(),
            debug_info_kind_prefix: "CLDEBUG100_".to_string(),
            rename_rules: SPIRV_RENAMES
                .iter()
                .map(|(from, to)| RenameRule::new(*from, *to))
                .collect(),
            supplementary_extensions: owned(SPIRV_SUPPLEMENTARY_EXTENSIONS),
            reserved_extension: SPIRV_RESERVED_EXTENSION.to_string(),
            optional_duplicate_kinds: owned(SPIRV_OPTIONAL_DUPLICATES),
        }
    }
}

impl GeneratorConfig {
    pub fn builder() -> GeneratorConfigBuilder {
        GeneratorConfigBuilder::new()
    }

    /// Prefix of every generated variable (capability arrays, enumerant arrays, kind table).
    pub fn variable_prefix(&self) -> &str {
        &self.variable_prefix
    }

    pub fn operand_type_prefix(&self) -> &str {
        &self.operand_type_prefix
    }

    /// Prefix stripped from instruction names before rendering (`OpNop` renders as `Nop`).
    pub fn instruction_prefix(&self) -> &str {
        &self.instruction_prefix
    }

    pub fn opcode_symbol_prefix(&self) -> &str {
        &self.opcode_symbol_prefix
    }

    pub fn capability_type(&self) -> &str {
        &self.capability_type
    }

    pub fn capability_symbol_prefix(&self) -> &str {
        &self.capability_symbol_prefix
    }

    pub fn extension_type(&self) -> &str {
        &self.extension_type
    }

    pub fn extension_symbol_prefix(&self) -> &str {
        &self.extension_symbol_prefix
    }

    /// Rendered name of the extended-instruction-call opcode that needs the trailing
    /// variadic id dropped.
    pub fn ext_inst_name(&self) -> &str {
        &self.ext_inst_name
    }

    /// Value-enumeration kind whose enumerants feed `CapabilityToString`.
    pub fn capability_kind(&self) -> &str {
        &self.capability_kind
    }

    /// Kind prefix applied to the OpenCL.DebugInfo.100 grammar before merging.
    pub fn debug_info_kind_prefix(&self) -> &str {
        &self.debug_info_kind_prefix
    }

    pub fn rename_rules(&self) -> &[RenameRule] {
        &self.rename_rules
    }

    pub fn supplementary_extensions(&self) -> &[String] {
        &self.supplementary_extensions
    }

    pub fn reserved_extension(&self) -> &str {
        &self.reserved_extension
    }

    pub fn optional_duplicate_kinds(&self) -> &[String] {
        &self.optional_duplicate_kinds
    }
}

/// Starts from the SPIR-V defaults and overrides individual entries.
#[derive(Debug, Clone)]
pub struct GeneratorConfigBuilder {
    config: GeneratorConfig,
}

impl GeneratorConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: GeneratorConfig::default(),
        }
    }

    pub fn variable_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.variable_prefix = prefix.into();
        self
    }

    pub fn operand_type_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.operand_type_prefix = prefix.into();
        self
    }

    pub fn instruction_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.instruction_prefix = prefix.into();
        self
    }

    pub fn rename_rules(mut self, rules: impl IntoIterator<Item = RenameRule>) -> Self {
        self.config.rename_rules = rules.into_iter().collect();
        self
    }

    pub fn supplementary_extensions<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.supplementary_extensions = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn reserved_extension(mut self, name: impl Into<String>) -> Self {
        self.config.reserved_extension = name.into();
        self
    }

    pub fn optional_duplicate_kinds<I, S>(mut self, kinds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.optional_duplicate_kinds = kinds.into_iter().map(Into::into).collect();
        self
    }

    pub fn debug_info_kind_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.debug_info_kind_prefix = prefix.into();
        self
    }

    pub fn build(self) -> GeneratorConfig {
        self.config
    }
}

impl Default for GeneratorConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_spirv() {
        let config = GeneratorConfig::default();
        assert_eq!(config.optional_duplicate_kinds().len(), 3);
        assert_eq!(config.rename_rules()[0], RenameRule::new("IdResultType", "TypeId"));
        assert!(
            !config
                .supplementary_extensions()
                .iter()
                .any(|name| name == config.reserved_extension())
        );
    }

    #[test]
    fn builder_overrides_lists() {
        let config = GeneratorConfig::builder()
            .supplementary_extensions(["SPV_TEST_extra"])
            .optional_duplicate_kinds(Vec::<String>::new())
            .build();
        assert_eq!(config.supplementary_extensions(), ["SPV_TEST_extra".to_string()]);
        assert!(config.optional_duplicate_kinds().is_empty());
        assert_eq!(config.variable_prefix(), "pygen_variable");
    }
}
