//! Instruction descriptor tables.
//!
//! The core table (`kOpcodeTableEntries`) carries the full record layout consumed by the
//! assembler/disassembler/validator; extended instruction sets get the shorter
//! `<set>_entries` layout terminated by an explicit `NONE` operand type.

use std::fmt::Write as _;

use super::config::GeneratorConfig;
use super::error::{GrammarError, GrammarResult};
use super::model::Instruction;
use super::operand::OperandKindCanonicalizer;
use super::pool::{ArrayRef, NamePool, PoolKind};
use super::version::VersionWord;

const RESULT_ID_KIND: &str = "IdResult";
const RESULT_TYPE_KIND: &str = "IdResultType";

/// Fully resolved core instruction record.
///
/// Field order mirrors the rendered record and must not change:
/// name, opcode, capabilities, operands, result/type flags, extensions, version bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionDescriptor {
    pub name: String,
    pub opcode: u32,
    pub capability_count: usize,
    pub capabilities: ArrayRef,
    pub operand_types: Vec<String>,
    pub defines_result_id: bool,
    pub references_type_id: bool,
    pub extension_count: usize,
    pub extensions: ArrayRef,
    pub min_version: VersionWord,
    pub max_version: VersionWord,
}

#[derive(Debug, Clone)]
pub struct InstructionTable {
    pub capabilities: NamePool,
    pub extensions: NamePool,
    pub entries: Vec<InstructionDescriptor>,
}

impl InstructionTable {
    pub fn render(&self, config: &GeneratorConfig) -> String {
        let entries = self
            .entries
            .iter()
            .map(|entry| render_instruction(config, entry))
            .collect::<Vec<_>>()
            .join(",\n  ");
        format!(
            "{}\n\n{}\n\nstatic const spv_opcode_desc_t kOpcodeTableEntries[] = {{\n  {entries}\n}};\n",
            self.capabilities.render(config),
            self.extensions.render(config),
        )
    }
}

/// Extended instruction record: name, numeric opcode, capabilities, operand types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtInstDescriptor {
    pub name: String,
    pub opcode: u32,
    pub capability_count: usize,
    pub capabilities: ArrayRef,
    pub operand_types: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ExtInstTable {
    pub set_name: String,
    pub capabilities: NamePool,
    pub entries: Vec<ExtInstDescriptor>,
}

impl ExtInstTable {
    pub fn render(&self, config: &GeneratorConfig) -> String {
        let mut entries = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            entries.push(format!(
                "{{\"{}\", {}, {}, {}, {{{}}}}}",
                entry.name,
                entry.opcode,
                entry.capability_count,
                entry.capabilities,
                entry.operand_types.join(", ")
            ));
        }
        format!(
            "{}\n\nstatic const spv_ext_inst_desc_t {}_entries[] = {{\n  {}\n}};\n",
            self.capabilities.render(config),
            self.set_name,
            entries.join(",\n  ")
        )
    }
}

pub struct InstructionTableBuilder<'a> {
    config: &'a GeneratorConfig,
    canonicalizer: OperandKindCanonicalizer<'a>,
}

impl<'a> InstructionTableBuilder<'a> {
    pub fn new(config: &'a GeneratorConfig) -> Self {
        Self {
            config,
            canonicalizer: OperandKindCanonicalizer::new(config),
        }
    }

    /// Builds the core table sorted by `(opcode, name)`; exact ties keep declaration order.
    pub fn build(&self, instructions: &[Instruction]) -> GrammarResult<InstructionTable> {
        let mut sorted: Vec<&Instruction> = instructions.iter().collect();
        sorted.sort_by(|a, b| (a.opcode, &a.name).cmp(&(b.opcode, &b.name)));

        let capabilities = NamePool::build(
            PoolKind::Capability,
            self.config,
            sorted.iter().map(|inst| inst.capabilities.as_slice()),
        )?;
        let extensions = NamePool::build(
            PoolKind::Extension,
            self.config,
            sorted.iter().map(|inst| inst.extensions.as_slice()),
        )?;

        let entries = sorted
            .into_iter()
            .map(|inst| self.describe(inst, &capabilities, &extensions))
            .collect::<GrammarResult<Vec<_>>>()?;
        tracing::debug!(instructions = entries.len(), "built instruction table");
        Ok(InstructionTable {
            capabilities,
            extensions,
            entries,
        })
    }

    /// Builds an extended instruction set table sorted by opcode.
    pub fn build_extended(
        &self,
        set_name: &str,
        instructions: &[Instruction],
    ) -> GrammarResult<ExtInstTable> {
        let mut sorted: Vec<&Instruction> = instructions.iter().collect();
        sorted.sort_by_key(|inst| inst.opcode);

        let capabilities = NamePool::build(
            PoolKind::Capability,
            self.config,
            sorted.iter().map(|inst| inst.capabilities.as_slice()),
        )?;
        let mut entries = Vec::with_capacity(sorted.len());
        for inst in sorted {
            let mut operand_types: Vec<String> = inst
                .operands
                .iter()
                .map(|operand| self.canonicalizer.canonicalize_operand(operand))
                .collect();
            operand_types.push(format!("{}NONE", self.config.operand_type_prefix()));
            entries.push(ExtInstDescriptor {
                name: inst.name.clone(),
                opcode: inst.opcode,
                capability_count: inst.capabilities.len(),
                capabilities: capabilities.resolve(&inst.capabilities)?,
                operand_types,
            });
        }
        tracing::debug!(set = set_name, instructions = entries.len(), "built extended instruction table");
        Ok(ExtInstTable {
            set_name: set_name.to_string(),
            capabilities,
            entries,
        })
    }

    fn describe(
        &self,
        inst: &Instruction,
        capabilities: &NamePool,
        extensions: &NamePool,
    ) -> GrammarResult<InstructionDescriptor> {
        let name = inst
            .name
            .strip_prefix(self.config.instruction_prefix())
            .filter(|stripped| !stripped.is_empty())
            .ok_or_else(|| {
                GrammarError::malformed(
                    format!("instruction '{}'", inst.name),
                    format!(
                        "core instruction names must start with '{}'",
                        self.config.instruction_prefix()
                    ),
                )
            })?
            .to_string();
        let mut operand_types: Vec<String> = inst
            .operands
            .iter()
            .map(|operand| self.canonicalizer.canonicalize_operand(operand))
            .collect();
        // The runtime handles ExtInst's trailing operands itself.
        if name == self.config.ext_inst_name()
            && operand_types.last() == Some(&self.canonicalizer.variadic_id())
        {
            operand_types.pop();
        }
        Ok(InstructionDescriptor {
            name,
            opcode: inst.opcode,
            capability_count: inst.capabilities.len(),
            capabilities: capabilities.resolve(&inst.capabilities)?,
            operand_types,
            defines_result_id: inst.has_operand_kind(RESULT_ID_KIND),
            references_type_id: inst.has_operand_kind(RESULT_TYPE_KIND),
            extension_count: inst.extensions.len(),
            extensions: extensions.resolve(&inst.extensions)?,
            min_version: VersionWord::minimum(inst.version),
            max_version: VersionWord::maximum(inst.last_version),
        })
    }
}

fn render_instruction(config: &GeneratorConfig, entry: &InstructionDescriptor) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "{{\"{name}\", {opcode_prefix}{name}, {caps_len}, {caps}, {operands_len}, {{{operands}}}, \
         {result}, {type_id}, {exts_len}, {exts}, {min}, {max}}}",
        name = entry.name,
        opcode_prefix = config.opcode_symbol_prefix(),
        caps_len = entry.capability_count,
        caps = entry.capabilities,
        operands_len = entry.operand_types.len(),
        operands = entry.operand_types.join(", "),
        result = u8::from(entry.defines_result_id),
        type_id = u8::from(entry.references_type_id),
        exts_len = entry.extension_count,
        exts = entry.extensions,
        min = entry.min_version,
        max = entry.max_version,
    );
    out
}
