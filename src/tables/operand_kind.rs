//! Per-operand-kind enumerant tables and the operand info table that indexes them.

use std::fmt::Write as _;

use super::config::GeneratorConfig;
use super::error::{GrammarError, GrammarResult};
use super::model::{Enumerant, OperandKind, Quantifier};
use super::operand::OperandKindCanonicalizer;
use super::pool::{ArrayRef, NamePool, PoolKind};
use super::version::VersionWord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumerantDescriptor {
    pub name: String,
    pub value: String,
    pub capability_count: usize,
    pub capabilities: ArrayRef,
    pub extension_count: usize,
    pub extensions: ArrayRef,
    pub parameter_types: Vec<String>,
    pub min_version: VersionWord,
    pub max_version: VersionWord,
}

/// One emitted `<prefix>_<Kind>Entries` array.
#[derive(Debug, Clone)]
pub struct EnumerantArray {
    pub kind: String,
    pub name: String,
    pub entries: Vec<EnumerantDescriptor>,
}

/// One row of the operand info table: `{operand type, element count, array}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindRow {
    pub operand_type: String,
    pub count: usize,
    pub array: String,
}

#[derive(Debug, Clone)]
pub struct OperandKindTable {
    pub capabilities: NamePool,
    pub extensions: NamePool,
    pub arrays: Vec<EnumerantArray>,
    pub rows: Vec<KindRow>,
    table_name: String,
}

impl OperandKindTable {
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn array(&self, name: &str) -> Option<&EnumerantArray> {
        self.arrays.iter().find(|array| array.name == name)
    }

    pub fn render(&self, config: &GeneratorConfig) -> String {
        let mut sections = vec![
            self.capabilities.render(config),
            self.extensions.render(config),
        ];
        for array in &self.arrays {
            let entries = array
                .entries
                .iter()
                .map(|entry| format!("  {}", render_enumerant(entry)))
                .collect::<Vec<_>>()
                .join(",\n");
            sections.push(format!(
                "static const spv_operand_desc_t {}[] = {{\n{entries}\n}};",
                array.name
            ));
        }
        let rows = self
            .rows
            .iter()
            .map(|row| format!("  {{{}, ARRAY_SIZE({}), {}}}", row.operand_type, row.array, row.array))
            .collect::<Vec<_>>()
            .join(",\n");
        sections.push(format!(
            "static const spv_operand_desc_group_t {}[] = {{\n{rows}\n}};",
            self.table_name
        ));
        let mut out = sections.join("\n\n");
        out.push('\n');
        out
    }
}

pub struct OperandKindTableBuilder<'a> {
    config: &'a GeneratorConfig,
    canonicalizer: OperandKindCanonicalizer<'a>,
}

impl<'a> OperandKindTableBuilder<'a> {
    pub fn new(config: &'a GeneratorConfig) -> Self {
        Self {
            config,
            canonicalizer: OperandKindCanonicalizer::new(config),
        }
    }

    /// Tabulates every value/bit enumeration. Aliased enumerants must already have been
    /// merged so the pools see the final extension lists.
    pub fn build(&self, kinds: &[OperandKind]) -> GrammarResult<OperandKindTable> {
        let tabulated: Vec<&OperandKind> = kinds
            .iter()
            .filter(|kind| kind.category.is_tabulated())
            .collect();

        let capabilities = NamePool::build(
            PoolKind::Capability,
            self.config,
            tabulated
                .iter()
                .flat_map(|kind| kind.enumerants.iter())
                .map(|e| e.capabilities.as_slice()),
        )?;
        let extensions = NamePool::build(
            PoolKind::Extension,
            self.config,
            tabulated
                .iter()
                .flat_map(|kind| kind.enumerants.iter())
                .map(|e| e.extensions.as_slice()),
        )?;

        let mut arrays = Vec::with_capacity(tabulated.len());
        let mut rows = Vec::with_capacity(tabulated.len() + self.config.optional_duplicate_kinds().len());
        for kind in &tabulated {
            let array = self.build_array(kind, &capabilities, &extensions)?;
            rows.push(KindRow {
                operand_type: self.canonicalizer.canonicalize(&kind.name, Quantifier::Mandatory),
                count: array.entries.len(),
                array: array.name.clone(),
            });
            arrays.push(array);
        }

        // Kinds used both as mandatory and optional operands get a second row that shares
        // the mandatory row's array.
        let optional = self.config.optional_duplicate_kinds();
        for wanted in optional {
            if !tabulated.iter().any(|kind| &kind.name == wanted) {
                return Err(GrammarError::configuration(format!(
                    "optional operand kind '{wanted}' is not an enumerated operand kind of the grammar"
                )));
            }
        }
        for (kind, array) in tabulated.iter().zip(&arrays) {
            if optional.iter().any(|name| name == &kind.name) {
                rows.push(KindRow {
                    operand_type: self.canonicalizer.canonicalize(&kind.name, Quantifier::Optional),
                    count: array.entries.len(),
                    array: array.name.clone(),
                });
            }
        }

        tracing::debug!(
            kinds = arrays.len(),
            rows = rows.len(),
            "built operand kind table"
        );
        Ok(OperandKindTable {
            capabilities,
            extensions,
            arrays,
            rows,
            table_name: format!("{}_OperandInfoTable", self.config.variable_prefix()),
        })
    }

    fn build_array(
        &self,
        kind: &OperandKind,
        capabilities: &NamePool,
        extensions: &NamePool,
    ) -> GrammarResult<EnumerantArray> {
        // Stable: the first alias declared for a value stays the preferred name.
        let mut sorted: Vec<&Enumerant> = kind.enumerants.iter().collect();
        sorted.sort_by_key(|e| e.value.numeric);

        let entries = sorted
            .into_iter()
            .map(|e| -> GrammarResult<EnumerantDescriptor> {
                Ok(EnumerantDescriptor {
                    name: e.name.clone(),
                    value: e.value.literal.clone(),
                    capability_count: e.capabilities.len(),
                    capabilities: capabilities.resolve(&e.capabilities)?,
                    extension_count: e.extensions.len(),
                    extensions: extensions.resolve(&e.extensions)?,
                    parameter_types: e
                        .parameters
                        .iter()
                        .map(|p| self.canonicalizer.canonicalize(&p.kind, Quantifier::Mandatory))
                        .collect(),
                    min_version: VersionWord::minimum(e.version),
                    max_version: VersionWord::maximum(e.last_version),
                })
            })
            .collect::<GrammarResult<Vec<_>>>()?;
        Ok(EnumerantArray {
            kind: kind.name.clone(),
            name: format!("{}_{}Entries", self.config.variable_prefix(), kind.name),
            entries,
        })
    }
}

fn render_enumerant(entry: &EnumerantDescriptor) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "{{\"{}\", {}, {}, {}, {}, {}, {{{}}}, {}, {}}}",
        entry.name,
        entry.value,
        entry.capability_count,
        entry.capabilities,
        entry.extension_count,
        entry.extensions,
        entry.parameter_types.join(", "),
        entry.min_version,
        entry.max_version,
    );
    out
}
