//! Global extension universe and the name/enum mapping functions derived from it.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use ahash::AHashSet;

use super::config::GeneratorConfig;
use super::error::{GrammarError, GrammarResult};
use super::model::Grammar;

/// Sorted, deduplicated extension names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionRegistry {
    names: Vec<String>,
}

impl ExtensionRegistry {
    /// Unions grammar-declared extensions with the supplementary list and the reserved
    /// pseudo-extension. A supplementary name that a grammar already declares means the list
    /// is stale and is reported as [`GrammarError::RegistryCollision`].
    pub fn build(grammar: &Grammar, config: &GeneratorConfig) -> GrammarResult<Self> {
        let declared: AHashSet<&str> = grammar
            .instructions
            .iter()
            .flat_map(|inst| inst.extensions.iter())
            .chain(grammar.enumerants().flat_map(|e| e.extensions.iter()))
            .map(String::as_str)
            .collect();

        if let Some(stale) = config
            .supplementary_extensions()
            .iter()
            .find(|name| declared.contains(name.as_str()))
        {
            return Err(GrammarError::RegistryCollision {
                extension: stale.clone(),
            });
        }

        let mut names: BTreeSet<String> = declared.into_iter().map(str::to_string).collect();
        names.extend(config.supplementary_extensions().iter().cloned());
        names.insert(config.reserved_extension().to_string());
        tracing::debug!(extensions = names.len(), "assembled extension registry");
        Ok(Self {
            names: names.into_iter().collect(),
        })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Same binary search the emitted `GetExtensionFromString` performs.
    pub fn lookup(&self, name: &str) -> Option<usize> {
        self.names
            .binary_search_by(|probe| probe.as_str().cmp(name))
            .ok()
    }

    /// Body of the extension enumeration: one `kName` per line.
    pub fn render_enum(&self) -> String {
        let mut out = self
            .names
            .iter()
            .map(|name| format!("k{name}"))
            .collect::<Vec<_>>()
            .join(",\n");
        out.push('\n');
        out
    }

    pub fn render_to_string(&self) -> String {
        let mut out = String::from("const char* ExtensionToString(Extension extension) {\n");
        out.push_str("  switch (extension) {\n");
        for name in &self.names {
            let _ = write!(
                out,
                "    case Extension::k{name}:\n      return \"{name}\";\n"
            );
        }
        out.push_str("  };\n\n  return \"\";\n}");
        out
    }

    /// The name array must stay sorted: the emitted lookup is an `equal_range` over it.
    pub fn render_from_string(&self) -> String {
        let strs = self
            .names
            .iter()
            .map(|name| format!("\"{name}\""))
            .collect::<Vec<_>>()
            .join(", ");
        let ids = self
            .names
            .iter()
            .map(|name| format!("Extension::k{name}"))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "bool GetExtensionFromString(const char* str, Extension* extension) {{\n\
             \x20 static const char* known_ext_strs[] = {{ {strs} }};\n\
             \x20 static const Extension known_ext_ids[] = {{ {ids} }};\n\
             \x20 const auto b = std::begin(known_ext_strs);\n\
             \x20 const auto e = std::end(known_ext_strs);\n\
             \x20 const auto found = std::equal_range(\n\
             \x20     b, e, str, [](const char* str1, const char* str2) {{\n\
             \x20       return std::strcmp(str1, str2) < 0;\n\
             \x20     }});\n\
             \x20 if (found.first == e || found.first == found.second) return false;\n\
             \n\
             \x20 *extension = known_ext_ids[found.first - b];\n\
             \x20 return true;\n\
             }}"
        )
    }
}

/// Capability names eligible for `CapabilityToString`, one per distinct value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityNames {
    names: Vec<String>,
}

impl CapabilityNames {
    /// Walks the capability kind in declaration order, keeping the first name per value.
    pub fn collect(grammar: &Grammar, config: &GeneratorConfig) -> Self {
        let mut emitted = AHashSet::new();
        let names = grammar
            .operand_kinds
            .iter()
            .filter(|kind| kind.name == config.capability_kind())
            .flat_map(|kind| kind.enumerants.iter())
            .filter(|e| emitted.insert(e.value.numeric))
            .map(|e| e.name.clone())
            .collect::<Vec<_>>();
        if names.is_empty() {
            tracing::warn!(
                kind = config.capability_kind(),
                "grammar declares no capabilities"
            );
        }
        Self { names }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn render_to_string(&self, config: &GeneratorConfig) -> String {
        let prefix = config.capability_symbol_prefix();
        let mut out = format!("const char* CapabilityToString({prefix} capability) {{\n");
        out.push_str("  switch (capability) {\n");
        for name in &self.names {
            let _ = write!(
                out,
                "    case {prefix}{name}:\n      return \"{name}\";\n"
            );
        }
        let _ = write!(
            out,
            "    case {prefix}Max:\n      assert(0 && \"Attempting to convert {prefix}Max to string\");\n      return \"\";\n"
        );
        out.push_str("  };\n\n  return \"\";\n}");
        out
    }
}

/// All three mapping functions, in the order the consumer includes them.
pub fn render_string_mappings(
    registry: &ExtensionRegistry,
    capabilities: &CapabilityNames,
    config: &GeneratorConfig,
) -> String {
    let mut out = [
        registry.render_to_string(),
        registry.render_from_string(),
        capabilities.render_to_string(config),
    ]
    .join("\n\n");
    out.push('\n');
    out
}
