//! Deduplicated, named capability and extension arrays.
//!
//! Descriptors never embed their requirement lists; they reference a shared array through
//! [`ArrayRef`]. Tuples compare by exact order, so `(A, B)` and `(B, A)` are distinct arrays.

use std::fmt::{self, Write as _};

use ahash::AHashMap;

use super::config::GeneratorConfig;
use super::error::{GrammarError, GrammarResult};
use super::model::NameTuple;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoolKind {
    Capability,
    Extension,
}

impl PoolKind {
    fn tag(self) -> &'static str {
        match self {
            PoolKind::Capability => "caps",
            PoolKind::Extension => "exts",
        }
    }
}

/// Reference from a descriptor to a pooled array.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArrayRef {
    /// The empty tuple; rendered as a null pointer, never as a zero-length array.
    Absent,
    Named(String),
}

impl ArrayRef {
    pub fn name(&self) -> Option<&str> {
        match self {
            ArrayRef::Absent => None,
            ArrayRef::Named(name) => Some(name),
        }
    }
}

impl fmt::Display for ArrayRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArrayRef::Absent => f.write_str("nullptr"),
            ArrayRef::Named(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedArray {
    pub name: String,
    pub members: NameTuple,
}

#[derive(Debug, Clone)]
pub struct NamePool {
    kind: PoolKind,
    arrays: Vec<NamedArray>,
    lookup: AHashMap<NameTuple, usize>,
}

impl NamePool {
    /// Collects every distinct non-empty tuple, sorted lexicographically, and names each one.
    pub fn build<'t, I>(kind: PoolKind, config: &GeneratorConfig, tuples: I) -> GrammarResult<Self>
    where
        I: IntoIterator<Item = &'t [String]>,
    {
        let mut distinct: Vec<NameTuple> = tuples
            .into_iter()
            .filter(|tuple| !tuple.is_empty())
            .map(|tuple| tuple.iter().cloned().collect())
            .collect();
        distinct.sort();
        distinct.dedup();

        let mut arrays = Vec::with_capacity(distinct.len());
        let mut lookup = AHashMap::with_capacity(distinct.len());
        let mut by_name: AHashMap<String, usize> = AHashMap::with_capacity(distinct.len());
        for members in distinct {
            let name = format!("{}_{}_{}", config.variable_prefix(), kind.tag(), members.concat());
            if let Some(&existing) = by_name.get(&name) {
                let other: &NamedArray = &arrays[existing];
                return Err(GrammarError::malformed(
                    format!("{} pool", kind.tag()),
                    format!(
                        "tuples {:?} and {:?} would share the array name '{name}'",
                        other.members.as_slice(),
                        members.as_slice()
                    ),
                ));
            }
            by_name.insert(name.clone(), arrays.len());
            lookup.insert(members.clone(), arrays.len());
            arrays.push(NamedArray { name, members });
        }
        tracing::debug!(pool = kind.tag(), arrays = arrays.len(), "built name pool");
        Ok(Self {
            kind,
            arrays,
            lookup,
        })
    }

    pub fn kind(&self) -> PoolKind {
        self.kind
    }

    pub fn arrays(&self) -> &[NamedArray] {
        &self.arrays
    }

    /// Maps a tuple to its array. Empty tuples resolve to [`ArrayRef::Absent`].
    pub fn resolve(&self, names: &[String]) -> GrammarResult<ArrayRef> {
        if names.is_empty() {
            return Ok(ArrayRef::Absent);
        }
        match self.lookup.get(names) {
            Some(&index) => Ok(ArrayRef::Named(self.arrays[index].name.clone())),
            None => Err(GrammarError::malformed(
                format!("{} pool", self.kind.tag()),
                format!("tuple {names:?} was not collected before rendering"),
            )),
        }
    }

    /// Emits one static array declaration per pooled tuple.
    pub fn render(&self, config: &GeneratorConfig) -> String {
        let (element_type, symbol_prefix) = match self.kind {
            PoolKind::Capability => (config.capability_type(), config.capability_symbol_prefix()),
            PoolKind::Extension => (config.extension_type(), config.extension_symbol_prefix()),
        };
        let mut out = String::new();
        for (index, array) in self.arrays.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            let members = array
                .members
                .iter()
                .map(|member| format!("{symbol_prefix}{member}"))
                .collect::<Vec<_>>()
                .join(", ");
            let _ = write!(
                out,
                "static const {element_type} {}[] = {{{members}}};",
                array.name
            );
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tuple(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    fn pool(tuples: &[Vec<String>]) -> NamePool {
        let config = GeneratorConfig::default();
        NamePool::build(
            PoolKind::Capability,
            &config,
            tuples.iter().map(|t| t.as_slice()),
        )
        .expect("pool builds")
    }

    #[test]
    fn identical_tuples_share_one_array() {
        let first = tuple(&["Shader", "Kernel"]);
        let second = tuple(&["Shader", "Kernel"]);
        let pool = pool(&[first.clone(), second.clone()]);
        assert_eq!(pool.arrays().len(), 1);
        assert_eq!(
            pool.resolve(&first).unwrap(),
            pool.resolve(&second).unwrap()
        );
        assert_eq!(
            pool.resolve(&first).unwrap(),
            ArrayRef::Named("pygen_variable_caps_ShaderKernel".to_string())
        );
    }

    #[test]
    fn reordered_tuples_stay_distinct() {
        let ab = tuple(&["A", "B"]);
        let ba = tuple(&["B", "A"]);
        let pool = pool(&[ab.clone(), ba.clone()]);
        assert_eq!(pool.arrays().len(), 2);
        assert_ne!(pool.resolve(&ab).unwrap(), pool.resolve(&ba).unwrap());
    }

    #[test]
    fn empty_tuples_are_absent_not_arrays() {
        let pool = pool(&[Vec::new(), tuple(&["Shader"])]);
        assert_eq!(pool.arrays().len(), 1);
        assert_eq!(pool.resolve(&[]).unwrap(), ArrayRef::Absent);
        assert_eq!(ArrayRef::Absent.to_string(), "nullptr");
    }

    #[test]
    fn arrays_are_emitted_in_lexicographic_order() {
        let pool = pool(&[tuple(&["Shader"]), tuple(&["Kernel", "Addresses"]), tuple(&["Kernel"])]);
        let names: Vec<_> = pool.arrays().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "pygen_variable_caps_Kernel",
                "pygen_variable_caps_KernelAddresses",
                "pygen_variable_caps_Shader",
            ]
        );
    }

    #[test]
    fn renders_symbolic_members() {
        let config = GeneratorConfig::default();
        let exts = [tuple(&["SPV_KHR_a", "SPV_KHR_b"])];
        let pool = NamePool::build(PoolKind::Extension, &config, exts.iter().map(|t| t.as_slice()))
            .expect("pool builds");
        assert_eq!(
            pool.render(&config),
            "static const spvtools::Extension pygen_variable_exts_SPV_KHR_aSPV_KHR_b[] = \
             {spvtools::Extension::kSPV_KHR_a, spvtools::Extension::kSPV_KHR_b};"
        );
    }

    #[test]
    fn unseen_tuple_is_an_error() {
        let pool = pool(&[tuple(&["Shader"])]);
        assert!(pool.resolve(&tuple(&["Kernel"])).is_err());
    }

    #[test]
    fn concatenation_clash_is_rejected() {
        let config = GeneratorConfig::default();
        let tuples = [tuple(&["AB", "C"]), tuple(&["A", "BC"])];
        let err = NamePool::build(PoolKind::Capability, &config, tuples.iter().map(|t| t.as_slice()))
            .expect_err("names collide");
        assert!(matches!(err, GrammarError::Malformed { .. }));
    }
}
