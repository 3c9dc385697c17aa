//! Alias reconciliation for enumerants that share a value.
//!
//! Two spellings of the same enumerant (`SubgroupEqMask` / `SubgroupEqMaskKHR`) may list
//! different extensions. Both must end up with the union so lookups by either name agree.

use ahash::AHashMap;

use super::model::{NameTuple, OperandKind};

/// Rewrites every enumerant's extension list to the order-preserving union over all
/// enumerants of the same kind with the same numeric value. Returns how many lists changed.
pub fn merge_aliased_extensions(kinds: &mut [OperandKind]) -> usize {
    let mut rewritten = 0;
    for kind in kinds.iter_mut() {
        let mut unions: AHashMap<u64, NameTuple> = AHashMap::new();
        for enumerant in &kind.enumerants {
            let union = unions.entry(enumerant.value.numeric).or_default();
            for ext in &enumerant.extensions {
                if !union.contains(ext) {
                    union.push(ext.clone());
                }
            }
        }
        for enumerant in &mut kind.enumerants {
            let Some(union) = unions.get(&enumerant.value.numeric) else {
                continue;
            };
            if enumerant.extensions != *union {
                enumerant.extensions = union.clone();
                rewritten += 1;
            }
        }
    }
    if rewritten > 0 {
        tracing::debug!(rewritten, "merged extension lists of aliased enumerants");
    }
    rewritten
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::model::{Enumerant, EnumerantValue, OperandCategory};
    use smallvec::smallvec;

    fn enumerant(name: &str, value: u64, exts: &[&str]) -> Enumerant {
        let mut e = Enumerant::new(name, EnumerantValue::decimal(value));
        e.extensions = exts.iter().map(|ext| ext.to_string()).collect();
        e
    }

    fn kind(enumerants: Vec<Enumerant>) -> OperandKind {
        OperandKind {
            name: "BuiltIn".to_string(),
            category: OperandCategory::ValueEnum,
            enumerants,
        }
    }

    #[test]
    fn aliases_receive_union_in_declaration_order() {
        let mut kinds = vec![kind(vec![
            enumerant("SubgroupEqMask", 7, &["X"]),
            enumerant("Other", 3, &[]),
            enumerant("SubgroupEqMaskKHR", 7, &["Y"]),
        ])];
        let changed = merge_aliased_extensions(&mut kinds);
        assert_eq!(changed, 2);
        let expected: NameTuple = smallvec!["X".to_string(), "Y".to_string()];
        assert_eq!(kinds[0].enumerants[0].extensions, expected);
        assert_eq!(kinds[0].enumerants[2].extensions, expected);
        assert!(kinds[0].enumerants[1].extensions.is_empty());
    }

    #[test]
    fn union_drops_duplicates() {
        let mut kinds = vec![kind(vec![
            enumerant("A", 1, &["X", "Y"]),
            enumerant("B", 1, &["Y", "Z"]),
        ])];
        merge_aliased_extensions(&mut kinds);
        let names: Vec<_> = kinds[0].enumerants[1]
            .extensions
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(names, vec!["X", "Y", "Z"]);
    }

    #[test]
    fn kinds_are_merged_independently() {
        let mut kinds = vec![
            kind(vec![enumerant("A", 1, &["X"])]),
            kind(vec![enumerant("B", 1, &[])]),
        ];
        assert_eq!(merge_aliased_extensions(&mut kinds), 0);
        assert!(kinds[1].enumerants[0].extensions.is_empty());
    }
}
