//! Pairwise merging of class descriptors present in both variants.

use std::collections::HashSet;
use std::hash::Hash;

use stubgen_types::{Affinity, ClassDef, Declaration, EnumDef, Identity, StructDef};

use crate::policy::CommonizationPolicy;

/// Outcome of merging one class pair.
#[derive(Debug, Clone)]
pub enum PairOutcome {
    Merged {
        class: ClassDef,
        /// Enum members both variants declare with different values.
        dropped_enum_values: Vec<Identity>,
    },
    /// Supertype lists differ and the policy vetoes the whole class.
    Vetoed,
}

/// Members present in both lists, in the order of `a ++ b` with first occurrence kept.
pub fn ordered_intersection<T>(a: &[T], b: &[T]) -> Vec<T>
where
    T: Clone + Eq + Hash,
{
    let in_a: HashSet<&T> = a.iter().collect();
    let in_b: HashSet<&T> = b.iter().collect();
    let mut seen: HashSet<&T> = HashSet::new();
    let mut out = Vec::new();
    for item in a.iter().chain(b.iter()) {
        if in_a.contains(item) && in_b.contains(item) && seen.insert(item) {
            out.push(item.clone());
        }
    }
    out
}

/// Merge a pair of same-identity classes into a common class.
pub fn merge_class(a: &ClassDef, b: &ClassDef, policy: CommonizationPolicy) -> PairOutcome {
    let supers = if a.supers == b.supers {
        a.supers.clone()
    } else {
        match policy {
            CommonizationPolicy::Veto => return PairOutcome::Vetoed,
            CommonizationPolicy::MemberLevel => ordered_intersection(&a.supers, &b.supers),
        }
    };

    let mut class = ClassDef::new(a.identity(), Affinity::Common);
    class.detached = supers.is_empty() && !(a.supers.is_empty() && b.supers.is_empty());
    class.supers = supers;
    class.properties = ordered_intersection(&a.properties, &b.properties);
    class.functions = ordered_intersection(&a.functions, &b.functions);

    for sa in &a.structs {
        if let Some(sb) = b.find_struct(sa.name()) {
            if sa.supers == sb.supers {
                class.structs.push(merge_struct(sa, sb));
            }
        }
    }

    let mut dropped_enum_values = Vec::new();
    for ea in &a.enums {
        if let Some(eb) = b.find_enum(ea.name()) {
            if ea.supers == eb.supers {
                let (merged, dropped) = merge_enum(ea, eb);
                let owner = ea.identity();
                dropped_enum_values.extend(
                    dropped
                        .into_iter()
                        .map(|name| Identity::new(owner.package.clone(), owner.path.child(name))),
                );
                class.enums.push(merged);
            }
        }
    }

    PairOutcome::Merged {
        class,
        dropped_enum_values,
    }
}

fn merge_struct(a: &StructDef, b: &StructDef) -> StructDef {
    let mut merged = StructDef::new(a.identity());
    merged.supers = a.supers.clone();
    merged.properties = ordered_intersection(&a.properties, &b.properties);
    merged
}

/// Keep names both variants map to the same value. Returns the divergent names too.
fn merge_enum(a: &EnumDef, b: &EnumDef) -> (EnumDef, Vec<String>) {
    let mut merged = EnumDef::new(a.identity());
    merged.supers = a.supers.clone();
    let mut dropped = Vec::new();
    for member in &a.members {
        match b.value_of(&member.name) {
            Some(value) if value == member.value => merged.insert(member.name.clone(), value),
            Some(_) => dropped.push(member.name.clone()),
            None => {}
        }
    }
    (merged, dropped)
}
