//! Reference closure of the common collection.
//!
//! A common member may only reference declarations that are themselves common, or
//! that neither variant declares (external or builtin types). The same holds for
//! supertypes: a common class or struct whose parent stayed variant-specific is
//! removed whole. Removals orphan further references (a delegate property typed by a
//! removed function, a subclass of a removed class), so pruning runs to a fixpoint.

use std::collections::{BTreeSet, HashSet};

use stubgen_types::{ClassDef, Declaration, FunctionDef, Identity, TypeRef};
use tracing::debug;

/// Identities declared by a set of classes.
pub fn common_identities(classes: &[ClassDef]) -> HashSet<Identity> {
    classes.iter().flat_map(ClassDef::declared_identities).collect()
}

/// Remove common declarations and members whose references dangle. Returns the
/// removed identities in removal order.
pub fn prune_dangling(classes: &mut Vec<ClassDef>, known: &BTreeSet<Identity>) -> Vec<Identity> {
    let mut pruned = Vec::new();
    loop {
        let common = common_identities(classes);
        let dangling = |r: &TypeRef| {
            if r.is_variant_neutral() {
                return false;
            }
            let target = r.identity();
            known.contains(&target) && !common.contains(&target)
        };

        let mut removed = Vec::new();
        classes.retain(|class| {
            let keep = !class.supers.iter().any(&dangling);
            if !keep {
                removed.push(class.identity());
            }
            keep
        });

        for class in classes.iter_mut() {
            let owner = class.identity();

            class.structs.retain(|strukt| {
                let keep = !strukt.supers.iter().any(&dangling);
                if !keep {
                    removed.push(strukt.identity());
                }
                keep
            });

            for strukt in class.structs.iter_mut() {
                let strukt_id = strukt.identity();
                strukt.properties.retain(|p| {
                    let keep = !dangling(&p.type_ref);
                    if !keep {
                        removed.push(member_identity(&strukt_id, &p.name));
                    }
                    keep
                });
            }

            class.properties.retain(|p| {
                let keep = !dangling(&p.type_ref);
                if !keep {
                    removed.push(member_identity(&owner, &p.name));
                }
                keep
            });

            class.functions.retain(|f| {
                let keep = !function_dangles(f, &dangling);
                if !keep {
                    removed.push(f.identity());
                }
                keep
            });
        }

        if removed.is_empty() {
            break;
        }
        debug!(count = removed.len(), "pruned common declarations with dangling references");
        pruned.extend(removed);
    }
    pruned
}

fn function_dangles(func: &FunctionDef, dangling: &impl Fn(&TypeRef) -> bool) -> bool {
    func.params.iter().any(|p| dangling(&p.type_ref))
        || func.ret.as_ref().is_some_and(|r| dangling(&r.type_ref))
}

fn member_identity(owner: &Identity, name: &str) -> Identity {
    Identity::new(owner.package.clone(), owner.path.child(name))
}
