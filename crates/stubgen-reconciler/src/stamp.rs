//! Affinity stamping: the second pass of reconciliation.
//!
//! Runs only after the common identity set is final. Every reference in a collection
//! is rewritten to resolve against either the common collection or the collection
//! that owns it.

use std::collections::HashSet;

use stubgen_types::{Affinity, ClassDef, Declaration, Identity, RefSite, TypeCategory, TypeRef};

/// Stamp every reference in `class`, which belongs to the `owner` collection.
///
/// - builtins and constants stay common
/// - in the common collection every reference is common
/// - elsewhere a member reference is common iff its target identity is in `common`
/// - supertypes stay with the owner, so a variant declaration keeps inheriting its
///   variant parent; only self-named supertypes point at the common counterpart
///
/// Variant declarations that have a common counterpart also gain a self-named
/// common supertype, so they inherit the shared declaration.
pub fn stamp_class(class: &mut ClassDef, owner: Affinity, common: &HashSet<Identity>) {
    class.affinity = owner;
    let resolve = |site: RefSite, r: &TypeRef| {
        if owner.is_common() || r.is_variant_neutral() {
            Affinity::Common
        } else if site.is_super() {
            owner
        } else if common.contains(&r.identity()) {
            Affinity::Common
        } else {
            owner
        }
    };
    class.for_each_type_ref_mut(|site, r| r.affinity = resolve(site, r));

    let class_name = class.name().to_string();
    force_self_named_common(&mut class.supers, &class_name);
    for strukt in class.structs.iter_mut() {
        let strukt_name = strukt.name().to_string();
        force_self_named_common(&mut strukt.supers, &strukt_name);
    }

    if owner.is_common() {
        return;
    }
    let class_id = class.identity();
    if common.contains(&class_id) && !class.has_self_named_super() {
        class
            .supers
            .insert(0, TypeRef::new(class_id, TypeCategory::Class, Affinity::Common));
    }
    for strukt in class.structs.iter_mut() {
        let strukt_id = strukt.identity();
        if common.contains(&strukt_id) && !strukt.has_self_named_super() {
            strukt
                .supers
                .insert(0, TypeRef::new(strukt_id, TypeCategory::Struct, Affinity::Common));
        }
    }
}

fn force_self_named_common(supers: &mut [TypeRef], own_name: &str) {
    for sup in supers.iter_mut().filter(|s| s.name() == own_name) {
        sup.affinity = Affinity::Common;
    }
}
