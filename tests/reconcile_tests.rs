//! Reconciliation properties over whole collections.

mod common;

use common::{class, class_ref, dump_a, dump_b, id, prop, struct_ref};
use variant_stubgen::extract::{extract, JsonDumpSource};
use variant_stubgen::reconciler::{reconcile, CommonizationPolicy, ReconcileOptions};
use variant_stubgen::types::{
    Affinity, ClassDef, Declaration, EnumDef, Modifier, Schema, StructDef, TypeRef,
};

fn extracted(dump: serde_json::Value, variant: Affinity) -> Schema {
    let source = JsonDumpSource::from_json(&dump.to_string(), variant).unwrap();
    extract(&source).0
}

fn inputs() -> (Schema, Schema) {
    (
        extracted(dump_a(), Affinity::VariantA),
        extracted(dump_b(), Affinity::VariantB),
    )
}

#[test]
fn test_speed_scenario_shares_foo() {
    let mut foo_a = class("Foo", Affinity::VariantA, &["Base"]);
    foo_a.properties.push(prop("speed", TypeRef::builtin("float")));
    let mut foo_b = class("Foo", Affinity::VariantB, &["Base"]);
    foo_b.properties.push(prop("speed", TypeRef::builtin("float")));

    let (out, report) = reconcile(
        Schema::with_classes(Affinity::VariantA, vec![foo_a]),
        Schema::with_classes(Affinity::VariantB, vec![foo_b]),
        &ReconcileOptions::default(),
    );

    assert_eq!(report.common_classes, 1);
    let common_foo = &out.common.classes()[0];
    assert_eq!(common_foo.name(), "Foo");
    assert_eq!(common_foo.properties, vec![prop("speed", TypeRef::builtin("float"))]);
    for variant in [&out.variant_a, &out.variant_b] {
        let foo = &variant.classes()[0];
        assert_eq!(foo.properties[0].type_ref.affinity, Affinity::Common);
        assert_eq!(foo.supers[0].identity(), id("Engine", &["Foo"]));
        assert_eq!(foo.supers[0].affinity, Affinity::Common);
    }
}

#[test]
fn test_divergent_supers_keep_foo_variant_local() {
    let mut foo_a = class("Foo", Affinity::VariantA, &["BaseA"]);
    foo_a.properties.push(prop("speed", TypeRef::builtin("float")));
    let mut foo_b = class("Foo", Affinity::VariantB, &["BaseB"]);
    foo_b.properties.push(prop("speed", TypeRef::builtin("float")));

    let (out, report) = reconcile(
        Schema::with_classes(Affinity::VariantA, vec![foo_a.clone()]),
        Schema::with_classes(Affinity::VariantB, vec![foo_b.clone()]),
        &ReconcileOptions::default(),
    );

    assert!(out.common.is_empty());
    assert_eq!(report.vetoed_classes, vec![id("Engine", &["Foo"])]);
    assert_eq!(out.variant_a.classes()[0], foo_a);
    assert_eq!(out.variant_a.classes()[0].supers[0].affinity, Affinity::VariantA);
    assert_eq!(out.variant_b.classes()[0].supers[0].affinity, Affinity::VariantB);
}

#[test]
fn test_member_level_policy_shares_members_despite_supers() {
    let mut foo_a = class("Foo", Affinity::VariantA, &["Shared", "BaseA"]);
    foo_a.properties.push(prop("speed", TypeRef::builtin("float")));
    let mut foo_b = class("Foo", Affinity::VariantB, &["Shared", "BaseB"]);
    foo_b.properties.push(prop("speed", TypeRef::builtin("float")));

    let options = ReconcileOptions::default().with_policy(CommonizationPolicy::MemberLevel);
    let (out, report) = reconcile(
        Schema::with_classes(Affinity::VariantA, vec![foo_a]),
        Schema::with_classes(Affinity::VariantB, vec![foo_b]),
        &options,
    );

    assert!(report.vetoed_classes.is_empty());
    let foo = &out.common.classes()[0];
    assert_eq!(foo.supers.len(), 1);
    assert_eq!(foo.supers[0].name(), "Shared");
    assert_eq!(foo.properties.len(), 1);
}

#[test]
fn test_reconcile_is_deterministic() {
    let (a, b) = inputs();
    let (first, first_report) = reconcile(a, b, &ReconcileOptions::default());
    let (a, b) = inputs();
    let (second, second_report) = reconcile(a, b, &ReconcileOptions::default().sequential());

    assert_eq!(first, second);
    assert_eq!(first_report, second_report);
    for affinity in [Affinity::Common, Affinity::VariantA, Affinity::VariantB] {
        assert_eq!(
            serde_json::to_string(first.collection(affinity)).unwrap(),
            serde_json::to_string(second.collection(affinity)).unwrap()
        );
    }
}

fn find<'a>(schema: &'a Schema, package: &str, name: &str) -> &'a ClassDef {
    schema.get(&id(package, &[name])).unwrap()
}

#[test]
fn test_common_is_a_true_intersection() {
    let (a, b) = inputs();
    let (out, _) = reconcile(a.clone(), b.clone(), &ReconcileOptions::default());

    for common in out.common.classes() {
        let in_a = a.get(&common.identity()).unwrap();
        let in_b = b.get(&common.identity()).unwrap();
        for p in &common.properties {
            assert!(in_a.properties.contains(p), "{} missing in a", p.name);
            assert!(in_b.properties.contains(p), "{} missing in b", p.name);
        }
        for f in &common.functions {
            assert!(in_a.functions.contains(f));
            assert!(in_b.functions.contains(f));
        }
        for s in &common.structs {
            let (sa, sb) = (in_a.find_struct(s.name()).unwrap(), in_b.find_struct(s.name()).unwrap());
            assert!(s.properties.iter().all(|p| sa.properties.contains(p) && sb.properties.contains(p)));
        }
    }

    let actor = find(&out.common, "Engine", "Actor");
    let names: Vec<&str> = actor.properties.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Health", "Owner"]);
    assert_eq!(actor.functions[0].name(), "Tick");
    assert_eq!(actor.structs[0].properties.len(), 3);
}

#[test]
fn test_inheritance_veto_on_extracted_schema() {
    let (a, b) = inputs();
    let (out, report) = reconcile(a, b, &ReconcileOptions::default());

    assert_eq!(report.vetoed_classes, vec![id("WillowGame", &["WillowPawn"])]);
    assert!(!out.common.contains(&id("WillowGame", &["WillowPawn"])));
    assert_eq!(report.paired_classes, 4);
    assert_eq!(report.only_in_a, 1);
    assert_eq!(report.only_in_b, 0);
}

#[test]
fn test_enum_value_conflicts_are_dropped() {
    let (a, b) = inputs();
    let (out, report) = reconcile(a, b, &ReconcileOptions::default());

    let role: &EnumDef = &find(&out.common, "Engine", "Actor").enums[0];
    assert_eq!(role.value_of("ROLE_None"), Some(0));
    assert_eq!(role.value_of("ROLE_Authority"), None);
    assert_eq!(role.value_of("ROLE_SimulatedProxy"), None);
    assert_eq!(
        report.dropped_enum_values,
        vec![id("Engine", &["Actor", "ENetRole", "ROLE_Authority"])]
    );
}

#[test]
fn test_dangling_common_members_are_pruned() {
    let (a, b) = inputs();
    let (out, report) = reconcile(a, b, &ReconcileOptions::default());

    let pawn = find(&out.common, "Engine", "Pawn");
    assert!(pawn.properties.iter().all(|p| p.name != "Controller"));
    assert_eq!(report.pruned_members, vec![id("Engine", &["Pawn", "Controller"])]);
    assert!(find(&out.variant_a, "Engine", "Pawn")
        .properties
        .iter()
        .any(|p| p.name == "Controller"));
}

#[test]
fn test_affinity_backfill() {
    let (a, b) = inputs();
    let (out, _) = reconcile(a, b, &ReconcileOptions::default());
    let common_ids = out.common.declared_identities();

    for class in out.common.classes() {
        class.for_each_type_ref(|_, r| assert_eq!(r.affinity, Affinity::Common));
    }
    for (schema, owner) in [
        (&out.variant_a, Affinity::VariantA),
        (&out.variant_b, Affinity::VariantB),
    ] {
        let super_affinity = |sup: &TypeRef, own_name: &str| {
            if sup.name() == own_name {
                Affinity::Common
            } else {
                owner
            }
        };
        for class in schema.classes() {
            for sup in &class.supers {
                assert_eq!(sup.affinity, super_affinity(sup, class.name()));
            }
            for strukt in &class.structs {
                for sup in &strukt.supers {
                    assert_eq!(sup.affinity, super_affinity(sup, strukt.name()));
                }
            }
            class.for_each_type_ref(|site, r| {
                if site.is_super() {
                    return;
                }
                let expected = if r.is_variant_neutral() || common_ids.contains(&r.identity()) {
                    Affinity::Common
                } else {
                    owner
                };
                assert_eq!(r.affinity, expected, "{} in {}", r.identity(), class.identity());
            });
        }
    }

    let controller = find(&out.variant_a, "Engine", "Pawn")
        .properties
        .iter()
        .find(|p| p.name == "Controller")
        .unwrap();
    assert_eq!(controller.type_ref.affinity, Affinity::VariantA);
    let willow = find(&out.variant_a, "WillowGame", "WillowPawn");
    assert_eq!(willow.supers[0].identity(), id("Engine", &["Pawn"]));
    assert_eq!(willow.supers[0].affinity, Affinity::VariantA);
    let actor = find(&out.variant_b, "Engine", "Actor");
    assert_eq!(actor.supers[1].identity(), id("Core", &["Object"]));
    assert_eq!(actor.supers[1].affinity, Affinity::VariantB);
}

#[test]
fn test_subclass_of_vetoed_class_leaves_common() {
    let pawn = |affinity, base| {
        let mut pawn = class("Pawn", affinity, &[base]);
        pawn.properties.push(prop("Speed", TypeRef::builtin("float")));
        pawn
    };
    let willow = |affinity| {
        let mut willow = class("WillowPawn", affinity, &["Pawn"]);
        willow.properties.push(prop("Ammo", TypeRef::builtin("int")));
        willow
    };
    let (out, report) = reconcile(
        Schema::with_classes(
            Affinity::VariantA,
            vec![pawn(Affinity::VariantA, "Actor"), willow(Affinity::VariantA)],
        ),
        Schema::with_classes(
            Affinity::VariantB,
            vec![pawn(Affinity::VariantB, "Object"), willow(Affinity::VariantB)],
        ),
        &ReconcileOptions::default(),
    );

    assert_eq!(report.vetoed_classes, vec![id("Engine", &["Pawn"])]);
    assert_eq!(report.pruned_members, vec![id("Engine", &["WillowPawn"])]);
    assert!(out.common.is_empty());
    for (schema, owner) in [(&out.variant_a, Affinity::VariantA), (&out.variant_b, Affinity::VariantB)] {
        let willow = find(schema, "Engine", "WillowPawn");
        assert_eq!(willow.supers.len(), 1);
        assert_eq!(willow.supers[0].affinity, owner);
    }
}

#[test]
fn test_nested_struct_with_common_counterpart_inherits_it() {
    let vector = |affinity| {
        let mut s = StructDef::new(id("Engine", &["Foo", "Vector"]));
        s.properties.push(prop(
            "X",
            TypeRef::builtin("float").with_modifier(Modifier::FixedSize(2)),
        ));
        let mut foo = class("Foo", affinity, &[]);
        foo.structs.push(s);
        foo.properties
            .push(prop("Origin", struct_ref("Engine", &["Foo", "Vector"], affinity)));
        foo
    };
    let (out, _) = reconcile(
        Schema::with_classes(Affinity::VariantA, vec![vector(Affinity::VariantA)]),
        Schema::with_classes(Affinity::VariantB, vec![vector(Affinity::VariantB)]),
        &ReconcileOptions::default(),
    );

    let foo_a = &out.variant_a.classes()[0];
    assert_eq!(foo_a.structs[0].supers[0].identity(), id("Engine", &["Foo", "Vector"]));
    assert_eq!(foo_a.structs[0].supers[0].affinity, Affinity::Common);
    assert_eq!(foo_a.properties[0].type_ref.affinity, Affinity::Common);
    assert!(out.common.classes()[0].structs[0].supers.is_empty());
}

#[test]
fn test_single_variant_inputs_pass_through() {
    let only_a = class_ref("Engine", "Other", Affinity::VariantA);
    let mut foo = class("Foo", Affinity::VariantA, &[]);
    foo.properties.push(prop("other", only_a));
    let (out, report) = reconcile(
        Schema::with_classes(Affinity::VariantA, vec![foo.clone()]),
        Schema::new(Affinity::VariantB),
        &ReconcileOptions::default(),
    );
    assert!(out.common.is_empty());
    assert!(out.variant_b.is_empty());
    assert_eq!(out.variant_a.classes()[0], foo);
    assert_eq!(report.only_in_a, 1);
}
