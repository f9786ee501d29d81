//! Descriptor builders and raw reflection dumps.
//!
//! The two dumps describe a small engine where the variants agree on most of `Actor`
//! and `Pawn`, disagree on an enum value, and disagree on `WillowPawn`'s supertype:
//!
//! | Declaration | Variant A | Variant B |
//! |---|---|---|
//! | `Core.Object` | `Name` | `Name` |
//! | `Engine.Actor` | `Health`, `bHidden`, `Owner`, `Tick`, `Vector`, `ENetRole` | `Health`, `Shield`, `Owner`, `Tick`, `Vector`, `ENetRole`, unsupported `Broken` |
//! | `Engine.Pawn` | `Controller`, `Speed` | `Controller`, `Speed` |
//! | `Engine.Controller` | yes | no |
//! | `WillowGame.WillowPawn` | extends `Pawn` | extends `Actor` |

use std::path::{Path, PathBuf};

use serde_json::{json, Value};
use variant_stubgen::types::{
    Affinity, ClassDef, Identity, NamePath, PropertyDef, TypeCategory, TypeRef,
};

pub fn id(package: &str, path: &[&str]) -> Identity {
    Identity::new(package, NamePath::new(path.iter().copied()))
}

pub fn class_ref(package: &str, name: &str, affinity: Affinity) -> TypeRef {
    TypeRef::new(id(package, &[name]), TypeCategory::Class, affinity)
}

pub fn struct_ref(package: &str, path: &[&str], affinity: Affinity) -> TypeRef {
    TypeRef::new(id(package, path), TypeCategory::Struct, affinity)
}

pub fn prop(name: &str, type_ref: TypeRef) -> PropertyDef {
    PropertyDef::new(name, type_ref)
}

/// A class in `Engine` with the given supertypes, all tagged `affinity`.
pub fn class(name: &str, affinity: Affinity, supers: &[&str]) -> ClassDef {
    let mut class = ClassDef::new(id("Engine", &[name]), affinity);
    class.supers = supers
        .iter()
        .map(|s| class_ref("Engine", s, affinity))
        .collect();
    class
}

fn package(name: &str) -> Value {
    json!([{ "name": name, "class": "Package" }])
}

fn class_symbol(package_name: &str, name: &str) -> Value {
    json!({ "name": name, "class": "Class", "outers": package(package_name) })
}

fn scalar(name: &str, class: &str) -> Value {
    json!({ "name": name, "class": class })
}

fn object(name: &str, package_name: &str, target: &str) -> Value {
    json!({
        "name": name,
        "class": "ObjectProperty",
        "property_class": class_symbol(package_name, target),
    })
}

fn vector() -> Value {
    json!({
        "name": "Vector",
        "class": "ScriptStruct",
        "children": [
            scalar("X", "FloatProperty"),
            scalar("Y", "FloatProperty"),
            scalar("Z", "FloatProperty"),
        ],
    })
}

fn tick() -> Value {
    json!({
        "name": "Tick",
        "class": "Function",
        "children": [
            { "name": "DeltaTime", "class": "FloatProperty", "flags": 0x80 },
        ],
    })
}

fn object_class() -> Value {
    json!({
        "name": "Object",
        "outers": package("Core"),
        "children": [scalar("Name", "NameProperty")],
    })
}

pub fn dump_a() -> Value {
    json!({
        "variant": "variant_a",
        "classes": [
            object_class(),
            {
                "name": "Actor",
                "outers": package("Engine"),
                "super": class_symbol("Core", "Object"),
                "children": [
                    scalar("Health", "IntProperty"),
                    scalar("bHidden", "BoolProperty"),
                    vector(),
                    {
                        "name": "ENetRole",
                        "class": "Enum",
                        "names": ["ROLE_None", "ROLE_Authority", "None"],
                    },
                    tick(),
                    object("Owner", "Engine", "Actor"),
                    scalar("Auto", "State"),
                ],
            },
            {
                "name": "Pawn",
                "outers": package("Engine"),
                "super": class_symbol("Engine", "Actor"),
                "children": [
                    object("Controller", "Engine", "Controller"),
                    scalar("Speed", "FloatProperty"),
                ],
            },
            {
                "name": "Controller",
                "outers": package("Engine"),
                "super": class_symbol("Engine", "Actor"),
                "children": [object("Pawn", "Engine", "Pawn")],
            },
            {
                "name": "WillowPawn",
                "outers": package("WillowGame"),
                "super": class_symbol("Engine", "Pawn"),
                "children": [
                    { "name": "Ammo", "class": "IntProperty", "array_dim": 3 },
                ],
            },
        ],
    })
}

pub fn dump_b() -> Value {
    json!({
        "variant": "variant_b",
        "classes": [
            object_class(),
            {
                "name": "Actor",
                "outers": package("Engine"),
                "super": class_symbol("Core", "Object"),
                "children": [
                    scalar("Health", "IntProperty"),
                    scalar("Shield", "FloatProperty"),
                    vector(),
                    {
                        "name": "ENetRole",
                        "class": "Enum",
                        "names": ["ROLE_None", "ROLE_SimulatedProxy", "ROLE_Authority", "None"],
                    },
                    tick(),
                    object("Owner", "Engine", "Actor"),
                    scalar("Broken", "QwordProperty"),
                ],
            },
            {
                "name": "Pawn",
                "outers": package("Engine"),
                "super": class_symbol("Engine", "Actor"),
                "children": [
                    object("Controller", "Engine", "Controller"),
                    scalar("Speed", "FloatProperty"),
                ],
            },
            {
                "name": "WillowPawn",
                "outers": package("WillowGame"),
                "super": class_symbol("Engine", "Actor"),
                "children": [
                    { "name": "Ammo", "class": "IntProperty", "array_dim": 3 },
                ],
            },
        ],
    })
}

pub fn write_dump(dir: &Path, file_name: &str, dump: &Value) -> PathBuf {
    let path = dir.join(file_name);
    std::fs::write(&path, serde_json::to_string_pretty(dump).unwrap()).unwrap();
    path
}

/// Write both dumps into `dir`, returning `(a, b)` paths.
pub fn write_dumps(dir: &Path) -> (PathBuf, PathBuf) {
    (
        write_dump(dir, "variant_a_dump.json", &dump_a()),
        write_dump(dir, "variant_b_dump.json", &dump_b()),
    )
}
