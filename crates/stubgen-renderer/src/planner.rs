//! First rendering pass: decide the emission order of a class body.
//!
//! Nested structs are ordered so a struct comes after any sibling it inherits from.
//! Structs that inherit a supertype carrying their own name would bind that name to
//! themselves mid-declaration, so they are deferred past the main body. Properties
//! and functions named like the class or a reserved type token are emitted last so
//! they cannot shadow names used by earlier annotations.

use std::collections::HashMap;

use stubgen_types::{ClassDef, Declaration, Identity};

/// Names the stub preamble imports or the checker treats as builtin types.
pub const RESERVED_TYPE_TOKENS: &[&str] = &[
    "int",
    "str",
    "bool",
    "float",
    "dict",
    "Any",
    "Callable",
    "Final",
    "Optional",
    "Type",
    "List",
    "Tuple",
    "Annotated",
    "Literal",
    "Sequence",
    "OutParam",
    "AttributeProperty",
];

/// A class-level member, by index into its [`ClassDef`] list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Member {
    Property(usize),
    Function(usize),
}

/// Emission order for one class body. Every member index appears exactly once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassPlan {
    pub structs: Vec<usize>,
    pub members: Vec<Member>,
    pub deferred_structs: Vec<usize>,
    pub deferred_members: Vec<Member>,
}

impl ClassPlan {
    pub fn build(class: &ClassDef) -> Self {
        let (structs, deferred_structs) = order_structs(class);

        let class_name = class.name();
        let shadows = |name: &str| name == class_name || RESERVED_TYPE_TOKENS.contains(&name);
        let mut members = Vec::new();
        let mut deferred_members = Vec::new();
        for (i, prop) in class.properties.iter().enumerate() {
            if shadows(&prop.name) {
                deferred_members.push(Member::Property(i));
            } else {
                members.push(Member::Property(i));
            }
        }
        for (i, func) in class.functions.iter().enumerate() {
            if shadows(func.name()) {
                deferred_members.push(Member::Function(i));
            } else {
                members.push(Member::Function(i));
            }
        }

        Self {
            structs,
            members,
            deferred_structs,
            deferred_members,
        }
    }
}

/// Stable topological order over sibling-supertype edges.
fn order_structs(class: &ClassDef) -> (Vec<usize>, Vec<usize>) {
    let siblings: HashMap<Identity, usize> = class
        .structs
        .iter()
        .enumerate()
        .map(|(i, s)| (s.identity(), i))
        .collect();

    let mut deferred = Vec::new();
    let mut pending: Vec<(usize, Vec<usize>)> = Vec::new();
    for (i, strukt) in class.structs.iter().enumerate() {
        if strukt.has_self_named_super() {
            deferred.push(i);
            continue;
        }
        let deps = strukt
            .supers
            .iter()
            .filter_map(|sup| siblings.get(&sup.identity()).copied())
            .filter(|&j| j != i)
            .collect();
        pending.push((i, deps));
    }

    // Anything inheriting from a deferred sibling is blocked and deferred after it.
    let mut emitted = vec![false; class.structs.len()];
    let mut ordered = Vec::with_capacity(pending.len());
    while !pending.is_empty() {
        let ready = pending
            .iter()
            .position(|(_, deps)| deps.iter().all(|&d| emitted[d]));
        match ready {
            Some(pos) => {
                let (i, _) = pending.remove(pos);
                emitted[i] = true;
                ordered.push(i);
            }
            None => {
                // Cycle, or blocked on a deferred sibling.
                deferred.extend(pending.drain(..).map(|(i, _)| i));
            }
        }
    }
    (ordered, deferred)
}
