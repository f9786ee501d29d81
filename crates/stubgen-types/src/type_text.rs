//! Wrapping-modifier semantics: turning a reference into annotation text.
//!
//! Rules apply inside out, in this order:
//!
//! 1. `type-of` wraps first (`Type[T]`).
//! 2. Enum references also accept a raw integer (`T | int`).
//! 3. Fixed-size arrays: getters get a literal N-tuple (collapsed to a sized sequence
//!    past the length threshold), inputs get an annotated sized sequence.
//! 4. Lists: inputs accept any `Sequence[T]`, outputs are `List[T]`.
//! 5. `out` annotates the assembled type with `OutParam`.
//! 6. `attribute-accessor` wraps last.
//! 7. With no container modifier, class and function references used as inputs widen
//!    to `T | None`.
//!
//! Combinations outside these rules are a [`ModelErrorKind`], never an approximation.

use crate::affinity::{Affinity, Namespaces};
use crate::error::ModelErrorKind;
use crate::type_ref::{Modifier, TypeCategory, TypeRef};

/// Longest literal tuple expansion before falling back to a sized sequence.
pub const DEFAULT_TUPLE_LIMIT: usize = 120;

/// Where a reference is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    /// Property read.
    Getter,
    /// Property write, also struct factory keywords.
    Setter,
    /// Function parameter.
    Parameter,
    /// Declared function return.
    Return,
    /// An out-parameter surfaced as an extra return value.
    OutValue,
}

impl Position {
    /// Inputs accept anything assignable, outputs describe what the runtime hands back.
    pub fn accepts_input(self) -> bool {
        matches!(self, Position::Setter | Position::Parameter)
    }

    /// Outputs resolve names against the rendering context's affinity.
    pub fn resolves_in_context(self) -> bool {
        matches!(
            self,
            Position::Getter | Position::Return | Position::OutValue
        )
    }

    fn allows_parameter_modifiers(self) -> bool {
        matches!(self, Position::Parameter | Position::OutValue)
    }
}

/// Name-resolution context for one declaration being rendered.
#[derive(Debug, Clone, Copy)]
pub struct TypeContext<'a> {
    /// Simple name of the class currently being rendered.
    pub class_name: &'a str,
    /// Affinity of the collection being rendered.
    pub affinity: Affinity,
    pub namespaces: &'a Namespaces,
    pub tuple_limit: usize,
}

impl<'a> TypeContext<'a> {
    pub fn new(class_name: &'a str, affinity: Affinity, namespaces: &'a Namespaces) -> Self {
        Self {
            class_name,
            affinity,
            namespaces,
            tuple_limit: DEFAULT_TUPLE_LIMIT,
        }
    }

    pub fn with_tuple_limit(mut self, tuple_limit: usize) -> Self {
        self.tuple_limit = tuple_limit;
        self
    }

    /// Full annotation text of `type_ref` used at `position`.
    pub fn type_text(&self, type_ref: &TypeRef, position: Position) -> Result<String, ModelErrorKind> {
        let override_affinity = position.resolves_in_context().then_some(self.affinity);
        let base = type_ref.render_name(self.class_name, override_affinity, self.namespaces);
        wrap_modifiers(base, type_ref, position, self.tuple_limit)
    }

    /// Qualified name with the context's namespace, e.g. a factory's return type.
    pub fn own_qualified(&self, type_ref: &TypeRef) -> String {
        type_ref.render_qualified(Some(self.affinity), self.namespaces)
    }
}

/// Reject category/modifier combinations no rule covers.
pub fn check_combination(type_ref: &TypeRef, position: Position) -> Result<(), ModelErrorKind> {
    let mods = &type_ref.modifiers;
    if type_ref.category == TypeCategory::Other {
        return Err(ModelErrorKind::UncategorizedType);
    }
    if mods.is_type_of() && type_ref.category != TypeCategory::Class {
        return Err(ModelErrorKind::TypeOfNonClass(type_ref.category));
    }
    if mods.is_attribute_accessor() && type_ref.category != TypeCategory::Builtin {
        return Err(ModelErrorKind::AccessorOnNonBuiltin(type_ref.category));
    }
    if mods.fixed_sizes().count() > 1 {
        return Err(ModelErrorKind::ConflictingFixedSizes);
    }
    if let Some(size) = mods.fixed_size() {
        if size == 0 {
            return Err(ModelErrorKind::ZeroSizedArray);
        }
        if mods.is_list() {
            return Err(ModelErrorKind::ListOfFixedArray);
        }
    }
    if !position.allows_parameter_modifiers() {
        for modifier in [Modifier::Out, Modifier::Optional] {
            if mods.contains(modifier) {
                return Err(ModelErrorKind::ParameterOnlyModifier { modifier, position });
            }
        }
    }
    Ok(())
}

/// Apply the modifier rules to an already resolved base name.
pub fn wrap_modifiers(
    base: String,
    type_ref: &TypeRef,
    position: Position,
    tuple_limit: usize,
) -> Result<String, ModelErrorKind> {
    check_combination(type_ref, position)?;
    let mods = &type_ref.modifiers;
    let mut text = base;
    let mut annotations: Vec<String> = Vec::new();

    if mods.is_type_of() {
        text = format!("Type[{}]", text);
    }
    if type_ref.category == TypeCategory::Enum {
        text = format!("{} | int", text);
    }

    match (mods.fixed_size(), mods.is_list()) {
        (Some(size), _) => match position {
            Position::Getter | Position::Return | Position::OutValue => {
                text = if expanded_tuple_len(text.len(), size) > tuple_limit {
                    sized_sequence(&text, size)
                } else {
                    format!("Tuple[{}]", vec![text.as_str(); size as usize].join(", "))
                };
            }
            Position::Setter => text = sized_sequence(&text, size),
            Position::Parameter => {
                text = format!("Sequence[{}]", text);
                annotations.push(size_note(size));
            }
        },
        (None, true) => {
            text = if position.accepts_input() {
                format!("Sequence[{}]", text)
            } else {
                format!("List[{}]", text)
            };
        }
        (None, false) => {
            let nullable = matches!(
                type_ref.category,
                TypeCategory::Class | TypeCategory::Function
            );
            if nullable && position.accepts_input() {
                text = format!("{} | None", text);
            }
        }
    }

    if mods.is_out() && position == Position::Parameter {
        annotations.push("OutParam".to_string());
    }
    if !annotations.is_empty() {
        text = format!("Annotated[{}, {}]", text, annotations.join(", "));
    }
    if mods.is_attribute_accessor() {
        text = format!("Annotated[{}, AttributeProperty]", text);
    }
    Ok(text)
}

fn size_note(size: u32) -> String {
    format!("\"size: {}\"", size)
}

/// Length of `Tuple[e, e, ...]` with `size` copies of an element `element_len` long.
fn expanded_tuple_len(element_len: usize, size: u32) -> usize {
    let size = size as usize;
    "Tuple[]".len() + size.saturating_mul(element_len.saturating_add(2)).saturating_sub(2)
}

fn sized_sequence(element: &str, size: u32) -> String {
    format!("Annotated[Sequence[{}], {}]", element, size_note(size))
}
