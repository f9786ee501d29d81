//! Domain errors raised by the data model.

use std::fmt;

use crate::type_ref::{Identity, Modifier, TypeCategory};
use crate::type_text::Position;

/// A reflected symbol whose outer chain never reaches a package boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionError {
    /// Dotted path of the symbol as far as it could be walked.
    pub symbol: String,
}

impl ResolutionError {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
        }
    }
}

impl fmt::Display for ResolutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "could not find an owning package for {}", self.symbol)
    }
}

impl std::error::Error for ResolutionError {}

/// Why a category/modifier combination has no rendering rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelErrorKind {
    /// Reference to a reflected object of no known category.
    UncategorizedType,
    /// `type-of` applied to something that is not a class.
    TypeOfNonClass(TypeCategory),
    /// `attribute-accessor` applied to something that is not a builtin scalar.
    AccessorOnNonBuiltin(TypeCategory),
    /// `out` or `optional` outside a parameter.
    ParameterOnlyModifier {
        modifier: Modifier,
        position: Position,
    },
    ZeroSizedArray,
    ListOfFixedArray,
    ConflictingFixedSizes,
}

impl ModelErrorKind {
    /// Attach the name path of the member being rendered.
    pub fn at(self, member: Identity) -> ModelError {
        ModelError { member, kind: self }
    }
}

impl fmt::Display for ModelErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelErrorKind::UncategorizedType => write!(f, "reference has no known category"),
            ModelErrorKind::TypeOfNonClass(cat) => {
                write!(f, "type-of modifier on a {:?} reference", cat)
            }
            ModelErrorKind::AccessorOnNonBuiltin(cat) => {
                write!(f, "attribute-accessor modifier on a {:?} reference", cat)
            }
            ModelErrorKind::ParameterOnlyModifier { modifier, position } => {
                write!(f, "{} modifier in {:?} position", modifier, position)
            }
            ModelErrorKind::ZeroSizedArray => write!(f, "fixed-size array of length 0"),
            ModelErrorKind::ListOfFixedArray => {
                write!(f, "list modifier combined with a fixed-size array")
            }
            ModelErrorKind::ConflictingFixedSizes => {
                write!(f, "more than one fixed-size modifier")
            }
        }
    }
}

/// A member that cannot be rendered, with its full name path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelError {
    pub member: Identity,
    pub kind: ModelErrorKind,
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot render {}: {}", self.member, self.kind)
    }
}

impl std::error::Error for ModelError {}
