//! Shared schema types for the stubgen workspace.
//!
//! This crate holds the data model every other crate consumes:
//!
//! - [`affinity`]: which of the three collections (variant A, variant B, common) a
//!   declaration or reference resolves against, plus the namespace tokens used in text
//! - [`type_ref`]: name paths, identities, categories, wrapping modifiers and
//!   [`TypeRef`](type_ref::TypeRef) itself
//! - [`descriptors`]: property, parameter, return, function, struct, enum and class
//!   records for one schema snapshot
//! - [`type_text`]: the order-sensitive wrapping-modifier rules that turn a reference
//!   into annotation text for a given position
//! - [`schema`]: an arena of class descriptors indexed by identity
//! - [`env_utils`]: environment fallbacks for configuration
//!
//! References never own their targets. A reference names its target by
//! `(package, name path)` and the affinity stamped on it decides which collection the
//! name resolves against.

pub mod affinity;
pub mod descriptors;
pub mod env_utils;
pub mod error;
pub mod schema;
pub mod type_ref;
pub mod type_text;

pub use affinity::{Affinity, Namespaces};
pub use descriptors::{
    ClassDef, Declaration, EnumDef, EnumMember, FunctionDef, ParamDef, PropertyDef, RefSite,
    ReturnDef, StructDef,
};
pub use error::{ModelError, ModelErrorKind, ResolutionError};
pub use schema::Schema;
pub use type_ref::{Identity, Modifier, Modifiers, NamePath, ReflectedSymbol, TypeCategory, TypeRef};
pub use type_text::{Position, TypeContext, DEFAULT_TUPLE_LIMIT};

/// Package name used for builtin and constant references.
pub const BUILTIN_PACKAGE: &str = "BUILTIN";
