//! Stub rendering.
//!
//! Turns reconciled class descriptors into `.pyi` declaration text for an external
//! static checker. Rendering is two-pass:
//!
//! - [`planner`] decides the emission order of a class body (nested structs in
//!   inheritance order, self-referential and shadowing declarations deferred)
//! - [`render`] emits the text, resolving every reference against the class being
//!   rendered and the collection's affinity
//!
//! Failures are per member: an unrenderable member is reported with its full name path
//! and the rest of the class still renders.
//!
//! # Example
//!
//! ```ignore
//! use stubgen_renderer::{render_collection, RenderOptions};
//!
//! let rendered = render_collection(&reconciled.variant_a, &RenderOptions::default());
//! for class in &rendered.classes {
//!     println!("{}.pyi\n{}", class.name, class.text);
//! }
//! ```

pub mod collection;
pub mod manifest;
pub mod names;
pub mod planner;
pub mod render;

pub use collection::{render_collection, RenderFailure, RenderReport, RenderedCollection};
pub use manifest::{namespace_init_text, PackageManifest};
pub use render::{RenderOptions, RenderedClass, StubRenderer, DEFAULT_ROOT_TOKEN};

/// Marker generics referenced by every stub's preamble.
pub const TYPE_DEFS_PYI: &str = r#"from typing import Generic, TypeVar

T = TypeVar('T')


class OutParam(Generic[T]):
    """
    Indicates that a parameter is an 'out' parameter.
    """


class AttributeProperty(Generic[T]):
    """
    Indicates that the property is an attribute property.
    """
"#;
