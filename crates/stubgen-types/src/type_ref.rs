//! Type references: a named type usage, its owning package, category and wrapping
//! modifiers.
//!
//! Equality of a [`TypeRef`] is structural and ignores affinity. Two references to the
//! same declaration compare equal whether they were extracted from variant A, variant B
//! or stamped common, which is what lets the reconciler intersect member lists across
//! variants.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::affinity::{Affinity, Namespaces};
use crate::error::ResolutionError;
use crate::BUILTIN_PACKAGE;

/// Reflection class name marking a package boundary in an outer chain.
pub const PACKAGE_CLASS: &str = "Package";

/// Closed set of type categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeCategory {
    Class,
    Struct,
    Enum,
    Function,
    Constant,
    Builtin,
    Other,
}

impl TypeCategory {
    /// Map a reflection class name onto a category.
    pub fn from_reflection_class(class_name: &str) -> Self {
        match class_name {
            "Class" => TypeCategory::Class,
            "ScriptStruct" => TypeCategory::Struct,
            "Enum" => TypeCategory::Enum,
            "Function" => TypeCategory::Function,
            _ => TypeCategory::Other,
        }
    }

    /// Builtins and constants never receive a namespace prefix.
    pub fn is_unprefixed(self) -> bool {
        matches!(self, TypeCategory::Builtin | TypeCategory::Constant)
    }
}

/// Ordered identifiers from the owning declaration down to the member itself,
/// e.g. `[Object, Vector, X]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NamePath(Vec<String>);

impl NamePath {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    pub fn single(name: impl Into<String>) -> Self {
        Self(vec![name.into()])
    }

    /// Path of a member declared directly inside this one.
    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(name.into());
        Self(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// First segment: the outermost declaring class.
    pub fn leading(&self) -> &str {
        self.0.first().map(String::as_str).unwrap_or("")
    }

    /// Last segment: the declaration's own simple name.
    pub fn trailing(&self) -> &str {
        self.0.last().map(String::as_str).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn dotted(&self) -> String {
        self.0.join(".")
    }
}

impl fmt::Display for NamePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dotted())
    }
}

/// Identity of every descriptor: `(package, name path)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Identity {
    pub package: String,
    pub path: NamePath,
}

impl Identity {
    pub fn new(package: impl Into<String>, path: NamePath) -> Self {
        Self {
            package: package.into(),
            path,
        }
    }

    /// Resolve the identity and category of a reflected symbol.
    ///
    /// Walks declaring-container links: package outers set the package (the
    /// outermost one wins), every other outer is prepended to the name path.
    pub fn from_symbol<S: ReflectedSymbol>(
        symbol: &S,
    ) -> Result<(Identity, TypeCategory), ResolutionError> {
        let mut names = vec![symbol.name().to_string()];
        let mut package = None;
        let mut outer = symbol.outer();
        while let Some(container) = outer {
            if container.class_name() == PACKAGE_CLASS {
                package = Some(container.name().to_string());
            } else {
                names.insert(0, container.name().to_string());
            }
            outer = container.outer();
        }

        let package = package.ok_or_else(|| ResolutionError::new(symbol_path(symbol)))?;
        let category = TypeCategory::from_reflection_class(symbol.class_name());
        Ok((Identity::new(package, NamePath(names)), category))
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.package, self.path)
    }
}

/// A raw reflected object with a chain of declaring containers.
///
/// Implemented by whatever the extraction adapter produces; the model only needs
/// names, reflection class names and the outer link.
pub trait ReflectedSymbol {
    fn name(&self) -> &str;
    fn class_name(&self) -> &str;
    fn outer(&self) -> Option<&Self>;
}

fn symbol_path<S: ReflectedSymbol>(symbol: &S) -> String {
    let mut names = vec![symbol.name()];
    let mut outer = symbol.outer();
    while let Some(container) = outer {
        names.insert(0, container.name());
        outer = container.outer();
    }
    names.join(".")
}

/// A composable wrapping modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Modifier {
    /// Homogeneous sequence.
    List,
    /// A type value rather than an instance.
    TypeOf,
    /// Statically sized array of length N.
    FixedSize(u32),
    /// Mutated-by-reference output parameter.
    Out,
    /// Parameter with a default that may be omitted.
    Optional,
    /// Access goes through a get/set indirection.
    AttributeAccessor,
}

impl Modifier {
    pub fn tag(&self) -> String {
        match self {
            Modifier::List => "list".to_string(),
            Modifier::TypeOf => "type-of".to_string(),
            Modifier::FixedSize(n) => format!("fixed-size-{}", n),
            Modifier::Out => "out".to_string(),
            Modifier::Optional => "optional".to_string(),
            Modifier::AttributeAccessor => "attribute-accessor".to_string(),
        }
    }

    pub fn parse_tag(tag: &str) -> Option<Self> {
        match tag {
            "list" => Some(Modifier::List),
            "type-of" => Some(Modifier::TypeOf),
            "out" => Some(Modifier::Out),
            "optional" => Some(Modifier::Optional),
            "attribute-accessor" => Some(Modifier::AttributeAccessor),
            other => other
                .strip_prefix("fixed-size-")
                .and_then(|n| n.parse().ok())
                .map(Modifier::FixedSize),
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag())
    }
}

impl From<Modifier> for String {
    fn from(m: Modifier) -> Self {
        m.tag()
    }
}

impl TryFrom<String> for Modifier {
    type Error = String;

    fn try_from(tag: String) -> Result<Self, Self::Error> {
        Modifier::parse_tag(&tag).ok_or_else(|| format!("unknown modifier tag: {}", tag))
    }
}

/// Ordered set of modifiers. Insertion order is kept and exact duplicates are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Modifiers(SmallVec<[Modifier; 4]>);

impl Modifiers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a modifier; returns false if it was already present.
    pub fn push(&mut self, modifier: Modifier) -> bool {
        if self.0.contains(&modifier) {
            return false;
        }
        self.0.push(modifier);
        true
    }

    pub fn contains(&self, modifier: Modifier) -> bool {
        self.0.contains(&modifier)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Modifier> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_list(&self) -> bool {
        self.contains(Modifier::List)
    }

    pub fn is_type_of(&self) -> bool {
        self.contains(Modifier::TypeOf)
    }

    pub fn is_out(&self) -> bool {
        self.contains(Modifier::Out)
    }

    pub fn is_optional(&self) -> bool {
        self.contains(Modifier::Optional)
    }

    pub fn is_attribute_accessor(&self) -> bool {
        self.contains(Modifier::AttributeAccessor)
    }

    /// All fixed sizes present, in insertion order.
    pub fn fixed_sizes(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().filter_map(|m| match m {
            Modifier::FixedSize(n) => Some(*n),
            _ => None,
        })
    }

    pub fn fixed_size(&self) -> Option<u32> {
        self.fixed_sizes().next()
    }
}

impl FromIterator<Modifier> for Modifiers {
    fn from_iter<I: IntoIterator<Item = Modifier>>(iter: I) -> Self {
        let mut out = Modifiers::new();
        for m in iter {
            out.push(m);
        }
        out
    }
}

/// A named type usage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeRef {
    pub path: NamePath,
    pub package: String,
    pub category: TypeCategory,
    /// Collection this reference resolves against. Rewritten by the reconciler.
    pub affinity: Affinity,
    #[serde(default, skip_serializing_if = "Modifiers::is_empty")]
    pub modifiers: Modifiers,
}

impl TypeRef {
    pub fn new(identity: Identity, category: TypeCategory, affinity: Affinity) -> Self {
        Self {
            path: identity.path,
            package: identity.package,
            category,
            affinity,
            modifiers: Modifiers::new(),
        }
    }

    /// Reference to a reflected symbol, resolving its package through the outer chain.
    pub fn from_symbol<S: ReflectedSymbol>(
        symbol: &S,
        affinity: Affinity,
    ) -> Result<Self, ResolutionError> {
        let (identity, category) = Identity::from_symbol(symbol)?;
        Ok(Self::new(identity, category, affinity))
    }

    /// A builtin scalar such as `int` or `str`. Builtins belong to no variant.
    pub fn builtin(name: &str) -> Self {
        Self::new(
            Identity::new(BUILTIN_PACKAGE, NamePath::single(name)),
            TypeCategory::Builtin,
            Affinity::Common,
        )
    }

    /// A named constant; rendered as its textual type.
    pub fn constant() -> Self {
        Self::new(
            Identity::new(BUILTIN_PACKAGE, NamePath::single("str")),
            TypeCategory::Constant,
            Affinity::Common,
        )
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    pub fn with_affinity(mut self, affinity: Affinity) -> Self {
        self.affinity = affinity;
        self
    }

    pub fn identity(&self) -> Identity {
        Identity::new(self.package.clone(), self.path.clone())
    }

    pub fn name(&self) -> &str {
        self.path.trailing()
    }

    /// Builtins and constants are shared by every collection.
    pub fn is_variant_neutral(&self) -> bool {
        self.category.is_unprefixed()
    }

    /// Render the bare reference name (no modifiers) inside the declaration of
    /// `class_name`.
    ///
    /// A reference whose leading segment is the class being rendered shortens to its
    /// trailing name regardless of affinity. Otherwise the name is qualified with the
    /// namespace of `override_affinity`, falling back to the stamped affinity.
    pub fn render_name(
        &self,
        class_name: &str,
        override_affinity: Option<Affinity>,
        namespaces: &Namespaces,
    ) -> String {
        if self.path.leading() == class_name {
            return self.path.trailing().to_string();
        }
        self.render_qualified(override_affinity, namespaces)
    }

    /// Render the reference fully qualified, never shortened.
    pub fn render_qualified(
        &self,
        override_affinity: Option<Affinity>,
        namespaces: &Namespaces,
    ) -> String {
        let dotted = self.path.dotted();
        if self.category.is_unprefixed() {
            return dotted;
        }
        let affinity = override_affinity.unwrap_or(self.affinity);
        format!("{}.{}", namespaces.token(affinity), dotted)
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
            && self.package == other.package
            && self.category == other.category
            && self.modifiers == other.modifiers
    }
}

impl Eq for TypeRef {}

impl Hash for TypeRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
        self.package.hash(state);
        self.category.hash(state);
        self.modifiers.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Sym {
        name: &'static str,
        class: &'static str,
        outer: Option<Box<Sym>>,
    }

    impl ReflectedSymbol for Sym {
        fn name(&self) -> &str {
            self.name
        }
        fn class_name(&self) -> &str {
            self.class
        }
        fn outer(&self) -> Option<&Self> {
            self.outer.as_deref()
        }
    }

    fn sym(name: &'static str, class: &'static str, outer: Option<Sym>) -> Sym {
        Sym {
            name,
            class,
            outer: outer.map(Box::new),
        }
    }

    fn class_ref(name: &str, affinity: Affinity) -> TypeRef {
        TypeRef::new(
            Identity::new("Core", NamePath::single(name)),
            TypeCategory::Class,
            affinity,
        )
    }

    #[test]
    fn test_equality_ignores_affinity() {
        let a = class_ref("Actor", Affinity::VariantA);
        let b = class_ref("Actor", Affinity::VariantB);
        let c = class_ref("Actor", Affinity::Common);
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn test_equality_requires_path_category_and_modifiers() {
        let base = class_ref("Actor", Affinity::VariantA);
        assert_ne!(base, class_ref("Pawn", Affinity::VariantA));

        let mut as_struct = base.clone();
        as_struct.category = TypeCategory::Struct;
        assert_ne!(base, as_struct);

        assert_ne!(base, base.clone().with_modifier(Modifier::List));
        let list_out = base
            .clone()
            .with_modifier(Modifier::List)
            .with_modifier(Modifier::Out);
        let out_list = base
            .clone()
            .with_modifier(Modifier::Out)
            .with_modifier(Modifier::List);
        assert_ne!(list_out, out_list);
    }

    #[test]
    fn test_from_symbol_walks_outer_chain() {
        let package = sym("Engine", "Package", None);
        let class = sym("Actor", "Class", Some(package));
        let strukt = sym("Vector", "ScriptStruct", Some(class));

        let (identity, category) = Identity::from_symbol(&strukt).unwrap();
        assert_eq!(identity.package, "Engine");
        assert_eq!(identity.path, NamePath::new(["Actor", "Vector"]));
        assert_eq!(category, TypeCategory::Struct);
    }

    #[test]
    fn test_from_symbol_outermost_package_wins() {
        let outer_pkg = sym("Outer", "Package", None);
        let inner_pkg = sym("Inner", "Package", Some(outer_pkg));
        let class = sym("Thing", "Class", Some(inner_pkg));

        let (identity, _) = Identity::from_symbol(&class).unwrap();
        assert_eq!(identity.package, "Outer");
        assert_eq!(identity.path, NamePath::single("Thing"));
    }

    #[test]
    fn test_from_symbol_without_package_fails() {
        let class = sym("Orphan", "Class", None);
        let func = sym("Tick", "Function", Some(class));
        let err = Identity::from_symbol(&func).unwrap_err();
        assert_eq!(err.symbol, "Orphan.Tick");
    }

    #[test]
    fn test_render_name_shortens_same_declaration() {
        let ns = Namespaces::default();
        let nested = TypeRef::new(
            Identity::new("Core", NamePath::new(["Object", "Vector"])),
            TypeCategory::Struct,
            Affinity::Common,
        );
        assert_eq!(nested.render_name("Object", None, &ns), "Vector");
        assert_eq!(nested.render_name("Actor", None, &ns), "common.Object.Vector");
        assert_eq!(
            nested.render_name("Actor", Some(Affinity::VariantB), &ns),
            "game_b.Object.Vector"
        );
    }

    #[test]
    fn test_builtins_never_prefixed() {
        let ns = Namespaces::default();
        assert_eq!(
            TypeRef::builtin("float").render_name("Actor", Some(Affinity::VariantA), &ns),
            "float"
        );
        assert_eq!(TypeRef::constant().render_qualified(None, &ns), "str");
    }

    #[test]
    fn test_modifier_tags() {
        for m in [
            Modifier::List,
            Modifier::TypeOf,
            Modifier::FixedSize(3),
            Modifier::Out,
            Modifier::Optional,
            Modifier::AttributeAccessor,
        ] {
            assert_eq!(Modifier::parse_tag(&m.tag()), Some(m));
        }
        assert_eq!(Modifier::parse_tag("fixed-size-x"), None);
        assert_eq!(Modifier::parse_tag("tuple"), None);
    }

    #[test]
    fn test_modifiers_ignore_duplicates() {
        let mut mods = Modifiers::new();
        assert!(mods.push(Modifier::List));
        assert!(!mods.push(Modifier::List));
        assert!(mods.push(Modifier::Out));
        assert_eq!(mods.len(), 2);
        assert!(mods.is_list() && mods.is_out());
    }

    #[test]
    fn test_type_ref_json_uses_modifier_tags() {
        let r = class_ref("Actor", Affinity::VariantA)
            .with_modifier(Modifier::FixedSize(2))
            .with_modifier(Modifier::Out);
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["modifiers"], serde_json::json!(["fixed-size-2", "out"]));
        let back: TypeRef = serde_json::from_value(json).unwrap();
        assert_eq!(back, r);
        assert_eq!(back.affinity, Affinity::VariantA);
    }
}
