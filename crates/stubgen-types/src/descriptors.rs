//! Member descriptors for one schema snapshot.
//!
//! These are plain data. Structural equality on every descriptor goes through
//! [`TypeRef`] equality, so it also ignores affinity.

use serde::{Deserialize, Serialize};

use crate::affinity::Affinity;
use crate::error::ModelErrorKind;
use crate::type_ref::{Identity, NamePath, TypeRef};
use crate::type_text::{Position, TypeContext};

/// Sentinel returned in the first tuple slot when a function declares no return value
/// but surfaces out-parameters.
pub const NO_VALUE_SENTINEL: &str = "Ellipsis";

/// Anything identified by `(package, name path)`.
pub trait Declaration {
    fn path(&self) -> &NamePath;
    fn package(&self) -> &str;

    fn identity(&self) -> Identity {
        Identity::new(self.package(), self.path().clone())
    }

    fn name(&self) -> &str {
        self.path().trailing()
    }

    /// `package.Outer.Name`, used where short names collide.
    fn full_name(&self) -> String {
        format!("{}.{}", self.package(), self.path())
    }
}

macro_rules! impl_declaration {
    ($($ty:ty),*) => {
        $(
            impl Declaration for $ty {
                fn path(&self) -> &NamePath {
                    &self.path
                }
                fn package(&self) -> &str {
                    &self.package
                }
            }
        )*
    };
}

impl_declaration!(FunctionDef, StructDef, EnumDef, ClassDef);

/// A property of a class or struct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropertyDef {
    pub name: String,
    pub type_ref: TypeRef,
}

impl PropertyDef {
    pub fn new(name: impl Into<String>, type_ref: TypeRef) -> Self {
        Self {
            name: name.into(),
            type_ref,
        }
    }

    pub fn getter_type(&self, ctx: &TypeContext<'_>) -> Result<String, ModelErrorKind> {
        ctx.type_text(&self.type_ref, Position::Getter)
    }

    pub fn setter_type(&self, ctx: &TypeContext<'_>) -> Result<String, ModelErrorKind> {
        ctx.type_text(&self.type_ref, Position::Setter)
    }

    /// Constants are read-only.
    pub fn is_read_only(&self) -> bool {
        self.type_ref.category == crate::type_ref::TypeCategory::Constant
    }
}

/// A function parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParamDef {
    pub name: String,
    pub type_ref: TypeRef,
}

impl ParamDef {
    pub fn new(name: impl Into<String>, type_ref: TypeRef) -> Self {
        Self {
            name: name.into(),
            type_ref,
        }
    }

    pub fn is_out(&self) -> bool {
        self.type_ref.modifiers.is_out()
    }

    pub fn is_optional(&self) -> bool {
        self.type_ref.modifiers.is_optional()
    }

    pub fn type_text(&self, ctx: &TypeContext<'_>) -> Result<String, ModelErrorKind> {
        ctx.type_text(&self.type_ref, Position::Parameter)
    }

    /// `name: T`, or `name: T = ...` for optional parameters.
    pub fn declaration(&self, ctx: &TypeContext<'_>) -> Result<String, ModelErrorKind> {
        let ty = self.type_text(ctx)?;
        if self.is_optional() {
            Ok(format!("{}: {} = ...", self.name, ty))
        } else {
            Ok(format!("{}: {}", self.name, ty))
        }
    }
}

/// A function's declared return value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReturnDef {
    pub type_ref: TypeRef,
}

impl ReturnDef {
    pub fn new(type_ref: TypeRef) -> Self {
        Self { type_ref }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionDef {
    pub path: NamePath,
    pub package: String,
    #[serde(default)]
    pub params: Vec<ParamDef>,
    /// Absent means the function returns no value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ret: Option<ReturnDef>,
}

impl FunctionDef {
    pub fn new(identity: Identity) -> Self {
        Self {
            path: identity.path,
            package: identity.package,
            params: Vec::new(),
            ret: None,
        }
    }

    pub fn out_params(&self) -> impl Iterator<Item = &ParamDef> {
        self.params.iter().filter(|p| p.is_out())
    }

    /// The shape callers actually receive.
    ///
    /// Out-parameters are folded into the return: with none, this is the declared
    /// return type (or `None`); with some, a tuple of the declared return (or the
    /// no-value sentinel) followed by each out value in parameter order.
    pub fn effective_return(&self, ctx: &TypeContext<'_>) -> Result<String, ModelErrorKind> {
        let declared = match &self.ret {
            Some(ret) => Some(ctx.type_text(&ret.type_ref, Position::Return)?),
            None => None,
        };
        let outs = self
            .out_params()
            .map(|p| ctx.type_text(&p.type_ref, Position::OutValue))
            .collect::<Result<Vec<_>, _>>()?;

        if outs.is_empty() {
            return Ok(declared.unwrap_or_else(|| "None".to_string()));
        }
        let head = declared.unwrap_or_else(|| NO_VALUE_SENTINEL.to_string());
        Ok(format!("Tuple[{}, {}]", head, outs.join(", ")))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructDef {
    pub path: NamePath,
    pub package: String,
    #[serde(default)]
    pub supers: Vec<TypeRef>,
    #[serde(default)]
    pub properties: Vec<PropertyDef>,
}

impl StructDef {
    pub fn new(identity: Identity) -> Self {
        Self {
            path: identity.path,
            package: identity.package,
            supers: Vec::new(),
            properties: Vec::new(),
        }
    }

    /// Supertypes carrying this struct's own name, i.e. its shared counterpart.
    pub fn has_self_named_super(&self) -> bool {
        self.supers.iter().any(|s| s.name() == self.name())
    }
}

/// One enumerator. Values need not be contiguous.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnumMember {
    pub name: String,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumDef {
    pub path: NamePath,
    pub package: String,
    /// Flag-enum composition.
    #[serde(default)]
    pub supers: Vec<TypeRef>,
    /// Insertion-ordered name to value mapping.
    #[serde(default)]
    pub members: Vec<EnumMember>,
}

impl EnumDef {
    pub fn new(identity: Identity) -> Self {
        Self {
            path: identity.path,
            package: identity.package,
            supers: Vec::new(),
            members: Vec::new(),
        }
    }

    pub fn value_of(&self, name: &str) -> Option<i64> {
        self.members.iter().find(|m| m.name == name).map(|m| m.value)
    }

    /// Insert or overwrite, keeping the first insertion position.
    pub fn insert(&mut self, name: impl Into<String>, value: i64) {
        let name = name.into();
        match self.members.iter_mut().find(|m| m.name == name) {
            Some(existing) => existing.value = value,
            None => self.members.push(EnumMember { name, value }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDef {
    pub path: NamePath,
    pub package: String,
    #[serde(default)]
    pub supers: Vec<TypeRef>,
    /// The variants declare supertypes but agree on none of them. Such a class has an
    /// empty supertype list without being the hierarchy root.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub detached: bool,
    /// Collection this declaration belongs to.
    pub affinity: Affinity,
    #[serde(default)]
    pub enums: Vec<EnumDef>,
    #[serde(default)]
    pub structs: Vec<StructDef>,
    #[serde(default)]
    pub properties: Vec<PropertyDef>,
    #[serde(default)]
    pub functions: Vec<FunctionDef>,
}

/// Where a reference sits inside a class declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefSite {
    ClassSuper,
    EnumSuper,
    StructSuper,
    StructProperty,
    Property,
    Parameter,
    Return,
}

impl RefSite {
    /// Supertype positions, as opposed to member types.
    pub fn is_super(self) -> bool {
        matches!(
            self,
            RefSite::ClassSuper | RefSite::EnumSuper | RefSite::StructSuper
        )
    }
}

impl ClassDef {
    pub fn new(identity: Identity, affinity: Affinity) -> Self {
        Self {
            path: identity.path,
            package: identity.package,
            supers: Vec::new(),
            detached: false,
            affinity,
            enums: Vec::new(),
            structs: Vec::new(),
            properties: Vec::new(),
            functions: Vec::new(),
        }
    }

    /// The hierarchy root inherits nothing but self-named supertypes.
    pub fn is_object_root(&self) -> bool {
        !self.detached && self.supers.iter().all(|s| s.name() == self.name())
    }

    /// True when the class declares no member of any kind.
    pub fn is_empty(&self) -> bool {
        self.enums.is_empty()
            && self.structs.is_empty()
            && self.properties.is_empty()
            && self.functions.is_empty()
    }

    pub fn member_count(&self) -> usize {
        self.enums.len() + self.structs.len() + self.properties.len() + self.functions.len()
    }

    pub fn has_self_named_super(&self) -> bool {
        self.supers.iter().any(|s| s.name() == self.name())
    }

    /// Identities other declarations can reference: the class, its nested structs,
    /// enums and functions (delegates reference function signatures).
    pub fn declared_identities(&self) -> Vec<Identity> {
        let mut out = Vec::with_capacity(1 + self.structs.len() + self.enums.len() + self.functions.len());
        out.push(self.identity());
        out.extend(self.structs.iter().map(Declaration::identity));
        out.extend(self.enums.iter().map(Declaration::identity));
        out.extend(self.functions.iter().map(Declaration::identity));
        out
    }

    pub fn find_struct(&self, name: &str) -> Option<&StructDef> {
        self.structs.iter().find(|s| s.name() == name)
    }

    pub fn find_enum(&self, name: &str) -> Option<&EnumDef> {
        self.enums.iter().find(|e| e.name() == name)
    }

    /// Visit every type reference in declaration order.
    pub fn for_each_type_ref(&self, mut f: impl FnMut(RefSite, &TypeRef)) {
        for sup in &self.supers {
            f(RefSite::ClassSuper, sup);
        }
        for e in &self.enums {
            for sup in &e.supers {
                f(RefSite::EnumSuper, sup);
            }
        }
        for s in &self.structs {
            for sup in &s.supers {
                f(RefSite::StructSuper, sup);
            }
            for prop in &s.properties {
                f(RefSite::StructProperty, &prop.type_ref);
            }
        }
        for prop in &self.properties {
            f(RefSite::Property, &prop.type_ref);
        }
        for func in &self.functions {
            for param in &func.params {
                f(RefSite::Parameter, &param.type_ref);
            }
            if let Some(ret) = &func.ret {
                f(RefSite::Return, &ret.type_ref);
            }
        }
    }

    /// Mutable counterpart of [`ClassDef::for_each_type_ref`]; identities must not change.
    pub fn for_each_type_ref_mut(&mut self, mut f: impl FnMut(RefSite, &mut TypeRef)) {
        for sup in &mut self.supers {
            f(RefSite::ClassSuper, sup);
        }
        for e in &mut self.enums {
            for sup in &mut e.supers {
                f(RefSite::EnumSuper, sup);
            }
        }
        for s in &mut self.structs {
            for sup in &mut s.supers {
                f(RefSite::StructSuper, sup);
            }
            for prop in &mut s.properties {
                f(RefSite::StructProperty, &mut prop.type_ref);
            }
        }
        for prop in &mut self.properties {
            f(RefSite::Property, &mut prop.type_ref);
        }
        for func in &mut self.functions {
            for param in &mut func.params {
                f(RefSite::Parameter, &mut param.type_ref);
            }
            if let Some(ret) = &mut func.ret {
                f(RefSite::Return, &mut ret.type_ref);
            }
        }
    }
}
