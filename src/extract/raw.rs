//! Raw reflection records as produced by a live walk of one variant.
//!
//! The records mirror the engine's field linked lists: a class owns an ordered list of
//! [`RawField`]s, and the field's reflection class name decides whether it is a nested
//! struct, an enum, a function or a property.

use serde::{Deserialize, Serialize};

use stubgen_types::ReflectedSymbol;

use super::ExtractError;

pub const CPF_OPTIONAL_PARM: u64 = 0x10;
pub const CPF_PARM: u64 = 0x80;
pub const CPF_OUT_PARM: u64 = 0x100;
pub const CPF_RETURN_PARM: u64 = 0x400;

/// Enum member name terminating the value list.
pub const ENUM_SENTINEL: &str = "None";

/// Field classes skipped while walking a class body.
pub const IGNORED_FIELD_CLASSES: &[&str] = &["State"];

/// One link of a symbol's declaring-container chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawOuter {
    pub name: String,
    pub class: String,
}

/// A reflected object plus its declaring containers.
///
/// On the wire the containers are a flat `outers` list, innermost first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SymbolRecord", into = "SymbolRecord")]
pub struct RawSymbol {
    pub name: String,
    pub class: String,
    pub outer: Option<Box<RawSymbol>>,
}

#[derive(Serialize, Deserialize)]
struct SymbolRecord {
    name: String,
    class: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    outers: Vec<RawOuter>,
}

impl RawSymbol {
    pub fn new(name: impl Into<String>, class: impl Into<String>, outers: Vec<RawOuter>) -> Self {
        let outer = outers.into_iter().rev().fold(None, |chain, o| {
            Some(Box::new(RawSymbol {
                name: o.name,
                class: o.class,
                outer: chain,
            }))
        });
        Self {
            name: name.into(),
            class: class.into(),
            outer,
        }
    }

    /// Containers from the innermost outward.
    pub fn outers(&self) -> Vec<RawOuter> {
        let mut outers = Vec::new();
        let mut next = self.outer.as_deref();
        while let Some(o) = next {
            outers.push(RawOuter {
                name: o.name.clone(),
                class: o.class.clone(),
            });
            next = o.outer.as_deref();
        }
        outers
    }
}

impl From<SymbolRecord> for RawSymbol {
    fn from(record: SymbolRecord) -> Self {
        RawSymbol::new(record.name, record.class, record.outers)
    }
}

impl From<RawSymbol> for SymbolRecord {
    fn from(symbol: RawSymbol) -> Self {
        let outers = symbol.outers();
        SymbolRecord {
            name: symbol.name,
            class: symbol.class,
            outers,
        }
    }
}

impl ReflectedSymbol for RawSymbol {
    fn name(&self) -> &str {
        &self.name
    }

    fn class_name(&self) -> &str {
        &self.class
    }

    fn outer(&self) -> Option<&Self> {
        self.outer.as_deref()
    }
}

/// One child field of a class, struct or function.
///
/// Only the attributes relevant to `class` are populated; the rest stay at their
/// defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawField {
    pub name: String,
    pub class: String,
    #[serde(default = "default_array_dim")]
    pub array_dim: u32,
    #[serde(default)]
    pub flags: u64,
    /// Enum of a byte property.
    #[serde(default, rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_type: Option<RawSymbol>,
    /// Struct of a struct property.
    #[serde(default, rename = "struct", skip_serializing_if = "Option::is_none")]
    pub struct_type: Option<RawSymbol>,
    /// Class of an object or component property.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_class: Option<RawSymbol>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface_class: Option<RawSymbol>,
    /// Class described by a class property.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_class: Option<RawSymbol>,
    /// Signature function of a delegate property.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<RawSymbol>,
    /// Element property of an array property.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inner: Option<Box<RawField>>,
    /// Super struct of a nested struct.
    #[serde(default, rename = "super", skip_serializing_if = "Option::is_none")]
    pub super_field: Option<RawSymbol>,
    /// Properties of a nested struct, parameters of a function.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RawField>,
    /// Member names of an enum, in ordinal order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub names: Vec<String>,
}

fn default_array_dim() -> u32 {
    1
}

impl RawField {
    pub fn is_parm(&self) -> bool {
        self.flags & CPF_PARM != 0
    }

    pub fn is_return(&self) -> bool {
        self.flags & CPF_RETURN_PARM != 0
    }

    pub fn is_out(&self) -> bool {
        self.flags & CPF_OUT_PARM != 0
    }

    pub fn is_optional(&self) -> bool {
        self.flags & CPF_OPTIONAL_PARM != 0
    }

    /// Interpret this field as a property.
    pub fn as_property(&self) -> Result<RawProperty<'_>, ExtractError> {
        Ok(RawProperty {
            name: &self.name,
            kind: PropertyKind::of(self)?,
            array_dim: self.array_dim,
            flags: self.flags,
        })
    }

    fn target<'a>(
        &'a self,
        slot: &'a Option<RawSymbol>,
        attribute: &'static str,
    ) -> Result<&'a RawSymbol, ExtractError> {
        slot.as_ref().ok_or_else(|| ExtractError::MissingTarget {
            field: self.name.clone(),
            class: self.class.clone(),
            attribute,
        })
    }
}

/// The property view of a [`RawField`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawProperty<'a> {
    pub name: &'a str,
    pub kind: PropertyKind<'a>,
    pub array_dim: u32,
    pub flags: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyKind<'a> {
    Bool,
    Byte(Option<&'a RawSymbol>),
    Int,
    Float,
    Name,
    Str,
    Map,
    Array(&'a RawField),
    Struct(&'a RawSymbol),
    Object(&'a RawSymbol),
    Component(&'a RawSymbol),
    Interface(&'a RawSymbol),
    Class(&'a RawSymbol),
    Delegate(&'a RawSymbol),
    Const,
    FloatAttribute,
    IntAttribute,
    ByteAttribute,
    Unknown(&'a str),
}

impl<'a> PropertyKind<'a> {
    fn of(field: &'a RawField) -> Result<Self, ExtractError> {
        let kind = match field.class.as_str() {
            "BoolProperty" => PropertyKind::Bool,
            "ByteProperty" => PropertyKind::Byte(field.enum_type.as_ref()),
            "IntProperty" => PropertyKind::Int,
            "FloatProperty" => PropertyKind::Float,
            "NameProperty" => PropertyKind::Name,
            "StrProperty" => PropertyKind::Str,
            "MapProperty" => PropertyKind::Map,
            "ArrayProperty" => match field.inner.as_deref() {
                Some(inner) => PropertyKind::Array(inner),
                None => {
                    return Err(ExtractError::MissingTarget {
                        field: field.name.clone(),
                        class: field.class.clone(),
                        attribute: "inner",
                    })
                }
            },
            "StructProperty" => PropertyKind::Struct(field.target(&field.struct_type, "struct")?),
            "ObjectProperty" => {
                PropertyKind::Object(field.target(&field.property_class, "property_class")?)
            }
            "ComponentProperty" => {
                PropertyKind::Component(field.target(&field.property_class, "property_class")?)
            }
            "InterfaceProperty" => {
                PropertyKind::Interface(field.target(&field.interface_class, "interface_class")?)
            }
            "ClassProperty" => PropertyKind::Class(field.target(&field.meta_class, "meta_class")?),
            "DelegateProperty" => {
                PropertyKind::Delegate(field.target(&field.signature, "signature")?)
            }
            "Const" => PropertyKind::Const,
            "FloatAttributeProperty" => PropertyKind::FloatAttribute,
            "IntAttributeProperty" => PropertyKind::IntAttribute,
            "ByteAttributeProperty" => PropertyKind::ByteAttribute,
            other => PropertyKind::Unknown(other),
        };
        Ok(kind)
    }

    /// Builtin scalar name for kinds that map onto one.
    pub fn builtin_name(&self) -> Option<&'static str> {
        match self {
            PropertyKind::Bool => Some("bool"),
            PropertyKind::Byte(None) | PropertyKind::Int => Some("int"),
            PropertyKind::Float => Some("float"),
            PropertyKind::Name | PropertyKind::Str => Some("str"),
            PropertyKind::Map => Some("dict"),
            PropertyKind::FloatAttribute => Some("float"),
            PropertyKind::IntAttribute | PropertyKind::ByteAttribute => Some("int"),
            _ => None,
        }
    }

    pub fn is_attribute(&self) -> bool {
        matches!(
            self,
            PropertyKind::FloatAttribute | PropertyKind::IntAttribute | PropertyKind::ByteAttribute
        )
    }
}

/// One reflected class with its ordered fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawClass {
    pub name: String,
    #[serde(default)]
    pub outers: Vec<RawOuter>,
    #[serde(default, rename = "super", skip_serializing_if = "Option::is_none")]
    pub super_class: Option<RawSymbol>,
    #[serde(default)]
    pub children: Vec<RawField>,
}

impl RawClass {
    pub fn symbol(&self) -> RawSymbol {
        RawSymbol::new(self.name.clone(), "Class", self.outers.clone())
    }
}
