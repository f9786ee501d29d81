//! Raw record to descriptor conversion.

use stubgen_types::{
    Affinity, ClassDef, Declaration, EnumDef, FunctionDef, Identity, Modifier, ParamDef,
    PropertyDef, ReturnDef, StructDef, TypeRef,
};
use tracing::debug;

use super::raw::{PropertyKind, RawClass, RawField, RawProperty, RawSymbol, ENUM_SENTINEL, IGNORED_FIELD_CLASSES};
use super::{ExtractError, ExtractReport};

fn symbol_ref(symbol: &RawSymbol, variant: Affinity) -> Result<TypeRef, ExtractError> {
    Ok(TypeRef::from_symbol(symbol, variant)?)
}

/// Type reference of a property, array dimension included.
pub fn property_type(property: &RawProperty<'_>, variant: Affinity) -> Result<TypeRef, ExtractError> {
    let mut type_ref = match &property.kind {
        PropertyKind::Array(inner) => {
            property_type(&inner.as_property()?, variant)?.with_modifier(Modifier::List)
        }
        PropertyKind::Byte(Some(target))
        | PropertyKind::Struct(target)
        | PropertyKind::Object(target)
        | PropertyKind::Component(target)
        | PropertyKind::Interface(target)
        | PropertyKind::Delegate(target) => symbol_ref(target, variant)?,
        PropertyKind::Class(meta) => symbol_ref(meta, variant)?.with_modifier(Modifier::TypeOf),
        PropertyKind::Const => TypeRef::constant(),
        PropertyKind::Unknown(class) => {
            return Err(ExtractError::UnsupportedProperty {
                field: property.name.to_string(),
                class: class.to_string(),
            })
        }
        kind => {
            let name = kind.builtin_name().ok_or_else(|| ExtractError::UnsupportedProperty {
                field: property.name.to_string(),
                class: format!("{:?}", kind),
            })?;
            let builtin = TypeRef::builtin(name);
            if kind.is_attribute() {
                builtin.with_modifier(Modifier::AttributeAccessor)
            } else {
                builtin
            }
        }
    };

    if property.array_dim > 1 {
        type_ref = type_ref.with_modifier(Modifier::FixedSize(property.array_dim));
    }
    Ok(type_ref)
}

pub fn convert_property(field: &RawField, variant: Affinity) -> Result<PropertyDef, ExtractError> {
    let property = field.as_property()?;
    Ok(PropertyDef::new(property.name, property_type(&property, variant)?))
}

/// Parameters and return value of a function. Only parameter-flagged children count.
pub fn convert_function(
    identity: Identity,
    children: &[RawField],
    variant: Affinity,
) -> Result<FunctionDef, ExtractError> {
    let mut function = FunctionDef::new(identity);
    for child in children.iter().filter(|c| c.is_parm()) {
        let property = child.as_property()?;
        let mut type_ref = property_type(&property, variant)?;

        if child.is_return() {
            if function.ret.is_some() {
                return Err(ExtractError::MalformedParameter {
                    function: function.full_name(),
                    parameter: child.name.clone(),
                    reason: "second return value",
                });
            }
            function.ret = Some(ReturnDef::new(type_ref));
            continue;
        }

        if function.params.iter().any(|p| p.name == child.name) {
            return Err(ExtractError::MalformedParameter {
                function: function.full_name(),
                parameter: child.name.clone(),
                reason: "duplicate parameter name",
            });
        }
        if child.is_out() {
            type_ref = type_ref.with_modifier(Modifier::Out);
        }
        if child.is_optional() {
            type_ref = type_ref.with_modifier(Modifier::Optional);
        }
        function.params.push(ParamDef::new(child.name.clone(), type_ref));
    }
    Ok(function)
}

/// Enum members up to the sentinel name, valued by ordinal.
pub fn convert_enum(identity: Identity, names: &[String]) -> EnumDef {
    let mut enum_def = EnumDef::new(identity);
    for (ordinal, name) in names
        .iter()
        .take_while(|n| n.as_str() != ENUM_SENTINEL)
        .enumerate()
    {
        enum_def.insert(name.clone(), ordinal as i64);
    }
    enum_def
}

fn convert_struct(
    identity: Identity,
    field: &RawField,
    variant: Affinity,
    report: &mut ExtractReport,
) -> Result<StructDef, ExtractError> {
    let mut struct_def = StructDef::new(identity);
    if let Some(super_struct) = &field.super_field {
        struct_def.supers.push(symbol_ref(super_struct, variant)?);
    }
    for child in &field.children {
        match convert_property(child, variant) {
            Ok(property) => struct_def.properties.push(property),
            Err(err) => report.skip(format!("{}.{}", struct_def.full_name(), child.name), err),
        }
    }
    Ok(struct_def)
}

/// Convert one raw class. Returns `None` (and records the skip) when the class itself
/// cannot be identified.
pub fn convert_class(raw: &RawClass, variant: Affinity, report: &mut ExtractReport) -> Option<ClassDef> {
    let identity = match Identity::from_symbol(&raw.symbol()) {
        Ok((identity, _)) => identity,
        Err(err) => {
            report.skip(raw.name.clone(), err);
            return None;
        }
    };

    let mut class = ClassDef::new(identity.clone(), variant);
    if let Some(super_class) = &raw.super_class {
        match symbol_ref(super_class, variant) {
            Ok(super_ref) => class.supers.push(super_ref),
            Err(err) => {
                report.skip(class.full_name(), err);
                return None;
            }
        }
    }

    for field in &raw.children {
        let member = Identity::new(identity.package.clone(), identity.path.child(field.name.clone()));
        let converted = match field.class.as_str() {
            "ScriptStruct" => convert_struct(member.clone(), field, variant, report)
                .map(|s| class.structs.push(s)),
            "Enum" => {
                class.enums.push(convert_enum(member.clone(), &field.names));
                Ok(())
            }
            "Function" => convert_function(member.clone(), &field.children, variant)
                .map(|f| class.functions.push(f)),
            ignored if IGNORED_FIELD_CLASSES.contains(&ignored) => Ok(()),
            _ => convert_property(field, variant).map(|p| class.properties.push(p)),
        };
        if let Err(err) = converted {
            report.skip(member.to_string(), err);
        }
    }

    debug!(class = %identity, members = class.member_count(), "converted class");
    Some(class)
}
