//! Second rendering pass: one class descriptor to `.pyi` text.

use serde::{Deserialize, Serialize};
use stubgen_types::{
    Affinity, ClassDef, Declaration, EnumDef, FunctionDef, Identity, ModelError, ModelErrorKind,
    Namespaces, PropertyDef, Schema, StructDef, TypeCategory, TypeContext, TypeRef,
    DEFAULT_TUPLE_LIMIT,
};
use tracing::{debug, warn};

use crate::manifest::PackageManifest;
use crate::names::StructNameIndex;
use crate::planner::{ClassPlan, Member};

const INDENT: &str = "    ";

/// Imports every stub starts with.
pub const PREAMBLE: &[&str] = &[
    "from typing import Type, List, Tuple, Annotated, Literal, Sequence",
    "from type_defs import OutParam, AttributeProperty",
    "from unrealsdk.unreal import BoundFunction, WrappedStruct, UObject, UClass",
    "from unrealsdk.unreal._uenum import UnrealEnum",
];

/// Supertype token for the root of the object hierarchy.
pub const DEFAULT_ROOT_TOKEN: &str = "UClass";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOptions {
    pub namespaces: Namespaces,
    /// Longest literal tuple expansion for fixed-size arrays.
    pub tuple_limit: usize,
    pub root_token: String,
    /// Render classes on the rayon pool. Ignored without the `parallel` feature.
    pub parallel: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            namespaces: Namespaces::default(),
            tuple_limit: DEFAULT_TUPLE_LIMIT,
            root_token: DEFAULT_ROOT_TOKEN.to_string(),
            parallel: true,
        }
    }
}

/// Rendered text of one class plus the members that could not be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedClass {
    pub package: String,
    pub name: String,
    pub affinity: Affinity,
    pub text: String,
    pub failures: Vec<ModelError>,
}

impl RenderedClass {
    pub fn registration(&self) -> String {
        PackageManifest::registration_line(&self.name)
    }
}

/// Renders the classes of one collection.
///
/// Holds collection-wide lookups (struct name collisions) so each class renders
/// independently and read-only.
pub struct StubRenderer<'a> {
    options: &'a RenderOptions,
    struct_names: StructNameIndex,
}

impl<'a> StubRenderer<'a> {
    pub fn new(schema: &Schema, options: &'a RenderOptions) -> Self {
        Self {
            options,
            struct_names: StructNameIndex::build(schema),
        }
    }

    pub fn options(&self) -> &RenderOptions {
        self.options
    }

    /// Render `class` in the context of the `affinity` collection.
    ///
    /// A member whose types cannot be rendered is left out and reported; the rest of
    /// the class still renders.
    pub fn render_class(&self, class: &ClassDef, affinity: Affinity) -> RenderedClass {
        let ctx = TypeContext::new(class.name(), affinity, &self.options.namespaces)
            .with_tuple_limit(self.options.tuple_limit);
        let plan = ClassPlan::build(class);
        let mut out = ClassWriter {
            ctx,
            lines: Vec::new(),
            failures: Vec::new(),
        };

        for line in PREAMBLE {
            out.lines.push(line.to_string());
        }
        out.lines.push(String::new());
        out.lines
            .push(format!("import {}", self.options.namespaces.common));
        if !affinity.is_common() {
            out.lines
                .push(format!("import {}", self.options.namespaces.token(affinity)));
        }
        out.lines.push(String::new());
        out.lines.push(String::new());
        out.lines.push(self.class_header(class));

        let body_start = out.lines.len();
        for e in &class.enums {
            out.enum_def(e);
        }
        for &i in &plan.structs {
            out.struct_def(&class.structs[i], &self.struct_names);
        }
        for &member in &plan.members {
            out.member(class, member);
        }
        for &i in &plan.deferred_structs {
            out.struct_def(&class.structs[i], &self.struct_names);
        }
        for &member in &plan.deferred_members {
            out.member(class, member);
        }
        if out.lines.len() == body_start {
            out.lines.push(format!("{}pass", INDENT));
        }
        out.lines.push(String::new());

        for failure in &out.failures {
            warn!(member = %failure.member, reason = %failure.kind, "skipping unrenderable member");
        }
        debug!(
            class = %class.identity(),
            affinity = %affinity,
            failures = out.failures.len(),
            "rendered class"
        );

        RenderedClass {
            package: class.package.clone(),
            name: class.name().to_string(),
            affinity,
            text: out.lines.join("\n"),
            failures: out.failures,
        }
    }

    /// The object root gets the root token in place of its supertypes. A detached class
    /// has no supertype to name at all.
    fn class_header(&self, class: &ClassDef) -> String {
        if class.is_object_root() {
            format!("class {}({}):", class.name(), self.options.root_token)
        } else if class.supers.is_empty() {
            format!("class {}:", class.name())
        } else {
            format!(
                "class {}({}):",
                class.name(),
                qualified_list(&class.supers, &self.options.namespaces)
            )
        }
    }
}

/// Supertypes in headers are never shortened; the enclosing name is not bound yet.
fn qualified_list(supers: &[TypeRef], namespaces: &Namespaces) -> String {
    supers
        .iter()
        .map(|s| s.render_qualified(None, namespaces))
        .collect::<Vec<_>>()
        .join(", ")
}

struct ClassWriter<'a> {
    ctx: TypeContext<'a>,
    lines: Vec<String>,
    failures: Vec<ModelError>,
}

impl ClassWriter<'_> {
    fn push(&mut self, depth: usize, line: impl AsRef<str>) {
        self.lines
            .push(format!("{}{}", INDENT.repeat(depth), line.as_ref()));
    }

    fn member(&mut self, class: &ClassDef, member: Member) {
        match member {
            Member::Property(i) => {
                let prop = &class.properties[i];
                let owner = class.identity();
                match property_lines(prop, &self.ctx) {
                    Ok(lines) => {
                        for line in lines {
                            self.push(1, line);
                        }
                    }
                    Err(kind) => self.failures.push(kind.at(Identity::new(
                        owner.package,
                        owner.path.child(prop.name.clone()),
                    ))),
                }
            }
            Member::Function(i) => {
                let func = &class.functions[i];
                match function_lines(func, &self.ctx) {
                    Ok(lines) => {
                        for (depth, line) in lines {
                            self.push(depth, line);
                        }
                    }
                    Err(kind) => self.failures.push(kind.at(func.identity())),
                }
            }
        }
    }

    fn enum_def(&mut self, e: &EnumDef) {
        let supers = if e.supers.is_empty() {
            "UnrealEnum".to_string()
        } else {
            qualified_list(&e.supers, self.ctx.namespaces)
        };
        self.push(1, format!("class {}({}):", e.name(), supers));
        self.push(2, "\"\"\"");
        for m in &e.members {
            self.push(2, format!("{} = {}", m.name, m.value));
        }
        self.push(2, "\"\"\"");
        for m in &e.members {
            self.push(2, format!("{} = {}", m.name, m.value));
        }
        if e.members.is_empty() {
            self.push(2, "pass");
        }
        self.lines.push(String::new());
    }

    fn struct_def(&mut self, s: &StructDef, names: &StructNameIndex) {
        let supers = if s.supers.is_empty() {
            "WrappedStruct".to_string()
        } else {
            qualified_list(&s.supers, self.ctx.namespaces)
        };

        let mut rendered: Vec<(&PropertyDef, Vec<String>, String)> = Vec::new();
        for prop in &s.properties {
            let keyword = prop.setter_type(&self.ctx);
            match (property_lines(prop, &self.ctx), keyword) {
                (Ok(lines), Ok(keyword)) => rendered.push((prop, lines, keyword)),
                (Err(kind), _) | (_, Err(kind)) => {
                    let owner = s.identity();
                    self.failures.push(kind.at(Identity::new(
                        owner.package,
                        owner.path.child(prop.name.clone()),
                    )));
                }
            }
        }

        self.push(1, format!("class {}({}):", s.name(), supers));
        self.push(2, "\"\"\"");
        self.push(2, s.full_name());
        self.lines.push(String::new());
        for (prop, _, keyword) in &rendered {
            self.push(2, format!("{}: {}", prop.name, keyword));
        }
        self.push(2, "\"\"\"");
        for (_, lines, _) in &rendered {
            for line in lines {
                self.push(2, line);
            }
        }

        let keywords: Vec<String> = rendered
            .iter()
            .map(|(prop, _, keyword)| format!("{}: {} = ...", prop.name, keyword))
            .collect();
        let keyword_part = if keywords.is_empty() {
            String::new()
        } else {
            format!(", *, {}", keywords.join(", "))
        };
        let own = TypeRef::new(s.identity(), TypeCategory::Struct, self.ctx.affinity);
        self.lines.push(String::new());
        self.push(2, "@staticmethod");
        self.push(
            2,
            format!(
                "def make_struct(name: Literal[\"{}\"], fully_qualified: Literal[True], /{}) -> {}: ...",
                names.factory_name(s),
                keyword_part,
                self.ctx.own_qualified(&own)
            ),
        );
        self.lines.push(String::new());
    }
}

/// Getter/setter accessor pair, unindented. Constants get no setter.
fn property_lines(prop: &PropertyDef, ctx: &TypeContext<'_>) -> Result<Vec<String>, ModelErrorKind> {
    let getter = prop.getter_type(ctx)?;
    let mut lines = vec![
        "@property".to_string(),
        format!("def {}(self) -> {}: ...", prop.name, getter),
    ];
    if !prop.is_read_only() {
        let setter = prop.setter_type(ctx)?;
        lines.push(format!("@{}.setter", prop.name));
        lines.push(format!("def {}(self, val: {}) -> None: ...", prop.name, setter));
    }
    Ok(lines)
}

/// A call-signature type plus the attribute bound to it, as `(depth, line)` pairs.
fn function_lines(
    func: &FunctionDef,
    ctx: &TypeContext<'_>,
) -> Result<Vec<(usize, String)>, ModelErrorKind> {
    let params = func
        .params
        .iter()
        .map(|p| p.declaration(ctx))
        .collect::<Result<Vec<_>, _>>()?;
    let ret = func.effective_return(ctx)?;
    let name = func.name();

    let mut lines = vec![
        (1, format!("class _{}(BoundFunction):", name)),
        (2, "class args(WrappedStruct):".to_string()),
    ];
    for param in &params {
        lines.push((3, param.clone()));
    }
    if params.is_empty() {
        lines.push((3, "pass".to_string()));
    }
    lines.push((2, format!("type ret = {}", ret)));
    lines.push((0, String::new()));

    let call_params = if params.is_empty() {
        String::new()
    } else {
        format!(", {}", params.join(", "))
    };
    lines.push((2, format!("def __call__(self{}) -> {}: ...", call_params, ret)));
    lines.push((0, String::new()));

    lines.push((1, format!("{}: _{}", name, name)));
    lines.push((1, "\"\"\"".to_string()));
    for param in &params {
        lines.push((1, param.clone()));
    }
    if params.is_empty() {
        lines.push((1, "No args".to_string()));
    }
    lines.push((0, String::new()));
    lines.push((1, format!("Returns: {}", ret)));
    lines.push((1, "\"\"\"".to_string()));
    lines.push((0, String::new()));
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stubgen_types::{Modifier, NamePath, ParamDef, ReturnDef};

    fn id(path: &[&str]) -> Identity {
        Identity::new("Engine", NamePath::new(path.iter().copied()))
    }

    fn render(class: &ClassDef, affinity: Affinity) -> RenderedClass {
        let options = RenderOptions::default();
        let schema = Schema::with_classes(affinity, vec![class.clone()]);
        StubRenderer::new(&schema, &options).render_class(class, affinity)
    }

    #[test]
    fn test_empty_class_gets_placeholder() {
        let mut class = ClassDef::new(id(&["Foo"]), Affinity::VariantA);
        class.supers.push(TypeRef::new(
            id(&["Base"]),
            TypeCategory::Class,
            Affinity::Common,
        ));
        let out = render(&class, Affinity::VariantA);
        assert!(out.text.contains("import common\nimport game_a\n"));
        assert!(out.text.contains("class Foo(common.Base):\n    pass\n"));
        assert_eq!(out.registration(), "from .Foo import Foo");
    }

    #[test]
    fn test_object_root_uses_root_token() {
        let mut class = ClassDef::new(
            Identity::new("Core", NamePath::single("Object")),
            Affinity::Common,
        );
        class
            .properties
            .push(PropertyDef::new("Name", TypeRef::builtin("str")));
        let out = render(&class, Affinity::Common);
        assert!(out.text.contains("class Object(UClass):"));
        assert!(!out.text.contains("import game_a"));
    }

    #[test]
    fn test_detached_class_is_not_the_root() {
        let mut class = ClassDef::new(id(&["Foo"]), Affinity::Common);
        class.detached = true;
        let out = render(&class, Affinity::Common);
        assert!(out.text.contains("class Foo:\n    pass\n"));
        assert!(!out.text.contains("class Foo(UClass)"));
    }

    #[test]
    fn test_property_accessors() {
        let mut class = ClassDef::new(id(&["Foo"]), Affinity::VariantB);
        class.supers.push(TypeRef::new(id(&["Base"]), TypeCategory::Class, Affinity::VariantB));
        class.properties.push(PropertyDef::new(
            "Target",
            TypeRef::new(id(&["Actor"]), TypeCategory::Class, Affinity::Common),
        ));
        class
            .properties
            .push(PropertyDef::new("Label", TypeRef::constant()));
        let out = render(&class, Affinity::VariantB);
        assert!(out
            .text
            .contains("    @property\n    def Target(self) -> game_b.Actor: ...\n"));
        assert!(out
            .text
            .contains("    @Target.setter\n    def Target(self, val: common.Actor | None) -> None: ...\n"));
        assert!(out.text.contains("def Label(self) -> str: ..."));
        assert!(!out.text.contains("@Label.setter"));
    }

    #[test]
    fn test_function_signature_shape() {
        let mut class = ClassDef::new(id(&["Foo"]), Affinity::VariantA);
        class.supers.push(TypeRef::new(id(&["Base"]), TypeCategory::Class, Affinity::VariantA));
        let mut func = FunctionDef::new(id(&["Foo", "Trace"]));
        func.params.push(ParamDef::new("Dist", TypeRef::builtin("float")));
        func.params.push(ParamDef::new(
            "Hit",
            TypeRef::builtin("int").with_modifier(Modifier::Out),
        ));
        func.ret = Some(ReturnDef::new(TypeRef::builtin("bool")));
        class.functions.push(func);

        let out = render(&class, Affinity::VariantA);
        let expected = [
            "    class _Trace(BoundFunction):",
            "        class args(WrappedStruct):",
            "            Dist: float",
            "            Hit: Annotated[int, OutParam]",
            "        type ret = Tuple[bool, int]",
            "",
            "        def __call__(self, Dist: float, Hit: Annotated[int, OutParam]) -> Tuple[bool, int]: ...",
            "",
            "    Trace: _Trace",
        ]
        .join("\n");
        assert!(out.text.contains(&expected), "{}", out.text);
        assert!(out.text.contains("    Returns: Tuple[bool, int]\n"));
    }

    #[test]
    fn test_struct_factory_and_deferral() {
        let mut class = ClassDef::new(id(&["Foo"]), Affinity::VariantA);
        class.supers.push(TypeRef::new(id(&["Base"]), TypeCategory::Class, Affinity::VariantA));
        let mut shared = StructDef::new(id(&["Foo", "Shared"]));
        shared.supers.push(TypeRef::new(
            id(&["Foo", "Shared"]),
            TypeCategory::Struct,
            Affinity::Common,
        ));
        shared
            .properties
            .push(PropertyDef::new("X", TypeRef::builtin("float").with_modifier(Modifier::FixedSize(3))));
        class.structs.push(shared);
        class.properties.push(PropertyDef::new("Speed", TypeRef::builtin("float")));

        let out = render(&class, Affinity::VariantA);
        assert!(out.text.contains("    class Shared(common.Foo.Shared):"));
        assert!(out.text.contains("        def X(self) -> Tuple[float, float, float]: ..."));
        assert!(out.text.contains(
            "def make_struct(name: Literal[\"Shared\"], fully_qualified: Literal[True], /, *, X: Annotated[Sequence[float], \"size: 3\"] = ...) -> game_a.Foo.Shared: ..."
        ));
        let speed = out.text.find("def Speed").unwrap();
        let strukt = out.text.find("class Shared").unwrap();
        assert!(speed < strukt, "self-named struct must follow the main body");
    }

    #[test]
    fn test_unrenderable_member_is_reported() {
        let mut class = ClassDef::new(id(&["Foo"]), Affinity::VariantA);
        class.supers.push(TypeRef::new(id(&["Base"]), TypeCategory::Class, Affinity::VariantA));
        class.properties.push(PropertyDef::new(
            "Broken",
            TypeRef::builtin("int").with_modifier(Modifier::Out),
        ));
        class.properties.push(PropertyDef::new("Fine", TypeRef::builtin("int")));
        let out = render(&class, Affinity::VariantA);
        assert_eq!(out.failures.len(), 1);
        assert_eq!(out.failures[0].member, id(&["Foo", "Broken"]));
        assert!(out.text.contains("def Fine(self) -> int: ..."));
        assert!(!out.text.contains("Broken"));
    }
}
