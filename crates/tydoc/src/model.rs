use serde::{Deserialize, Serialize};

pub use crate::host::{LiteralValue, SourcePos};

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            pub fn index(self) -> usize {
                self.0 as usize
            }

            pub(crate) fn from_index(index: usize) -> Self {
                Self(index as u32)
            }
        }
    };
}

pub(crate) use arena_id;

arena_id!(
    /// Index of a [`ClassSpec`] in [`Documentation::classes`].
    ClassId
);
arena_id!(
    /// Index of an [`EnumSpec`] in [`Documentation::enums`].
    EnumId
);
arena_id!(
    /// Index of a [`RefSpec`] in [`Documentation::refs`].
    RefId
);

/// Everything extracted from one program.
///
/// Classes, enums and reference records live in arenas so that every mention
/// of the same declaration shares one identity, including mentions that form
/// cycles.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Documentation {
    /// One record per exported top-level declaration, in traversal order.
    pub modules: Vec<ModuleSpec>,
    pub classes: Vec<ClassSpec>,
    pub enums: Vec<EnumSpec>,
    pub refs: Vec<RefSpec>,
}

impl Documentation {
    pub fn class(&self, id: ClassId) -> &ClassSpec {
        &self.classes[id.index()]
    }

    pub fn enum_spec(&self, id: EnumId) -> &EnumSpec {
        &self.enums[id.index()]
    }

    pub fn reference(&self, id: RefId) -> &RefSpec {
        &self.refs[id.index()]
    }

    /// Class or interface a reference resolved to, if any.
    pub fn ref_class(&self, id: RefId) -> Option<&ClassSpec> {
        match self.reference(id).target {
            Some(RefTarget::Class(class)) => Some(self.class(class)),
            _ => None,
        }
    }

    pub fn ref_enum(&self, id: RefId) -> Option<&EnumSpec> {
        match self.reference(id).target {
            Some(RefTarget::Enum(enum_id)) => Some(self.enum_spec(enum_id)),
            _ => None,
        }
    }

    /// Module records that export at least one declaration.
    pub fn non_empty_modules(&self) -> impl Iterator<Item = &ModuleSpec> {
        self.modules.iter().filter(|module| !module.is_empty())
    }

    /// Drops module records without exports.
    pub fn discard_empty_modules(&mut self) {
        self.modules.retain(|module| !module.is_empty());
    }

    /// Top-level class or interface with the given name.
    pub fn find_class(&self, name: &str) -> Option<&ClassSpec> {
        self.modules
            .iter()
            .flat_map(|module| module.class_list.iter().chain(&module.interface_list))
            .map(|id| self.class(*id))
            .find(|class| class.name == name)
    }

    pub fn find_enum(&self, name: &str) -> Option<&EnumSpec> {
        self.modules
            .iter()
            .flat_map(|module| &module.enum_list)
            .map(|id| self.enum_spec(*id))
            .find(|spec| spec.name == name)
    }

    pub fn find_function(&self, name: &str) -> Option<&FunctionSpec> {
        self.modules
            .iter()
            .flat_map(|module| &module.function_list)
            .find(|function| function.name.as_deref() == Some(name))
    }
}

/// Exports declared at one scope.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleSpec {
    pub enum_list: Vec<EnumId>,
    pub class_list: Vec<ClassId>,
    pub interface_list: Vec<ClassId>,
    pub function_list: Vec<FunctionSpec>,
    pub variable_list: Vec<IdentifierSpec>,
}

impl ModuleSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` when nothing is exported.
    pub fn is_empty(&self) -> bool {
        self.enum_list.is_empty()
            && self.class_list.is_empty()
            && self.interface_list.is_empty()
            && self.function_list.is_empty()
            && self.variable_list.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassKind {
    Class,
    Interface,
}

/// Class or interface and its public members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassSpec {
    pub name: String,
    pub kind: ClassKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pos: Option<SourcePos>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    /// Construct signatures, collected into an anonymous function.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub construct: Option<FunctionSpec>,
    pub method_list: Vec<FunctionSpec>,
    pub property_list: Vec<IdentifierSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<IndexSpec>,
    pub extend_list: Vec<ClassId>,
    pub exports: ModuleSpec,
}

impl ClassSpec {
    pub fn new(name: impl Into<String>, kind: ClassKind) -> Self {
        Self {
            name: name.into(),
            kind,
            pos: None,
            doc: None,
            construct: None,
            method_list: Vec::new(),
            property_list: Vec::new(),
            index: None,
            extend_list: Vec::new(),
            exports: ModuleSpec::new(),
        }
    }

    pub fn add_constructor(&mut self, signature: SignatureSpec) {
        self.construct
            .get_or_insert_with(|| FunctionSpec::new(None))
            .signature_list
            .push(signature);
    }

    pub fn property(&self, name: &str) -> Option<&IdentifierSpec> {
        self.property_list.iter().find(|property| property.name == name)
    }

    pub fn method(&self, name: &str) -> Option<&FunctionSpec> {
        self.method_list
            .iter()
            .find(|method| method.name.as_deref() == Some(name))
    }
}

/// Enum and its members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumSpec {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pos: Option<SourcePos>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    pub member_list: Vec<IdentifierSpec>,
}

impl EnumSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pos: None,
            doc: None,
            member_list: Vec::new(),
        }
    }
}

/// Function or method with one signature per overload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub signature_list: Vec<SignatureSpec>,
}

impl FunctionSpec {
    pub fn new(name: Option<String>) -> Self {
        Self {
            name,
            signature_list: Vec::new(),
        }
    }
}

/// Parameter and return shape of one overload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pos: Option<SourcePos>,
    pub param_list: Vec<IdentifierSpec>,
    pub return_type: TypeSpec,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

/// Property, parameter, enum member or variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifierSpec {
    pub name: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub ty: Option<TypeSpec>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub optional: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<LiteralValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pos: Option<SourcePos>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

/// Index signature of a class or interface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<TypeSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<TypeSpec>,
}

/// Why a type was left opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnsupportedKind {
    Tuple,
    Other,
}

/// Structured description of a type. Exactly one shape per value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TypeSpec {
    /// Primitive or otherwise unstructured type, as the checker prints it.
    Name(String),
    /// Literal type: primitive name plus value.
    Literal { name: String, value: LiteralValue },
    /// Named declaration, with type arguments for generic instantiations.
    Ref {
        target: RefId,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        arguments: Vec<TypeSpec>,
    },
    ArrayOf(Box<TypeSpec>),
    UnionOf(Vec<TypeSpec>),
    IntersectionOf(Vec<TypeSpec>),
    Unsupported { kind: UnsupportedKind, display: String },
}

impl TypeSpec {
    pub fn name(name: impl Into<String>) -> Self {
        TypeSpec::Name(name.into())
    }

    pub fn array_of(element: TypeSpec) -> Self {
        TypeSpec::ArrayOf(Box::new(element))
    }

    /// Registry record this type points at, for references.
    pub fn ref_id(&self) -> Option<RefId> {
        match self {
            TypeSpec::Ref { target, .. } => Some(*target),
            _ => None,
        }
    }

    /// `true` for unions and intersections.
    pub fn is_compound(&self) -> bool {
        matches!(self, TypeSpec::UnionOf(_) | TypeSpec::IntersectionOf(_))
    }
}

/// What a reference record resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RefTarget {
    Class(ClassId),
    Enum(EnumId),
}

/// Identity record shared by every mention of one declared symbol.
///
/// `target` is filled in once the declaration itself has been visited, which
/// may happen after the record was first handed out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefSpec {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<RefTarget>,
}

impl RefSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target: None,
        }
    }
}
