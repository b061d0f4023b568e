//! The compiler service the extractor runs against.
//!
//! Parsing, binding and type resolution all belong to the host. The extractor
//! only asks questions through [`Host`] and never inspects syntax itself, so
//! any checker that can answer these queries (a live compiler, a JSON dump,
//! the OXC based binder in `tydoc-binder`) can drive it.

use std::fmt;
use std::path::{Path, PathBuf};

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Classification bits attached to every symbol.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct SymbolFlags: u32 {
        const VARIABLE = 1 << 0;
        const PROPERTY = 1 << 1;
        const ENUM_MEMBER = 1 << 2;
        const FUNCTION = 1 << 3;
        const CLASS = 1 << 4;
        const INTERFACE = 1 << 5;
        const ENUM = 1 << 6;
        const MODULE = 1 << 7;
        const METHOD = 1 << 8;
        const CONSTRUCTOR = 1 << 9;
        const ACCESSOR = 1 << 10;
        const TYPE_PARAMETER = 1 << 11;
        const TYPE_ALIAS = 1 << 12;
        const ALIAS = 1 << 13;
        const OPTIONAL = 1 << 14;
        const INDEX_SIGNATURE = 1 << 15;

        const CLASS_MEMBER = Self::METHOD.bits()
            | Self::ACCESSOR.bits()
            | Self::PROPERTY.bits()
            | Self::CONSTRUCTOR.bits();
        const HAS_EXPORTS = Self::CLASS.bits()
            | Self::ENUM.bits()
            | Self::MODULE.bits()
            | Self::VARIABLE.bits();
    }
}

bitflags! {
    /// Shape bits of a type as reported by the checker.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct TypeFlags: u32 {
        const ANY = 1 << 0;
        const UNKNOWN = 1 << 1;
        const STRING = 1 << 2;
        const NUMBER = 1 << 3;
        const BOOLEAN = 1 << 4;
        const BIG_INT = 1 << 5;
        const ES_SYMBOL = 1 << 6;
        const VOID = 1 << 7;
        const UNDEFINED = 1 << 8;
        const NULL = 1 << 9;
        const NEVER = 1 << 10;
        const NON_PRIMITIVE = 1 << 11;
        const STRING_LITERAL = 1 << 12;
        const NUMBER_LITERAL = 1 << 13;
        const BOOLEAN_LITERAL = 1 << 14;
        const ENUM_LITERAL = 1 << 15;
        const ENUM = 1 << 16;
        const TYPE_PARAMETER = 1 << 17;
        const OBJECT = 1 << 18;
        const UNION = 1 << 19;
        const INTERSECTION = 1 << 20;

        const INTRINSIC = Self::ANY.bits()
            | Self::UNKNOWN.bits()
            | Self::STRING.bits()
            | Self::NUMBER.bits()
            | Self::BIG_INT.bits()
            | Self::BOOLEAN.bits()
            | Self::BOOLEAN_LITERAL.bits()
            | Self::ES_SYMBOL.bits()
            | Self::VOID.bits()
            | Self::UNDEFINED.bits()
            | Self::NULL.bits()
            | Self::NEVER.bits()
            | Self::NON_PRIMITIVE.bits();
    }
}

bitflags! {
    /// Extra bits for object types.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct ObjectFlags: u32 {
        const CLASS = 1 << 0;
        const INTERFACE = 1 << 1;
        const REFERENCE = 1 << 2;
        const TUPLE = 1 << 3;
        const ANONYMOUS = 1 << 4;

        const CLASS_OR_INTERFACE = Self::CLASS.bits() | Self::INTERFACE.bits();
    }
}

bitflags! {
    /// Modifiers written on (or inherited by) a declaration.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct ModifierFlags: u32 {
        const EXPORT = 1 << 0;
        const DEFAULT = 1 << 1;
        const DECLARE = 1 << 2;
        const PUBLIC = 1 << 3;
        const PRIVATE = 1 << 4;
        const PROTECTED = 1 << 5;
        const STATIC = 1 << 6;
        const READONLY = 1 << 7;
        const ABSTRACT = 1 << 8;
        const ASYNC = 1 << 9;
    }
}

/// Syntax kind of a declaration node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclarationKind {
    Function,
    Class,
    Interface,
    Enum,
    EnumMember,
    Variable,
    Parameter,
    Property,
    Method,
    Constructor,
    Accessor,
    IndexSignature,
    TypeAlias,
    TypeParameter,
    Module,
    Import,
    ExportSpecifier,
    Other,
}

/// Location of a declaration: file plus 1-based first and last line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourcePos {
    pub source_path: String,
    pub first_line: u32,
    pub last_line: u32,
}

impl SourcePos {
    pub fn new(source_path: impl Into<String>, first_line: u32, last_line: u32) -> Self {
        Self {
            source_path: source_path.into(),
            first_line,
            last_line,
        }
    }
}

/// Literal carried by a literal type or an enum member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LiteralValue {
    Number(f64),
    String(String),
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::Number(value) => write!(f, "{value}"),
            LiteralValue::String(value) => write!(f, "{value:?}"),
        }
    }
}

/// A declaration as seen by the extractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclarationInfo<S, T> {
    pub kind: DeclarationKind,
    pub pos: SourcePos,
    #[serde(default)]
    pub modifiers: ModifierFlags,
    /// Symbols named in `extends` / `implements` clauses, in clause order.
    #[serde(default = "Vec::new", skip_serializing_if = "Vec::is_empty")]
    pub heritage: Vec<S>,
    /// Key and value types, for index signature declarations only.
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub index: Option<IndexSignatureInfo<T>>,
}

impl<S, T> DeclarationInfo<S, T> {
    pub fn new(kind: DeclarationKind, pos: SourcePos) -> Self {
        Self {
            kind,
            pos,
            modifiers: ModifierFlags::empty(),
            heritage: Vec::new(),
            index: None,
        }
    }

    pub fn with_modifiers(mut self, modifiers: ModifierFlags) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn is_private(&self) -> bool {
        self.modifiers.contains(ModifierFlags::PRIVATE)
    }
}

/// Types declared by an index signature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexSignatureInfo<T> {
    pub key: Option<T>,
    pub value: Option<T>,
}

/// Raw facts about a type. Shape decisions are made by
/// [`crate::describe::classify`], not by the host.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeInfo<S, T> {
    pub flags: TypeFlags,
    pub object_flags: ObjectFlags,
    /// Declaring symbol. For generic instantiations, the target's symbol.
    pub symbol: Option<S>,
    /// Name of the generic target's symbol, for instantiations.
    pub target_name: Option<String>,
    pub type_arguments: Vec<T>,
    /// Constituents of a union or intersection, in checker order.
    pub constituents: Vec<T>,
    pub literal: Option<LiteralValue>,
    /// Set for the implicit `this` type.
    pub is_this_type: bool,
}

impl<S, T> TypeInfo<S, T> {
    pub fn new(flags: TypeFlags) -> Self {
        Self {
            flags,
            object_flags: ObjectFlags::empty(),
            symbol: None,
            target_name: None,
            type_arguments: Vec::new(),
            constituents: Vec::new(),
            literal: None,
            is_this_type: false,
        }
    }
}

/// One source file of the program. The file at index 0 is the implicit
/// default library.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile<S> {
    pub path: String,
    /// Module symbol holding the file's exports, if the file is a module.
    pub symbol: Option<S>,
}

/// Symbol and type resolution service of a compiled program.
pub trait Host {
    /// Symbol handle. Equality must be the checker's own identity.
    type Symbol: Clone + PartialEq + fmt::Debug;
    type Type: Clone + fmt::Debug;
    type Signature: Clone + fmt::Debug;

    /// Source files in program order.
    fn source_files(&self) -> Vec<SourceFile<Self::Symbol>>;

    fn symbol_name(&self, symbol: &Self::Symbol) -> String;

    fn symbol_flags(&self, symbol: &Self::Symbol) -> SymbolFlags;

    /// Exports table of a module, class, enum or namespace symbol.
    fn exports(&self, symbol: &Self::Symbol) -> Vec<(String, Self::Symbol)>;

    /// Members table of a class or interface symbol.
    fn members(&self, symbol: &Self::Symbol) -> Vec<(String, Self::Symbol)>;

    fn declarations(
        &self,
        symbol: &Self::Symbol,
    ) -> Vec<DeclarationInfo<Self::Symbol, Self::Type>>;

    fn value_declaration(
        &self,
        symbol: &Self::Symbol,
    ) -> Option<DeclarationInfo<Self::Symbol, Self::Type>>;

    /// Type of `symbol` as seen from `declaration`.
    fn type_of_symbol_at(
        &self,
        symbol: &Self::Symbol,
        declaration: &DeclarationInfo<Self::Symbol, Self::Type>,
    ) -> Option<Self::Type>;

    /// Target of an alias symbol, one step.
    fn aliased_symbol(&self, symbol: &Self::Symbol) -> Option<Self::Symbol>;

    /// Documentation comment text, empty when there is none.
    fn documentation(&self, symbol: &Self::Symbol) -> String;

    fn call_signatures(&self, ty: &Self::Type) -> Vec<Self::Signature>;

    fn construct_signatures(&self, ty: &Self::Type) -> Vec<Self::Signature>;

    fn signature_parameters(&self, signature: &Self::Signature) -> Vec<Self::Symbol>;

    fn signature_return_type(&self, signature: &Self::Signature) -> Self::Type;

    fn signature_pos(&self, signature: &Self::Signature) -> Option<SourcePos>;

    fn signature_documentation(&self, signature: &Self::Signature) -> String;

    fn is_optional_parameter(&self, parameter: &Self::Symbol) -> bool;

    fn type_info(&self, ty: &Self::Type) -> TypeInfo<Self::Symbol, Self::Type>;

    /// Display string the checker uses for `ty`.
    fn type_to_string(&self, ty: &Self::Type) -> String;

    /// Path the build would emit for `source_path` with `extension`.
    ///
    /// The default swaps the source extension (`.ts`, `.tsx`, `.d.ts`, `.mts`,
    /// `.cts`) for `extension`. Hosts that know the project's output layout
    /// should override it.
    fn output_path(&self, source_path: &str, extension: &str) -> PathBuf {
        replace_source_extension(Path::new(source_path), extension)
    }
}

const SOURCE_EXTENSIONS: [&str; 6] = [".d.ts", ".tsx", ".ts", ".mts", ".cts", ".jsx"];

/// Swap a TypeScript source extension for `extension`.
pub fn replace_source_extension(path: &Path, extension: &str) -> PathBuf {
    let text = path.to_string_lossy();
    let stem = SOURCE_EXTENSIONS
        .iter()
        .find_map(|ext| text.strip_suffix(ext))
        .unwrap_or(&text);
    let extension = extension.trim_start_matches('.');
    PathBuf::from(format!("{stem}.{extension}"))
}
