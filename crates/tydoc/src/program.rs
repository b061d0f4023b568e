//! In-memory program snapshot.
//!
//! [`Program`] is a fully resolved symbol graph held in arenas. It implements
//! [`Host`] directly, serializes to JSON so any checker can dump one, and is
//! what the OXC binder lowers TypeScript sources into. [`ProgramBuilder`]
//! assembles snapshots by hand.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{DocsError, Result};
use crate::host::{
    DeclarationInfo, DeclarationKind, Host, LiteralValue, ObjectFlags, SourceFile, SourcePos,
    SymbolFlags, TypeFlags, TypeInfo, replace_source_extension,
};
use crate::model::arena_id;

arena_id!(
    /// Index of a symbol in [`Program::symbols`].
    SymbolId
);
arena_id!(
    /// Index of a type in [`Program::types`].
    TypeId
);
arena_id!(
    /// Index of a signature in [`Program::signatures`].
    SignatureId
);

/// Path of the implicit default library, always file 0.
pub const LIB_FILE: &str = "lib.d.ts";

pub type Declaration = DeclarationInfo<SymbolId, TypeId>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileData {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<SymbolId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolData {
    pub name: String,
    pub flags: SymbolFlags,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub exports: IndexMap<String, SymbolId>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub members: IndexMap<String, SymbolId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub declarations: Vec<Declaration>,
    /// Index into `declarations`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_declaration: Option<usize>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub ty: Option<TypeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias_of: Option<SymbolId>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub doc: String,
}

impl SymbolData {
    pub fn new(name: impl Into<String>, flags: SymbolFlags) -> Self {
        Self {
            name: name.into(),
            flags,
            exports: IndexMap::new(),
            members: IndexMap::new(),
            declarations: Vec::new(),
            value_declaration: None,
            ty: None,
            alias_of: None,
            doc: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeData {
    pub flags: TypeFlags,
    #[serde(default)]
    pub object_flags: ObjectFlags,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<SymbolId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_arguments: Vec<TypeId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constituents: Vec<TypeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub literal: Option<LiteralValue>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_this_type: bool,
    pub display: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub call_signatures: Vec<SignatureId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub construct_signatures: Vec<SignatureId>,
}

impl TypeData {
    pub fn new(flags: TypeFlags, display: impl Into<String>) -> Self {
        Self {
            flags,
            object_flags: ObjectFlags::empty(),
            symbol: None,
            target_name: None,
            type_arguments: Vec::new(),
            constituents: Vec::new(),
            literal: None,
            is_this_type: false,
            display: display.into(),
            call_signatures: Vec::new(),
            construct_signatures: Vec::new(),
        }
    }

    fn object(object_flags: ObjectFlags, display: impl Into<String>) -> Self {
        let mut data = Self::new(TypeFlags::OBJECT, display);
        data.object_flags = object_flags;
        data
    }

    fn is_compound(&self) -> bool {
        self.flags
            .intersects(TypeFlags::UNION | TypeFlags::INTERSECTION)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureData {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<SymbolId>,
    pub return_type: TypeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos: Option<SourcePos>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub doc: String,
}

impl SignatureData {
    pub fn new(parameters: Vec<SymbolId>, return_type: TypeId) -> Self {
        Self {
            parameters,
            return_type,
            pos: None,
            doc: String::new(),
        }
    }
}

/// Maps sources under `root_dir` to emitted files under `out_dir`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputLayout {
    pub root_dir: PathBuf,
    pub out_dir: PathBuf,
}

impl OutputLayout {
    pub fn new(root_dir: impl Into<PathBuf>, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            out_dir: out_dir.into(),
        }
    }

    /// Emitted path of `source`. Sources outside `root_dir` keep their
    /// directory.
    pub fn map(&self, source: &Path, extension: &str) -> PathBuf {
        let emitted = replace_source_extension(source, extension);
        match emitted.strip_prefix(&self.root_dir) {
            Ok(relative) => self.out_dir.join(relative),
            Err(_) => emitted,
        }
    }
}

/// Arena-backed symbol graph of one compiled program.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub files: Vec<FileData>,
    pub symbols: Vec<SymbolData>,
    pub types: Vec<TypeData>,
    #[serde(default)]
    pub signatures: Vec<SignatureData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<OutputLayout>,
}

impl Program {
    pub fn symbol(&self, id: SymbolId) -> &SymbolData {
        &self.symbols[id.index()]
    }

    pub fn type_data(&self, id: TypeId) -> &TypeData {
        &self.types[id.index()]
    }

    pub fn signature(&self, id: SignatureId) -> &SignatureData {
        &self.signatures[id.index()]
    }

    /// First symbol with `name`, in arena order.
    pub fn find_symbol(&self, name: &str) -> Option<SymbolId> {
        self.symbols
            .iter()
            .position(|symbol| symbol.name == name)
            .map(SymbolId::from_index)
    }

    /// Parse a snapshot dumped as JSON and check that it is self-contained.
    pub fn from_json(text: &str) -> Result<Self> {
        let program: Program = serde_json::from_str(text)?;
        program.validate()?;
        Ok(program)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Fails on any id that points outside its arena.
    pub fn validate(&self) -> Result<()> {
        let symbols = self.symbols.len();
        let types = self.types.len();
        let signatures = self.signatures.len();

        let check = |what: &str, index: usize, len: usize, owner: &str| {
            if index < len {
                Ok(())
            } else {
                Err(DocsError::InvalidProgram {
                    message: format!("{owner} refers to missing {what} #{index}"),
                })
            }
        };

        for file in &self.files {
            if let Some(symbol) = file.symbol {
                check("symbol", symbol.index(), symbols, &file.path)?;
            }
        }

        for symbol in &self.symbols {
            let owner = symbol.name.as_str();
            for id in symbol.exports.values().chain(symbol.members.values()) {
                check("symbol", id.index(), symbols, owner)?;
            }
            if let Some(alias) = symbol.alias_of {
                check("symbol", alias.index(), symbols, owner)?;
            }
            if let Some(ty) = symbol.ty {
                check("type", ty.index(), types, owner)?;
            }
            if let Some(index) = symbol.value_declaration {
                check("declaration", index, symbol.declarations.len(), owner)?;
            }
            for declaration in &symbol.declarations {
                for heritage in &declaration.heritage {
                    check("symbol", heritage.index(), symbols, owner)?;
                }
                if let Some(index) = &declaration.index {
                    for ty in index.key.iter().chain(&index.value) {
                        check("type", ty.index(), types, owner)?;
                    }
                }
            }
        }

        for ty in &self.types {
            let owner = ty.display.as_str();
            if let Some(symbol) = ty.symbol {
                check("symbol", symbol.index(), symbols, owner)?;
            }
            for id in ty.type_arguments.iter().chain(&ty.constituents) {
                check("type", id.index(), types, owner)?;
            }
            for id in ty.call_signatures.iter().chain(&ty.construct_signatures) {
                check("signature", id.index(), signatures, owner)?;
            }
        }

        for signature in &self.signatures {
            check("type", signature.return_type.index(), types, "signature")?;
            for parameter in &signature.parameters {
                check("symbol", parameter.index(), symbols, "signature")?;
            }
        }

        Ok(())
    }
}

impl Host for Program {
    type Symbol = SymbolId;
    type Type = TypeId;
    type Signature = SignatureId;

    fn source_files(&self) -> Vec<SourceFile<SymbolId>> {
        self.files
            .iter()
            .map(|file| SourceFile {
                path: file.path.clone(),
                symbol: file.symbol,
            })
            .collect()
    }

    fn symbol_name(&self, symbol: &SymbolId) -> String {
        self.symbol(*symbol).name.clone()
    }

    fn symbol_flags(&self, symbol: &SymbolId) -> SymbolFlags {
        self.symbol(*symbol).flags
    }

    fn exports(&self, symbol: &SymbolId) -> Vec<(String, SymbolId)> {
        self.symbol(*symbol)
            .exports
            .iter()
            .map(|(name, id)| (name.clone(), *id))
            .collect()
    }

    fn members(&self, symbol: &SymbolId) -> Vec<(String, SymbolId)> {
        self.symbol(*symbol)
            .members
            .iter()
            .map(|(name, id)| (name.clone(), *id))
            .collect()
    }

    fn declarations(&self, symbol: &SymbolId) -> Vec<Declaration> {
        self.symbol(*symbol).declarations.clone()
    }

    fn value_declaration(&self, symbol: &SymbolId) -> Option<Declaration> {
        let data = self.symbol(*symbol);
        data.value_declaration
            .and_then(|index| data.declarations.get(index))
            .cloned()
    }

    fn type_of_symbol_at(&self, symbol: &SymbolId, _declaration: &Declaration) -> Option<TypeId> {
        self.symbol(*symbol).ty
    }

    fn aliased_symbol(&self, symbol: &SymbolId) -> Option<SymbolId> {
        self.symbol(*symbol).alias_of
    }

    fn documentation(&self, symbol: &SymbolId) -> String {
        self.symbol(*symbol).doc.clone()
    }

    fn call_signatures(&self, ty: &TypeId) -> Vec<SignatureId> {
        self.type_data(*ty).call_signatures.clone()
    }

    fn construct_signatures(&self, ty: &TypeId) -> Vec<SignatureId> {
        self.type_data(*ty).construct_signatures.clone()
    }

    fn signature_parameters(&self, signature: &SignatureId) -> Vec<SymbolId> {
        self.signature(*signature).parameters.clone()
    }

    fn signature_return_type(&self, signature: &SignatureId) -> TypeId {
        self.signature(*signature).return_type
    }

    fn signature_pos(&self, signature: &SignatureId) -> Option<SourcePos> {
        self.signature(*signature).pos.clone()
    }

    fn signature_documentation(&self, signature: &SignatureId) -> String {
        self.signature(*signature).doc.clone()
    }

    fn is_optional_parameter(&self, parameter: &SymbolId) -> bool {
        self.symbol(*parameter).flags.contains(SymbolFlags::OPTIONAL)
    }

    fn type_info(&self, ty: &TypeId) -> TypeInfo<SymbolId, TypeId> {
        let data = self.type_data(*ty);
        TypeInfo {
            flags: data.flags,
            object_flags: data.object_flags,
            symbol: data.symbol,
            target_name: data.target_name.clone(),
            type_arguments: data.type_arguments.clone(),
            constituents: data.constituents.clone(),
            literal: data.literal.clone(),
            is_this_type: data.is_this_type,
        }
    }

    fn type_to_string(&self, ty: &TypeId) -> String {
        self.type_data(*ty).display.clone()
    }

    fn output_path(&self, source_path: &str, extension: &str) -> PathBuf {
        match &self.layout {
            Some(layout) => layout.map(Path::new(source_path), extension),
            None => replace_source_extension(Path::new(source_path), extension),
        }
    }
}

/// Incremental construction of a [`Program`].
///
/// A fresh builder already holds the default library as file 0 with the
/// global `Array` interface, so array types can be instantiated right away.
#[derive(Debug)]
pub struct ProgramBuilder {
    program: Program,
    array: SymbolId,
    intrinsics: FxHashMap<String, TypeId>,
}

impl Default for ProgramBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgramBuilder {
    pub fn new() -> Self {
        let mut builder = Self {
            program: Program::default(),
            array: SymbolId(0),
            intrinsics: FxHashMap::default(),
        };
        builder.program.files.push(FileData {
            path: LIB_FILE.to_string(),
            symbol: None,
        });
        let array = builder.symbol("Array", SymbolFlags::INTERFACE);
        builder.declare(
            array,
            Declaration::new(DeclarationKind::Interface, SourcePos::new(LIB_FILE, 1, 1)),
        );
        builder.array = array;
        builder
    }

    /// The library's `Array` interface.
    pub fn array_symbol(&self) -> SymbolId {
        self.array
    }

    /// Add a module file and return the symbol holding its exports.
    pub fn add_file(&mut self, path: impl Into<String>) -> SymbolId {
        let path = path.into();
        let symbol = self.symbol(format!("\"{path}\""), SymbolFlags::MODULE);
        self.program.files.push(FileData {
            path,
            symbol: Some(symbol),
        });
        symbol
    }

    /// Add a file that is not a module (no exports table).
    pub fn add_script(&mut self, path: impl Into<String>) {
        self.program.files.push(FileData {
            path: path.into(),
            symbol: None,
        });
    }

    pub fn symbol(&mut self, name: impl Into<String>, flags: SymbolFlags) -> SymbolId {
        let id = SymbolId::from_index(self.program.symbols.len());
        self.program.symbols.push(SymbolData::new(name, flags));
        id
    }

    pub fn symbol_data(&self, id: SymbolId) -> &SymbolData {
        self.program.symbol(id)
    }

    pub fn symbol_mut(&mut self, id: SymbolId) -> &mut SymbolData {
        &mut self.program.symbols[id.index()]
    }

    /// Attach a declaration. The first declaration of a value kind becomes
    /// the value declaration.
    pub fn declare(&mut self, symbol: SymbolId, declaration: Declaration) -> usize {
        let is_value = !matches!(
            declaration.kind,
            DeclarationKind::Interface
                | DeclarationKind::TypeAlias
                | DeclarationKind::TypeParameter
                | DeclarationKind::Import
                | DeclarationKind::ExportSpecifier
                | DeclarationKind::IndexSignature
                | DeclarationKind::Other
        );
        let data = self.symbol_mut(symbol);
        data.declarations.push(declaration);
        let index = data.declarations.len() - 1;
        if is_value && data.value_declaration.is_none() {
            data.value_declaration = Some(index);
        }
        index
    }

    pub fn export(&mut self, parent: SymbolId, name: impl Into<String>, symbol: SymbolId) {
        self.symbol_mut(parent).exports.insert(name.into(), symbol);
    }

    pub fn member(&mut self, parent: SymbolId, name: impl Into<String>, symbol: SymbolId) {
        self.symbol_mut(parent).members.insert(name.into(), symbol);
    }

    pub fn set_type(&mut self, symbol: SymbolId, ty: TypeId) {
        self.symbol_mut(symbol).ty = Some(ty);
    }

    pub fn set_doc(&mut self, symbol: SymbolId, doc: impl Into<String>) {
        self.symbol_mut(symbol).doc = doc.into();
    }

    /// Make `symbol` an alias of `target`.
    pub fn alias(&mut self, symbol: SymbolId, target: SymbolId) {
        let data = self.symbol_mut(symbol);
        data.flags |= SymbolFlags::ALIAS;
        data.alias_of = Some(target);
    }

    pub fn set_layout(&mut self, layout: OutputLayout) {
        self.program.layout = Some(layout);
    }

    pub fn add_type(&mut self, data: TypeData) -> TypeId {
        let id = TypeId::from_index(self.program.types.len());
        self.program.types.push(data);
        id
    }

    pub fn type_data(&self, id: TypeId) -> &TypeData {
        self.program.type_data(id)
    }

    /// Shared instance of a keyword type such as `string` or `void`.
    pub fn intrinsic(&mut self, flags: TypeFlags, display: &str) -> TypeId {
        if let Some(id) = self.intrinsics.get(display) {
            return *id;
        }
        let id = self.add_type(TypeData::new(flags, display));
        self.intrinsics.insert(display.to_string(), id);
        id
    }

    pub fn string(&mut self) -> TypeId {
        self.intrinsic(TypeFlags::STRING, "string")
    }

    pub fn number(&mut self) -> TypeId {
        self.intrinsic(TypeFlags::NUMBER, "number")
    }

    pub fn boolean(&mut self) -> TypeId {
        self.intrinsic(TypeFlags::BOOLEAN, "boolean")
    }

    pub fn void(&mut self) -> TypeId {
        self.intrinsic(TypeFlags::VOID, "void")
    }

    pub fn any(&mut self) -> TypeId {
        self.intrinsic(TypeFlags::ANY, "any")
    }

    pub fn string_literal(&mut self, value: impl Into<String>) -> TypeId {
        let value = value.into();
        let mut data = TypeData::new(TypeFlags::STRING_LITERAL, format!("{value:?}"));
        data.literal = Some(LiteralValue::String(value));
        self.add_type(data)
    }

    pub fn number_literal(&mut self, value: f64) -> TypeId {
        let mut data = TypeData::new(TypeFlags::NUMBER_LITERAL, value.to_string());
        data.literal = Some(LiteralValue::Number(value));
        self.add_type(data)
    }

    /// Literal type of one enum member.
    pub fn enum_literal(&mut self, member: SymbolId, value: LiteralValue) -> TypeId {
        let primitive = match value {
            LiteralValue::Number(_) => TypeFlags::NUMBER_LITERAL,
            LiteralValue::String(_) => TypeFlags::STRING_LITERAL,
        };
        let display = self.program.symbol(member).name.clone();
        let mut data = TypeData::new(TypeFlags::ENUM_LITERAL | primitive, display);
        data.symbol = Some(member);
        data.literal = Some(value);
        self.add_type(data)
    }

    /// Type of an enum: the union of its member literals.
    pub fn enum_type(&mut self, symbol: SymbolId, members: Vec<TypeId>) -> TypeId {
        let display = self.program.symbol(symbol).name.clone();
        let mut data = TypeData::new(
            TypeFlags::ENUM_LITERAL | TypeFlags::UNION | TypeFlags::ENUM,
            display,
        );
        data.symbol = Some(symbol);
        data.constituents = members;
        self.add_type(data)
    }

    /// Instance type of a class or interface, or an instantiation of a
    /// generic one when `arguments` is non-empty.
    pub fn reference(&mut self, symbol: SymbolId, arguments: Vec<TypeId>) -> TypeId {
        let name = self.program.symbol(symbol).name.clone();
        if arguments.is_empty() {
            let kind = if self.program.symbol(symbol).flags.contains(SymbolFlags::CLASS) {
                ObjectFlags::CLASS
            } else {
                ObjectFlags::INTERFACE
            };
            let mut data = TypeData::object(kind, name);
            data.symbol = Some(symbol);
            return self.add_type(data);
        }
        let display = format!("{name}<{}>", self.display_list(&arguments, ", "));
        let mut data = TypeData::object(ObjectFlags::REFERENCE, display);
        data.symbol = Some(symbol);
        data.target_name = Some(name);
        data.type_arguments = arguments;
        self.add_type(data)
    }

    /// `element[]`, an instantiation of the library `Array`.
    pub fn array_of(&mut self, element: TypeId) -> TypeId {
        let inner = self.type_data(element);
        let display = if inner.is_compound() {
            format!("({})[]", inner.display)
        } else {
            format!("{}[]", inner.display)
        };
        let mut data = TypeData::object(ObjectFlags::REFERENCE, display);
        data.symbol = Some(self.array);
        data.target_name = Some("Array".to_string());
        data.type_arguments = vec![element];
        self.add_type(data)
    }

    pub fn union(&mut self, members: Vec<TypeId>) -> TypeId {
        let display = self.display_list(&members, " | ");
        let mut data = TypeData::new(TypeFlags::UNION, display);
        data.constituents = members;
        self.add_type(data)
    }

    pub fn intersection(&mut self, members: Vec<TypeId>) -> TypeId {
        let display = self.display_list(&members, " & ");
        let mut data = TypeData::new(TypeFlags::INTERSECTION, display);
        data.constituents = members;
        self.add_type(data)
    }

    pub fn tuple(&mut self, elements: Vec<TypeId>) -> TypeId {
        let display = format!("[{}]", self.display_list(&elements, ", "));
        let mut data = TypeData::object(ObjectFlags::REFERENCE | ObjectFlags::TUPLE, display);
        data.type_arguments = elements;
        self.add_type(data)
    }

    pub fn type_parameter(&mut self, symbol: SymbolId) -> TypeId {
        let display = self.program.symbol(symbol).name.clone();
        let mut data = TypeData::new(TypeFlags::TYPE_PARAMETER, display);
        data.symbol = Some(symbol);
        self.add_type(data)
    }

    /// Implicit `this` type inside a class or interface.
    pub fn this_type(&mut self, owner: SymbolId) -> TypeId {
        let mut data = TypeData::new(TypeFlags::TYPE_PARAMETER, "this");
        data.symbol = Some(owner);
        data.is_this_type = true;
        self.add_type(data)
    }

    /// Object literal type, kept as its display text.
    pub fn anonymous(&mut self, display: impl Into<String>) -> TypeId {
        self.add_type(TypeData::object(ObjectFlags::ANONYMOUS, display))
    }

    /// Type of a function value with the given overloads.
    pub fn function_type(&mut self, display: impl Into<String>, signatures: Vec<SignatureId>) -> TypeId {
        let mut data = TypeData::object(ObjectFlags::ANONYMOUS, display);
        data.call_signatures = signatures;
        self.add_type(data)
    }

    /// Static side of a class: `typeof Name` with its construct signatures.
    pub fn constructor_type(&mut self, class: SymbolId, signatures: Vec<SignatureId>) -> TypeId {
        let display = format!("typeof {}", self.program.symbol(class).name);
        let mut data = TypeData::object(ObjectFlags::ANONYMOUS, display);
        data.symbol = Some(class);
        data.construct_signatures = signatures;
        self.add_type(data)
    }

    pub fn signature(&mut self, data: SignatureData) -> SignatureId {
        let id = SignatureId::from_index(self.program.signatures.len());
        self.program.signatures.push(data);
        id
    }

    pub fn signature_data(&self, id: SignatureId) -> &SignatureData {
        self.program.signature(id)
    }

    pub fn add_call_signature(&mut self, ty: TypeId, signature: SignatureId) {
        self.program.types[ty.index()].call_signatures.push(signature);
    }

    pub fn add_construct_signature(&mut self, ty: TypeId, signature: SignatureId) {
        self.program.types[ty.index()]
            .construct_signatures
            .push(signature);
    }

    pub fn build(self) -> Program {
        self.program
    }

    fn display_list(&self, types: &[TypeId], separator: &str) -> String {
        types
            .iter()
            .map(|id| {
                let data = self.type_data(*id);
                if separator != ", " && data.is_compound() {
                    format!("({})", data.display)
                } else {
                    data.display.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(separator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_builder_starts_with_library_file() {
        let program = ProgramBuilder::new().build();
        let files = program.source_files();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, LIB_FILE);
        assert_eq!(program.find_symbol("Array"), Some(SymbolId(0)));
    }

    #[test]
    fn array_instantiation_reports_target_name() {
        let mut builder = ProgramBuilder::new();
        let string = builder.string();
        let array = builder.array_of(string);
        let program = builder.build();

        let info = program.type_info(&array);
        assert!(info.object_flags.contains(ObjectFlags::REFERENCE));
        assert_eq!(info.target_name.as_deref(), Some("Array"));
        assert_eq!(info.type_arguments, vec![string]);
        assert_eq!(program.type_to_string(&array), "string[]");
    }

    #[test]
    fn intrinsics_are_shared() {
        let mut builder = ProgramBuilder::new();
        assert_eq!(builder.number(), builder.number());
    }

    #[test]
    fn compound_display_is_parenthesized() {
        let mut builder = ProgramBuilder::new();
        let a = builder.string();
        let b = builder.number();
        let union = builder.union(vec![a, b]);
        let array = builder.array_of(union);
        assert_eq!(builder.type_data(array).display, "(string | number)[]");
    }

    #[test]
    fn value_declaration_skips_interfaces() {
        let mut builder = ProgramBuilder::new();
        let symbol = builder.symbol("Shape", SymbolFlags::INTERFACE | SymbolFlags::CLASS);
        let pos = SourcePos::new("a.ts", 1, 2);
        builder.declare(symbol, Declaration::new(DeclarationKind::Interface, pos.clone()));
        builder.declare(symbol, Declaration::new(DeclarationKind::Class, pos));
        let program = builder.build();
        let value = program.value_declaration(&symbol).expect("value declaration");
        assert_eq!(value.kind, DeclarationKind::Class);
    }

    #[test]
    fn layout_rebases_output_paths() {
        let mut builder = ProgramBuilder::new();
        builder.set_layout(OutputLayout::new("src", "dist"));
        let program = builder.build();
        assert_eq!(
            program.output_path("src/geometry/point.ts", ".js"),
            PathBuf::from("dist/geometry/point.js")
        );
        assert_eq!(
            program.output_path("other/x.ts", "js"),
            PathBuf::from("other/x.js")
        );
    }

    #[test]
    fn json_snapshot_is_validated() {
        let mut builder = ProgramBuilder::new();
        let module = builder.add_file("a.ts");
        let missing = SymbolId(99);
        builder.export(module, "ghost", missing);
        let text = builder.build().to_json().expect("serialize");

        let error = Program::from_json(&text).expect_err("dangling export");
        assert!(matches!(error, DocsError::InvalidProgram { .. }));
    }

    #[test]
    fn json_snapshot_round_trips() {
        let mut builder = ProgramBuilder::new();
        let module = builder.add_file("a.ts");
        let value = builder.symbol("answer", SymbolFlags::VARIABLE);
        let number = builder.number();
        builder.set_type(value, number);
        builder.export(module, "answer", value);
        let program = builder.build();

        let restored = Program::from_json(&program.to_json().expect("serialize")).expect("parse");
        assert_eq!(restored, program);
    }
}
