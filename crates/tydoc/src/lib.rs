#![deny(clippy::all)]

//! Documentation model extraction for TypeScript programs.
//!
//! This crate provides:
//! - The [`Host`] trait over a compiled program's symbol and type service.
//! - An in-memory, serializable [`Program`] snapshot implementing it.
//! - A walker that turns exported symbols into a [`Documentation`] model of
//!   classes, interfaces, enums, functions and variables, with every mention
//!   of a declaration sharing one reference record.
//! - Formatting of described types back to TypeScript syntax, and JSON output.

pub mod builders;
pub mod describe;
pub mod error;
pub mod extractor;
pub mod format;
pub mod host;
pub mod json;
pub mod model;
pub mod program;
pub mod registry;

pub use builders::{DeclarationClass, classify_declaration};
pub use describe::{TypeDescriber, TypeShape, classify};
pub use error::{DocsError, Result};
pub use extractor::{DEFAULT_MAX_ALIAS_DEPTH, DocsExtractor, ExtractOptions, NameFilter, extract};
pub use format::{DefaultHooks, FormatHooks, TypeFormatter, format_type};
pub use host::{
    DeclarationInfo, DeclarationKind, Host, IndexSignatureInfo, LiteralValue, ModifierFlags,
    ObjectFlags, SourceFile, SourcePos, SymbolFlags, TypeFlags, TypeInfo,
};
pub use json::{render_json, to_json};
pub use model::{
    ClassId, ClassKind, ClassSpec, Documentation, EnumId, EnumSpec, FunctionSpec, IdentifierSpec,
    IndexSpec, ModuleSpec, RefId, RefSpec, RefTarget, SignatureSpec, TypeSpec, UnsupportedKind,
};
pub use program::{
    Declaration, FileData, LIB_FILE, OutputLayout, Program, ProgramBuilder, SignatureData,
    SignatureId, SymbolData, SymbolId, TypeData, TypeId,
};
pub use registry::SymbolRegistry;
