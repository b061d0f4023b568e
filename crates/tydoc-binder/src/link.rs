//! Cross-file passes run once every source is lowered.
//!
//! Lowering records what each file declares and leaves names unresolved.
//! [`Binding::link`] then resolves star exports, alias targets and heritage
//! clauses, creates enum types, and materializes every recorded
//! [`TypeExpr`] into the program's type arena.

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use tracing::{debug, trace};
use tydoc::{
    Declaration, DeclarationKind, IndexSignatureInfo, LIB_FILE, LiteralValue, Program,
    ProgramBuilder, SignatureData, SignatureId, SourcePos, SymbolFlags, SymbolId, TypeFlags,
    TypeId,
};

use crate::resolve::resolve_module;
use crate::types::{LocalRef, TypeExpr, TypeName};

/// Longest alias chain followed while resolving a type name.
const MAX_ALIAS_CHAIN: usize = 64;
/// Nesting limit for expanding type aliases and inherited constructors.
const MAX_EXPANSION_DEPTH: usize = 16;

/// Declaration space a name is bound in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Scope {
    /// Top level of a script; names there are global.
    File(usize),
    /// A module or namespace symbol.
    Symbol(SymbolId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum SignatureOwner {
    /// Call signature of a function or method symbol.
    Call(SymbolId),
    /// Construct signature of a class or interface symbol.
    Construct(SymbolId),
}

#[derive(Debug)]
pub(crate) struct SignatureDraft {
    pub(crate) owner: SignatureOwner,
    pub(crate) parameters: Vec<SymbolId>,
    pub(crate) return_type: Option<TypeExpr>,
    pub(crate) pos: SourcePos,
    pub(crate) doc: String,
    pub(crate) has_body: bool,
}

#[derive(Debug)]
pub(crate) struct IndexDraft {
    pub(crate) symbol: SymbolId,
    pub(crate) declaration: usize,
    pub(crate) key: Option<TypeExpr>,
    pub(crate) value: Option<TypeExpr>,
}

#[derive(Debug)]
pub(crate) struct EnumDraft {
    pub(crate) symbol: SymbolId,
    /// Members in source order; `None` for computed values.
    pub(crate) members: Vec<(SymbolId, Option<LiteralValue>)>,
}

#[derive(Debug)]
pub(crate) struct HeritageDraft {
    pub(crate) symbol: SymbolId,
    pub(crate) declaration: usize,
    pub(crate) names: Vec<TypeName>,
}

#[derive(Debug)]
pub(crate) struct ClassDraft {
    pub(crate) symbol: SymbolId,
    /// Name in the `extends` clause.
    pub(crate) base: Option<TypeName>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ImportName {
    Named(String),
    Default,
    Namespace,
}

#[derive(Debug)]
pub(crate) enum AliasTarget {
    Name(TypeName),
    Module {
        from: String,
        specifier: String,
        import: ImportName,
    },
}

#[derive(Debug)]
pub(crate) struct AliasDraft {
    pub(crate) alias: SymbolId,
    pub(crate) target: AliasTarget,
}

#[derive(Debug)]
pub(crate) struct StarExportDraft {
    pub(crate) module: SymbolId,
    pub(crate) from: String,
    pub(crate) specifier: String,
}

/// Everything lowered so far, shared by all files of one bind.
#[derive(Debug, Default)]
pub(crate) struct Binding {
    pub(crate) builder: ProgramBuilder,
    /// Normalized source path to module symbol.
    pub(crate) modules: FxHashMap<String, SymbolId>,
    pub(crate) locals: FxHashMap<LocalRef, SymbolId>,
    pub(crate) named: FxHashMap<(Scope, String), SymbolId>,
    /// Top-level names of scripts, plus library types created on demand.
    pub(crate) globals: FxHashMap<String, SymbolId>,
    /// Declared types; the first entry for a symbol wins.
    pub(crate) symbol_types: Vec<(SymbolId, TypeExpr)>,
    pub(crate) type_aliases: FxHashMap<SymbolId, TypeExpr>,
    pub(crate) signatures: Vec<SignatureDraft>,
    pub(crate) indexes: Vec<IndexDraft>,
    pub(crate) enums: Vec<EnumDraft>,
    pub(crate) heritage: Vec<HeritageDraft>,
    pub(crate) classes: Vec<ClassDraft>,
    pub(crate) aliases: Vec<AliasDraft>,
    pub(crate) stars: Vec<StarExportDraft>,
}

impl Binding {
    pub(crate) fn new() -> Self {
        let builder = ProgramBuilder::new();
        let mut globals = FxHashMap::default();
        globals.insert("Array".to_string(), builder.array_symbol());
        Self {
            builder,
            globals,
            ..Self::default()
        }
    }

    /// Run the cross-file passes and produce the program.
    pub(crate) fn link(self) -> Program {
        let Binding {
            builder,
            modules,
            locals,
            globals,
            symbol_types,
            type_aliases,
            signatures,
            indexes,
            enums,
            heritage,
            classes,
            aliases,
            stars,
            ..
        } = self;

        let mut linker = Linker {
            builder,
            modules,
            locals,
            globals,
            type_aliases,
            instances: FxHashMap::default(),
            type_parameters: FxHashMap::default(),
            enum_types: FxHashMap::default(),
            alias_types: FxHashMap::default(),
            expansion_depth: 0,
        };

        linker.link_star_exports(&stars);
        linker.link_aliases(aliases);
        linker.link_heritage(heritage);
        linker.link_enums(enums);
        linker.link_symbol_types(symbol_types);
        linker.link_indexes(indexes);
        linker.link_signatures(signatures, &classes);

        linker.builder.build()
    }
}

struct Linker {
    builder: ProgramBuilder,
    modules: FxHashMap<String, SymbolId>,
    locals: FxHashMap<LocalRef, SymbolId>,
    globals: FxHashMap<String, SymbolId>,
    type_aliases: FxHashMap<SymbolId, TypeExpr>,
    instances: FxHashMap<SymbolId, TypeId>,
    type_parameters: FxHashMap<SymbolId, TypeId>,
    /// Enum types and enum member literal types.
    enum_types: FxHashMap<SymbolId, TypeId>,
    alias_types: FxHashMap<SymbolId, TypeId>,
    expansion_depth: usize,
}

impl Linker {
    /// Copy re-exported names into each `export *` module until nothing
    /// changes, so chains of star exports settle regardless of file order.
    fn link_star_exports(&mut self, stars: &[StarExportDraft]) {
        let edges: Vec<(SymbolId, SymbolId)> = stars
            .iter()
            .filter_map(|star| {
                let target = resolve_module(&self.modules, &star.from, &star.specifier);
                if target.is_none() {
                    debug!(from = %star.from, specifier = %star.specifier, "star export target not found");
                }
                target.map(|target| (star.module, target))
            })
            .collect();

        loop {
            let mut changed = false;
            for (module, target) in &edges {
                let exports: Vec<(String, SymbolId)> = self
                    .builder
                    .symbol_data(*target)
                    .exports
                    .iter()
                    .map(|(name, symbol)| (name.clone(), *symbol))
                    .collect();
                let table = &mut self.builder.symbol_mut(*module).exports;
                for (name, symbol) in exports {
                    if name == "default" || table.contains_key(&name) {
                        continue;
                    }
                    table.insert(name, symbol);
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }
    }

    fn link_aliases(&mut self, aliases: Vec<AliasDraft>) {
        for draft in aliases {
            let target = match &draft.target {
                AliasTarget::Name(name) => self.resolve_name(name, false),
                AliasTarget::Module {
                    from,
                    specifier,
                    import,
                } => resolve_module(&self.modules, from, specifier).and_then(|module| {
                    match import {
                        ImportName::Namespace => Some(module),
                        ImportName::Default => self.export_of(module, "default"),
                        ImportName::Named(name) => self.export_of(module, name),
                    }
                }),
            };

            match target {
                Some(target) if target != draft.alias => self.builder.alias(draft.alias, target),
                _ => {
                    let name = &self.builder.symbol_data(draft.alias).name;
                    debug!(alias = %name, "alias target not found");
                }
            }
        }
    }

    fn link_heritage(&mut self, heritage: Vec<HeritageDraft>) {
        for draft in heritage {
            let symbols: Vec<SymbolId> = draft
                .names
                .iter()
                .filter_map(|name| self.resolve_name(name, true))
                .collect();
            if let Some(declaration) = self
                .builder
                .symbol_mut(draft.symbol)
                .declarations
                .get_mut(draft.declaration)
            {
                declaration.heritage = symbols;
            }
        }
    }

    fn link_enums(&mut self, enums: Vec<EnumDraft>) {
        for draft in enums {
            let mut literals = Vec::with_capacity(draft.members.len());
            for (member, value) in draft.members {
                let ty = match value {
                    Some(value) => {
                        let ty = self.builder.enum_literal(member, value);
                        literals.push(ty);
                        ty
                    }
                    None => self.builder.number(),
                };
                self.builder.set_type(member, ty);
                self.enum_types.insert(member, ty);
            }
            let ty = self.builder.enum_type(draft.symbol, literals);
            self.builder.set_type(draft.symbol, ty);
            self.enum_types.insert(draft.symbol, ty);
        }
    }

    fn link_symbol_types(&mut self, symbol_types: Vec<(SymbolId, TypeExpr)>) {
        for (symbol, expr) in symbol_types {
            if self.builder.symbol_data(symbol).ty.is_some() {
                continue;
            }
            let ty = self.materialize(&expr);
            self.builder.set_type(symbol, ty);
        }
    }

    fn link_indexes(&mut self, indexes: Vec<IndexDraft>) {
        for draft in indexes {
            let key = draft.key.as_ref().map(|key| self.materialize(key));
            let value = draft.value.as_ref().map(|value| self.materialize(value));
            if let Some(declaration) = self
                .builder
                .symbol_mut(draft.symbol)
                .declarations
                .get_mut(draft.declaration)
            {
                declaration.index = Some(IndexSignatureInfo { key, value });
            }
        }
    }

    /// Materialize signatures and attach the types that carry them.
    ///
    /// When an owner has bodiless overloads, its implementation signature is
    /// hidden. Classes without a constructor inherit their base class's
    /// construct signatures, or get an implicit parameterless one.
    fn link_signatures(&mut self, drafts: Vec<SignatureDraft>, classes: &[ClassDraft]) {
        let mut grouped: IndexMap<SignatureOwner, Vec<SignatureDraft>> = IndexMap::new();
        for draft in drafts {
            grouped.entry(draft.owner).or_default().push(draft);
        }

        let mut constructors: FxHashMap<SymbolId, Vec<SignatureId>> = FxHashMap::default();

        for (owner, drafts) in grouped {
            let overloaded = drafts.iter().any(|draft| !draft.has_body);
            let mut signatures = Vec::with_capacity(drafts.len());
            for draft in drafts {
                if overloaded && draft.has_body {
                    trace!(?owner, "implementation signature hidden by overloads");
                    continue;
                }
                let return_type = match (&draft.return_type, owner) {
                    (Some(expr), _) => self.materialize(expr),
                    (None, SignatureOwner::Construct(symbol)) => self.instance(symbol),
                    (None, SignatureOwner::Call(_)) => self.builder.any(),
                };
                let mut data = SignatureData::new(draft.parameters, return_type);
                data.pos = Some(draft.pos);
                data.doc = draft.doc;
                signatures.push(self.builder.signature(data));
            }

            match owner {
                SignatureOwner::Call(symbol) => {
                    let display = format!("typeof {}", self.builder.symbol_data(symbol).name);
                    let ty = self.builder.function_type(display, signatures);
                    self.builder.set_type(symbol, ty);
                }
                SignatureOwner::Construct(symbol) => {
                    let flags = self.builder.symbol_data(symbol).flags;
                    if flags.contains(SymbolFlags::CLASS) {
                        constructors.insert(symbol, signatures);
                    } else {
                        let instance = self.instance(symbol);
                        for signature in signatures {
                            self.builder.add_construct_signature(instance, signature);
                        }
                    }
                }
            }
        }

        let bases: FxHashMap<SymbolId, TypeName> = classes
            .iter()
            .filter_map(|class| class.base.clone().map(|base| (class.symbol, base)))
            .collect();

        for class in classes {
            let signatures = self.construct_signatures(class.symbol, &bases, &mut constructors, 0);
            let ty = self.builder.constructor_type(class.symbol, signatures);
            self.builder.set_type(class.symbol, ty);
        }
    }

    fn construct_signatures(
        &mut self,
        class: SymbolId,
        bases: &FxHashMap<SymbolId, TypeName>,
        constructors: &mut FxHashMap<SymbolId, Vec<SignatureId>>,
        depth: usize,
    ) -> Vec<SignatureId> {
        if let Some(signatures) = constructors.get(&class) {
            return signatures.clone();
        }

        let base = bases
            .get(&class)
            .and_then(|name| self.resolve_name(name, false))
            .map(|base| self.follow(base))
            .filter(|base| {
                *base != class && self.builder.symbol_data(*base).flags.contains(SymbolFlags::CLASS)
            });

        let instance = self.instance(class);
        let signatures = match base {
            Some(base) if depth < MAX_EXPANSION_DEPTH => {
                let inherited = self.construct_signatures(base, bases, constructors, depth + 1);
                let program_signatures: Vec<SignatureData> = inherited
                    .iter()
                    .map(|id| self.builder.signature_data(*id).clone())
                    .collect();
                program_signatures
                    .into_iter()
                    .map(|mut data| {
                        data.return_type = instance;
                        self.builder.signature(data)
                    })
                    .collect()
            }
            _ => vec![self.builder.signature(SignatureData::new(Vec::new(), instance))],
        };

        constructors.insert(class, signatures.clone());
        signatures
    }

    fn materialize(&mut self, expr: &TypeExpr) -> TypeId {
        match expr {
            TypeExpr::Keyword(flags, name) => self.builder.intrinsic(*flags, name),
            TypeExpr::StringLiteral(value) => self.builder.string_literal(value.clone()),
            TypeExpr::NumberLiteral(value) => self.builder.number_literal(*value),
            TypeExpr::BooleanLiteral(value) => {
                let name = if *value { "true" } else { "false" };
                self.builder.intrinsic(TypeFlags::BOOLEAN_LITERAL, name)
            }
            TypeExpr::Reference {
                name,
                target,
                arguments,
            } => self.materialize_reference(name, target, arguments),
            TypeExpr::Instance(symbol) => self.instance(*symbol),
            TypeExpr::Array(element) => {
                let element = self.materialize(element);
                self.builder.array_of(element)
            }
            TypeExpr::Union(members) => {
                let members = self.materialize_all(members);
                self.builder.union(members)
            }
            TypeExpr::Intersection(members) => {
                let members = self.materialize_all(members);
                self.builder.intersection(members)
            }
            TypeExpr::Tuple(elements) => {
                let elements = self.materialize_all(elements);
                self.builder.tuple(elements)
            }
            TypeExpr::This(Some(owner)) => self.builder.this_type(*owner),
            TypeExpr::This(None) => self.builder.any(),
            TypeExpr::Opaque(display) => self.builder.anonymous(display.clone()),
        }
    }

    fn materialize_all(&mut self, exprs: &[TypeExpr]) -> Vec<TypeId> {
        exprs.iter().map(|expr| self.materialize(expr)).collect()
    }

    fn materialize_reference(
        &mut self,
        name: &str,
        target: &TypeName,
        arguments: &[TypeExpr],
    ) -> TypeId {
        let Some(symbol) = self.resolve_name(target, true).map(|symbol| self.follow(symbol)) else {
            return self.builder.anonymous(name);
        };

        if symbol == self.builder.array_symbol() && arguments.len() == 1 {
            let element = self.materialize(&arguments[0]);
            return self.builder.array_of(element);
        }

        let flags = self.builder.symbol_data(symbol).flags;
        if flags.intersects(SymbolFlags::ENUM | SymbolFlags::ENUM_MEMBER) {
            if let Some(ty) = self.enum_types.get(&symbol) {
                return *ty;
            }
        }
        if flags.intersects(SymbolFlags::CLASS | SymbolFlags::INTERFACE) {
            if arguments.is_empty() {
                return self.instance(symbol);
            }
            let arguments = self.materialize_all(arguments);
            return self.builder.reference(symbol, arguments);
        }
        if flags.contains(SymbolFlags::TYPE_PARAMETER) {
            if let Some(ty) = self.type_parameters.get(&symbol) {
                return *ty;
            }
            let ty = self.builder.type_parameter(symbol);
            self.type_parameters.insert(symbol, ty);
            return ty;
        }
        if flags.contains(SymbolFlags::TYPE_ALIAS) {
            return self.expand_alias(symbol, name);
        }

        trace!(name, ?flags, "type reference to a value, kept opaque");
        self.builder.anonymous(name)
    }

    fn expand_alias(&mut self, symbol: SymbolId, name: &str) -> TypeId {
        if let Some(ty) = self.alias_types.get(&symbol) {
            return *ty;
        }
        let Some(expr) = self.type_aliases.get(&symbol).cloned() else {
            return self.builder.anonymous(name);
        };
        if self.expansion_depth >= MAX_EXPANSION_DEPTH {
            debug!(alias = name, "type alias expansion too deep, kept opaque");
            return self.builder.anonymous(name);
        }

        self.expansion_depth += 1;
        let ty = self.materialize(&expr);
        self.expansion_depth -= 1;

        self.alias_types.insert(symbol, ty);
        ty
    }

    fn instance(&mut self, symbol: SymbolId) -> TypeId {
        if let Some(ty) = self.instances.get(&symbol) {
            return *ty;
        }
        let ty = self.builder.reference(symbol, Vec::new());
        self.instances.insert(symbol, ty);
        ty
    }

    /// Symbol a name refers to. Unknown globals become library interfaces
    /// when `create_globals` is set.
    fn resolve_name(&mut self, name: &TypeName, create_globals: bool) -> Option<SymbolId> {
        match name {
            TypeName::Local(local) => self.locals.get(local).copied(),
            TypeName::Qualified(left, right) => {
                let left = self.resolve_name(left, false)?;
                let left = self.follow(left);
                self.export_of(left, right)
            }
            TypeName::Global(name) => match self.globals.get(name) {
                Some(symbol) => Some(*symbol),
                None if create_globals => Some(self.library_global(name)),
                None => None,
            },
        }
    }

    fn library_global(&mut self, name: &str) -> SymbolId {
        let symbol = self.builder.symbol(name, SymbolFlags::INTERFACE);
        self.builder.declare(
            symbol,
            Declaration::new(DeclarationKind::Interface, SourcePos::new(LIB_FILE, 1, 1)),
        );
        self.globals.insert(name.to_string(), symbol);
        trace!(name, "library global created");
        symbol
    }

    fn export_of(&self, module: SymbolId, name: &str) -> Option<SymbolId> {
        self.builder.symbol_data(module).exports.get(name).copied()
    }

    /// End of an alias chain, or the last symbol reached before a cycle.
    fn follow(&self, mut symbol: SymbolId) -> SymbolId {
        let mut seen = Vec::new();
        while let Some(target) = self.builder.symbol_data(symbol).alias_of {
            if seen.contains(&target) || seen.len() >= MAX_ALIAS_CHAIN {
                break;
            }
            seen.push(symbol);
            symbol = target;
        }
        symbol
    }
}
