use std::fmt;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::describe::TypeDescriber;
use crate::error::{DocsError, Result};
use crate::host::{DeclarationInfo, DeclarationKind, Host, SourcePos, SymbolFlags};
use crate::model::{
    ClassId, ClassSpec, Documentation, EnumSpec, ModuleSpec, RefId, RefTarget, TypeSpec,
};
use crate::registry::SymbolRegistry;

/// Alias chains longer than this are rejected unless configured otherwise.
pub const DEFAULT_MAX_ALIAS_DEPTH: usize = 64;

/// Predicate over emitted output paths deciding which sources to document.
pub type NameFilter = Arc<dyn Fn(&Path) -> bool + Send + Sync>;

/// Options controlling documentation extraction.
#[derive(Clone)]
pub struct ExtractOptions {
    /// Called with each source's output path. Only consulted together with
    /// `extension`.
    pub name_filter: Option<NameFilter>,
    /// Extension of emitted files, e.g. `.js`.
    pub extension: Option<String>,
    /// Maximum number of alias hops followed for one export.
    pub max_alias_depth: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            name_filter: None,
            extension: None,
            max_alias_depth: DEFAULT_MAX_ALIAS_DEPTH,
        }
    }
}

impl fmt::Debug for ExtractOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractOptions")
            .field("name_filter", &self.name_filter.as_ref().map(|_| "<fn>"))
            .field("extension", &self.extension)
            .field("max_alias_depth", &self.max_alias_depth)
            .finish()
    }
}

impl ExtractOptions {
    pub fn with_name_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&Path) -> bool + Send + Sync + 'static,
    {
        self.name_filter = Some(Arc::new(filter));
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }

    pub fn with_max_alias_depth(mut self, depth: usize) -> Self {
        self.max_alias_depth = depth;
        self
    }
}

/// Extracts the documentation model from a program through its [`Host`].
#[derive(Debug, Clone, Default)]
pub struct DocsExtractor {
    options: ExtractOptions,
}

impl DocsExtractor {
    /// Create a new extractor with the provided options.
    pub fn new(options: ExtractOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Walk every source file except the default library and build one
    /// module record per resolved export.
    pub fn extract<H: Host>(&self, host: &H) -> Result<Documentation> {
        let mut walker = Walker::new(host, &self.options);
        let mut modules = Vec::new();

        for file in host.source_files().into_iter().skip(1) {
            if !self.accepts(host, &file.path) {
                debug!(source = %file.path, "source rejected by name filter");
                continue;
            }

            let Some(module_symbol) = file.symbol else {
                debug!(source = %file.path, "source is not a module");
                continue;
            };

            let mut exports = host.exports(&module_symbol);
            exports.sort_by(|(left, _), (right, _)| left.cmp(right));

            for (name, symbol) in exports {
                trace!(source = %file.path, export = %name, "visiting export");

                let Some(symbol) = walker.resolve_alias(&name, symbol)? else {
                    debug!(export = %name, "alias does not resolve, skipping");
                    continue;
                };

                let view = walker.view(symbol);
                if view.declaration.is_none() {
                    debug!(export = %name, "export has no declaration, skipping");
                    continue;
                }

                let mut module = ModuleSpec::new();
                walker.assemble(&view, &mut module)?;
                modules.push(module);
            }
        }

        let mut documentation = walker.finish();
        documentation.modules = modules;
        debug!(
            modules = documentation.modules.len(),
            classes = documentation.classes.len(),
            enums = documentation.enums.len(),
            refs = documentation.refs.len(),
            "extraction finished"
        );
        Ok(documentation)
    }

    fn accepts<H: Host>(&self, host: &H, source_path: &str) -> bool {
        match (&self.options.name_filter, &self.options.extension) {
            (Some(filter), Some(extension)) => filter(&host.output_path(source_path, extension)),
            _ => true,
        }
    }
}

/// Extract with the given options.
pub fn extract<H: Host>(host: &H, options: &ExtractOptions) -> Result<Documentation> {
    DocsExtractor::new(options.clone()).extract(host)
}

/// A symbol together with the declaration the extractor treats as its own.
pub(crate) struct SymbolView<H: Host> {
    pub(crate) symbol: H::Symbol,
    pub(crate) name: String,
    pub(crate) declaration: Option<DeclarationInfo<H::Symbol, H::Type>>,
    pub(crate) ty: Option<H::Type>,
    pub(crate) pos: Option<SourcePos>,
    pub(crate) doc: Option<String>,
}

impl<H: Host> SymbolView<H> {
    pub(crate) fn kind(&self) -> Option<DeclarationKind> {
        self.declaration.as_ref().map(|declaration| declaration.kind)
    }
}

/// State of one extraction run.
pub(crate) struct Walker<'a, H: Host> {
    pub(crate) host: &'a H,
    options: &'a ExtractOptions,
    pub(crate) registry: SymbolRegistry<H::Symbol>,
    pub(crate) classes: Vec<ClassSpec>,
    pub(crate) enums: Vec<EnumSpec>,
    /// Heritage references per class, linked once every class is built.
    pub(crate) pending_extends: Vec<(ClassId, Vec<RefId>)>,
}

impl<'a, H: Host> Walker<'a, H> {
    pub(crate) fn new(host: &'a H, options: &'a ExtractOptions) -> Self {
        Self {
            host,
            options,
            registry: SymbolRegistry::new(),
            classes: Vec::new(),
            enums: Vec::new(),
            pending_extends: Vec::new(),
        }
    }

    /// Follow alias hops until a non-alias symbol. `None` when an alias has
    /// no target.
    pub(crate) fn resolve_alias(
        &self,
        name: &str,
        symbol: H::Symbol,
    ) -> Result<Option<H::Symbol>> {
        let mut current = symbol;
        let mut chain: Vec<H::Symbol> = Vec::new();

        while self.host.symbol_flags(&current).contains(SymbolFlags::ALIAS) {
            if chain.len() >= self.options.max_alias_depth {
                return Err(DocsError::AliasDepthExceeded {
                    name: name.to_string(),
                    limit: self.options.max_alias_depth,
                });
            }

            let Some(target) = self.host.aliased_symbol(&current) else {
                return Ok(None);
            };
            chain.push(current);

            if chain.contains(&target) {
                let mut names: Vec<String> = chain
                    .iter()
                    .map(|symbol| self.host.symbol_name(symbol))
                    .collect();
                names.push(self.host.symbol_name(&target));
                return Err(DocsError::alias_cycle(name, names));
            }

            current = target;
        }

        Ok(Some(current))
    }

    /// Pick the declaration, type, position and documentation of `symbol`.
    ///
    /// The value declaration wins, except that interfaces (no value
    /// declaration) and enums merged with namespaces (value declaration is the
    /// namespace) fall back to the first declaration.
    pub(crate) fn view(&self, symbol: H::Symbol) -> SymbolView<H> {
        let mut declaration = self.host.value_declaration(&symbol);

        if declaration
            .as_ref()
            .is_none_or(|declaration| declaration.kind == DeclarationKind::Module)
        {
            let first = self.host.declarations(&symbol).into_iter().next();
            let first_is_interface = first
                .as_ref()
                .is_some_and(|first| first.kind == DeclarationKind::Interface);
            if declaration.is_none() || first_is_interface {
                declaration = first;
            }
        }

        let (ty, pos) = match &declaration {
            Some(declaration) => (
                self.host.type_of_symbol_at(&symbol, declaration),
                Some(declaration.pos.clone()),
            ),
            None => (None, None),
        };

        let doc = non_empty(self.host.documentation(&symbol));

        SymbolView {
            name: self.host.symbol_name(&symbol),
            symbol,
            declaration,
            ty,
            pos,
            doc,
        }
    }

    pub(crate) fn describe(&mut self, ty: &H::Type) -> TypeSpec {
        TypeDescriber::new(self.host, &mut self.registry).describe(ty)
    }

    /// Link heritage references now that every class is built, then hand
    /// the arenas over.
    pub(crate) fn finish(mut self) -> Documentation {
        for (class, references) in std::mem::take(&mut self.pending_extends) {
            for reference in references {
                let Some(RefTarget::Class(base)) = self.registry.get(reference).target
                else {
                    debug!(
                        class = %self.classes[class.index()].name,
                        base = %self.registry.get(reference).name,
                        "heritage clause names a declaration outside the documented set"
                    );
                    continue;
                };
                let extends = &mut self.classes[class.index()].extend_list;
                if base != class && !extends.contains(&base) {
                    extends.push(base);
                }
            }
        }

        Documentation {
            modules: Vec::new(),
            classes: self.classes,
            enums: self.enums,
            refs: self.registry.into_refs(),
        }
    }
}

pub(crate) fn non_empty(text: String) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
