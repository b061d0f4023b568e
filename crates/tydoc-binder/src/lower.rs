//! Per-file lowering from the OXC syntax tree into symbols and drafts.

use std::path::PathBuf;

use oxc_allocator::Allocator;
use oxc_ast::ast::{
    BindingIdentifier, BindingPattern, BindingPatternKind, Class, ClassElement, Comment,
    Declaration, ExportAllDeclaration, ExportDefaultDeclaration, ExportDefaultDeclarationKind,
    ExportNamedDeclaration, Expression, FormalParameters, Function, IdentifierReference,
    ImportDeclaration, ImportDeclarationSpecifier, MethodDefinition, MethodDefinitionKind,
    ModuleExportName, PropertyDefinition, PropertyKey, Statement, TSAccessibility,
    TSEnumDeclaration, TSEnumMemberName, TSIndexSignature, TSInterfaceDeclaration, TSLiteral,
    TSLiteralType, TSMethodSignatureKind, TSModuleDeclaration, TSModuleDeclarationBody,
    TSModuleDeclarationName, TSSignature, TSType, TSTypeAliasDeclaration, TSTypeAnnotation,
    TSTypeName, TSTypeParameterDeclaration, TSTypeReference, VariableDeclaration,
    VariableDeclarationKind,
};
use oxc_parser::Parser;
use oxc_semantic::{Scoping, SemanticBuilder};
use oxc_span::{GetSpan, SourceType, Span};
use rustc_hash::FxHashMap;
use tracing::trace;
use tydoc::{
    Declaration as DeclarationData, DeclarationKind, LiteralValue, ModifierFlags, SourcePos,
    SymbolFlags, SymbolId,
};

use crate::error::{BindError, Result};
use crate::jsdoc::{ParsedJsDoc, parse_jsdoc};
use crate::lines::LineIndex;
use crate::link::{
    AliasDraft, AliasTarget, Binding, ClassDraft, EnumDraft, HeritageDraft, ImportName,
    IndexDraft, Scope, SignatureDraft, SignatureOwner, StarExportDraft,
};
use crate::types::{LocalRef, TypeExpr, TypeName};

/// Name of the member holding a class or interface index signature.
pub(crate) const INDEX_MEMBER: &str = "__index";

/// How a declaration statement is exported from its container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visibility {
    Local,
    Exported,
    Default,
}

impl Visibility {
    fn modifiers(self) -> ModifierFlags {
        match self {
            Visibility::Local => ModifierFlags::empty(),
            Visibility::Exported => ModifierFlags::EXPORT,
            Visibility::Default => ModifierFlags::EXPORT | ModifierFlags::DEFAULT,
        }
    }
}

/// Parse one source and lower it into `binding`.
pub(crate) fn lower_source(binding: &mut Binding, file: usize, path: &str, text: &str) -> Result<()> {
    let allocator = Allocator::default();
    let source_type = SourceType::from_path(path).unwrap_or_else(|_| SourceType::ts());
    let parsed = Parser::new(&allocator, text, source_type).parse();

    if !parsed.errors.is_empty() {
        let diagnostics: Vec<String> = parsed.errors.iter().map(|error| error.to_string()).collect();
        return Err(BindError::parse_error(PathBuf::from(path), &diagnostics));
    }

    let program = &parsed.program;
    let semantic = SemanticBuilder::new().build(program).semantic;

    let is_module = program.body.iter().any(is_module_syntax);
    let scope = if is_module {
        let module = binding.builder.add_file(path);
        binding.modules.insert(path.to_string(), module);
        Scope::Symbol(module)
    } else {
        binding.builder.add_script(path);
        Scope::File(file)
    };
    trace!(source = path, is_module, "lowering source");

    let mut lowering = FileLowering {
        file,
        path,
        source: text,
        lines: LineIndex::new(text),
        comments: build_comment_map(program.comments.iter()),
        scoping: semantic.scoping(),
        binding,
        this_owner: None,
    };
    lowering.lower_statements(&program.body, scope);

    Ok(())
}

fn is_module_syntax(statement: &Statement<'_>) -> bool {
    matches!(
        statement,
        Statement::ImportDeclaration(_)
            | Statement::ExportAllDeclaration(_)
            | Statement::ExportDefaultDeclaration(_)
            | Statement::ExportNamedDeclaration(_)
            | Statement::TSExportAssignment(_)
    )
}

/// JSDoc content spans keyed by the start of the node they document.
fn build_comment_map<'a, I>(comments: I) -> FxHashMap<u32, Span>
where
    I: IntoIterator<Item = &'a Comment>,
{
    let mut map = FxHashMap::default();
    for comment in comments {
        if comment.is_jsdoc() {
            map.insert(comment.attached_to, comment.content_span());
        }
    }
    map
}

struct FileLowering<'s> {
    file: usize,
    path: &'s str,
    source: &'s str,
    lines: LineIndex,
    comments: FxHashMap<u32, Span>,
    scoping: &'s Scoping,
    binding: &'s mut Binding,
    /// Class or interface whose body is being lowered, for `this` types.
    this_owner: Option<SymbolId>,
}

impl FileLowering<'_> {
    fn lower_statements(&mut self, statements: &[Statement<'_>], scope: Scope) {
        for statement in statements {
            self.lower_statement(statement, scope);
        }
    }

    fn lower_statement(&mut self, statement: &Statement<'_>, scope: Scope) {
        match statement {
            Statement::ExportNamedDeclaration(export) => self.lower_export_named(export, scope),
            Statement::ExportDefaultDeclaration(export) => self.lower_export_default(export, scope),
            Statement::ExportAllDeclaration(export) => self.lower_export_all(export, scope),
            Statement::ImportDeclaration(import) => self.lower_import(import, scope),
            Statement::TSExportAssignment(_) => {
                trace!(source = self.path, "`export =` assignment skipped");
            }
            _ => {
                if let Some(declaration) = statement.as_declaration() {
                    self.lower_declaration(declaration, scope, Visibility::Local, statement.span());
                }
            }
        }
    }

    fn lower_declaration(
        &mut self,
        declaration: &Declaration<'_>,
        scope: Scope,
        visibility: Visibility,
        outer: Span,
    ) {
        match declaration {
            Declaration::VariableDeclaration(variable) => {
                self.lower_variables(variable, scope, visibility, outer)
            }
            Declaration::FunctionDeclaration(function) => {
                self.lower_function(function, scope, visibility, outer)
            }
            Declaration::ClassDeclaration(class) => self.lower_class(class, scope, visibility, outer),
            Declaration::TSTypeAliasDeclaration(alias) => {
                self.lower_type_alias(alias, scope, visibility, outer)
            }
            Declaration::TSInterfaceDeclaration(interface) => {
                self.lower_interface(interface, scope, visibility, outer)
            }
            Declaration::TSEnumDeclaration(enumeration) => {
                self.lower_enum(enumeration, scope, visibility, outer)
            }
            Declaration::TSModuleDeclaration(module) => {
                self.lower_namespace(module, scope, visibility, outer)
            }
            Declaration::TSImportEqualsDeclaration(_) => {
                trace!(source = self.path, "import-equals declaration skipped");
            }
            Declaration::TSGlobalDeclaration(_) => {
                trace!(source = self.path, "global augmentation skipped");
            }
        }
    }

    fn lower_export_named(&mut self, export: &ExportNamedDeclaration<'_>, scope: Scope) {
        if let Some(declaration) = &export.declaration {
            self.lower_declaration(declaration, scope, Visibility::Exported, export.span);
            return;
        }

        let Scope::Symbol(container) = scope else {
            return;
        };

        for specifier in &export.specifiers {
            let exported = specifier.exported.name().to_string();
            let local = specifier.local.name().to_string();

            let target = match &export.source {
                Some(source) => AliasTarget::Module {
                    from: self.path.to_string(),
                    specifier: source.value.to_string(),
                    import: import_name(&local),
                },
                None => match &specifier.local {
                    ModuleExportName::IdentifierReference(ident) => {
                        AliasTarget::Name(self.reference(ident))
                    }
                    _ => AliasTarget::Name(TypeName::Global(local)),
                },
            };

            let alias = self.binding.builder.symbol(exported.clone(), SymbolFlags::ALIAS);
            self.declare(
                alias,
                DeclarationKind::ExportSpecifier,
                specifier.span,
                ModifierFlags::EXPORT,
            );
            self.binding.aliases.push(AliasDraft { alias, target });
            self.binding.builder.export(container, exported, alias);
        }
    }

    fn lower_export_default(&mut self, export: &ExportDefaultDeclaration<'_>, scope: Scope) {
        let outer = export.span;
        match &export.declaration {
            ExportDefaultDeclarationKind::FunctionDeclaration(function) => {
                self.lower_function(function, scope, Visibility::Default, outer)
            }
            ExportDefaultDeclarationKind::ClassDeclaration(class) => {
                self.lower_class(class, scope, Visibility::Default, outer)
            }
            ExportDefaultDeclarationKind::TSInterfaceDeclaration(interface) => {
                self.lower_interface(interface, scope, Visibility::Default, outer)
            }
            ExportDefaultDeclarationKind::Identifier(ident) => {
                let Scope::Symbol(container) = scope else {
                    return;
                };
                let alias = self.binding.builder.symbol("default", SymbolFlags::ALIAS);
                self.declare(alias, DeclarationKind::ExportSpecifier, outer, Visibility::Default.modifiers());
                let target = AliasTarget::Name(self.reference(ident));
                self.binding.aliases.push(AliasDraft { alias, target });
                self.binding.builder.export(container, "default", alias);
            }
            other => {
                let Scope::Symbol(container) = scope else {
                    return;
                };
                let symbol = self.binding.builder.symbol("default", SymbolFlags::VARIABLE);
                self.declare(symbol, DeclarationKind::Variable, outer, Visibility::Default.modifiers());
                let doc = self.doc_at(outer.start);
                self.attach_doc(symbol, doc.summary());
                let ty = other
                    .as_expression()
                    .and_then(|expression| self.infer(expression, true))
                    .unwrap_or(TypeExpr::ANY);
                self.binding.symbol_types.push((symbol, ty));
                self.binding.builder.export(container, "default", symbol);
            }
        }
    }

    fn lower_export_all(&mut self, export: &ExportAllDeclaration<'_>, scope: Scope) {
        let Scope::Symbol(module) = scope else {
            return;
        };
        let specifier = export.source.value.to_string();

        match &export.exported {
            Some(name) => {
                let name = name.name().to_string();
                let alias = self.binding.builder.symbol(name.clone(), SymbolFlags::ALIAS);
                self.declare(alias, DeclarationKind::ExportSpecifier, export.span, ModifierFlags::EXPORT);
                self.binding.aliases.push(AliasDraft {
                    alias,
                    target: AliasTarget::Module {
                        from: self.path.to_string(),
                        specifier,
                        import: ImportName::Namespace,
                    },
                });
                self.binding.builder.export(module, name, alias);
            }
            None => self.binding.stars.push(StarExportDraft {
                module,
                from: self.path.to_string(),
                specifier,
            }),
        }
    }

    fn lower_import(&mut self, import: &ImportDeclaration<'_>, scope: Scope) {
        let Some(specifiers) = &import.specifiers else {
            return;
        };

        for specifier in specifiers {
            let (local, name) = match specifier {
                ImportDeclarationSpecifier::ImportSpecifier(specifier) => {
                    (&specifier.local, import_name(specifier.imported.name().as_str()))
                }
                ImportDeclarationSpecifier::ImportDefaultSpecifier(specifier) => {
                    (&specifier.local, ImportName::Default)
                }
                ImportDeclarationSpecifier::ImportNamespaceSpecifier(specifier) => {
                    (&specifier.local, ImportName::Namespace)
                }
            };

            let alias = self.bind_named(scope, local.name.as_str(), SymbolFlags::ALIAS, Some(local));
            self.declare(alias, DeclarationKind::Import, specifier.span(), ModifierFlags::empty());
            self.binding.aliases.push(AliasDraft {
                alias,
                target: AliasTarget::Module {
                    from: self.path.to_string(),
                    specifier: import.source.value.to_string(),
                    import: name,
                },
            });
        }
    }

    fn lower_variables(
        &mut self,
        variable: &VariableDeclaration<'_>,
        scope: Scope,
        visibility: Visibility,
        outer: Span,
    ) {
        let doc = self.doc_at(outer.start);
        let is_const = matches!(variable.kind, VariableDeclarationKind::Const);
        let mut modifiers = visibility.modifiers();
        if variable.declare {
            modifiers |= ModifierFlags::DECLARE;
        }

        for declarator in &variable.declarations {
            let BindingPatternKind::BindingIdentifier(ident) = &declarator.id.kind else {
                trace!(source = self.path, "destructuring declaration skipped");
                continue;
            };
            let name = ident.name.as_str();
            let symbol = self.bind_named(scope, name, SymbolFlags::VARIABLE, Some(ident));

            let span = if variable.declarations.len() == 1 {
                outer
            } else {
                declarator.span
            };
            self.declare(symbol, DeclarationKind::Variable, span, modifiers);
            self.attach_doc(symbol, doc.summary());

            let ty = match &declarator.id.type_annotation {
                Some(annotation) => Some(self.annotation(annotation)),
                None => declarator
                    .init
                    .as_ref()
                    .and_then(|init| self.infer(init, is_const)),
            };
            self.binding
                .symbol_types
                .push((symbol, ty.unwrap_or(TypeExpr::ANY)));
            self.publish(scope, visibility, name, symbol);
        }
    }

    fn lower_function(
        &mut self,
        function: &Function<'_>,
        scope: Scope,
        visibility: Visibility,
        outer: Span,
    ) {
        let name = function
            .id
            .as_ref()
            .map_or("default", |id| id.name.as_str())
            .to_string();
        let symbol = self.bind_named(scope, &name, SymbolFlags::FUNCTION, function.id.as_ref());

        let mut modifiers = visibility.modifiers();
        if function.declare {
            modifiers |= ModifierFlags::DECLARE;
        }
        if function.r#async {
            modifiers |= ModifierFlags::ASYNC;
        }
        self.declare(symbol, DeclarationKind::Function, outer, modifiers);

        let doc = self.doc_at(outer.start);
        self.attach_doc(symbol, doc.summary());
        self.publish(scope, visibility, &name, symbol);

        self.lower_call_signature(symbol, function, outer, &doc);
    }

    fn lower_class(&mut self, class: &Class<'_>, scope: Scope, visibility: Visibility, outer: Span) {
        let name = class
            .id
            .as_ref()
            .map_or("default", |id| id.name.as_str())
            .to_string();
        let symbol = self.bind_named(scope, &name, SymbolFlags::CLASS, class.id.as_ref());

        let mut modifiers = visibility.modifiers();
        if class.r#abstract {
            modifiers |= ModifierFlags::ABSTRACT;
        }
        if class.declare {
            modifiers |= ModifierFlags::DECLARE;
        }
        let declaration = self.declare(symbol, DeclarationKind::Class, outer, modifiers);

        let doc = self.doc_at(outer.start);
        self.attach_doc(symbol, doc.summary());
        self.publish(scope, visibility, &name, symbol);

        let base = class
            .super_class
            .as_ref()
            .and_then(|expression| self.expression_name(expression));
        let mut names: Vec<TypeName> = base.iter().cloned().collect();
        names.extend(
            class
                .implements
                .iter()
                .filter_map(|implements| self.type_name(&implements.expression)),
        );
        if !names.is_empty() {
            self.binding.heritage.push(HeritageDraft {
                symbol,
                declaration,
                names,
            });
        }
        self.binding.classes.push(ClassDraft { symbol, base });

        let previous = self.this_owner.replace(symbol);
        self.bind_type_parameters(class.type_parameters.as_deref());
        for element in &class.body.body {
            match element {
                ClassElement::MethodDefinition(method) => self.lower_method(symbol, method),
                ClassElement::PropertyDefinition(property) => self.lower_property(symbol, property),
                ClassElement::TSIndexSignature(index) => self.lower_index_signature(symbol, index),
                _ => trace!(class = %name, "class element skipped"),
            }
        }
        self.this_owner = previous;
    }

    fn lower_method(&mut self, class: SymbolId, method: &MethodDefinition<'_>) {
        let doc = self.doc_at(method.span.start);
        let function = &method.value;

        if matches!(method.kind, MethodDefinitionKind::Constructor) {
            self.bind_type_parameters(function.type_parameters.as_deref());
            let parameters = self.lower_parameters(&function.params, &doc, Some(class));
            self.binding.signatures.push(SignatureDraft {
                owner: SignatureOwner::Construct(class),
                parameters,
                return_type: None,
                pos: self.pos(method.span),
                doc: doc.summary().to_string(),
                has_body: function.body.is_some(),
            });
            return;
        }

        let Some(name) = member_name(&method.key) else {
            trace!("computed method name skipped");
            return;
        };
        let modifiers = member_modifiers(
            method.accessibility,
            method.r#static,
            false,
            matches!(method.key, PropertyKey::PrivateIdentifier(_)),
        );

        match method.kind {
            MethodDefinitionKind::Get | MethodDefinitionKind::Set => {
                let member = self.bind_member(class, &name, SymbolFlags::ACCESSOR, method.r#static);
                self.declare(member, DeclarationKind::Accessor, method.span, modifiers);
                self.attach_doc(member, doc.summary());
                let ty = if matches!(method.kind, MethodDefinitionKind::Get) {
                    function.return_type.as_ref().map(|ty| self.annotation(ty))
                } else {
                    function
                        .params
                        .items
                        .first()
                        .and_then(|param| param.pattern.type_annotation.as_ref())
                        .map(|ty| self.annotation(ty))
                };
                if let Some(ty) = ty {
                    self.binding.symbol_types.push((member, ty));
                }
            }
            _ => {
                let mut flags = SymbolFlags::METHOD;
                if method.optional {
                    flags |= SymbolFlags::OPTIONAL;
                }
                let member = self.bind_member(class, &name, flags, method.r#static);
                self.declare(member, DeclarationKind::Method, method.span, modifiers);
                self.attach_doc(member, doc.summary());
                self.lower_call_signature(member, function, method.span, &doc);
            }
        }
    }

    fn lower_property(&mut self, class: SymbolId, property: &PropertyDefinition<'_>) {
        let Some(name) = member_name(&property.key) else {
            trace!("computed property name skipped");
            return;
        };

        let mut flags = SymbolFlags::PROPERTY;
        if property.optional {
            flags |= SymbolFlags::OPTIONAL;
        }
        let member = self.bind_member(class, &name, flags, property.r#static);
        let modifiers = member_modifiers(
            property.accessibility,
            property.r#static,
            property.readonly,
            matches!(property.key, PropertyKey::PrivateIdentifier(_)),
        );
        self.declare(member, DeclarationKind::Property, property.span, modifiers);

        let doc = self.doc_at(property.span.start);
        self.attach_doc(member, doc.summary());

        let ty = match &property.type_annotation {
            Some(annotation) => Some(self.annotation(annotation)),
            None => property
                .value
                .as_ref()
                .and_then(|value| self.infer(value, property.readonly)),
        };
        self.binding
            .symbol_types
            .push((member, ty.unwrap_or(TypeExpr::ANY)));
    }

    fn lower_index_signature(&mut self, owner: SymbolId, index: &TSIndexSignature<'_>) {
        let member = self.bind_member(owner, INDEX_MEMBER, SymbolFlags::INDEX_SIGNATURE, index.r#static);
        let modifiers = if index.readonly {
            ModifierFlags::READONLY
        } else {
            ModifierFlags::empty()
        };
        let declaration = self.declare(member, DeclarationKind::IndexSignature, index.span, modifiers);

        let key = index
            .parameters
            .first()
            .map(|parameter| self.annotation(&parameter.type_annotation));
        let value = Some(self.annotation(&index.type_annotation));
        self.binding.indexes.push(IndexDraft {
            symbol: member,
            declaration,
            key,
            value,
        });
    }

    fn lower_interface(
        &mut self,
        interface: &TSInterfaceDeclaration<'_>,
        scope: Scope,
        visibility: Visibility,
        outer: Span,
    ) {
        let name = interface.id.name.to_string();
        let symbol = self.bind_named(scope, &name, SymbolFlags::INTERFACE, Some(&interface.id));

        let mut modifiers = visibility.modifiers();
        if interface.declare {
            modifiers |= ModifierFlags::DECLARE;
        }
        let declaration = self.declare(symbol, DeclarationKind::Interface, outer, modifiers);

        let doc = self.doc_at(outer.start);
        self.attach_doc(symbol, doc.summary());
        self.publish(scope, visibility, &name, symbol);

        let names: Vec<TypeName> = interface
            .extends
            .iter()
            .filter_map(|heritage| self.expression_name(&heritage.expression))
            .collect();
        if !names.is_empty() {
            self.binding.heritage.push(HeritageDraft {
                symbol,
                declaration,
                names,
            });
        }
        self.binding
            .symbol_types
            .push((symbol, TypeExpr::Instance(symbol)));

        let previous = self.this_owner.replace(symbol);
        self.bind_type_parameters(interface.type_parameters.as_deref());
        for signature in &interface.body.body {
            self.lower_signature_member(symbol, signature);
        }
        self.this_owner = previous;
    }

    fn lower_signature_member(&mut self, owner: SymbolId, signature: &TSSignature<'_>) {
        match signature {
            TSSignature::TSPropertySignature(property) => {
                let Some(name) = member_name(&property.key) else {
                    return;
                };
                let mut flags = SymbolFlags::PROPERTY;
                if property.optional {
                    flags |= SymbolFlags::OPTIONAL;
                }
                let member = self.bind_member(owner, &name, flags, false);
                let modifiers = if property.readonly {
                    ModifierFlags::READONLY
                } else {
                    ModifierFlags::empty()
                };
                self.declare(member, DeclarationKind::Property, property.span, modifiers);
                let doc = self.doc_at(property.span.start);
                self.attach_doc(member, doc.summary());
                let ty = property
                    .type_annotation
                    .as_ref()
                    .map_or(TypeExpr::ANY, |annotation| self.annotation(annotation));
                self.binding.symbol_types.push((member, ty));
            }
            TSSignature::TSMethodSignature(method) => {
                let Some(name) = member_name(&method.key) else {
                    return;
                };
                let doc = self.doc_at(method.span.start);

                if matches!(method.kind, TSMethodSignatureKind::Method) {
                    let mut flags = SymbolFlags::METHOD;
                    if method.optional {
                        flags |= SymbolFlags::OPTIONAL;
                    }
                    let member = self.bind_member(owner, &name, flags, false);
                    self.declare(member, DeclarationKind::Method, method.span, ModifierFlags::empty());
                    self.attach_doc(member, doc.summary());

                    self.bind_type_parameters(method.type_parameters.as_deref());
                    let parameters = self.lower_parameters(&method.params, &doc, None);
                    let return_type = method.return_type.as_ref().map(|ty| self.annotation(ty));
                    self.binding.signatures.push(SignatureDraft {
                        owner: SignatureOwner::Call(member),
                        parameters,
                        return_type,
                        pos: self.pos(method.span),
                        doc: doc.summary().to_string(),
                        has_body: false,
                    });
                } else {
                    let member = self.bind_member(owner, &name, SymbolFlags::ACCESSOR, false);
                    self.declare(member, DeclarationKind::Accessor, method.span, ModifierFlags::empty());
                    self.attach_doc(member, doc.summary());
                    let ty = if matches!(method.kind, TSMethodSignatureKind::Get) {
                        method.return_type.as_ref().map(|ty| self.annotation(ty))
                    } else {
                        method
                            .params
                            .items
                            .first()
                            .and_then(|param| param.pattern.type_annotation.as_ref())
                            .map(|ty| self.annotation(ty))
                    };
                    if let Some(ty) = ty {
                        self.binding.symbol_types.push((member, ty));
                    }
                }
            }
            TSSignature::TSIndexSignature(index) => self.lower_index_signature(owner, index),
            TSSignature::TSConstructSignatureDeclaration(construct) => {
                let doc = self.doc_at(construct.span.start);
                self.bind_type_parameters(construct.type_parameters.as_deref());
                let parameters = self.lower_parameters(&construct.params, &doc, None);
                let return_type = construct.return_type.as_ref().map(|ty| self.annotation(ty));
                self.binding.signatures.push(SignatureDraft {
                    owner: SignatureOwner::Construct(owner),
                    parameters,
                    return_type,
                    pos: self.pos(construct.span),
                    doc: doc.summary().to_string(),
                    has_body: false,
                });
            }
            TSSignature::TSCallSignatureDeclaration(_) => {
                trace!("interface call signature skipped");
            }
        }
    }

    fn lower_type_alias(
        &mut self,
        alias: &TSTypeAliasDeclaration<'_>,
        scope: Scope,
        visibility: Visibility,
        outer: Span,
    ) {
        let name = alias.id.name.to_string();
        let symbol = self.bind_named(scope, &name, SymbolFlags::TYPE_ALIAS, Some(&alias.id));
        self.declare(symbol, DeclarationKind::TypeAlias, outer, visibility.modifiers());

        let doc = self.doc_at(outer.start);
        self.attach_doc(symbol, doc.summary());
        self.publish(scope, visibility, &name, symbol);

        self.bind_type_parameters(alias.type_parameters.as_deref());
        let expr = self.type_expr(&alias.type_annotation);
        self.binding.type_aliases.insert(symbol, expr);
    }

    fn lower_enum(
        &mut self,
        enumeration: &TSEnumDeclaration<'_>,
        scope: Scope,
        visibility: Visibility,
        outer: Span,
    ) {
        let name = enumeration.id.name.to_string();
        let symbol = self.bind_named(scope, &name, SymbolFlags::ENUM, Some(&enumeration.id));

        let mut modifiers = visibility.modifiers();
        if enumeration.declare {
            modifiers |= ModifierFlags::DECLARE;
        }
        self.declare(symbol, DeclarationKind::Enum, outer, modifiers);

        let doc = self.doc_at(outer.start);
        self.attach_doc(symbol, doc.summary());
        self.publish(scope, visibility, &name, symbol);

        let mut next = Some(0.0);
        let mut members = Vec::new();
        for member in &enumeration.body.members {
            let member_name = match &member.id {
                TSEnumMemberName::Identifier(id) => id.name.to_string(),
                TSEnumMemberName::String(literal) => literal.value.to_string(),
                _ => {
                    trace!(enumeration = %name, "computed enum member name skipped");
                    continue;
                }
            };

            let value = match &member.initializer {
                Some(initializer) => enum_value(initializer),
                None => next.map(LiteralValue::Number),
            };
            next = match &value {
                Some(LiteralValue::Number(number)) => Some(number + 1.0),
                _ => None,
            };

            let member_symbol = self.bind_member(symbol, &member_name, SymbolFlags::ENUM_MEMBER, true);
            self.declare(member_symbol, DeclarationKind::EnumMember, member.span, ModifierFlags::empty());
            let member_doc = self.doc_at(member.span.start);
            self.attach_doc(member_symbol, member_doc.summary());
            members.push((member_symbol, value));
        }

        // merged enum declarations extend one member list
        match self.binding.enums.iter_mut().find(|draft| draft.symbol == symbol) {
            Some(draft) => draft.members.extend(members),
            None => self.binding.enums.push(EnumDraft { symbol, members }),
        }
    }

    fn lower_namespace(
        &mut self,
        module: &TSModuleDeclaration<'_>,
        scope: Scope,
        visibility: Visibility,
        outer: Span,
    ) {
        let TSModuleDeclarationName::Identifier(id) = &module.id else {
            trace!(source = self.path, "ambient module declaration skipped");
            return;
        };
        let name = id.name.to_string();
        let symbol = self.bind_named(scope, &name, SymbolFlags::MODULE, Some(id));
        self.declare(symbol, DeclarationKind::Module, outer, visibility.modifiers());

        let doc = self.doc_at(outer.start);
        self.attach_doc(symbol, doc.summary());
        self.publish(scope, visibility, &name, symbol);

        match &module.body {
            Some(TSModuleDeclarationBody::TSModuleBlock(block)) => {
                self.lower_statements(&block.body, Scope::Symbol(symbol));
            }
            Some(TSModuleDeclarationBody::TSModuleDeclaration(nested)) => {
                self.lower_namespace(nested, Scope::Symbol(symbol), Visibility::Exported, nested.span);
            }
            None => {}
        }
    }

    fn lower_call_signature(
        &mut self,
        owner: SymbolId,
        function: &Function<'_>,
        span: Span,
        doc: &ParsedJsDoc,
    ) {
        self.bind_type_parameters(function.type_parameters.as_deref());
        let parameters = self.lower_parameters(&function.params, doc, None);
        let return_type = function.return_type.as_ref().map(|ty| self.annotation(ty));
        self.binding.signatures.push(SignatureDraft {
            owner: SignatureOwner::Call(owner),
            parameters,
            return_type,
            pos: self.pos(span),
            doc: doc.summary().to_string(),
            has_body: function.body.is_some(),
        });
    }

    /// Lower parameters to symbols. Constructor parameters carrying an
    /// accessibility or `readonly` modifier also become properties of
    /// `property_owner`.
    fn lower_parameters(
        &mut self,
        params: &FormalParameters<'_>,
        doc: &ParsedJsDoc,
        property_owner: Option<SymbolId>,
    ) -> Vec<SymbolId> {
        let mut symbols = Vec::with_capacity(params.items.len() + 1);

        for param in &params.items {
            let (pattern, default) = match &param.pattern.kind {
                BindingPatternKind::AssignmentPattern(assignment) => {
                    (&assignment.left, Some(&assignment.right))
                }
                _ => (&param.pattern, None),
            };
            let name = binding_name(pattern).unwrap_or_else(|| format!("__{}", symbols.len()));

            let mut flags = SymbolFlags::VARIABLE;
            if param.pattern.optional || pattern.optional || default.is_some() {
                flags |= SymbolFlags::OPTIONAL;
            }
            let symbol = self.binding.builder.symbol(name.clone(), flags);
            self.declare(symbol, DeclarationKind::Parameter, param.span, ModifierFlags::empty());
            if let BindingPatternKind::BindingIdentifier(ident) = &pattern.kind {
                self.bind_local(ident, symbol);
            }
            self.attach_doc(symbol, doc.parameter(&name));

            let annotation = param
                .pattern
                .type_annotation
                .as_ref()
                .or(pattern.type_annotation.as_ref());
            let ty = match annotation {
                Some(annotation) => self.annotation(annotation),
                None => default
                    .and_then(|value| self.infer(value, false))
                    .unwrap_or(TypeExpr::ANY),
            };
            self.binding.symbol_types.push((symbol, ty.clone()));

            if let Some(owner) = property_owner {
                if param.accessibility.is_some() || param.readonly {
                    let property = self.bind_member(owner, &name, SymbolFlags::PROPERTY, false);
                    let modifiers = member_modifiers(param.accessibility, false, param.readonly, false);
                    self.declare(property, DeclarationKind::Property, param.span, modifiers);
                    self.attach_doc(property, doc.parameter(&name));
                    self.binding.symbol_types.push((property, ty));
                }
            }

            symbols.push(symbol);
        }

        if let Some(rest) = &params.rest {
            let name = binding_name(&rest.argument).unwrap_or_else(|| format!("__{}", symbols.len()));
            let symbol = self.binding.builder.symbol(name.clone(), SymbolFlags::VARIABLE);
            self.declare(symbol, DeclarationKind::Parameter, rest.span, ModifierFlags::empty());
            if let BindingPatternKind::BindingIdentifier(ident) = &rest.argument.kind {
                self.bind_local(ident, symbol);
            }
            self.attach_doc(symbol, doc.parameter(&name));
            let ty = rest
                .argument
                .type_annotation
                .as_ref()
                .map_or_else(|| TypeExpr::Array(Box::new(TypeExpr::ANY)), |ty| self.annotation(ty));
            self.binding.symbol_types.push((symbol, ty));
            symbols.push(symbol);
        }

        symbols
    }

    fn bind_type_parameters(&mut self, parameters: Option<&TSTypeParameterDeclaration<'_>>) {
        let Some(parameters) = parameters else {
            return;
        };
        for parameter in &parameters.params {
            let symbol = self
                .binding
                .builder
                .symbol(parameter.name.name.as_str(), SymbolFlags::TYPE_PARAMETER);
            self.declare(symbol, DeclarationKind::TypeParameter, parameter.span, ModifierFlags::empty());
            self.bind_local(&parameter.name, symbol);
        }
    }

    /// Symbol for `name` in `scope`, merging repeated declarations.
    fn bind_named(
        &mut self,
        scope: Scope,
        name: &str,
        flags: SymbolFlags,
        binding: Option<&BindingIdentifier<'_>>,
    ) -> SymbolId {
        let key = (scope, name.to_string());
        let symbol = match self.binding.named.get(&key) {
            Some(existing) => {
                let existing = *existing;
                self.binding.builder.symbol_mut(existing).flags |= flags;
                existing
            }
            None => {
                let symbol = self.binding.builder.symbol(name, flags);
                self.binding.named.insert(key, symbol);
                if let Scope::File(_) = scope {
                    self.binding.globals.entry(name.to_string()).or_insert(symbol);
                }
                symbol
            }
        };

        if let Some(binding) = binding {
            self.bind_local(binding, symbol);
        }
        symbol
    }

    /// Instance member of `owner`, or an export of it when `is_static`.
    fn bind_member(&mut self, owner: SymbolId, name: &str, flags: SymbolFlags, is_static: bool) -> SymbolId {
        let data = self.binding.builder.symbol_data(owner);
        let table = if is_static { &data.exports } else { &data.members };
        if let Some(existing) = table.get(name).copied() {
            self.binding.builder.symbol_mut(existing).flags |= flags;
            return existing;
        }

        let symbol = self.binding.builder.symbol(name, flags);
        if is_static {
            self.binding.builder.export(owner, name, symbol);
        } else {
            self.binding.builder.member(owner, name, symbol);
        }
        symbol
    }

    fn bind_local(&mut self, binding: &BindingIdentifier<'_>, symbol: SymbolId) {
        if let Some(id) = binding.symbol_id.get() {
            let local = LocalRef {
                file: self.file,
                symbol: id,
            };
            self.binding.locals.insert(local, symbol);
        }
    }

    fn publish(&mut self, scope: Scope, visibility: Visibility, name: &str, symbol: SymbolId) {
        let Scope::Symbol(container) = scope else {
            return;
        };
        match visibility {
            Visibility::Local => {}
            Visibility::Exported => self.binding.builder.export(container, name, symbol),
            Visibility::Default => self.binding.builder.export(container, "default", symbol),
        }
    }

    fn declare(&mut self, symbol: SymbolId, kind: DeclarationKind, span: Span, modifiers: ModifierFlags) -> usize {
        let declaration = DeclarationData::new(kind, self.pos(span)).with_modifiers(modifiers);
        self.binding.builder.declare(symbol, declaration)
    }

    /// Keep the first non-empty comment of a merged symbol.
    fn attach_doc(&mut self, symbol: SymbolId, doc: &str) {
        if !doc.is_empty() && self.binding.builder.symbol_data(symbol).doc.is_empty() {
            self.binding.builder.set_doc(symbol, doc);
        }
    }

    fn doc_at(&self, offset: u32) -> ParsedJsDoc {
        self.comments
            .get(&offset)
            .map(|span| parse_jsdoc(self.text(*span)))
            .unwrap_or_default()
    }

    fn pos(&self, span: Span) -> SourcePos {
        self.lines.pos(self.path, span)
    }

    fn text(&self, span: Span) -> &str {
        self.source
            .get(span.start as usize..span.end as usize)
            .unwrap_or_default()
    }

    fn annotation(&self, annotation: &TSTypeAnnotation<'_>) -> TypeExpr {
        self.type_expr(&annotation.type_annotation)
    }

    fn type_expr(&self, ty: &TSType<'_>) -> TypeExpr {
        use tydoc::TypeFlags;

        match ty {
            TSType::TSAnyKeyword(_) => TypeExpr::ANY,
            TSType::TSUnknownKeyword(_) => TypeExpr::Keyword(TypeFlags::UNKNOWN, "unknown"),
            TSType::TSStringKeyword(_) => TypeExpr::STRING,
            TSType::TSNumberKeyword(_) => TypeExpr::NUMBER,
            TSType::TSBooleanKeyword(_) => TypeExpr::BOOLEAN,
            TSType::TSBigIntKeyword(_) => TypeExpr::Keyword(TypeFlags::BIG_INT, "bigint"),
            TSType::TSSymbolKeyword(_) => TypeExpr::Keyword(TypeFlags::ES_SYMBOL, "symbol"),
            TSType::TSVoidKeyword(_) => TypeExpr::Keyword(TypeFlags::VOID, "void"),
            TSType::TSUndefinedKeyword(_) => TypeExpr::Keyword(TypeFlags::UNDEFINED, "undefined"),
            TSType::TSNullKeyword(_) => TypeExpr::Keyword(TypeFlags::NULL, "null"),
            TSType::TSNeverKeyword(_) => TypeExpr::Keyword(TypeFlags::NEVER, "never"),
            TSType::TSObjectKeyword(_) => TypeExpr::Keyword(TypeFlags::NON_PRIMITIVE, "object"),
            TSType::TSLiteralType(literal) => self.literal_type(literal),
            TSType::TSArrayType(array) => {
                TypeExpr::Array(Box::new(self.type_expr(&array.element_type)))
            }
            TSType::TSUnionType(union) => {
                TypeExpr::Union(union.types.iter().map(|ty| self.type_expr(ty)).collect())
            }
            TSType::TSIntersectionType(intersection) => TypeExpr::Intersection(
                intersection.types.iter().map(|ty| self.type_expr(ty)).collect(),
            ),
            TSType::TSParenthesizedType(inner) => self.type_expr(&inner.type_annotation),
            TSType::TSTypeReference(reference) => self.type_reference(reference),
            TSType::TSTupleType(tuple) => TypeExpr::Tuple(
                tuple
                    .element_types
                    .iter()
                    .map(|element| TypeExpr::Opaque(self.text(element.span()).to_string()))
                    .collect(),
            ),
            TSType::TSThisType(_) => TypeExpr::This(self.this_owner),
            other => TypeExpr::Opaque(self.text(other.span()).to_string()),
        }
    }

    fn literal_type(&self, literal: &TSLiteralType<'_>) -> TypeExpr {
        match &literal.literal {
            TSLiteral::StringLiteral(value) => TypeExpr::StringLiteral(value.value.to_string()),
            TSLiteral::NumericLiteral(value) => TypeExpr::NumberLiteral(value.value),
            TSLiteral::BooleanLiteral(value) => TypeExpr::BooleanLiteral(value.value),
            TSLiteral::UnaryExpression(unary) if unary.operator.as_str() == "-" => {
                match &unary.argument {
                    Expression::NumericLiteral(value) => TypeExpr::NumberLiteral(-value.value),
                    _ => TypeExpr::Opaque(self.text(literal.span).to_string()),
                }
            }
            _ => TypeExpr::Opaque(self.text(literal.span).to_string()),
        }
    }

    fn type_reference(&self, reference: &TSTypeReference<'_>) -> TypeExpr {
        let arguments = reference
            .type_arguments
            .as_ref()
            .map(|arguments| arguments.params.iter().map(|ty| self.type_expr(ty)).collect())
            .unwrap_or_default();

        match self.type_name(&reference.type_name) {
            Some(target) => TypeExpr::Reference {
                name: self.text(reference.type_name.span()).to_string(),
                target,
                arguments,
            },
            None => TypeExpr::Opaque(self.text(reference.span).to_string()),
        }
    }

    fn type_name(&self, name: &TSTypeName<'_>) -> Option<TypeName> {
        match name {
            TSTypeName::IdentifierReference(ident) => Some(self.reference(ident)),
            TSTypeName::QualifiedName(qualified) => Some(TypeName::Qualified(
                Box::new(self.type_name(&qualified.left)?),
                qualified.right.name.to_string(),
            )),
            _ => None,
        }
    }

    /// Name written in an `extends` clause: an identifier or a dotted path.
    fn expression_name(&self, expression: &Expression<'_>) -> Option<TypeName> {
        match expression {
            Expression::Identifier(ident) => Some(self.reference(ident)),
            Expression::StaticMemberExpression(member) => Some(TypeName::Qualified(
                Box::new(self.expression_name(&member.object)?),
                member.property.name.to_string(),
            )),
            _ => None,
        }
    }

    fn reference(&self, ident: &IdentifierReference<'_>) -> TypeName {
        ident
            .reference_id
            .get()
            .and_then(|reference| self.scoping.get_reference(reference).symbol_id())
            .map(|symbol| {
                TypeName::Local(LocalRef {
                    file: self.file,
                    symbol,
                })
            })
            .unwrap_or_else(|| TypeName::Global(ident.name.to_string()))
    }

    /// Declared type of an initializer. Literals keep their value only when
    /// `literal` is set, as for `const` and `readonly` bindings.
    fn infer(&self, expression: &Expression<'_>, literal: bool) -> Option<TypeExpr> {
        let ty = match expression {
            Expression::StringLiteral(value) => TypeExpr::StringLiteral(value.value.to_string()),
            Expression::NumericLiteral(value) => TypeExpr::NumberLiteral(value.value),
            Expression::BooleanLiteral(value) => TypeExpr::BooleanLiteral(value.value),
            Expression::NullLiteral(_) => TypeExpr::Keyword(tydoc::TypeFlags::NULL, "null"),
            Expression::TemplateLiteral(_) => TypeExpr::STRING,
            Expression::UnaryExpression(unary) if unary.operator.as_str() == "-" => {
                match &unary.argument {
                    Expression::NumericLiteral(value) => TypeExpr::NumberLiteral(-value.value),
                    _ => return None,
                }
            }
            Expression::ArrayExpression(array) => {
                let elements = array
                    .elements
                    .iter()
                    .filter_map(|element| element.as_expression())
                    .filter_map(|element| self.infer(element, false))
                    .collect();
                TypeExpr::Array(Box::new(TypeExpr::union_of(elements)))
            }
            Expression::NewExpression(new) => match &new.callee {
                Expression::Identifier(ident) => TypeExpr::Reference {
                    name: ident.name.to_string(),
                    target: self.reference(ident),
                    arguments: Vec::new(),
                },
                _ => return None,
            },
            Expression::ArrowFunctionExpression(arrow) => {
                let returns = arrow
                    .return_type
                    .as_ref()
                    .map_or("any", |ty| self.text(ty.type_annotation.span()));
                TypeExpr::Opaque(format!("{} => {returns}", self.text(arrow.params.span)))
            }
            Expression::ParenthesizedExpression(inner) => {
                return self.infer(&inner.expression, literal);
            }
            Expression::TSAsExpression(cast) => return Some(self.type_expr(&cast.type_annotation)),
            _ => return None,
        };

        Some(if literal { ty } else { ty.widened() })
    }
}

fn import_name(name: &str) -> ImportName {
    if name == "default" {
        ImportName::Default
    } else {
        ImportName::Named(name.to_string())
    }
}

fn binding_name(pattern: &BindingPattern<'_>) -> Option<String> {
    match &pattern.kind {
        BindingPatternKind::BindingIdentifier(ident) => Some(ident.name.to_string()),
        _ => None,
    }
}

fn member_name(key: &PropertyKey<'_>) -> Option<String> {
    match key {
        PropertyKey::PrivateIdentifier(ident) => Some(format!("#{}", ident.name)),
        _ => key.static_name().map(|name| name.to_string()),
    }
}

fn member_modifiers(
    accessibility: Option<TSAccessibility>,
    is_static: bool,
    readonly: bool,
    private_name: bool,
) -> ModifierFlags {
    let mut modifiers = match accessibility {
        Some(TSAccessibility::Private) => ModifierFlags::PRIVATE,
        Some(TSAccessibility::Protected) => ModifierFlags::PROTECTED,
        Some(TSAccessibility::Public) => ModifierFlags::PUBLIC,
        None => ModifierFlags::empty(),
    };
    if private_name {
        modifiers |= ModifierFlags::PRIVATE;
    }
    if is_static {
        modifiers |= ModifierFlags::STATIC;
    }
    if readonly {
        modifiers |= ModifierFlags::READONLY;
    }
    modifiers
}

fn enum_value(initializer: &Expression<'_>) -> Option<LiteralValue> {
    match initializer {
        Expression::NumericLiteral(value) => Some(LiteralValue::Number(value.value)),
        Expression::StringLiteral(value) => Some(LiteralValue::String(value.value.to_string())),
        Expression::UnaryExpression(unary) if unary.operator.as_str() == "-" => {
            match &unary.argument {
                Expression::NumericLiteral(value) => Some(LiteralValue::Number(-value.value)),
                _ => None,
            }
        }
        Expression::ParenthesizedExpression(inner) => enum_value(&inner.expression),
        _ => None,
    }
}
