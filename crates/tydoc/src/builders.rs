//! Declaration classification and the entity builders.
//!
//! Builders read a [`SymbolView`] and append finished records to the
//! walker's arenas. Classes and enums register themselves before they
//! recurse into members, so a member typed as its own class (or a cycle of
//! classes) resolves to the record that is still being filled in.

use tracing::{debug, trace};

use crate::error::Result;
use crate::extractor::{SymbolView, Walker, non_empty};
use crate::host::{DeclarationKind, Host, SymbolFlags, TypeFlags};
use crate::model::{
    ClassId, ClassKind, ClassSpec, EnumId, EnumSpec, FunctionSpec, IdentifierSpec, IndexSpec,
    ModuleSpec, RefTarget, SignatureSpec, TypeSpec,
};

/// Builder a declaration is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationClass {
    Function,
    Enum,
    Class,
    Interface,
    Variable,
    Skip,
}

pub fn classify_declaration(kind: DeclarationKind) -> DeclarationClass {
    match kind {
        DeclarationKind::Function => DeclarationClass::Function,
        DeclarationKind::Enum => DeclarationClass::Enum,
        DeclarationKind::Class => DeclarationClass::Class,
        DeclarationKind::Interface => DeclarationClass::Interface,
        DeclarationKind::Variable => DeclarationClass::Variable,
        _ => DeclarationClass::Skip,
    }
}

impl<H: Host> Walker<'_, H> {
    /// Route a declared symbol to its builder and record the result in
    /// `module`.
    pub(crate) fn assemble(&mut self, view: &SymbolView<H>, module: &mut ModuleSpec) -> Result<()> {
        let Some(kind) = view.kind() else {
            return Ok(());
        };

        match classify_declaration(kind) {
            DeclarationClass::Function => {
                let function = self.build_function(view);
                module.function_list.push(function);
            }
            DeclarationClass::Enum => {
                let id = self.build_enum(view);
                module.enum_list.push(id);
            }
            DeclarationClass::Class => {
                let id = self.build_class(view, ClassKind::Class)?;
                module.class_list.push(id);
            }
            DeclarationClass::Interface => {
                let id = self.build_class(view, ClassKind::Interface)?;
                module.interface_list.push(id);
            }
            DeclarationClass::Variable => {
                let variable = self.build_identifier(view, false);
                module.variable_list.push(variable);
            }
            DeclarationClass::Skip => {
                debug!(name = %view.name, ?kind, "unsupported declaration kind, skipping");
            }
        }

        Ok(())
    }

    fn build_class(&mut self, view: &SymbolView<H>, kind: ClassKind) -> Result<ClassId> {
        if let Some(RefTarget::Class(existing)) = self.existing_target(view) {
            return Ok(existing);
        }

        let id = ClassId::from_index(self.classes.len());
        let mut spec = ClassSpec::new(view.name.clone(), kind);
        spec.pos = view.pos.clone();
        spec.doc = view.doc.clone();
        self.classes.push(spec);
        self.registry
            .get_or_create(view.symbol.clone(), &view.name, Some(RefTarget::Class(id)));

        let host = self.host;

        let mut constructors = Vec::new();
        if let Some(ty) = &view.ty {
            for signature in host.construct_signatures(ty) {
                constructors.push(self.build_signature(&signature));
            }
        }

        let mut methods = Vec::new();
        let mut properties = Vec::new();
        let mut index = None;

        for (_, member) in host.members(&view.symbol) {
            let member = self.view(member);
            if member
                .declaration
                .as_ref()
                .is_some_and(|declaration| declaration.is_private())
            {
                trace!(class = %view.name, member = %member.name, "private member excluded");
                continue;
            }

            let flags = host.symbol_flags(&member.symbol);
            if flags.contains(SymbolFlags::METHOD) {
                methods.push(self.build_function(&member));
            } else if flags.intersects(SymbolFlags::PROPERTY | SymbolFlags::ACCESSOR) {
                let optional = flags.contains(SymbolFlags::OPTIONAL);
                properties.push(self.build_identifier(&member, optional));
            } else if member.kind() == Some(DeclarationKind::IndexSignature) {
                index = self.build_index(&member);
            }
        }

        let mut references = Vec::new();
        let heritage = view
            .declaration
            .as_ref()
            .map(|declaration| declaration.heritage.clone())
            .unwrap_or_default();
        for base in heritage {
            let base_name = host.symbol_name(&base);
            let Some(base) = self.resolve_alias(&base_name, base)? else {
                continue;
            };
            if host.declarations(&base).is_empty() {
                continue;
            }
            let name = host.symbol_name(&base);
            references.push(self.registry.get_or_create(base, &name, None));
        }
        if !references.is_empty() {
            self.pending_extends.push((id, references));
        }

        let mut exports = ModuleSpec::new();
        if host.symbol_flags(&view.symbol).intersects(SymbolFlags::HAS_EXPORTS) {
            for (_, export) in host.exports(&view.symbol) {
                if host.symbol_flags(&export).intersects(SymbolFlags::CLASS_MEMBER) {
                    continue;
                }
                let nested = self.view(export);
                self.assemble(&nested, &mut exports)?;
            }
        }

        let spec = &mut self.classes[id.index()];
        for constructor in constructors {
            spec.add_constructor(constructor);
        }
        spec.method_list = methods;
        spec.property_list = properties;
        spec.index = index;
        spec.exports = exports;

        Ok(id)
    }

    fn build_enum(&mut self, view: &SymbolView<H>) -> EnumId {
        if let Some(RefTarget::Enum(existing)) = self.existing_target(view) {
            return existing;
        }

        let id = EnumId::from_index(self.enums.len());
        let mut spec = EnumSpec::new(view.name.clone());
        spec.pos = view.pos.clone();
        spec.doc = view.doc.clone();
        self.enums.push(spec);
        self.registry
            .get_or_create(view.symbol.clone(), &view.name, Some(RefTarget::Enum(id)));

        let host = self.host;
        let mut members = Vec::new();
        if host.symbol_flags(&view.symbol).intersects(SymbolFlags::HAS_EXPORTS) {
            for (_, export) in host.exports(&view.symbol) {
                if !host.symbol_flags(&export).contains(SymbolFlags::ENUM_MEMBER) {
                    continue;
                }
                let member = self.view(export);
                members.push(self.build_identifier(&member, false));
            }
        }

        self.enums[id.index()].member_list = members;
        id
    }

    fn build_function(&mut self, view: &SymbolView<H>) -> FunctionSpec {
        let mut function = FunctionSpec::new(Some(view.name.clone()));
        if let Some(ty) = &view.ty {
            for signature in self.host.call_signatures(ty) {
                let signature = self.build_signature(&signature);
                function.signature_list.push(signature);
            }
        }
        function
    }

    fn build_signature(&mut self, signature: &H::Signature) -> SignatureSpec {
        let host = self.host;
        let return_type = self.describe(&host.signature_return_type(signature));

        let mut param_list = Vec::new();
        for parameter in host.signature_parameters(signature) {
            let optional = host.is_optional_parameter(&parameter);
            let parameter = self.view(parameter);
            param_list.push(self.build_identifier(&parameter, optional));
        }

        SignatureSpec {
            pos: host.signature_pos(signature),
            param_list,
            return_type,
            doc: non_empty(host.signature_documentation(signature)),
        }
    }

    /// Property, parameter, enum member or variable.
    fn build_identifier(&mut self, view: &SymbolView<H>, optional: bool) -> IdentifierSpec {
        let ty = view.ty.as_ref().map(|ty| self.describe(ty));
        let value = match (&ty, &view.ty) {
            (Some(TypeSpec::Literal { value, .. }), _) => Some(value.clone()),
            (_, Some(handle)) => {
                let info = self.host.type_info(handle);
                if info
                    .flags
                    .intersects(TypeFlags::STRING_LITERAL | TypeFlags::NUMBER_LITERAL)
                {
                    info.literal
                } else {
                    None
                }
            }
            _ => None,
        };

        IdentifierSpec {
            name: view.name.clone(),
            ty,
            optional,
            value,
            pos: view.pos.clone(),
            doc: view.doc.clone(),
        }
    }

    fn build_index(&mut self, view: &SymbolView<H>) -> Option<IndexSpec> {
        let info = view.declaration.as_ref()?.index.as_ref()?;
        let signature = info.key.as_ref().map(|key| self.describe(key));
        let value = info.value.as_ref().map(|value| self.describe(value));
        Some(IndexSpec { signature, value })
    }

    /// Target already attached to the symbol's record, if it was built.
    fn existing_target(&self, view: &SymbolView<H>) -> Option<RefTarget> {
        let id = self.registry.lookup(&view.symbol, &view.name)?;
        self.registry.get(id).target
    }
}
