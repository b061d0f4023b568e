//! Rendering [`TypeSpec`]s back to TypeScript syntax.

use crate::model::{Documentation, RefId, RefSpec, TypeSpec};

/// Per-shape overrides for [`TypeFormatter`].
///
/// Each hook receives the default output for its shape and returns the text
/// to use instead, so a renderer can wrap references in links without
/// re-implementing the layout rules.
pub trait FormatHooks {
    /// Names, literals and unsupported types.
    fn unknown(&self, _spec: &TypeSpec, output: String) -> String {
        output
    }

    /// Name of a referenced declaration, before any type arguments.
    fn reference(&self, _target: RefId, _reference: Option<&RefSpec>, output: String) -> String {
        output
    }

    /// Reference with its `<...>` argument list.
    fn generic(&self, _spec: &TypeSpec, output: String) -> String {
        output
    }

    fn array(&self, _spec: &TypeSpec, output: String) -> String {
        output
    }

    fn union(&self, _spec: &TypeSpec, output: String) -> String {
        output
    }

    fn intersection(&self, _spec: &TypeSpec, output: String) -> String {
        output
    }
}

/// Hooks that keep every default.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultHooks;

impl FormatHooks for DefaultHooks {}

/// Formats types against the reference records of one run.
pub struct TypeFormatter<'a, K: ?Sized> {
    refs: &'a [RefSpec],
    hooks: &'a K,
}

impl<'a, K: FormatHooks + ?Sized> TypeFormatter<'a, K> {
    pub fn new(refs: &'a [RefSpec], hooks: &'a K) -> Self {
        Self { refs, hooks }
    }

    pub fn format(&self, spec: &TypeSpec) -> String {
        self.format_nested(spec, false)
    }

    fn format_nested(&self, spec: &TypeSpec, need_parens: bool) -> String {
        match spec {
            TypeSpec::Name(name) => self.hooks.unknown(spec, name.clone()),
            TypeSpec::Literal { name, .. } => self.hooks.unknown(spec, name.clone()),
            TypeSpec::Unsupported { display, .. } => self.hooks.unknown(spec, display.clone()),
            TypeSpec::Ref { target, arguments } => {
                let reference = self.refs.get(target.index());
                let name = reference
                    .map(|reference| reference.name.clone())
                    .unwrap_or_default();
                let output = self.hooks.reference(*target, reference, name);
                if arguments.is_empty() {
                    return output;
                }
                let arguments = arguments
                    .iter()
                    .map(|argument| self.format_nested(argument, false))
                    .collect::<Vec<_>>()
                    .join(", ");
                self.hooks.generic(spec, format!("{output}<{arguments}>"))
            }
            TypeSpec::ArrayOf(element) => {
                let output = format!("{}[]", self.format_nested(element, true));
                self.hooks.array(spec, output)
            }
            TypeSpec::UnionOf(members) => {
                let output = self.join(members, " | ", need_parens);
                self.hooks.union(spec, output)
            }
            TypeSpec::IntersectionOf(members) => {
                let output = self.join(members, " & ", need_parens);
                self.hooks.intersection(spec, output)
            }
        }
    }

    fn join(&self, members: &[TypeSpec], separator: &str, need_parens: bool) -> String {
        let joined = members
            .iter()
            .map(|member| self.format_nested(member, true))
            .collect::<Vec<_>>()
            .join(separator);
        if need_parens {
            format!("({joined})")
        } else {
            joined
        }
    }
}

/// Format with default hooks.
pub fn format_type(spec: &TypeSpec, refs: &[RefSpec]) -> String {
    TypeFormatter::new(refs, &DefaultHooks).format(spec)
}

impl Documentation {
    /// Format a type from this run with default hooks.
    pub fn format_type(&self, spec: &TypeSpec) -> String {
        format_type(spec, &self.refs)
    }

    /// Format a type from this run with custom hooks.
    pub fn format_type_with<K: FormatHooks + ?Sized>(&self, spec: &TypeSpec, hooks: &K) -> String {
        TypeFormatter::new(&self.refs, hooks).format(spec)
    }
}
