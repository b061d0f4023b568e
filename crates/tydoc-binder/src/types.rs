//! Owned type expressions lowered from source annotations.
//!
//! The syntax tree lives in a per-file arena, so annotations are copied into
//! [`TypeExpr`] before the arena is dropped. Names stay unresolved until every
//! file is bound; see [`crate::link`].

use oxc_semantic::SymbolId as OxcSymbolId;
use tydoc::{SymbolId, TypeFlags};

/// A binding in one bound file, as resolved by OXC's semantic pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct LocalRef {
    pub(crate) file: usize,
    pub(crate) symbol: OxcSymbolId,
}

/// A name used in type position or a heritage clause.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TypeName {
    Local(LocalRef),
    /// `left.right`, looked up in the exports of `left`.
    Qualified(Box<TypeName>, String),
    /// No binding in the file; a script global or a library type.
    Global(String),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TypeExpr {
    Keyword(TypeFlags, &'static str),
    StringLiteral(String),
    NumberLiteral(f64),
    BooleanLiteral(bool),
    Reference {
        name: String,
        target: TypeName,
        arguments: Vec<TypeExpr>,
    },
    /// The symbol's own type, for `new X()` initializers and constructor
    /// results.
    Instance(SymbolId),
    Array(Box<TypeExpr>),
    Union(Vec<TypeExpr>),
    Intersection(Vec<TypeExpr>),
    Tuple(Vec<TypeExpr>),
    This(Option<SymbolId>),
    /// Anything the binder does not model, kept as its source text.
    Opaque(String),
}

impl TypeExpr {
    pub(crate) const ANY: TypeExpr = TypeExpr::Keyword(TypeFlags::ANY, "any");
    pub(crate) const STRING: TypeExpr = TypeExpr::Keyword(TypeFlags::STRING, "string");
    pub(crate) const NUMBER: TypeExpr = TypeExpr::Keyword(TypeFlags::NUMBER, "number");
    pub(crate) const BOOLEAN: TypeExpr = TypeExpr::Keyword(TypeFlags::BOOLEAN, "boolean");

    /// Base primitive of a literal type, as a mutable binding would see it.
    pub(crate) fn widened(self) -> TypeExpr {
        match self {
            TypeExpr::StringLiteral(_) => TypeExpr::STRING,
            TypeExpr::NumberLiteral(_) => TypeExpr::NUMBER,
            TypeExpr::BooleanLiteral(_) => TypeExpr::BOOLEAN,
            other => other,
        }
    }

    /// Collapse a list of element types into one.
    pub(crate) fn union_of(mut members: Vec<TypeExpr>) -> TypeExpr {
        let mut unique: Vec<TypeExpr> = Vec::with_capacity(members.len());
        for member in members.drain(..) {
            if !unique.contains(&member) {
                unique.push(member);
            }
        }
        match unique.len() {
            0 => TypeExpr::ANY,
            1 => unique.remove(0),
            _ => TypeExpr::Union(unique),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widening_only_touches_literals() {
        assert_eq!(TypeExpr::StringLiteral("a".into()).widened(), TypeExpr::STRING);
        assert_eq!(TypeExpr::BooleanLiteral(true).widened(), TypeExpr::BOOLEAN);
        assert_eq!(TypeExpr::ANY.widened(), TypeExpr::ANY);
    }

    #[test]
    fn union_of_deduplicates_and_collapses() {
        assert_eq!(TypeExpr::union_of(vec![]), TypeExpr::ANY);
        assert_eq!(
            TypeExpr::union_of(vec![TypeExpr::NUMBER, TypeExpr::NUMBER]),
            TypeExpr::NUMBER
        );
        assert_eq!(
            TypeExpr::union_of(vec![TypeExpr::NUMBER, TypeExpr::STRING, TypeExpr::NUMBER]),
            TypeExpr::Union(vec![TypeExpr::NUMBER, TypeExpr::STRING])
        );
    }
}
