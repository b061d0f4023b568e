//! Type handle to [`TypeSpec`] conversion.
//!
//! [`classify`] decides the shape of a type once, from the facts the host
//! reports. [`TypeDescriber`] then builds the description, recursing into
//! element, argument and constituent types. Named declarations are never
//! expanded: they become [`TypeSpec::Ref`] records from the registry, which is
//! what keeps mutually referencing classes finite.

use crate::host::{Host, LiteralValue, ObjectFlags, TypeFlags, TypeInfo};
use crate::model::{TypeSpec, UnsupportedKind};
use crate::registry::SymbolRegistry;

/// Nesting beyond this is reported as unsupported instead of recursing.
const MAX_TYPE_DEPTH: usize = 64;

/// Name of the built-in generic that instantiates to arrays.
const ARRAY_TARGET: &str = "Array";

/// Shape of a type, decided by [`classify`].
#[derive(Debug, Clone, PartialEq)]
pub enum TypeShape<S, T> {
    /// Union of the literal members of an enum: the enum itself.
    EnumLiteralUnion(S),
    /// Single enum member literal.
    EnumLiteral {
        primitive: &'static str,
        value: LiteralValue,
    },
    /// Printed by the checker, not structured further.
    Simple,
    Array(T),
    Reference { symbol: S, arguments: Vec<T> },
    Tuple,
    Union(Vec<T>),
    Intersection(Vec<T>),
    Unsupported,
}

/// Decide the shape of a type. First matching rule wins:
///
/// 1. enum literals (a union of them is the enum)
/// 2. intrinsics, string and number literals, `this`, anonymous objects
/// 3. instantiations of `Array`
/// 4. other instantiations, then classes, interfaces, enums and type parameters
/// 5. tuples
/// 6. unions
/// 7. intersections
pub fn classify<S, T>(info: TypeInfo<S, T>) -> TypeShape<S, T> {
    let flags = info.flags;
    let object = flags.contains(TypeFlags::OBJECT);

    if flags.contains(TypeFlags::ENUM_LITERAL) {
        if flags.contains(TypeFlags::UNION) {
            return match info.symbol {
                Some(symbol) => TypeShape::EnumLiteralUnion(symbol),
                None => TypeShape::Unsupported,
            };
        }
        let primitive = if flags.contains(TypeFlags::NUMBER_LITERAL) {
            "number"
        } else {
            "string"
        };
        return match info.literal {
            Some(value) => TypeShape::EnumLiteral { primitive, value },
            None => TypeShape::Unsupported,
        };
    }

    if flags.intersects(
        TypeFlags::INTRINSIC | TypeFlags::STRING_LITERAL | TypeFlags::NUMBER_LITERAL,
    ) || info.is_this_type
        || (object && info.object_flags.contains(ObjectFlags::ANONYMOUS))
    {
        return TypeShape::Simple;
    }

    let tuple = object && info.object_flags.contains(ObjectFlags::TUPLE);

    if object && info.object_flags.contains(ObjectFlags::REFERENCE) && !tuple {
        let mut arguments = info.type_arguments;
        if info.target_name.as_deref() == Some(ARRAY_TARGET) && !arguments.is_empty() {
            return TypeShape::Array(arguments.swap_remove(0));
        }
        return match info.symbol {
            Some(symbol) => TypeShape::Reference { symbol, arguments },
            None => TypeShape::Unsupported,
        };
    }

    if flags.intersects(TypeFlags::ENUM | TypeFlags::TYPE_PARAMETER)
        || (object && info.object_flags.intersects(ObjectFlags::CLASS_OR_INTERFACE))
    {
        return match info.symbol {
            Some(symbol) => TypeShape::Reference {
                symbol,
                arguments: Vec::new(),
            },
            None => TypeShape::Unsupported,
        };
    }

    if tuple {
        return TypeShape::Tuple;
    }

    if flags.contains(TypeFlags::UNION) {
        return TypeShape::Union(info.constituents);
    }

    if flags.contains(TypeFlags::INTERSECTION) {
        return TypeShape::Intersection(info.constituents);
    }

    TypeShape::Unsupported
}

/// Builds [`TypeSpec`]s, allocating reference records as it goes.
pub struct TypeDescriber<'a, H: Host> {
    host: &'a H,
    registry: &'a mut SymbolRegistry<H::Symbol>,
}

impl<'a, H: Host> TypeDescriber<'a, H> {
    pub fn new(host: &'a H, registry: &'a mut SymbolRegistry<H::Symbol>) -> Self {
        Self { host, registry }
    }

    pub fn describe(&mut self, ty: &H::Type) -> TypeSpec {
        self.describe_at(ty, 0)
    }

    fn describe_at(&mut self, ty: &H::Type, depth: usize) -> TypeSpec {
        if depth > MAX_TYPE_DEPTH {
            return self.unsupported(ty, UnsupportedKind::Other);
        }

        match classify(self.host.type_info(ty)) {
            TypeShape::EnumLiteralUnion(symbol) => TypeSpec::Ref {
                target: self.reference(symbol),
                arguments: Vec::new(),
            },
            TypeShape::EnumLiteral { primitive, value } => TypeSpec::Literal {
                name: primitive.to_string(),
                value,
            },
            TypeShape::Simple => TypeSpec::Name(self.host.type_to_string(ty)),
            TypeShape::Array(element) => {
                TypeSpec::ArrayOf(Box::new(self.describe_at(&element, depth + 1)))
            }
            TypeShape::Reference { symbol, arguments } => TypeSpec::Ref {
                target: self.reference(symbol),
                arguments: self.describe_list(&arguments, depth),
            },
            TypeShape::Tuple => self.unsupported(ty, UnsupportedKind::Tuple),
            TypeShape::Union(members) => TypeSpec::UnionOf(self.describe_list(&members, depth)),
            TypeShape::Intersection(members) => {
                TypeSpec::IntersectionOf(self.describe_list(&members, depth))
            }
            TypeShape::Unsupported => self.unsupported(ty, UnsupportedKind::Other),
        }
    }

    fn describe_list(&mut self, types: &[H::Type], depth: usize) -> Vec<TypeSpec> {
        types
            .iter()
            .map(|ty| self.describe_at(ty, depth + 1))
            .collect()
    }

    fn reference(&mut self, symbol: H::Symbol) -> crate::model::RefId {
        let name = self.host.symbol_name(&symbol);
        self.registry.get_or_create(symbol, &name, None)
    }

    fn unsupported(&self, ty: &H::Type, kind: UnsupportedKind) -> TypeSpec {
        TypeSpec::Unsupported {
            kind,
            display: self.host.type_to_string(ty),
        }
    }
}
