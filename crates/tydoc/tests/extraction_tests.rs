use std::path::Path;

use tydoc::host::IndexSignatureInfo;
use tydoc::{
    ClassKind, Declaration, DeclarationKind, DocsError, ExtractOptions, LiteralValue,
    ModifierFlags, OutputLayout, ProgramBuilder, RefTarget, SignatureData, SourcePos, SymbolFlags,
    SymbolId, TypeId, TypeSpec, UnsupportedKind, extract,
};

const SOURCE: &str = "src/geometry.ts";

fn pos(first: u32, last: u32) -> SourcePos {
    SourcePos::new(SOURCE, first, last)
}

fn class(builder: &mut ProgramBuilder, module: SymbolId, name: &str, line: u32) -> SymbolId {
    let symbol = builder.symbol(name, SymbolFlags::CLASS);
    builder.declare(symbol, Declaration::new(DeclarationKind::Class, pos(line, line + 3)));
    let constructor = builder.constructor_type(symbol, Vec::new());
    builder.set_type(symbol, constructor);
    builder.export(module, name, symbol);
    symbol
}

fn property(
    builder: &mut ProgramBuilder,
    owner: SymbolId,
    name: &str,
    ty: TypeId,
    line: u32,
) -> SymbolId {
    let symbol = builder.symbol(name, SymbolFlags::PROPERTY);
    builder.declare(symbol, Declaration::new(DeclarationKind::Property, pos(line, line)));
    builder.set_type(symbol, ty);
    builder.member(owner, name, symbol);
    symbol
}

fn parameter(builder: &mut ProgramBuilder, name: &str, ty: TypeId, optional: bool) -> SymbolId {
    let mut flags = SymbolFlags::VARIABLE;
    if optional {
        flags |= SymbolFlags::OPTIONAL;
    }
    let symbol = builder.symbol(name, flags);
    builder.declare(symbol, Declaration::new(DeclarationKind::Parameter, pos(1, 1)));
    builder.set_type(symbol, ty);
    symbol
}

fn function(
    builder: &mut ProgramBuilder,
    module: SymbolId,
    name: &str,
    signatures: Vec<SignatureData>,
) -> SymbolId {
    let symbol = builder.symbol(name, SymbolFlags::FUNCTION);
    builder.declare(symbol, Declaration::new(DeclarationKind::Function, pos(1, 1)));
    let signatures = signatures
        .into_iter()
        .map(|signature| builder.signature(signature))
        .collect();
    let ty = builder.function_type(format!("typeof {name}"), signatures);
    builder.set_type(symbol, ty);
    builder.export(module, name, symbol);
    symbol
}

#[test]
fn point_and_line_share_one_reference() {
    let mut builder = ProgramBuilder::new();
    let module = builder.add_file(SOURCE);
    let line = class(&mut builder, module, "Line", 1);
    let point = class(&mut builder, module, "Point", 10);
    let point_type = builder.reference(point, Vec::new());
    property(&mut builder, line, "a", point_type, 2);
    property(&mut builder, line, "b", point_type, 3);
    let number = builder.number();
    property(&mut builder, point, "x", number, 11);
    property(&mut builder, point, "y", number, 12);
    let program = builder.build();

    let doc = extract(&program, &ExtractOptions::default()).expect("extraction should succeed");

    assert_eq!(doc.modules.len(), 2);
    let line_spec = doc.find_class("Line").expect("Line");
    let a = line_spec.property("a").and_then(|p| p.ty.as_ref()).expect("typed a");
    let b = line_spec.property("b").and_then(|p| p.ty.as_ref()).expect("typed b");
    assert_eq!(a.ref_id(), b.ref_id());

    let reference = a.ref_id().expect("reference");
    let point_id = doc.modules[1].class_list[0];
    assert_eq!(doc.reference(reference).target, Some(RefTarget::Class(point_id)));
    assert_eq!(doc.format_type(a), "Point");

    let point_spec = doc.class(point_id);
    assert_eq!(point_spec.kind, ClassKind::Class);
    assert_eq!(point_spec.pos, Some(pos(10, 13)));
    let x = point_spec.property("x").expect("x");
    assert_eq!(x.ty, Some(TypeSpec::name("number")));
    assert!(!x.optional);
}

#[test]
fn exports_are_visited_in_name_order() {
    let mut builder = ProgramBuilder::new();
    let module = builder.add_file(SOURCE);
    for name in ["zeta", "alpha", "mid"] {
        function(&mut builder, module, name, Vec::new());
    }
    let program = builder.build();

    let doc = extract(&program, &ExtractOptions::default()).expect("extraction should succeed");
    let names: Vec<_> = doc
        .modules
        .iter()
        .map(|module| module.function_list[0].name.clone().unwrap_or_default())
        .collect();
    assert_eq!(names, ["alpha", "mid", "zeta"]);
}

#[test]
fn extraction_is_idempotent() {
    let mut builder = ProgramBuilder::new();
    let module = builder.add_file(SOURCE);
    let node = class(&mut builder, module, "Node", 1);
    let node_type = builder.reference(node, Vec::new());
    property(&mut builder, node, "next", node_type, 2);
    let program = builder.build();

    let first = extract(&program, &ExtractOptions::default()).expect("first run");
    let second = extract(&program, &ExtractOptions::default()).expect("second run");
    assert_eq!(first, second);
}

#[test]
fn self_reference_points_at_own_class() {
    let mut builder = ProgramBuilder::new();
    let module = builder.add_file(SOURCE);
    let node = class(&mut builder, module, "Node", 1);
    let node_type = builder.reference(node, Vec::new());
    property(&mut builder, node, "next", node_type, 2);
    let program = builder.build();

    let doc = extract(&program, &ExtractOptions::default()).expect("extraction should succeed");
    let id = doc.modules[0].class_list[0];
    let next = doc.class(id).property("next").and_then(|p| p.ty.as_ref()).expect("next");
    let reference = next.ref_id().expect("reference");
    assert_eq!(doc.reference(reference).target, Some(RefTarget::Class(id)));
}

#[test]
fn private_members_are_excluded() {
    let mut builder = ProgramBuilder::new();
    let module = builder.add_file(SOURCE);
    let account = class(&mut builder, module, "Account", 1);
    let number = builder.number();
    property(&mut builder, account, "balance", number, 2);

    let secret = builder.symbol("secret", SymbolFlags::PROPERTY);
    builder.declare(
        secret,
        Declaration::new(DeclarationKind::Property, pos(3, 3)).with_modifiers(ModifierFlags::PRIVATE),
    );
    builder.set_type(secret, number);
    builder.member(account, "secret", secret);
    let program = builder.build();

    let doc = extract(&program, &ExtractOptions::default()).expect("extraction should succeed");
    let spec = doc.find_class("Account").expect("Account");
    assert!(spec.property("balance").is_some());
    assert!(spec.property("secret").is_none());
}

#[test]
fn union_array_property_formats_with_parens() {
    let mut builder = ProgramBuilder::new();
    let module = builder.add_file(SOURCE);
    let holder = class(&mut builder, module, "Holder", 1);
    let members = ["A", "B", "C"]
        .into_iter()
        .map(|name| builder.intrinsic(tydoc::TypeFlags::NON_PRIMITIVE, name))
        .collect();
    let union = builder.union(members);
    let array = builder.array_of(union);
    property(&mut builder, holder, "items", array, 2);
    property(&mut builder, holder, "item", union, 3);
    let program = builder.build();

    let doc = extract(&program, &ExtractOptions::default()).expect("extraction should succeed");
    let spec = doc.find_class("Holder").expect("Holder");

    let items = spec.property("items").and_then(|p| p.ty.as_ref()).expect("items");
    assert!(matches!(items, TypeSpec::ArrayOf(_)));
    assert_eq!(doc.format_type(items), "(A | B | C)[]");

    let item = spec.property("item").and_then(|p| p.ty.as_ref()).expect("item");
    assert_eq!(doc.format_type(item), "A | B | C");
}

#[test]
fn tuple_types_stay_opaque() {
    let mut builder = ProgramBuilder::new();
    let module = builder.add_file(SOURCE);
    let pair = class(&mut builder, module, "Pair", 1);
    let string = builder.string();
    let number = builder.number();
    let tuple = builder.tuple(vec![string, number]);
    property(&mut builder, pair, "value", tuple, 2);
    let program = builder.build();

    let doc = extract(&program, &ExtractOptions::default()).expect("extraction should succeed");
    let value = doc
        .find_class("Pair")
        .and_then(|spec| spec.property("value"))
        .and_then(|p| p.ty.clone())
        .expect("value");
    assert_eq!(
        value,
        TypeSpec::Unsupported {
            kind: UnsupportedKind::Tuple,
            display: "[string, number]".into()
        }
    );
}

#[test]
fn extends_links_resolve_regardless_of_visit_order() {
    let mut builder = ProgramBuilder::new();
    let module = builder.add_file(SOURCE);
    let zebra = class(&mut builder, module, "Zebra", 20);

    let apple = builder.symbol("Apple", SymbolFlags::CLASS);
    let mut declaration = Declaration::new(DeclarationKind::Class, pos(1, 5));
    declaration.heritage.push(zebra);
    builder.declare(apple, declaration);
    builder.export(module, "Apple", apple);
    let program = builder.build();

    let doc = extract(&program, &ExtractOptions::default()).expect("extraction should succeed");
    let apple_spec = doc.find_class("Apple").expect("Apple");
    let zebra_id = doc.modules[1].class_list[0];
    assert_eq!(apple_spec.extend_list, vec![zebra_id]);
    assert!(doc.class(zebra_id).extend_list.is_empty());
}

#[test]
fn enum_members_carry_values_and_references_resolve() {
    let mut builder = ProgramBuilder::new();
    let module = builder.add_file(SOURCE);

    let color = builder.symbol("Color", SymbolFlags::ENUM);
    builder.declare(color, Declaration::new(DeclarationKind::Enum, pos(1, 5)));
    let mut literals = Vec::new();
    for (line, (name, value)) in [("Red", 0.0), ("Green", 5.0), ("Blue", 6.0)].into_iter().enumerate() {
        let member = builder.symbol(name, SymbolFlags::ENUM_MEMBER);
        let line = line as u32 + 2;
        builder.declare(member, Declaration::new(DeclarationKind::EnumMember, pos(line, line)));
        let literal = builder.enum_literal(member, LiteralValue::Number(value));
        builder.set_type(member, literal);
        builder.export(color, name, member);
        literals.push(literal);
    }
    let color_type = builder.enum_type(color, literals);
    builder.set_type(color, color_type);
    builder.export(module, "Color", color);

    let brush = class(&mut builder, module, "Brush", 10);
    property(&mut builder, brush, "color", color_type, 11);
    let program = builder.build();

    let doc = extract(&program, &ExtractOptions::default()).expect("extraction should succeed");
    let spec = doc.find_enum("Color").expect("Color");
    let values: Vec<_> = spec
        .member_list
        .iter()
        .map(|member| (member.name.as_str(), member.value.clone()))
        .collect();
    assert_eq!(
        values,
        [
            ("Red", Some(LiteralValue::Number(0.0))),
            ("Green", Some(LiteralValue::Number(5.0))),
            ("Blue", Some(LiteralValue::Number(6.0))),
        ]
    );
    assert_eq!(
        spec.member_list[0].ty,
        Some(TypeSpec::Literal {
            name: "number".into(),
            value: LiteralValue::Number(0.0)
        })
    );

    let color_ref = doc
        .find_class("Brush")
        .and_then(|brush| brush.property("color"))
        .and_then(|p| p.ty.as_ref())
        .and_then(TypeSpec::ref_id)
        .expect("enum reference");
    assert_eq!(doc.ref_enum(color_ref).map(|spec| spec.name.as_str()), Some("Color"));
}

#[test]
fn overloads_become_signatures_with_optional_parameters() {
    let mut builder = ProgramBuilder::new();
    let module = builder.add_file(SOURCE);
    let string = builder.string();
    let number = builder.number();
    let input = parameter(&mut builder, "input", string, false);
    let radix = parameter(&mut builder, "radix", number, true);
    let value = parameter(&mut builder, "value", number, false);

    let mut first = SignatureData::new(vec![input, radix], number);
    first.doc = "Parse text.".into();
    let second = SignatureData::new(vec![value], number);
    function(&mut builder, module, "parse", vec![first, second]);
    let program = builder.build();

    let doc = extract(&program, &ExtractOptions::default()).expect("extraction should succeed");
    let parse = doc.find_function("parse").expect("parse");
    assert_eq!(parse.signature_list.len(), 2);

    let first = &parse.signature_list[0];
    assert_eq!(first.doc.as_deref(), Some("Parse text."));
    assert_eq!(first.return_type, TypeSpec::name("number"));
    let params: Vec<_> = first
        .param_list
        .iter()
        .map(|param| (param.name.as_str(), param.optional))
        .collect();
    assert_eq!(params, [("input", false), ("radix", true)]);
    assert!(parse.signature_list[1].doc.is_none());
}

#[test]
fn interface_index_signature_and_methods() {
    let mut builder = ProgramBuilder::new();
    let module = builder.add_file(SOURCE);
    let dict = builder.symbol("Dict", SymbolFlags::INTERFACE);
    builder.declare(dict, Declaration::new(DeclarationKind::Interface, pos(1, 4)));
    let instance = builder.reference(dict, Vec::new());
    builder.set_type(dict, instance);
    builder.export(module, "Dict", dict);

    let string = builder.string();
    let number = builder.number();
    let index = builder.symbol("__index", SymbolFlags::INDEX_SIGNATURE);
    let mut declaration = Declaration::new(DeclarationKind::IndexSignature, pos(2, 2));
    declaration.index = Some(IndexSignatureInfo {
        key: Some(string),
        value: Some(number),
    });
    builder.declare(index, declaration);
    builder.member(dict, "__index", index);

    let size = builder.symbol("size", SymbolFlags::METHOD);
    builder.declare(size, Declaration::new(DeclarationKind::Method, pos(3, 3)));
    let signature = builder.signature(SignatureData::new(Vec::new(), number));
    let size_type = builder.function_type("() => number", vec![signature]);
    builder.set_type(size, size_type);
    builder.member(dict, "size", size);
    let program = builder.build();

    let doc = extract(&program, &ExtractOptions::default()).expect("extraction should succeed");
    assert_eq!(doc.modules[0].interface_list.len(), 1);
    assert!(doc.modules[0].class_list.is_empty());

    let spec = doc.find_class("Dict").expect("Dict");
    assert_eq!(spec.kind, ClassKind::Interface);
    assert!(spec.construct.is_none());
    let index = spec.index.as_ref().expect("index signature");
    assert_eq!(index.signature, Some(TypeSpec::name("string")));
    assert_eq!(index.value, Some(TypeSpec::name("number")));
    assert_eq!(spec.method("size").map(|m| m.signature_list.len()), Some(1));
}

#[test]
fn constructors_collect_into_anonymous_function() {
    let mut builder = ProgramBuilder::new();
    let module = builder.add_file(SOURCE);
    let point = builder.symbol("Point", SymbolFlags::CLASS);
    builder.declare(point, Declaration::new(DeclarationKind::Class, pos(1, 3)));
    let instance = builder.reference(point, Vec::new());
    let number = builder.number();
    let x = parameter(&mut builder, "x", number, false);
    let signature = builder.signature(SignatureData::new(vec![x], instance));
    let constructor = builder.constructor_type(point, vec![signature]);
    builder.set_type(point, constructor);
    builder.export(module, "Point", point);
    let program = builder.build();

    let doc = extract(&program, &ExtractOptions::default()).expect("extraction should succeed");
    let construct = doc
        .find_class("Point")
        .and_then(|spec| spec.construct.as_ref())
        .expect("constructor");
    assert!(construct.name.is_none());
    assert_eq!(construct.signature_list[0].param_list[0].name, "x");
    assert_eq!(doc.format_type(&construct.signature_list[0].return_type), "Point");
}

#[test]
fn re_exported_class_keeps_one_identity() {
    let mut builder = ProgramBuilder::new();
    let origin = builder.add_file("src/origin.ts");
    let original = class(&mut builder, origin, "Original", 1);

    let index = builder.add_file("src/index.ts");
    let renamed = builder.symbol("Renamed", SymbolFlags::empty());
    builder.declare(renamed, Declaration::new(DeclarationKind::ExportSpecifier, pos(1, 1)));
    builder.alias(renamed, original);
    builder.export(index, "Renamed", renamed);
    let program = builder.build();

    let doc = extract(&program, &ExtractOptions::default()).expect("extraction should succeed");
    assert_eq!(doc.modules.len(), 2);
    assert_eq!(doc.modules[0].class_list, doc.modules[1].class_list);
    assert_eq!(doc.classes.len(), 1);
    assert_eq!(doc.classes[0].name, "Original");
}

#[test]
fn alias_cycle_fails_with_chain() {
    let mut builder = ProgramBuilder::new();
    let module = builder.add_file(SOURCE);
    let first = builder.symbol("first", SymbolFlags::empty());
    let second = builder.symbol("second", SymbolFlags::empty());
    builder.alias(first, second);
    builder.alias(second, first);
    builder.export(module, "first", first);
    let program = builder.build();

    let error = extract(&program, &ExtractOptions::default()).expect_err("cycle");
    match error {
        DocsError::AliasCycle { name, chain } => {
            assert_eq!(name, "first");
            assert_eq!(chain, ["first", "second", "first"]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn alias_chain_longer_than_limit_fails() {
    let mut builder = ProgramBuilder::new();
    let module = builder.add_file(SOURCE);
    let target = class(&mut builder, module, "Target", 1);
    let mut previous = target;
    for step in 0..4 {
        let alias = builder.symbol(format!("alias{step}"), SymbolFlags::empty());
        builder.alias(alias, previous);
        previous = alias;
    }
    builder.export(module, "Deep", previous);
    let program = builder.build();

    let options = ExtractOptions::default().with_max_alias_depth(2);
    let error = extract(&program, &options).expect_err("too deep");
    assert!(matches!(error, DocsError::AliasDepthExceeded { limit: 2, .. }));

    let doc = extract(&program, &ExtractOptions::default()).expect("default depth");
    assert_eq!(doc.classes.len(), 1);
}

#[test]
fn unresolved_alias_is_skipped() {
    let mut builder = ProgramBuilder::new();
    let module = builder.add_file(SOURCE);
    let dangling = builder.symbol("missing", SymbolFlags::ALIAS);
    builder.export(module, "missing", dangling);
    let program = builder.build();

    let doc = extract(&program, &ExtractOptions::default()).expect("extraction should succeed");
    assert!(doc.modules.is_empty());
}

#[test]
fn name_filter_sees_emitted_paths() {
    let mut builder = ProgramBuilder::new();
    builder.set_layout(OutputLayout::new("src", "dist"));
    let a = builder.add_file("src/a.ts");
    function(&mut builder, a, "fromA", Vec::new());
    let b = builder.add_file("src/b.ts");
    function(&mut builder, b, "fromB", Vec::new());
    let program = builder.build();

    let options = ExtractOptions::default()
        .with_name_filter(|path| path == Path::new("dist/a.js"))
        .with_extension(".js");
    let doc = extract(&program, &options).expect("extraction should succeed");
    assert_eq!(doc.modules.len(), 1);
    assert!(doc.find_function("fromA").is_some());

    let without_extension =
        ExtractOptions::default().with_name_filter(|path| path == Path::new("dist/a.js"));
    let doc = extract(&program, &without_extension).expect("extraction should succeed");
    assert_eq!(doc.modules.len(), 2);
}

#[test]
fn skipped_kinds_leave_empty_module_records() {
    let mut builder = ProgramBuilder::new();
    let module = builder.add_file(SOURCE);
    let alias = builder.symbol("Id", SymbolFlags::TYPE_ALIAS);
    builder.declare(alias, Declaration::new(DeclarationKind::TypeAlias, pos(1, 1)));
    builder.export(module, "Id", alias);
    function(&mut builder, module, "make", Vec::new());
    let program = builder.build();

    let mut doc = extract(&program, &ExtractOptions::default()).expect("extraction should succeed");
    assert_eq!(doc.modules.len(), 2);
    assert!(doc.modules[0].is_empty());
    assert_eq!(doc.non_empty_modules().count(), 1);

    doc.discard_empty_modules();
    assert_eq!(doc.modules.len(), 1);
}

#[test]
fn variables_and_nested_exports_are_collected() {
    let mut builder = ProgramBuilder::new();
    let module = builder.add_file(SOURCE);

    let version = builder.symbol("VERSION", SymbolFlags::VARIABLE);
    builder.declare(version, Declaration::new(DeclarationKind::Variable, pos(1, 1)));
    builder.set_doc(version, "Library version.");
    let string = builder.string();
    builder.set_type(version, string);
    builder.export(module, "VERSION", version);

    let shapes = class(&mut builder, module, "Shapes", 3);
    let helper = builder.symbol("helper", SymbolFlags::FUNCTION);
    builder.declare(helper, Declaration::new(DeclarationKind::Function, pos(8, 8)));
    builder.export(shapes, "helper", helper);
    let create = builder.symbol("create", SymbolFlags::METHOD);
    builder.declare(
        create,
        Declaration::new(DeclarationKind::Method, pos(4, 4)).with_modifiers(ModifierFlags::STATIC),
    );
    builder.export(shapes, "create", create);
    let program = builder.build();

    let doc = extract(&program, &ExtractOptions::default()).expect("extraction should succeed");
    let variable = &doc.modules[1].variable_list[0];
    assert_eq!(variable.name, "VERSION");
    assert_eq!(variable.doc.as_deref(), Some("Library version."));
    assert_eq!(variable.ty, Some(TypeSpec::name("string")));

    let nested = &doc.find_class("Shapes").expect("Shapes").exports;
    assert_eq!(nested.function_list.len(), 1);
    assert_eq!(nested.function_list[0].name.as_deref(), Some("helper"));
}

#[test]
fn literal_typed_variables_carry_their_value() {
    let mut builder = ProgramBuilder::new();
    let module = builder.add_file(SOURCE);

    let retries = builder.symbol("RETRIES", SymbolFlags::VARIABLE);
    builder.declare(retries, Declaration::new(DeclarationKind::Variable, pos(1, 1)));
    let three = builder.number_literal(3.0);
    builder.set_type(retries, three);
    builder.export(module, "RETRIES", retries);

    let name = builder.symbol("NAME", SymbolFlags::VARIABLE);
    builder.declare(name, Declaration::new(DeclarationKind::Variable, pos(2, 2)));
    let tydoc = builder.string_literal("tydoc");
    builder.set_type(name, tydoc);
    builder.export(module, "NAME", name);

    let limit = builder.symbol("limit", SymbolFlags::VARIABLE);
    builder.declare(limit, Declaration::new(DeclarationKind::Variable, pos(3, 3)));
    let number = builder.number();
    builder.set_type(limit, number);
    builder.export(module, "limit", limit);
    let program = builder.build();

    let doc = extract(&program, &ExtractOptions::default()).expect("extraction should succeed");
    let variables: Vec<_> = doc
        .modules
        .iter()
        .flat_map(|module| module.variable_list.iter())
        .collect();
    assert_eq!(variables.len(), 3);

    assert_eq!(variables[0].name, "NAME");
    assert_eq!(variables[0].value, Some(LiteralValue::String("tydoc".into())));
    assert_eq!(variables[1].name, "RETRIES");
    assert_eq!(variables[1].value, Some(LiteralValue::Number(3.0)));
    assert_eq!(doc.format_type(variables[1].ty.as_ref().expect("type")), "3");
    assert_eq!(variables[2].name, "limit");
    assert_eq!(variables[2].value, None);
}

#[test]
fn library_file_is_never_walked() {
    let program = ProgramBuilder::new().build();
    let doc = extract(&program, &ExtractOptions::default()).expect("extraction should succeed");
    assert!(doc.modules.is_empty());
    assert!(doc.refs.is_empty());
}
