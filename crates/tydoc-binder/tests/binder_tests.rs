use std::fs;

use tempfile::TempDir;
use tydoc::{
    ClassKind, Documentation, ExtractOptions, LiteralValue, OutputLayout, Program, extract,
};
use tydoc_binder::{BindError, Binder, bind_paths};

fn bind(sources: &[(&str, &str)]) -> Program {
    let mut binder = Binder::new();
    for (path, text) in sources {
        binder.add_source(path, *text).unwrap();
    }
    binder.bind().unwrap()
}

fn docs(sources: &[(&str, &str)]) -> Documentation {
    extract(&bind(sources), &ExtractOptions::default()).unwrap()
}

#[test]
fn point_and_line_share_one_reference() {
    let docs = docs(&[(
        "src/geometry.ts",
        r#"
export class Line {
    a: Point;
    b: Point;
}

export class Point {
    x: number;
    y: number;
}
"#,
    )]);

    let line = docs.find_class("Line").unwrap();
    let a = line.property("a").unwrap().ty.clone().unwrap();
    let b = line.property("b").unwrap().ty.clone().unwrap();
    assert_eq!(a.ref_id(), b.ref_id());

    let point = docs.ref_class(a.ref_id().unwrap()).unwrap();
    assert_eq!(point.name, "Point");
    assert_eq!(point.kind, ClassKind::Class);
    assert_eq!(docs.format_type(point.property("x").unwrap().ty.as_ref().unwrap()), "number");
}

#[test]
fn positions_are_one_based_lines() {
    let docs = docs(&[(
        "src/point.ts",
        "export class Point {\n    x: number;\n}\n",
    )]);

    let point = docs.find_class("Point").unwrap();
    let pos = point.pos.as_ref().unwrap();
    assert_eq!(pos.source_path, "src/point.ts");
    assert_eq!((pos.first_line, pos.last_line), (1, 3));
    let x = point.property("x").unwrap().pos.as_ref().unwrap();
    assert_eq!((x.first_line, x.last_line), (2, 2));
}

#[test]
fn enum_members_count_up_from_initializers() {
    let docs = docs(&[(
        "src/color.ts",
        r#"
export enum Color {
    Red,
    Green = 5,
    Blue,
}

export enum Mode {
    Read = "r",
    Write = "w",
}
"#,
    )]);

    let color = docs.find_enum("Color").unwrap();
    let values: Vec<_> = color
        .member_list
        .iter()
        .map(|member| (member.name.as_str(), member.value.clone()))
        .collect();
    assert_eq!(
        values,
        vec![
            ("Red", Some(LiteralValue::Number(0.0))),
            ("Green", Some(LiteralValue::Number(5.0))),
            ("Blue", Some(LiteralValue::Number(6.0))),
        ]
    );

    let mode = docs.find_enum("Mode").unwrap();
    assert_eq!(
        mode.member_list[1].value,
        Some(LiteralValue::String("w".to_string()))
    );
}

#[test]
fn jsdoc_summaries_and_parameters_are_attached() {
    let docs = docs(&[(
        "src/math.ts",
        r#"
/**
 * Adds two numbers.
 * @param a - first operand
 * @param b second operand
 */
export function add(a: number, b?: number): number {
    return a + (b ?? 0);
}
"#,
    )]);

    let add = docs.find_function("add").unwrap();
    let signature = &add.signature_list[0];
    assert_eq!(signature.doc.as_deref(), Some("Adds two numbers."));
    assert_eq!(signature.param_list[0].doc.as_deref(), Some("first operand"));
    assert_eq!(signature.param_list[1].doc.as_deref(), Some("second operand"));
    assert!(!signature.param_list[0].optional);
    assert!(signature.param_list[1].optional);
    assert_eq!(docs.format_type(&signature.return_type), "number");
}

#[test]
fn overloads_hide_the_implementation() {
    let docs = docs(&[(
        "src/parse.ts",
        r#"
export function parse(text: string): number;
export function parse(text: string, radix: number): number;
export function parse(text: string, radix?: number): number {
    return 0;
}
"#,
    )]);

    let parse = docs.find_function("parse").unwrap();
    let arities: Vec<usize> = parse
        .signature_list
        .iter()
        .map(|signature| signature.param_list.len())
        .collect();
    assert_eq!(arities, vec![1, 2]);
}

#[test]
fn classes_without_constructors_get_a_default_one() {
    let docs = docs(&[(
        "src/shapes.ts",
        r#"
export class Shape {
    constructor(public name: string) {}
}

export class Square extends Shape {
    side = 1;
}

export class Empty {}
"#,
    )]);

    let shape = docs.find_class("Shape").unwrap();
    assert_eq!(shape.property("name").map(|p| p.name.as_str()), Some("name"));

    let square = docs.find_class("Square").unwrap();
    let construct = square.construct.as_ref().unwrap();
    assert_eq!(construct.signature_list.len(), 1);
    assert_eq!(construct.signature_list[0].param_list[0].name, "name");
    assert_eq!(
        docs.format_type(&construct.signature_list[0].return_type),
        "Square"
    );
    assert_eq!(square.extend_list.len(), 1);
    assert_eq!(docs.class(square.extend_list[0]).name, "Shape");
    assert_eq!(
        docs.format_type(square.property("side").unwrap().ty.as_ref().unwrap()),
        "number"
    );

    let empty = docs.find_class("Empty").unwrap();
    let construct = empty.construct.as_ref().unwrap();
    assert!(construct.signature_list[0].param_list.is_empty());
}

#[test]
fn private_members_are_left_out() {
    let docs = docs(&[(
        "src/counter.ts",
        r#"
export class Counter {
    private count = 0;
    #secret = "";
    protected step = 1;
    increment(): void {}
    private reset(): void {}
}
"#,
    )]);

    let counter = docs.find_class("Counter").unwrap();
    let properties: Vec<&str> = counter
        .property_list
        .iter()
        .map(|property| property.name.as_str())
        .collect();
    assert_eq!(properties, vec!["step"]);
    assert!(counter.method("increment").is_some());
    assert!(counter.method("reset").is_none());
}

#[test]
fn interfaces_carry_index_signatures_and_heritage() {
    let docs = docs(&[(
        "src/table.ts",
        r#"
export interface Named {
    readonly name: string;
}

export interface Table extends Named {
    [key: string]: number;
    size?: number;
    lookup(key: string): number | undefined;
}
"#,
    )]);

    let table = docs.find_class("Table").unwrap();
    assert_eq!(table.kind, ClassKind::Interface);
    assert!(table.property("size").unwrap().optional);

    let index = table.index.as_ref().unwrap();
    assert_eq!(docs.format_type(index.signature.as_ref().unwrap()), "string");
    assert_eq!(docs.format_type(index.value.as_ref().unwrap()), "number");

    let lookup = table.method("lookup").unwrap();
    assert!(lookup.signature_list[0].return_type.is_compound());
    assert_eq!(docs.class(table.extend_list[0]).name, "Named");
}

#[test]
fn imports_resolve_across_files() {
    let docs = docs(&[
        (
            "src/point.ts",
            "export class Point {\n    x: number;\n}\n",
        ),
        (
            "src/line.ts",
            r#"
import { Point } from "./point";

export class Line {
    points: Point[];
}
"#,
        ),
    ]);

    let line = docs.find_class("Line").unwrap();
    let points = line.property("points").unwrap().ty.as_ref().unwrap();
    assert_eq!(docs.format_type(points), "Point[]");

    let point = docs.find_class("Point").unwrap();
    let tydoc::TypeSpec::ArrayOf(element) = points else {
        panic!("expected an array, got {points:?}");
    };
    let referenced = docs.ref_class(element.ref_id().unwrap()).unwrap();
    assert!(std::ptr::eq(referenced, point));
}

#[test]
fn star_and_named_re_exports_are_followed() {
    let program = bind(&[
        ("src/index.ts", "export * from \"./shapes\";\nexport { Color as Colour } from \"./color\";\n"),
        ("src/shapes.ts", "export class Circle {\n    radius: number;\n}\n"),
        ("src/color.ts", "export enum Color {\n    Red,\n}\n"),
    ]);

    let index = program.find_symbol("\"src/index.ts\"").unwrap();
    let exports = &program.symbol(index).exports;
    assert!(exports.contains_key("Circle"));
    assert!(exports.contains_key("Colour"));

    let docs = extract(&program, &ExtractOptions::default()).unwrap();
    assert!(docs.find_class("Circle").is_some());
    assert!(docs.find_enum("Color").is_some());
}

#[test]
fn const_literals_keep_their_value() {
    let docs = docs(&[(
        "src/config.ts",
        r#"
export const NAME = "tydoc";
export const LIMIT = 3;
export let retries = 3;
"#,
    )]);

    let variable = |name: &str| {
        docs.modules
            .iter()
            .flat_map(|module| module.variable_list.iter())
            .find(|variable| variable.name == name)
            .unwrap()
    };

    let name = variable("NAME");
    assert_eq!(name.value, Some(LiteralValue::String("tydoc".to_string())));

    let limit = variable("LIMIT");
    assert_eq!(limit.value, Some(LiteralValue::Number(3.0)));
    assert_eq!(docs.format_type(limit.ty.as_ref().unwrap()), "3");

    let retries = variable("retries");
    assert_eq!(retries.value, None);
    assert_eq!(docs.format_type(retries.ty.as_ref().unwrap()), "number");
}

#[test]
fn accessors_are_listed_as_properties() {
    let docs = docs(&[(
        "src/counter.ts",
        r#"
export class Counter {
    private count = 0;

    get value(): number {
        return this.count;
    }

    set label(text: string) {}

    increment(): void {}
}
"#,
    )]);

    let counter = docs.find_class("Counter").unwrap();
    let value = counter.property("value").unwrap();
    assert_eq!(docs.format_type(value.ty.as_ref().unwrap()), "number");
    let label = counter.property("label").unwrap();
    assert_eq!(docs.format_type(label.ty.as_ref().unwrap()), "string");
    assert!(counter.property("count").is_none());
    assert!(counter.method("increment").is_some());
    assert!(counter.method("value").is_none());
}

#[test]
fn global_augmentations_are_skipped() {
    let docs = docs(&[(
        "src/window.ts",
        r#"
export class Widget {
    id: string;
}

declare global {
    interface Window {
        widget: Widget;
    }
}
"#,
    )]);

    assert_eq!(docs.non_empty_modules().count(), 1);
    assert!(docs.find_class("Widget").is_some());
    assert!(docs.find_class("Window").is_none());
}

#[test]
fn namespaces_export_nested_declarations() {
    let docs = docs(&[(
        "src/geo.ts",
        r#"
export class Geo {}

export namespace Geo {
    export class Coordinate {
        lat: number;
    }
}
"#,
    )]);

    let geo = docs.find_class("Geo").unwrap();
    assert_eq!(geo.exports.class_list.len(), 1);
    assert_eq!(docs.class(geo.exports.class_list[0]).name, "Coordinate");
}

#[test]
fn scripts_are_not_documented() {
    let program = bind(&[("src/globals.ts", "declare class Legacy {}\n")]);
    let docs = extract(&program, &ExtractOptions::default()).unwrap();
    assert!(docs.modules.is_empty());
    assert!(program.files.iter().skip(1).all(|file| file.symbol.is_none()));
}

#[test]
fn parse_errors_name_the_source() {
    let mut binder = Binder::new();
    binder.add_source("src/broken.ts", "export class {").unwrap();
    let error = binder.bind().unwrap_err();
    assert!(matches!(error, BindError::Parse { .. }));
    assert!(error.to_string().contains("src/broken.ts"));
}

#[test]
fn duplicate_sources_are_rejected() {
    let mut binder = Binder::new();
    binder.add_source("src/a.ts", "").unwrap();
    let error = binder.add_source("src/./a.ts", "").unwrap_err();
    assert!(matches!(error, BindError::DuplicateSource { .. }));
}

#[test]
fn bind_paths_reads_files_and_records_layout() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("src");
    fs::create_dir_all(&src).unwrap();
    let point = src.join("point.ts");
    fs::write(&point, "export interface Point {\n    x: number;\n}\n").unwrap();

    let layout = OutputLayout::new(&src, dir.path().join("dist"));
    let program = bind_paths(&[&point], Some(layout.clone())).unwrap();
    assert_eq!(program.layout, Some(layout));

    let docs = extract(&program, &ExtractOptions::default()).unwrap();
    assert_eq!(docs.find_class("Point").unwrap().kind, ClassKind::Interface);
}

#[test]
fn missing_files_report_io_errors() {
    let dir = TempDir::new().unwrap();
    let error = bind_paths(&[dir.path().join("missing.ts")], None).unwrap_err();
    assert!(matches!(error, BindError::Io { .. }));
}

#[test]
fn program_snapshot_round_trips_through_json() {
    let program = bind(&[("src/point.ts", "export class Point {\n    x: number;\n}\n")]);
    let json = program.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert!(value["symbols"].as_array().is_some_and(|symbols| !symbols.is_empty()));
    assert_eq!(Program::from_json(&json).unwrap(), program);
}
