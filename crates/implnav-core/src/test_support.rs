//! Shared fixtures for unit tests

use crate::model::{DocumentEntry, ProgramFile, ReferenceEntry, SymbolEntry, SymbolId, SymbolKind, TypeEntry};

pub(crate) const SHAPES_PATH: &str = "shapes.kt";

pub(crate) const SHAPES_KT: &str = "interface Shape {
    fun area(): Double
}

open class Polygon : Shape {
    override fun area(): Double = 0.0
}

class Square : Polygon() {
    override fun area(): Double = 4.0
}

class Circle : Shape {
    override fun area(): Double = 3.14
}

fun total(shape: Shape, poly: Polygon) = shape.area() + poly.area()
";

/// Byte offset of the `nth` occurrence of `needle` in the fixture
pub(crate) fn offset_of(needle: &str, nth: usize) -> usize {
    SHAPES_KT
        .match_indices(needle)
        .nth(nth)
        .map(|(offset, _)| offset)
        .unwrap_or_else(|| panic!("fixture has no occurrence {} of {:?}", nth, needle))
}

fn declaration(
    id: &str,
    name: &str,
    nth: usize,
    kind: SymbolKind,
    container: Option<&str>,
    implements: &[&str],
) -> SymbolEntry {
    SymbolEntry {
        id: SymbolId::new(id),
        name: name.to_string(),
        kind,
        container: container.map(str::to_string),
        path: SHAPES_PATH.to_string(),
        name_offset: offset_of(name, nth),
        implements: implements.iter().map(|id| SymbolId::new(*id)).collect(),
        include_self: None,
    }
}

fn reference(needle: &str, nth: usize, target: &str, qualifier: Option<&str>) -> ReferenceEntry {
    ReferenceEntry {
        path: SHAPES_PATH.to_string(),
        offset: offset_of(needle, nth),
        len: needle.len(),
        target: SymbolId::new(target),
        qualifier: qualifier.map(str::to_string),
    }
}

/// Shape hierarchy: `Shape.area` is implemented by `Polygon.area` and
/// `Circle.area`; `Polygon.area` is overridden by `Square.area`.
pub(crate) fn shapes_program() -> ProgramFile {
    let mut shape_area = declaration("Shape.area", "area", 0, SymbolKind::Method, Some("Shape"), &[]);
    shape_area.include_self = Some(true);

    ProgramFile {
        documents: vec![DocumentEntry {
            path: SHAPES_PATH.to_string(),
            text: SHAPES_KT.to_string(),
        }],
        symbols: vec![
            declaration("Shape", "Shape", 0, SymbolKind::Interface, None, &[]),
            shape_area,
            declaration("Polygon", "Polygon", 0, SymbolKind::Class, None, &["Shape"]),
            declaration("Polygon.area", "area", 1, SymbolKind::Method, Some("Polygon"), &["Shape.area"]),
            declaration("Square", "Square", 0, SymbolKind::Class, None, &["Polygon"]),
            declaration("Square.area", "area", 2, SymbolKind::Method, Some("Square"), &["Polygon.area"]),
            declaration("Circle", "Circle", 0, SymbolKind::Class, None, &["Shape"]),
            declaration("Circle.area", "area", 3, SymbolKind::Method, Some("Circle"), &["Shape.area"]),
            declaration("total", "total", 0, SymbolKind::Function, None, &[]),
        ],
        references: vec![
            // `: Shape` supertype clause of Polygon
            reference("Shape", 1, "Shape", None),
            reference("area", 4, "Shape.area", Some("Shape")),
            reference("area", 5, "Polygon.area", Some("Polygon")),
        ],
        types: vec![
            TypeEntry {
                name: "Polygon".to_string(),
                supertypes: vec!["Shape".to_string()],
            },
            TypeEntry {
                name: "Square".to_string(),
                supertypes: vec!["Polygon".to_string()],
            },
            TypeEntry {
                name: "Circle".to_string(),
                supertypes: vec!["Shape".to_string()],
            },
        ],
    }
}
