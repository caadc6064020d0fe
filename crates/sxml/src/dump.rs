//! Indented debug listing of a document tree

use crate::model::{Element, Node};

const INDENT: &str = "....";
const SPACE_MARK: &str = "^";

/// One line per node; each nesting level adds `....`, and spaces inside
/// text show as `^`
pub fn dump(doc: &Element) -> String {
    let mut out = String::new();
    dump_element(doc, 0, &mut out);
    out
}

fn dump_element(e: &Element, level: usize, out: &mut String) {
    out.push_str(&INDENT.repeat(level));
    out.push_str(&e.name);
    out.push_str(" (ELEMENT)");
    if !e.attrs.is_empty() {
        out.push_str(" [");
        for attr in &e.attrs {
            out.push('{');
            out.push_str(&attr.name);
            out.push('=');
            out.push_str(&attr.value);
            out.push_str("} ");
        }
        out.push(']');
    }
    out.push('\n');

    for child in &e.children {
        match child {
            Node::Element(child) => dump_element(child, level + 1, out),
            Node::Text(text) => {
                out.push_str(&INDENT.repeat(level + 1));
                out.push_str(&text.replace(' ', SPACE_MARK));
                out.push('\n');
            }
        }
    }
}
