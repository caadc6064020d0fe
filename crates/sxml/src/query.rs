//! Slash-separated path lookups over the document tree
//!
//! A path such as `html/body/p` is matched one name per level, starting with
//! the element the query is run on. Every element reached by the last
//! segment is returned in document order.

use crate::model::{Element, Node};

/// All elements reached by `path`, in document order
pub fn filter_nodes<'a>(path: &str, root: &'a Element) -> Vec<&'a Element> {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let mut found = Vec::new();
    collect(&segments, root, &mut found);
    found
}

fn collect<'a>(segments: &[&str], element: &'a Element, found: &mut Vec<&'a Element>) {
    let Some((first, rest)) = segments.split_first() else {
        return;
    };
    if element.name != *first {
        return;
    }
    if rest.is_empty() {
        found.push(element);
        return;
    }
    for child in element.elements() {
        collect(rest, child, found);
    }
}

/// First element reached by `path`
pub fn first_el<'a>(path: &str, root: &'a Element) -> Option<&'a Element> {
    filter_nodes(path, root).into_iter().next()
}

/// First text child among the elements reached by `path`
pub fn first_text<'a>(path: &str, root: &'a Element) -> Option<&'a str> {
    filter_nodes(path, root)
        .into_iter()
        .find_map(|e| e.children.iter().find_map(Node::as_text))
}

/// Value of attribute `name` on `element`
pub fn get_attr<'a>(name: &str, element: &'a Element) -> Option<&'a str> {
    element.attr(name)
}
