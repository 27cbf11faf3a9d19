//! Small helpers over the `kuchiki` DOM used by the cleanup passes.

use kuchiki::iter::NodeEdge;
use kuchiki::traits::*;
use kuchiki::NodeRef;

/// Parse a full document or a fragment; missing `html`/`body` are implied.
pub fn parse(html: &str) -> NodeRef {
    kuchiki::parse_html().one(html)
}

/// Local name of an element node.
pub fn element_name(node: &NodeRef) -> Option<String> {
    node.as_element().map(|e| e.name.local.to_string())
}

/// Every element with the given tag name, in document order.
///
/// Collected up front so callers can detach nodes while walking the list.
pub fn elements(root: &NodeRef, name: &str) -> Vec<NodeRef> {
    root.descendants()
        .filter(|node| element_name(node).as_deref() == Some(name))
        .collect()
}

/// Whether any ancestor of `node` is a `name` element.
pub fn has_ancestor(node: &NodeRef, name: &str) -> bool {
    node.ancestors()
        .any(|a| element_name(&a).as_deref() == Some(name))
}

/// Replace an element by its children.
pub fn unwrap_node(node: &NodeRef) {
    if node.parent().is_none() {
        return;
    }
    let children: Vec<NodeRef> = node.children().collect();
    for child in children {
        node.insert_before(child);
    }
    node.detach();
}

/// Text of every descendant text node, each trimmed, concatenated.
pub fn stripped_text(node: &NodeRef) -> String {
    node.descendants()
        .text_nodes()
        .map(|text| text.borrow().trim().to_string())
        .collect()
}

/// Deepest element nesting below `root`, walked without recursion.
pub fn max_depth(root: &NodeRef) -> usize {
    let mut depth = 0usize;
    let mut deepest = 0;
    for edge in root.traverse() {
        match edge {
            NodeEdge::Start(node) if node.as_element().is_some() => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            NodeEdge::End(node) if node.as_element().is_some() => depth -= 1,
            _ => {}
        }
    }
    deepest
}

/// Serialized content of `<body>`, or the whole document without one.
pub fn body_html(document: &NodeRef) -> String {
    match elements(document, "body").first() {
        Some(body) => body.children().map(|child| child.to_string()).collect(),
        None => document.to_string(),
    }
}
