//! Tree helpers over libxml2.
//!
//! The splicer parses two documents, moves an element from one into the
//! other and writes the result back out. `libxml` does the parsing, the
//! reparenting and the escaping on output; this module only adds the lookups
//! and edits the splicer needs on top of its `Document` and `Node` handles.
use crate::error::{Error, Result};
use libxml::{
    parser::{Parser, ParserOptions},
    tree::{Document, Node, NodeType},
};

/// Parse `text` as a standalone XML document.
///
/// libxml2's recovery mode is switched off, so anything that isn't well
/// formed (including a document without a root element) is an error rather
/// than a best effort tree.
pub fn parse(text: &str) -> Result<Document> {
    let options = ParserOptions {
        recover: false,
        ..Default::default()
    };
    Parser::default()
        .parse_string_with_options(text, options)
        .map_err(|err| Error::Xml(format!("{:?}", err)))
}

/// First element below `node` whose local name is `local_name`, in document
/// order. `node` itself is not considered.
pub fn find_descendant(node: &Node, local_name: &str) -> Option<Node> {
    node.get_child_elements().into_iter().find_map(|child| {
        if child.get_name() == local_name {
            Some(child)
        } else {
            find_descendant(&child, local_name)
        }
    })
}

/// Move the root element of `source` into `target`.
///
/// The returned node belongs to `target` and isn't linked anywhere yet.
pub fn adopt_root(target: &mut Document, source: &Document) -> Result<Node> {
    let mut root = source
        .get_root_element()
        .ok_or_else(|| Error::Structural("Payload document has no root element".into()))?;
    root.unlink_node();
    target
        .import_node(&mut root)
        .map_err(|_| Error::Tree(format!("Failed to import <{}>", root.get_name())))
}

/// Append `child` as the last child of `parent`.
pub fn append_child(parent: &mut Node, child: &mut Node) -> Result<()> {
    parent
        .add_child(child)
        .map_err(|err| Error::Tree(err.to_string()))
}

/// Replace the character data directly after `element`'s start tag with
/// `text`. Child elements, and anything after the first of them, stay where
/// they are.
pub fn set_text(document: &Document, element: &mut Node, text: &str) -> Result<()> {
    let leading: Vec<Node> = element
        .get_child_nodes()
        .into_iter()
        .take_while(is_character_data)
        .collect();
    for mut node in leading {
        node.unlink_node();
    }

    let mut text = Node::new_text(text, document)
        .map_err(|_| Error::Tree("Failed to create a text node".into()))?;
    match element.get_first_child() {
        Some(mut first) => first
            .add_prev_sibling(&mut text)
            .map_err(|err| Error::Tree(err.to_string())),
        None => append_child(element, &mut text),
    }
}

/// Remove whitespace-only text nodes used for indentation below `node`.
///
/// Only elements with an element, comment or processing instruction child
/// lose their whitespace. A leaf like `<b> </b>` keeps it, because there the
/// whitespace is the element's content. Nothing is added back, so the result
/// is compact rather than re-indented.
pub fn unindent(node: &Node) {
    let children = node.get_child_nodes();
    let structured = children.iter().any(|child| {
        matches!(
            child.get_type(),
            Some(NodeType::ElementNode) | Some(NodeType::CommentNode) | Some(NodeType::PiNode)
        )
    });
    for mut child in children {
        if child.is_element_node() {
            unindent(&child);
        } else if structured && child.is_text_node() && child.get_content().trim().is_empty() {
            child.unlink_node();
        }
    }
}

/// Serialize `node` and everything below it, without a declaration or
/// added formatting.
pub fn to_xml(document: &Document, node: &Node) -> String {
    document.node_to_string(node)
}

fn is_character_data(node: &Node) -> bool {
    matches!(
        node.get_type(),
        Some(NodeType::TextNode) | Some(NodeType::CDataSectionNode)
    )
}
