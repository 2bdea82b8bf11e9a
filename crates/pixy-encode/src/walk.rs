//! Depth-first traversal of an XML element tree.

use crate::Result;
use regex::Regex;
use roxmltree::Node;

fn doctype_regex() -> &'static Regex {
    static RE: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<!DOCTYPE\s+([^\s\[>]+)").expect("valid regex"))
}

fn comment_regex() -> &'static Regex {
    static RE: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<!--.*?(?:-->|$)").expect("valid regex"))
}

/// Name declared by the `<!DOCTYPE ...>` in `prolog`, if any. Declarations inside comments
/// are ignored.
///
/// Pass only the text before the root element; the body may quote arbitrary markup.
pub fn doctype_name(prolog: &str) -> Option<&str> {
    let comments: Vec<_> = comment_regex().find_iter(prolog).map(|m| m.range()).collect();
    doctype_regex()
        .captures_iter(prolog)
        .filter_map(|c| c.get(1))
        .find(|m| !comments.iter().any(|r| r.contains(&m.start())))
        .map(|m| m.as_str())
}

/// Whether to visit an element's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Descend,
    /// Skip the children; `exit` is not called for this element.
    Skip,
}

/// Receives element events in document order.
pub trait TreeVisitor {
    fn enter(&mut self, node: Node<'_, '_>) -> Result<Flow>;
    fn exit(&mut self, node: Node<'_, '_>) -> Result<()>;
}

/// Walks the elements below and including `node`. The first error stops the walk.
pub fn walk<V: TreeVisitor + ?Sized>(node: Node<'_, '_>, visitor: &mut V) -> Result<()> {
    if !node.is_element() {
        return Ok(());
    }
    if visitor.enter(node)? == Flow::Skip {
        return Ok(());
    }
    for child in node.children() {
        walk(child, visitor)?;
    }
    visitor.exit(node)
}
