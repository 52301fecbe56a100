//! The message tree the extractor reads, and the flat traversal over it.
use std::borrow::Cow;

use mailparse::{MailHeaderMap, ParsedMail};
use tracing::warn;

use crate::errors::{MailBodyError, MailBodyResult};

/// A node of an already-parsed MIME tree. Messages and parts share the shape.
///
/// Implementations must hand out content with the transfer encoding already
/// removed. Only multipart nodes may have children.
pub trait MimeEntity: Sized {
    fn is_multipart(&self) -> bool;

    /// Raw value of the first header called `name` (case-insensitive),
    /// parameters included.
    fn header(&self, name: &str) -> Option<String>;

    fn has_header(&self, name: &str) -> bool {
        self.header(name).is_some()
    }

    fn content(&self) -> Cow<'_, [u8]>;

    fn children(&self) -> &[Self];
}

impl MimeEntity for ParsedMail<'_> {
    fn is_multipart(&self) -> bool {
        self.ctype.mimetype.starts_with("multipart/")
    }

    fn header(&self, name: &str) -> Option<String> {
        self.headers.get_first_value(name)
    }

    fn content(&self) -> Cow<'_, [u8]> {
        match self.get_body_raw() {
            Ok(body) => Cow::Owned(body),
            Err(e) => {
                warn!(error = %e, "Undecodable part body, treating as empty");
                Cow::Borrowed(&[])
            }
        }
    }

    fn children(&self) -> &[Self] {
        &self.subparts
    }
}

/// Every node the walker visits, in document order.
///
/// For a multipart root this is a pre-order listing of all descendants,
/// containers and leaves alike (the root itself is not included). A
/// non-multipart root is its own only part.
pub fn flatten<E: MimeEntity>(root: &E) -> Vec<&E> {
    flatten_pruned(root, |_| false)
}

/// Like [`flatten`], but the descendants of any container for which `prune`
/// returns true are left out. The container itself is still listed.
pub fn flatten_pruned<E, F>(root: &E, prune: F) -> Vec<&E>
where
    E: MimeEntity,
    F: FnMut(&E) -> bool,
{
    flatten_with_depth(root, prune)
        .into_iter()
        .map(|(_, node)| node)
        .collect()
}

/// [`flatten_pruned`] with each node's nesting depth (direct children of the
/// root are at depth 1; a single-part root is at depth 0).
pub fn flatten_with_depth<E, F>(root: &E, mut prune: F) -> Vec<(usize, &E)>
where
    E: MimeEntity,
    F: FnMut(&E) -> bool,
{
    if !root.is_multipart() {
        return vec![(0, root)];
    }
    let mut out = Vec::new();
    visit(root.children(), 1, &mut prune, &mut out);
    out
}

fn visit<'a, E, F>(nodes: &'a [E], depth: usize, prune: &mut F, out: &mut Vec<(usize, &'a E)>)
where
    E: MimeEntity,
    F: FnMut(&E) -> bool,
{
    for node in nodes {
        out.push((depth, node));
        if node.is_multipart() && !prune(node) {
            visit(node.children(), depth + 1, prune, out);
        }
    }
}

/// Boundary check a caller runs before extraction. The extractor itself has
/// no depth limit, so untrusted trees should pass through here first.
pub fn check_structure<E: MimeEntity>(root: &E, max_depth: Option<usize>) -> MailBodyResult<()> {
    let mut path = Vec::new();
    check_node(root, 0, max_depth, &mut path)
}

fn check_node<E: MimeEntity>(
    node: &E,
    depth: usize,
    max_depth: Option<usize>,
    path: &mut Vec<usize>,
) -> MailBodyResult<()> {
    if let Some(limit) = max_depth {
        if depth > limit {
            return Err(MailBodyError::TooDeep { depth, limit });
        }
    }
    let children = node.children();
    if !node.is_multipart() && !children.is_empty() {
        return Err(MailBodyError::StructureViolation {
            path: part_path(path),
            children: children.len(),
        });
    }
    for (i, child) in children.iter().enumerate() {
        path.push(i + 1);
        check_node(child, depth + 1, max_depth, path)?;
        path.pop();
    }
    Ok(())
}

/// IMAP-style section number, `1.2.1`; the root is `0`.
fn part_path(path: &[usize]) -> String {
    if path.is_empty() {
        return "0".to_string();
    }
    path.iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(".")
}
