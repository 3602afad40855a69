//! Domain entities: the navigation tree

use std::borrow::Borrow;
use std::fmt;
use std::slice;

use itertools::Itertools;
use serde::Serialize;

/// Identifier of a content document, e.g. `guides/best-practices`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct DocId(String);

impl DocId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Borrow<str> for DocId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Reference to a document, optionally with an explicit sidebar label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocItem {
    pub id: DocId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Labeled grouping of items. Labels need not be unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub label: String,
    /// Rendered collapsed on first load
    pub collapsed: bool,
    /// Whether the reader may toggle the category
    pub collapsible: bool,
    pub items: Vec<SidebarItem>,
}

/// Plain link entry; never a page reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkItem {
    pub label: String,
    pub href: String,
}

/// One node of a navigation tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SidebarItem {
    Doc(DocItem),
    Category(Category),
    Link(LinkItem),
}

impl SidebarItem {
    /// Display text used when rendering the tree.
    pub fn display_label(&self) -> &str {
        match self {
            SidebarItem::Doc(doc) => doc.label.as_deref().unwrap_or(doc.id.as_str()),
            SidebarItem::Category(category) => &category.label,
            SidebarItem::Link(link) => &link.label,
        }
    }
}

/// A named, ordered navigation tree.
///
/// Immutable once constructed: the item order is exactly the declared order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sidebar {
    pub id: String,
    pub items: Vec<SidebarItem>,
}

/// Item counts for one sidebar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SidebarStats {
    pub docs: usize,
    pub categories: usize,
    pub links: usize,
    /// Nesting depth; top-level items are depth 1
    pub depth: usize,
}

impl Sidebar {
    /// Depth-first, pre-order traversal of every item with its nesting level
    /// (top-level items have level 0).
    pub fn walk(&self) -> Walk<'_> {
        Walk::new(&self.items)
    }

    /// All page references in depth-first declared order.
    ///
    /// The iterator borrows the tree, so calling this again starts over.
    pub fn doc_ids(&self) -> DocIds<'_> {
        DocIds { walk: self.walk() }
    }

    pub fn stats(&self) -> SidebarStats {
        self.walk()
            .fold(SidebarStats::default(), |mut stats, (level, item)| {
                match item {
                    SidebarItem::Doc(_) => stats.docs += 1,
                    SidebarItem::Category(_) => stats.categories += 1,
                    SidebarItem::Link(_) => stats.links += 1,
                }
                stats.depth = stats.depth.max(level + 1);
                stats
            })
    }

    /// Document ids referenced more than once in this sidebar, in order of
    /// first repetition.
    pub fn duplicate_doc_ids(&self) -> Vec<&DocId> {
        self.doc_ids().duplicates().collect()
    }
}

/// Depth-first iterator over sidebar items.
pub struct Walk<'a> {
    stack: Vec<(usize, slice::Iter<'a, SidebarItem>)>,
}

impl<'a> Walk<'a> {
    fn new(items: &'a [SidebarItem]) -> Self {
        Self {
            stack: vec![(0, items.iter())],
        }
    }
}

impl<'a> Iterator for Walk<'a> {
    type Item = (usize, &'a SidebarItem);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (level, iter) = self.stack.last_mut()?;
            let level = *level;
            match iter.next() {
                Some(item) => {
                    if let SidebarItem::Category(category) = item {
                        self.stack.push((level + 1, category.items.iter()));
                    }
                    return Some((level, item));
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

/// Iterator over the page references of a sidebar.
pub struct DocIds<'a> {
    walk: Walk<'a>,
}

impl<'a> Iterator for DocIds<'a> {
    type Item = &'a DocId;

    fn next(&mut self) -> Option<Self::Item> {
        self.walk.by_ref().find_map(|(_, item)| match item {
            SidebarItem::Doc(doc) => Some(&doc.id),
            _ => None,
        })
    }
}

/// All sidebars of a site, in declaration order, with one marked active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarSet {
    sidebars: Vec<Sidebar>,
    active: usize,
}

impl SidebarSet {
    /// Callers guarantee `active < sidebars.len()`.
    pub(crate) fn new(sidebars: Vec<Sidebar>, active: usize) -> Self {
        Self { sidebars, active }
    }

    pub fn active(&self) -> &Sidebar {
        &self.sidebars[self.active]
    }

    pub fn get(&self, id: &str) -> Option<&Sidebar> {
        self.sidebars.iter().find(|s| s.id == id)
    }

    pub fn iter(&self) -> slice::Iter<'_, Sidebar> {
        self.sidebars.iter()
    }

    pub fn len(&self) -> usize {
        self.sidebars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sidebars.is_empty()
    }

    /// True if any sidebar references the document.
    pub fn references(&self, id: &str) -> bool {
        self.sidebars
            .iter()
            .any(|s| s.doc_ids().any(|doc| doc.as_str() == id))
    }
}
