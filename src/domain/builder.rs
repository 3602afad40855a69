//! Navigation tree builder: resolves sidebar declarations against the
//! document index.

use std::collections::HashSet;

use tracing::{debug, instrument};

use crate::domain::declaration::{ItemDecl, SidebarDecl};
use crate::domain::document::DocumentIndex;
use crate::domain::entities::{
    Category, DocId, DocItem, LinkItem, Sidebar, SidebarItem, SidebarSet,
};
use crate::domain::error::{DanglingReference, DomainError, DomainResult, SchemaIssue};

/// Constructs validated navigation trees.
///
/// Construction never reorders, merges or prunes items: the tree mirrors
/// the declaration exactly, including empty categories. The only check is
/// referential integrity of page references.
pub struct NavTreeBuilder<'a> {
    index: &'a DocumentIndex,
}

impl<'a> NavTreeBuilder<'a> {
    pub fn new(index: &'a DocumentIndex) -> Self {
        Self { index }
    }

    /// Build one sidebar. Fails with every unresolved reference it contains.
    #[instrument(level = "debug", skip(self, decl), fields(sidebar = %decl.id))]
    pub fn construct(&self, decl: &SidebarDecl) -> DomainResult<Sidebar> {
        let mut dangling = Vec::new();
        let sidebar = self.resolve(decl, &mut dangling);
        if dangling.is_empty() {
            debug!("constructed sidebar with {} items", sidebar.items.len());
            Ok(sidebar)
        } else {
            Err(DomainError::DanglingReferences(dangling))
        }
    }

    /// Build every sidebar and designate the active one.
    ///
    /// `active` selects a sidebar by id; without it, the declaration must
    /// contain exactly one sidebar. Sidebars are built independently; unresolved
    /// references from all of them are reported together.
    pub fn construct_all(
        &self,
        decls: &[SidebarDecl],
        active: Option<&str>,
    ) -> DomainResult<SidebarSet> {
        let mut issues = Vec::new();
        let mut seen = HashSet::new();
        for decl in decls {
            if !seen.insert(decl.id.as_str()) {
                issues.push(SchemaIssue::new(
                    decl.id.clone(),
                    "sidebar id is declared more than once",
                ));
            }
        }
        if decls.is_empty() {
            issues.push(SchemaIssue::new("<root>", "no sidebar is declared"));
        }
        if !issues.is_empty() {
            return Err(DomainError::Schema(issues));
        }

        let active_index = match active {
            Some(id) => decls
                .iter()
                .position(|d| d.id == id)
                .ok_or_else(|| DomainError::UnknownSidebar(id.to_string()))?,
            None if decls.len() == 1 => 0,
            None => {
                return Err(DomainError::schema(
                    "docs.default_sidebar",
                    format!(
                        "{} sidebars are declared; choose the default one explicitly",
                        decls.len()
                    ),
                ))
            }
        };

        let mut dangling = Vec::new();
        let sidebars: Vec<Sidebar> = decls
            .iter()
            .map(|decl| self.resolve(decl, &mut dangling))
            .collect();

        if !dangling.is_empty() {
            return Err(DomainError::DanglingReferences(dangling));
        }
        Ok(SidebarSet::new(sidebars, active_index))
    }

    fn resolve(&self, decl: &SidebarDecl, dangling: &mut Vec<DanglingReference>) -> Sidebar {
        let items = self.resolve_items(&decl.items, &decl.id, &decl.id, dangling);
        Sidebar {
            id: decl.id.clone(),
            items,
        }
    }

    fn resolve_items(
        &self,
        items: &[ItemDecl],
        sidebar: &str,
        path: &str,
        dangling: &mut Vec<DanglingReference>,
    ) -> Vec<SidebarItem> {
        let mut resolved = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let item_path = format!("{path}[{i}]");
            let node = match item {
                ItemDecl::Doc { id, label } => {
                    if !self.index.contains(id) {
                        dangling.push(DanglingReference {
                            sidebar: sidebar.to_string(),
                            path: item_path,
                            id: id.clone(),
                        });
                    }
                    SidebarItem::Doc(DocItem {
                        id: DocId::new(id.as_str()),
                        label: label.clone(),
                    })
                }
                ItemDecl::Category {
                    label,
                    collapsed,
                    collapsible,
                    items,
                } => SidebarItem::Category(Category {
                    label: label.clone(),
                    collapsed: collapsed.unwrap_or(false),
                    collapsible: collapsible.unwrap_or(true),
                    items: self.resolve_items(
                        items,
                        sidebar,
                        &format!("{item_path}.items"),
                        dangling,
                    ),
                }),
                ItemDecl::Link { label, href } => SidebarItem::Link(LinkItem {
                    label: label.clone(),
                    href: href.clone(),
                }),
            };
            resolved.push(node);
        }
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> DocumentIndex {
        DocumentIndex::from_ids(["intro", "guide-a", "guide-b", "v1/intro"])
    }

    #[test]
    fn given_spec_example_when_constructing_then_flattens_in_declared_order() {
        let index = index();
        let decl = SidebarDecl::new(
            "docs",
            vec![
                ItemDecl::doc("intro"),
                ItemDecl::category(
                    "Guides",
                    vec![ItemDecl::doc("guide-a"), ItemDecl::doc("guide-b")],
                ),
            ],
        );

        let sidebar = NavTreeBuilder::new(&index).construct(&decl).unwrap();
        let flat: Vec<&str> = sidebar.doc_ids().map(DocId::as_str).collect();

        assert_eq!(flat, vec!["intro", "guide-a", "guide-b"]);
    }

    #[test]
    fn given_same_declaration_when_constructing_twice_then_results_are_equal() {
        let index = index();
        let decl = SidebarDecl::new(
            "docs",
            vec![
                ItemDecl::category("B", vec![ItemDecl::doc("guide-b")]),
                ItemDecl::category("A", vec![ItemDecl::doc("guide-a")]).collapsed(true),
            ],
        );
        let builder = NavTreeBuilder::new(&index);

        assert_eq!(
            builder.construct(&decl).unwrap(),
            builder.construct(&decl).unwrap()
        );
    }

    #[test]
    fn given_dangling_references_when_constructing_then_reports_all_with_paths() {
        let index = index();
        let decl = SidebarDecl::new(
            "docs",
            vec![
                ItemDecl::doc("missing-top"),
                ItemDecl::category("Guides", vec![ItemDecl::doc("guide-a"), ItemDecl::doc("gone")]),
            ],
        );

        let Err(DomainError::DanglingReferences(refs)) =
            NavTreeBuilder::new(&index).construct(&decl)
        else {
            panic!("expected dangling references");
        };

        assert_eq!(
            refs,
            vec![
                DanglingReference {
                    sidebar: "docs".into(),
                    path: "docs[0]".into(),
                    id: "missing-top".into(),
                },
                DanglingReference {
                    sidebar: "docs".into(),
                    path: "docs[1].items[1]".into(),
                    id: "gone".into(),
                },
            ]
        );
    }

    #[test]
    fn given_empty_category_when_constructing_then_keeps_it() {
        let index = index();
        let decl = SidebarDecl::new("docs", vec![ItemDecl::category("Soon", vec![])]);

        let sidebar = NavTreeBuilder::new(&index).construct(&decl).unwrap();

        let SidebarItem::Category(category) = &sidebar.items[0] else {
            panic!("expected category");
        };
        assert!(category.items.is_empty());
        assert!(!category.collapsed);
        assert!(category.collapsible);
    }

    #[test]
    fn given_single_sidebar_without_active_when_constructing_all_then_it_is_active() {
        let index = index();
        let decls = vec![SidebarDecl::new("only", vec![ItemDecl::doc("intro")])];

        let set = NavTreeBuilder::new(&index)
            .construct_all(&decls, None)
            .unwrap();

        assert_eq!(set.active().id, "only");
    }

    #[test]
    fn given_two_sidebars_without_active_when_constructing_all_then_fails() {
        let index = index();
        let decls = vec![
            SidebarDecl::new("a", vec![]),
            SidebarDecl::new("b", vec![]),
        ];
        let result = NavTreeBuilder::new(&index).construct_all(&decls, None);
        assert!(matches!(result, Err(DomainError::Schema(_))));
    }

    #[test]
    fn given_unknown_active_id_when_constructing_all_then_fails() {
        let index = index();
        let decls = vec![SidebarDecl::new("a", vec![])];
        let result = NavTreeBuilder::new(&index).construct_all(&decls, Some("b"));
        assert!(matches!(result, Err(DomainError::UnknownSidebar(id)) if id == "b"));
    }

    #[test]
    fn given_duplicate_sidebar_ids_when_constructing_all_then_fails() {
        let index = index();
        let decls = vec![SidebarDecl::new("a", vec![]), SidebarDecl::new("a", vec![])];
        let result = NavTreeBuilder::new(&index).construct_all(&decls, Some("a"));
        assert!(matches!(result, Err(DomainError::Schema(_))));
    }

    #[test]
    fn given_dangling_refs_in_two_sidebars_when_constructing_all_then_reports_both() {
        let index = index();
        let decls = vec![
            SidebarDecl::new("a", vec![ItemDecl::doc("x")]),
            SidebarDecl::new("b", vec![ItemDecl::doc("y")]),
        ];

        let Err(DomainError::DanglingReferences(refs)) =
            NavTreeBuilder::new(&index).construct_all(&decls, Some("a"))
        else {
            panic!("expected dangling references");
        };
        let sidebars: Vec<&str> = refs.iter().map(|r| r.sidebar.as_str()).collect();
        assert_eq!(sidebars, vec!["a", "b"]);
    }
}
