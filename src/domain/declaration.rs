//! Sidebar declarations as written by authors, before reference resolution.
//!
//! The accepted shape mirrors the common `sidebars.json` format:
//!
//! ```json
//! {
//!   "tutorialSidebar": [
//!     "intro",
//!     { "type": "category", "label": "Guides", "collapsed": true,
//!       "items": ["guides/a", { "type": "doc", "id": "guides/b", "label": "B" }] },
//!     { "type": "link", "label": "GitHub", "href": "https://github.com/org/repo" }
//!   ]
//! }
//! ```
//!
//! Parsing reports every schema violation at once, each located by its path.

use serde_json::{Map, Value};

use crate::domain::error::{DomainError, DomainResult, SchemaIssue};

/// One declared sidebar item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemDecl {
    Doc {
        id: String,
        label: Option<String>,
    },
    Category {
        label: String,
        collapsed: Option<bool>,
        collapsible: Option<bool>,
        items: Vec<ItemDecl>,
    },
    Link {
        label: String,
        href: String,
    },
}

impl ItemDecl {
    pub fn doc(id: impl Into<String>) -> Self {
        ItemDecl::Doc {
            id: id.into(),
            label: None,
        }
    }

    pub fn category(label: impl Into<String>, items: Vec<ItemDecl>) -> Self {
        ItemDecl::Category {
            label: label.into(),
            collapsed: None,
            collapsible: None,
            items,
        }
    }

    pub fn link(label: impl Into<String>, href: impl Into<String>) -> Self {
        ItemDecl::Link {
            label: label.into(),
            href: href.into(),
        }
    }

    /// Set the default-collapsed flag on a category; no-op for other items.
    pub fn collapsed(mut self, value: bool) -> Self {
        if let ItemDecl::Category { collapsed, .. } = &mut self {
            *collapsed = Some(value);
        }
        self
    }
}

/// A named sidebar declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarDecl {
    pub id: String,
    pub items: Vec<ItemDecl>,
}

impl SidebarDecl {
    pub fn new(id: impl Into<String>, items: Vec<ItemDecl>) -> Self {
        Self {
            id: id.into(),
            items,
        }
    }
}

/// Parse a table of `sidebar id -> item list` into declarations,
/// keeping the table's key order.
pub fn parse_sidebars(value: &Value) -> DomainResult<Vec<SidebarDecl>> {
    let Some(table) = value.as_object() else {
        return Err(DomainError::schema(
            "<root>",
            "expected a table of sidebar id to item list",
        ));
    };

    let mut issues = Vec::new();
    let mut sidebars = Vec::with_capacity(table.len());
    for (id, items) in table {
        if id.trim().is_empty() {
            issues.push(SchemaIssue::new("<root>", "sidebar id must not be empty"));
            continue;
        }
        let items = parse_items(items, id, &mut issues);
        sidebars.push(SidebarDecl::new(id.clone(), items));
    }

    if issues.is_empty() {
        Ok(sidebars)
    } else {
        Err(DomainError::Schema(issues))
    }
}

fn parse_items(value: &Value, path: &str, issues: &mut Vec<SchemaIssue>) -> Vec<ItemDecl> {
    let Some(array) = value.as_array() else {
        issues.push(SchemaIssue::new(path, "expected a list of items"));
        return Vec::new();
    };
    array
        .iter()
        .enumerate()
        .filter_map(|(i, item)| parse_item(item, &format!("{path}[{i}]"), issues))
        .collect()
}

fn parse_item(value: &Value, path: &str, issues: &mut Vec<SchemaIssue>) -> Option<ItemDecl> {
    match value {
        Value::String(id) => {
            if id.trim().is_empty() {
                issues.push(SchemaIssue::new(path, "document id must not be empty"));
                return None;
            }
            Some(ItemDecl::doc(id.clone()))
        }
        Value::Object(object) => parse_object(object, path, issues),
        other => {
            issues.push(SchemaIssue::new(
                path,
                format!(
                    "expected a document id or an item table, found {}",
                    kind(other)
                ),
            ));
            None
        }
    }
}

fn parse_object(
    object: &Map<String, Value>,
    path: &str,
    issues: &mut Vec<SchemaIssue>,
) -> Option<ItemDecl> {
    let item_type = match object.get("type") {
        Some(Value::String(t)) => t.as_str(),
        Some(other) => {
            issues.push(SchemaIssue::new(
                format!("{path}.type"),
                format!("expected a string, found {}", kind(other)),
            ));
            return None;
        }
        None => {
            issues.push(SchemaIssue::new(path, "missing field 'type'"));
            return None;
        }
    };

    match item_type {
        "doc" => {
            let id = required_str(object, "id", path, issues)?;
            let label = optional_str(object, "label", path, issues);
            if id.trim().is_empty() {
                issues.push(SchemaIssue::new(
                    format!("{path}.id"),
                    "document id must not be empty",
                ));
                return None;
            }
            Some(ItemDecl::Doc { id, label })
        }
        "category" => {
            let label = required_str(object, "label", path, issues);
            let collapsed = optional_bool(object, "collapsed", path, issues);
            let collapsible = optional_bool(object, "collapsible", path, issues);
            let items = match object.get("items") {
                Some(items) => parse_items(items, &format!("{path}.items"), issues),
                None => {
                    issues.push(SchemaIssue::new(path, "missing field 'items'"));
                    return None;
                }
            };
            Some(ItemDecl::Category {
                label: label?,
                collapsed,
                collapsible,
                items,
            })
        }
        "link" => {
            let label = required_str(object, "label", path, issues);
            let href = required_str(object, "href", path, issues);
            Some(ItemDecl::Link {
                label: label?,
                href: href?,
            })
        }
        other => {
            issues.push(SchemaIssue::new(
                format!("{path}.type"),
                format!("unknown item type '{other}' (expected doc, category or link)"),
            ));
            None
        }
    }
}

fn required_str(
    object: &Map<String, Value>,
    field: &str,
    path: &str,
    issues: &mut Vec<SchemaIssue>,
) -> Option<String> {
    match object.get(field) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => {
            issues.push(SchemaIssue::new(
                format!("{path}.{field}"),
                format!("expected a string, found {}", kind(other)),
            ));
            None
        }
        None => {
            issues.push(SchemaIssue::new(path, format!("missing field '{field}'")));
            None
        }
    }
}

fn optional_str(
    object: &Map<String, Value>,
    field: &str,
    path: &str,
    issues: &mut Vec<SchemaIssue>,
) -> Option<String> {
    match object.get(field) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => {
            issues.push(SchemaIssue::new(
                format!("{path}.{field}"),
                format!("expected a string, found {}", kind(other)),
            ));
            None
        }
        None => None,
    }
}

fn optional_bool(
    object: &Map<String, Value>,
    field: &str,
    path: &str,
    issues: &mut Vec<SchemaIssue>,
) -> Option<bool> {
    match object.get(field) {
        Some(Value::Bool(b)) => Some(*b),
        Some(other) => {
            issues.push(SchemaIssue::new(
                format!("{path}.{field}"),
                format!("expected a boolean, found {}", kind(other)),
            ));
            None
        }
        None => None,
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a table",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn given_shorthand_and_category_when_parsing_then_keeps_declared_order() {
        let value = json!({
            "docs": ["intro", {"type": "category", "label": "Guides", "items": ["guide-a", "guide-b"]}]
        });

        let sidebars = parse_sidebars(&value).unwrap();

        assert_eq!(
            sidebars,
            vec![SidebarDecl::new(
                "docs",
                vec![
                    ItemDecl::doc("intro"),
                    ItemDecl::category(
                        "Guides",
                        vec![ItemDecl::doc("guide-a"), ItemDecl::doc("guide-b")]
                    ),
                ]
            )]
        );
    }

    #[test]
    fn given_multiple_sidebars_when_parsing_then_preserves_table_order() {
        let value = json!({"zeta": ["a"], "alpha": ["b"], "mid": []});
        let ids: Vec<String> = parse_sidebars(&value)
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn given_doc_and_link_objects_when_parsing_then_reads_all_fields() {
        let value = json!({
            "docs": [
                {"type": "doc", "id": "intro", "label": "Start here"},
                {"type": "link", "label": "GitHub", "href": "https://github.com"},
                {"type": "category", "label": "Old", "collapsed": true, "collapsible": false, "items": []}
            ]
        });

        let sidebars = parse_sidebars(&value).unwrap();
        assert_eq!(
            sidebars[0].items,
            vec![
                ItemDecl::Doc {
                    id: "intro".into(),
                    label: Some("Start here".into())
                },
                ItemDecl::link("GitHub", "https://github.com"),
                ItemDecl::Category {
                    label: "Old".into(),
                    collapsed: Some(true),
                    collapsible: Some(false),
                    items: vec![],
                },
            ]
        );
    }

    #[test]
    fn given_several_malformed_items_when_parsing_then_reports_each_with_path() {
        let value = json!({
            "docs": [
                "",
                42,
                {"type": "category", "items": []},
                {"type": "widget"},
                {"label": "no type"},
                {"type": "category", "label": "Nested", "items": [{"type": "link", "label": "x"}]}
            ]
        });

        let Err(DomainError::Schema(issues)) = parse_sidebars(&value) else {
            panic!("expected schema error");
        };
        let paths: Vec<&str> = issues.iter().map(|i| i.path.as_str()).collect();

        assert_eq!(
            paths,
            vec![
                "docs[0]",
                "docs[1]",
                "docs[2]",
                "docs[3].type",
                "docs[4]",
                "docs[5].items[0]",
            ]
        );
        assert!(issues[2].message.contains("'label'"));
        assert!(issues[5].message.contains("'href'"));
    }

    #[test]
    fn given_non_table_root_when_parsing_then_fails() {
        let result = parse_sidebars(&json!(["intro"]));
        assert!(matches!(result, Err(DomainError::Schema(_))));
    }

    #[test]
    fn given_sidebar_that_is_not_a_list_when_parsing_then_fails() {
        let Err(DomainError::Schema(issues)) = parse_sidebars(&json!({"docs": "intro"})) else {
            panic!("expected schema error");
        };
        assert_eq!(issues[0].path, "docs");
    }

    #[test]
    fn given_category_builder_when_marking_collapsed_then_sets_flag() {
        let item = ItemDecl::category("Legacy", vec![]).collapsed(true);
        assert!(matches!(
            item,
            ItemDecl::Category {
                collapsed: Some(true),
                ..
            }
        ));
        assert_eq!(ItemDecl::doc("a").collapsed(true), ItemDecl::doc("a"));
    }
}
