//! Tests for SidebarLoader: reading sidebar declarations from disk.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use sitenav::application::services::SidebarLoader;
use sitenav::application::ApplicationError;
use sitenav::domain::{DomainError, ItemDecl};
use sitenav::infrastructure::traits::RealFileSystem;
use sitenav::util::testing;

fn fixture(rel: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/resources/site")
        .join(rel)
}

fn loader() -> SidebarLoader {
    testing::init_test_setup();
    SidebarLoader::new(Arc::new(RealFileSystem))
}

#[test]
fn given_fixture_json_when_loading_then_keeps_declared_structure() {
    let sidebars = loader().load(&fixture("sidebars.json")).unwrap();

    assert_eq!(sidebars.len(), 1);
    let sidebar = &sidebars[0];
    assert_eq!(sidebar.id, "tutorialSidebar");
    assert_eq!(sidebar.items.len(), 9);
    assert_eq!(sidebar.items[0], ItemDecl::doc("intro"));

    let ItemDecl::Category {
        label,
        collapsed,
        items,
        ..
    } = &sidebar.items[8]
    else {
        panic!("expected legacy category");
    };
    assert_eq!(label, "Legacy Documentation (v1)");
    assert_eq!(*collapsed, Some(true));
    assert_eq!(items.len(), 5);
}

#[test]
fn given_toml_file_when_loading_then_reads_sidebars_in_order() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("sidebars.toml");
    fs::write(
        &path,
        r#"
api = ["reference/client", "reference/server"]
guides = [
    "intro",
    { type = "category", label = "Setup", items = ["setup/install"] },
]
"#,
    )
    .unwrap();

    let sidebars = loader().load(&path).unwrap();

    let ids: Vec<&str> = sidebars.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["api", "guides"]);
    assert_eq!(
        sidebars[1].items[1],
        ItemDecl::category("Setup", vec![ItemDecl::doc("setup/install")])
    );
}

#[test]
fn given_unsupported_extension_when_loading_then_fails() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("sidebars.ts");
    fs::write(&path, "export default {}").unwrap();

    let result = loader().load(&path);

    assert!(matches!(result, Err(ApplicationError::UnsupportedFormat(p)) if p == path));
}

#[test]
fn given_missing_file_when_loading_then_reports_path() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("sidebars.json");

    let err = loader().load(&path).unwrap_err();

    assert!(matches!(err, ApplicationError::OperationFailed { .. }));
    assert!(err.to_string().contains("sidebars.json"));
}

#[test]
fn given_malformed_item_when_loading_then_reports_item_path() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("sidebars.json");
    fs::write(
        &path,
        r#"{"docs": ["intro", {"type": "category", "label": "Guides", "items": [{"type": "doc"}]}]}"#,
    )
    .unwrap();

    let Err(ApplicationError::Domain(DomainError::Schema(issues))) = loader().load(&path) else {
        panic!("expected schema error");
    };

    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].path, "docs[1].items[0]");
    assert!(issues[0].message.contains("'id'"));
}
