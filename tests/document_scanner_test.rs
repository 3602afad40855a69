//! Tests for DocumentScanner: discovering documents and their ids.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rstest::rstest;
use tempfile::TempDir;

use sitenav::application::services::DocumentScanner;
use sitenav::application::ApplicationError;
use sitenav::domain::DomainError;
use sitenav::infrastructure::traits::RealFileSystem;
use sitenav::util::testing;

fn fixture_docs() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/resources/site/docs")
}

fn scanner() -> DocumentScanner {
    testing::init_test_setup();
    DocumentScanner::new(Arc::new(RealFileSystem))
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

#[test]
fn given_fixture_docs_when_scanning_then_indexes_every_page() {
    let index = scanner().scan(&fixture_docs()).unwrap();

    assert_eq!(index.len(), 26);
    assert!(!index.contains("_partials/note"));
}

#[rstest]
#[case("intro", "Introduction")]
#[case("rules-standards/overview", "Overview")]
#[case("guides/best-practices", "Best Practices")]
#[case("v1/reference/commands-quick-ref", "Commands Quick Reference (v1)")]
fn given_fixture_docs_when_scanning_then_resolves_labels(#[case] id: &str, #[case] label: &str) {
    let index = scanner().scan(&fixture_docs()).unwrap();
    assert_eq!(index.get(id).unwrap().label(), label);
}

#[test]
fn given_mixed_files_when_scanning_then_keeps_markdown_and_skips_partials() {
    let temp = TempDir::new().unwrap();
    let docs = temp.path();
    write(docs, "intro.md", "# Intro\n");
    write(docs, "guides/setup.mdx", "---\ntitle: Setup\n---\n");
    write(docs, "guides/_draft.md", "# Draft\n");
    write(docs, "_shared/snippet.md", "# Snippet\n");
    write(docs, "img/logo.svg", "<svg/>");

    let index = scanner().scan(docs).unwrap();

    let ids: Vec<&str> = index.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["guides/setup", "intro"]);
    assert_eq!(
        index.get("guides/setup").unwrap().source,
        PathBuf::from("guides/setup.mdx")
    );
}

#[test]
fn given_front_matter_id_when_scanning_then_id_keeps_directory() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "personas/index.md", "---\nid: overview\n---\n");

    let index = scanner().scan(temp.path()).unwrap();

    assert!(index.contains("personas/overview"));
    assert!(!index.contains("personas/index"));
}

#[test]
fn given_two_files_with_same_id_when_scanning_then_fails() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "intro.md", "# Intro\n");
    write(temp.path(), "welcome.md", "---\nid: intro\n---\n");

    let result = scanner().scan(temp.path());

    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::Schema(_)))
    ));
}

#[test]
fn given_missing_directory_when_scanning_then_fails() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("docs");

    let result = scanner().scan(&missing);

    assert!(matches!(result, Err(ApplicationError::DocsDirNotFound(p)) if p == missing));
}
