use std::fs;

use serde_json::json;
use tempfile::TempDir;

use briefing_catalog::{CatalogLoadError, load_dir, read_documents};
use briefing_spec::{AuthoringIssue, CatalogError, HierarchyLevel};

fn write_json(dir: &TempDir, name: &str, value: serde_json::Value) {
    let path = dir.path().join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent");
    }
    fs::write(&path, serde_json::to_vec_pretty(&value).expect("encode")).expect("write fixture");
}

fn global_doc(version: &str) -> serde_json::Value {
    json!({
        "version": version,
        "blocks": [{
            "id": "global.basics",
            "level": "global",
            "content": { "shared": [
                { "id": "name", "prompt": "Name", "type": "short_text", "required": true }
            ]}
        }]
    })
}

#[test]
fn merges_nested_documents_in_path_order() {
    let dir = TempDir::new().expect("tempdir");
    write_json(&dir, "a-global.json", global_doc("1.0.0"));
    write_json(
        &dir,
        "areas/residential.json",
        json!({
            "version": "1.1.0",
            "blocks": [{
                "id": "area.residential",
                "level": "area",
                "selectors": ["RESIDENTIAL"],
                "content": { "shared": [
                    { "id": "pets", "prompt": "Pets?", "type": "boolean" },
                    { "id": "pets.kind", "prompt": "Which?", "type": "short_text",
                      "depends_on": { "question_id": "pets", "operator": "equals", "value": true } }
                ]}
            }]
        }),
    );
    fs::write(dir.path().join("notes.txt"), "ignored").expect("write note");

    let catalog = load_dir(dir.path()).expect("catalog");
    assert_eq!(catalog.version().to_string(), "1.1.0");
    assert_eq!(catalog.question_count(), 3);
    assert_eq!(catalog.all_blocks()[0].id, "global.basics");
    assert_eq!(catalog.blocks(HierarchyLevel::Area, "RESIDENTIAL").len(), 1);

    let documents = read_documents(dir.path()).expect("documents");
    assert_eq!(documents.len(), 2);
}

#[test]
fn single_file_is_accepted() {
    let dir = TempDir::new().expect("tempdir");
    write_json(&dir, "catalog.json", global_doc("2.0.0"));
    let catalog = load_dir(dir.path().join("catalog.json")).expect("catalog");
    assert!(catalog.question("name").is_some());
}

#[test]
fn parse_errors_name_the_file() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("broken.json"), "{ \"version\": ").expect("write");

    let err = load_dir(dir.path()).expect_err("broken document");
    assert!(matches!(err, CatalogLoadError::Document { .. }));
    assert!(err.to_string().contains("broken.json"));
}

#[test]
fn empty_directory_is_an_error() {
    let dir = TempDir::new().expect("tempdir");
    let err = load_dir(dir.path()).expect_err("no documents");
    assert!(matches!(
        err,
        CatalogLoadError::Catalog(CatalogError::Empty)
    ));
}

#[test]
fn authoring_issues_across_files_are_reported() {
    let dir = TempDir::new().expect("tempdir");
    write_json(&dir, "a.json", global_doc("1.0.0"));
    write_json(
        &dir,
        "b.json",
        json!({
            "version": "1.0.0",
            "blocks": [{
                "id": "global.other",
                "level": "global",
                "content": { "shared": [
                    { "id": "name", "prompt": "Company name", "type": "short_text" }
                ]}
            }]
        }),
    );

    match load_dir(dir.path()).expect_err("divergent question") {
        CatalogLoadError::Catalog(CatalogError::Authoring { issues }) => assert_eq!(
            issues,
            vec![AuthoringIssue::DivergentQuestion {
                question_id: "name".into(),
                first_block: "global.basics".into(),
                block_id: "global.other".into(),
            }]
        ),
        other => panic!("unexpected error: {other}"),
    }
}
