//! End-to-end editing scenarios on a small three-column document.

use locsheet_core::{DocumentId, DocumentMeta, Project, TableData};
use locsheet_fill::{FillMode, generate_fill_data};
use pretty_assertions::assert_eq;

fn abc() -> (Project, DocumentId) {
    let mut project = Project::new();
    let id = DocumentId::from("d");
    let rows = (0..3)
        .map(|i| vec![format!("a{}", i), format!("b{}", i), format!("c{}", i)])
        .collect();
    project
        .open_document(
            id.clone(),
            DocumentMeta::default(),
            TableData::new(vec!["A".into(), "B".into(), "C".into()], rows),
        )
        .unwrap();
    (project, id)
}

fn original_row(i: usize) -> Vec<String> {
    vec![format!("a{}", i), format!("b{}", i), format!("c{}", i)]
}

#[test]
fn test_insert_two_rows() {
    let (mut project, id) = abc();
    project.insert_rows(&id, 1, 2).unwrap();

    let doc = project.document(&id).unwrap();
    assert_eq!(doc.rows.len(), 5);
    assert_eq!(doc.rows[1].cells, vec!["", "", ""]);
    assert_eq!(doc.rows[2].cells, vec!["", "", ""]);
    assert_eq!(doc.rows[3].cells, original_row(1));
    let indices: Vec<usize> = doc.rows.iter().map(|r| r.index).collect();
    assert_eq!(indices, vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_delete_first_and_last() {
    let (mut project, id) = abc();
    project.delete_rows(&id, &[0, 2]).unwrap();

    let doc = project.document(&id).unwrap();
    assert_eq!(doc.rows.len(), 1);
    assert_eq!(doc.rows[0].cells, original_row(1));
    assert_eq!(doc.rows[0].index, 0);
}

#[test]
fn test_duplicate_middle_row() {
    let (mut project, id) = abc();
    project.duplicate_rows(&id, &[1]).unwrap();

    let doc = project.document(&id).unwrap();
    assert_eq!(doc.rows.len(), 4);
    assert_eq!(doc.rows[2].cells[0], doc.rows[1].cells[0]);
    assert_eq!(doc.rows[2].key, format!("{}_copy", doc.rows[1].cells[0]));
}

#[test]
fn test_fill_generation() {
    assert_eq!(generate_fill_data(&["1", "2"], 3, FillMode::Auto), vec!["3", "4", "5"]);
    assert_eq!(
        generate_fill_data(&["Item01", "Item02"], 2, FillMode::Auto),
        vec!["Item03", "Item04"]
    );
    assert_eq!(generate_fill_data(&["X"], 2, FillMode::Auto), vec!["X", "X"]);
}
