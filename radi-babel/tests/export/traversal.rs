//! Link graph traversal during export.

use crate::common::{read, wiki};
use radi_babel::{export, ExportSpec, FormatError, FsPageStore, MemoryPageStore, PageStore};

#[test]
fn test_each_page_rendered_once() {
    let dir = wiki(&[
        ("Start", "= Home =\n[A] and [B]\n"),
        ("A", "[B] and back to [Start]\n"),
        ("B", "leaf\n"),
    ]);
    let out = dir.path().join("out");

    let report = export(
        &ExportSpec::new("html", "Start", &out),
        &FsPageStore::new(dir.path()),
    )
    .unwrap();

    assert_eq!(report.pages, vec!["Start", "A", "B"]);
    assert_eq!(
        report.artifacts,
        vec![out.join("Start.html"), out.join("A.html"), out.join("B.html")]
    );
    let start = read(&out, "Start.html");
    assert!(start.starts_with("<!DOCTYPE HTML PUBLIC \"-//W3C//DTD HTML 3.2 Final//EN\">\n"));
    assert!(start.contains("<title>Start.html</title>"));
    assert!(start.contains("<a href=\"A.html\">A</a> and <a href=\"B.html\">B</a>"));
    assert!(start.ends_with("</body></html>\n"));
    assert!(read(&out, "B.html").contains("<p>leaf\n</p>\n"));
}

#[test]
fn test_cycles_terminate() {
    let store = MemoryPageStore::new()
        .with_page("Start", "[A]\n")
        .with_page("A", "[Start] [A] [Start.radi]\n");
    let out = tempfile::tempdir().unwrap();

    let report = export(&ExportSpec::new("markdown", "Start", out.path()), &store).unwrap();
    assert_eq!(report.pages, vec!["Start", "A"]);
    assert_eq!(read(out.path(), "Start.md"), "[A](A.md)\n\n\n");
}

#[test]
fn test_breadth_first_order() {
    let store = MemoryPageStore::new()
        .with_page("Start", "[A] [B]\n")
        .with_page("A", "[C]\n")
        .with_page("B", "[D]\n")
        .with_page("C", "gamma\n")
        .with_page("D", "delta\n");
    let out = tempfile::tempdir().unwrap();

    let report = export(&ExportSpec::new("latex", "Start", out.path()), &store).unwrap();
    assert_eq!(report.pages, vec!["Start", "A", "B", "C", "D"]);
    assert_eq!(report.artifacts, vec![out.path().join("Start.tex")]);

    let document = read(out.path(), "Start.tex");
    let positions: Vec<usize> = ["gamma", "delta"]
        .iter()
        .map(|text| document.find(text).unwrap())
        .collect();
    assert!(positions[0] < positions[1]);
    assert!(document.starts_with("\\documentclass[a4paper]{article}\n"));
    assert!(document.ends_with("\n\\end{document}\n"));
}

#[test]
fn test_labels_match_references() {
    let store = MemoryPageStore::new()
        .with_page("Start", "= Start =\nsee [Other]\n")
        .with_page("Other", "= Other =\ntext\n");
    let out = tempfile::tempdir().unwrap();

    export(&ExportSpec::new("latex", "Start", out.path()), &store).unwrap();
    let document = read(out.path(), "Start.tex");
    assert!(document.contains("\\section{Start}\n\\label{Start}\n"));
    assert!(document.contains("see \\ref{Other}"));
    assert!(document.contains("\\section{Other}\n\\label{Other}\n"));
}

#[test]
fn test_missing_pages_get_placeholder() {
    let dir = wiki(&[("Start", "[Ghost]\n")]);
    let out = dir.path().join("out");

    let report = export(
        &ExportSpec::new("html", "Start", &out),
        &FsPageStore::new(dir.path()),
    )
    .unwrap();
    assert_eq!(report.pages, vec!["Start", "Ghost"]);
    assert!(read(&out, "Ghost.html").contains("<h1>New File</h1>"));
}

#[test]
fn test_missing_page_error_aborts() {
    let dir = wiki(&[("Start", "[Ghost]\n")]);
    let store = FsPageStore::new(dir.path()).with_missing_page(None);
    let out = dir.path().join("out");

    let err = export(&ExportSpec::new("html", "Start", &out), &store).unwrap_err();
    assert!(matches!(err, FormatError::Io { .. }));
    // Pages rendered before the failure stay on disk.
    assert!(out.join("Start.html").exists());
}

#[test]
fn test_raw_export_round_trip() {
    let start = "= Home =\n* [Notes|my notes]\n";
    let notes = "{{{\nkept **as is**\n}}}\n";
    let dir = wiki(&[("Start", start), ("Notes", notes)]);
    let out = dir.path().join("copy");

    let report = export(
        &ExportSpec::new("radi", "Start.radi", &out),
        &FsPageStore::new(dir.path()),
    )
    .unwrap();
    assert_eq!(report.pages, vec!["Start", "Notes"]);

    let copy = FsPageStore::new(&out);
    assert_eq!(copy.raw_source("Start").unwrap(), start);
    assert_eq!(copy.raw_source("Notes").unwrap(), notes);
}

#[test]
fn test_unknown_format() {
    let store = MemoryPageStore::new().with_page("Start", "x");
    let out = tempfile::tempdir().unwrap();
    let err = export(&ExportSpec::new("rtf", "Start", out.path()), &store).unwrap_err();
    assert!(matches!(err, FormatError::FormatNotFound(name) if name == "rtf"));
}

#[test]
fn test_empty_start_page() {
    let store = MemoryPageStore::new();
    let out = tempfile::tempdir().unwrap();
    let err = export(&ExportSpec::new("html", "  ", out.path()), &store).unwrap_err();
    assert!(matches!(err, FormatError::NotSupported(_)));
}

#[test]
fn test_markdown_follows_links_in_tables_and_quotes() {
    let store = MemoryPageStore::new()
        .with_page("Start", "|[A]|x|\n\"\"\"\nsee [B]\n\"\"\"\n")
        .with_page("A", "alpha\n")
        .with_page("B", "beta\n");

    for format in ["markdown", "html"] {
        let out = tempfile::tempdir().unwrap();
        let report = export(&ExportSpec::new(format, "Start", out.path()), &store).unwrap();
        assert_eq!(report.pages, vec!["Start", "A", "B"], "{format}");
    }
}

#[test]
fn test_links_outside_the_store_are_not_followed() {
    let store = MemoryPageStore::new()
        .with_page("Start", "[../Escape] [/etc/passwd] [A]\n")
        .with_page("A", "alpha\n")
        .with_page("../Escape", "gone\n");
    let root = tempfile::tempdir().unwrap();
    let out = root.path().join("out");

    let report = export(&ExportSpec::new("markdown", "Start", &out), &store).unwrap();
    assert_eq!(report.pages, vec!["Start", "A"]);
    assert!(!root.path().join("Escape.md").exists());
}
