use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn export_html_site() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("Start.radi"), "[Other] {{pic.png}}\n").unwrap();
    fs::write(dir.path().join("Other.radi"), "[Start]\n").unwrap();
    fs::write(dir.path().join("pic.png"), b"png").unwrap();
    let out = dir.path().join("site");

    let mut cmd = cargo_bin_cmd!("radi");
    cmd.arg("export")
        .arg("Start")
        .arg("--to")
        .arg("html")
        .arg("--output")
        .arg(&out)
        .arg("--css")
        .arg("site.css")
        .arg("--db")
        .arg(dir.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Start.html"))
        .stdout(predicate::str::contains("Other.html"));

    let start = fs::read_to_string(out.join("Start.html")).unwrap();
    assert!(start.contains("href=\"site.css\""));
    assert!(out.join("Other.html").exists());
    assert_eq!(fs::read(out.join("pic.png")).unwrap(), b"png");
}

#[test]
fn export_latex_document() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("Start.radi"), "= Intro =\n[Next]\n").unwrap();
    fs::write(dir.path().join("Next.radi"), "= Next =\ndone\n").unwrap();
    let out = dir.path().join("doc");

    let mut cmd = cargo_bin_cmd!("radi");
    cmd.arg("export")
        .arg("Start")
        .arg("--to")
        .arg("latex")
        .arg("--output")
        .arg(&out)
        .arg("--db")
        .arg(dir.path());

    cmd.assert().success();
    let document = fs::read_to_string(out.join("Start.tex")).unwrap();
    assert!(document.contains("\\begin{document}"));
    assert!(document.contains("\\ref{Next}"));
    assert!(document.contains("\\label{Next}"));
    assert!(!out.join("Next.tex").exists());
}

#[test]
fn export_without_assets() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("Start.radi"), "{{pic.png}}\n").unwrap();
    fs::write(dir.path().join("pic.png"), b"png").unwrap();
    let out = dir.path().join("md");

    let mut cmd = cargo_bin_cmd!("radi");
    cmd.arg("export")
        .arg("Start")
        .arg("--to")
        .arg("markdown")
        .arg("-o")
        .arg(&out)
        .arg("--no-assets")
        .arg("--db")
        .arg(dir.path());

    cmd.assert().success();
    assert!(out.join("Start.md").exists());
    assert!(!out.join("pic.png").exists());
}

#[test]
fn export_requires_output() {
    let mut cmd = cargo_bin_cmd!("radi");
    cmd.arg("export").arg("Start").arg("--to").arg("html");
    cmd.assert().failure();
}
