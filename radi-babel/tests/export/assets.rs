//! Image copying during export.

use crate::common::{read, wiki};
use radi_babel::{export, ExportSpec, FsPageStore};
use std::fs;

#[test]
fn test_local_images_copied_remote_skipped() {
    let dir = wiki(&[(
        "Start",
        "{{pic.png}} {{http://example.org/r.png}} {{img/sub.png}} {{missing.png}}\n[Other]\n",
    )]);
    fs::write(dir.path().join("Other.radi"), "{{pic.png}}\n").unwrap();
    fs::write(dir.path().join("pic.png"), [0x89, b'P', b'N', b'G']).unwrap();
    fs::create_dir_all(dir.path().join("img")).unwrap();
    fs::write(dir.path().join("img/sub.png"), b"sub").unwrap();
    let out = dir.path().join("out");

    let report = export(
        &ExportSpec::new("html", "Start", &out),
        &FsPageStore::new(dir.path()),
    )
    .unwrap();

    assert_eq!(report.assets, vec![out.join("pic.png"), out.join("img/sub.png")]);
    assert_eq!(fs::read(out.join("pic.png")).unwrap(), vec![0x89, b'P', b'N', b'G']);
    assert_eq!(fs::read(out.join("img/sub.png")).unwrap(), b"sub");
    assert!(!out.join("missing.png").exists());
    assert!(read(&out, "Start.html").contains("<img src=\"http://example.org/r.png\">"));
}

#[test]
fn test_asset_copy_can_be_disabled() {
    let dir = wiki(&[("Start", "{{pic.png}}\n")]);
    fs::write(dir.path().join("pic.png"), b"png").unwrap();
    let out = dir.path().join("out");

    let report = export(
        &ExportSpec::new("markdown", "Start", &out).with_copy_assets(false),
        &FsPageStore::new(dir.path()),
    )
    .unwrap();
    assert!(report.assets.is_empty());
    assert!(!out.join("pic.png").exists());
    assert_eq!(read(&out, "Start.md"), "![](pic.png)\n\n\n");
}

#[test]
fn test_export_into_store_directory() {
    let dir = wiki(&[("Start", "{{pic.png}}\n")]);
    fs::write(dir.path().join("pic.png"), b"png").unwrap();

    export(
        &ExportSpec::new("html", "Start", dir.path()),
        &FsPageStore::new(dir.path()),
    )
    .unwrap();
    assert_eq!(fs::read(dir.path().join("pic.png")).unwrap(), b"png");
    assert!(dir.path().join("Start.html").exists());
}

#[test]
fn test_assets_outside_the_store_are_not_copied() {
    let base = tempfile::tempdir().unwrap();
    let root = base.path().join("wiki");
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join("Start.radi"), "{{../../secret.png}} {{/tmp/abs.png}}\n").unwrap();
    fs::write(base.path().join("secret.png"), b"secret").unwrap();
    let out = root.join("out").join("deep");

    let report = export(&ExportSpec::new("html", "Start", &out), &FsPageStore::new(&root)).unwrap();
    assert!(report.assets.is_empty());
    assert!(!root.join("secret.png").exists());
    assert!(read(&out, "Start.html").contains("<img src=\"../../secret.png\">"));
}
