use mediadex_core::scan;
use mediadex_core::FileType;
use std::fs;
use tempfile::TempDir;

fn touch(root: &std::path::Path, rel: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, b"x").unwrap();
}

#[test]
fn finds_recognized_files_sorted_by_relative_path() {
    let tmp = TempDir::new().unwrap();
    touch(tmp.path(), "b.txt");
    touch(tmp.path(), "a/nested.pdf");
    touch(tmp.path(), "a.png");
    touch(tmp.path(), "clip.MP4");

    let files = scan(tmp.path()).unwrap();
    let rels: Vec<&str> = files.iter().map(|f| f.rel.as_str()).collect();
    assert_eq!(rels, vec!["a.png", "a/nested.pdf", "b.txt", "clip.MP4"]);
    assert_eq!(files[0].kind, FileType::Image);
    assert_eq!(files[1].kind, FileType::Pdf);
    assert_eq!(files[3].kind, FileType::Video);
}

#[test]
fn skips_unrecognized_extensions_and_directories() {
    let tmp = TempDir::new().unwrap();
    touch(tmp.path(), "code.rs");
    touch(tmp.path(), "data.bin");
    touch(tmp.path(), "noext");
    fs::create_dir_all(tmp.path().join("empty.dir")).unwrap();
    touch(tmp.path(), "keep.md");

    let files = scan(tmp.path()).unwrap();
    let rels: Vec<&str> = files.iter().map(|f| f.rel.as_str()).collect();
    assert_eq!(rels, vec!["keep.md"]);
}

#[test]
fn excludes_own_artifacts_at_the_root() {
    let tmp = TempDir::new().unwrap();
    touch(tmp.path(), "ocr_log.txt");
    touch(tmp.path(), "note.txt");
    // A log-named file below the root is ordinary data.
    touch(tmp.path(), "sub/ocr_log.txt");

    let files = scan(tmp.path()).unwrap();
    let rels: Vec<&str> = files.iter().map(|f| f.rel.as_str()).collect();
    assert_eq!(rels, vec!["note.txt", "sub/ocr_log.txt"]);
}

#[test]
fn unreadable_root_is_fatal() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("gone");
    assert!(scan(&missing).is_err());
}
