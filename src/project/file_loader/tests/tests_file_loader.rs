#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::super::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_collect_file_paths_filters_and_sorts() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("nested")).unwrap();
    fs::write(dir.path().join("b.cfg"), "").unwrap();
    fs::write(dir.path().join("a.cfg"), "").unwrap();
    fs::write(dir.path().join("notes.txt"), "").unwrap();
    fs::write(dir.path().join("nested").join("c.cfg"), "").unwrap();

    let paths = collect_file_paths(dir.path(), "cfg").unwrap();
    let names: Vec<_> = paths
        .iter()
        .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
        .collect();
    assert_eq!(
        names,
        vec![
            PathBuf::from("a.cfg"),
            PathBuf::from("b.cfg"),
            PathBuf::from("nested").join("c.cfg"),
        ]
    );
}

#[test]
fn test_collect_file_paths_missing_directory() {
    let dir = TempDir::new().unwrap();
    let result = collect_file_paths(&dir.path().join("absent"), "cfg");
    assert!(result.is_err(), "Walking a missing directory should fail");
}

#[test]
fn test_fs_loader_reads_and_checks_files() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("title.cfg");
    fs::write(&path, "title:\n").unwrap();

    let loader = FsLoader;
    assert!(loader.exists(&path));
    assert!(!loader.exists(dir.path()), "Directories are not definition files");
    assert_eq!(loader.read(&path).unwrap(), "title:\n");
    assert_eq!(
        loader.read(&dir.path().join("other.cfg")).unwrap_err().kind(),
        io::ErrorKind::NotFound
    );
}

#[test]
fn test_get_extension() {
    assert_eq!(get_extension(Path::new("fields/title.cfg")), Some("cfg"));
    assert_eq!(get_extension(Path::new("fields/README")), None);
}
