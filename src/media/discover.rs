use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Extensions accepted as still frames.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp"];

/// Collect files under `root` whose extension is in `extensions`.
///
/// `root` may be a single file or a directory, which is walked recursively.
/// Extension matching ignores case. The result is sorted by path.
pub fn find_files(root: &Path, extensions: &[&str]) -> io::Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    if root.is_file() {
        if has_extension(root, extensions) {
            found.push(root.to_path_buf());
        }
    } else {
        walk(root, extensions, &mut found)?;
    }
    found.sort();
    Ok(found)
}

fn walk(dir: &Path, extensions: &[&str], found: &mut Vec<PathBuf>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            walk(&path, extensions, found)?;
        } else if has_extension(&path, extensions) {
            found.push(path);
        }
    }
    Ok(())
}

pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
}

/// File stem as an owned string, used to name per-video outputs.
pub fn stem_of(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_files_recursive_and_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("clip_a");
        fs::create_dir(&nested).unwrap();
        fs::write(dir.path().join("b.JPG"), b"").unwrap();
        fs::write(nested.join("a.png"), b"").unwrap();
        fs::write(nested.join("notes.txt"), b"").unwrap();

        let files = find_files(dir.path(), IMAGE_EXTENSIONS).unwrap();

        assert_eq!(files, vec![dir.path().join("b.JPG"), nested.join("a.png")]);
    }

    #[test]
    fn test_single_file_root() {
        let dir = tempfile::tempdir().unwrap();
        let label = dir.path().join("x.txt");
        fs::write(&label, b"").unwrap();

        assert_eq!(find_files(&label, &["txt"]).unwrap(), vec![label.clone()]);
        assert!(find_files(&label, &["jpg"]).unwrap().is_empty());
        assert_eq!(stem_of(&label), "x");
    }
}
