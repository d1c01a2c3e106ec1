//! Platform-specific file operations.

use crate::error::{FxError, Result};
use log::debug;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Make a file executable for owner, group and others (Unix only)
#[cfg(unix)]
pub fn make_executable(path: &Path) -> std::io::Result<()> {
    let metadata = fs::metadata(path)?;
    let mut permissions = metadata.permissions();

    let mode = permissions.mode() | 0o111;
    permissions.set_mode(mode);

    fs::set_permissions(path, permissions)?;
    Ok(())
}

/// Make a file executable (Windows - no-op)
#[cfg(windows)]
pub fn make_executable(_path: &Path) -> std::io::Result<()> {
    // Windows determines executability by file extension
    Ok(())
}

/// Copy a whole directory tree below `source` into `destination`,
/// following symlinks and overwriting existing files.
pub fn copy_tree(source: &Path, destination: &Path) -> Result<()> {
    fs::create_dir_all(destination)?;

    for entry in WalkDir::new(source).follow_links(true) {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .expect("walked entry is below its root");
        if relative.as_os_str().is_empty() {
            continue;
        }
        let target = destination.join(relative);
        if entry.file_type().is_dir() {
            if !target.exists() {
                fs::create_dir(&target)?;
            }
        } else {
            fs::copy(entry.path(), &target).map_err(|e| FxError::Copy {
                source_path: entry.path().display().to_string(),
                destination: target.display().to_string(),
                source: e,
            })?;
        }
    }
    Ok(())
}

/// Recursively delete a directory if it exists
pub fn remove_tree(path: &Path) -> Result<()> {
    if path.exists() {
        debug!("Removing directory tree: {}", path.display());
        fs::remove_dir_all(path).map_err(|_| FxError::ImageRemoval(path.display().to_string()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_copy_tree_copies_nested_files() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        fs::create_dir_all(src.join("sub")).unwrap();
        fs::write(src.join("a.txt"), "a").unwrap();
        fs::write(src.join("sub/b.txt"), "b").unwrap();

        let dest = temp.path().join("dest");
        copy_tree(&src, &dest).unwrap();

        assert_eq!(fs::read_to_string(dest.join("a.txt")).unwrap(), "a");
        assert_eq!(fs::read_to_string(dest.join("sub/b.txt")).unwrap(), "b");
    }

    #[test]
    fn test_copy_tree_overwrites() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("a.txt"), "new").unwrap();

        let dest = temp.path().join("dest");
        fs::create_dir_all(&dest).unwrap();
        fs::write(dest.join("a.txt"), "old").unwrap();

        copy_tree(&src, &dest).unwrap();
        assert_eq!(fs::read_to_string(dest.join("a.txt")).unwrap(), "new");
    }

    #[test]
    fn test_remove_tree_missing_is_ok() {
        let temp = TempDir::new().unwrap();
        remove_tree(&temp.path().join("nope")).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_make_executable_sets_all_execute_bits() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("script.sh");
        fs::write(&file, "#!/bin/bash\n").unwrap();

        make_executable(&file).unwrap();
        let mode = fs::metadata(&file).unwrap().permissions().mode();
        assert_eq!(mode & 0o111, 0o111);
    }
}
