use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::utils::verbose_println;

/// Directory name (compared case-insensitively) that holds one frame sequence
pub const SEQUENCE_DIR_NAME: &str = "sequence";

/// A discovered sequence folder and the GIF it maps to.
///
/// `base/group/name/sequence/*.jpg` maps to `base/group/name.gif`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceFolder {
    /// The `sequence` directory holding the JPEG frames
    pub sequence_path: PathBuf,
    /// Directory the GIF is written into (parent of the named folder)
    pub grandparent_path: PathBuf,
    /// Name of the folder containing `sequence`, used as the GIF stem
    pub folder_name: String,
}

impl SequenceFolder {
    /// Destination GIF path
    pub fn output_path(&self) -> PathBuf {
        self.grandparent_path.join(format!("{}.gif", self.folder_name))
    }
}

/// Check whether a directory name is a sequence folder name
pub fn is_sequence_dir_name(name: &str) -> bool {
    name.to_lowercase() == SEQUENCE_DIR_NAME
}

/// Find every `sequence` directory in the tree rooted at `base_dir`.
///
/// A `sequence` folder directly under the base directory is skipped. The
/// base directory itself counts when it is named `sequence`. Nested
/// `sequence` folders are all reported independently. Unreadable entries
/// are skipped.
pub fn find_sequence_folders(base_dir: &Path, verbose: bool) -> Vec<SequenceFolder> {
    let mut folders = Vec::new();

    let walker = WalkDir::new(base_dir)
        .follow_links(false)
        .sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                verbose_println(verbose, &format!("Skipping unreadable entry: {}", e));
                continue;
            }
        };

        // depth 1 puts the parent at base_dir itself
        if entry.depth() == 1 || !entry.file_type().is_dir() {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        if !is_sequence_dir_name(&name) {
            continue;
        }

        let sequence_path = entry.path();
        let Some(parent_path) = sequence_path.parent() else {
            continue;
        };
        let (Some(folder_name), Some(grandparent_path)) =
            (parent_path.file_name(), parent_path.parent())
        else {
            continue;
        };

        verbose_println(
            verbose,
            &format!("Found sequence folder: {}", sequence_path.display()),
        );

        folders.push(SequenceFolder {
            sequence_path: sequence_path.to_path_buf(),
            grandparent_path: grandparent_path.to_path_buf(),
            folder_name: folder_name.to_string_lossy().into_owned(),
        });
    }

    folders
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"not really a jpeg").unwrap();
    }

    #[test]
    fn test_nested_sequence_maps_to_parent_gif() {
        let tmp = tempfile::tempdir().unwrap();
        let base = tmp.path();
        touch(&base.join("A/B/sequence/f1.jpg"));

        let folders = find_sequence_folders(base, false);
        assert_eq!(folders.len(), 1);
        assert_eq!(folders[0].sequence_path, base.join("A/B/sequence"));
        assert_eq!(folders[0].folder_name, "B");
        assert_eq!(folders[0].output_path(), base.join("A/B.gif"));
    }

    #[test]
    fn test_sequence_directly_under_base_is_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        let base = tmp.path();
        touch(&base.join("sequence/f1.jpg"));

        assert!(find_sequence_folders(base, false).is_empty());
    }

    #[test]
    fn test_base_named_sequence_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let base = tmp.path().join("X/Y/sequence");
        touch(&base.join("f1.jpg"));

        let folders = find_sequence_folders(&base, false);
        assert_eq!(folders.len(), 1);
        assert_eq!(folders[0].sequence_path, base);
        assert_eq!(folders[0].output_path(), tmp.path().join("X/Y.gif"));
    }

    #[test]
    fn test_one_level_below_base() {
        // base/A/sequence -> base/A.gif
        let tmp = tempfile::tempdir().unwrap();
        let base = tmp.path();
        touch(&base.join("A/sequence/f1.jpg"));

        let folders = find_sequence_folders(base, false);
        assert_eq!(folders.len(), 1);
        assert_eq!(folders[0].output_path(), base.join("A.gif"));
    }

    #[test]
    fn test_case_insensitive_and_nested() {
        let tmp = tempfile::tempdir().unwrap();
        let base = tmp.path();
        touch(&base.join("A/B/Sequence/f1.jpg"));
        touch(&base.join("A/B/Sequence/C/sequence/f1.jpg"));
        touch(&base.join("X/Y/sequences/f1.jpg"));

        let folders = find_sequence_folders(base, false);
        let outputs: Vec<PathBuf> = folders.iter().map(|f| f.output_path()).collect();
        assert_eq!(
            outputs,
            vec![base.join("A/B.gif"), base.join("A/B/Sequence/C.gif")]
        );
    }

    #[test]
    fn test_files_named_sequence_are_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        let base = tmp.path();
        touch(&base.join("A/B/sequence"));

        assert!(find_sequence_folders(base, false).is_empty());
    }

    #[test]
    fn test_is_sequence_dir_name() {
        assert!(is_sequence_dir_name("sequence"));
        assert!(is_sequence_dir_name("SEQUENCE"));
        assert!(!is_sequence_dir_name("sequence2"));
    }
}
