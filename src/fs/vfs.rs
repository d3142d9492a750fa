// src/fs/vfs.rs
//
// The virtual filesystem: a tree of Nodes materialized from a zip archive.
// The archive on disk is authoritative; the tree is rebuilt wholesale at
// load time and the archive is rewritten wholesale on every successful
// move. A failed rewrite leaves both untouched.

use std::fs;
use std::path::{Path, PathBuf};

use super::types::{FsError, Node, VfsPath};
use super::zip::{build_archive, parse_archive, ZipEntry};

#[derive(Debug)]
pub struct Vfs {
    root: Node,
    archive_path: PathBuf,
}

impl Vfs {
    /// Load the backing archive and materialize the tree. Fatal errors
    /// (missing file, corrupt container, file/directory collisions) are
    /// returned to the caller, which exits before the REPL starts.
    pub fn load(archive_path: impl Into<PathBuf>) -> Result<Self, FsError> {
        let archive_path = archive_path.into();
        let bytes = fs::read(&archive_path)?;
        let entries = parse_archive(&bytes)?;
        Ok(Self {
            root: tree_from_entries(&entries)?,
            archive_path,
        })
    }

    /// Node at an absolute path, or None.
    pub fn node_at(&self, path: &VfsPath) -> Option<&Node> {
        let mut node = &self.root;
        for segment in path.segments() {
            node = node.children()?.get(segment)?;
        }
        Some(node)
    }

    /// Resolve a path token against `current`. Purely functional: the
    /// caller decides whether to commit the result.
    ///
    /// A leading separator restarts from the root. `.` and empty
    /// sub-segments are skipped, `..` pops (a no-op at the root). Any other
    /// name must exist as a child; a file in a non-final position is
    /// `NotADirectory`. A file in the final position resolves; callers that
    /// need a directory use `resolve_dir`.
    pub fn resolve(&self, current: &VfsPath, token: &str) -> Result<VfsPath, FsError> {
        let mut path = if token.starts_with('/') {
            VfsPath::root()
        } else {
            current.clone()
        };

        let subs: Vec<&str> = token.split('/').collect();
        for (i, sub) in subs.iter().enumerate() {
            match *sub {
                "" | "." => {}
                ".." => path.pop(),
                name => {
                    let candidate = path.join(name);
                    match self.node_at(&candidate) {
                        None => {
                            return Err(FsError::NotFound {
                                path: name.to_string(),
                            })
                        }
                        Some(node) => {
                            let more_remain = subs[i + 1..].iter().any(|s| !s.is_empty());
                            if node.is_file() && more_remain {
                                return Err(FsError::NotADirectory {
                                    path: name.to_string(),
                                });
                            }
                            path = candidate;
                        }
                    }
                }
            }
        }

        Ok(path)
    }

    /// Resolve a token that must denote a directory (cd / ls targets).
    pub fn resolve_dir(&self, current: &VfsPath, token: &str) -> Result<VfsPath, FsError> {
        let path = self.resolve(current, token)?;
        match self.node_at(&path) {
            Some(node) if node.is_directory() => Ok(path),
            _ => Err(FsError::NotADirectory {
                path: path.last().unwrap_or(token).to_string(),
            }),
        }
    }

    /// Split a token into (parent directory path, base name), resolving
    /// everything before the final segment. The base need not exist.
    pub fn resolve_parent(
        &self,
        current: &VfsPath,
        token: &str,
    ) -> Result<(VfsPath, String), FsError> {
        let trimmed = token.trim_end_matches('/');
        let (dir_part, base) = match trimmed.rfind('/') {
            Some(idx) => (&trimmed[..idx], &trimmed[idx + 1..]),
            None => ("", trimmed),
        };

        if base.is_empty() || base == "." || base == ".." {
            return Err(FsError::InvalidPath {
                path: token.to_string(),
            });
        }

        let parent = if dir_part.is_empty() {
            if token.starts_with('/') {
                VfsPath::root()
            } else {
                current.clone()
            }
        } else {
            self.resolve_dir(current, dir_part)?
        };

        Ok((parent, base.to_string()))
    }

    /// Children of the directory at `path`, directories rendered with a
    /// trailing separator, in intrinsic insertion order.
    pub fn list_dir(&self, path: &VfsPath) -> Result<Vec<String>, FsError> {
        let node = self.node_at(path).ok_or_else(|| FsError::NotFound {
            path: path.display(),
        })?;
        let children = node.children().ok_or_else(|| FsError::NotADirectory {
            path: path.display(),
        })?;
        Ok(children
            .iter()
            .map(|(name, child)| {
                if child.is_directory() {
                    format!("{}/", name)
                } else {
                    name.clone()
                }
            })
            .collect())
    }

    /// Move a node. Source must exist; an existing directory destination
    /// receives the node under its original base name; an existing file
    /// destination is never overwritten. The tree change is committed only
    /// after the replacement archive has been fully written and swapped
    /// into place.
    pub fn mv(&mut self, current: &VfsPath, source: &str, dest: &str) -> Result<(), FsError> {
        let (src_parent, src_base) = self
            .resolve_parent(current, source)
            .map_err(|_| FsError::SourceNotFound {
                path: source.to_string(),
            })?;
        let src_path = src_parent.join(src_base.clone());
        if self.node_at(&src_path).is_none() {
            return Err(FsError::SourceNotFound {
                path: source.to_string(),
            });
        }

        // Destination policy: an existing directory means "move into";
        // detection is a tree lookup, never a scan over raw entry names.
        let (dest_parent, dest_base) = match self.resolve(current, dest) {
            Ok(path) if self.node_at(&path).is_some_and(Node::is_directory) => {
                (path, src_base.clone())
            }
            _ => self.resolve_parent(current, dest)?,
        };
        let dest_path = dest_parent.join(dest_base.clone());

        if self.node_at(&dest_path).is_some() {
            return Err(FsError::AlreadyExists {
                path: dest_path.display(),
            });
        }
        if dest_path.segments().starts_with(src_path.segments()) {
            return Err(FsError::InvalidPath {
                path: dest.to_string(),
            });
        }

        // Mutate a copy of the tree; the live tree is replaced only after
        // the archive rewrite succeeds.
        let mut new_root = self.root.clone();
        let node = detach(&mut new_root, &src_parent, &src_base).ok_or_else(|| {
            FsError::SourceNotFound {
                path: source.to_string(),
            }
        })?;
        attach(&mut new_root, &dest_parent, dest_base, node)?;

        rewrite_archive(&self.archive_path, &new_root)?;
        self.root = new_root;
        Ok(())
    }

    /// All file paths in the tree, '/'-joined, in tree order.
    pub fn list_files(&self) -> Vec<String> {
        let mut files = Vec::new();
        collect_files(&self.root, String::new(), &mut files);
        files
    }

    /// Byte content of the file at `path`, if any.
    pub fn file_content(&self, path: &VfsPath) -> Option<&[u8]> {
        match self.node_at(path)? {
            Node::File(data) => Some(data.as_slice()),
            Node::Directory(_) => None,
        }
    }
}

/// Build the tree from archive entries, in entry order. An intermediate
/// segment that already exists as a file, or a leaf that already exists as
/// a directory, is a hard collision error; silently dropping data would be
/// undetectable by the caller. A duplicate file entry follows zip
/// semantics: the later entry wins.
fn tree_from_entries(entries: &[ZipEntry]) -> Result<Node, FsError> {
    let mut root = Node::dir();

    for entry in entries {
        let segments: Vec<&str> = entry.name.split('/').filter(|s| !s.is_empty()).collect();
        if segments.is_empty() {
            continue;
        }

        let (dir_segments, leaf) = if entry.is_directory() {
            (&segments[..], None)
        } else {
            (&segments[..segments.len() - 1], Some(segments[segments.len() - 1]))
        };

        let mut node = &mut root;
        for segment in dir_segments {
            let children = node.children_mut().ok_or_else(|| FsError::PathCollision {
                path: entry.name.clone(),
            })?;
            node = children
                .entry(segment.to_string())
                .or_insert_with(Node::dir);
            if node.is_file() {
                return Err(FsError::PathCollision {
                    path: entry.name.clone(),
                });
            }
        }

        if let Some(name) = leaf {
            let children = node.children_mut().ok_or_else(|| FsError::PathCollision {
                path: entry.name.clone(),
            })?;
            if children.get(name).is_some_and(Node::is_directory) {
                return Err(FsError::PathCollision {
                    path: entry.name.clone(),
                });
            }
            children.insert(name.to_string(), Node::File(entry.data.clone()));
        }
    }

    Ok(root)
}

fn collect_files(node: &Node, path: String, files: &mut Vec<String>) {
    match node {
        Node::File(_) => files.push(path),
        Node::Directory(children) => {
            for (name, child) in children {
                let child_path = if path.is_empty() {
                    name.clone()
                } else {
                    format!("{}/{}", path, name)
                };
                collect_files(child, child_path, files);
            }
        }
    }
}

fn detach(root: &mut Node, parent: &VfsPath, name: &str) -> Option<Node> {
    let mut node = root;
    for segment in parent.segments() {
        node = node.children_mut()?.get_mut(segment)?;
    }
    // shift_remove keeps the remaining siblings in their original order
    node.children_mut()?.shift_remove(name)
}

fn attach(root: &mut Node, parent: &VfsPath, name: String, child: Node) -> Result<(), FsError> {
    let mut node = root;
    for segment in parent.segments() {
        node = node
            .children_mut()
            .and_then(|c| c.get_mut(segment))
            .ok_or_else(|| FsError::NotFound {
                path: segment.clone(),
            })?;
    }
    node.children_mut()
        .ok_or_else(|| FsError::NotADirectory {
            path: parent.display(),
        })?
        .insert(name, child);
    Ok(())
}

/// Flatten the tree back into archive entries. Files become entries under
/// their full path; a directory with no children becomes an explicit
/// `name/` entry so it survives the rewrite.
fn tree_to_entries(root: &Node) -> Vec<ZipEntry> {
    let mut entries = Vec::new();
    if let Some(children) = root.children() {
        for (name, child) in children {
            flatten(name.clone(), child, &mut entries);
        }
    }
    entries
}

fn flatten(path: String, node: &Node, entries: &mut Vec<ZipEntry>) {
    match node {
        Node::File(data) => entries.push(ZipEntry {
            name: path,
            data: data.clone(),
        }),
        Node::Directory(children) => {
            if children.is_empty() {
                entries.push(ZipEntry {
                    name: format!("{}/", path),
                    data: Vec::new(),
                });
            } else {
                for (name, child) in children {
                    flatten(format!("{}/{}", path, name), child, entries);
                }
            }
        }
    }
}

/// Write the replacement archive next to the original, then rename it into
/// place. The original bytes are untouched unless the whole write succeeds.
fn rewrite_archive(archive_path: &Path, root: &Node) -> Result<(), FsError> {
    let bytes = build_archive(&tree_to_entries(root));
    let mut tmp_path = archive_path.as_os_str().to_owned();
    tmp_path.push(".tmp");
    let tmp_path = PathBuf::from(tmp_path);

    fs::write(&tmp_path, &bytes)?;
    if let Err(e) = fs::rename(&tmp_path, archive_path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, data: &[u8]) -> ZipEntry {
        ZipEntry {
            name: name.to_string(),
            data: data.to_vec(),
        }
    }

    /// Vfs over a real archive file in a scratch directory.
    fn vfs_with(entries: &[ZipEntry]) -> (tempfile::TempDir, Vfs) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fs.zip");
        fs::write(&path, build_archive(entries)).unwrap();
        let vfs = Vfs::load(&path).unwrap();
        (dir, vfs)
    }

    fn sample() -> Vec<ZipEntry> {
        vec![
            entry("a/b.txt", b"bee"),
            entry("c.txt", b"sea"),
            entry("a/deep/d.txt", b"dee"),
            entry("into/", b""),
        ]
    }

    #[test]
    fn test_load_builds_tree_in_entry_order() {
        let (_dir, vfs) = vfs_with(&sample());
        let names = vfs.list_dir(&VfsPath::root()).unwrap();
        assert_eq!(names, vec!["a/", "c.txt", "into/"]);
    }

    #[test]
    fn test_load_missing_archive_fails() {
        assert!(Vfs::load("/definitely/not/here.zip").is_err());
    }

    #[test]
    fn test_load_file_directory_collision_is_fatal() {
        // "a" is created as a file, then needed as a directory.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fs.zip");
        fs::write(
            &path,
            build_archive(&[entry("a", b"file"), entry("a/b.txt", b"x")]),
        )
        .unwrap();
        let err = Vfs::load(&path).unwrap_err();
        assert_eq!(
            err,
            FsError::PathCollision {
                path: "a/b.txt".to_string()
            }
        );
    }

    #[test]
    fn test_load_duplicate_file_entry_last_wins() {
        let (_dir, vfs) = vfs_with(&[entry("x.txt", b"old"), entry("x.txt", b"new")]);
        let path = VfsPath::root().join("x.txt");
        assert_eq!(vfs.file_content(&path), Some(&b"new"[..]));
    }

    #[test]
    fn test_resolve_dots_never_fail_and_root_pop_is_noop() {
        let (_dir, vfs) = vfs_with(&sample());
        let root = VfsPath::root();

        // Interleaved absolute and relative forms of . and ..
        for token in ["..", ".", "./..", "/..", "/./..", "../../..", "//.."] {
            assert_eq!(vfs.resolve(&root, token).unwrap(), root);
        }

        let a = vfs.resolve(&root, "a").unwrap();
        assert_eq!(vfs.resolve(&a, "..").unwrap(), root);
        assert_eq!(vfs.resolve(&a, "./deep/..").unwrap(), a);
    }

    #[test]
    fn test_resolve_multi_level_token() {
        let (_dir, vfs) = vfs_with(&sample());
        let path = vfs.resolve(&VfsPath::root(), "a/deep").unwrap();
        assert_eq!(path.display(), "a/deep");

        // Absolute token restarts from the root regardless of current.
        let path = vfs.resolve(&path, "/a").unwrap();
        assert_eq!(path.display(), "a");
    }

    #[test]
    fn test_resolve_errors() {
        let (_dir, vfs) = vfs_with(&sample());
        let root = VfsPath::root();

        assert_eq!(
            vfs.resolve(&root, "nope"),
            Err(FsError::NotFound {
                path: "nope".to_string()
            })
        );
        // File in a non-final position
        assert_eq!(
            vfs.resolve(&root, "c.txt/x"),
            Err(FsError::NotADirectory {
                path: "c.txt".to_string()
            })
        );
        // File in the final position resolves, but not as a directory
        assert!(vfs.resolve(&root, "c.txt").is_ok());
        assert!(matches!(
            vfs.resolve_dir(&root, "c.txt"),
            Err(FsError::NotADirectory { .. })
        ));
    }

    #[test]
    fn test_resolve_parent() {
        let (_dir, vfs) = vfs_with(&sample());
        let root = VfsPath::root();

        let (parent, base) = vfs.resolve_parent(&root, "a/new.txt").unwrap();
        assert_eq!(parent.display(), "a");
        assert_eq!(base, "new.txt");

        // Base need not exist; parent must.
        let (parent, base) = vfs.resolve_parent(&root, "brand_new.txt").unwrap();
        assert!(parent.is_root());
        assert_eq!(base, "brand_new.txt");

        assert!(vfs.resolve_parent(&root, "missing/new.txt").is_err());
        assert!(matches!(
            vfs.resolve_parent(&root, ".."),
            Err(FsError::InvalidPath { .. })
        ));
    }

    #[test]
    fn test_mv_rename_in_place() {
        let (_dir, mut vfs) = vfs_with(&sample());
        vfs.mv(&VfsPath::root(), "c.txt", "renamed.txt").unwrap();
        assert!(vfs.list_files().contains(&"renamed.txt".to_string()));
        assert!(!vfs.list_files().contains(&"c.txt".to_string()));
        let path = VfsPath::root().join("renamed.txt");
        assert_eq!(vfs.file_content(&path), Some(&b"sea"[..]));
    }

    #[test]
    fn test_mv_into_existing_directory_keeps_base_name() {
        let (_dir, mut vfs) = vfs_with(&sample());
        vfs.mv(&VfsPath::root(), "c.txt", "into/").unwrap();
        assert!(vfs.list_files().contains(&"into/c.txt".to_string()));
        assert!(!vfs.list_files().contains(&"c.txt".to_string()));
        let path = VfsPath::root().join("into").join("c.txt");
        assert_eq!(vfs.file_content(&path), Some(&b"sea"[..]));
    }

    #[test]
    fn test_mv_never_overwrites() {
        let (_dir, mut vfs) = vfs_with(&sample());
        let err = vfs.mv(&VfsPath::root(), "c.txt", "a/b.txt").unwrap_err();
        assert!(matches!(err, FsError::AlreadyExists { .. }));
        // Both files still present and unchanged.
        assert_eq!(
            vfs.file_content(&VfsPath::root().join("c.txt")),
            Some(&b"sea"[..])
        );
        assert_eq!(
            vfs.file_content(&VfsPath::root().join("a").join("b.txt")),
            Some(&b"bee"[..])
        );
    }

    #[test]
    fn test_mv_missing_source() {
        let (_dir, mut vfs) = vfs_with(&sample());
        let err = vfs
            .mv(&VfsPath::root(), "missing.txt", "dest.txt")
            .unwrap_err();
        assert_eq!(
            err,
            FsError::SourceNotFound {
                path: "missing.txt".to_string()
            }
        );
        assert_eq!(vfs.list_files(), Vfs::load(vfs.archive_path.clone()).unwrap().list_files());
    }

    #[test]
    fn test_mv_relative_to_current_directory() {
        let (_dir, mut vfs) = vfs_with(&sample());
        let cwd = vfs.resolve(&VfsPath::root(), "a").unwrap();
        vfs.mv(&cwd, "b.txt", "deep").unwrap();
        assert!(vfs.list_files().contains(&"a/deep/b.txt".to_string()));
    }

    #[test]
    fn test_mv_directory_into_itself_is_rejected() {
        let (_dir, mut vfs) = vfs_with(&sample());
        let err = vfs.mv(&VfsPath::root(), "a", "a/deep/a2").unwrap_err();
        assert!(matches!(err, FsError::InvalidPath { .. }));
    }

    #[test]
    fn test_mv_rewrites_archive_on_disk() {
        let (dir, mut vfs) = vfs_with(&sample());
        vfs.mv(&VfsPath::root(), "c.txt", "into/").unwrap();

        // A fresh load of the rewritten archive sees the move.
        let reloaded = Vfs::load(dir.path().join("fs.zip")).unwrap();
        assert!(reloaded.list_files().contains(&"into/c.txt".to_string()));
        assert!(!reloaded.list_files().contains(&"c.txt".to_string()));
        let path = VfsPath::root().join("into").join("c.txt");
        assert_eq!(reloaded.file_content(&path), Some(&b"sea"[..]));
    }

    #[test]
    fn test_mv_preserves_empty_directories_across_rewrite() {
        let (dir, mut vfs) = vfs_with(&sample());
        vfs.mv(&VfsPath::root(), "c.txt", "renamed.txt").unwrap();
        let reloaded = Vfs::load(dir.path().join("fs.zip")).unwrap();
        let names = reloaded.list_dir(&VfsPath::root()).unwrap();
        assert!(names.contains(&"into/".to_string()));
    }

    #[test]
    fn test_mv_moves_whole_directory() {
        let (_dir, mut vfs) = vfs_with(&sample());
        vfs.mv(&VfsPath::root(), "a/deep", "moved_deep").unwrap();
        assert!(vfs.list_files().contains(&"moved_deep/d.txt".to_string()));
        assert!(!vfs.list_files().contains(&"a/deep/d.txt".to_string()));
    }

    #[test]
    fn test_failed_rewrite_leaves_archive_and_tree_untouched() {
        let (dir, mut vfs) = vfs_with(&sample());
        let original_bytes = fs::read(dir.path().join("fs.zip")).unwrap();

        // Point the rewrite at a location that cannot be created.
        vfs.archive_path = dir.path().join("no_such_dir").join("fs.zip");
        let err = vfs.mv(&VfsPath::root(), "c.txt", "renamed.txt").unwrap_err();
        assert!(matches!(err, FsError::Io { .. }));

        // Tree rolled back with the failure.
        assert!(vfs.list_files().contains(&"c.txt".to_string()));
        assert!(!vfs.list_files().contains(&"renamed.txt".to_string()));

        // Original archive byte-for-byte identical.
        assert_eq!(fs::read(dir.path().join("fs.zip")).unwrap(), original_bytes);
    }
}
