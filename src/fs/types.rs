//! File System Types
//!
//! Core types for the archive-backed virtual file system.

use indexmap::IndexMap;
use thiserror::Error;

/// File system errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FsError {
    #[error("no such file or directory: '{path}'")]
    NotFound { path: String },

    #[error("not a directory: '{path}'")]
    NotADirectory { path: String },

    #[error("cannot stat '{path}': no such file or directory")]
    SourceNotFound { path: String },

    #[error("'{path}': file already exists")]
    AlreadyExists { path: String },

    #[error("archive entry '{path}' collides with an existing file")]
    PathCollision { path: String },

    #[error("corrupt archive: {reason}")]
    CorruptArchive { reason: String },

    #[error("unsupported archive feature: {reason}")]
    UnsupportedArchive { reason: String },

    #[error("invalid path: '{path}'")]
    InvalidPath { path: String },

    #[error("{message}")]
    Io { message: String },
}

impl From<std::io::Error> for FsError {
    fn from(e: std::io::Error) -> Self {
        FsError::Io {
            message: e.to_string(),
        }
    }
}

/// A node of the virtual tree: a directory with named children, or a file
/// holding opaque bytes. Child order is archive entry order, preserved by
/// the IndexMap.
#[derive(Debug, Clone)]
pub enum Node {
    Directory(IndexMap<String, Node>),
    File(Vec<u8>),
}

impl Node {
    /// New empty directory node.
    pub fn dir() -> Self {
        Node::Directory(IndexMap::new())
    }

    pub fn is_file(&self) -> bool {
        matches!(self, Node::File(_))
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, Node::Directory(_))
    }

    /// Children of a directory node; None for files.
    pub fn children(&self) -> Option<&IndexMap<String, Node>> {
        match self {
            Node::Directory(children) => Some(children),
            Node::File(_) => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut IndexMap<String, Node>> {
        match self {
            Node::Directory(children) => Some(children),
            Node::File(_) => None,
        }
    }
}

/// An absolute path in the virtual tree: non-empty name segments from the
/// root. The empty sequence is the root itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VfsPath {
    segments: Vec<String>,
}

impl VfsPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn from_segments(segments: Vec<String>) -> Self {
        Self { segments }
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn push(&mut self, segment: impl Into<String>) {
        self.segments.push(segment.into());
    }

    /// Drop the last segment. Popping the root is a no-op.
    pub fn pop(&mut self) {
        self.segments.pop();
    }

    pub fn join(&self, segment: impl Into<String>) -> Self {
        let mut out = self.clone();
        out.push(segment);
        out
    }

    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(|s| s.as_str())
    }

    /// Render without a leading separator; the root is the empty string.
    /// This is the form the prompt uses.
    pub fn display(&self) -> String {
        self.segments.join("/")
    }
}
