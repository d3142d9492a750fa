//! File System Module
//!
//! The archive-backed virtual file system: the Node tree, the zip
//! container codec, and the Vfs that ties them to the file on disk.

pub mod types;
pub mod vfs;
pub mod zip;

pub use types::{FsError, Node, VfsPath};
pub use vfs::Vfs;
pub use zip::ZipEntry;
