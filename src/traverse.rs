//! Deterministic recursive directory traversal.
//!
//! Both orders walk siblings in lexicographic file name order so that every
//! pass over a destination tree is reproducible. The root directory itself is
//! never handed to a callback and `.git` directories are skipped entirely.

use std::path::Path;

use walkdir::WalkDir;

use crate::constants::VCS_DIR;
use crate::error::Result;

/// Order in which a directory is reported relative to its contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    /// Children first, then the directory. Used for deletion.
    ChildrenFirst,
    /// The directory first, then its children.
    SelfFirst,
}

/// Walks `root` calling `on_dir` for every directory and `on_file` for every
/// other entry. The first error, from the walk or from a callback, aborts
/// the traversal.
pub fn traverse<P, D, F>(root: P, order: Order, mut on_dir: D, mut on_file: F) -> Result<()>
where
    P: AsRef<Path>,
    D: FnMut(&Path) -> Result<()>,
    F: FnMut(&Path) -> Result<()>,
{
    let walker = WalkDir::new(root.as_ref())
        .min_depth(1)
        .sort_by_file_name()
        .contents_first(order == Order::ChildrenFirst)
        .into_iter()
        .filter_entry(|entry| entry.file_name() != VCS_DIR);

    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_dir() {
            on_dir(entry.path())?;
        } else {
            on_file(entry.path())?;
        }
    }
    Ok(())
}

/// Children-before-self traversal.
pub fn post_order<P, D, F>(root: P, on_dir: D, on_file: F) -> Result<()>
where
    P: AsRef<Path>,
    D: FnMut(&Path) -> Result<()>,
    F: FnMut(&Path) -> Result<()>,
{
    traverse(root, Order::ChildrenFirst, on_dir, on_file)
}

/// Self-before-children traversal.
pub fn pre_order<P, D, F>(root: P, on_dir: D, on_file: F) -> Result<()>
where
    P: AsRef<Path>,
    D: FnMut(&Path) -> Result<()>,
    F: FnMut(&Path) -> Result<()>,
{
    traverse(root, Order::SelfFirst, on_dir, on_file)
}
