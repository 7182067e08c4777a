//! Maps request targets onto files under the web root.

use std::path::{Component, Path, PathBuf};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("target {0:?} escapes the web root")]
    OutsideRoot(String),
}

/// A request target joined onto the web root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    /// Target after default-document substitution (e.g. "/index.html")
    pub target: String,
    /// File to open
    pub absolute_path: PathBuf,
}

/// Joins `target` onto `root`, serving `default_document` for `/`.
///
/// Containment is checked lexically: a `..` segment anywhere in the target
/// is rejected, `.` segments and empty segments are dropped. Symlinks under
/// the root are not inspected.
pub fn resolve(
    root: &Path,
    target: &str,
    default_document: &str,
) -> Result<ResolvedPath, ResolveError> {
    let target = if target == "/" {
        format!("/{}", default_document)
    } else {
        target.to_string()
    };

    let mut absolute_path = root.to_path_buf();

    for component in Path::new(target.trim_start_matches('/')).components() {
        match component {
            Component::Normal(segment) => absolute_path.push(segment),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(ResolveError::OutsideRoot(target));
            }
        }
    }

    Ok(ResolvedPath {
        target,
        absolute_path,
    })
}
