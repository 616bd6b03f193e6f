//! Output paths for harvested records.
//!
//! Identifiers become file names through a [`FilenamePolicy`]; every set and
//! file name is then resolved with [`safe_child`], which refuses anything that
//! would land outside its parent directory.

use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

use crate::harvest::traits::HarvestError;

/// How identifiers are turned into file names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilenamePolicy {
    /// Replace every `:` with `-` and leave everything else untouched
    #[default]
    ColonToDash,

    /// Replace every character outside `[A-Za-z0-9._-]` with `-`
    Portable,
}

impl FilenamePolicy {
    pub fn file_name(&self, identifier: &str) -> String {
        match self {
            FilenamePolicy::ColonToDash => identifier.replace(':', "-"),
            FilenamePolicy::Portable => identifier
                .chars()
                .map(|c| {
                    if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                        c
                    } else {
                        '-'
                    }
                })
                .collect(),
        }
    }
}

/// Resolves `name` as a single entry directly inside `parent`.
///
/// # Errors
///
/// Returns [`HarvestError::PathTraversal`] if `name` is empty, absolute,
/// contains `..`, or has more than one path component.
pub fn safe_child(parent: &Path, name: &str) -> Result<PathBuf, HarvestError> {
    let reject = || HarvestError::PathTraversal {
        attempted: name.to_string(),
    };

    // Separators are checked on the raw string; `Path::components` would
    // quietly drop a trailing one.
    if name.is_empty() || name.contains('/') || name.contains(std::path::MAIN_SEPARATOR) {
        return Err(reject());
    }

    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(parent.join(name)),
        _ => Err(reject()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colon_to_dash() {
        let policy = FilenamePolicy::default();
        assert_eq!(policy.file_name("oai:example.org:123"), "oai-example.org-123");
        assert_eq!(policy.file_name("plain"), "plain");
        assert_eq!(policy.file_name("a b?c"), "a b?c");
    }

    #[test]
    fn test_portable() {
        let policy = FilenamePolicy::Portable;
        assert_eq!(policy.file_name("oai:example.org:123"), "oai-example.org-123");
        assert_eq!(policy.file_name("a b?c*d"), "a-b-c-d");
        assert_eq!(policy.file_name("x/../y"), "x-..-y");
    }

    #[test]
    fn test_safe_child_accepts_plain_names() {
        let parent = Path::new("/tmp/out");
        assert_eq!(
            safe_child(parent, "oai-x-1").unwrap(),
            PathBuf::from("/tmp/out/oai-x-1")
        );
        assert!(safe_child(parent, "file..name").is_ok());
    }

    #[test]
    fn test_safe_child_rejects_path_traversal() {
        let parent = Path::new("/tmp/out");
        for name in ["", ".", "..", "../etc", "/etc/passwd", "a/b", "a/"] {
            assert!(
                matches!(safe_child(parent, name), Err(HarvestError::PathTraversal { .. })),
                "{:?} should be rejected",
                name
            );
        }
    }
}
