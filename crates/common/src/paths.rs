use std::path::{Component, Path, PathBuf};

/// Lexically normalize a path: resolve `.` and `..` components without
/// touching the filesystem.
///
/// `..` at the root is dropped rather than preserved, matching how the
/// install path-safety check wants traversal attempts flattened.
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(prefix) => normalized.push(prefix.as_os_str()),
            Component::RootDir => normalized.push(Component::RootDir),
            Component::CurDir => {},
            Component::ParentDir => {
                normalized.pop();
            },
            Component::Normal(part) => normalized.push(part),
        }
    }
    normalized
}

/// Resolve `path` against `base` when relative, then normalize.
#[must_use]
pub fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize_path(path)
    } else {
        normalize_path(&base.join(path))
    }
}

/// Whether `target` is `base` itself or a descendant of it, after lexical
/// normalization of both sides.
#[must_use]
pub fn is_path_within(base: &Path, target: &Path) -> bool {
    let base = normalize_path(base);
    let target = normalize_path(target);
    target.starts_with(&base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_resolves_dots() {
        assert_eq!(normalize_path(Path::new("/a/b/../c/./d")), PathBuf::from("/a/c/d"));
        assert_eq!(normalize_path(Path::new("a/./b")), PathBuf::from("a/b"));
    }

    #[test]
    fn normalize_drops_leading_parent_at_root() {
        assert_eq!(normalize_path(Path::new("/../etc")), PathBuf::from("/etc"));
    }

    #[test]
    fn containment_rejects_escapes() {
        let base = Path::new("/srv/skills");
        assert!(is_path_within(base, Path::new("/srv/skills/demo")));
        assert!(is_path_within(base, Path::new("/srv/skills")));
        assert!(!is_path_within(base, Path::new("/srv/skills/../secrets")));
        assert!(!is_path_within(base, Path::new("/srv/other")));
    }

    #[test]
    fn resolve_against_joins_relative_paths() {
        assert_eq!(
            resolve_against(Path::new("/work"), Path::new("../other/skills")),
            PathBuf::from("/other/skills")
        );
        assert_eq!(
            resolve_against(Path::new("/work"), Path::new("/abs/path")),
            PathBuf::from("/abs/path")
        );
    }
}
