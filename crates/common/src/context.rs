use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Whether an operation targets the current project or the user's home.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Project,
    Global,
}

impl Scope {
    #[must_use]
    pub fn is_global(self) -> bool {
        matches!(self, Self::Global)
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Project => write!(f, "project"),
            Self::Global => write!(f, "global"),
        }
    }
}

/// Explicit invocation context: the working directory and home directory
/// every operation resolves paths against.
///
/// Passed in rather than read from process globals so behavior is a pure
/// function of inputs and tests never have to manipulate the environment.
#[derive(Debug, Clone)]
pub struct WorkContext {
    pub cwd: PathBuf,
    pub home_dir: PathBuf,
}

impl WorkContext {
    pub fn new(cwd: impl Into<PathBuf>, home_dir: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            home_dir: home_dir.into(),
        }
    }

    /// Build a context from the current process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        let cwd = std::env::current_dir()?;
        let home_dir = directories::BaseDirs::new()
            .map(|dirs| dirs.home_dir().to_path_buf())
            .ok_or_else(|| anyhow::anyhow!("could not determine home directory"))?;
        Ok(Self { cwd, home_dir })
    }

    /// Base directory for a scope: the project root or the home directory.
    #[must_use]
    pub fn scope_root(&self, scope: Scope) -> &Path {
        match scope {
            Scope::Project => &self.cwd,
            Scope::Global => &self.home_dir,
        }
    }

    /// Canonical shared skills directory for a scope:
    /// `<root>/.agents/skills`.
    #[must_use]
    pub fn canonical_skills_dir(&self, scope: Scope) -> PathBuf {
        self.scope_root(scope)
            .join(crate::AGENTS_DIR)
            .join(crate::SKILLS_SUBDIR)
    }

    /// Render a path relative to home (`~/...`) or the project (`./...`)
    /// where possible, for display.
    #[must_use]
    pub fn shorten_path(&self, path: &Path) -> String {
        if let Ok(rest) = path.strip_prefix(&self.home_dir) {
            if rest.as_os_str().is_empty() {
                return "~".into();
            }
            return format!("~/{}", rest.display());
        }
        if let Ok(rest) = path.strip_prefix(&self.cwd) {
            if rest.as_os_str().is_empty() {
                return ".".into();
            }
            return format!("./{}", rest.display());
        }
        path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_root_selects_cwd_or_home() {
        let ctx = WorkContext::new("/work/project", "/home/me");
        assert_eq!(ctx.scope_root(Scope::Project), Path::new("/work/project"));
        assert_eq!(ctx.scope_root(Scope::Global), Path::new("/home/me"));
    }

    #[test]
    fn canonical_skills_dir_layout() {
        let ctx = WorkContext::new("/work/project", "/home/me");
        assert_eq!(
            ctx.canonical_skills_dir(Scope::Project),
            Path::new("/work/project/.agents/skills")
        );
        assert_eq!(
            ctx.canonical_skills_dir(Scope::Global),
            Path::new("/home/me/.agents/skills")
        );
    }

    #[test]
    fn shorten_path_prefers_home_then_project() {
        let ctx = WorkContext::new("/work/project", "/home/me");
        assert_eq!(
            ctx.shorten_path(Path::new("/home/me/.claude/skills")),
            "~/.claude/skills"
        );
        assert_eq!(
            ctx.shorten_path(Path::new("/work/project/.cursor/skills")),
            "./.cursor/skills"
        );
        assert_eq!(ctx.shorten_path(Path::new("/etc/hosts")), "/etc/hosts");
    }
}
