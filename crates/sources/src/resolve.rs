use std::path::{Path, PathBuf};

use {
    devkit_common::paths::resolve_against,
    serde::{Deserialize, Serialize},
};

/// How a raw source string was classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Github,
    Git,
    Local,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Github => write!(f, "github"),
            Self::Git => write!(f, "git"),
            Self::Local => write!(f, "local"),
        }
    }
}

/// Structured result of classifying a source string.
///
/// Exactly one of `local_path` (for [`SourceKind::Local`]) or `url` is
/// meaningful; for github/git kinds `url` always ends in `.git`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSource {
    pub kind: SourceKind,
    pub url: String,
    pub git_ref: Option<String>,
    pub subpath: Option<String>,
    pub skill_filter: Option<String>,
    pub local_path: Option<PathBuf>,
}

impl ParsedSource {
    fn github(url: String) -> Self {
        Self {
            kind: SourceKind::Github,
            url,
            git_ref: None,
            subpath: None,
            skill_filter: None,
            local_path: None,
        }
    }

    /// Extract an `owner/repo` label.
    ///
    /// Defined only for github-kind HTTP(S) URLs; local paths and SSH-form
    /// remotes (`user@host:path`) yield `None`; the `user@host` prefix is
    /// not a GitHub owner.
    #[must_use]
    pub fn owner_repo(&self) -> Option<String> {
        if self.kind != SourceKind::Github {
            return None;
        }
        owner_repo_of(&self.url)
    }
}

/// `owner/repo` from an HTTP(S) remote URL. SSH-form remotes
/// (`user@host:path`) and anything without two path segments yield `None`.
#[must_use]
pub fn owner_repo_of(url: &str) -> Option<String> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))?;
    let (_host, path) = rest.split_once('/')?;
    let path = path.strip_suffix(".git").unwrap_or(path);
    if path.contains('/') { Some(path.to_string()) } else { None }
}

fn canonical_github_url(owner: &str, repo: &str) -> String {
    let repo = repo.strip_suffix(".git").unwrap_or(repo);
    format!("https://github.com/{owner}/{repo}.git")
}

fn is_local_path(input: &str) -> bool {
    if Path::new(input).is_absolute() || input == "." || input == ".." {
        return true;
    }
    if input.starts_with("./") || input.starts_with("../") {
        return true;
    }
    // Windows drive-letter paths (`C:\...` or `C:/...`).
    let bytes = input.as_bytes();
    bytes.len() >= 3
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && (bytes[2] == b'/' || bytes[2] == b'\\')
}

/// Interpret a `github.com/...` URL, if the input contains one.
fn parse_github_url(input: &str) -> Option<ParsedSource> {
    let (_, rest) = input.split_once("github.com/")?;
    let rest = rest.trim_end_matches('/');
    let mut segments = rest.split('/');
    let owner = segments.next().filter(|s| !s.is_empty())?;
    let repo = segments.next().filter(|s| !s.is_empty())?;
    let remainder: Vec<&str> = segments.collect();

    // `/tree/{ref}/...`: the first segment after `tree/` is always taken as
    // the ref. A branch name containing `/` cannot be told apart from a
    // ref + subpath without a remote lookup.
    if remainder.first() == Some(&"tree") {
        if let Some(git_ref) = remainder.get(1).filter(|s| !s.is_empty()) {
            let subpath = remainder[2..].join("/");
            return Some(ParsedSource {
                git_ref: Some((*git_ref).to_string()),
                subpath: (!subpath.is_empty()).then_some(subpath),
                ..ParsedSource::github(canonical_github_url(owner, repo))
            });
        }
    }

    Some(ParsedSource::github(canonical_github_url(owner, repo)))
}

/// Classify a raw source string.
///
/// Total: any input yields a descriptor, degrading to [`SourceKind::Git`]
/// with the verbatim string as URL (covers SSH syntax and arbitrary
/// remotes). Local paths are resolved against `cwd`.
#[must_use]
pub fn parse_source(input: &str, cwd: &Path) -> ParsedSource {
    if is_local_path(input) {
        let resolved = resolve_against(cwd, Path::new(input));
        return ParsedSource {
            kind: SourceKind::Local,
            url: resolved.display().to_string(),
            git_ref: None,
            subpath: None,
            skill_filter: None,
            local_path: Some(resolved),
        };
    }

    if input.contains("github.com/") {
        if let Some(parsed) = parse_github_url(input) {
            return parsed;
        }
    }

    let path_like = input.contains(':') || input.starts_with('.') || input.starts_with('/');

    // Shorthand `owner/repo@skill`.
    if !path_like {
        if let Some((owner, rest)) = input.split_once('/') {
            if let Some((repo, filter)) = rest.split_once('@') {
                if !owner.is_empty() && !repo.is_empty() && !filter.is_empty()
                    && !repo.contains('/')
                {
                    return ParsedSource {
                        skill_filter: Some(filter.to_string()),
                        ..ParsedSource::github(canonical_github_url(owner, repo))
                    };
                }
            }
        }
    }

    // Shorthand `owner/repo` or `owner/repo/sub/path`.
    if !path_like {
        if let Some((owner, rest)) = input.split_once('/') {
            let (repo, subpath) = match rest.split_once('/') {
                Some((repo, subpath)) => (repo, Some(subpath)),
                None => (rest, None),
            };
            if !owner.is_empty() && !repo.is_empty() && subpath != Some("") {
                return ParsedSource {
                    subpath: subpath.map(str::to_string),
                    ..ParsedSource::github(canonical_github_url(owner, repo))
                };
            }
        }
    }

    // Anything else is passed through as a direct git remote.
    ParsedSource {
        kind: SourceKind::Git,
        url: input.to_string(),
        git_ref: None,
        subpath: None,
        skill_filter: None,
        local_path: None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse(input: &str) -> ParsedSource {
        parse_source(input, Path::new("/work/project"))
    }

    #[test]
    fn shorthand_owner_repo() {
        let parsed = parse("vercel-labs/agent-skills");
        assert_eq!(parsed.kind, SourceKind::Github);
        assert_eq!(parsed.url, "https://github.com/vercel-labs/agent-skills.git");
        assert_eq!(parsed.subpath, None);
        assert_eq!(parsed.git_ref, None);
    }

    #[test]
    fn shorthand_with_subpath() {
        let parsed = parse("owner/repo/skills/debug");
        assert_eq!(parsed.kind, SourceKind::Github);
        assert_eq!(parsed.url, "https://github.com/owner/repo.git");
        assert_eq!(parsed.subpath.as_deref(), Some("skills/debug"));
    }

    #[test]
    fn shorthand_with_skill_filter() {
        let parsed = parse("owner/repo@code-review");
        assert_eq!(parsed.kind, SourceKind::Github);
        assert_eq!(parsed.url, "https://github.com/owner/repo.git");
        assert_eq!(parsed.skill_filter.as_deref(), Some("code-review"));
        assert_eq!(parsed.subpath, None);
    }

    #[test]
    fn github_repo_url_strips_and_reappends_git() {
        for input in [
            "https://github.com/owner/repo",
            "https://github.com/owner/repo.git",
            "https://github.com/owner/repo/",
            "github.com/owner/repo",
        ] {
            let parsed = parse(input);
            assert_eq!(parsed.kind, SourceKind::Github, "{input}");
            assert_eq!(parsed.url, "https://github.com/owner/repo.git", "{input}");
        }
    }

    #[test]
    fn github_tree_url_with_subpath() {
        let parsed = parse("https://github.com/owner/repo/tree/main/skills/debug");
        assert_eq!(parsed.git_ref.as_deref(), Some("main"));
        assert_eq!(parsed.subpath.as_deref(), Some("skills/debug"));
        assert_eq!(parsed.url, "https://github.com/owner/repo.git");
    }

    #[test]
    fn github_tree_url_branch_only() {
        let parsed = parse("https://github.com/owner/repo/tree/develop");
        assert_eq!(parsed.git_ref.as_deref(), Some("develop"));
        assert_eq!(parsed.subpath, None);
    }

    #[test]
    fn slashed_branch_name_splits_at_first_segment() {
        // Documented heuristic: the first segment after tree/ is the ref.
        let parsed = parse("https://github.com/o/r/tree/feature/my-feature");
        assert_eq!(parsed.git_ref.as_deref(), Some("feature"));
        assert_eq!(parsed.subpath.as_deref(), Some("my-feature"));
        assert_eq!(parsed.url, "https://github.com/o/r.git");
    }

    #[test]
    fn local_paths_resolve_against_cwd() {
        let parsed = parse("./skills");
        assert_eq!(parsed.kind, SourceKind::Local);
        assert_eq!(parsed.local_path.as_deref(), Some(Path::new("/work/project/skills")));

        let parsed = parse("../elsewhere");
        assert_eq!(parsed.local_path.as_deref(), Some(Path::new("/work/elsewhere")));

        let parsed = parse(".");
        assert_eq!(parsed.local_path.as_deref(), Some(Path::new("/work/project")));

        let parsed = parse("/abs/skills");
        assert_eq!(parsed.local_path.as_deref(), Some(Path::new("/abs/skills")));
    }

    #[test]
    fn ssh_and_unknown_strings_fall_back_to_git() {
        // SSH form: `github.com:` is not `github.com/`, and the `:` rules
        // out the shorthand patterns.
        let parsed = parse("git@github.com:owner/repo.git");
        assert_eq!(parsed.kind, SourceKind::Git);
        assert_eq!(parsed.url, "git@github.com:owner/repo.git");

        let parsed = parse("https://gitlab.com/owner/repo.git");
        assert_eq!(parsed.kind, SourceKind::Git);
    }

    #[test]
    fn owner_repo_for_github_urls_only() {
        assert_eq!(parse("owner/repo").owner_repo().as_deref(), Some("owner/repo"));
        assert_eq!(
            parse("https://github.com/owner/repo.git").owner_repo().as_deref(),
            Some("owner/repo")
        );
        assert_eq!(parse("./local").owner_repo(), None);
        assert_eq!(parse("git@github.com:owner/repo.git").owner_repo(), None);
    }

    #[test]
    fn resolver_is_total() {
        for input in ["", "   ", "just-a-word", "a:b:c", "-rf"] {
            let parsed = parse(input);
            assert_eq!(parsed.kind, SourceKind::Git, "{input:?}");
            assert_eq!(parsed.url, input);
        }
    }
}
