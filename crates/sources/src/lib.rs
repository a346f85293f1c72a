//! Source string classification and remote repository fetching.

pub mod fetch;
pub mod resolve;

pub use {
    fetch::{FetchError, cleanup_temp_dir, clone_repo},
    resolve::{ParsedSource, SourceKind, owner_repo_of, parse_source},
};
