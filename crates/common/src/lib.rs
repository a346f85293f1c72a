//! Shared context and naming conventions for the devkit workspace.

pub mod context;
pub mod paths;

pub use context::{Scope, WorkContext};

/// Directory under the project root (or home) holding shared agent state.
pub const AGENTS_DIR: &str = ".agents";

/// Subdirectory of [`AGENTS_DIR`] holding canonical skill copies.
pub const SKILLS_SUBDIR: &str = "skills";

/// Lock file name, both project-scoped and global.
pub const LOCK_FILE: &str = "devkit-lock.json";

/// Current lock document schema version. Older documents are discarded.
pub const LOCK_VERSION: u32 = 2;
