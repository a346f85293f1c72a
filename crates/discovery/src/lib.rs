//! Asset discovery: finding skills, commands, and rules in a source tree.
//!
//! Discovery is fail-soft throughout: unreadable directories and malformed
//! marker files shrink the result set instead of erroring.

pub mod assets;
pub mod frontmatter;
pub mod skills;

pub use {
    assets::{FlatAsset, discover_commands, discover_rules},
    skills::{DiscoverOptions, MARKER_FILE, Skill, discover_skills, filter_skills},
};

/// Env opt-in for installing skills flagged `internal` in their metadata.
/// Read by the CLI, never by the library itself.
pub const INTERNAL_SKILLS_ENV: &str = "DEVKIT_INSTALL_INTERNAL_SKILLS";
