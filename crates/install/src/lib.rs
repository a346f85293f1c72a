//! Installation engine: writing discovered assets into agent directories.
//!
//! All destination paths go through name sanitization and a lexical
//! containment check before anything touches the filesystem.

pub mod engine;
pub mod list;
pub mod sanitize;

pub use {
    engine::{
        InstallError, install_command, install_rule, install_skill, is_skill_installed,
        remove_command, remove_rule, remove_skill,
    },
    list::{InstalledSkill, list_installed_skills},
    sanitize::sanitize_name,
};
