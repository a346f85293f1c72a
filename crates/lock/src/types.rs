use std::collections::BTreeMap;

use {
    chrono::{DateTime, Utc},
    devkit_common::LOCK_VERSION,
    devkit_sources::SourceKind,
    serde::{Deserialize, Serialize},
    thiserror::Error,
};

/// What kind of asset a lock entry tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    Skill,
    Command,
    Rule,
    Mcp,
}

impl AssetType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Skill => "skill",
            Self::Command => "command",
            Self::Rule => "rule",
            Self::Mcp => "mcp",
        }
    }
}

impl std::fmt::Display for AssetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown asset type {0:?}; expected skill, command, rule, or mcp")]
pub struct UnknownAssetType(pub String);

impl std::str::FromStr for AssetType {
    type Err = UnknownAssetType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "skill" | "skills" => Ok(Self::Skill),
            "command" | "commands" => Ok(Self::Command),
            "rule" | "rules" => Ok(Self::Rule),
            "mcp" => Ok(Self::Mcp),
            _ => Err(UnknownAssetType(s.to_string())),
        }
    }
}

/// Where an asset originally came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Github,
    Git,
    Local,
    Bundled,
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Github => "github",
            Self::Git => "git",
            Self::Local => "local",
            Self::Bundled => "bundled",
        })
    }
}

impl From<SourceKind> for SourceType {
    fn from(kind: SourceKind) -> Self {
        match kind {
            SourceKind::Github => Self::Github,
            SourceKind::Git => Self::Git,
            SourceKind::Local => Self::Local,
        }
    }
}

/// One tracked asset. Serialized camelCase inside the lock document under
/// the key `"{type}:{name}"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockEntry {
    #[serde(rename = "type")]
    pub asset_type: AssetType,
    /// The source string as the user gave it.
    pub source: String,
    pub source_type: SourceType,
    pub source_url: String,
    /// Git ref requested at install time; drift checks group by it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_ref: Option<String>,
    /// SHA-256 of the asset's marker or file content, 64 lowercase hex.
    pub content_hash: String,
    /// Remote tree SHA of the skill folder, GitHub skills only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill_folder_hash: Option<String>,
    /// Repo-relative path of the skill folder, GitHub skills only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill_path: Option<String>,
    pub installed_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The whole lock document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockFile {
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub assets: BTreeMap<String, LockEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_selected_agents: Option<Vec<String>>,
}

impl LockFile {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            version: LOCK_VERSION,
            ..Self::default()
        }
    }
}

/// Map key for one asset: `"{type}:{name}"`.
#[must_use]
pub fn lock_key(asset_type: AssetType, name: &str) -> String {
    format!("{asset_type}:{name}")
}
