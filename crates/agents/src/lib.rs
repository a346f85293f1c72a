//! Static registry of supported coding agents and their directory
//! conventions.
//!
//! The set of agents is a closed enumeration so an unknown identifier is a
//! compile-time error everywhere a profile is looked up. Core code only ever
//! reads this table; nothing creates or destroys profiles at runtime.

use std::path::PathBuf;

use {
    devkit_common::{Scope, WorkContext},
    serde::{Deserialize, Serialize},
};

/// One supported AI coding agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AgentKind {
    Amp,
    Antigravity,
    Augment,
    ClaudeCode,
    Openclaw,
    Cline,
    Codebuddy,
    Codex,
    CommandCode,
    Continue,
    Crush,
    Cursor,
    Droid,
    GeminiCli,
    GithubCopilot,
    Goose,
    IflowCli,
    Junie,
    Kilo,
    KimiCli,
    KiroCli,
    Kode,
    Mcpjam,
    MistralVibe,
    Mux,
    Neovate,
    Opencode,
    Openhands,
    Pi,
    Qoder,
    QwenCode,
    Replit,
    Roo,
    Trae,
    TraeCn,
    Windsurf,
    Zencoder,
    Pochi,
    Adal,
}

/// Directory conventions for one agent.
///
/// `skills_dir` is relative to the project root; `global_skills_dir` is
/// relative to the home directory and absent for agents without a global
/// install location.
#[derive(Debug, Clone, Copy)]
pub struct AgentProfile {
    pub display_name: &'static str,
    pub skills_dir: &'static str,
    pub global_skills_dir: Option<&'static str>,
    /// Subdirectory name for slash commands (defaults to `commands`).
    pub commands_subdir: &'static str,
    /// Subdirectory name for rules (defaults to `rules`).
    pub rules_subdir: &'static str,
    /// File extension for installed rules.
    pub rule_extension: &'static str,
}

const fn profile(
    display_name: &'static str,
    skills_dir: &'static str,
    global_skills_dir: Option<&'static str>,
) -> AgentProfile {
    AgentProfile {
        display_name,
        skills_dir,
        global_skills_dir,
        commands_subdir: "commands",
        rules_subdir: "rules",
        rule_extension: "md",
    }
}

impl AgentKind {
    /// Every known agent, in display order.
    pub const ALL: &'static [AgentKind] = &[
        Self::Amp,
        Self::Antigravity,
        Self::Augment,
        Self::ClaudeCode,
        Self::Openclaw,
        Self::Cline,
        Self::Codebuddy,
        Self::Codex,
        Self::CommandCode,
        Self::Continue,
        Self::Crush,
        Self::Cursor,
        Self::Droid,
        Self::GeminiCli,
        Self::GithubCopilot,
        Self::Goose,
        Self::IflowCli,
        Self::Junie,
        Self::Kilo,
        Self::KimiCli,
        Self::KiroCli,
        Self::Kode,
        Self::Mcpjam,
        Self::MistralVibe,
        Self::Mux,
        Self::Neovate,
        Self::Opencode,
        Self::Openhands,
        Self::Pi,
        Self::Qoder,
        Self::QwenCode,
        Self::Replit,
        Self::Roo,
        Self::Trae,
        Self::TraeCn,
        Self::Windsurf,
        Self::Zencoder,
        Self::Pochi,
        Self::Adal,
    ];

    /// The static profile for this agent.
    #[must_use]
    pub const fn profile(self) -> AgentProfile {
        match self {
            Self::Amp => profile("Amp", ".agents/skills", Some(".agents/skills")),
            Self::Antigravity => {
                profile("Antigravity", ".antigravity/skills", Some(".antigravity/skills"))
            },
            Self::Augment => profile("Augment", ".augment/skills", Some(".augment/skills")),
            Self::ClaudeCode => profile("Claude Code", ".claude/skills", Some(".claude/skills")),
            Self::Openclaw => profile("OpenClaw", ".openclaw/skills", Some(".openclaw/skills")),
            Self::Cline => profile("Cline", ".cline/skills", Some(".cline/skills")),
            Self::Codebuddy => profile("CodeBuddy", ".codebuddy/skills", Some(".codebuddy/skills")),
            Self::Codex => profile("Codex", ".codex/skills", Some(".codex/skills")),
            Self::CommandCode => {
                profile("Command Code", ".commandcode/skills", Some(".commandcode/skills"))
            },
            Self::Continue => profile("Continue", ".continue/skills", Some(".continue/skills")),
            Self::Crush => profile("Crush", ".crush/skills", Some(".crush/skills")),
            Self::Cursor => AgentProfile {
                display_name: "Cursor",
                skills_dir: ".cursor/skills",
                global_skills_dir: Some(".cursor/skills"),
                commands_subdir: "commands",
                rules_subdir: "rules",
                rule_extension: "mdc",
            },
            Self::Droid => profile("Droid", ".factory/skills", Some(".factory/skills")),
            Self::GeminiCli => profile("Gemini CLI", ".gemini/skills", Some(".gemini/skills")),
            Self::GithubCopilot => profile("GitHub Copilot", ".github/skills", None),
            Self::Goose => profile("Goose", ".goose/skills", Some(".goose/skills")),
            Self::IflowCli => profile("iFlow CLI", ".iflow/skills", Some(".iflow/skills")),
            Self::Junie => profile("Junie", ".junie/skills", None),
            Self::Kilo => profile("Kilo Code", ".kilocode/skills", Some(".kilocode/skills")),
            Self::KimiCli => profile("Kimi CLI", ".kimi/skills", Some(".kimi/skills")),
            Self::KiroCli => profile("Kiro CLI", ".kiro/skills", Some(".kiro/skills")),
            Self::Kode => profile("Kode", ".kode/skills", Some(".kode/skills")),
            Self::Mcpjam => profile("MCPJam", ".mcpjam/skills", None),
            Self::MistralVibe => profile("Mistral Vibe", ".vibe/skills", Some(".vibe/skills")),
            Self::Mux => profile("Mux", ".mux/skills", Some(".mux/skills")),
            Self::Neovate => profile("Neovate", ".neovate/skills", Some(".neovate/skills")),
            Self::Opencode => AgentProfile {
                display_name: "opencode",
                skills_dir: ".opencode/skills",
                global_skills_dir: Some(".config/opencode/skills"),
                commands_subdir: "command",
                rules_subdir: "rules",
                rule_extension: "md",
            },
            Self::Openhands => profile("OpenHands", ".openhands/skills", Some(".openhands/skills")),
            Self::Pi => profile("Pi", ".pi/skills", Some(".pi/skills")),
            Self::Qoder => profile("Qoder", ".qoder/skills", Some(".qoder/skills")),
            Self::QwenCode => profile("Qwen Code", ".qwen/skills", Some(".qwen/skills")),
            Self::Replit => profile("Replit", ".replit/skills", None),
            Self::Roo => profile("Roo Code", ".roo/skills", Some(".roo/skills")),
            Self::Trae => profile("Trae", ".trae/skills", None),
            Self::TraeCn => profile("Trae CN", ".trae-cn/skills", None),
            Self::Windsurf => profile("Windsurf", ".windsurf/skills", Some(".windsurf/skills")),
            Self::Zencoder => profile("Zencoder", ".zencoder/skills", Some(".zencoder/skills")),
            Self::Pochi => profile("Pochi", ".pochi/skills", None),
            Self::Adal => profile("Adal", ".adal/skills", None),
        }
    }

    /// Stable identifier used on the command line and in the lock file.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Amp => "amp",
            Self::Antigravity => "antigravity",
            Self::Augment => "augment",
            Self::ClaudeCode => "claude-code",
            Self::Openclaw => "openclaw",
            Self::Cline => "cline",
            Self::Codebuddy => "codebuddy",
            Self::Codex => "codex",
            Self::CommandCode => "command-code",
            Self::Continue => "continue",
            Self::Crush => "crush",
            Self::Cursor => "cursor",
            Self::Droid => "droid",
            Self::GeminiCli => "gemini-cli",
            Self::GithubCopilot => "github-copilot",
            Self::Goose => "goose",
            Self::IflowCli => "iflow-cli",
            Self::Junie => "junie",
            Self::Kilo => "kilo",
            Self::KimiCli => "kimi-cli",
            Self::KiroCli => "kiro-cli",
            Self::Kode => "kode",
            Self::Mcpjam => "mcpjam",
            Self::MistralVibe => "mistral-vibe",
            Self::Mux => "mux",
            Self::Neovate => "neovate",
            Self::Opencode => "opencode",
            Self::Openhands => "openhands",
            Self::Pi => "pi",
            Self::Qoder => "qoder",
            Self::QwenCode => "qwen-code",
            Self::Replit => "replit",
            Self::Roo => "roo",
            Self::Trae => "trae",
            Self::TraeCn => "trae-cn",
            Self::Windsurf => "windsurf",
            Self::Zencoder => "zencoder",
            Self::Pochi => "pochi",
            Self::Adal => "adal",
        }
    }

    /// Project-scope skills directory resolved against the context.
    #[must_use]
    pub fn project_skills_dir(self, ctx: &WorkContext) -> PathBuf {
        ctx.cwd.join(self.profile().skills_dir)
    }

    /// Global-scope skills directory resolved against the context, if this
    /// agent has one.
    #[must_use]
    pub fn global_skills_dir(self, ctx: &WorkContext) -> Option<PathBuf> {
        self.profile()
            .global_skills_dir
            .map(|dir| ctx.home_dir.join(dir))
    }

    /// Skills base directory for a scope. `None` only for global scope on
    /// agents without a global directory.
    #[must_use]
    pub fn skills_dir(self, scope: Scope, ctx: &WorkContext) -> Option<PathBuf> {
        match scope {
            Scope::Project => Some(self.project_skills_dir(ctx)),
            Scope::Global => self.global_skills_dir(ctx),
        }
    }

    /// Root configuration directory within a project, e.g. `.claude` for
    /// `.claude/skills`. Commands and rules are placed under this.
    #[must_use]
    pub fn project_root_dir(self) -> &'static str {
        let skills_dir = self.profile().skills_dir;
        skills_dir.split('/').next().unwrap_or(skills_dir)
    }

    /// Whether this agent appears to be in use: its project or global skills
    /// directory exists.
    #[must_use]
    pub fn detected(self, ctx: &WorkContext) -> bool {
        if self.project_skills_dir(ctx).is_dir() {
            return true;
        }
        self.global_skills_dir(ctx).is_some_and(|dir| dir.is_dir())
    }
}

impl std::fmt::Display for AgentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for unrecognized agent identifiers.
#[derive(Debug, thiserror::Error)]
#[error("unknown agent '{0}'")]
pub struct UnknownAgent(pub String);

impl std::str::FromStr for AgentKind {
    type Err = UnknownAgent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|agent| agent.as_str() == s)
            .ok_or_else(|| UnknownAgent(s.to_string()))
    }
}
