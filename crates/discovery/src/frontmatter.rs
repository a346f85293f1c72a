use {
    anyhow::{Context, bail},
    serde::Deserialize,
};

/// Fields a skill marker file must (or may) declare.
#[derive(Debug, Clone, Deserialize)]
pub struct Marker {
    pub name: String,
    pub description: String,
    /// Free-form metadata mapping; `internal: true` hides the skill.
    #[serde(default)]
    pub metadata: Option<serde_yaml::Value>,
}

impl Marker {
    /// Whether the marker carries `metadata.internal: true`.
    #[must_use]
    pub fn is_internal(&self) -> bool {
        self.metadata
            .as_ref()
            .and_then(|m| m.get("internal"))
            .and_then(serde_yaml::Value::as_bool)
            .unwrap_or(false)
    }
}

/// Split content at `---` delimiters into (frontmatter, body).
pub fn split_frontmatter(content: &str) -> anyhow::Result<(String, String)> {
    let trimmed = content.trim_start();
    let Some(after_open) = trimmed.strip_prefix("---") else {
        bail!("missing YAML frontmatter delimited by ---");
    };

    let close = after_open
        .find("\n---")
        .context("missing closing --- for frontmatter")?;

    let frontmatter = after_open[..close].trim().to_string();
    let body = after_open[close + 4..].trim().to_string();
    Ok((frontmatter, body))
}

/// Parse a skill marker file. Requires string `name` and `description`.
pub fn parse_marker(content: &str) -> anyhow::Result<Marker> {
    let (frontmatter, _body) = split_frontmatter(content)?;
    let marker: Marker =
        serde_yaml::from_str(&frontmatter).context("invalid marker frontmatter")?;
    if marker.name.trim().is_empty() || marker.description.trim().is_empty() {
        bail!("marker frontmatter requires non-empty name and description");
    }
    Ok(marker)
}

/// Best-effort description from a flat asset's frontmatter, empty when the
/// file has none or it does not parse.
#[must_use]
pub fn description_of(content: &str) -> String {
    #[derive(Deserialize)]
    struct Described {
        #[serde(default)]
        description: Option<String>,
    }

    let Ok((frontmatter, _)) = split_frontmatter(content) else {
        return String::new();
    };
    serde_yaml::from_str::<Described>(&frontmatter)
        .ok()
        .and_then(|d| d.description)
        .unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_name_description_and_metadata() {
        let content = "---\nname: my-skill\ndescription: A test skill\nmetadata:\n  internal: true\n---\nBody here.\n";
        let marker = parse_marker(content).unwrap();
        assert_eq!(marker.name, "my-skill");
        assert_eq!(marker.description, "A test skill");
        assert!(marker.is_internal());
    }

    #[test]
    fn internal_defaults_to_false() {
        let marker = parse_marker("---\nname: a\ndescription: b\n---\nbody\n").unwrap();
        assert!(!marker.is_internal());
    }

    #[test]
    fn missing_frontmatter_is_an_error() {
        assert!(parse_marker("# Just markdown\n").is_err());
        assert!(parse_marker("---\nname: a\nno closing delimiter\n").is_err());
    }

    #[test]
    fn missing_required_fields_are_errors() {
        assert!(parse_marker("---\nname: only-name\n---\nbody\n").is_err());
        assert!(parse_marker("---\ndescription: only-desc\n---\nbody\n").is_err());
        assert!(parse_marker("---\nname: ''\ndescription: d\n---\nbody\n").is_err());
    }

    #[test]
    fn non_string_name_is_an_error() {
        assert!(parse_marker("---\nname: [1, 2]\ndescription: d\n---\nbody\n").is_err());
    }

    #[test]
    fn split_returns_body() {
        let (fm, body) = split_frontmatter("---\nname: x\n---\nThe body.\n").unwrap();
        assert_eq!(fm, "name: x");
        assert_eq!(body, "The body.");
    }

    #[test]
    fn description_of_is_tolerant() {
        assert_eq!(description_of("---\ndescription: hi\n---\nbody\n"), "hi");
        assert_eq!(description_of("no frontmatter"), "");
        assert_eq!(description_of("---\nother: field\n---\nbody\n"), "");
    }
}
