use serde::{Serialize, Serializer};
use std::fmt;

use crate::platform::Platform;

// ---------------------------------------------------------------------------
// EnvValue
// ---------------------------------------------------------------------------

/// Value written for an environment-variable opt-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvValue {
    /// The target reads the variable's content.
    Literal(&'static str),
    /// The target only checks that the variable is set.
    Presence,
}

impl EnvValue {
    /// Content written for presence-only variables.
    pub const PRESENCE_VALUE: &'static str = "1";

    pub fn as_str(self) -> &'static str {
        match self {
            EnvValue::Literal(v) => v,
            EnvValue::Presence => Self::PRESENCE_VALUE,
        }
    }

    pub fn is_presence(self) -> bool {
        matches!(self, EnvValue::Presence)
    }
}

impl fmt::Display for EnvValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EnvValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ActionKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionKind {
    EnvVar {
        name: &'static str,
        value: EnvValue,
    },
    Command {
        executable: &'static str,
        arguments: &'static [&'static str],
    },
}

impl ActionKind {
    pub fn label(&self) -> &'static str {
        match self {
            ActionKind::EnvVar { .. } => "env",
            ActionKind::Command { .. } => "exec",
        }
    }
}

// ---------------------------------------------------------------------------
// OptOutAction
// ---------------------------------------------------------------------------

/// One independent opt-out for one target application.
///
/// Built-in actions are `const` values, so the `assert!`s in the
/// constructors reject an empty variable name or executable at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OptOutAction {
    pub id: &'static str,
    #[serde(flatten)]
    pub kind: ActionKind,
    /// Empty means every platform.
    pub platforms: &'static [Platform],
    pub description: &'static str,
    pub source_url: &'static str,
}

impl OptOutAction {
    pub const fn env(id: &'static str, name: &'static str, value: &'static str) -> Self {
        assert!(!name.is_empty(), "environment variable name must not be empty");
        Self::new(
            id,
            ActionKind::EnvVar {
                name,
                value: EnvValue::Literal(value),
            },
        )
    }

    pub const fn env_presence(id: &'static str, name: &'static str) -> Self {
        assert!(!name.is_empty(), "environment variable name must not be empty");
        Self::new(
            id,
            ActionKind::EnvVar {
                name,
                value: EnvValue::Presence,
            },
        )
    }

    pub const fn command(
        id: &'static str,
        executable: &'static str,
        arguments: &'static [&'static str],
    ) -> Self {
        assert!(!executable.is_empty(), "executable must not be empty");
        Self::new(
            id,
            ActionKind::Command {
                executable,
                arguments,
            },
        )
    }

    const fn new(id: &'static str, kind: ActionKind) -> Self {
        assert!(!id.is_empty(), "action id must not be empty");
        Self {
            id,
            kind,
            platforms: &[],
            description: "",
            source_url: "",
        }
    }

    /// Restrict the action to the given platforms.
    pub const fn on(mut self, platforms: &'static [Platform]) -> Self {
        self.platforms = platforms;
        self
    }

    pub const fn about(mut self, description: &'static str, source_url: &'static str) -> Self {
        self.description = description;
        self.source_url = source_url;
        self
    }

    pub fn applies_to(&self, platform: Platform) -> bool {
        self.platforms.is_empty() || self.platforms.contains(&platform)
    }

    pub fn is_env(&self) -> bool {
        matches!(self.kind, ActionKind::EnvVar { .. })
    }

    pub fn is_command(&self) -> bool {
        matches!(self.kind, ActionKind::Command { .. })
    }

    /// Log form: `NAME=VALUE` or `executable arguments`.
    pub fn render(&self) -> String {
        match self.kind {
            ActionKind::EnvVar { name, value } => format!("{name}={value}"),
            ActionKind::Command {
                executable,
                arguments,
            } => {
                if arguments.is_empty() {
                    executable.to_string()
                } else {
                    format!("{} {}", executable, arguments.join(" "))
                }
            }
        }
    }

    /// Human-readable platform list, `any` when ungated.
    pub fn platform_label(&self) -> String {
        if self.platforms.is_empty() {
            return "any".to_string();
        }
        self.platforms
            .iter()
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for OptOutAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
