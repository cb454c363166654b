//! Configuration types for the Flowboard editor.
//!
//! This module provides configuration structures that control the editor's
//! autosave behavior and how shapes nest inside containers. All types
//! implement [`serde::Deserialize`] for loading from external sources such as
//! a TOML file.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining the sections below.
//! - [`EditorConfig`] - Autosave delay and the default connection kind.
//! - [`ContainmentConfig`] - Containment padding and acceptance rules.
//!
//! # Example
//!
//! ```
//! # use flowboard::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.editor().autosave_delay().as_millis(), 2000);
//! assert_eq!(config.containment().padding(), 8.0);
//! ```

use std::time::Duration;

use serde::Deserialize;

use flowboard_core::{model::ConnectionKind, shape::ShapeKind};

use crate::containment::ContainmentRules;

const DEFAULT_AUTOSAVE_DELAY_MS: u64 = 2000;
const DEFAULT_CONTAINMENT_PADDING: f32 = 8.0;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Editor configuration section.
    #[serde(default)]
    editor: EditorConfig,

    /// Containment configuration section.
    #[serde(default)]
    containment: ContainmentConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(editor: EditorConfig, containment: ContainmentConfig) -> Self {
        Self {
            editor,
            containment,
        }
    }

    /// Returns the editor configuration.
    pub fn editor(&self) -> &EditorConfig {
        &self.editor
    }

    /// Returns the containment configuration.
    pub fn containment(&self) -> &ContainmentConfig {
        &self.containment
    }
}

/// Editor behavior settings.
#[derive(Debug, Clone, Deserialize)]
pub struct EditorConfig {
    /// Quiet period after the last change before an automatic save, in milliseconds.
    #[serde(default = "default_autosave_delay_ms")]
    autosave_delay_ms: u64,

    /// Connection kind used when the user has not picked one.
    #[serde(default)]
    default_connection: Option<String>,
}

fn default_autosave_delay_ms() -> u64 {
    DEFAULT_AUTOSAVE_DELAY_MS
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            autosave_delay_ms: DEFAULT_AUTOSAVE_DELAY_MS,
            default_connection: None,
        }
    }
}

impl EditorConfig {
    /// Creates an editor configuration.
    pub fn new(autosave_delay_ms: u64, default_connection: Option<String>) -> Self {
        Self {
            autosave_delay_ms,
            default_connection,
        }
    }

    /// Returns the autosave debounce delay.
    pub fn autosave_delay(&self) -> Duration {
        Duration::from_millis(self.autosave_delay_ms)
    }

    /// Returns the default connection kind, falling back to [`ConnectionKind::PRIMARY`].
    pub fn default_connection(&self) -> ConnectionKind {
        self.default_connection
            .as_deref()
            .map(ConnectionKind::from)
            .unwrap_or(ConnectionKind::PRIMARY)
    }
}

/// One container's acceptance rule: the child shapes it refuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ContainmentRuleConfig {
    container: String,
    #[serde(default)]
    rejects: Vec<String>,
}

impl ContainmentRuleConfig {
    pub fn new(container: impl Into<String>, rejects: Vec<String>) -> Self {
        Self {
            container: container.into(),
            rejects,
        }
    }
}

/// Containment settings.
///
/// When `rules` is absent the built-in rules apply: a pool accepts anything
/// but another pool, a lane accepts anything but pools and lanes.
#[derive(Debug, Clone, Deserialize)]
pub struct ContainmentConfig {
    /// Inset applied to a container's bounds before the center test.
    #[serde(default = "default_padding")]
    padding: f32,

    #[serde(default)]
    rules: Option<Vec<ContainmentRuleConfig>>,
}

fn default_padding() -> f32 {
    DEFAULT_CONTAINMENT_PADDING
}

impl Default for ContainmentConfig {
    fn default() -> Self {
        Self {
            padding: DEFAULT_CONTAINMENT_PADDING,
            rules: None,
        }
    }
}

impl ContainmentConfig {
    /// Creates a containment configuration. `None` rules select the built-in set.
    pub fn new(padding: f32, rules: Option<Vec<ContainmentRuleConfig>>) -> Self {
        Self { padding, rules }
    }

    pub fn padding(&self) -> f32 {
        self.padding
    }

    /// Builds the acceptance rules described by this section.
    pub fn rules(&self) -> ContainmentRules {
        let Some(rules) = &self.rules else {
            return ContainmentRules::default();
        };

        rules
            .iter()
            .fold(ContainmentRules::empty(), |acc, rule| {
                acc.with_rule(
                    ShapeKind::from(rule.container.as_str()),
                    rule.rejects.iter().map(|name| ShapeKind::from(name.as_str())),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.editor().autosave_delay(), Duration::from_millis(2000));
        assert_eq!(config.editor().default_connection(), ConnectionKind::Sequence);
        assert_eq!(config.containment().padding(), 8.0);

        let rules = config.containment().rules();
        assert!(rules.accepts(&ShapeKind::Pool, &ShapeKind::Lane));
        assert!(!rules.accepts(&ShapeKind::Pool, &ShapeKind::Pool));
        assert!(!rules.accepts(&ShapeKind::Lane, &ShapeKind::Lane));
    }

    #[test]
    fn test_load_from_toml() {
        let config: AppConfig = toml::from_str(
            r#"
            [editor]
            autosave_delay_ms = 500
            default_connection = "message"

            [containment]
            padding = 4.0

            [[containment.rules]]
            container = "lane"
            rejects = ["pool"]
            "#,
        )
        .unwrap();

        assert_eq!(config.editor().autosave_delay(), Duration::from_millis(500));
        assert_eq!(config.editor().default_connection(), ConnectionKind::Message);
        assert_eq!(config.containment().padding(), 4.0);

        let rules = config.containment().rules();
        assert!(rules.accepts(&ShapeKind::Lane, &ShapeKind::Lane));
        assert!(!rules.accepts(&ShapeKind::Lane, &ShapeKind::Pool));
        // Only the listed containers accept children once rules are given.
        assert!(!rules.accepts(&ShapeKind::Pool, &ShapeKind::Task));
    }

    #[test]
    fn test_partial_sections_use_defaults() {
        let config: AppConfig = toml::from_str("[editor]\n").unwrap();
        assert_eq!(config.editor().autosave_delay(), Duration::from_millis(2000));
        assert_eq!(config.containment().padding(), 8.0);
    }
}
