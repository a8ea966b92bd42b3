//! Declarative pattern configuration for the generic extractor
//!
//! A configuration is a TOML (or JSON) document listing entity patterns and
//! relationship triggers. Every entity pattern must compile and contain
//! exactly one capture group; both rules are checked when the configuration
//! is loaded, so a bad pattern never reaches extraction.
//!
//! ```toml
//! name = "contracts"
//! min_occurrences = 2
//!
//! [[entity_patterns]]
//! name = "party"
//! pattern = 'between ([A-Z][a-z]+ (?:Inc|LLC))'
//! category = "organization"
//! ```

use crate::error::PatternConfigError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

const DEFAULT_PATTERNS: &str = include_str!("default_patterns.toml");

/// One entity extraction pattern
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityPattern {
    /// Pattern name, used in error messages
    pub name: String,

    /// Regular expression with exactly one capture group
    pub pattern: String,

    /// Category assigned to matched entities
    pub category: String,

    /// Free-form description
    #[serde(default)]
    pub description: String,

    /// Minimum length (characters) of the captured value
    #[serde(default = "default_min_length")]
    pub min_length: usize,
}

impl EntityPattern {
    /// Create a pattern with default description and minimum length
    pub fn new(
        name: impl Into<String>,
        pattern: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
            category: category.into(),
            description: String::new(),
            min_length: default_min_length(),
        }
    }

    /// Compile the pattern, enforcing the single-capture-group rule
    pub fn compile(&self) -> Result<Regex, PatternConfigError> {
        let regex = Regex::new(&self.pattern).map_err(|e| PatternConfigError::InvalidRegex {
            name: self.name.clone(),
            reason: e.to_string(),
        })?;

        // captures_len counts the implicit whole-match group
        let found = regex.captures_len() - 1;
        if found != 1 {
            return Err(PatternConfigError::CaptureGroups {
                name: self.name.clone(),
                found,
            });
        }

        Ok(regex)
    }
}

/// Co-occurrence rule between entity categories
///
/// Loaded and validated only; no extractor applies triggers yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipTrigger {
    /// Trigger name, also the intended edge type
    pub name: String,

    /// Categories allowed at the source end
    pub source_categories: Vec<String>,

    /// Categories allowed at the target end
    pub target_categories: Vec<String>,

    /// Maximum character distance between the two entities
    #[serde(default)]
    pub proximity: usize,

    /// Optional pattern that must appear between the entities
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_pattern: Option<String>,
}

/// Root pattern configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternConfig {
    /// Schema version
    #[serde(default = "default_version")]
    pub version: String,

    /// Configuration name
    #[serde(default = "default_name")]
    pub name: String,

    /// Free-form description
    #[serde(default)]
    pub description: String,

    /// Matches needed before an entity becomes a node
    #[serde(default = "default_min_occurrences")]
    pub min_occurrences: usize,

    /// Entity patterns
    pub entity_patterns: Vec<EntityPattern>,

    /// Relationship triggers
    #[serde(default)]
    pub relationship_triggers: Vec<RelationshipTrigger>,
}

fn default_version() -> String {
    "1.0".to_string()
}

fn default_name() -> String {
    "default".to_string()
}

fn default_min_occurrences() -> usize {
    2
}

fn default_min_length() -> usize {
    2
}

/// Document format of a configuration file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML document
    Toml,
    /// JSON document
    Json,
}

impl ConfigFormat {
    /// Format implied by a file extension (`.json` is JSON, anything else TOML)
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ConfigFormat::Json,
            _ => ConfigFormat::Toml,
        }
    }
}

impl PatternConfig {
    /// Create a configuration from patterns, with default settings
    pub fn new(entity_patterns: Vec<EntityPattern>) -> Self {
        Self {
            version: default_version(),
            name: default_name(),
            description: String::new(),
            min_occurrences: default_min_occurrences(),
            entity_patterns,
            relationship_triggers: Vec::new(),
        }
    }

    /// Load and validate a configuration file
    pub fn load(path: &Path) -> Result<Self, PatternConfigError> {
        let origin = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|source| PatternConfigError::Io {
            path: origin.clone(),
            source,
        })?;

        let config = Self::parse(&content, ConfigFormat::from_path(path), &origin)?;
        info!(
            "Loaded pattern configuration '{}' ({} patterns, {} triggers) from {}",
            config.name,
            config.entity_patterns.len(),
            config.relationship_triggers.len(),
            origin
        );
        Ok(config)
    }

    /// Parse and validate a TOML configuration
    pub fn from_toml(content: &str) -> Result<Self, PatternConfigError> {
        Self::parse(content, ConfigFormat::Toml, "<toml>")
    }

    /// Parse and validate a JSON configuration
    pub fn from_json(content: &str) -> Result<Self, PatternConfigError> {
        Self::parse(content, ConfigFormat::Json, "<json>")
    }

    /// The bundled default configuration
    pub fn default_patterns() -> Result<Self, PatternConfigError> {
        Self::parse(DEFAULT_PATTERNS, ConfigFormat::Toml, "<bundled defaults>")
    }

    /// Parse and validate a configuration in the given format
    ///
    /// `origin` names the source in error messages.
    pub fn parse(content: &str, format: ConfigFormat, origin: &str) -> Result<Self, PatternConfigError> {
        if content.trim().is_empty() {
            return Err(PatternConfigError::Empty {
                path: origin.to_string(),
            });
        }

        let config: Self = match format {
            ConfigFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
            ConfigFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        }
        .map_err(|reason| PatternConfigError::Malformed {
            path: origin.to_string(),
            reason,
        })?;

        config.validate()?;
        debug!("Pattern configuration {} validated", origin);
        Ok(config)
    }

    /// Check every rule a loaded configuration must satisfy
    pub fn validate(&self) -> Result<(), PatternConfigError> {
        if self.min_occurrences == 0 {
            return Err(PatternConfigError::Invalid(
                "min_occurrences must be at least 1".to_string(),
            ));
        }

        for pattern in &self.entity_patterns {
            pattern.compile()?;
        }

        for trigger in &self.relationship_triggers {
            if let Some(pattern) = &trigger.trigger_pattern {
                Regex::new(pattern).map_err(|e| PatternConfigError::InvalidTrigger {
                    name: trigger.name.clone(),
                    reason: e.to_string(),
                })?;
            }
        }

        Ok(())
    }

    /// Override the occurrence threshold
    pub fn with_min_occurrences(mut self, min_occurrences: usize) -> Self {
        self.min_occurrences = min_occurrences;
        self
    }

    /// Serialize to TOML
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
