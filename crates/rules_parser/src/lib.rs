//! Parser for rule files (YAML/TOML/JSON formats).
//!
//! This module loads rule declarations, message overrides and metadata from
//! files into a [`RuleFile`].
//!
//! # Example
//!
//! ```rust
//! use rules_parser::parse_yaml;
//!
//! let yaml = r#"
//! rules:
//!   title: not:empty
//!   emails.*:
//!     - email
//!     - length:
//!         max: 64
//! messages:
//!   required: "cannot be missing"
//! "#;
//!
//! let file = parse_yaml(yaml).expect("Failed to parse rules");
//! assert_eq!(file.rules.len(), 2);
//! assert_eq!(file.rule_set().records().count(), 3);
//! ```

use indexmap::IndexMap;
use rules_core::{RuleDeclaration, RuleSet};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during rule file parsing.
#[derive(Debug, Error)]
pub enum ParserError {
    /// YAML parsing or deserialization failed
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml_ng::Error),

    /// TOML parsing or deserialization failed
    #[error("Failed to parse TOML: {0}")]
    TomlError(String),

    /// JSON parsing or deserialization failed
    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    /// File I/O error
    #[error("File I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Unsupported file format
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Invalid file extension
    #[error("Invalid or missing file extension")]
    InvalidExtension,
}

/// Result type alias for parser operations.
pub type Result<T> = std::result::Result<T, ParserError>;

/// Supported file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// YAML format (.yml, .yaml)
    Yaml,
    /// TOML format (.toml)
    Toml,
    /// JSON format (.json)
    Json,
}

/// Contents of a rule file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleFile {
    /// Declarations per field path, in file order
    #[serde(default)]
    pub rules: IndexMap<String, RuleDeclaration>,

    /// Message template overrides per handler name
    #[serde(default)]
    pub messages: IndexMap<String, String>,

    /// Metadata handed to custom error renderers
    #[serde(default)]
    pub meta: Value,
}

impl RuleFile {
    /// Normalizes the declarations into a rule set.
    pub fn rule_set(&self) -> RuleSet {
        let mut rules = RuleSet::new();
        rules.extend(self.rules.iter().map(|(field, decl)| (field, decl.clone())));
        rules
    }
}

/// Parse a rule file from a YAML string.
pub fn parse_yaml(content: &str) -> Result<RuleFile> {
    let file: RuleFile = serde_yaml_ng::from_str(content)?;
    Ok(file)
}

/// Parse a rule file from a TOML string.
///
/// # Example
///
/// ```rust
/// use rules_parser::parse_toml;
///
/// let toml = r#"
/// [rules]
/// "user.email" = "email"
/// "user.age" = { between = { min = 18 } }
/// "#;
///
/// let file = parse_toml(toml).unwrap();
/// assert_eq!(file.rules.len(), 2);
/// ```
pub fn parse_toml(content: &str) -> Result<RuleFile> {
    let file: RuleFile =
        toml::from_str(content).map_err(|e| ParserError::TomlError(e.to_string()))?;
    Ok(file)
}

/// Parse a rule file from a JSON string.
pub fn parse_json(content: &str) -> Result<RuleFile> {
    let file: RuleFile = serde_json::from_str(content)?;
    Ok(file)
}

/// Detect the file format from a path based on its extension.
///
/// # Errors
///
/// Returns `ParserError::InvalidExtension` if the file has no extension.
/// Returns `ParserError::UnsupportedFormat` if the extension is not recognized.
pub fn detect_format(path: &Path) -> Result<FileFormat> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or(ParserError::InvalidExtension)?;

    match extension.to_lowercase().as_str() {
        "yaml" | "yml" => Ok(FileFormat::Yaml),
        "toml" => Ok(FileFormat::Toml),
        "json" => Ok(FileFormat::Json),
        other => Err(ParserError::UnsupportedFormat(other.to_string())),
    }
}

/// Parse a rule file with automatic format detection.
///
/// ```no_run
/// use rules_parser::parse_file;
/// use std::path::Path;
///
/// let file = parse_file(Path::new("rules/signup.yml")).unwrap();
/// println!("Loaded {} field rule(s)", file.rules.len());
/// ```
pub fn parse_file(path: &Path) -> Result<RuleFile> {
    let content = std::fs::read_to_string(path)?;

    match detect_format(path)? {
        FileFormat::Yaml => parse_yaml(&content),
        FileFormat::Toml => parse_toml(&content),
        FileFormat::Json => parse_json(&content),
    }
}

/// Parse a data document (YAML or JSON) into a value.
///
/// TOML is accepted too; anything else is read as JSON.
pub fn parse_data_file(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)?;

    match detect_format(path).unwrap_or(FileFormat::Json) {
        FileFormat::Yaml => Ok(serde_yaml_ng::from_str(&content)?),
        FileFormat::Toml => {
            toml::from_str(&content).map_err(|e| ParserError::TomlError(e.to_string()))
        }
        FileFormat::Json => Ok(serde_json::from_str(&content)?),
    }
}
