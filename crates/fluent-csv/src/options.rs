//! Serializable rendering options.
//!
//! Options hold the knobs that do not depend on the record type, so they can
//! live in a config file next to the rest of an application's settings:
//!
//! ```yaml
//! delimiter: ";"
//! line_ending: crlf
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// The delimiter used when none is configured.
pub const DEFAULT_DELIMITER: &str = ",";

/// Line terminator written after every line of output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    /// `\n`
    Lf,
    /// `\r\n`
    CrLf,
}

impl LineEnding {
    /// The host platform's convention.
    pub fn native() -> Self {
        if cfg!(windows) {
            LineEnding::CrLf
        } else {
            LineEnding::Lf
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

impl Default for LineEnding {
    fn default() -> Self {
        LineEnding::native()
    }
}

/// Delimiter and line ending, as one deserializable value.
///
/// Missing fields fall back to [`DEFAULT_DELIMITER`] and
/// [`LineEnding::native`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateOptions {
    pub delimiter: String,
    pub line_ending: LineEnding,
}

impl Default for TemplateOptions {
    fn default() -> Self {
        TemplateOptions {
            delimiter: DEFAULT_DELIMITER.to_string(),
            line_ending: LineEnding::native(),
        }
    }
}

impl TemplateOptions {
    /// Parse options from YAML.
    ///
    /// ```
    /// use fluent_csv::{LineEnding, TemplateOptions};
    ///
    /// let options = TemplateOptions::from_yaml("delimiter: \";\"\nline_ending: crlf\n").unwrap();
    /// assert_eq!(options.delimiter, ";");
    /// assert_eq!(options.line_ending, LineEnding::CrLf);
    /// ```
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parse options from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TemplateError;

    #[test]
    fn defaults_to_comma_and_native_ending() {
        let options = TemplateOptions::default();
        assert_eq!(options.delimiter, ",");
        assert_eq!(options.line_ending, LineEnding::native());
    }

    #[test]
    fn line_ending_text() {
        assert_eq!(LineEnding::Lf.as_str(), "\n");
        assert_eq!(LineEnding::CrLf.as_str(), "\r\n");
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let options = TemplateOptions::from_yaml("delimiter: \"|\"").unwrap();
        assert_eq!(options.delimiter, "|");
        assert_eq!(options.line_ending, LineEnding::native());
    }

    #[test]
    fn parses_json() {
        let options = TemplateOptions::from_json(r#"{"line_ending": "lf"}"#).unwrap();
        assert_eq!(options.delimiter, ",");
        assert_eq!(options.line_ending, LineEnding::Lf);
    }

    #[test]
    fn invalid_line_ending_is_rejected() {
        let err = TemplateOptions::from_json(r#"{"line_ending": "cr"}"#).unwrap_err();
        assert!(matches!(err, TemplateError::Options(_)));
    }

    #[test]
    fn yaml_round_trip() {
        let options = TemplateOptions {
            delimiter: "\t".to_string(),
            line_ending: LineEnding::CrLf,
        };
        let yaml = serde_yaml::to_string(&options).unwrap();
        assert!(yaml.contains("crlf"));
        assert_eq!(TemplateOptions::from_yaml(&yaml).unwrap(), options);
    }
}
