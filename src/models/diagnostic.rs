//! Diagnostic records produced by the external analyzer.
//!
//! Only `severity` drives the run outcome; rule, message and location are
//! carried through for printing.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Severity of a single finding.
///
/// Names are matched case-insensitively. Analyzers that emit their severity
/// enum as a number use 0 = Information, 1 = Warning, 2 = Error and
/// 3 = ParseError (folded into `Error`).
pub enum Severity {
    Error,
    Warning,
    Information,
    /// Anything else the analyzer reports. Still a finding, but counted in no bucket.
    Other(String),
}

impl Severity {
    /// Parse a severity name case-insensitively. `warn` and `info` are
    /// accepted as short forms.
    pub fn from_name(name: &str) -> Severity {
        let n = name.trim();
        if n.eq_ignore_ascii_case("error") || n.eq_ignore_ascii_case("parseerror") {
            Severity::Error
        } else if n.eq_ignore_ascii_case("warning") || n.eq_ignore_ascii_case("warn") {
            Severity::Warning
        } else if n.eq_ignore_ascii_case("information") || n.eq_ignore_ascii_case("info") {
            Severity::Information
        } else {
            Severity::Other(n.to_string())
        }
    }

    pub fn from_code(code: i64) -> Severity {
        match code {
            0 => Severity::Information,
            1 => Severity::Warning,
            2 | 3 => Severity::Error,
            other => Severity::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Severity::Error => "Error",
            Severity::Warning => "Warning",
            Severity::Information => "Information",
            Severity::Other(s) => s.as_str(),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Severity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Name(String),
            Code(i64),
        }
        Ok(match Raw::deserialize(deserializer)? {
            Raw::Name(s) => Severity::from_name(&s),
            Raw::Code(c) => Severity::from_code(c),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// A single finding for one file.
pub struct Diagnostic {
    #[serde(default, alias = "RuleName", alias = "ruleName", alias = "rule_name")]
    pub rule: Option<String>,
    #[serde(alias = "Severity")]
    pub severity: Severity,
    #[serde(default, alias = "Message")]
    pub message: String,
    #[serde(default, alias = "Line")]
    pub line: Option<u32>,
    #[serde(default, alias = "Column")]
    pub column: Option<u32>,
}

impl Diagnostic {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Diagnostic {
            rule: None,
            severity,
            message: message.into(),
            line: None,
            column: None,
        }
    }

    /// `line:column` for display, or an empty string when unknown.
    pub fn location(&self) -> String {
        match (self.line, self.column) {
            (Some(l), Some(c)) => format!("{}:{}", l, c),
            (Some(l), None) => l.to_string(),
            _ => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_names_case_insensitive() {
        assert_eq!(Severity::from_name("ERROR"), Severity::Error);
        assert_eq!(Severity::from_name("warning"), Severity::Warning);
        assert_eq!(Severity::from_name("Information"), Severity::Information);
        assert_eq!(Severity::from_name("info"), Severity::Information);
        assert_eq!(
            Severity::from_name("Hint"),
            Severity::Other("Hint".to_string())
        );
    }

    #[test]
    fn test_diagnostic_accepts_pascal_case_and_numeric_severity() {
        let d: Diagnostic = serde_json::from_str(
            r#"{"RuleName":"AvoidAlias","Severity":1,"Line":4,"Column":2,"Message":"no aliases"}"#,
        )
        .unwrap();
        assert_eq!(d.rule.as_deref(), Some("AvoidAlias"));
        assert_eq!(d.severity, Severity::Warning);
        assert_eq!(d.location(), "4:2");

        let parse: Diagnostic =
            serde_json::from_str(r#"{"severity":3,"message":"unexpected token"}"#).unwrap();
        assert_eq!(parse.severity, Severity::Error);
        assert_eq!(parse.location(), "");
    }
}
